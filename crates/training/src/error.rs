use crate::algorithm::Algorithm;
use envs::EnvError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrainError {
    /// Name does not match any registered learner. Raised before any
    /// environment is constructed.
    #[error("unknown learner: {0}")]
    UnknownAlgorithm(String),
    /// The selected learner needs a hyperparameter the configuration left
    /// unset.
    #[error("{algorithm} requires `{field}` to be set")]
    MissingHyperparam { algorithm: Algorithm, field: &'static str },
    /// A hyperparameter is set to a value the learner cannot run with.
    #[error("{algorithm} requires `{field}` to be positive")]
    InvalidHyperparam { algorithm: Algorithm, field: &'static str },
    /// Parameter vector does not fit the policy topology.
    #[error("params carry {got} values, policy expects {expected}")]
    ParamShape { expected: usize, got: usize },
    #[error(transparent)]
    Env(#[from] EnvError),
    #[error("checkpoint io: {0}")]
    Io(#[from] std::io::Error),
    #[error("checkpoint encoding: {0}")]
    Codec(#[from] serde_json::Error),
}
