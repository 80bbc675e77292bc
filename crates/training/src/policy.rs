//! The inference side of a trained learner.

use crate::error::TrainError;
use crate::nn::{Mlp, Normalizer};
use serde::{Deserialize, Serialize};

/// Trained parameter bundle: topology, flat values and the observation
/// statistics they were trained under. This is the unit of checkpointing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Params {
    pub sizes: Vec<usize>,
    pub values: Vec<f32>,
    pub normalizer: Option<Normalizer>,
}

/// Maps `(params, observation)` to an action. Stateless; the same policy
/// value serves training-time action selection and the evaluation rollout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    net: Mlp,
}

impl Policy {
    #[must_use]
    pub fn new(observation_size: usize, hidden: usize, action_size: usize) -> Self {
        Self { net: Mlp::new(vec![observation_size, hidden, action_size]) }
    }

    #[must_use]
    pub fn net(&self) -> &Mlp {
        &self.net
    }

    /// Deterministic action for an observation.
    ///
    /// The rng argument is part of the inference contract (stochastic
    /// policies split it for sampling); the plain MLP policy ignores it.
    pub fn act(
        &self,
        params: &Params,
        obs: &[f32],
        _rng: &mut fastrand::Rng,
    ) -> Result<Vec<f32>, TrainError> {
        if params.sizes != self.net.sizes || params.values.len() != self.net.param_count() {
            return Err(TrainError::ParamShape {
                expected: self.net.param_count(),
                got: params.values.len(),
            });
        }
        let obs = match &params.normalizer {
            Some(norm) => norm.apply(obs),
            None => obs.to_vec(),
        };
        Ok(self.net.forward(&params.values, &obs))
    }

    /// Bind parameters once for repeated evaluation calls.
    ///
    /// Purely a caching convenience: output is identical to calling
    /// [`Policy::act`] every step with the same params.
    pub fn compile(&self, params: &Params) -> Result<CompiledPolicy, TrainError> {
        if params.sizes != self.net.sizes || params.values.len() != self.net.param_count() {
            return Err(TrainError::ParamShape {
                expected: self.net.param_count(),
                got: params.values.len(),
            });
        }
        Ok(CompiledPolicy { net: self.net.clone(), params: params.clone() })
    }
}

/// A policy with its parameters bound, for tight rollout loops.
#[derive(Debug, Clone)]
pub struct CompiledPolicy {
    net: Mlp,
    params: Params,
}

impl CompiledPolicy {
    #[must_use]
    pub fn act(&self, obs: &[f32]) -> Vec<f32> {
        let obs = match &self.params.normalizer {
            Some(norm) => norm.apply(obs),
            None => obs.to_vec(),
        };
        self.net.forward(&self.params.values, &obs)
    }
}
