//! The uniform training configuration.
//!
//! One immutable struct built at startup and passed by reference through the
//! whole call chain; there is no process-wide flag registry. Fields shared
//! by every learner have defaults; algorithm-specific hyperparameters are
//! optional and validated by the selected learner's `setup`.

use crate::algorithm::Algorithm;
use crate::error::TrainError;

#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Registered environment name.
    pub env: String,
    pub num_envs: usize,
    pub total_env_steps: u64,
    /// Progress-write frequency, as a call count.
    pub eval_frequency: u64,
    pub episode_length: u32,
    pub seed: u64,
    pub action_repeat: usize,
    pub normalize_observations: bool,
    pub learning_rate: f32,
    pub discounting: f32,
    pub reward_scaling: f32,

    // Policy-gradient (ppo)
    pub batch_size: Option<usize>,
    pub unroll_length: Option<usize>,
    pub num_minibatches: Option<usize>,
    pub num_update_epochs: Option<usize>,
    pub entropy_cost: Option<f32>,

    // Evolution strategy (es)
    pub population_size: Option<usize>,
    pub perturbation_std: Option<f32>,
    pub l2coeff: Option<f32>,
    pub center_fitness: Option<bool>,

    // Analytic policy gradient (apg)
    pub max_gradient_norm: Option<f32>,

    // Off-policy actor-critic (sac)
    pub min_replay_size: Option<usize>,
    pub max_replay_size: Option<usize>,
    pub grad_updates_per_step: Option<f32>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            env: "fast".to_owned(),
            num_envs: 4,
            total_env_steps: 50_000,
            eval_frequency: 10,
            episode_length: 1000,
            seed: 0,
            action_repeat: 1,
            normalize_observations: true,
            learning_rate: 5e-4,
            discounting: 0.99,
            reward_scaling: 10.0,
            batch_size: None,
            unroll_length: None,
            num_minibatches: None,
            num_update_epochs: None,
            entropy_cost: None,
            population_size: None,
            perturbation_std: None,
            l2coeff: None,
            center_fitness: None,
            max_gradient_norm: None,
            min_replay_size: None,
            max_replay_size: None,
            grad_updates_per_step: None,
        }
    }
}

/// Pull a required hyperparameter out of the configuration, naming the
/// learner and field on failure so the error is diagnosable without a rerun.
pub(crate) fn require<T>(
    value: Option<T>,
    algorithm: Algorithm,
    field: &'static str,
) -> Result<T, TrainError> {
    value.ok_or(TrainError::MissingHyperparam { algorithm, field })
}

/// Like [`require`], additionally rejecting zero.
pub(crate) fn require_positive(
    value: Option<usize>,
    algorithm: Algorithm,
    field: &'static str,
) -> Result<usize, TrainError> {
    match require(value, algorithm, field)? {
        0 => Err(TrainError::InvalidHyperparam { algorithm, field }),
        v => Ok(v),
    }
}
