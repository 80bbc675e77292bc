//! The two-operation environment contract every task implements.

use crate::state::State;
use physics::Config;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    #[error("unknown environment: {0}")]
    UnknownEnv(String),
    /// Dimension disagreements fail at the boundary; nothing is truncated
    /// or padded.
    #[error("action has {got} dims, environment expects {expected}")]
    ActionShape { expected: usize, got: usize },
    #[error("observation has {got} dims, environment expects {expected}")]
    ObservationShape { expected: usize, got: usize },
    #[error("environment is terminal; only reset is legal")]
    Terminal,
}

/// A simulated task.
///
/// `reset` starts a fresh episode; `step` applies the task dynamics to
/// produce a new [`State`], incrementing the step counter by exactly one and
/// recomputing `done` against the fixed episode length. Implementations must
/// be deterministic: identical `(state, action)` inputs give bit-identical
/// outputs, so a transition can be re-executed safely. The only entropy
/// source is the rng threaded through the state.
pub trait Env: std::fmt::Debug {
    fn reset(&self, rng: fastrand::Rng) -> State;

    fn step(&self, state: &State, action: &[f32]) -> Result<State, EnvError>;

    fn observation_size(&self) -> usize;

    fn action_size(&self) -> usize;

    fn episode_length(&self) -> u32;

    fn config(&self) -> &Config;

    fn dt(&self) -> f32 {
        self.config().dt
    }

    /// Boundary checks shared by every `step` implementation.
    fn check_step(&self, state: &State, action: &[f32]) -> Result<(), EnvError> {
        if state.is_done() {
            return Err(EnvError::Terminal);
        }
        if action.len() != self.action_size() {
            return Err(EnvError::ActionShape { expected: self.action_size(), got: action.len() });
        }
        Ok(())
    }

    /// Guard an observation about to be stored into a state.
    fn check_obs(&self, obs: &[f32]) -> Result<(), EnvError> {
        if obs.len() != self.observation_size() {
            return Err(EnvError::ObservationShape {
                expected: self.observation_size(),
                got: obs.len(),
            });
        }
        Ok(())
    }
}

/// Step once with the same action applied `repeat` times, summing rewards.
/// Stops early if the episode terminates mid-repeat.
pub fn step_repeat(
    env: &dyn Env,
    state: &State,
    action: &[f32],
    repeat: usize,
) -> Result<State, EnvError> {
    let mut current = env.step(state, action)?;
    let mut reward = current.reward;
    for _ in 1..repeat.max(1) {
        if current.is_done() {
            break;
        }
        current = env.step(&current, action)?;
        reward += current.reward;
    }
    current.reward = reward;
    Ok(current)
}
