//! Lockstep batches of independent environment instances.

use crate::env::{Env, EnvError};
use crate::state::{split_rng, State};

/// A batch of episode states advanced in lockstep over one environment.
///
/// Each entry is independent: `step_all` is a pure elementwise map with no
/// shared mutable state between entries, and no entry can observe another's
/// partial result. Entries that terminated are reset in place of the step,
/// so the batch keeps producing experience without caller bookkeeping.
pub struct Batch<'a> {
    env: &'a dyn Env,
}

impl<'a> Batch<'a> {
    #[must_use]
    pub fn new(env: &'a dyn Env) -> Self {
        Self { env }
    }

    /// Start `n` episodes with rngs derived deterministically from `seed`.
    #[must_use]
    pub fn reset_all(&self, seed: u64, n: usize) -> Vec<State> {
        let root = fastrand::Rng::with_seed(seed);
        (0..n).map(|_| self.env.reset(split_rng(&root))).collect()
    }

    /// Advance every entry by its own action; terminal entries restart.
    pub fn step_all(
        &self,
        states: &[State],
        actions: &[Vec<f32>],
    ) -> Result<Vec<State>, EnvError> {
        self.step_all_repeat(states, actions, 1)
    }

    /// Like [`Batch::step_all`], applying each action `repeat` times.
    pub fn step_all_repeat(
        &self,
        states: &[State],
        actions: &[Vec<f32>],
        repeat: usize,
    ) -> Result<Vec<State>, EnvError> {
        if actions.len() != states.len() {
            return Err(EnvError::ActionShape { expected: states.len(), got: actions.len() });
        }
        states
            .iter()
            .zip(actions)
            .map(|(state, action)| {
                if state.is_done() {
                    Ok(self.env.reset(split_rng(&state.rng)))
                } else {
                    crate::env::step_repeat(self.env, state, action, repeat)
                }
            })
            .collect()
    }
}
