//! The unit of RL interaction.

use physics::{Info, Qp};
use std::collections::BTreeMap;

/// Everything an agent sees after one transition.
///
/// A `State` is a value: `step` consumes the old record conceptually and
/// returns a fresh one, so previous states remain valid for re-execution and
/// gradient computation. The `done` flag is a float rather than a bool so a
/// whole batch of flags stays a plain numeric array.
#[derive(Debug, Clone)]
pub struct State {
    /// Seed state; the only permitted randomness source. Split with
    /// [`split_rng`] whenever fresh entropy is needed.
    pub rng: fastrand::Rng,
    /// One record per body.
    pub qp: Vec<Qp>,
    pub info: Info,
    pub obs: Vec<f32>,
    pub reward: f32,
    /// 0.0 while the episode runs, 1.0 from the terminal step onward.
    pub done: f32,
    pub steps: u32,
    pub metrics: BTreeMap<String, f32>,
}

impl State {
    /// A fresh episode start: zero reward, zero steps, not done.
    #[must_use]
    pub fn initial(rng: fastrand::Rng, qp: Vec<Qp>, info: Info, obs: Vec<f32>) -> Self {
        Self {
            rng,
            qp,
            info,
            obs,
            reward: 0.0,
            done: 0.0,
            steps: 0,
            metrics: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done >= 1.0
    }

    #[must_use]
    pub fn with_qp(self, qp: Vec<Qp>) -> Self {
        Self { qp, ..self }
    }

    #[must_use]
    pub fn with_obs(self, obs: Vec<f32>) -> Self {
        Self { obs, ..self }
    }

    #[must_use]
    pub fn with_metric(mut self, name: &str, value: f32) -> Self {
        self.metrics.insert(name.to_owned(), value);
        self
    }
}

/// Equality covers the observable transition data; the rng is an entropy
/// source, not part of the transition.
impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.qp == other.qp
            && self.info == other.info
            && self.obs == other.obs
            && self.reward == other.reward
            && self.done == other.done
            && self.steps == other.steps
            && self.metrics == other.metrics
    }
}

/// Episode-termination flag for a given step count: 1.0 once the counter
/// reaches the episode length, monotone from then on.
#[must_use]
pub fn done_flag(steps: u32, episode_length: u32) -> f32 {
    if steps >= episode_length {
        1.0
    } else {
        0.0
    }
}

/// Derive an independent child generator from `parent`.
///
/// The child is seeded from the parent's next draw, so splitting is
/// deterministic given the parent's state, and successive splits yield
/// distinct streams.
#[must_use]
pub fn split_rng(parent: &fastrand::Rng) -> fastrand::Rng {
    fastrand::Rng::with_seed(parent.u64(..))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_leave_other_fields_untouched() {
        let base = State::initial(
            fastrand::Rng::with_seed(1),
            vec![Qp::ZERO],
            Info::ZERO,
            vec![0.5, -0.5],
        );
        let updated = base
            .clone()
            .with_obs(vec![1.0, 2.0])
            .with_metric("distance", 3.0);
        assert_eq!(updated.obs, vec![1.0, 2.0]);
        assert_eq!(updated.metrics.get("distance"), Some(&3.0));
        assert_eq!(updated.qp, base.qp);
        assert_eq!(updated.reward, base.reward);
        assert_eq!(updated.done, base.done);
        assert_eq!(updated.steps, base.steps);
    }

    #[test]
    fn split_rng_is_deterministic_and_streams_diverge() {
        let a = fastrand::Rng::with_seed(5);
        let b = fastrand::Rng::with_seed(5);
        let a1 = split_rng(&a);
        let a2 = split_rng(&a);
        let b1 = split_rng(&b);
        let b2 = split_rng(&b);
        assert_eq!(a1.u64(..), b1.u64(..));
        assert_eq!(a2.u64(..), b2.u64(..));
        assert_ne!(a1.u64(..), a2.u64(..));
    }
}
