//! A trivial 1-D task with a closed-form trajectory, for unit testing.

use crate::env::{Env, EnvError};
use crate::state::{done_flag, State};
use glam::Vec3;
use physics::{Config, Info, Qp};

/// Go fast: any positive action accelerates the single body along +x by one
/// `dt` of velocity per step. After `n` steps of positive action,
/// `vel = n * dt` and `pos = sum(i * dt^2 for i in 1..=n)`.
#[derive(Debug)]
pub struct Fast {
    config: Config,
    episode_length: u32,
}

impl Fast {
    pub const DT: f32 = 0.02;

    #[must_use]
    pub fn new(episode_length: u32) -> Self {
        Self { config: Config::empty(Self::DT), episode_length }
    }
}

impl Env for Fast {
    fn reset(&self, rng: fastrand::Rng) -> State {
        State::initial(rng, vec![Qp::ZERO], Info::ZERO, vec![0.0, 0.0])
    }

    fn step(&self, state: &State, action: &[f32]) -> Result<State, EnvError> {
        self.check_step(state, action)?;
        let dt = self.config.dt;
        let qp = state.qp[0];
        let gain = if action[0] > 0.0 { dt } else { 0.0 };
        let vel = qp.vel + Vec3::new(gain, 0.0, 0.0);
        let pos = qp.pos + vel * dt;

        let obs = vec![pos.x, vel.x];
        self.check_obs(&obs)?;
        let steps = state.steps + 1;
        Ok(State {
            reward: pos.x,
            done: done_flag(steps, self.episode_length),
            steps,
            ..state.clone()
        }
        .with_qp(vec![qp.with_motion(vel, qp.ang).with_pose(pos, qp.rot)])
        .with_obs(obs))
    }

    fn observation_size(&self) -> usize {
        2
    }

    fn action_size(&self) -> usize {
        1
    }

    fn episode_length(&self) -> u32 {
        self.episode_length
    }

    fn config(&self) -> &Config {
        &self.config
    }
}
