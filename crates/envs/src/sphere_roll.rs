//! Roll a unit-mass body along +x by applying a bounded force.

use crate::env::{Env, EnvError};
use crate::state::{done_flag, State};
use glam::Vec3;
use physics::{Body, Config, Info, Qp, Stepper};

const MAX_FORCE: f32 = 10.0;

/// Semi-implicit Euler integration of a unit-mass body under a single force
/// along x. Auxiliary forces pass through unchanged.
#[derive(Debug)]
pub struct PointMass;

impl Stepper for PointMass {
    fn step(&self, qp: &[Qp], info: &Info, action: &[f32], dt: f32) -> (Vec<Qp>, Info) {
        let next = qp
            .iter()
            .map(|qp| {
                let vel = qp.vel + Vec3::new(action[0] * dt, 0.0, 0.0);
                Qp { pos: qp.pos + vel * dt, vel, ..*qp }
            })
            .collect();
        (next, *info)
    }
}

/// The agent pushes a single body and is rewarded for forward progress.
#[derive(Debug)]
pub struct SphereRoll {
    config: Config,
    stepper: PointMass,
    episode_length: u32,
}

impl SphereRoll {
    pub const DT: f32 = 0.02;

    #[must_use]
    pub fn new(episode_length: u32) -> Self {
        let mut config = Config::empty(Self::DT);
        config.bodies.push(Body { name: "sphere".into() });
        Self { config, stepper: PointMass, episode_length }
    }
}

impl Env for SphereRoll {
    fn reset(&self, rng: fastrand::Rng) -> State {
        State::initial(rng, vec![Qp::ZERO], Info::ZERO, vec![0.0, 0.0])
    }

    fn step(&self, state: &State, action: &[f32]) -> Result<State, EnvError> {
        self.check_step(state, action)?;
        let force = action[0].clamp(-MAX_FORCE, MAX_FORCE);
        let (qp, info) = self.stepper.step(&state.qp, &state.info, &[force], self.config.dt);
        let pos = qp[0].pos;
        let reward = pos.x - state.qp[0].pos.x;

        let obs = vec![pos.x, qp[0].vel.x];
        self.check_obs(&obs)?;
        let steps = state.steps + 1;
        Ok(State {
            info,
            reward,
            done: done_flag(steps, self.episode_length),
            steps,
            ..state.clone()
        }
        .with_qp(qp)
        .with_obs(obs)
        .with_metric("distance", pos.x))
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
