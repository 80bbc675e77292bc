#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::cast_precision_loss
)]
//! # Environment contract and registry
//!
//! Simulated tasks behind a uniform `reset`/`step` interface. A task
//! produces [`State`] records that bundle generalized coordinates with the
//! observation, reward, termination flag and step counter; [`Batch`] runs
//! many independent episodes in lockstep.

pub mod batch;
pub mod env;
pub mod fast;
pub mod sphere_roll;
pub mod state;

pub use batch::Batch;
pub use env::{step_repeat, Env, EnvError};
pub use fast::Fast;
pub use sphere_roll::{PointMass, SphereRoll};
pub use state::{done_flag, split_rng, State};

/// Construct a registered environment by name.
pub fn create(name: &str, episode_length: u32) -> Result<Box<dyn Env>, EnvError> {
    match name {
        "fast" => Ok(Box::new(Fast::new(episode_length))),
        "sphere_roll" => Ok(Box::new(SphereRoll::new(episode_length))),
        other => Err(EnvError::UnknownEnv(other.to_owned())),
    }
}
