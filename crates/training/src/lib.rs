#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::cast_precision_loss,
    clippy::cast_possible_wrap,
    clippy::similar_names
)]
//! # Learners behind a uniform contract
//!
//! Four training algorithms (clipped policy gradient, antithetic evolution
//! strategy, direct policy gradient through the stepping function, and
//! off-policy actor-critic) all exposing the same `setup`/`learn` shape so
//! the orchestrator never branches on which one is running. The shared
//! toolkit (tanh MLP with manual backprop, Adam, replay, checkpointing)
//! lives alongside them.

pub mod algorithm;
pub mod apg;
pub mod config;
pub mod error;
pub mod es;
pub mod model;
pub mod nn;
pub mod optim;
pub mod policy;
pub mod ppo;
pub mod replay;
mod rollout;
pub mod sac;

pub use algorithm::{learn, Algorithm, LearnArgs, Progress, Trained};
pub use config::TrainConfig;
pub use error::TrainError;
pub use nn::{Mlp, Normalizer};
pub use optim::Adam;
pub use policy::{CompiledPolicy, Params, Policy};
pub use replay::{Replay, Transition};
