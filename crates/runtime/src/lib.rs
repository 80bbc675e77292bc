//! Training orchestration: learner selection, the metrics sink, checkpoint
//! and trajectory artifacts, and the `learner` binary's CLI.

#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss
)]

pub mod html;
pub mod metrics;
pub mod orchestrator;

pub use metrics::MetricsWriter;
pub use orchestrator::{run, setup, Report, Setup};
