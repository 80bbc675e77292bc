#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::cast_precision_loss
)]
//! # Batched rigid-body state model
//!
//! The simulation side of the training substrate: generalized-coordinate
//! records ([`Qp`], [`Info`]), the masked batch transform kernel
//! ([`transform_qp`]), name-to-index resolution over a scene [`Config`]
//! ([`resolve`]) and the joint-value gather ([`joint_values`]).
//!
//! Everything here is value-oriented: records are never mutated after
//! construction, and the batch kernels are pure elementwise maps with no
//! dependence between batch entries. The constraint solver itself stays
//! behind the [`Stepper`] seam.

pub mod config;
pub mod error;
pub mod index;
pub mod joints;
pub mod transform;
pub mod types;

pub use config::{dof_class, ActuatorDef, AngleLimit, Body, Config, JointDef};
pub use error::PhysicsError;
pub use index::{resolve, EntityInfo, EntityType, JointInfo, Selection};
pub use joints::{joint_values, AngleVel, JointValues};
pub use transform::transform_qp;
pub use types::{Info, Qp, Stepper, P};
