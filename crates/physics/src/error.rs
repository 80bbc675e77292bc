use crate::index::EntityType;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhysicsError {
    /// Mask and batch lengths disagree; the kernel never truncates.
    #[error("mask length {mask} does not match qp batch length {batch}")]
    MaskShape { mask: usize, batch: usize },
    /// A requested name is absent from the configuration.
    #[error("unknown {datatype} entity: {name}")]
    UnknownEntity { datatype: EntityType, name: String },
    /// A joint declares more angle-limit axes than any supported DOF class.
    #[error("joint {name} has {axes} angle limits, at most 3 supported")]
    UnsupportedDof { name: String, axes: usize },
    /// Gather index out of range for the per-class angle/velocity arrays.
    #[error("joint index {index} out of range for dof class {dof} (class holds {len})")]
    JointIndex { index: usize, dof: u8, len: usize },
}
