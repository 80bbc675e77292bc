//! Batched pose transform with per-entry masking.
//!
//! This is the hot kernel of scene editing: rotate a subset of bodies about a
//! pivot, then translate them, in one pass over the batch axis. Entries are
//! independent, so the map can run elementwise-parallel on any backend.

use crate::error::PhysicsError;
use crate::types::Qp;
use glam::{Quat, Vec3};

/// Rotate masked entries of a QP batch about `pivot` and translate by `offset`.
///
/// For entries where `mask` is true:
///
/// ```text
/// pos' = rot * (pos - pivot) + pivot + offset
/// rot' = normalize(rot * rot_old)
/// ```
///
/// Unmasked entries pass through bit-identical. Velocity and angular velocity
/// are never touched; only pose is transformed. An identity `rot` reduces to a
/// pure translation of the masked entries.
pub fn transform_qp(
    qps: &[Qp],
    mask: &[bool],
    rot: Quat,
    pivot: Vec3,
    offset: Vec3,
) -> Result<Vec<Qp>, PhysicsError> {
    if mask.len() != qps.len() {
        return Err(PhysicsError::MaskShape { mask: mask.len(), batch: qps.len() });
    }
    Ok(qps
        .iter()
        .zip(mask)
        .map(|(qp, &selected)| {
            if selected {
                let pos = rot * (qp.pos - pivot) + pivot + offset;
                // Renormalize to hold the unit-quaternion invariant under
                // repeated composition.
                qp.with_pose(pos, (rot * qp.rot).normalize())
            } else {
                *qp
            }
        })
        .collect())
}
