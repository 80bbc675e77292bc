//! Gathering joint angles and velocities out of solver output.

use crate::error::PhysicsError;
use crate::index::{EntityInfo, JointInfo};

/// Solver output for one DOF class: one angle array and one angular-velocity
/// array per motion axis, each indexed by the joint's position within the
/// class.
#[derive(Debug, Clone, Default)]
pub struct AngleVel {
    pub angles: Vec<Vec<f32>>,
    pub vels: Vec<Vec<f32>>,
}

/// One gathered joint reading: the per-axis values for a single joint.
pub type JointValues = Vec<(String, Vec<f32>)>;

/// Gather per-joint readings into `"joint_pos:<name>"` / `"joint_vel:<name>"`
/// entries, preserving the order joints were listed.
///
/// `per_class[c]` holds the class `c + 1` solver output. This is a pure
/// gather: no kinematics are recomputed here.
pub fn joint_values(
    per_class: &[AngleVel; 3],
    joints: &[(String, EntityInfo)],
) -> Result<JointValues, PhysicsError> {
    let mut values = Vec::with_capacity(joints.len() * 2);
    for (name, info) in joints {
        let EntityInfo::Joint(JointInfo { dof, index }) = info else {
            continue;
        };
        let class = &per_class[usize::from(*dof) - 1];
        for (kind, axes) in [("pos", &class.angles), ("vel", &class.vels)] {
            let mut gathered = Vec::with_capacity(axes.len());
            for axis in axes {
                let value = axis.get(*index).ok_or(PhysicsError::JointIndex {
                    index: *index,
                    dof: *dof,
                    len: axis.len(),
                })?;
                gathered.push(*value);
            }
            values.push((format!("joint_{kind}:{name}"), gathered));
        }
    }
    Ok(values)
}
