//! Simulation configuration: the bodies, joints and actuators of a scene.

use crate::error::PhysicsError;
use crate::index::EntityType;
use serde::Deserialize;

/// Angular limit of one joint axis, in degrees.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct AngleLimit {
    pub min: f32,
    pub max: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Body {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JointDef {
    pub name: String,
    /// One entry per constrained axis; the length fixes the DOF class.
    #[serde(default)]
    pub angle_limit: Vec<AngleLimit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActuatorDef {
    pub name: String,
    /// Name of the joint this actuator drives.
    pub joint: String,
}

/// Immutable scene description, built once and passed by reference.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub dt: f32,
    #[serde(default)]
    pub bodies: Vec<Body>,
    #[serde(default)]
    pub joints: Vec<JointDef>,
    #[serde(default)]
    pub actuators: Vec<ActuatorDef>,
}

impl Config {
    /// A scene with no entities, only a timestep. Enough for unit-test envs.
    #[must_use]
    pub fn empty(dt: f32) -> Self {
        Self { dt, bodies: Vec::new(), joints: Vec::new(), actuators: Vec::new() }
    }

    #[must_use]
    pub fn joint(&self, name: &str) -> Option<&JointDef> {
        self.joints.iter().find(|j| j.name == name)
    }

    /// Flat offset of an actuator into the actuator parameter vector.
    ///
    /// Actuator parameters are laid out in declaration order, one slot per
    /// DOF of the driven joint, so the offset is the DOF sum of all
    /// preceding actuators.
    pub fn actuator_offset(&self, name: &str) -> Result<usize, PhysicsError> {
        let mut offset = 0;
        for act in &self.actuators {
            let joint = self.joint(&act.joint).ok_or_else(|| PhysicsError::UnknownEntity {
                datatype: EntityType::Joint,
                name: act.joint.clone(),
            })?;
            if act.name == name {
                return Ok(offset);
            }
            offset += usize::from(dof_class(joint)?);
        }
        Err(PhysicsError::UnknownEntity { datatype: EntityType::Actuator, name: name.to_owned() })
    }
}

/// DOF class of a joint from its angle-limit count.
///
/// An unlimited (empty) list still describes a single-axis joint, which is
/// why both 0 and 1 map to class 1.
pub fn dof_class(joint: &JointDef) -> Result<u8, PhysicsError> {
    match joint.angle_limit.len() {
        0 | 1 => Ok(1),
        2 => Ok(2),
        3 => Ok(3),
        axes => Err(PhysicsError::UnsupportedDof { name: joint.name.clone(), axes }),
    }
}
