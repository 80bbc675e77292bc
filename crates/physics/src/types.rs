//! Core state records shared by every simulation instance.

use glam::{Quat, Vec3};

/// Generalized coordinates of one rigid body: pose plus motion.
///
/// A `Qp` is a value type. Simulation steps and kernels always build a fresh
/// record rather than mutating in place, so earlier values stay valid for
/// gradient computation. Invariant: `rot` is a unit quaternion.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Qp {
    pub pos: Vec3,
    pub vel: Vec3,
    pub rot: Quat,
    pub ang: Vec3,
}

impl Qp {
    /// A body at the origin, at rest, with identity orientation.
    pub const ZERO: Self = Self {
        pos: Vec3::ZERO,
        vel: Vec3::ZERO,
        rot: Quat::IDENTITY,
        ang: Vec3::ZERO,
    };

    #[must_use]
    pub const fn new(pos: Vec3, vel: Vec3, rot: Quat, ang: Vec3) -> Self {
        Self { pos, vel, rot, ang }
    }

    /// Replace only the pose fields, keeping motion untouched.
    #[must_use]
    pub fn with_pose(self, pos: Vec3, rot: Quat) -> Self {
        Self { pos, rot, ..self }
    }

    /// Replace only the motion fields, keeping pose untouched.
    #[must_use]
    pub fn with_motion(self, vel: Vec3, ang: Vec3) -> Self {
        Self { vel, ang, ..self }
    }
}

impl Default for Qp {
    fn default() -> Self {
        Self::ZERO
    }
}

/// A linear/angular force-or-impulse pair.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct P {
    pub vel: Vec3,
    pub ang: Vec3,
}

impl P {
    pub const ZERO: Self = Self { vel: Vec3::ZERO, ang: Vec3::ZERO };
}

/// Auxiliary forces reported by the stepping collaborator.
///
/// Consumed read-only when environments build observations.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Info {
    pub contact: P,
    pub joint: P,
    pub actuator: P,
}

impl Info {
    pub const ZERO: Self = Self { contact: P::ZERO, joint: P::ZERO, actuator: P::ZERO };
}

/// The opaque physics engine boundary.
///
/// Implementations must be deterministic: identical inputs produce
/// bit-identical outputs, so a step can be safely re-executed.
pub trait Stepper {
    fn step(&self, qp: &[Qp], info: &Info, action: &[f32], dt: f32) -> (Vec<Qp>, Info);
}
