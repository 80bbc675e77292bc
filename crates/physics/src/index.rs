//! Name-to-index resolution for bodies, joints and actuators.
//!
//! Solver output is ordered by declaration, so selection masks and per-joint
//! DOF indices must follow configuration order even when the caller requests
//! names in some other order.

use crate::config::{dof_class, Config};
use crate::error::PhysicsError;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Body,
    Joint,
    Actuator,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Body => f.write_str("body"),
            Self::Joint => f.write_str("joint"),
            Self::Actuator => f.write_str("actuator"),
        }
    }
}

/// Placement of one joint in the solver's per-class output arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointInfo {
    /// DOF class, 1..=3.
    pub dof: u8,
    /// Position among all joints of that class, in declaration order.
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityInfo {
    Joint(JointInfo),
    /// Flat offset into the actuator parameter vector.
    Actuator { offset: usize },
}

/// Result of resolving a list of requested names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Dense entity index per requested name, in request order.
    pub indices: Vec<usize>,
    /// Per-name metadata in request order; empty for bodies.
    pub info: Vec<(String, EntityInfo)>,
    /// One flag per configured entity, in declaration order.
    pub mask: Vec<bool>,
}

/// Resolve `names` against the entities of `datatype` in `config`.
///
/// Joint DOF counters advance over every configured joint, requested or not,
/// so `JointInfo::index` stays consistent with solver output order. Lookup is
/// strict: a name missing from the configuration is an error rather than a
/// silently dropped entry.
pub fn resolve(
    config: &Config,
    names: &[&str],
    datatype: EntityType,
) -> Result<Selection, PhysicsError> {
    let entity_names: Vec<&str> = match datatype {
        EntityType::Body => config.bodies.iter().map(|b| b.name.as_str()).collect(),
        EntityType::Joint => config.joints.iter().map(|j| j.name.as_str()).collect(),
        EntityType::Actuator => config.actuators.iter().map(|a| a.name.as_str()).collect(),
    };

    for name in names {
        if !entity_names.contains(name) {
            return Err(PhysicsError::UnknownEntity {
                datatype,
                name: (*name).to_owned(),
            });
        }
    }

    let mut by_name: HashMap<&str, (usize, Option<EntityInfo>)> = HashMap::new();
    let mut mask = Vec::with_capacity(entity_names.len());
    // One running counter per DOF class.
    let mut joint_counters = [0usize; 3];

    for (i, entity) in entity_names.iter().enumerate() {
        let requested = names.contains(entity);
        mask.push(requested);
        let info = match datatype {
            EntityType::Body => None,
            EntityType::Joint => {
                let dof = dof_class(&config.joints[i])?;
                let index = joint_counters[usize::from(dof) - 1];
                joint_counters[usize::from(dof) - 1] += 1;
                requested.then_some(EntityInfo::Joint(JointInfo { dof, index }))
            }
            EntityType::Actuator => {
                if requested {
                    Some(EntityInfo::Actuator { offset: config.actuator_offset(entity)? })
                } else {
                    None
                }
            }
        };
        if requested {
            by_name.insert(*entity, (i, info));
        }
    }

    let mut indices = Vec::with_capacity(names.len());
    let mut info = Vec::with_capacity(names.len());
    for name in names {
        let (index, entity_info) = &by_name[name];
        indices.push(*index);
        if let Some(entity_info) = entity_info {
            info.push(((*name).to_owned(), *entity_info));
        }
    }

    Ok(Selection { indices, info, mask })
}
