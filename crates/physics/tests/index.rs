use physics::{
    joint_values, resolve, ActuatorDef, AngleLimit, AngleVel, Body, Config, EntityInfo,
    EntityType, JointDef, JointInfo, PhysicsError,
};

fn limits(n: usize) -> Vec<AngleLimit> {
    vec![AngleLimit { min: -45.0, max: 45.0 }; n]
}

fn scene() -> Config {
    Config {
        dt: 0.02,
        bodies: vec![
            Body { name: "a".into() },
            Body { name: "b".into() },
            Body { name: "c".into() },
        ],
        joints: vec![
            JointDef { name: "hinge_0".into(), angle_limit: limits(1) },
            JointDef { name: "ball_0".into(), angle_limit: limits(3) },
            JointDef { name: "hinge_1".into(), angle_limit: limits(1) },
            JointDef { name: "universal_0".into(), angle_limit: limits(2) },
            JointDef { name: "hinge_2".into(), angle_limit: limits(1) },
        ],
        actuators: vec![
            ActuatorDef { name: "act_hinge_0".into(), joint: "hinge_0".into() },
            ActuatorDef { name: "act_ball_0".into(), joint: "ball_0".into() },
            ActuatorDef { name: "act_universal_0".into(), joint: "universal_0".into() },
        ],
    }
}

#[test]
fn body_selection_preserves_request_order_and_entity_order_mask() {
    let config = scene();
    let selection = resolve(&config, &["a", "c"], EntityType::Body).unwrap();
    assert_eq!(selection.indices, vec![0, 2]);
    assert_eq!(selection.mask, vec![true, false, true]);
    assert!(selection.info.is_empty());

    // Request order flips; the mask does not.
    let selection = resolve(&config, &["c", "a"], EntityType::Body).unwrap();
    assert_eq!(selection.indices, vec![2, 0]);
    assert_eq!(selection.mask, vec![true, false, true]);
}

#[test]
fn mask_length_always_matches_entity_count() {
    let config = scene();
    for names in [&[][..], &["b"][..], &["a", "b", "c"][..]] {
        let selection = resolve(&config, names, EntityType::Body).unwrap();
        assert_eq!(selection.mask.len(), config.bodies.len());
        assert_eq!(selection.mask.iter().filter(|m| **m).count(), names.len());
    }
}

#[test]
fn joint_indices_count_all_joints_per_dof_class() {
    let config = scene();
    // Only two names requested, but counters must have advanced across all
    // five configured joints.
    let selection = resolve(&config, &["hinge_2", "universal_0"], EntityType::Joint).unwrap();
    assert_eq!(selection.indices, vec![4, 3]);
    assert_eq!(
        selection.info,
        vec![
            ("hinge_2".to_owned(), EntityInfo::Joint(JointInfo { dof: 1, index: 2 })),
            ("universal_0".to_owned(), EntityInfo::Joint(JointInfo { dof: 2, index: 0 })),
        ]
    );
}

#[test]
fn within_class_indices_are_a_gapless_permutation() {
    let config = scene();
    let all: Vec<&str> = config.joints.iter().map(|j| j.name.as_str()).collect();
    let selection = resolve(&config, &all, EntityType::Joint).unwrap();

    let mut per_class: [Vec<usize>; 3] = Default::default();
    for (_, info) in &selection.info {
        let EntityInfo::Joint(JointInfo { dof, index }) = info else {
            panic!("joint selection must carry joint info");
        };
        per_class[usize::from(*dof) - 1].push(*index);
    }
    for mut indices in per_class {
        indices.sort_unstable();
        assert_eq!(indices, (0..indices.len()).collect::<Vec<_>>());
    }
}

#[test]
fn actuator_info_is_flat_parameter_offset() {
    let config = scene();
    let selection =
        resolve(&config, &["act_universal_0", "act_hinge_0"], EntityType::Actuator).unwrap();
    assert_eq!(selection.indices, vec![2, 0]);
    assert_eq!(
        selection.info,
        vec![
            ("act_universal_0".to_owned(), EntityInfo::Actuator { offset: 4 }),
            ("act_hinge_0".to_owned(), EntityInfo::Actuator { offset: 0 }),
        ]
    );
}

#[test]
fn unknown_name_is_a_strict_error() {
    let config = scene();
    let err = resolve(&config, &["a", "ghost"], EntityType::Body).unwrap_err();
    assert_eq!(
        err,
        PhysicsError::UnknownEntity { datatype: EntityType::Body, name: "ghost".into() }
    );
}

#[test]
fn joint_value_gather_follows_listed_order() {
    let config = scene();
    let selection = resolve(&config, &["ball_0", "hinge_1"], EntityType::Joint).unwrap();

    // Class 1 holds three hinges, class 3 one ball joint.
    let per_class = [
        AngleVel {
            angles: vec![vec![0.1, 0.2, 0.3]],
            vels: vec![vec![1.0, 2.0, 3.0]],
        },
        AngleVel::default(),
        AngleVel {
            angles: vec![vec![0.4], vec![0.5], vec![0.6]],
            vels: vec![vec![4.0], vec![5.0], vec![6.0]],
        },
    ];
    let values = joint_values(&per_class, &selection.info).unwrap();
    assert_eq!(
        values,
        vec![
            ("joint_pos:ball_0".to_owned(), vec![0.4, 0.5, 0.6]),
            ("joint_vel:ball_0".to_owned(), vec![4.0, 5.0, 6.0]),
            ("joint_pos:hinge_1".to_owned(), vec![0.2]),
            ("joint_vel:hinge_1".to_owned(), vec![2.0]),
        ]
    );
}

#[test]
fn joint_value_gather_rejects_out_of_range_index() {
    let per_class = [
        AngleVel { angles: vec![vec![0.1]], vels: vec![vec![1.0]] },
        AngleVel::default(),
        AngleVel::default(),
    ];
    let info = vec![(
        "hinge_9".to_owned(),
        EntityInfo::Joint(JointInfo { dof: 1, index: 5 }),
    )];
    let err = joint_values(&per_class, &info).unwrap_err();
    assert_eq!(err, PhysicsError::JointIndex { index: 5, dof: 1, len: 1 });
}
