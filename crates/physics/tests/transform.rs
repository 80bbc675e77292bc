use glam::{Quat, Vec3};
use physics::{transform_qp, Qp};

fn batch(n: usize) -> Vec<Qp> {
    (0..n)
        .map(|i| {
            let i = i as f32;
            Qp::new(
                Vec3::new(1.0 + i, -2.0 * i, 0.5 * i),
                Vec3::new(i, 0.0, 1.0),
                Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), 0.2 * i).normalize(),
                Vec3::new(0.0, 0.1 * i, 0.0),
            )
        })
        .collect()
}

#[test]
fn round_trip_recovers_positions() {
    let qps = batch(6);
    let mask = vec![true; qps.len()];
    let rot = Quat::from_axis_angle(Vec3::new(1.0, 1.0, 0.0).normalize(), 0.7);
    let pivot = Vec3::new(0.5, -1.0, 2.0);
    let offset = Vec3::new(3.0, 0.0, -1.0);

    let forward = transform_qp(&qps, &mask, rot, pivot, offset).unwrap();
    // Undo: translate back first, then apply the inverse rotation about the
    // same pivot.
    let back = transform_qp(&forward, &mask, Quat::IDENTITY, Vec3::ZERO, -offset).unwrap();
    let back = transform_qp(&back, &mask, rot.inverse(), pivot, Vec3::ZERO).unwrap();

    for (original, recovered) in qps.iter().zip(&back) {
        assert!(
            (original.pos - recovered.pos).length() < 1e-5,
            "pos {:?} vs {:?}",
            original.pos,
            recovered.pos
        );
    }
}

#[test]
fn partial_mask_leaves_unselected_entries_untouched() {
    let qps = batch(5);
    let mask = vec![true, false, true, false, false];
    let rot = Quat::from_rotation_x(1.1);
    let out = transform_qp(&qps, &mask, rot, Vec3::ZERO, Vec3::new(0.0, 5.0, 0.0)).unwrap();
    for i in [1, 3, 4] {
        assert_eq!(out[i], qps[i]);
    }
    for i in [0, 2] {
        assert_ne!(out[i].pos, qps[i].pos);
    }
}

#[test]
fn motion_is_never_transformed() {
    let qps = batch(4);
    let mask = vec![true; 4];
    let rot = Quat::from_rotation_z(0.9);
    let out = transform_qp(&qps, &mask, rot, Vec3::ONE, Vec3::ONE).unwrap();
    for (before, after) in qps.iter().zip(&out) {
        assert_eq!(before.vel, after.vel);
        assert_eq!(before.ang, after.ang);
    }
}

#[test]
fn composed_rotation_stays_normalized() {
    let mut qps = batch(3);
    let mask = vec![true; 3];
    let rot = Quat::from_rotation_y(0.37);
    for _ in 0..200 {
        qps = transform_qp(&qps, &mask, rot, Vec3::ZERO, Vec3::ZERO).unwrap();
    }
    for qp in &qps {
        assert!((qp.rot.length() - 1.0).abs() < 1e-5);
    }
}
