// Arrangement generation: ring spacing, grid centering, curve placement and
// input validation.

use glam::Vec3;
use halo_core::arrangement::{
    bounding_box_center, center_on_origin, generate, grid_index, ArrangementSpec,
};
use halo_core::{Instance, SceneError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::{PI, TAU};

const EPS: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() <= EPS
}

fn approx_vec(a: Vec3, b: Vec3) -> bool {
    (a - b).length() <= EPS
}

fn angle_of(p: Vec3, center: Vec3) -> f32 {
    let d = p - center;
    d.y.atan2(d.x)
}

fn assert_uniform_ring(instances: &[Instance], center: Vec3) {
    let n = instances.len();
    let expected = TAU / n as f32;
    for pair in instances.windows(2) {
        let a = angle_of(pair[0].position, center);
        let b = angle_of(pair[1].position, center);
        let step = (b - a).rem_euclid(TAU);
        assert!(
            approx(step, expected),
            "n={n}: step {step} between {} and {} != {expected}",
            pair[0].index,
            pair[1].index
        );
    }
}

#[test]
fn ring_consecutive_angles_are_uniform() {
    for n in 3..=64 {
        let instances = generate(&ArrangementSpec::ring(n, 9.0)).unwrap();
        assert_eq!(instances.len(), n);
        assert_uniform_ring(&instances, Vec3::ZERO);
    }
}

#[test]
fn ellipse_angles_are_uniform_around_center() {
    let center = Vec3::new(2.0, -1.0, 0.5);
    let spec = ArrangementSpec::ellipse(12, 4.0, 4.0, center);
    let instances = generate(&spec).unwrap();
    assert_uniform_ring(&instances, center);
    for inst in &instances {
        assert!(approx(inst.position.z, center.z));
        assert!(approx((inst.position - center).length(), 4.0));
    }
}

#[test]
fn ring_scenario_index_five_is_a_quarter_turn() {
    let instances = generate(&ArrangementSpec::ring(20, 9.0)).unwrap();
    let angle = 5.0 * TAU / 20.0;
    let expected = Vec3::new(9.0 * angle.cos(), 9.0 * angle.sin(), 0.0);
    assert!(approx_vec(instances[5].position, expected));
    assert!(approx_vec(instances[5].position, Vec3::new(0.0, 9.0, 0.0)));
}

#[test]
fn instances_keep_generation_index_and_identity_transform() {
    let instances = generate(&ArrangementSpec::curve(10, 0.5, 3.0)).unwrap();
    for (i, inst) in instances.iter().enumerate() {
        assert_eq!(inst.index, i);
        assert_eq!(inst.rotation, Vec3::ZERO);
        assert_eq!(inst.scale, Vec3::ONE);
    }
}

#[test]
fn grid_mean_is_origin_after_centering() {
    for side in [1usize, 2, 4] {
        let instances = generate(&ArrangementSpec::grid3d(side, 0.4)).unwrap();
        assert_eq!(instances.len(), side * side * side);
        let sum: Vec3 = instances.iter().map(|i| i.position).sum();
        let mean = sum / instances.len() as f32;
        assert!(approx_vec(mean, Vec3::ZERO), "side {side}: mean {mean}");
    }
}

#[test]
fn grid_scenario_last_cell_before_and_after_centering() {
    let instances = generate(&ArrangementSpec::grid3d(4, 0.4)).unwrap();
    assert_eq!(instances.len(), 64);

    let idx = grid_index(4, 3, 3, 3);
    assert_eq!(idx, 63);
    // Before centering the bounding box runs from 0 to 1.2 on each axis, so
    // the shift applied is half of that.
    let shift = Vec3::splat(0.6);
    assert!(approx_vec(instances[idx].position + shift, Vec3::splat(1.2)));
    assert!(approx_vec(instances[0].position + shift, Vec3::ZERO));

    let center = bounding_box_center(&instances).unwrap();
    assert!(approx_vec(center, Vec3::ZERO));
}

#[test]
fn grid_index_order_is_i_then_j_then_k() {
    let instances = generate(&ArrangementSpec::grid3d(3, 1.0)).unwrap();
    // (0, 0, 1) is the second generated cell; it differs from the first on z only.
    let d = instances[grid_index(3, 0, 0, 1)].position - instances[0].position;
    assert!(approx_vec(d, Vec3::new(0.0, 0.0, 1.0)));
    let d = instances[grid_index(3, 1, 0, 0)].position - instances[0].position;
    assert!(approx_vec(d, Vec3::new(1.0, 0.0, 0.0)));
}

#[test]
fn center_on_origin_handles_empty_and_single() {
    let mut empty: Vec<Instance> = Vec::new();
    center_on_origin(&mut empty);
    assert!(bounding_box_center(&empty).is_none());

    let mut one = vec![Instance::at(0, Vec3::new(3.0, 4.0, 5.0))];
    center_on_origin(&mut one);
    assert!(approx_vec(one[0].position, Vec3::ZERO));
}

#[test]
fn curve_places_instances_along_x_with_sine_offset() {
    let instances = generate(&ArrangementSpec::curve(40, 0.5, 3.0)).unwrap();
    for inst in &instances {
        let i = inst.index;
        let phase = (i * 40) as f32 / PI * 2.0;
        assert!(approx(inst.position.x, 0.5 * i as f32));
        assert!(approx(inst.position.y, phase.sin() * 3.0));
        assert!(approx(inst.position.z, 0.0));
    }
}

#[test]
fn curve_accepts_custom_phase() {
    fn linear_phase(i: usize, n: usize) -> f32 {
        i as f32 * TAU / n as f32
    }
    let spec = ArrangementSpec::curve_with_phase(8, 1.0, 2.0, linear_phase);
    let instances = generate(&spec).unwrap();
    assert!(approx(instances[2].position.y, 2.0));
    assert!(approx(instances[6].position.y, -2.0));
}

#[test]
fn generation_is_deterministic_for_random_specs() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..50 {
        let spec = match rng.gen_range(0..3) {
            0 => ArrangementSpec::ring(rng.gen_range(1..200), rng.gen_range(0.1..50.0)),
            1 => ArrangementSpec::grid3d(rng.gen_range(1..8), rng.gen_range(0.05..3.0)),
            _ => ArrangementSpec::curve(
                rng.gen_range(1..200),
                rng.gen_range(0.1..5.0),
                rng.gen_range(0.1..10.0),
            ),
        };
        let a = generate(&spec).unwrap();
        let b = generate(&spec).unwrap();
        assert_eq!(a.len(), spec.count());
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.index, y.index);
            assert!(approx_vec(x.position, y.position));
        }
    }
}

#[test]
fn invalid_specs_fail_before_generation() {
    let bad = [
        ArrangementSpec::ring(0, 9.0),
        ArrangementSpec::ring(5, 0.0),
        ArrangementSpec::ring(5, -1.0),
        ArrangementSpec::ellipse(5, 1.0, f32::NAN, Vec3::ZERO),
        ArrangementSpec::ellipse(5, 1.0, 1.0, Vec3::new(f32::INFINITY, 0.0, 0.0)),
        ArrangementSpec::grid3d(0, 0.4),
        ArrangementSpec::grid3d(4, 0.0),
        ArrangementSpec::curve(0, 0.5, 3.0),
        ArrangementSpec::curve(10, 0.5, -3.0),
    ];
    for spec in bad {
        match generate(&spec) {
            Err(SceneError::InvalidSpec(msg)) => assert!(!msg.is_empty()),
            other => panic!("expected InvalidSpec for {spec:?}, got {other:?}"),
        }
    }
}

#[test]
fn with_count_replaces_count_or_side() {
    assert_eq!(ArrangementSpec::ring(20, 9.0).with_count(7).count(), 7);
    assert_eq!(ArrangementSpec::curve(40, 0.5, 3.0).with_count(3).count(), 3);
    let grid = ArrangementSpec::grid3d(4, 0.4).with_count(3);
    assert_eq!(grid.count(), 27);
    assert_eq!(grid.grid_dims(), Some([3, 3, 3]));
    assert_eq!(ArrangementSpec::ring(4, 1.0).grid_dims(), None);
}
