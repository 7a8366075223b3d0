// Camera rig, orbit damping and viewport resize handling.

use glam::Vec3;
use halo_core::camera::{drag_to_angles, CameraConfig, CameraRig, OrbitControls};
use halo_core::config::SceneConfig;
use halo_core::constants::{ORBIT_ELEVATION_LIMIT, ORBIT_MAX_DISTANCE, ORBIT_MIN_DISTANCE};
use halo_core::stage::Stage;
use halo_core::viewport::{clamp_pixel_scale, ViewportManager};
use std::f32::consts::{FRAC_PI_2, TAU};

const EPS: f32 = 1e-4;

#[test]
fn resize_sets_aspect_and_clamps_pixel_scale() {
    let mut stage = Stage::new(&SceneConfig::default(), 1024, 768, 1.0).unwrap();
    let vp = stage.on_resize(800, 600, 3.0);
    assert_eq!((vp.width, vp.height), (800, 600));
    assert_eq!(vp.pixel_scale, 2.0);
    assert!((stage.rig().camera().aspect - 800.0 / 600.0).abs() <= EPS);
    assert_eq!(vp.physical_size(), (1600, 1200));
}

#[test]
fn lower_pixel_scales_pass_through() {
    let mut manager = ViewportManager::new(100, 100, 1.0);
    assert_eq!(manager.on_resize(100, 100, 1.5).pixel_scale, 1.5);
    assert_eq!(manager.on_resize(100, 100, 0.0).pixel_scale, 1.0);
    assert_eq!(clamp_pixel_scale(f32::NAN, 2.0), 1.0);
    assert_eq!(clamp_pixel_scale(2.5, 2.0), 2.0);
}

#[test]
fn zero_sized_resize_keeps_a_valid_viewport() {
    let mut manager = ViewportManager::new(640, 480, 1.0);
    let vp = manager.on_resize(0, 0, 1.0);
    assert_eq!((vp.width, vp.height), (1, 1));
    assert!(vp.aspect().is_finite());
}

#[test]
fn last_resize_in_a_burst_wins() {
    let mut stage = Stage::new(&SceneConfig::default(), 640, 480, 1.0).unwrap();
    for (w, h) in [(700, 500), (900, 300), (1200, 600)] {
        stage.on_resize(w, h, 1.0);
    }
    assert_eq!(stage.viewport().width, 1200);
    assert!((stage.rig().camera().aspect - 2.0).abs() <= EPS);
}

#[test]
fn max_pixel_scale_comes_from_config() {
    let config = SceneConfig {
        max_pixel_scale: 1.25,
        ..SceneConfig::default()
    };
    let stage = Stage::new(&config, 400, 400, 3.0).unwrap();
    assert_eq!(stage.viewport().pixel_scale, 1.25);
}

#[test]
fn rig_starts_on_positive_z() {
    let config = CameraConfig::default();
    let rig = CameraRig::new(&config, 1.5);
    let cam = rig.camera();
    assert!((cam.eye - Vec3::new(0.0, 0.0, config.distance)).length() <= EPS);
    assert_eq!(cam.target, Vec3::ZERO);
    assert!((cam.fovy_radians - 45f32.to_radians()).abs() <= EPS);
    assert_eq!((cam.znear, cam.zfar), (1.0, 100.0));
}

#[test]
fn damping_approaches_target_exponentially() {
    let mut controls = OrbitControls::new(Vec3::ZERO, &CameraConfig::default());
    controls.rotate(1.0, 0.0);
    controls.update();
    assert!((controls.azimuth - 0.05).abs() <= EPS);

    let mut remaining = 0.95_f32;
    for _ in 0..30 {
        controls.update();
        remaining *= 0.95;
        assert!((1.0 - controls.azimuth - remaining).abs() <= 1e-3);
    }
    for _ in 0..300 {
        controls.update();
    }
    assert!((controls.azimuth - 1.0).abs() <= 1e-3);
}

#[test]
fn damping_disabled_snaps_to_target() {
    let mut controls = OrbitControls::new(Vec3::ZERO, &CameraConfig::default());
    controls.damping_enabled = false;
    controls.rotate(0.5, 0.25);
    controls.update();
    assert_eq!((controls.azimuth, controls.elevation), (0.5, 0.25));
}

#[test]
fn elevation_is_clamped_short_of_the_poles() {
    let mut controls = OrbitControls::new(Vec3::ZERO, &CameraConfig::default());
    controls.rotate(0.0, 10.0);
    assert_eq!(controls.target_angles().1, ORBIT_ELEVATION_LIMIT);
    controls.rotate(0.0, -100.0);
    assert_eq!(controls.target_angles().1, -ORBIT_ELEVATION_LIMIT);
    assert!(ORBIT_ELEVATION_LIMIT < FRAC_PI_2);
}

#[test]
fn zoom_moves_out_for_positive_steps_and_clamps() {
    let config = CameraConfig::default();
    let mut controls = OrbitControls::new(Vec3::ZERO, &config);
    controls.zoom(1.0);
    assert!(controls.target_distance() > config.distance);
    controls.zoom(-2.0);
    assert!(controls.target_distance() < config.distance);

    controls.zoom(1000.0);
    assert_eq!(controls.target_distance(), ORBIT_MAX_DISTANCE);
    controls.zoom(-1000.0);
    assert_eq!(controls.target_distance(), ORBIT_MIN_DISTANCE);
}

#[test]
fn zoom_can_be_disabled() {
    let config = CameraConfig::default();
    let mut controls = OrbitControls::new(Vec3::ZERO, &config);
    controls.zoom_enabled = false;
    controls.zoom(5.0);
    assert_eq!(controls.target_distance(), config.distance);
}

#[test]
fn drag_across_full_height_is_a_full_turn() {
    let (az, el) = drag_to_angles(600.0, 0.0, 600);
    assert!((az + TAU).abs() <= EPS);
    assert_eq!(el, 0.0);
    let (_, el) = drag_to_angles(0.0, 150.0, 600);
    assert!((el - TAU / 4.0).abs() <= EPS);
}

#[test]
fn stage_drag_moves_the_eye_after_integration() {
    let mut stage = Stage::new(&SceneConfig::default(), 800, 600, 1.0).unwrap();
    let before = stage.rig().camera().eye;
    stage.on_drag(150.0, 0.0);
    let (az, _) = stage.rig().controls().target_angles();
    assert!((az + TAU / 4.0).abs() <= EPS);
    // Target only; the eye moves on integrate.
    assert_eq!(stage.rig().camera().eye, before);

    stage.rig_mut().integrate();
    let eye = stage.rig().camera().eye;
    assert!((eye - before).length() > EPS);
    assert!((eye.length() - before.length()).abs() <= 1e-2);
}

#[test]
fn view_projection_maps_target_to_screen_center() {
    let rig = CameraRig::new(&CameraConfig::default(), 4.0 / 3.0);
    let clip = rig.camera().view_projection() * Vec3::ZERO.extend(1.0);
    let ndc = clip.truncate() / clip.w;
    assert!(ndc.x.abs() <= EPS && ndc.y.abs() <= EPS);
    assert!((0.0..=1.0).contains(&ndc.z));
}
