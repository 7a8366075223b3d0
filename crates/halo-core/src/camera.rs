//! Perspective camera plus a damped orbit controller.
//!
//! Pointer input only moves the controller's *target* angles and distance.
//! `CameraRig::integrate` then moves the current values a fixed fraction of
//! the remaining way each tick and rebuilds the camera eye.

use crate::constants::*;
use glam::{Mat4, Vec3};
use std::f32::consts::TAU;

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraConfig {
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    pub distance: f32,
    pub damping: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub zoom_step: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: CAMERA_FOV_DEG,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            distance: CAMERA_DISTANCE,
            damping: ORBIT_DAMPING,
            min_distance: ORBIT_MIN_DISTANCE,
            max_distance: ORBIT_MAX_DISTANCE,
            zoom_step: ORBIT_ZOOM_STEP,
        }
    }
}

/// Orbit state around a fixed target. Panning is not supported.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitControls {
    pub target: Vec3,
    /// Horizontal angle (radians, 0 = eye on +Z).
    pub azimuth: f32,
    /// Vertical angle (radians, positive = eye above the target).
    pub elevation: f32,
    pub distance: f32,
    /// Fraction of the remaining motion covered per tick, in (0, 1].
    pub damping: f32,
    pub zoom_enabled: bool,
    pub damping_enabled: bool,
    pub min_distance: f32,
    pub max_distance: f32,
    pub zoom_step: f32,

    target_azimuth: f32,
    target_elevation: f32,
    target_distance: f32,
}

impl OrbitControls {
    pub fn new(target: Vec3, config: &CameraConfig) -> Self {
        let distance = config.distance.clamp(config.min_distance, config.max_distance);
        Self {
            target,
            azimuth: 0.0,
            elevation: 0.0,
            distance,
            damping: config.damping.clamp(f32::EPSILON, 1.0),
            zoom_enabled: true,
            damping_enabled: true,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            zoom_step: config.zoom_step,
            target_azimuth: 0.0,
            target_elevation: 0.0,
            target_distance: distance,
        }
    }

    /// Queue a rotation by angle deltas in radians.
    pub fn rotate(&mut self, d_azimuth: f32, d_elevation: f32) {
        self.target_azimuth += d_azimuth;
        self.target_elevation = (self.target_elevation + d_elevation)
            .clamp(-ORBIT_ELEVATION_LIMIT, ORBIT_ELEVATION_LIMIT);
    }

    /// Queue a zoom. Positive `steps` move away from the target.
    pub fn zoom(&mut self, steps: f32) {
        if !self.zoom_enabled || !steps.is_finite() || steps == 0.0 {
            return;
        }
        let factor = self.zoom_step.powf(-steps);
        self.target_distance =
            (self.target_distance * factor).clamp(self.min_distance, self.max_distance);
        log::debug!("[camera] zoom target distance {:.2}", self.target_distance);
    }

    pub fn target_angles(&self) -> (f32, f32) {
        (self.target_azimuth, self.target_elevation)
    }

    pub fn target_distance(&self) -> f32 {
        self.target_distance
    }

    /// Move current state toward the targets by one damping step.
    pub fn update(&mut self) {
        let t = if self.damping_enabled { self.damping } else { 1.0 };
        self.azimuth += (self.target_azimuth - self.azimuth) * t;
        self.elevation += (self.target_elevation - self.elevation) * t;
        self.distance += (self.target_distance - self.distance) * t;
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let (sin_el, cos_el) = self.elevation.sin_cos();
        self.target
            + Vec3::new(
                self.distance * cos_el * sin_az,
                self.distance * sin_el,
                self.distance * cos_el * cos_az,
            )
    }
}

/// Convert a pointer drag in logical pixels to orbit angle deltas.
///
/// A drag across the full viewport height turns the camera a full circle.
#[inline]
pub fn drag_to_angles(dx: f32, dy: f32, viewport_height: u32) -> (f32, f32) {
    let h = viewport_height.max(1) as f32;
    (-TAU * dx / h, TAU * dy / h)
}

#[derive(Clone, Debug)]
pub struct CameraRig {
    camera: Camera,
    controls: OrbitControls,
}

impl CameraRig {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        let controls = OrbitControls::new(Vec3::ZERO, config);
        let camera = Camera {
            eye: controls.eye(),
            target: controls.target,
            up: Vec3::Y,
            aspect,
            fovy_radians: config.fov_deg.to_radians(),
            znear: config.near,
            zfar: config.far,
        };
        Self { camera, controls }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.camera.aspect = aspect;
        }
    }

    /// One damping step; called once per render tick.
    pub fn integrate(&mut self) {
        self.controls.update();
        self.camera.eye = self.controls.eye();
        self.camera.target = self.controls.target;
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }
}
