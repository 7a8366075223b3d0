//! Single owner of scene, camera rig and viewport.
//!
//! Host signals (resize, pointer drag, wheel) reach this state only through
//! the methods below; nothing outside the stage writes its fields.

use crate::arrangement;
use crate::camera::{drag_to_angles, CameraRig};
use crate::config::SceneConfig;
use crate::constants::*;
use crate::error::Result;
use crate::scene::{Helper, Scene};
use crate::viewport::{Viewport, ViewportManager};
use glam::Vec3;

pub struct Stage {
    scene: Scene,
    rig: CameraRig,
    viewport: ViewportManager,
}

impl Stage {
    /// Build the scene from `config`. Fails before anything is rendered if
    /// the arrangement is invalid.
    pub fn new(config: &SceneConfig, width: u32, height: u32, system_scale: f32) -> Result<Self> {
        let instances = arrangement::generate(&config.arrangement)?;
        let mut scene = Scene::new(instances);
        if config.show_axes {
            scene = scene.with_helper(Helper::Axes {
                size: config.axes_size,
            });
        }
        if config.show_shadow_frustum {
            scene = scene.with_helper(Helper::ShadowFrustum {
                light_position: light_position_vec3(),
                target: Vec3::ZERO,
                half_extent: SHADOW_HALF_EXTENT,
                near: SHADOW_NEAR,
                far: SHADOW_FAR,
            });
        }
        let viewport = ViewportManager::new(width, height, system_scale)
            .with_max_pixel_scale(config.max_pixel_scale);
        let rig = CameraRig::new(&config.camera, viewport.viewport().aspect());
        Ok(Self {
            scene,
            rig,
            viewport,
        })
    }

    /// Apply a host resize and refresh the camera aspect. Returns the new
    /// viewport for the backend.
    pub fn on_resize(&mut self, width: u32, height: u32, system_scale: f32) -> Viewport {
        let vp = self.viewport.on_resize(width, height, system_scale);
        self.rig.set_aspect(vp.aspect());
        vp
    }

    /// Pointer drag in logical pixels.
    pub fn on_drag(&mut self, dx: f32, dy: f32) {
        let (d_az, d_el) = drag_to_angles(dx, dy, self.viewport.viewport().height);
        self.rig.controls_mut().rotate(d_az, d_el);
    }

    /// Wheel input in notches; positive zooms out.
    pub fn on_zoom(&mut self, steps: f32) {
        self.rig.controls_mut().zoom(steps);
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn rig_mut(&mut self) -> &mut CameraRig {
        &mut self.rig
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.viewport()
    }
}
