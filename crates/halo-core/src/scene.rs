//! Scene contents: animated instances plus static helper overlays.
//!
//! The scene is the single owner of the instance collection. Instances are
//! created once by the arrangement generator and only their transform fields
//! change afterwards.

use glam::{EulerRot, Mat4, Quat, Vec3};

/// One placed copy of the shared sphere geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    pub index: usize,
    pub position: Vec3,
    /// Euler angles in radians, applied in XYZ order.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Instance {
    pub fn at(index: usize, position: Vec3) -> Self {
        Self {
            index,
            position,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    /// World transform for this instance.
    pub fn model_matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }
}

/// Per-instance data uploaded to the GPU (column-major model matrix).
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
}

/// Vertex of a helper line segment.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// Visual aids drawn with the scene but never animated.
#[derive(Clone, Debug, PartialEq)]
pub enum Helper {
    /// Red/green/blue lines along +X/+Y/+Z.
    Axes { size: f32 },
    /// Outline of a directional light's orthographic shadow camera.
    ShadowFrustum {
        light_position: Vec3,
        target: Vec3,
        half_extent: f32,
        near: f32,
        far: f32,
    },
}

impl Helper {
    /// Append this helper's line-list vertices to `out`.
    pub fn push_lines(&self, out: &mut Vec<LineVertex>) {
        match self {
            Helper::Axes { size } => {
                let s = *size;
                let axes = [
                    ([s, 0.0, 0.0], [1.0, 0.0, 0.0]),
                    ([0.0, s, 0.0], [0.0, 1.0, 0.0]),
                    ([0.0, 0.0, s], [0.0, 0.0, 1.0]),
                ];
                for (end, color) in axes {
                    out.push(LineVertex {
                        position: [0.0; 3],
                        color,
                    });
                    out.push(LineVertex {
                        position: end,
                        color,
                    });
                }
            }
            Helper::ShadowFrustum {
                light_position,
                target,
                half_extent,
                near,
                far,
            } => {
                let color = [1.0, 0.85, 0.3];
                let view = Mat4::look_at_rh(*light_position, *target, Vec3::Y);
                let to_world = view.inverse();
                let e = *half_extent;
                // View space looks down -Z.
                let corner = |x: f32, y: f32, z: f32| to_world.transform_point3(Vec3::new(x, y, -z));
                let near_quad = [
                    corner(-e, -e, *near),
                    corner(e, -e, *near),
                    corner(e, e, *near),
                    corner(-e, e, *near),
                ];
                let far_quad = [
                    corner(-e, -e, *far),
                    corner(e, -e, *far),
                    corner(e, e, *far),
                    corner(-e, e, *far),
                ];
                let mut segment = |a: Vec3, b: Vec3| {
                    out.push(LineVertex {
                        position: a.to_array(),
                        color,
                    });
                    out.push(LineVertex {
                        position: b.to_array(),
                        color,
                    });
                };
                for i in 0..4 {
                    let j = (i + 1) % 4;
                    segment(near_quad[i], near_quad[j]);
                    segment(far_quad[i], far_quad[j]);
                    segment(near_quad[i], far_quad[i]);
                }
            }
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Scene {
    instances: Vec<Instance>,
    helpers: Vec<Helper>,
}

impl Scene {
    pub fn new(instances: Vec<Instance>) -> Self {
        Self {
            instances,
            helpers: Vec::new(),
        }
    }

    pub fn with_helper(mut self, helper: Helper) -> Self {
        self.helpers.push(helper);
        self
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    /// Mutable access to transforms. The slice cannot grow or shrink, which
    /// keeps the instance count fixed for the session.
    pub fn instances_mut(&mut self) -> &mut [Instance] {
        &mut self.instances
    }

    pub fn helpers(&self) -> &[Helper] {
        &self.helpers
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Fill `out` with GPU instance data in generation order.
    pub fn write_instance_data(&self, out: &mut Vec<InstanceRaw>) {
        out.clear();
        out.extend(self.instances.iter().map(|inst| InstanceRaw {
            model: inst.model_matrix().to_cols_array_2d(),
        }));
    }

    pub fn helper_lines(&self) -> Vec<LineVertex> {
        let mut lines = Vec::new();
        for helper in &self.helpers {
            helper.push_lines(&mut lines);
        }
        lines
    }
}
