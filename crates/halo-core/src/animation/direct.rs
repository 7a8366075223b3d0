//! Direct animation: transforms are recomputed every tick from time, the
//! instance's base phase and the transform the arrangement gave it.
//!
//! Absolute-time motions (`Orbit`, `Wave`, `Pulse`) are idempotent for a given
//! elapsed time. `Spin` is incremental; see [`StepMode`].

use super::tween::Axis;
use super::{AnimationDriver, FrameTime};
use crate::arrangement::ArrangementSpec;
use crate::scene::Instance;
use glam::Vec3;

/// How an incremental motion advances.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepMode {
    /// Fixed radians added on every tick. Reproducible for a fixed tick count
    /// but frame-rate dependent: a 120 Hz display spins twice as fast as 60 Hz.
    PerTick(f32),
    /// Radians per second, scaled by the tick's delta time.
    PerSecond(f32),
}

impl StepMode {
    #[inline]
    fn increment(&self, delta: f32) -> f32 {
        match *self {
            StepMode::PerTick(step) => step,
            StepMode::PerSecond(rate) => rate * delta,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DirectMotion {
    /// `x = cx + cos(angle_i + speed_x t) rx`, `y = cy + sin(angle_i + speed_y t) ry`
    /// around the arrangement center. Equal speeds rotate a ring rigidly;
    /// unequal speeds trace Lissajous paths.
    Orbit {
        radius_x: f32,
        radius_y: f32,
        speed_x: f32,
        speed_y: f32,
    },
    /// `y = base_y + (sin(angle_i + speed t) - sin(angle_i)) amplitude`, so the
    /// wave starts from the generated shape. x and z stay at their base.
    Wave { amplitude: f32, speed: f32 },
    /// Uniform scale `base + sin(angle_i + speed t) amplitude`.
    Pulse { base: f32, amplitude: f32, speed: f32 },
    /// Rotation about one axis, accumulated per tick.
    Spin { axis: Axis, step: StepMode },
}

pub struct DirectDriver {
    motions: Vec<DirectMotion>,
    phases: Vec<f32>,
    base: Vec<Instance>,
    center: Vec3,
    spin: Vec3,
}

impl DirectDriver {
    /// Capture base transforms, per-instance phases and the center of the
    /// arrangement that placed `instances`.
    pub fn new(
        motions: Vec<DirectMotion>,
        arrangement: &ArrangementSpec,
        instances: &[Instance],
    ) -> Self {
        let phases = (0..instances.len()).map(|i| arrangement.phase(i)).collect();
        Self {
            motions,
            phases,
            base: instances.to_vec(),
            center: arrangement.center(),
            spin: Vec3::ZERO,
        }
    }

    pub fn motions(&self) -> &[DirectMotion] {
        &self.motions
    }

    /// Base phase of instance `index`.
    pub fn phase(&self, index: usize) -> Option<f32> {
        self.phases.get(index).copied()
    }

    /// Accumulated spin angles; only `Spin` motions change this.
    pub fn spin_angles(&self) -> Vec3 {
        self.spin
    }
}

impl AnimationDriver for DirectDriver {
    fn advance(&mut self, time: FrameTime, instances: &mut [Instance]) {
        let t = time.elapsed;
        for motion in &self.motions {
            if let DirectMotion::Spin { axis, step } = motion {
                *axis.component_mut(&mut self.spin) += step.increment(time.delta);
            }
        }
        for inst in instances.iter_mut() {
            let (Some(base), Some(&angle)) =
                (self.base.get(inst.index), self.phases.get(inst.index))
            else {
                continue;
            };
            for motion in &self.motions {
                match *motion {
                    DirectMotion::Orbit {
                        radius_x,
                        radius_y,
                        speed_x,
                        speed_y,
                    } => {
                        inst.position.x = self.center.x + (angle + t * speed_x).cos() * radius_x;
                        inst.position.y = self.center.y + (angle + t * speed_y).sin() * radius_y;
                        inst.position.z = base.position.z;
                    }
                    DirectMotion::Wave { amplitude, speed } => {
                        inst.position.x = base.position.x;
                        inst.position.z = base.position.z;
                        let swing = (angle + t * speed).sin() - angle.sin();
                        inst.position.y = base.position.y + swing * amplitude;
                    }
                    DirectMotion::Pulse {
                        base: base_scale,
                        amplitude,
                        speed,
                    } => {
                        let s = base_scale + (angle + t * speed).sin() * amplitude;
                        inst.scale = Vec3::splat(s);
                    }
                    DirectMotion::Spin { axis, .. } => {
                        let c = axis.component_mut(&mut inst.rotation);
                        *c = axis.component(base.rotation) + axis.component(self.spin);
                    }
                }
            }
        }
    }
}
