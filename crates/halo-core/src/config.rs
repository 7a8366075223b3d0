//! Scene configuration and the built-in presets.

use crate::animation::{
    AnimationDriver, Axis, DirectDriver, DirectMotion, Easing, Repeat, ScheduledDriver,
    StaggerOrder, StaticDriver, StepMode, Timeline, TimelineHandle, TweenRequest,
};
use crate::arrangement::ArrangementSpec;
use crate::camera::CameraConfig;
use crate::constants::*;
use crate::error::{Result, SceneError};
use crate::scene::Instance;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq)]
pub enum AnimationConfig {
    Static,
    Direct(Vec<DirectMotion>),
    Scheduled(Vec<TweenRequest>),
}

/// A ready driver plus, for scheduled mode, the timeline its ticker must advance.
pub struct DriverSetup {
    pub driver: Box<dyn AnimationDriver>,
    pub timeline: Option<TimelineHandle>,
}

impl AnimationConfig {
    /// Build the driver for `instances` placed by `arrangement`. Scheduled
    /// requests are validated here so a bad preset fails before the loop starts.
    pub fn build(
        &self,
        arrangement: &ArrangementSpec,
        instances: &[Instance],
    ) -> Result<DriverSetup> {
        let setup = match self {
            AnimationConfig::Static => DriverSetup {
                driver: Box::new(StaticDriver),
                timeline: None,
            },
            AnimationConfig::Direct(motions) => DriverSetup {
                driver: Box::new(DirectDriver::new(motions.clone(), arrangement, instances)),
                timeline: None,
            },
            AnimationConfig::Scheduled(requests) => {
                let mut timeline = Timeline::new(instances.len());
                if let Some(dims) = arrangement.grid_dims() {
                    timeline = timeline.with_grid(dims);
                }
                let handle = TimelineHandle::new(timeline);
                for req in requests {
                    handle.request(req)?;
                }
                DriverSetup {
                    driver: Box::new(ScheduledDriver::new(handle.clone())),
                    timeline: Some(handle),
                }
            }
        };
        Ok(setup)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub arrangement: ArrangementSpec,
    pub animation: AnimationConfig,
    pub camera: CameraConfig,
    pub clear_color: [f32; 4],
    pub show_axes: bool,
    pub axes_size: f32,
    pub show_shadow_frustum: bool,
    pub max_pixel_scale: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::preset(Preset::Ring)
    }
}

impl SceneConfig {
    pub fn preset(preset: Preset) -> Self {
        let (arrangement, animation) = match preset {
            Preset::Ring => (
                ArrangementSpec::ring(RING_COUNT, RING_RADIUS_X),
                AnimationConfig::Direct(vec![DirectMotion::Orbit {
                    radius_x: RING_RADIUS_X,
                    radius_y: RING_RADIUS_Y,
                    speed_x: ORBIT_SPEED,
                    speed_y: ORBIT_SPEED,
                }]),
            ),
            Preset::Grid => (
                ArrangementSpec::grid3d(GRID_SIDE, GRID_STEP),
                AnimationConfig::Scheduled(vec![
                    TweenRequest::to("scale", 0.18, 1.0)
                        .from_value(0.04)
                        .easing(Easing::SineInOut)
                        .repeat(Repeat::Infinite, true)
                        .stagger(1.5, StaggerOrder::Grid),
                    TweenRequest::to("rotation.y", std::f32::consts::PI, 2.0)
                        .easing(Easing::QuadInOut)
                        .repeat(Repeat::Infinite, true)
                        .stagger(1.0, StaggerOrder::Start),
                ]),
            ),
            Preset::Curve => (
                ArrangementSpec::curve(CURVE_COUNT, CURVE_RADIUS, CURVE_OFFSET),
                AnimationConfig::Direct(vec![
                    DirectMotion::Wave {
                        amplitude: CURVE_OFFSET,
                        speed: WAVE_SPEED,
                    },
                    DirectMotion::Spin {
                        axis: Axis::Z,
                        step: StepMode::PerSecond(SPIN_RATE_PER_SEC),
                    },
                ]),
            ),
        };
        let camera = match preset {
            // Grid spans ~1.2 units; start close enough to see it.
            Preset::Grid => CameraConfig {
                distance: 6.0,
                ..CameraConfig::default()
            },
            _ => CameraConfig::default(),
        };
        Self {
            arrangement,
            animation,
            camera,
            clear_color: CLEAR_COLOR,
            show_axes: true,
            axes_size: AXES_SIZE,
            show_shadow_frustum: false,
            max_pixel_scale: MAX_PIXEL_SCALE,
        }
    }

    pub fn with_arrangement(mut self, arrangement: ArrangementSpec) -> Self {
        self.arrangement = arrangement;
        self
    }

    /// Instance count for ring/curve, cube side for grid.
    pub fn with_count(mut self, count: usize) -> Self {
        self.arrangement = self.arrangement.with_count(count);
        self
    }

    pub fn with_animation(mut self, animation: AnimationConfig) -> Self {
        self.animation = animation;
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Preset {
    #[default]
    Ring,
    Grid,
    Curve,
}

impl FromStr for Preset {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().trim_start_matches('#').to_ascii_lowercase().as_str() {
            "" | "ring" => Ok(Preset::Ring),
            "grid" | "grid3d" => Ok(Preset::Grid),
            "curve" => Ok(Preset::Curve),
            other => Err(SceneError::InvalidSpec(format!("unknown preset '{other}'"))),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Preset::Ring => "ring",
            Preset::Grid => "grid",
            Preset::Curve => "curve",
        })
    }
}
