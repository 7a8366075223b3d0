//! Animation strategies behind one `advance` capability.
//!
//! - `DirectDriver` recomputes transforms as closed-form functions of time.
//! - `ScheduledDriver` samples a shared tween timeline that is advanced by
//!   its own ticker, independent of the render loop.
//!
//! The render loop only sees `dyn AnimationDriver`.

pub mod direct;
pub mod easing;
pub mod scheduled;
pub mod tween;

pub use direct::{DirectDriver, DirectMotion, StepMode};
pub use easing::Easing;
pub use scheduled::{AnimationId, ScheduledDriver, Timeline, TimelineHandle};
pub use tween::{
    Attribute, AttributePath, Axis, Repeat, Stagger, StaggerOrder, TweenRequest,
};

use crate::scene::Instance;

/// Time information for a single render tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
    /// Seconds since the loop started.
    pub elapsed: f32,
    /// Seconds since the previous tick.
    pub delta: f32,
    /// Number of ticks completed before this one.
    pub frame: u64,
}

impl FrameTime {
    pub fn at(elapsed: f32) -> Self {
        Self {
            elapsed,
            delta: 0.0,
            frame: 0,
        }
    }
}

/// A strategy that mutates instance transforms once per render tick.
pub trait AnimationDriver {
    fn advance(&mut self, time: FrameTime, instances: &mut [Instance]);
}

/// Leaves instances where the arrangement placed them.
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticDriver;

impl AnimationDriver for StaticDriver {
    fn advance(&mut self, _time: FrameTime, _instances: &mut [Instance]) {}
}
