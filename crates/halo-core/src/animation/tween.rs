//! Tween request shape, attribute paths and stagger delays.

use super::easing::Easing;
use crate::error::{Result, SceneError};
use crate::scene::Instance;
use glam::Vec3;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    #[inline]
    pub fn component(&self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    #[inline]
    pub fn component_mut<'a>(&self, v: &'a mut Vec3) -> &'a mut f32 {
        match self {
            Axis::X => &mut v.x,
            Axis::Y => &mut v.y,
            Axis::Z => &mut v.z,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Attribute {
    Position,
    Rotation,
    Scale,
}

/// A resolved instance field. `axis: None` drives all three components with
/// the same scalar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AttributePath {
    pub attribute: Attribute,
    pub axis: Option<Axis>,
}

impl AttributePath {
    pub const fn new(attribute: Attribute, axis: Option<Axis>) -> Self {
        Self { attribute, axis }
    }

    fn field<'a>(&self, inst: &'a mut Instance) -> &'a mut Vec3 {
        match self.attribute {
            Attribute::Position => &mut inst.position,
            Attribute::Rotation => &mut inst.rotation,
            Attribute::Scale => &mut inst.scale,
        }
    }

    /// Current scalar value. Whole-vector paths read the X component.
    pub fn read(&self, inst: &Instance) -> f32 {
        let v = match self.attribute {
            Attribute::Position => inst.position,
            Attribute::Rotation => inst.rotation,
            Attribute::Scale => inst.scale,
        };
        self.axis.unwrap_or(Axis::X).component(v)
    }

    pub fn write(&self, inst: &mut Instance, value: f32) {
        let field = self.field(inst);
        match self.axis {
            Some(axis) => *axis.component_mut(field) = value,
            None => *field = Vec3::splat(value),
        }
    }
}

impl FromStr for AttributePath {
    type Err = SceneError;

    /// Parses `scale`, `scale.x`, `rotation.z`, `position.y`, ...
    fn from_str(s: &str) -> Result<Self> {
        let unknown = || SceneError::InvalidAnimationRequest(format!("unknown attribute '{s}'"));
        let mut parts = s.trim().split('.');
        let attribute = match parts.next() {
            Some("position") => Attribute::Position,
            Some("rotation") => Attribute::Rotation,
            Some("scale") => Attribute::Scale,
            _ => return Err(unknown()),
        };
        let axis = match parts.next() {
            None => None,
            Some("x") => Some(Axis::X),
            Some("y") => Some(Axis::Y),
            Some("z") => Some(Axis::Z),
            Some(_) => return Err(unknown()),
        };
        if parts.next().is_some() {
            return Err(unknown());
        }
        Ok(Self { attribute, axis })
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.attribute {
            Attribute::Position => "position",
            Attribute::Rotation => "rotation",
            Attribute::Scale => "scale",
        };
        match self.axis {
            Some(Axis::X) => write!(f, "{name}.x"),
            Some(Axis::Y) => write!(f, "{name}.y"),
            Some(Axis::Z) => write!(f, "{name}.z"),
            None => f.write_str(name),
        }
    }
}

/// Repetition after the first play.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeat {
    /// Play `n` additional times (0 plays once).
    Times(u32),
    Infinite,
}

impl Default for Repeat {
    fn default() -> Self {
        Repeat::Times(0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum StaggerOrder {
    /// Index order.
    #[default]
    Start,
    /// Reverse index order.
    End,
    /// Outward from the middle index.
    Center,
    /// Distance from cell (0, 0, 0) when the arrangement is a grid; index
    /// order otherwise.
    Grid,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Stagger {
    /// Total delay budget in seconds spread across all instances.
    pub amount: f32,
    pub order: StaggerOrder,
}

impl Stagger {
    pub fn new(amount: f32, order: StaggerOrder) -> Self {
        Self { amount, order }
    }

    /// Start delay for every instance, `p / (N - 1) * amount` where `p` is
    /// the instance's position in the stagger order. `grid` gives the cell
    /// dimensions when instances were generated as a 3D grid.
    pub fn delays(&self, count: usize, grid: Option<[usize; 3]>) -> Vec<f32> {
        if count <= 1 {
            return vec![0.0; count];
        }
        let last = (count - 1) as f32;
        let order = match (self.order, grid) {
            (StaggerOrder::Grid, None) => StaggerOrder::Start,
            (order, _) => order,
        };
        match order {
            StaggerOrder::Start => (0..count)
                .map(|i| i as f32 / last * self.amount)
                .collect(),
            StaggerOrder::End => (0..count)
                .map(|i| (count - 1 - i) as f32 / last * self.amount)
                .collect(),
            StaggerOrder::Center => {
                let mid = last / 2.0;
                (0..count)
                    .map(|i| (i as f32 - mid).abs() / mid * self.amount)
                    .collect()
            }
            StaggerOrder::Grid => {
                let dims = grid.unwrap_or([count, 1, 1]);
                let distances: Vec<f32> = (0..count)
                    .map(|i| grid_cell(dims, i).length())
                    .collect();
                let max = distances.iter().copied().fold(0.0_f32, f32::max);
                if max <= 0.0 {
                    return vec![0.0; count];
                }
                distances
                    .into_iter()
                    .map(|d| d / max * self.amount)
                    .collect()
            }
        }
    }
}

/// Cell coordinates of index `i` in a grid generated as `(i * d1 + j) * d2 + k`.
fn grid_cell(dims: [usize; 3], index: usize) -> Vec3 {
    let [_, d1, d2] = dims;
    let d1 = d1.max(1);
    let d2 = d2.max(1);
    let k = index % d2;
    let j = (index / d2) % d1;
    let i = index / (d1 * d2);
    Vec3::new(i as f32, j as f32, k as f32)
}

/// A declarative animation applied to every instance.
#[derive(Clone, Debug, PartialEq)]
pub struct TweenRequest {
    /// Attribute path such as `"scale"` or `"rotation.z"`.
    pub target: String,
    /// Start value; the attribute's value when the tween first runs if `None`.
    pub from: Option<f32>,
    pub to: f32,
    /// Seconds per iteration.
    pub duration: f32,
    pub easing: Easing,
    pub repeat: Repeat,
    pub yoyo: bool,
    pub stagger: Stagger,
}

impl TweenRequest {
    pub fn to(target: impl Into<String>, to: f32, duration: f32) -> Self {
        Self {
            target: target.into(),
            from: None,
            to,
            duration,
            easing: Easing::default(),
            repeat: Repeat::default(),
            yoyo: false,
            stagger: Stagger::default(),
        }
    }

    pub fn from_value(mut self, from: f32) -> Self {
        self.from = Some(from);
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn repeat(mut self, repeat: Repeat, yoyo: bool) -> Self {
        self.repeat = repeat;
        self.yoyo = yoyo;
        self
    }

    pub fn stagger(mut self, amount: f32, order: StaggerOrder) -> Self {
        self.stagger = Stagger::new(amount, order);
        self
    }

    /// Check parameters and resolve the attribute path.
    pub fn validate(&self) -> Result<AttributePath> {
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(SceneError::InvalidAnimationRequest(format!(
                "duration must be positive, got {}",
                self.duration
            )));
        }
        if !(self.stagger.amount.is_finite() && self.stagger.amount >= 0.0) {
            return Err(SceneError::InvalidAnimationRequest(format!(
                "stagger amount must be non-negative, got {}",
                self.stagger.amount
            )));
        }
        if !self.to.is_finite() || self.from.is_some_and(|f| !f.is_finite()) {
            return Err(SceneError::InvalidAnimationRequest(
                "tween values must be finite".into(),
            ));
        }
        self.target.parse()
    }
}
