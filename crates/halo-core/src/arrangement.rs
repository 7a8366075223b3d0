//! Parametric placement of instances at startup.
//!
//! Every pattern is a pure function of its parameters and the instance index,
//! so generating twice from the same spec yields identical positions.

use crate::error::{Result, SceneError};
use crate::scene::Instance;
use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// Phase function for the curve pattern: `(index, count) -> radians`.
pub type PhaseFn = fn(usize, usize) -> f32;

/// Default curve phase, `(i * N) / PI * 2`.
pub fn default_curve_phase(index: usize, count: usize) -> f32 {
    (index * count) as f32 / PI * 2.0
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Pattern {
    Ring {
        count: usize,
        radius_x: f32,
        radius_y: f32,
        center: Vec3,
    },
    Grid3d {
        side: usize,
        step: f32,
    },
    Curve {
        count: usize,
        radius: f32,
        offset: f32,
        phase: PhaseFn,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArrangementSpec {
    pub pattern: Pattern,
}

impl ArrangementSpec {
    pub fn ring(count: usize, radius: f32) -> Self {
        Self {
            pattern: Pattern::Ring {
                count,
                radius_x: radius,
                radius_y: radius,
                center: Vec3::ZERO,
            },
        }
    }

    pub fn ellipse(count: usize, radius_x: f32, radius_y: f32, center: Vec3) -> Self {
        Self {
            pattern: Pattern::Ring {
                count,
                radius_x,
                radius_y,
                center,
            },
        }
    }

    pub fn grid3d(side: usize, step: f32) -> Self {
        Self {
            pattern: Pattern::Grid3d { side, step },
        }
    }

    pub fn curve(count: usize, radius: f32, offset: f32) -> Self {
        Self::curve_with_phase(count, radius, offset, default_curve_phase)
    }

    pub fn curve_with_phase(count: usize, radius: f32, offset: f32, phase: PhaseFn) -> Self {
        Self {
            pattern: Pattern::Curve {
                count,
                radius,
                offset,
                phase,
            },
        }
    }

    /// Replace the count (ring, curve) or cube side (grid).
    pub fn with_count(mut self, n: usize) -> Self {
        match &mut self.pattern {
            Pattern::Ring { count, .. } | Pattern::Curve { count, .. } => *count = n,
            Pattern::Grid3d { side, .. } => *side = n,
        }
        self
    }

    /// Number of instances this spec produces.
    pub fn count(&self) -> usize {
        match self.pattern {
            Pattern::Ring { count, .. } | Pattern::Curve { count, .. } => count,
            Pattern::Grid3d { side, .. } => side.saturating_pow(3),
        }
    }

    /// Base phase of instance `index`. Curves use their phase function so
    /// animation continues from the generated shape; other patterns use the
    /// ring angle.
    pub fn phase(&self, index: usize) -> f32 {
        match self.pattern {
            Pattern::Curve { count, phase, .. } => phase(index, count),
            _ => ring_angle(index, self.count()),
        }
    }

    /// Point the pattern is laid out around.
    pub fn center(&self) -> Vec3 {
        match self.pattern {
            Pattern::Ring { center, .. } => center,
            _ => Vec3::ZERO,
        }
    }

    /// Grid dimensions when the pattern is a grid, used for grid-aware stagger.
    pub fn grid_dims(&self) -> Option<[usize; 3]> {
        match self.pattern {
            Pattern::Grid3d { side, .. } => Some([side; 3]),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self.pattern {
            Pattern::Ring {
                count,
                radius_x,
                radius_y,
                center,
            } => {
                require_count("ring count", count)?;
                require_positive("ring radius_x", radius_x)?;
                require_positive("ring radius_y", radius_y)?;
                if !center.is_finite() {
                    return Err(SceneError::InvalidSpec(format!(
                        "ring center must be finite, got {center}"
                    )));
                }
            }
            Pattern::Grid3d { side, step } => {
                require_count("grid side", side)?;
                require_positive("grid step", step)?;
            }
            Pattern::Curve {
                count,
                radius,
                offset,
                ..
            } => {
                require_count("curve count", count)?;
                require_positive("curve radius", radius)?;
                require_positive("curve offset", offset)?;
            }
        }
        Ok(())
    }
}

fn require_count(name: &str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(SceneError::InvalidSpec(format!("{name} must be > 0")));
    }
    Ok(())
}

fn require_positive(name: &str, value: f32) -> Result<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(SceneError::InvalidSpec(format!(
            "{name} must be positive and finite, got {value}"
        )));
    }
    Ok(())
}

/// Base angle of instance `index` on a ring of `count`, `index * 2PI / count`.
#[inline]
pub fn ring_angle(index: usize, count: usize) -> f32 {
    index as f32 * (TAU / count.max(1) as f32)
}

/// Generate all instances for `spec` in index order.
pub fn generate(spec: &ArrangementSpec) -> Result<Vec<Instance>> {
    spec.validate()?;
    let instances = match spec.pattern {
        Pattern::Ring {
            count,
            radius_x,
            radius_y,
            center,
        } => (0..count)
            .map(|i| {
                let angle = ring_angle(i, count);
                let offset = Vec3::new(angle.cos() * radius_x, angle.sin() * radius_y, 0.0);
                Instance::at(i, center + offset)
            })
            .collect::<Vec<_>>(),
        Pattern::Grid3d { side, step } => {
            let mut out = Vec::with_capacity(spec.count());
            for i in 0..side {
                for j in 0..side {
                    for k in 0..side {
                        let p = Vec3::new(i as f32, j as f32, k as f32) * step;
                        out.push(Instance::at(out.len(), p));
                    }
                }
            }
            center_on_origin(&mut out);
            out
        }
        Pattern::Curve {
            count,
            radius,
            offset,
            phase,
        } => (0..count)
            .map(|i| {
                let y = phase(i, count).sin() * offset;
                Instance::at(i, Vec3::new(radius * i as f32, y, 0.0))
            })
            .collect::<Vec<_>>(),
    };
    log::info!(
        "[arrangement] generated {} instances ({})",
        instances.len(),
        pattern_name(&spec.pattern)
    );
    Ok(instances)
}

/// Index of grid cell `(i, j, k)` in generation order.
#[inline]
pub fn grid_index(side: usize, i: usize, j: usize, k: usize) -> usize {
    (i * side + j) * side + k
}

/// Translate all positions so the axis-aligned bounding box is centered on the origin.
pub fn center_on_origin(instances: &mut [Instance]) {
    let Some(center) = bounding_box_center(instances) else {
        return;
    };
    for inst in instances.iter_mut() {
        inst.position -= center;
    }
}

pub fn bounding_box_center(instances: &[Instance]) -> Option<Vec3> {
    let first = instances.first()?.position;
    let (min, max) = instances
        .iter()
        .fold((first, first), |(lo, hi), inst| {
            (lo.min(inst.position), hi.max(inst.position))
        });
    Some((min + max) * 0.5)
}

fn pattern_name(pattern: &Pattern) -> &'static str {
    match pattern {
        Pattern::Ring { .. } => "ring",
        Pattern::Grid3d { .. } => "grid3d",
        Pattern::Curve { .. } => "curve",
    }
}
