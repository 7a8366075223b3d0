use crate::error::SceneError;
use std::f32::consts::PI;
use std::str::FromStr;

/// Easing curves applied to normalized tween progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    SineIn,
    SineOut,
    #[default]
    SineInOut,
}

impl Easing {
    /// Map progress `t` in [0, 1] to eased progress. Inputs are clamped.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::SineIn => 1.0 - (t * PI / 2.0).cos(),
            Easing::SineOut => (t * PI / 2.0).sin(),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
        }
    }
}

impl FromStr for Easing {
    type Err = SceneError;

    /// Accepts both `quad.inOut` and `power1.inOut` style names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let easing = match s.to_ascii_lowercase().as_str() {
            "linear" | "none" | "power0" => Easing::Linear,
            "quad.in" | "power1.in" => Easing::QuadIn,
            "quad.out" | "power1.out" | "power1" => Easing::QuadOut,
            "quad.inout" | "power1.inout" => Easing::QuadInOut,
            "cubic.in" | "power2.in" => Easing::CubicIn,
            "cubic.out" | "power2.out" | "power2" => Easing::CubicOut,
            "cubic.inout" | "power2.inout" => Easing::CubicInOut,
            "sine.in" => Easing::SineIn,
            "sine.out" => Easing::SineOut,
            "sine.inout" | "sine" => Easing::SineInOut,
            other => {
                return Err(SceneError::InvalidAnimationRequest(format!(
                    "unknown easing '{other}'"
                )))
            }
        };
        Ok(easing)
    }
}
