//! Wheel and canvas-size normalization for the browser.
//!
//! No `web_sys` types here so the host test suite can include this file.

use halo_core::pixel_wheel_notches;

/// `WheelEvent.deltaMode` values.
pub const DOM_DELTA_LINE: u32 = 1;
pub const DOM_DELTA_PAGE: u32 = 2;

/// Browsers report three lines per notch for line-mode wheels.
pub const LINES_PER_NOTCH: f64 = 3.0;

/// Wheel delta in notches, positive zooming out.
pub fn wheel_steps(delta_y: f64, delta_mode: u32) -> f32 {
    let notches = match delta_mode {
        DOM_DELTA_LINE => delta_y / LINES_PER_NOTCH,
        DOM_DELTA_PAGE => delta_y,
        // DOM_DELTA_PIXEL
        _ => return pixel_wheel_notches(delta_y),
    };
    if notches.is_finite() {
        notches as f32
    } else {
        0.0
    }
}

/// Logical canvas size from its CSS box, at least 1x1.
pub fn css_size(width: f64, height: f64) -> (u32, u32) {
    let clamp = |v: f64| {
        if v.is_finite() && v >= 1.0 {
            v.round() as u32
        } else {
            1
        }
    };
    (clamp(width), clamp(height))
}
