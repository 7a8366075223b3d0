use crate::constants::MAX_PIXEL_SCALE;

/// Output surface size in logical pixels plus the device pixel scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub pixel_scale: f32,
}

impl Viewport {
    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    /// Backing-store size in physical pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        (
            ((self.width as f32 * self.pixel_scale).round() as u32).max(1),
            ((self.height as f32 * self.pixel_scale).round() as u32).max(1),
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            pixel_scale: 1.0,
        }
    }
}

/// Clamp a host-reported pixel ratio into `(0, max]`. Non-finite or
/// non-positive input falls back to 1.
#[inline]
pub fn clamp_pixel_scale(system_scale: f32, max: f32) -> f32 {
    if system_scale.is_finite() && system_scale > 0.0 {
        system_scale.min(max)
    } else {
        1.0
    }
}

/// Sole writer of the [`Viewport`].
#[derive(Clone, Debug)]
pub struct ViewportManager {
    viewport: Viewport,
    max_pixel_scale: f32,
}

impl ViewportManager {
    pub fn new(width: u32, height: u32, system_scale: f32) -> Self {
        let mut manager = Self {
            viewport: Viewport::default(),
            max_pixel_scale: MAX_PIXEL_SCALE,
        };
        manager.on_resize(width, height, system_scale);
        manager
    }

    pub fn with_max_pixel_scale(mut self, max: f32) -> Self {
        self.max_pixel_scale = max;
        let scale = self.viewport.pixel_scale;
        self.viewport.pixel_scale = clamp_pixel_scale(scale, max);
        self
    }

    /// Replace the stored size and scale. Each call fully overwrites the
    /// previous state so bursts of resize events collapse to the last one.
    pub fn on_resize(&mut self, width: u32, height: u32, system_scale: f32) -> Viewport {
        self.viewport = Viewport {
            width: width.max(1),
            height: height.max(1),
            pixel_scale: clamp_pixel_scale(system_scale, self.max_pixel_scale),
        };
        log::debug!(
            "[viewport] {}x{} @ {:.2}x",
            self.viewport.width,
            self.viewport.height,
            self.viewport.pixel_scale
        );
        self.viewport
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}
