use crate::input;
use halo_core::Viewport;
use web_sys as web;

#[inline]
pub fn device_pixel_ratio() -> f32 {
    web::window()
        .map(|w| w.device_pixel_ratio() as f32)
        .unwrap_or(1.0)
}

/// Canvas size in CSS pixels.
pub fn canvas_css_size(canvas: &web::HtmlCanvasElement) -> (u32, u32) {
    let rect = canvas.get_bounding_client_rect();
    input::css_size(rect.width(), rect.height())
}

/// Size the canvas backing store to the viewport's physical pixels.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, viewport: Viewport) {
    let (w_px, h_px) = viewport.physical_size();
    if canvas.width() != w_px {
        canvas.set_width(w_px);
    }
    if canvas.height() != h_px {
        canvas.set_height(h_px);
    }
}

/// Preset name from `location.hash`, empty when there is none.
pub fn location_hash() -> String {
    web::window()
        .and_then(|w| w.location().hash().ok())
        .unwrap_or_default()
}
