//! Pointer math shared by the frontends. Hosts convert their events into
//! logical pixels and a pointer id before calling in.

/// Pixels of scroll counted as one wheel notch.
pub const PIXELS_PER_NOTCH: f64 = 100.0;

/// Pixel scroll distance in wheel notches, positive zooming out. Non-finite
/// input counts as no scroll.
pub fn pixel_wheel_notches(pixels: f64) -> f32 {
    let notches = pixels / PIXELS_PER_NOTCH;
    if notches.is_finite() {
        notches as f32
    } else {
        0.0
    }
}

/// Primary-button drag in logical pixels. Only the pointer that started the
/// drag moves the camera.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct DragTracker {
    pointer: Option<i32>,
    last: (f32, f32),
}

impl DragTracker {
    pub fn press(&mut self, pointer_id: i32, x: f32, y: f32) {
        if self.pointer.is_none() {
            self.pointer = Some(pointer_id);
            self.last = (x, y);
        }
    }

    /// Movement since the previous position, or `None` when not dragging
    /// with this pointer.
    pub fn moved(&mut self, pointer_id: i32, x: f32, y: f32) -> Option<(f32, f32)> {
        if self.pointer != Some(pointer_id) {
            return None;
        }
        let (px, py) = self.last;
        self.last = (x, y);
        Some((x - px, y - py))
    }

    pub fn release(&mut self, pointer_id: i32) {
        if self.pointer == Some(pointer_id) {
            self.pointer = None;
        }
    }
}
