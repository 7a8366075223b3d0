use crate::WebLoop;
use halo_core::TickOutcome;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Owns the `requestAnimationFrame` callback and the id of the pending request.
pub struct FrameHandle {
    pending: Rc<Cell<Option<i32>>>,
    callback: FrameCallback,
}

impl FrameHandle {
    /// Cancel the pending frame and drop the callback.
    pub fn stop(&self) {
        if let (Some(id), Some(w)) = (self.pending.take(), web::window()) {
            _ = w.cancel_animation_frame(id);
        }
        self.callback.borrow_mut().take();
    }
}

fn request_frame(callback: &FrameCallback, pending: &Cell<Option<i32>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = callback.borrow().as_ref() {
        match w.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => pending.set(Some(id)),
            Err(e) => log::error!("[frame] requestAnimationFrame failed: {:?}", e),
        }
    }
}

/// Drive `render_loop` from `requestAnimationFrame`. The next frame is
/// requested only while the tick reports `Continue`. `on_fatal` runs once,
/// after the failing frame's callback has returned.
pub fn start_loop(
    render_loop: Rc<RefCell<WebLoop>>,
    on_fatal: impl FnOnce() + 'static,
) -> FrameHandle {
    let callback: FrameCallback = Rc::new(RefCell::new(None));
    let pending = Rc::new(Cell::new(None));

    let callback_tick = callback.clone();
    let pending_tick = pending.clone();
    let mut on_fatal = Some(on_fatal);
    *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        pending_tick.set(None);
        let outcome = render_loop.borrow_mut().tick();
        match outcome {
            Ok(TickOutcome::Continue) => request_frame(&callback_tick, &pending_tick),
            Ok(TickOutcome::Stopped) => log::info!("[frame] loop stopped"),
            Err(e) => {
                log::error!("[frame] render failed, stopping: {e}");
                if let Some(f) = on_fatal.take() {
                    spawn_local(async move { f() });
                }
            }
        }
    }) as Box<dyn FnMut()>));

    request_frame(&callback, &pending);
    FrameHandle { pending, callback }
}
