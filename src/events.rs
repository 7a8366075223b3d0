use crate::teardown::Teardown;
use crate::{dom, input, WebLoop};
use halo_core::DragTracker;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

fn listen<E: wasm_bindgen::convert::FromWasmAbi + 'static>(
    target: &web::EventTarget,
    name: &str,
    handler: impl FnMut(E) + 'static,
) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    if let Err(e) = target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
    {
        log::warn!("[events] failed to add '{}' listener: {:?}", name, e);
    }
    closure.forget();
}

/// Left-drag orbits the camera; the wheel zooms it.
pub fn wire_pointer(canvas: &web::HtmlCanvasElement, render_loop: Rc<RefCell<WebLoop>>) {
    let drag = Rc::new(RefCell::new(DragTracker::default()));

    {
        let drag = drag.clone();
        let canvas_down = canvas.clone();
        listen(canvas, "pointerdown", move |ev: web::PointerEvent| {
            if ev.button() != 0 {
                return;
            }
            drag.borrow_mut()
                .press(ev.pointer_id(), ev.client_x() as f32, ev.client_y() as f32);
            _ = canvas_down.set_pointer_capture(ev.pointer_id());
        });
    }
    {
        let drag = drag.clone();
        let render_loop = render_loop.clone();
        listen(canvas, "pointermove", move |ev: web::PointerEvent| {
            let delta =
                drag.borrow_mut()
                    .moved(ev.pointer_id(), ev.client_x() as f32, ev.client_y() as f32);
            if let Some((dx, dy)) = delta {
                render_loop.borrow_mut().on_drag(dx, dy);
            }
        });
    }
    for name in ["pointerup", "pointercancel"] {
        let drag = drag.clone();
        listen(canvas, name, move |ev: web::PointerEvent| {
            drag.borrow_mut().release(ev.pointer_id());
        });
    }

    listen(canvas, "wheel", move |ev: web::WheelEvent| {
        ev.prevent_default();
        let steps = input::wheel_steps(ev.delta_y(), ev.delta_mode());
        if steps != 0.0 {
            render_loop.borrow_mut().on_zoom(steps);
        }
    });
}

/// Read the canvas box and pixel ratio, resize the loop, then match the
/// backing store to the resulting viewport.
pub fn apply_resize(canvas: &web::HtmlCanvasElement, render_loop: &RefCell<WebLoop>) {
    let (w, h) = dom::canvas_css_size(canvas);
    let viewport = render_loop
        .borrow_mut()
        .on_resize(w, h, dom::device_pixel_ratio());
    dom::sync_canvas_backing_size(canvas, viewport);
    log::debug!(
        "[events] resize {}x{} @{:.2}",
        viewport.width,
        viewport.height,
        viewport.pixel_scale
    );
}

pub fn wire_resize(canvas: &web::HtmlCanvasElement, render_loop: Rc<RefCell<WebLoop>>) {
    let Some(window) = web::window() else {
        return;
    };
    let canvas = canvas.clone();
    listen(&window, "resize", move |_: web::Event| {
        apply_resize(&canvas, &render_loop);
    });
}

/// Run `teardown` when the page is hidden for unload.
pub fn wire_teardown(teardown: Teardown) {
    let Some(window) = web::window() else {
        return;
    };
    listen(&window, "pagehide", move |_: web::Event| {
        teardown.run();
    });
}
