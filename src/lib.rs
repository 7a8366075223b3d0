#![cfg(target_arch = "wasm32")]
//! Browser frontend: WebGPU canvas, `requestAnimationFrame` loop and a
//! `setInterval` ticker for scheduled animation.

use halo_core::{
    Preset, RenderLoop, SceneConfig, SceneError, Stage, SystemClock, TimelineHandle, TICKER_HZ,
};
use halo_render::GpuRenderer;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod dom;
mod events;
mod frame;
mod input;
mod teardown;

use teardown::Teardown;

pub(crate) type WebLoop = RenderLoop<GpuRenderer<'static>>;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("halo-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:#}", e);
        }
    });
    Ok(())
}

fn preset_from_hash() -> Preset {
    let hash = dom::location_hash();
    hash.parse().unwrap_or_else(|e| {
        log::warn!("unknown preset '{}' ({}), using ring", hash, e);
        Preset::default()
    })
}

/// Tick `timeline` from `setInterval` with measured deltas. Returns the
/// interval id.
fn start_ticker(timeline: TimelineHandle, hz: u32) -> anyhow::Result<i32> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let mut last = Instant::now();
    let closure = Closure::wrap(Box::new(move || {
        let now = Instant::now();
        timeline.tick((now - last).as_secs_f32());
        last = now;
    }) as Box<dyn FnMut()>);
    let period_ms = (1000 / hz.max(1)) as i32;
    let id = window
        .set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            period_ms,
        )
        .map_err(|e| anyhow::anyhow!("setInterval failed: {:?}", e))?;
    closure.forget();
    log::info!("[ticker] interval {} ms", period_ms);
    Ok(id)
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id("app-canvas")
        .ok_or_else(|| anyhow::anyhow!("missing #app-canvas"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    let preset = preset_from_hash();
    let config = SceneConfig::preset(preset);
    log::info!(
        "preset {} ({} instances)",
        preset,
        config.arrangement.count()
    );

    let (width, height) = dom::canvas_css_size(&canvas);
    let stage = Stage::new(&config, width, height, dom::device_pixel_ratio())?;
    dom::sync_canvas_backing_size(&canvas, stage.viewport());
    let setup = config
        .animation
        .build(&config.arrangement, stage.scene().instances())?;

    let renderer = create_renderer(&canvas, &config)
        .await
        .map_err(|e| SceneError::BackendUnavailable(format!("{e:#}")))?;
    let render_loop = Rc::new(RefCell::new(RenderLoop::new(
        stage,
        setup.driver,
        renderer,
        SystemClock::new(),
    )));

    let interval = match setup.timeline {
        Some(timeline) => Some(start_ticker(timeline, TICKER_HZ)?),
        None => None,
    };

    events::wire_pointer(&canvas, render_loop.clone());
    events::wire_resize(&canvas, render_loop.clone());
    // Stops the frame loop and the ticker; installed once both exist.
    let teardown = Teardown::default();
    let frames = {
        let teardown = teardown.clone();
        frame::start_loop(render_loop.clone(), move || {
            teardown.run();
        })
    };
    teardown.set(move || {
        render_loop.borrow_mut().cancel();
        frames.stop();
        if let (Some(id), Some(w)) = (interval, web::window()) {
            w.clear_interval_with_handle(id);
        }
        log::info!("halo-web stopped");
    });
    events::wire_teardown(teardown);
    Ok(())
}

async fn create_renderer(
    canvas: &web::HtmlCanvasElement,
    config: &SceneConfig,
) -> anyhow::Result<GpuRenderer<'static>> {
    let instance = wgpu::Instance::default();
    let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
    GpuRenderer::new(
        &instance,
        surface,
        canvas.width(),
        canvas.height(),
        config.clear_color,
    )
    .await
}
