use anyhow::Context;
use clap::Parser;
use halo_core::{
    pixel_wheel_notches, DragTracker, Preset, RenderLoop, SceneConfig, SceneError, Stage,
    SystemClock, TickOutcome, Ticker, TICKER_HZ,
};
use halo_render::GpuRenderer;
use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::EventLoop;
use winit::window::{Window, WindowBuilder};

/// winit reports a single mouse, so drags use one fixed pointer id.
const MOUSE_POINTER: i32 = 0;

#[derive(Parser, Debug)]
#[command(name = "halo")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Instanced sphere arrangements animated with wgpu", long_about = None)]
struct Args {
    /// Scene preset (ring, grid, curve)
    #[arg(short, long, default_value = "ring")]
    preset: Preset,

    /// Instance count for ring/curve, cube side for grid
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Rate of the scheduled-animation ticker
    #[arg(long, default_value_t = TICKER_HZ)]
    tick_hz: u32,

    /// Draw the light's shadow frustum
    #[arg(long)]
    shadow_frustum: bool,

    /// Hide the axes helper
    #[arg(long)]
    no_axes: bool,
}

impl Args {
    fn scene_config(&self) -> SceneConfig {
        let mut config = SceneConfig::preset(self.preset);
        if let Some(n) = self.count {
            config = config.with_count(n);
        }
        config.show_shadow_frustum = self.shadow_frustum;
        config.show_axes = !self.no_axes;
        config
    }
}

/// Wheel delta in notches, positive zooming out.
fn wheel_steps(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y,
        MouseScrollDelta::PixelDelta(p) => pixel_wheel_notches(-p.y),
    }
}

fn logical_size(size: PhysicalSize<u32>, scale: f64) -> (u32, u32) {
    let logical: LogicalSize<f64> = size.to_logical(scale);
    (logical.width.round() as u32, logical.height.round() as u32)
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();
    let args = Args::parse();
    let config = args.scene_config();
    log::info!(
        "[native] preset {} ({} instances)",
        args.preset,
        config.arrangement.count()
    );

    let event_loop = EventLoop::new().context("event loop")?;
    let window = WindowBuilder::new()
        .with_title(format!("halo ({})", args.preset))
        .with_inner_size(LogicalSize::new(1024.0, 768.0))
        .build(&event_loop)
        .context("window")?;

    let scale = window.scale_factor();
    let (width, height) = logical_size(window.inner_size(), scale);
    let stage = Stage::new(&config, width, height, scale as f32)?;
    let setup = config
        .animation
        .build(&config.arrangement, stage.scene().instances())?;

    let renderer = pollster::block_on(create_renderer(&window, &config))
        .map_err(|e| SceneError::BackendUnavailable(format!("{e:#}")))?;
    let mut render_loop = RenderLoop::new(stage, setup.driver, renderer, SystemClock::new());

    let mut ticker = match setup.timeline {
        Some(timeline) => Some(Ticker::spawn(timeline, args.tick_hz).context("ticker thread")?),
        None => None,
    };

    let window_ref = &window;
    let mut drag = DragTracker::default();
    let mut cursor = (0.0_f32, 0.0_f32);
    let mut fatal: Option<SceneError> = None;
    event_loop.run(|event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => {
                render_loop.cancel();
                elwt.exit();
            }
            WindowEvent::Resized(size) => {
                let scale = window_ref.scale_factor();
                let (w, h) = logical_size(size, scale);
                render_loop.on_resize(w, h, scale as f32);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let (w, h) = logical_size(window_ref.inner_size(), scale_factor);
                render_loop.on_resize(w, h, scale_factor as f32);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => drag.press(MOUSE_POINTER, cursor.0, cursor.1),
                ElementState::Released => drag.release(MOUSE_POINTER),
            },
            WindowEvent::CursorMoved { position, .. } => {
                let PhysicalPosition { x, y } = position;
                let scale = window_ref.scale_factor();
                cursor = ((x / scale) as f32, (y / scale) as f32);
                if let Some((dx, dy)) = drag.moved(MOUSE_POINTER, cursor.0, cursor.1) {
                    render_loop.on_drag(dx, dy);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => render_loop.on_zoom(wheel_steps(delta)),
            _ => {}
        },
        Event::AboutToWait => match render_loop.tick() {
            Ok(TickOutcome::Continue) => window_ref.request_redraw(),
            Ok(TickOutcome::Stopped) => elwt.exit(),
            Err(e) => {
                fatal = Some(e);
                elwt.exit();
            }
        },
        _ => {}
    })?;

    if let Some(t) = ticker.as_mut() {
        t.stop();
    }
    match fatal {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

async fn create_renderer<'w>(
    window: &'w Window,
    config: &SceneConfig,
) -> anyhow::Result<GpuRenderer<'w>> {
    let instance = wgpu::Instance::default();
    let surface = instance.create_surface(window)?;
    let size = window.inner_size();
    GpuRenderer::new(
        &instance,
        surface,
        size.width,
        size.height,
        config.clear_color,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_up_zooms_in() {
        assert_eq!(wheel_steps(MouseScrollDelta::LineDelta(0.0, 1.0)), -1.0);
        let px = MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -250.0));
        assert_eq!(wheel_steps(px), 2.5);
    }

    #[test]
    fn logical_size_divides_by_scale() {
        assert_eq!(logical_size(PhysicalSize::new(1600, 1200), 2.0), (800, 600));
    }

    #[test]
    fn args_build_the_requested_preset() {
        let args = Args::parse_from(["halo", "--preset", "grid", "-n", "3", "--no-axes"]);
        let config = args.scene_config();
        assert_eq!(config.arrangement.count(), 27);
        assert!(!config.show_axes);
        assert_eq!(args.tick_hz, TICKER_HZ);
    }
}
