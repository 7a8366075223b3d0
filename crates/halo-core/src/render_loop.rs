//! The per-frame driver tying animation, camera and backend together.
//!
//! The loop does not own a timer. Hosts call [`RenderLoop::tick`] from their
//! display callback (`requestAnimationFrame`, winit redraw) and re-arm the
//! callback only while the tick reports [`TickOutcome::Continue`].

use crate::animation::{AnimationDriver, FrameTime};
use crate::camera::Camera;
use crate::error::{Result, SceneError};
use crate::scene::Scene;
use crate::stage::Stage;
use crate::viewport::Viewport;
use instant::Instant;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Drawing surface the loop submits frames to.
pub trait RenderBackend {
    /// Logical size plus pixel scale; the backend sizes its buffers to
    /// `width * pixel_scale` by `height * pixel_scale`.
    fn resize(&mut self, width: u32, height: u32, pixel_scale: f32);
    /// Draw one frame. Errors are fatal to the loop.
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<()>;
}

/// Monotonic time source in seconds.
pub trait Clock {
    fn now_secs(&mut self) -> f64;
}

pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_secs(&mut self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Cancelled,
}

/// Cloneable stop signal. Once cancelled it stays cancelled.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// A frame was submitted; schedule the next tick.
    Continue,
    /// The loop is cancelled; do not schedule again.
    Stopped,
}

pub struct RenderLoop<B: RenderBackend, C: Clock = SystemClock> {
    stage: Stage,
    driver: Box<dyn AnimationDriver>,
    backend: B,
    clock: C,
    state: LoopState,
    cancel: CancelToken,
    start_secs: Option<f64>,
    last_secs: f64,
    frame: u64,
}

impl<B: RenderBackend, C: Clock> RenderLoop<B, C> {
    pub fn new(stage: Stage, driver: Box<dyn AnimationDriver>, mut backend: B, clock: C) -> Self {
        let vp = stage.viewport();
        backend.resize(vp.width, vp.height, vp.pixel_scale);
        Self {
            stage,
            driver,
            backend,
            clock,
            state: LoopState::Running,
            cancel: CancelToken::new(),
            start_secs: None,
            last_secs: 0.0,
            frame: 0,
        }
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn cancel(&mut self) {
        self.cancel.cancel();
        self.sync_state();
    }

    pub fn state(&mut self) -> LoopState {
        self.sync_state();
        self.state
    }

    fn sync_state(&mut self) {
        if self.state == LoopState::Running && self.cancel.is_cancelled() {
            self.state = LoopState::Cancelled;
            log::info!("[loop] cancelled after {} frames", self.frame);
        }
    }

    /// Run one iteration: advance animation, integrate camera damping and
    /// submit the frame. A backend error cancels the loop and is returned.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        self.sync_state();
        if self.state == LoopState::Cancelled {
            return Ok(TickOutcome::Stopped);
        }

        let now = self.clock.now_secs();
        let start = *self.start_secs.get_or_insert(now);
        let elapsed = now - start;
        let delta = if self.frame == 0 {
            0.0
        } else {
            (elapsed - self.last_secs).max(0.0)
        };
        self.last_secs = elapsed;
        let time = FrameTime {
            elapsed: elapsed as f32,
            delta: delta as f32,
            frame: self.frame,
        };

        self.driver
            .advance(time, self.stage.scene_mut().instances_mut());
        self.stage.rig_mut().integrate();

        if let Err(e) = self
            .backend
            .render(self.stage.scene(), self.stage.rig().camera())
        {
            log::error!("[loop] frame {} failed: {}", self.frame, e);
            self.cancel.cancel();
            self.sync_state();
            return Err(match e {
                SceneError::Backend(_) => e,
                other => SceneError::Backend(other.to_string()),
            });
        }
        self.frame += 1;
        Ok(TickOutcome::Continue)
    }

    /// Host resize signal; camera and backend see the new size immediately.
    pub fn on_resize(&mut self, width: u32, height: u32, system_scale: f32) -> Viewport {
        let vp = self.stage.on_resize(width, height, system_scale);
        self.backend.resize(vp.width, vp.height, vp.pixel_scale);
        vp
    }

    pub fn on_drag(&mut self, dx: f32, dy: f32) {
        self.stage.on_drag(dx, dy);
    }

    pub fn on_zoom(&mut self, steps: f32) {
        self.stage.on_zoom(steps);
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }
}
