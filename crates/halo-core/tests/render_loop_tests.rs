// Render loop state machine: tick ordering, cancellation and fatal backend
// errors, driven by a mock backend and a manual clock.

use halo_core::animation::{AnimationDriver, FrameTime};
use halo_core::camera::Camera;
use halo_core::config::SceneConfig;
use halo_core::render_loop::{Clock, LoopState, RenderBackend, RenderLoop, TickOutcome};
use halo_core::scene::{Instance, Scene};
use halo_core::stage::Stage;
use halo_core::SceneError;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Default)]
struct Calls {
    advances: Cell<usize>,
    renders: Cell<usize>,
    resizes: RefCell<Vec<(u32, u32, f32)>>,
    times: RefCell<Vec<FrameTime>>,
}

struct MockBackend {
    calls: Rc<Calls>,
    fail_on: Option<usize>,
}

impl RenderBackend for MockBackend {
    fn resize(&mut self, width: u32, height: u32, pixel_scale: f32) {
        self.calls
            .resizes
            .borrow_mut()
            .push((width, height, pixel_scale));
    }

    fn render(&mut self, scene: &Scene, _camera: &Camera) -> halo_core::Result<()> {
        let n = self.calls.renders.get();
        if self.fail_on == Some(n) {
            return Err(SceneError::Backend("surface lost".into()));
        }
        assert!(!scene.is_empty());
        self.calls.renders.set(n + 1);
        Ok(())
    }
}

struct CountingDriver {
    calls: Rc<Calls>,
}

impl AnimationDriver for CountingDriver {
    fn advance(&mut self, time: FrameTime, _instances: &mut [Instance]) {
        self.calls.advances.set(self.calls.advances.get() + 1);
        self.calls.times.borrow_mut().push(time);
    }
}

struct ManualClock(Rc<Cell<f64>>);

impl Clock for ManualClock {
    fn now_secs(&mut self) -> f64 {
        self.0.get()
    }
}

type TestLoop = RenderLoop<MockBackend, ManualClock>;

fn build(fail_on: Option<usize>) -> (TestLoop, Rc<Calls>, Rc<Cell<f64>>) {
    let calls = Rc::new(Calls::default());
    let now = Rc::new(Cell::new(100.0));
    let stage = Stage::new(&SceneConfig::default(), 800, 600, 1.0).unwrap();
    let render_loop = RenderLoop::new(
        stage,
        Box::new(CountingDriver {
            calls: calls.clone(),
        }),
        MockBackend {
            calls: calls.clone(),
            fail_on,
        },
        ManualClock(now.clone()),
    );
    (render_loop, calls, now)
}

#[test]
fn backend_is_sized_before_the_first_frame() {
    let (_loop, calls, _) = build(None);
    assert_eq!(*calls.resizes.borrow(), vec![(800, 600, 1.0)]);
    assert_eq!(calls.renders.get(), 0);
}

#[test]
fn each_tick_advances_then_renders_once() {
    let (mut render_loop, calls, now) = build(None);
    for i in 0..5 {
        assert_eq!(render_loop.tick().unwrap(), TickOutcome::Continue);
        now.set(now.get() + 0.016);
        assert_eq!(calls.advances.get(), i + 1);
        assert_eq!(calls.renders.get(), i + 1);
    }
    assert_eq!(render_loop.frame_count(), 5);
    assert_eq!(render_loop.state(), LoopState::Running);
}

#[test]
fn frame_time_starts_at_zero_and_tracks_the_clock() {
    let (mut render_loop, calls, now) = build(None);
    render_loop.tick().unwrap();
    now.set(100.5);
    render_loop.tick().unwrap();
    now.set(100.75);
    render_loop.tick().unwrap();

    let times = calls.times.borrow();
    assert_eq!(times[0].elapsed, 0.0);
    assert_eq!(times[0].delta, 0.0);
    assert!((times[1].elapsed - 0.5).abs() < 1e-6);
    assert!((times[1].delta - 0.5).abs() < 1e-6);
    assert!((times[2].delta - 0.25).abs() < 1e-6);
    assert_eq!(times[2].frame, 2);
}

#[test]
fn no_calls_after_cancellation() {
    let (mut render_loop, calls, _) = build(None);
    render_loop.tick().unwrap();
    render_loop.tick().unwrap();

    let token = render_loop.cancel_token();
    token.cancel();
    let (advances, renders) = (calls.advances.get(), calls.renders.get());
    for _ in 0..10 {
        assert_eq!(render_loop.tick().unwrap(), TickOutcome::Stopped);
    }
    assert_eq!(calls.advances.get(), advances);
    assert_eq!(calls.renders.get(), renders);
    assert_eq!(render_loop.state(), LoopState::Cancelled);
}

#[test]
fn cancel_is_one_way() {
    let (mut render_loop, _, _) = build(None);
    render_loop.cancel();
    render_loop.cancel();
    assert_eq!(render_loop.state(), LoopState::Cancelled);
    assert!(render_loop.cancel_token().is_cancelled());
    assert_eq!(render_loop.tick().unwrap(), TickOutcome::Stopped);
}

#[test]
fn backend_error_is_fatal_and_reported() {
    let (mut render_loop, calls, _) = build(Some(2));
    render_loop.tick().unwrap();
    render_loop.tick().unwrap();
    match render_loop.tick() {
        Err(SceneError::Backend(msg)) => assert!(msg.contains("surface lost")),
        other => panic!("expected backend error, got {other:?}"),
    }
    assert_eq!(render_loop.state(), LoopState::Cancelled);

    let advances = calls.advances.get();
    assert_eq!(render_loop.tick().unwrap(), TickOutcome::Stopped);
    assert_eq!(calls.advances.get(), advances);
    assert_eq!(calls.renders.get(), 2);
}

#[test]
fn resize_reaches_camera_and_backend_between_ticks() {
    let (mut render_loop, calls, _) = build(None);
    render_loop.tick().unwrap();
    let vp = render_loop.on_resize(1000, 500, 3.0);
    assert_eq!(vp.pixel_scale, 2.0);
    assert_eq!(calls.resizes.borrow().last(), Some(&(1000, 500, 2.0)));
    assert!((render_loop.stage().rig().camera().aspect - 2.0).abs() < 1e-6);
}

#[test]
fn pointer_input_moves_the_camera_on_the_next_tick() {
    let (mut render_loop, _, _) = build(None);
    render_loop.tick().unwrap();
    let eye = render_loop.stage().rig().camera().eye;
    render_loop.on_drag(120.0, -40.0);
    render_loop.on_zoom(2.0);
    assert_eq!(render_loop.stage().rig().camera().eye, eye);
    render_loop.tick().unwrap();
    assert_ne!(render_loop.stage().rig().camera().eye, eye);
}
