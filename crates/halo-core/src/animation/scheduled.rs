//! Scheduled animation: declarative tweens with per-instance stagger.
//!
//! The [`Timeline`] owns the tween records and a clock. A ticker advances
//! the clock at its own cadence through a [`TimelineHandle`]; the render
//! loop samples whatever the timeline currently holds through
//! [`ScheduledDriver`]. The ticker never touches instances.

use super::easing::Easing;
use super::tween::{AttributePath, Repeat, TweenRequest};
use super::{AnimationDriver, FrameTime};
use crate::error::Result;
use crate::scene::Instance;
use fnv::FnvHashMap;
use smallvec::SmallVec;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Handle to an accepted tween request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(u64);

#[derive(Clone, Debug)]
struct InstanceTrack {
    delay: f32,
    start_value: Option<f32>,
    finished: bool,
}

#[derive(Clone, Debug)]
struct TweenBatch {
    path: AttributePath,
    from: Option<f32>,
    to: f32,
    duration: f32,
    easing: Easing,
    repeat: Repeat,
    yoyo: bool,
    /// Timeline clock value when the request was accepted.
    start: f64,
    tracks: Vec<InstanceTrack>,
}

impl TweenBatch {
    /// Progress in [0, 1] at local time `lt`, and whether all iterations
    /// have completed.
    fn progress(&self, lt: f32) -> (f32, bool) {
        let iteration = (lt / self.duration).floor();
        let iterations = match self.repeat {
            Repeat::Times(n) => Some(n as f32 + 1.0),
            Repeat::Infinite => None,
        };
        if let Some(total) = iterations {
            if iteration >= total {
                let last_reversed = self.yoyo && (total as u64 - 1) % 2 == 1;
                return (if last_reversed { 0.0 } else { 1.0 }, true);
            }
        }
        let mut p = (lt - iteration * self.duration) / self.duration;
        if self.yoyo && (iteration as u64) % 2 == 1 {
            p = 1.0 - p;
        }
        (p.clamp(0.0, 1.0), false)
    }

    fn apply(&mut self, clock: f64, instances: &mut [Instance]) {
        let elapsed = (clock - self.start) as f32;
        for inst in instances.iter_mut() {
            let Some(track) = self.tracks.get(inst.index) else {
                continue;
            };
            if track.finished {
                continue;
            }
            let lt = elapsed - track.delay;
            if lt < 0.0 {
                // Explicit start values show while the stagger delay runs.
                if let Some(from) = self.from {
                    self.path.write(inst, from);
                }
                continue;
            }
            let (p, done) = self.progress(lt);
            let path = self.path;
            let from = self.from;
            let track = &mut self.tracks[inst.index];
            let start = *track
                .start_value
                .get_or_insert_with(|| from.unwrap_or_else(|| path.read(inst)));
            let value = start + (self.to - start) * self.easing.apply(p);
            path.write(inst, value);
            track.finished = done;
        }
    }

    fn is_finished(&self) -> bool {
        self.tracks.iter().all(|t| t.finished)
    }
}

/// Tween records plus the clock that drives them.
#[derive(Debug)]
pub struct Timeline {
    instance_count: usize,
    grid: Option<[usize; 3]>,
    clock: f64,
    next_id: u64,
    batches: FnvHashMap<AnimationId, TweenBatch>,
}

impl Timeline {
    pub fn new(instance_count: usize) -> Self {
        Self {
            instance_count,
            grid: None,
            clock: 0.0,
            next_id: 0,
            batches: FnvHashMap::default(),
        }
    }

    /// Declare that instances were generated as a grid so `StaggerOrder::Grid`
    /// can use cell distances.
    pub fn with_grid(mut self, dims: [usize; 3]) -> Self {
        self.grid = Some(dims);
        self
    }

    /// Accept a tween request for all instances. Invalid requests are
    /// rejected without affecting running animations.
    pub fn request(&mut self, req: &TweenRequest) -> Result<AnimationId> {
        let path = match req.validate() {
            Ok(path) => path,
            Err(e) => {
                log::warn!("[timeline] rejected request on '{}': {}", req.target, e);
                return Err(e);
            }
        };
        let tracks = req
            .stagger
            .delays(self.instance_count, self.grid)
            .into_iter()
            .map(|delay| InstanceTrack {
                delay,
                start_value: None,
                finished: false,
            })
            .collect();
        let id = AnimationId(self.next_id);
        self.next_id += 1;
        self.batches.insert(
            id,
            TweenBatch {
                path,
                from: req.from,
                to: req.to,
                duration: req.duration,
                easing: req.easing,
                repeat: req.repeat,
                yoyo: req.yoyo,
                start: self.clock,
                tracks,
            },
        );
        log::info!(
            "[timeline] {:?}: {} -> {} over {}s (repeat {:?}, yoyo {}, stagger {}s)",
            id,
            path,
            req.to,
            req.duration,
            req.repeat,
            req.yoyo,
            req.stagger.amount
        );
        Ok(id)
    }

    /// Advance the clock. Called by the ticker, not by the render loop.
    pub fn tick(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.clock += dt as f64;
        }
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn kill(&mut self, id: AnimationId) -> bool {
        self.batches.remove(&id).is_some()
    }

    pub fn is_active(&self, id: AnimationId) -> bool {
        self.batches.contains_key(&id)
    }

    pub fn active_count(&self) -> usize {
        self.batches.len()
    }

    /// Per-instance start delays of an active request.
    pub fn delays(&self, id: AnimationId) -> Option<Vec<f32>> {
        self.batches
            .get(&id)
            .map(|b| b.tracks.iter().map(|t| t.delay).collect())
    }

    /// Write the current value of every running tween into `instances`.
    /// Later requests win where paths overlap. Completed requests are
    /// dropped after their final value has been written.
    pub fn sample(&mut self, instances: &mut [Instance]) {
        let mut ids: SmallVec<[AnimationId; 8]> = self.batches.keys().copied().collect();
        ids.sort_unstable();
        let clock = self.clock;
        for id in ids {
            let finished = match self.batches.get_mut(&id) {
                Some(batch) => {
                    batch.apply(clock, instances);
                    batch.is_finished()
                }
                None => false,
            };
            if finished {
                self.batches.remove(&id);
                log::debug!("[timeline] {:?} completed", id);
            }
        }
    }
}

/// Shared timeline, written by a ticker and read by the render loop.
#[derive(Clone, Debug)]
pub struct TimelineHandle(Arc<Mutex<Timeline>>);

impl TimelineHandle {
    pub fn new(timeline: Timeline) -> Self {
        Self(Arc::new(Mutex::new(timeline)))
    }

    /// Lock the timeline. A panic on another thread while holding the lock
    /// leaves tween state usable, so poisoning is ignored.
    pub fn lock(&self) -> MutexGuard<'_, Timeline> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn request(&self, req: &TweenRequest) -> Result<AnimationId> {
        self.lock().request(req)
    }

    pub fn tick(&self, dt: f32) {
        self.lock().tick(dt);
    }
}

/// Render-side view of a shared timeline.
#[derive(Clone, Debug)]
pub struct ScheduledDriver {
    timeline: TimelineHandle,
}

impl ScheduledDriver {
    pub fn new(timeline: TimelineHandle) -> Self {
        Self { timeline }
    }

    pub fn timeline(&self) -> &TimelineHandle {
        &self.timeline
    }
}

impl AnimationDriver for ScheduledDriver {
    fn advance(&mut self, _time: FrameTime, instances: &mut [Instance]) {
        self.timeline.lock().sample(instances);
    }
}
