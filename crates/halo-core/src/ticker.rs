//! Background ticker that advances a shared timeline at a fixed rate.
//!
//! Native only; the web frontend drives the timeline from `setInterval`.

use crate::animation::TimelineHandle;
use instant::Instant;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub struct Ticker {
    stop_flag: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Spawn a thread that ticks `timeline` with measured wall-clock deltas
    /// roughly `hz` times per second.
    pub fn spawn(timeline: TimelineHandle, hz: u32) -> std::io::Result<Self> {
        let stop_flag = Arc::new(AtomicBool::new(false));
        let stop = Arc::clone(&stop_flag);
        let frame_duration = Duration::from_micros(1_000_000 / u64::from(hz.max(1)));
        let handle = thread::Builder::new()
            .name("timeline-ticker".into())
            .spawn(move || {
                let mut last = Instant::now();
                while !stop.load(Ordering::Relaxed) {
                    let start = Instant::now();
                    let dt = (start - last).as_secs_f32();
                    last = start;
                    timeline.tick(dt);

                    let elapsed = start.elapsed();
                    if elapsed < frame_duration {
                        thread::sleep(frame_duration - elapsed);
                    }
                }
            })?;
        log::info!("[ticker] started at {} Hz", hz);
        Ok(Self {
            stop_flag,
            thread_handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.thread_handle.is_some()
    }

    /// Stop the thread and wait for it to exit.
    pub fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread_handle.take() {
            _ = handle.join();
            log::info!("[ticker] stopped");
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
