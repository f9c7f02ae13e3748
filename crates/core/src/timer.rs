//! Frame timing for the render loop.

use std::time::{Duration, Instant};

/// Window over which the frames-per-second figure is averaged.
const FPS_WINDOW: Duration = Duration::from_secs(1);

/// Measures per-frame deltas and a rolling frames-per-second figure.
#[derive(Debug)]
pub struct FrameTimer {
    start: Instant,
    last_frame: Instant,
    frame_count: u64,
    window_start: Instant,
    window_frames: u32,
}

impl FrameTimer {
    /// Create a timer starting now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            frame_count: 0,
            window_start: now,
            window_frames: 0,
        }
    }

    /// Total time since the timer was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Number of frames recorded so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Mark the end of a frame and return the time since the previous one.
    pub fn tick(&mut self) -> Duration {
        self.tick_at(Instant::now())
    }

    /// Like [`tick`](Self::tick) with an explicit timestamp.
    pub fn tick_at(&mut self, now: Instant) -> Duration {
        let delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.frame_count += 1;
        self.window_frames += 1;
        delta
    }

    /// Returns the average frames per second once a full window has elapsed,
    /// then starts a new window. Returns `None` while the window is still open.
    pub fn fps(&mut self) -> Option<f32> {
        self.fps_at(Instant::now())
    }

    /// Like [`fps`](Self::fps) with an explicit timestamp.
    pub fn fps_at(&mut self, now: Instant) -> Option<f32> {
        let span = now.saturating_duration_since(self.window_start);
        if span < FPS_WINDOW {
            return None;
        }
        let fps = self.window_frames as f32 / span.as_secs_f32();
        self.window_start = now;
        self.window_frames = 0;
        Some(fps)
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}
