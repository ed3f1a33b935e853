//! Frame clock for the display-refresh driven loop.
//!
//! Flight, hover and pulse all advance by fixed per-frame steps, so the clock is
//! only used for frame counting and diagnostics, never to scale motion.

use std::time::{Duration, Instant};

/// How often the averaged frame rate is reported.
const FPS_WINDOW: Duration = Duration::from_secs(1);

/// Tracks frame count, frame delta and a windowed average frame rate.
#[derive(Debug)]
pub struct Time {
    start_time: Instant,
    last_frame: Instant,
    delta: Duration,
    frame_count: u64,
    window_start: Instant,
    window_frames: u32,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_frame: now,
            delta: Duration::ZERO,
            frame_count: 0,
            window_start: now,
            window_frames: 0,
        }
    }

    /// Mark the start of a new frame.
    pub fn update(&mut self) {
        self.advance(Instant::now());
    }

    fn advance(&mut self, now: Instant) {
        self.delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.frame_count += 1;
        self.window_frames += 1;
    }

    /// Delta of the last frame in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Seconds since the clock was created.
    pub fn elapsed_seconds(&self) -> f32 {
        self.last_frame.saturating_duration_since(self.start_time).as_secs_f32()
    }

    /// Number of frames started so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Average frame rate over the last window, returned once per window.
    pub fn take_fps_sample(&mut self) -> Option<f32> {
        let span = self.last_frame.saturating_duration_since(self.window_start);
        if span < FPS_WINDOW || self.window_frames == 0 {
            return None;
        }
        let fps = self.window_frames as f32 / span.as_secs_f32();
        self.window_start = self.last_frame;
        self.window_frames = 0;
        Some(fps)
    }
}
