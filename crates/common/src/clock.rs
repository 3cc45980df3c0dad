//! Clock and timing utilities for scroll sampling.
//!
//! Scroll event timestamps are milliseconds relative to the page's time
//! origin, matching DOM high-resolution event times. This module provides:
//! - A page clock anchored at a monotonic epoch
//! - A frame clock that places frame callbacks on a fixed vsync grid

use std::time::Instant;

/// A page clock that provides monotonic millisecond timestamps relative to
/// a fixed epoch (the page's time origin).
#[derive(Debug, Clone)]
pub struct PageClock {
    /// The instant the page clock started.
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339 string).
    epoch_wall: String,
}

impl PageClock {
    /// Create a new page clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Milliseconds elapsed since the time origin.
    pub fn elapsed_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1_000.0
    }

    /// Wall-clock time at the time origin.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }
}

/// Places frame callbacks on a fixed grid of `1000 / hz` milliseconds,
/// the way a display's refresh drives animation frames.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    interval_ms: f64,
}

impl FrameClock {
    /// Create a clock for the given refresh rate. A zero rate is treated as 1 Hz.
    pub fn new(target_hz: u32) -> Self {
        Self {
            interval_ms: 1_000.0 / target_hz.max(1) as f64,
        }
    }

    /// Frame interval in milliseconds.
    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Index of the frame interval containing `t_ms`.
    pub fn frame_index(&self, t_ms: f64) -> u64 {
        (t_ms.max(0.0) / self.interval_ms).floor() as u64
    }

    /// Time of the first frame boundary strictly after `t_ms`.
    ///
    /// A callback requested at `t_ms` runs at this time.
    pub fn next_boundary_after(&self, t_ms: f64) -> f64 {
        (self.frame_index(t_ms) + 1) as f64 * self.interval_ms
    }
}
