//! Time management for the frame loop: the host clock plus frame-driven timers.
//!
//! Timers here never spawn OS timers; they advance only when the owner ticks them,
//! so dropping the owner releases them.

use std::time::{Duration, Instant};

/// Manages frame timing and delta time calculation.
#[derive(Debug)]
pub struct Time {
    /// Time when the client started.
    start_time: Instant,
    /// Time of the last frame.
    last_frame: Instant,
    /// Duration of the last frame.
    delta: Duration,
    /// Total elapsed time since start.
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
    /// Upper bound on a single frame's delta (a stalled host must not teleport fleets).
    max_delta: Duration,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new time manager.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_frame: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
            max_delta: Duration::from_millis(250),
        }
    }

    /// Update timing at the start of a new frame.
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta = (now - self.last_frame).min(self.max_delta);
        self.last_frame = now;
        self.elapsed = now - self.start_time;
        self.frame_count += 1;
    }

    /// Get the delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Rate limiter on a caller-supplied clock (seconds).
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    min_interval: f32,
    last: Option<f32>,
}

impl Throttle {
    pub fn new(min_interval: f32) -> Self {
        Self {
            min_interval,
            last: None,
        }
    }

    /// True (and records `now`) if at least `min_interval` passed since the last accepted call.
    pub fn ready(&mut self, now: f32) -> bool {
        match self.last {
            Some(last) if now - last < self.min_interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Record `now` unconditionally (a forced event still resets the window).
    pub fn force(&mut self, now: f32) {
        self.last = Some(now);
    }
}

/// Repeating frame-driven timer. Cancelled intervals never fire again.
#[derive(Debug, Clone, Copy)]
pub struct Interval {
    period: f32,
    remaining: f32,
    active: bool,
}

impl Interval {
    /// A started interval that first fires one `period` from now.
    pub fn new(period: f32) -> Self {
        let period = period.max(f32::EPSILON);
        Self {
            period,
            remaining: period,
            active: true,
        }
    }

    /// An interval that has not been armed yet.
    pub fn idle(period: f32) -> Self {
        Self {
            active: false,
            ..Self::new(period)
        }
    }

    /// Arm (or re-arm) the interval from zero.
    pub fn start(&mut self) {
        self.remaining = self.period;
        self.active = true;
    }

    pub fn cancel(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Advance by `dt`; returns how many times the interval fired.
    pub fn tick(&mut self, dt: f32) -> u32 {
        if !self.active {
            return 0;
        }
        self.remaining -= dt;
        let mut fired = 0;
        while self.remaining <= 0.0 {
            self.remaining += self.period;
            fired += 1;
        }
        fired
    }
}
