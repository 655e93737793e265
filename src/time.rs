//! Frame clock and wall-clock helpers.
//!
//! `draw_web()` calls at ~60fps with variable delta. `FrameClock` turns the
//! `performance.now()` timestamps into elapsed seconds per frame. Production
//! is linear in time, so the delta is passed through unclamped: a tab that
//! was backgrounded for a minute is credited a minute.

pub struct FrameClock {
    /// Timestamp of the last update (ms), None if first frame
    last_timestamp: Option<f64>,
    /// Total elapsed seconds since creation
    pub total_seconds: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_timestamp: None,
            total_seconds: 0.0,
        }
    }

    /// Feed a monotonic timestamp in milliseconds. Returns the seconds
    /// elapsed since the previous call (0 on the first frame, and 0 if the
    /// clock went backwards).
    pub fn update(&mut self, now_ms: f64) -> f64 {
        let delta_ms = match self.last_timestamp {
            Some(prev) if now_ms > prev => now_ms - prev,
            _ => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        let seconds = delta_ms / 1000.0;
        self.total_seconds += seconds;
        seconds
    }
}

/// Counts elapsed play time and fires once per interval.
pub struct IntervalTimer {
    interval_secs: f64,
    elapsed_secs: f64,
}

impl IntervalTimer {
    pub fn new(interval_secs: f64) -> Self {
        Self {
            interval_secs,
            elapsed_secs: 0.0,
        }
    }

    /// Add elapsed time. Returns true when the interval has passed; the
    /// timer then starts over. A long gap fires once, not once per interval.
    pub fn advance(&mut self, delta_secs: f64) -> bool {
        self.elapsed_secs += delta_secs;
        if self.elapsed_secs >= self.interval_secs {
            self.elapsed_secs = 0.0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.elapsed_secs = 0.0;
    }
}

/// Milliseconds since the Unix epoch.
#[cfg(target_arch = "wasm32")]
pub fn wall_clock_ms() -> f64 {
    js_sys::Date::now()
}

/// Milliseconds since the Unix epoch.
#[cfg(not(target_arch = "wasm32"))]
pub fn wall_clock_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
