use serde::{Deserialize, Serialize};

/// Elapsed-time accumulator driving every periodic mechanic.
///
/// A timer only advances while not paused. With an interval set, the
/// accumulated time wraps back to zero once it passes that interval;
/// a non-positive interval means the timer never auto-resets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    time: f32,
    paused: bool,
    interval: Option<f32>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interval(interval_s: f32) -> Self {
        Self {
            interval: (interval_s > 0.0).then_some(interval_s),
            ..Self::default()
        }
    }

    /// Advances the timer by `dt` seconds unless paused.
    pub fn update(&mut self, dt: f32) {
        if self.paused {
            return;
        }
        self.time += dt.max(0.0);
        if let Some(interval) = self.interval {
            if self.time > interval {
                self.reset();
            }
        }
    }

    /// True once the timer has reached `seconds`.
    #[inline]
    pub fn elapsed(&self, seconds: f32) -> bool {
        self.time >= seconds
    }

    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn reset(&mut self) {
        self.time = 0.0;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Pause and reset in one step.
    pub fn stop(&mut self) {
        self.pause();
        self.reset();
    }
}
