//! Drop scheduler - the repeating gravity timer owned by a game session
//!
//! The scheduler does not read a clock. The owner feeds it elapsed milliseconds and
//! it reports when a gravity step is due, which keeps it deterministic and lets the
//! same type back both the fixed-timestep `tick` loop and the async session runtime.

/// Repeating timer with a single interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DropScheduler {
    interval_ms: u32,
    elapsed_ms: u32,
    running: bool,
}

impl DropScheduler {
    /// Create a stopped scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Start ticking every `interval_ms`, counting from zero
    pub fn start(&mut self, interval_ms: u32) {
        self.interval_ms = interval_ms.max(1);
        self.elapsed_ms = 0;
        self.running = true;
    }

    /// Stop ticking; progress toward the next tick is discarded
    pub fn stop(&mut self) {
        self.elapsed_ms = 0;
        self.running = false;
    }

    /// Stop and start again with a new interval
    pub fn restart(&mut self, interval_ms: u32) {
        self.stop();
        self.start(interval_ms);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Milliseconds until the next tick, or None while stopped
    pub fn remaining_ms(&self) -> Option<u32> {
        if !self.running {
            return None;
        }
        Some(self.interval_ms - self.elapsed_ms)
    }

    /// Advance by up to the remaining time
    ///
    /// Returns true when a tick became due; the timer then starts its next period.
    pub fn advance(&mut self, elapsed_ms: u32) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        if self.elapsed_ms >= self.interval_ms {
            self.elapsed_ms = 0;
            return true;
        }
        false
    }
}
