use crate::lifecycle::MatchOutcome;

/// Fixed-interval frame gate.
///
/// One simulation tick per display frame at most; remainder time is carried
/// to the next frame so the tick rate does not drift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    tick_ms: f64,
    last_ms: f64,
}

impl FrameClock {
    pub fn new(tick_ms: f64, now_ms: u64) -> Self {
        Self {
            tick_ms,
            last_ms: now_ms as f64,
        }
    }

    /// Restart timing from `now_ms`, dropping any accumulated time
    pub fn resync(&mut self, now_ms: u64) {
        self.last_ms = now_ms as f64;
    }

    /// True when a tick is due at `now_ms`
    pub fn advance(&mut self, now_ms: u64) -> bool {
        let now = now_ms as f64;
        let delta = now - self.last_ms;
        if delta < self.tick_ms {
            return false;
        }
        self.last_ms = now - delta % self.tick_ms;
        true
    }
}

/// What one display-refresh callback did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Not started, or too early for the next tick
    Idle,
    /// Inside a pause window; render only
    Paused,
    /// One tick simulated
    Stepped,
    /// This tick ended the match
    Finished(MatchOutcome),
    /// Torn down or already over
    Halted,
}

impl FrameOutcome {
    /// Whether the host should schedule another frame
    pub fn keeps_running(&self) -> bool {
        !matches!(self, FrameOutcome::Finished(_) | FrameOutcome::Halted)
    }
}
