// Debate-room countdown.
//
// Pure state only: the scheduled ticker that drives `tick()` lives with the
// session that owns the countdown, so this type never touches a clock.

/// Result of delivering one tick to a [`Countdown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The countdown is stopped or already expired; the tick was ignored.
    Ignored,
    /// One unit elapsed and time remains.
    Running { remaining: u32 },
    /// This tick reached zero. Reported exactly once per countdown.
    Expired,
}

/// Countdown over whole time units with a one-shot expiry latch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    duration: u32,
    remaining: u32,
    running: bool,
    expired: bool,
}

impl Countdown {
    pub fn new(duration: u32) -> Self {
        Countdown {
            duration,
            remaining: duration,
            running: false,
            expired: false,
        }
    }

    /// Begin (or resume) counting. Has no effect once expired.
    pub fn start(&mut self) {
        if !self.expired {
            self.running = true;
        }
    }

    /// Pause counting without resetting the remaining time.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Deliver one tick.
    pub fn tick(&mut self) -> Tick {
        if !self.running || self.expired {
            return Tick::Ignored;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            self.expired = true;
            Tick::Expired
        } else {
            Tick::Running {
                remaining: self.remaining,
            }
        }
    }

    /// Force expiry ahead of time (the user ends the debate early).
    ///
    /// Returns `true` only for the call that actually latched expiry, so a
    /// caller can use it as the same one-shot trigger as [`Tick::Expired`].
    pub fn expire(&mut self) -> bool {
        if self.expired {
            return false;
        }
        self.remaining = 0;
        self.running = false;
        self.expired = true;
        true
    }

    /// Restore the full duration, stopped and un-expired.
    pub fn reset(&mut self) {
        self.remaining = self.duration;
        self.running = false;
        self.expired = false;
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn has_expired(&self) -> bool {
        self.expired
    }
}

/// Format seconds as `MM:SS`. Minutes are not capped at 59.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
