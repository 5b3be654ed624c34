//! Client-side rate limit between start/stop commands.

/// Seconds an operator must wait after a start/stop before issuing another.
pub const COOLDOWN_SECS: u32 = 15;

/// Countdown state. When inactive, `remaining` rests at [`COOLDOWN_SECS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cooldown {
    pub active: bool,
    pub remaining: u32,
}

impl Default for Cooldown {
    fn default() -> Self {
        Self::idle()
    }
}

impl Cooldown {
    pub fn idle() -> Self {
        Self {
            active: false,
            remaining: COOLDOWN_SECS,
        }
    }

    /// Restart the countdown from the full duration.
    pub fn arm(&mut self) {
        self.active = true;
        self.remaining = COOLDOWN_SECS;
    }

    /// Advance by one second. Returns `true` while the cooldown is still
    /// running after the tick.
    pub fn tick(&mut self) -> bool {
        if !self.active {
            return false;
        }
        if self.remaining <= 1 {
            *self = Self::idle();
            return false;
        }
        self.remaining -= 1;
        true
    }
}
