//! Autoplay interval parsing and pause bookkeeping.

use std::time::Duration;

/// Parse a `data-autoplay` value in milliseconds.
///
/// A missing or blank attribute means `default`. Anything that is not a
/// positive finite number disables autoplay.
pub fn parse_interval(attr: Option<&str>, default: Option<Duration>) -> Option<Duration> {
    let raw = attr.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return default;
    }
    match raw.parse::<f64>() {
        Ok(ms) if ms.is_finite() && ms > 0.0 => Some(Duration::from_secs_f64(ms / 1000.0)),
        _ => None,
    }
}

/// Token for one user-interaction hold. Only the latest token releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldToken(u64);

/// Why autoplay is currently held back.
#[derive(Debug, Clone, Default)]
pub struct AutoplayState {
    interval: Option<Duration>,
    hovered: bool,
    focused: bool,
    user_hold: Option<u64>,
    hold_seq: u64,
}

impl AutoplayState {
    /// Create state for an interval; `None` disables autoplay.
    pub fn new(interval: Option<Duration>) -> Self {
        Self {
            interval,
            ..Self::default()
        }
    }

    /// Configured interval, if autoplay is enabled.
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub fn is_enabled(&self) -> bool {
        self.interval.is_some()
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Pause for a pointer, touch or wheel interaction.
    ///
    /// Each call supersedes the previous hold; the caller schedules
    /// [`release_hold`](Self::release_hold) with the returned token.
    pub fn hold_for_user(&mut self) -> HoldToken {
        self.hold_seq += 1;
        self.user_hold = Some(self.hold_seq);
        HoldToken(self.hold_seq)
    }

    /// End a user hold. Stale tokens are ignored.
    pub fn release_hold(&mut self, token: HoldToken) -> bool {
        if self.user_hold == Some(token.0) {
            self.user_hold = None;
            true
        } else {
            false
        }
    }

    /// Whether ticks should be skipped right now.
    pub fn is_paused(&self) -> bool {
        self.hovered || self.focused || self.user_hold.is_some()
    }

    /// Whether a tick should advance the carousel.
    pub fn should_advance(&self) -> bool {
        self.is_enabled() && !self.is_paused()
    }
}
