//! Scroll event gating for loop normalisation.
//!
//! A scroll event is either self-inflicted (inside a suppression window
//! opened by a programmatic scroll, or while a teleport holds the lock) and
//! ignored, or user-driven and (re)starts the debounce. When the debounce
//! elapses the gate decides whether normalisation may run.
//!
//! ```text
//! Idle --scroll--> Pending --settle--> Idle
//!   ^                 |
//!   |            suppress()
//!   +--window ends-- Suppressed
//! ```

use std::time::Duration;

use web_time::Instant;

use crate::constants::LOOP_DEBOUNCE;

/// Observable gate state at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePhase {
    /// No debounce outstanding
    Idle,
    /// Debounce running
    Pending,
    /// Inside a programmatic-scroll window
    Suppressed,
    /// A teleport is in flight until the next frame
    Locked,
}

/// What the caller should do with a scroll event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDecision {
    /// The event is self-inflicted
    Ignore,
    /// (Re)start the debounce timer with this delay
    Debounce(Duration),
}

/// Suppression window, debounce and re-entrancy lock of one track.
#[derive(Debug, Clone, Default)]
pub struct ScrollGate {
    suppressed_until: Option<Instant>,
    pending_due: Option<Instant>,
    locked: bool,
}

impl ScrollGate {
    /// Create an idle gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat scroll events as self-inflicted until `now + window`.
    ///
    /// A later call replaces the previous window, even if it ends sooner.
    pub fn suppress(&mut self, now: Instant, window: Duration) {
        self.suppressed_until = Some(now + window);
    }

    /// Whether `now` falls inside the suppression window.
    pub fn is_suppressed(&self, now: Instant) -> bool {
        self.suppressed_until.is_some_and(|until| now < until)
    }

    /// Whether a teleport currently holds the lock.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Whether the pending debounce has run its full delay.
    pub fn is_due(&self, now: Instant) -> bool {
        self.pending_due.is_some_and(|due| now >= due)
    }

    /// Current phase, lock first.
    pub fn phase(&self, now: Instant) -> GatePhase {
        if self.locked {
            GatePhase::Locked
        } else if self.is_suppressed(now) {
            GatePhase::Suppressed
        } else if self.pending_due.is_some() {
            GatePhase::Pending
        } else {
            GatePhase::Idle
        }
    }

    /// Classify a scroll event.
    pub fn on_scroll(&mut self, now: Instant) -> ScrollDecision {
        if self.locked || self.is_suppressed(now) {
            return ScrollDecision::Ignore;
        }
        self.pending_due = Some(now + LOOP_DEBOUNCE);
        ScrollDecision::Debounce(LOOP_DEBOUNCE)
    }

    /// Consume the pending debounce.
    ///
    /// Returns `true` when normalisation may run: a debounce was pending and
    /// neither the lock nor a suppression window is active.
    pub fn settle(&mut self, now: Instant) -> bool {
        if self.pending_due.take().is_none() {
            return false;
        }
        !self.locked && !self.is_suppressed(now)
    }

    /// Take the re-entrancy lock for a teleport.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Release the lock once the teleport has rendered.
    pub fn release_lock(&mut self) {
        self.locked = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_idle_scroll_debounces() {
        let t0 = Instant::now();
        let mut gate = ScrollGate::new();
        assert_eq!(gate.phase(t0), GatePhase::Idle);
        assert_eq!(gate.on_scroll(t0), ScrollDecision::Debounce(LOOP_DEBOUNCE));
        assert_eq!(gate.phase(t0), GatePhase::Pending);
        assert!(!gate.is_due(t0 + ms(100)));
        assert!(gate.is_due(t0 + LOOP_DEBOUNCE));
    }

    #[test]
    fn test_new_scroll_restarts_debounce() {
        let t0 = Instant::now();
        let mut gate = ScrollGate::new();
        gate.on_scroll(t0);
        gate.on_scroll(t0 + ms(100));
        assert!(!gate.is_due(t0 + LOOP_DEBOUNCE));
        assert!(gate.is_due(t0 + ms(100) + LOOP_DEBOUNCE));
    }

    #[test]
    fn test_suppressed_scroll_is_ignored() {
        let t0 = Instant::now();
        let mut gate = ScrollGate::new();
        gate.suppress(t0, ms(300));
        assert_eq!(gate.phase(t0 + ms(10)), GatePhase::Suppressed);
        assert_eq!(gate.on_scroll(t0 + ms(10)), ScrollDecision::Ignore);
        assert_eq!(gate.phase(t0 + ms(300)), GatePhase::Idle);
        assert!(matches!(
            gate.on_scroll(t0 + ms(300)),
            ScrollDecision::Debounce(_)
        ));
    }

    #[test]
    fn test_settle_refuses_inside_window() {
        let t0 = Instant::now();
        let mut gate = ScrollGate::new();
        gate.on_scroll(t0);
        gate.suppress(t0 + ms(50), ms(300));
        assert!(!gate.settle(t0 + ms(190)));
        // The pending debounce is consumed either way.
        assert!(!gate.settle(t0 + ms(500)));
    }

    #[test]
    fn test_settle_once_per_debounce() {
        let t0 = Instant::now();
        let mut gate = ScrollGate::new();
        gate.on_scroll(t0);
        assert!(gate.settle(t0 + LOOP_DEBOUNCE));
        assert!(!gate.settle(t0 + LOOP_DEBOUNCE));
        assert_eq!(gate.phase(t0 + LOOP_DEBOUNCE), GatePhase::Idle);
    }

    #[test]
    fn test_lock_blocks_until_released() {
        let t0 = Instant::now();
        let mut gate = ScrollGate::new();
        gate.lock();
        assert_eq!(gate.phase(t0), GatePhase::Locked);
        assert_eq!(gate.on_scroll(t0), ScrollDecision::Ignore);
        gate.release_lock();
        assert!(matches!(gate.on_scroll(t0), ScrollDecision::Debounce(_)));
    }
}
