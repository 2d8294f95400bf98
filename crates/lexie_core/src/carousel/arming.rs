//! Call-to-action arming for promotional slides.
//!
//! Any scroll disarms immediately and starts a settle timer. A settled
//! carousel starts a dwell timer; when the dwell completes and the centered
//! slide is promotional, that slide is armed. Tokens make stale timers inert.

/// Where the arming sequence currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArmPhase {
    /// Nothing scheduled
    #[default]
    Idle,
    /// Waiting for scrolling to stop
    Settling,
    /// Waiting out the dwell on the centered slide
    Dwelling,
}

/// Identifies the timer that belongs to the current sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmToken(u64);

/// Arming state of one carousel.
#[derive(Debug, Clone, Default)]
pub struct ArmingState {
    phase: ArmPhase,
    generation: u64,
    armed: Option<usize>,
}

impl ArmingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ArmPhase {
        self.phase
    }

    /// Currently armed slide, as a padded track index.
    pub fn armed(&self) -> Option<usize> {
        self.armed
    }

    /// Start a sequence for the initial position, without a scroll.
    ///
    /// Nothing is armed yet, so only the settle token is returned.
    pub fn start(&mut self) -> ArmToken {
        self.generation += 1;
        self.phase = ArmPhase::Settling;
        ArmToken(self.generation)
    }

    /// A scroll happened: disarm and start settling.
    ///
    /// Returns the slide that was armed (if any) and the token for the
    /// settle timer.
    pub fn on_scroll(&mut self) -> (Option<usize>, ArmToken) {
        self.generation += 1;
        self.phase = ArmPhase::Settling;
        (self.armed.take(), ArmToken(self.generation))
    }

    /// The settle timer fired. Returns the token for the dwell timer.
    pub fn on_settled(&mut self, token: ArmToken) -> Option<ArmToken> {
        if token.0 != self.generation || self.phase != ArmPhase::Settling {
            return None;
        }
        self.phase = ArmPhase::Dwelling;
        Some(token)
    }

    /// The dwell timer fired with `centered` in view.
    ///
    /// Returns the slide to arm.
    pub fn on_dwell(&mut self, token: ArmToken, centered: usize, promotional: bool) -> Option<usize> {
        if token.0 != self.generation || self.phase != ArmPhase::Dwelling {
            return None;
        }
        self.phase = ArmPhase::Idle;
        if promotional {
            self.armed = Some(centered);
        }
        self.armed
    }
}
