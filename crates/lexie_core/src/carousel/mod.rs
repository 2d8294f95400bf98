//! Hero carousel behaviour.
//!
//! [`Carousel`] owns a [`TrackSurface`], an optional [`LoopPlan`] and the
//! [`ScrollGate`]. Timers and DOM events live in the caller; this type only
//! decides what each event means for the track.

mod arming;
mod autoplay;
mod gate;
mod geometry;
mod looping;

#[cfg(test)]
mod tests;

pub use arming::{ArmPhase, ArmToken, ArmingState};
pub use autoplay::{AutoplayState, HoldToken, parse_interval};
pub use gate::{GatePhase, ScrollDecision, ScrollGate};
pub use geometry::{
    ScrollBehavior, Span, TrackSurface, center_delta, centered_index, clamp_index, measure_step,
};
pub use looping::{LoopPlan, PaddedSlide};

use web_time::Instant;

use crate::constants::{PROGRAMMATIC_SCROLL_WINDOW, TELEPORT_SCROLL_WINDOW};

/// An offset shift applied by loop normalisation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Teleport {
    pub from: f64,
    pub to: f64,
}

impl Teleport {
    pub fn delta(&self) -> f64 {
        self.to - self.from
    }
}

/// Centering, looping and gating over one track.
#[derive(Debug)]
pub struct Carousel<S> {
    surface: S,
    plan: Option<LoopPlan>,
    gate: ScrollGate,
}

impl<S: TrackSurface> Carousel<S> {
    /// Wrap a track that does not loop.
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            plan: None,
            gate: ScrollGate::new(),
        }
    }

    /// Wrap a track that has been padded according to `plan`.
    pub fn with_loop(surface: S, plan: Option<LoopPlan>) -> Self {
        Self {
            surface,
            plan,
            gate: ScrollGate::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn plan(&self) -> Option<LoopPlan> {
        self.plan
    }

    pub fn gate(&self) -> &ScrollGate {
        &self.gate
    }

    /// Pixel distance between consecutive slides, measured now.
    pub fn step(&self) -> f64 {
        measure_step(&self.surface.slide_offsets(), &self.surface.slide_spans())
    }

    /// Padded index of the slide nearest the track center.
    pub fn centered_index(&self) -> usize {
        centered_index(self.surface.track_span(), &self.surface.slide_spans())
    }

    /// Bring slide `idx` (clamped) to the track center.
    ///
    /// Opens a suppression window first so the resulting scroll events are
    /// not mistaken for user input.
    pub fn center_to_index(&mut self, idx: usize, behavior: ScrollBehavior, now: Instant) {
        let slides = self.surface.slide_spans();
        if slides.is_empty() {
            return;
        }
        let idx = clamp_index(idx, slides.len());
        let delta = center_delta(self.surface.track_span(), slides[idx]);
        self.gate.suppress(now, PROGRAMMATIC_SCROLL_WINDOW);
        self.surface.scroll_by(delta, behavior);
    }

    /// Center the slide after the current one.
    pub fn advance(&mut self, behavior: ScrollBehavior, now: Instant) {
        let next = self.centered_index() + 1;
        self.center_to_index(next, behavior, now);
    }

    /// Jump to the first real slide of a padded track without animation.
    pub fn jump_to_first_real(&mut self) {
        if let Some(plan) = self.plan {
            let step = self.step();
            self.surface.set_scroll_left(plan.start_offset(step));
        }
    }

    /// Classify a scroll event. Tracks without a loop never debounce.
    pub fn on_scroll(&mut self, now: Instant) -> ScrollDecision {
        if self.plan.is_none() {
            return ScrollDecision::Ignore;
        }
        self.gate.on_scroll(now)
    }

    /// Run loop normalisation after the debounce elapsed.
    ///
    /// On a teleport the lock is taken; call
    /// [`release_lock`](Self::release_lock) on the next animation frame.
    pub fn settle(&mut self, now: Instant) -> Option<Teleport> {
        if !self.gate.settle(now) {
            return None;
        }
        let plan = self.plan?;
        let step = self.step();
        let from = self.surface.scroll_left();
        let delta = plan.teleport_delta(from, step)?;

        self.gate.lock();
        self.gate.suppress(now, TELEPORT_SCROLL_WINDOW);
        let to = from + delta;
        self.surface.set_scroll_left(to);
        log::debug!("Carousel loop teleport {from:.0} -> {to:.0}");
        Some(Teleport { from, to })
    }

    /// Normalise the loop outside any debounce, before an autoplay step.
    ///
    /// Instant scrolls raise their events inside the programmatic window, so
    /// the debounce path never sees them. Does nothing while the lock is held
    /// or a window is open. Takes no lock; the jump is synchronous.
    pub fn normalize_now(&mut self, now: Instant) -> Option<Teleport> {
        if self.gate.is_locked() || self.gate.is_suppressed(now) {
            return None;
        }
        let plan = self.plan?;
        let step = self.step();
        let from = self.surface.scroll_left();
        let delta = plan.teleport_delta(from, step)?;

        self.gate.suppress(now, TELEPORT_SCROLL_WINDOW);
        let to = from + delta;
        self.surface.set_scroll_left(to);
        log::debug!("Carousel loop teleport before autoplay {from:.0} -> {to:.0}");
        Some(Teleport { from, to })
    }

    pub fn release_lock(&mut self) {
        self.gate.release_lock();
    }

    /// Original slide index at the track center, for looping tracks.
    pub fn centered_original(&self) -> usize {
        let idx = self.centered_index();
        self.plan.map_or(idx, |plan| plan.original_index(idx))
    }
}
