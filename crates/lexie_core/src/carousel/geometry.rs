//! Track measurement and centering math.
//!
//! All positions are in one shared horizontal coordinate space (the DOM
//! adapter uses viewport coordinates from `getBoundingClientRect`), so only
//! differences between spans matter.

use crate::constants::FALLBACK_STEP_PX;

/// A horizontal extent: left edge and width, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub start: f64,
    pub width: f64,
}

impl Span {
    /// Create a span from its left edge and width.
    pub fn new(start: f64, width: f64) -> Self {
        Self { start, width }
    }

    /// Horizontal center of the span.
    pub fn center(&self) -> f64 {
        self.start + self.width / 2.0
    }
}

/// How a programmatic scroll is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    /// Animated scroll
    #[default]
    Smooth,
    /// Immediate jump
    Instant,
}

impl ScrollBehavior {
    /// Pick the behaviour for user preferences.
    ///
    /// Reduced-motion users and coarse pointers (touch screens, where smooth
    /// programmatic scrolling fights momentum) get immediate jumps.
    pub fn for_preferences(reduced_motion: bool, coarse_pointer: bool) -> Self {
        if reduced_motion || coarse_pointer {
            Self::Instant
        } else {
            Self::Smooth
        }
    }

    /// Value for the DOM `ScrollToOptions.behavior` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Smooth => "smooth",
            Self::Instant => "auto",
        }
    }
}

/// A horizontally scrolling track of slides.
///
/// Implemented over the DOM by the `lexie` crate and over a simulated layout
/// in tests. Measurements are taken fresh on every call because layout
/// changes with the viewport.
pub trait TrackSurface {
    /// Visual box of the scroll container.
    fn track_span(&self) -> Span;

    /// Visual boxes of every slide, clones included, in DOM order.
    fn slide_spans(&self) -> Vec<Span>;

    /// Layout start offset (`offsetLeft`) of every slide, in DOM order.
    fn slide_offsets(&self) -> Vec<f64>;

    /// Current horizontal scroll offset.
    fn scroll_left(&self) -> f64;

    /// Jump to an absolute scroll offset without animation.
    fn set_scroll_left(&self, value: f64);

    /// Scroll relative to the current offset.
    fn scroll_by(&self, delta: f64, behavior: ScrollBehavior);
}

/// Distance between consecutive slide starts.
///
/// Uses the first two offsets so CSS gaps and responsive widths are
/// included; falls back to the first slide's width, then to a fixed step.
pub fn measure_step(offsets: &[f64], spans: &[Span]) -> f64 {
    if let [first, second, ..] = offsets {
        return second - first;
    }
    spans.first().map_or(FALLBACK_STEP_PX, |span| span.width)
}

/// Index of the slide whose center is nearest the track center.
///
/// Ties go to the lowest index. An empty track reports 0.
pub fn centered_index(track: Span, slides: &[Span]) -> usize {
    let cx = track.center();
    let mut best = 0;
    let mut best_dist = f64::INFINITY;

    for (i, slide) in slides.iter().enumerate() {
        let d = (slide.center() - cx).abs();
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }

    best
}

/// Scroll delta that brings `slide`'s center onto the track center.
pub fn center_delta(track: Span, slide: Span) -> f64 {
    slide.center() - track.center()
}

/// Clamp an index into `0..len`. `len` must be non-zero.
pub fn clamp_index(idx: usize, len: usize) -> usize {
    idx.min(len.saturating_sub(1))
}
