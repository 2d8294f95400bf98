//! Carousel scenarios over a simulated track.

use std::cell::Cell;
use std::time::Duration;

use web_time::Instant;

use super::*;
use crate::constants::LOOP_DEBOUNCE;

const TRACK_WIDTH: f64 = 400.0;
const SLIDE_WIDTH: f64 = 200.0;
const GAP: f64 = 20.0;
const STEP: f64 = SLIDE_WIDTH + GAP;

/// A track whose inline padding lets every slide reach the center.
/// Scrolls apply instantly for both behaviours.
struct SimTrack {
    count: usize,
    scroll: Cell<f64>,
    scroll_by_calls: Cell<usize>,
}

impl SimTrack {
    fn new(count: usize) -> Self {
        Self {
            count,
            scroll: Cell::new(0.0),
            scroll_by_calls: Cell::new(0),
        }
    }

    fn padding() -> f64 {
        (TRACK_WIDTH - SLIDE_WIDTH) / 2.0
    }

    fn max_scroll(&self) -> f64 {
        let content = 2.0 * Self::padding()
            + self.count as f64 * SLIDE_WIDTH
            + self.count.saturating_sub(1) as f64 * GAP;
        (content - TRACK_WIDTH).max(0.0)
    }
}

impl TrackSurface for SimTrack {
    fn track_span(&self) -> Span {
        Span::new(0.0, TRACK_WIDTH)
    }

    fn slide_spans(&self) -> Vec<Span> {
        let scroll = self.scroll.get();
        self.slide_offsets()
            .into_iter()
            .map(|offset| Span::new(offset - scroll, SLIDE_WIDTH))
            .collect()
    }

    fn slide_offsets(&self) -> Vec<f64> {
        (0..self.count)
            .map(|i| Self::padding() + i as f64 * STEP)
            .collect()
    }

    fn scroll_left(&self) -> f64 {
        self.scroll.get()
    }

    fn set_scroll_left(&self, value: f64) {
        self.scroll.set(value.clamp(0.0, self.max_scroll()));
    }

    fn scroll_by(&self, delta: f64, _behavior: ScrollBehavior) {
        self.scroll_by_calls.set(self.scroll_by_calls.get() + 1);
        self.set_scroll_left(self.scroll.get() + delta);
    }
}

fn looping(originals: usize) -> Carousel<SimTrack> {
    let plan = LoopPlan::new(originals).expect("plan");
    let mut carousel = Carousel::with_loop(SimTrack::new(plan.padded_len()), Some(plan));
    carousel.jump_to_first_real();
    carousel
}

/// Push the debounce through and return the teleport, if any.
fn user_scroll_to(carousel: &mut Carousel<SimTrack>, offset: f64, now: Instant) -> Option<Teleport> {
    carousel.surface().set_scroll_left(offset);
    match carousel.on_scroll(now) {
        ScrollDecision::Debounce(delay) => carousel.settle(now + delay),
        ScrollDecision::Ignore => None,
    }
}

#[test]
fn test_step_matches_adjacent_offsets() {
    let carousel = Carousel::new(SimTrack::new(4));
    let offsets = carousel.surface().slide_offsets();
    assert_eq!(carousel.step(), offsets[1] - offsets[0]);
    assert_eq!(carousel.step(), STEP);
}

#[test]
fn test_center_to_index_round_trips_with_clamp() {
    let n = 5;
    let mut carousel = Carousel::new(SimTrack::new(n));
    let now = Instant::now();

    for i in 0..n + 3 {
        carousel.center_to_index(i, ScrollBehavior::Instant, now);
        assert_eq!(carousel.centered_index(), i.min(n - 1), "target {i}");
    }
}

#[test]
fn test_center_to_index_opens_suppression_window() {
    let mut carousel = Carousel::with_loop(SimTrack::new(9), LoopPlan::new(3));
    let now = Instant::now();

    carousel.center_to_index(4, ScrollBehavior::Smooth, now);
    assert!(carousel.gate().is_suppressed(now + Duration::from_millis(299)));
    assert_eq!(carousel.on_scroll(now + Duration::from_millis(10)), ScrollDecision::Ignore);
    assert!(!carousel.gate().is_suppressed(now + Duration::from_millis(300)));
}

#[test]
fn test_center_to_index_on_empty_track_is_noop() {
    let mut carousel = Carousel::new(SimTrack::new(0));
    carousel.center_to_index(3, ScrollBehavior::Smooth, Instant::now());
    assert_eq!(carousel.surface().scroll_by_calls.get(), 0);
    assert_eq!(carousel.centered_index(), 0);
}

#[test]
fn test_padding_starts_on_first_real_slide() {
    for n in 2..7 {
        let carousel = looping(n);
        let plan = carousel.plan().expect("plan");
        assert_eq!(plan.padded_len(), n + 2 * n.min(3));
        assert_eq!(carousel.centered_index(), plan.first_real(), "n={n}");
        assert_eq!(carousel.centered_original(), 0);
    }
}

#[test]
fn test_advance_moves_one_slide() {
    let mut carousel = looping(5);
    let now = Instant::now();
    let before = carousel.centered_index();

    carousel.advance(ScrollBehavior::Smooth, now);
    assert_eq!(carousel.centered_index(), before + 1);
    assert_eq!(carousel.centered_original(), 1);
}

#[test]
fn test_teleport_forward_from_front_padding() {
    let mut carousel = looping(5);
    let now = Instant::now();
    let offset = 2.0 * STEP;
    carousel.surface().set_scroll_left(offset);
    let before = carousel.centered_original();

    let teleport = user_scroll_to(&mut carousel, offset, now).expect("teleport");
    assert_eq!(teleport.delta(), 5.0 * STEP);
    assert_eq!(carousel.surface().scroll_left(), offset + 5.0 * STEP);
    assert_eq!(carousel.centered_original(), before);
}

#[test]
fn test_teleport_backward_from_back_padding() {
    let mut carousel = looping(5);
    let now = Instant::now();
    let offset = 9.0 * STEP;
    carousel.surface().set_scroll_left(offset);
    let before = carousel.centered_original();

    let teleport = user_scroll_to(&mut carousel, offset, now).expect("teleport");
    assert_eq!(teleport.delta(), -5.0 * STEP);
    assert_eq!(carousel.centered_original(), before);
}

#[test]
fn test_teleport_happens_exactly_once() {
    let mut carousel = looping(4);
    let t0 = Instant::now();
    let mut teleports = 0;

    if user_scroll_to(&mut carousel, STEP, t0).is_some() {
        teleports += 1;
    }

    // The scroll event caused by the teleport itself.
    let t1 = t0 + LOOP_DEBOUNCE + Duration::from_millis(1);
    assert_eq!(carousel.on_scroll(t1), ScrollDecision::Ignore);
    carousel.release_lock();
    assert_eq!(carousel.on_scroll(t1), ScrollDecision::Ignore, "still suppressed");

    // Once the window closes the offset is inside the real range.
    let t2 = t0 + Duration::from_secs(1);
    let offset = carousel.surface().scroll_left();
    if user_scroll_to(&mut carousel, offset, t2).is_some() {
        teleports += 1;
    }

    assert_eq!(teleports, 1);
}

#[test]
fn test_no_teleport_inside_programmatic_window() {
    let mut carousel = looping(5);
    let t0 = Instant::now();

    carousel.surface().set_scroll_left(STEP);
    assert!(matches!(carousel.on_scroll(t0), ScrollDecision::Debounce(_)));

    // A programmatic scroll starts before the debounce fires.
    carousel.center_to_index(1, ScrollBehavior::Instant, t0 + Duration::from_millis(50));
    assert_eq!(carousel.settle(t0 + LOOP_DEBOUNCE), None);
}

#[test]
fn test_no_teleport_inside_real_range() {
    let mut carousel = looping(5);
    let now = Instant::now();
    assert_eq!(user_scroll_to(&mut carousel, 5.0 * STEP, now), None);
}

#[test]
fn test_non_looping_track_ignores_scroll() {
    let mut carousel = Carousel::new(SimTrack::new(1));
    assert_eq!(carousel.on_scroll(Instant::now()), ScrollDecision::Ignore);
}

#[test]
fn test_instant_autoplay_cycles_through_the_loop() {
    let mut carousel = looping(5);
    let plan = carousel.plan().expect("plan");
    let mut now = Instant::now();
    let mut seen = Vec::new();

    for _ in 0..12 {
        now += Duration::from_secs(5);
        carousel.normalize_now(now);
        carousel.advance(ScrollBehavior::Instant, now);
        // The browser reports the jump on the next frame.
        let event = now + Duration::from_millis(16);
        assert_eq!(carousel.on_scroll(event), ScrollDecision::Ignore);

        let idx = carousel.centered_index();
        assert!(idx <= plan.last_real() + 1, "stuck in the tail at {idx}");
        seen.push(carousel.centered_original());
    }

    assert_eq!(seen, [1, 2, 3, 4, 0, 1, 2, 3, 4, 0, 1, 2]);
}

#[test]
fn test_normalize_now_waits_for_the_window() {
    let mut carousel = looping(5);
    let now = Instant::now();
    carousel.center_to_index(9, ScrollBehavior::Instant, now);

    assert_eq!(carousel.normalize_now(now + Duration::from_millis(100)), None);

    let later = now + Duration::from_secs(1);
    let teleport = carousel.normalize_now(later).expect("teleport");
    assert_eq!(teleport.delta(), -5.0 * STEP);
    assert_eq!(carousel.centered_original(), 1);
    assert!(!carousel.gate().is_locked());
    assert!(carousel.gate().is_suppressed(later));
}
