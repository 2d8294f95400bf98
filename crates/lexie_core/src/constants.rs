//! Timings and thresholds shared by the site controllers.

use std::time::Duration;

// ============================================================================
// Carousel
// ============================================================================

/// Maximum number of slides cloned onto each end of a looping track
pub const MAX_LOOP_CLONES: usize = 3;

/// Step used when the track has no slides to measure
pub const FALLBACK_STEP_PX: f64 = 320.0;

/// Suppression window opened by `center_to_index`
pub const PROGRAMMATIC_SCROLL_WINDOW: Duration = Duration::from_millis(300);

/// Suppression window opened by a loop teleport
pub const TELEPORT_SCROLL_WINDOW: Duration = Duration::from_millis(350);

/// Quiet period after the last scroll event before loop normalisation runs.
/// Shorter values fire mid-fling on touch devices.
pub const LOOP_DEBOUNCE: Duration = Duration::from_millis(140);

/// Fraction of a step the offset may drift past the padded boundary
pub const TELEPORT_TOLERANCE: f64 = 0.25;

/// Autoplay interval when the root carries no `data-autoplay`
pub const DEFAULT_AUTOPLAY: Duration = Duration::from_millis(5000);

/// How long autoplay stays paused after a pointer, touch or wheel interaction
pub const USER_HOLD: Duration = Duration::from_millis(2000);

/// Quiet period before the centered slide is considered settled
pub const ARM_SETTLE: Duration = Duration::from_millis(160);

/// Dwell on a settled promotional slide before its action is armed
pub const ARM_DWELL: Duration = Duration::from_millis(1000);

// ============================================================================
// Forms
// ============================================================================

/// Success is assumed this long after dispatch if the result frame stays silent
pub const SUCCESS_FALLBACK: Duration = Duration::from_millis(1800);

/// Delay before the visible message field gets its name back
pub const FIELD_RESTORE_DELAY: Duration = Duration::from_millis(1500);

/// Minimum message length, in characters, after trimming
pub const MIN_MESSAGE_CHARS: usize = 10;

// ============================================================================
// Modal
// ============================================================================

/// Fade-out duration; body scroll is released once it has elapsed
pub const MODAL_FADE: Duration = Duration::from_millis(320);

/// Delay between a successful pattern request and closing the modal
pub const MODAL_AUTO_CLOSE: Duration = Duration::from_millis(900);

// ============================================================================
// Chrome
// ============================================================================

/// Distance from the viewport bottom at which `.reveal` elements appear
pub const REVEAL_THRESHOLD_PX: f64 = 80.0;

/// Number of featured catalog items rendered into the hero carousel
pub const DEFAULT_FEATURED_LIMIT: usize = 12;
