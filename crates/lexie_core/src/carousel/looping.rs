//! Infinite-loop padding for the carousel track.
//!
//! The track is padded with copies of its last K slides in front and its
//! first K slides behind, so scrolling past either end shows a continuation.
//! Once the offset drifts past the padding it is shifted by one full
//! original-set width, which lands on the original slide the clone mirrors.

use std::ops::Range;

use crate::constants::{MAX_LOOP_CLONES, TELEPORT_TOLERANCE};

/// One slot of the padded track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaddedSlide {
    /// Index of the original slide shown in this slot
    pub source: usize,
    /// Whether the slot holds a clone
    pub is_clone: bool,
}

/// Layout of a looping track with `originals` real slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopPlan {
    originals: usize,
    clones: usize,
}

impl LoopPlan {
    /// Plan padding for a track. Returns `None` for fewer than two slides.
    pub fn new(originals: usize) -> Option<Self> {
        if originals < 2 {
            return None;
        }
        Some(Self {
            originals,
            clones: originals.min(MAX_LOOP_CLONES),
        })
    }

    /// Number of real slides.
    pub fn originals(&self) -> usize {
        self.originals
    }

    /// Number of clones on each end.
    pub fn clones(&self) -> usize {
        self.clones
    }

    /// Total slot count after padding.
    pub fn padded_len(&self) -> usize {
        self.originals + 2 * self.clones
    }

    /// Padded index of the first real slide.
    pub fn first_real(&self) -> usize {
        self.clones
    }

    /// Padded index of the last real slide.
    pub fn last_real(&self) -> usize {
        self.clones + self.originals - 1
    }

    /// Originals whose clones go in front of the track, in DOM order.
    pub fn tail_sources(&self) -> Range<usize> {
        self.originals - self.clones..self.originals
    }

    /// Originals whose clones go after the track, in DOM order.
    pub fn head_sources(&self) -> Range<usize> {
        0..self.clones
    }

    /// Whether a padded index is a real slide.
    pub fn is_real(&self, padded: usize) -> bool {
        (self.first_real()..=self.last_real()).contains(&padded)
    }

    /// Original slide shown at a padded index.
    pub fn original_index(&self, padded: usize) -> usize {
        (padded + self.originals - self.clones) % self.originals
    }

    /// Full padded layout, front clones first.
    pub fn layout(&self) -> Vec<PaddedSlide> {
        let front = self.tail_sources().map(|source| PaddedSlide {
            source,
            is_clone: true,
        });
        let real = (0..self.originals).map(|source| PaddedSlide {
            source,
            is_clone: false,
        });
        let back = self.head_sources().map(|source| PaddedSlide {
            source,
            is_clone: true,
        });
        front.chain(real).chain(back).collect()
    }

    /// Scroll offset of the first real slide.
    pub fn start_offset(&self, step: f64) -> f64 {
        self.clones as f64 * step
    }

    /// Scroll offset one full set past `start_offset`.
    pub fn end_offset(&self, step: f64) -> f64 {
        self.start_offset(step) + self.set_width(step)
    }

    /// Width of the original set.
    pub fn set_width(&self, step: f64) -> f64 {
        self.originals as f64 * step
    }

    /// Offset shift needed to hide the padding, if any.
    ///
    /// Positive when the offset drifted before the first real slide,
    /// negative when it drifted past the end.
    pub fn teleport_delta(&self, scroll_left: f64, step: f64) -> Option<f64> {
        let tolerance = step * TELEPORT_TOLERANCE;
        if scroll_left < self.start_offset(step) - tolerance {
            Some(self.set_width(step))
        } else if scroll_left > self.end_offset(step) + tolerance {
            Some(-self.set_width(step))
        } else {
            None
        }
    }
}
