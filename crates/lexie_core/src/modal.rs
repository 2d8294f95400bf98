//! Free-pattern request modal.
//!
//! The overlay is hidden as soon as it closes, but body scrolling is only
//! released after the fade-out, and only if nothing reopened it meanwhile.

use crate::form::{SubmissionLifecycle, SubmitStatus};
use crate::message::{compose_with_pattern, pattern_request_template};

const DEFAULT_ALT: &str = "Free pattern";

/// The slide a visitor asked about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternChoice {
    pub image_url: String,
    pub alt: String,
}

impl PatternChoice {
    pub fn new(image_url: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            alt: alt.into(),
        }
    }
}

/// What the modal shows right after opening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalContent {
    pub image_src: String,
    pub image_alt: String,
    pub message: String,
    pub status: SubmitStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Closed,
    Open,
    /// Hidden, body scroll still locked
    Closing,
}

/// How a finished request affects the modal.
///
/// The message fields are swapped back for every outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Succeeded,
    Failed,
    /// The modal was reopened while the request was in flight
    Superseded,
}

/// Token for the pending scroll-lock release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseToken(u64);

/// State of the single free-pattern modal.
#[derive(Debug, Clone, Default)]
pub struct ModalState {
    visibility: Visibility,
    release_seq: u64,
    choice: Option<PatternChoice>,
    lifecycle: SubmissionLifecycle,
}

impl ModalState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_open(&self) -> bool {
        self.visibility == Visibility::Open
    }

    pub fn choice(&self) -> Option<&PatternChoice> {
        self.choice.as_ref()
    }

    pub fn lifecycle(&self) -> &SubmissionLifecycle {
        &self.lifecycle
    }

    pub fn lifecycle_mut(&mut self) -> &mut SubmissionLifecycle {
        &mut self.lifecycle
    }

    /// Show the modal for `choice`, discarding the previous request's state.
    pub fn open(&mut self, choice: PatternChoice) -> ModalContent {
        // Invalidate any scroll release still pending from a close.
        self.release_seq += 1;
        self.visibility = Visibility::Open;
        self.lifecycle.clear();

        let alt = choice.alt.trim();
        let content = ModalContent {
            image_src: choice.image_url.clone(),
            image_alt: if alt.is_empty() { DEFAULT_ALT } else { alt }.to_string(),
            message: pattern_request_template(alt),
            status: self.lifecycle.status(),
        };
        self.choice = Some(choice);
        content
    }

    /// Hide the modal. Returns the token for the delayed scroll release.
    pub fn close(&mut self) -> Option<ReleaseToken> {
        if self.visibility != Visibility::Open {
            return None;
        }
        self.release_seq += 1;
        self.visibility = Visibility::Closing;
        Some(ReleaseToken(self.release_seq))
    }

    /// The fade-out elapsed. Returns `true` if body scroll should unlock.
    pub fn release_scroll(&mut self, token: ReleaseToken) -> bool {
        if self.visibility != Visibility::Closing || token.0 != self.release_seq {
            return false;
        }
        self.visibility = Visibility::Closed;
        true
    }

    /// Record the end of the in-flight request.
    pub fn finish_request(&mut self, sent: bool) -> RequestOutcome {
        let applied = if sent {
            self.lifecycle.confirm_success()
        } else {
            self.lifecycle.fail()
        };
        match (applied, sent) {
            (false, _) => RequestOutcome::Superseded,
            (true, true) => RequestOutcome::Succeeded,
            (true, false) => RequestOutcome::Failed,
        }
    }

    /// Message to submit for the current choice.
    pub fn hidden_message(&self, visible: &str) -> String {
        let url = self.choice.as_ref().map_or("", |c| c.image_url.as_str());
        compose_with_pattern(visible, url)
    }
}
