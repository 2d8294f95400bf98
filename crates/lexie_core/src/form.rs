//! Submission lifecycle and endpoint handling for the contact forms.
//!
//! Submissions go to a third-party form backend in a mode that hides the
//! response, so "success" means the request left the browser without a
//! network error (or the result frame loaded). The lifecycle makes sure only
//! one success signal per attempt is acted on.

/// Placeholder left in the endpoint by the site template.
const PLACEHOLDER_MARKER: &str = "FORM_ID";

/// Status line shown under a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Sending,
    Success,
    Error,
}

impl SubmitStatus {
    /// Text shown to the visitor.
    pub fn text(&self) -> &'static str {
        match self {
            SubmitStatus::Idle => "",
            SubmitStatus::Sending => "Sending…",
            SubmitStatus::Success => "Thank you! I'll get back to you soon 💌",
            SubmitStatus::Error => {
                "Sending failed. Please try again or message me on Instagram."
            }
        }
    }
}

/// Errors that stop or break a submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// The form has no real endpoint yet
    #[error("This form is not connected yet (missing data-gform-action).")]
    NotConfigured,

    /// The request failed before leaving the browser
    #[error("Network error: {0}")]
    Network(String),

    /// The form data could not be assembled
    #[error("Could not prepare the form data: {0}")]
    Body(String),
}

impl SubmitError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn body(message: impl Into<String>) -> Self {
        Self::Body(message.into())
    }
}

/// A usable form backend URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormEndpoint(String);

impl FormEndpoint {
    /// Validate a raw endpoint. Blank or placeholder values are rejected.
    pub fn parse(raw: &str) -> Result<Self, SubmitError> {
        let raw = raw.trim();
        if raw.is_empty() || raw.contains(PLACEHOLDER_MARKER) {
            return Err(SubmitError::NotConfigured);
        }
        Ok(Self(raw.to_string()))
    }

    /// The form's own attribute wins over the site-wide setting.
    pub fn resolve(attribute: Option<&str>, site_default: Option<&str>) -> Result<Self, SubmitError> {
        match attribute.filter(|a| !a.trim().is_empty()) {
            Some(attr) => Self::parse(attr),
            None => Self::parse(site_default.unwrap_or_default()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifies one submit attempt, for timers scheduled during it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptId(u64);

/// Status transitions of one form.
#[derive(Debug, Clone, Default)]
pub struct SubmissionLifecycle {
    status: SubmitStatus,
    attempt: u64,
}

impl SubmissionLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    /// Start sending.
    pub fn begin(&mut self) -> AttemptId {
        self.attempt += 1;
        self.status = SubmitStatus::Sending;
        AttemptId(self.attempt)
    }

    /// A success signal arrived (result frame load, or a completed request).
    ///
    /// Returns `true` only for the transition out of `Sending`; the caller
    /// resets the form exactly then.
    pub fn confirm_success(&mut self) -> bool {
        if self.status != SubmitStatus::Sending {
            return false;
        }
        self.status = SubmitStatus::Success;
        true
    }

    /// The fallback timer of `attempt` fired.
    pub fn confirm_fallback(&mut self, attempt: AttemptId) -> bool {
        attempt.0 == self.attempt && self.confirm_success()
    }

    /// The request failed.
    pub fn fail(&mut self) -> bool {
        if self.status != SubmitStatus::Sending {
            return false;
        }
        self.status = SubmitStatus::Error;
        true
    }

    /// Back to a blank status line.
    pub fn clear(&mut self) {
        self.status = SubmitStatus::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_rejects_placeholders() {
        assert_eq!(FormEndpoint::parse(""), Err(SubmitError::NotConfigured));
        assert_eq!(
            FormEndpoint::parse("https://docs.google.com/forms/d/e/FORM_ID/formResponse"),
            Err(SubmitError::NotConfigured)
        );
        let endpoint = FormEndpoint::parse(" https://forms.example/submit ").expect("valid");
        assert_eq!(endpoint.as_str(), "https://forms.example/submit");
    }

    #[test]
    fn test_endpoint_attribute_wins() {
        let endpoint =
            FormEndpoint::resolve(Some("https://a/submit"), Some("https://b/submit")).expect("valid");
        assert_eq!(endpoint.as_str(), "https://a/submit");

        let endpoint = FormEndpoint::resolve(Some("  "), Some("https://b/submit")).expect("valid");
        assert_eq!(endpoint.as_str(), "https://b/submit");

        assert_eq!(FormEndpoint::resolve(None, None), Err(SubmitError::NotConfigured));
    }

    #[test]
    fn test_frame_and_fallback_reset_once() {
        let mut lifecycle = SubmissionLifecycle::new();
        let attempt = lifecycle.begin();
        assert_eq!(lifecycle.status().text(), "Sending…");

        // Frame load arrives first, then the fallback timer.
        assert!(lifecycle.confirm_success());
        assert!(!lifecycle.confirm_fallback(attempt));
        assert_eq!(lifecycle.status(), SubmitStatus::Success);
    }

    #[test]
    fn test_fallback_alone_confirms() {
        let mut lifecycle = SubmissionLifecycle::new();
        let attempt = lifecycle.begin();
        assert!(lifecycle.confirm_fallback(attempt));
        assert!(!lifecycle.confirm_success());
    }

    #[test]
    fn test_stale_fallback_ignored() {
        let mut lifecycle = SubmissionLifecycle::new();
        let first = lifecycle.begin();
        lifecycle.fail();
        let _second = lifecycle.begin();
        assert!(!lifecycle.confirm_fallback(first));
        assert_eq!(lifecycle.status(), SubmitStatus::Sending);
    }

    #[test]
    fn test_failure_only_from_sending() {
        let mut lifecycle = SubmissionLifecycle::new();
        assert!(!lifecycle.fail());
        lifecycle.begin();
        assert!(lifecycle.fail());
        assert_eq!(lifecycle.status(), SubmitStatus::Error);
        lifecycle.clear();
        assert_eq!(lifecycle.status().text(), "");
    }
}
