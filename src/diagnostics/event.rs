//! Diagnostic event schema.

use std::fmt;

use crate::policy::PolicyKind;

/// What an interceptor did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The default action was cancelled
    Suppressed,
    /// The event was let through on purpose (text input, exempt region)
    Allowed,
    /// Recorded only; nothing was or could be cancelled
    Observed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Suppressed => write!(f, "suppressed"),
            Outcome::Allowed => write!(f, "allowed"),
            Outcome::Observed => write!(f, "observed"),
        }
    }
}

/// A single interceptor decision.
///
/// # Example
///
/// ```
/// use policy_guard::diagnostics::{GuardEvent, Outcome};
/// use policy_guard::PolicyKind;
///
/// let event = GuardEvent::new("root", PolicyKind::KeyboardShortcutBlock, Outcome::Suppressed)
///     .with_detail("save")
///     .at(1_250);
///
/// assert_eq!(event.detail(), Some("save"));
/// assert_eq!(event.to_string(), "GuardEvent[kind=keyboard-shortcut-block, outcome=suppressed, surface=root, at=1250, detail=save]");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GuardEvent {
    surface: String,
    kind: PolicyKind,
    outcome: Outcome,
    /// Platform time of the triggering event; head mutations carry none
    timestamp_ms: Option<u64>,
    /// Short reason such as the matched shortcut
    detail: Option<String>,
}

impl GuardEvent {
    /// Creates a new event with required fields.
    pub fn new(surface: impl Into<String>, kind: PolicyKind, outcome: Outcome) -> Self {
        Self {
            surface: surface.into(),
            kind,
            outcome,
            timestamp_ms: None,
            detail: None,
        }
    }

    /// Sets the short reason.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Sets the platform timestamp of the triggering event.
    pub fn at(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = Some(timestamp_ms);
        self
    }

    /// Returns the surface label.
    pub fn surface(&self) -> &str {
        &self.surface
    }

    /// Returns the policy kind that decided.
    pub fn kind(&self) -> PolicyKind {
        self.kind
    }

    /// Returns the decision.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Returns the platform timestamp, if the decision had a triggering event.
    pub fn timestamp_ms(&self) -> Option<u64> {
        self.timestamp_ms
    }

    /// Returns the reason, if set.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Emits the event through tracing with structured fields.
    pub fn emit(&self) {
        tracing::debug!(
            target: "policy_guard",
            surface = %self.surface,
            kind = %self.kind,
            outcome = %self.outcome,
            timestamp_ms = ?self.timestamp_ms,
            detail = ?self.detail,
            "guard event"
        );
    }
}

impl fmt::Display for GuardEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GuardEvent[kind={}, outcome={}, surface={}",
            self.kind, self.outcome, self.surface
        )?;
        if let Some(at) = self.timestamp_ms {
            write!(f, ", at={}", at)?;
        }
        if let Some(detail) = &self.detail {
            write!(f, ", detail={}", detail)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_display() {
        assert_eq!(Outcome::Suppressed.to_string(), "suppressed");
        assert_eq!(Outcome::Allowed.to_string(), "allowed");
        assert_eq!(Outcome::Observed.to_string(), "observed");
    }

    #[test]
    fn display_omits_missing_detail_and_time() {
        let event = GuardEvent::new("root", PolicyKind::DragBlock, Outcome::Suppressed);
        assert_eq!(
            event.to_string(),
            "GuardEvent[kind=drag-block, outcome=suppressed, surface=root]"
        );
    }

    #[test]
    fn timestamp_is_optional() {
        let untimed = GuardEvent::new("root", PolicyKind::ManifestStrip, Outcome::Suppressed);
        assert_eq!(untimed.timestamp_ms(), None);
        let timed = untimed.clone().at(42);
        assert_eq!(timed.timestamp_ms(), Some(42));
        assert!(timed.to_string().contains(", at=42"));
    }

    #[test]
    fn emit_does_not_panic() {
        GuardEvent::new("root", PolicyKind::VisibilityWatch, Outcome::Observed)
            .with_detail("hidden")
            .emit();
    }
}
