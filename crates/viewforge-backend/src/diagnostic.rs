//! Backend diagnostic objects
//!
//! A diagnostic carries everything its formatter needs to render a located
//! message: severity, a stable code, the offending span, and the source text
//! the span indexes into. Consumers never inspect diagnostics structurally;
//! they receive formatted strings via the backend's formatter.

use std::sync::Arc;

use crate::{Severity, Span};

/// A single issue reported by the compiler backend
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// How serious the issue is
    pub severity: Severity,
    /// Stable diagnostic code (e.g. "E1001")
    pub code: String,
    /// Human-readable description
    pub message: String,
    /// Identity of the document the diagnostic points into
    pub origin: String,
    /// Byte range within the source text
    pub span: Span,
    /// Full source text of the document, shared across diagnostics
    pub source: Arc<str>,
    /// Warning escalated to error by compilation options
    pub warning_as_error: bool,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        code: impl Into<String>,
        message: impl Into<String>,
        origin: impl Into<String>,
        span: Span,
        source: Arc<str>,
    ) -> Self {
        Self {
            severity,
            code: code.into(),
            message: message.into(),
            origin: origin.into(),
            span,
            source,
            warning_as_error: false,
        }
    }

    /// Mark this diagnostic as a warning escalated to an error
    pub fn with_warning_as_error(mut self, escalate: bool) -> Self {
        self.warning_as_error = escalate;
        self
    }

    /// True if this diagnostic prevents successful emission
    pub fn is_error(&self) -> bool {
        self.warning_as_error || self.severity == Severity::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diag(severity: Severity) -> Diagnostic {
        Diagnostic::new(
            severity,
            "T0001",
            "test message",
            "views/test.vml",
            Span::zero(),
            Arc::from(""),
        )
    }

    #[test]
    fn test_error_predicate() {
        assert!(diag(Severity::Error).is_error());
        assert!(!diag(Severity::Warning).is_error());
        assert!(!diag(Severity::Info).is_error());
        assert!(!diag(Severity::Hidden).is_error());
    }

    #[test]
    fn test_warning_escalation() {
        let escalated = diag(Severity::Warning).with_warning_as_error(true);
        assert!(escalated.is_error());
        assert_eq!(escalated.severity, Severity::Warning);
    }
}
