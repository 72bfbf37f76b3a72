//! Diagnostic translation
//!
//! Filters the backend's diagnostics down to actual errors (including
//! warnings escalated to errors) and renders each through the backend's own
//! formatter. Backend ordering is preserved, not re-sorted.

use viewforge_backend::{CompilerBackend, Diagnostic};

use crate::result::CompilationMessage;

pub(crate) fn translate(
    backend: &dyn CompilerBackend,
    diagnostics: &[Diagnostic],
) -> Vec<CompilationMessage> {
    diagnostics
        .iter()
        .filter(|diagnostic| diagnostic.is_error())
        .map(|diagnostic| CompilationMessage {
            text: backend.format_diagnostic(diagnostic),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use viewforge_backend::{Severity, Span};
    use viewforge_vml::VmlBackend;

    fn diag(severity: Severity, message: &str) -> Diagnostic {
        Diagnostic::new(
            severity,
            "T0001",
            message,
            "views/test.vml",
            Span::zero(),
            Arc::from(""),
        )
    }

    #[test]
    fn test_only_errors_survive() {
        let backend = VmlBackend::new();
        let diagnostics = vec![
            diag(Severity::Hidden, "hidden note"),
            diag(Severity::Info, "informational"),
            diag(Severity::Warning, "plain warning"),
            diag(Severity::Error, "real error"),
        ];

        let messages = translate(&backend, &diagnostics);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].text.contains("real error"));
    }

    #[test]
    fn test_escalated_warning_survives() {
        let backend = VmlBackend::new();
        let diagnostics = vec![
            diag(Severity::Warning, "escalated warning").with_warning_as_error(true),
            diag(Severity::Warning, "plain warning"),
        ];

        let messages = translate(&backend, &diagnostics);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].text.contains("escalated warning"));
    }

    #[test]
    fn test_order_is_preserved() {
        let backend = VmlBackend::new();
        let diagnostics = vec![
            diag(Severity::Error, "first"),
            diag(Severity::Warning, "skipped"),
            diag(Severity::Error, "second"),
        ];

        let messages = translate(&backend, &diagnostics);
        assert_eq!(messages.len(), 2);
        assert!(messages[0].text.contains("first"));
        assert!(messages[1].text.contains("second"));
    }
}
