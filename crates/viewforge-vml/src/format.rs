//! Diagnostic rendering
//!
//! One ariadne report per diagnostic, rendered to a plain string (no color)
//! so the service can hand messages to any consumer.

use ariadne::{Config, Label, Report, ReportKind, Source};
use viewforge_backend::{Diagnostic, Severity};

pub(crate) fn render(diagnostic: &Diagnostic) -> String {
    let source: &str = diagnostic.source.as_ref();
    if source.is_empty() {
        return fallback(diagnostic);
    }

    let kind = if diagnostic.is_error() {
        ReportKind::Error
    } else if diagnostic.severity == Severity::Warning {
        ReportKind::Warning
    } else {
        ReportKind::Advice
    };

    let origin: &str = &diagnostic.origin;
    let end = diagnostic.span.end.min(source.len());
    let start = diagnostic.span.start.min(end);
    let span = (origin, start..end);

    let mut rendered = Vec::new();
    let outcome = Report::build(kind, span.clone())
        .with_config(Config::default().with_color(false))
        .with_code(&diagnostic.code)
        .with_message(&diagnostic.message)
        .with_label(Label::new(span).with_message(&diagnostic.message))
        .finish()
        .write((origin, Source::from(source)), &mut rendered);

    match outcome {
        Ok(()) => String::from_utf8_lossy(&rendered).into_owned(),
        Err(_) => fallback(diagnostic),
    }
}

fn fallback(diagnostic: &Diagnostic) -> String {
    format!(
        "{}: {} [{}]: {}",
        diagnostic.origin, diagnostic.severity, diagnostic.code, diagnostic.message
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use viewforge_backend::Span;

    #[test]
    fn test_rendered_message_names_origin_and_symbol() {
        let source = "view A\n  use missing.helper\nend\n";
        let start = source.find("use").unwrap();
        let diagnostic = Diagnostic::new(
            Severity::Error,
            "E1001",
            "unresolved symbol `missing.helper`",
            "views/home.vml",
            Span::new(start, start + "use missing.helper".len()),
            Arc::from(source),
        );

        let text = render(&diagnostic);
        assert!(text.contains("views/home.vml"));
        assert!(text.contains("missing.helper"));
        assert!(text.contains("E1001"));
    }

    #[test]
    fn test_fallback_without_source() {
        let diagnostic = Diagnostic::new(
            Severity::Warning,
            "W0003",
            "unknown pragma `fancy`",
            "views/home.vml",
            Span::zero(),
            Arc::from(""),
        );

        let text = render(&diagnostic);
        assert!(text.contains("views/home.vml"));
        assert!(text.contains("W0003"));
        assert!(text.contains("unknown pragma"));
    }
}
