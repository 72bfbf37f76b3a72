//! Semantic checks against the resolved reference set

use std::collections::HashSet;
use std::sync::Arc;

use viewforge_backend::{Diagnostic, ResolvedReference, Severity, Span};

use crate::image;
use crate::parser::SourceAst;

/// Collect every symbol the reference set makes visible. A reference image
/// that does not decode produces a diagnostic, not a hard failure.
pub(crate) fn collect_exports(
    references: &[ResolvedReference],
    origin: &str,
    source: &Arc<str>,
) -> (HashSet<String>, Vec<Diagnostic>) {
    let mut exports = HashSet::new();
    let mut diagnostics = Vec::new();

    for reference in references {
        match reference {
            ResolvedReference::Metadata(metadata) => {
                exports.extend(metadata.exports().iter().cloned());
            }
            ResolvedReference::Image(bytes) => match image::read_module(&mut &bytes[..]) {
                Ok((manifest, _)) => {
                    exports.extend(manifest.exports.iter().cloned());
                    exports.extend(manifest.types.iter().map(|t| t.name.clone()));
                }
                Err(err) => diagnostics.push(Diagnostic::new(
                    Severity::Error,
                    "E1003",
                    format!("reference image is not readable: {}", err),
                    origin,
                    Span::zero(),
                    source.clone(),
                )),
            },
        }
    }

    (exports, diagnostics)
}

/// Check one parsed document against the visible symbol set
pub(crate) fn check(
    ast: &SourceAst,
    origin: &str,
    source: &Arc<str>,
    exports: &HashSet<String>,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut seen_views: HashSet<&str> = HashSet::new();

    for view in &ast.views {
        if !seen_views.insert(&view.name) {
            diagnostics.push(Diagnostic::new(
                Severity::Error,
                "E1002",
                format!("view `{}` is declared more than once", view.name),
                origin,
                view.span,
                source.clone(),
            ));
        }

        let mut seen_uses: HashSet<&str> = HashSet::new();
        for used in &view.uses {
            if !exports.contains(&used.symbol) {
                diagnostics.push(Diagnostic::new(
                    Severity::Error,
                    "E1001",
                    format!("unresolved symbol `{}`", used.symbol),
                    origin,
                    used.span,
                    source.clone(),
                ));
            }
            if !seen_uses.insert(&used.symbol) {
                diagnostics.push(Diagnostic::new(
                    Severity::Warning,
                    "W0001",
                    format!("duplicate use of `{}`", used.symbol),
                    origin,
                    used.span,
                    source.clone(),
                ));
            }
        }

        for field in &view.fields {
            if !is_known_type(&field.ty) {
                diagnostics.push(Diagnostic::new(
                    Severity::Warning,
                    "W0002",
                    format!(
                        "unknown field type `{}`, treated as opaque",
                        field.ty
                    ),
                    origin,
                    field.span,
                    source.clone(),
                ));
            }
        }

        if view.fields.is_empty() {
            diagnostics.push(Diagnostic::new(
                Severity::Hidden,
                "H0001",
                format!("view `{}` declares no fields", view.name),
                origin,
                view.span,
                source.clone(),
            ));
        }
    }

    diagnostics
}

fn is_known_type(ty: &str) -> bool {
    matches!(ty, "str" | "int" | "bool" | "float")
}
