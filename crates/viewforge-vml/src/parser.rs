//! Line-oriented parser for vml documents

use std::sync::Arc;

use viewforge_backend::{Diagnostic, Severity, Span};

/// Parsed representation of one vml document
#[derive(Debug, Clone, Default)]
pub(crate) struct SourceAst {
    /// `pragma strict` seen anywhere in the document
    pub strict: bool,
    pub views: Vec<ViewDecl>,
}

#[derive(Debug, Clone)]
pub(crate) struct ViewDecl {
    pub name: String,
    /// Span of the `view` directive line
    pub span: Span,
    /// 1-based source line of the declaration
    pub line: u32,
    pub uses: Vec<UseDecl>,
    pub fields: Vec<FieldDecl>,
}

#[derive(Debug, Clone)]
pub(crate) struct UseDecl {
    pub symbol: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub(crate) struct FieldDecl {
    pub name: String,
    pub ty: String,
    pub span: Span,
}

/// Parse a document into its AST plus any syntax diagnostics.
/// Parsing always completes; problems are reported, not thrown.
pub(crate) fn parse(source: &Arc<str>, origin: &str) -> (SourceAst, Vec<Diagnostic>) {
    let mut ast = SourceAst::default();
    let mut diagnostics = Vec::new();
    let mut current: Option<ViewDecl> = None;
    let mut offset = 0usize;

    let error = |code: &str, message: String, span: Span| {
        Diagnostic::new(Severity::Error, code, message, origin, span, source.clone())
    };
    let warning = |code: &str, message: String, span: Span| {
        Diagnostic::new(Severity::Warning, code, message, origin, span, source.clone())
    };

    for (index, segment) in source.split_inclusive('\n').enumerate() {
        let line_number = (index + 1) as u32;
        let content = segment.trim_end_matches(['\n', '\r']);
        let trimmed = content.trim();
        let leading = content.len() - content.trim_start().len();
        let span = Span::new(offset + leading, offset + leading + trimmed.len());
        offset += segment.len();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut parts = trimmed.splitn(2, char::is_whitespace);
        let keyword = parts.next().unwrap_or("");
        let rest = parts.next().unwrap_or("").trim();

        match keyword {
            "pragma" => {
                if rest == "strict" {
                    ast.strict = true;
                } else {
                    diagnostics.push(warning(
                        "W0003",
                        format!("unknown pragma `{}`", rest),
                        span,
                    ));
                }
            }
            "view" => {
                if !is_identifier(rest) {
                    diagnostics.push(error(
                        "E0001",
                        format!("malformed view declaration `{}`", trimmed),
                        span,
                    ));
                    continue;
                }
                if let Some(open) = current.take() {
                    diagnostics.push(error(
                        "E0002",
                        format!(
                            "view `{}` begins before view `{}` ends",
                            rest, open.name
                        ),
                        span,
                    ));
                    ast.views.push(open);
                }
                current = Some(ViewDecl {
                    name: rest.to_string(),
                    span,
                    line: line_number,
                    uses: Vec::new(),
                    fields: Vec::new(),
                });
            }
            "use" => {
                if !is_symbol_path(rest) {
                    diagnostics.push(error(
                        "E0001",
                        format!("malformed use declaration `{}`", trimmed),
                        span,
                    ));
                    continue;
                }
                match current.as_mut() {
                    Some(view) => view.uses.push(UseDecl {
                        symbol: rest.to_string(),
                        span,
                    }),
                    None => diagnostics.push(error(
                        "E0002",
                        "`use` outside a view".to_string(),
                        span,
                    )),
                }
            }
            "field" => {
                let field = rest.split_once(':').and_then(|(name, ty)| {
                    let name = name.trim();
                    let ty = ty.trim();
                    (is_identifier(name) && is_identifier(ty)).then(|| FieldDecl {
                        name: name.to_string(),
                        ty: ty.to_string(),
                        span,
                    })
                });
                match (field, current.as_mut()) {
                    (Some(field), Some(view)) => view.fields.push(field),
                    (None, _) => diagnostics.push(error(
                        "E0001",
                        format!("malformed field declaration `{}`", trimmed),
                        span,
                    )),
                    (Some(_), None) => diagnostics.push(error(
                        "E0002",
                        "`field` outside a view".to_string(),
                        span,
                    )),
                }
            }
            "end" => match current.take() {
                Some(view) => ast.views.push(view),
                None => diagnostics.push(error(
                    "E0002",
                    "`end` without an open view".to_string(),
                    span,
                )),
            },
            _ => diagnostics.push(error(
                "E0001",
                format!("unrecognized directive `{}`", keyword),
                span,
            )),
        }
    }

    if let Some(open) = current.take() {
        diagnostics.push(error(
            "E0002",
            format!("missing `end` for view `{}`", open.name),
            open.span,
        ));
        ast.views.push(open);
    }

    (ast, diagnostics)
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Dotted symbol path: `ident(.ident)*`
fn is_symbol_path(text: &str) -> bool {
    !text.is_empty() && text.split('.').all(is_identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_text(text: &str) -> (SourceAst, Vec<Diagnostic>) {
        parse(&Arc::from(text), "views/test.vml")
    }

    #[test]
    fn test_parse_single_view() {
        let (ast, diagnostics) = parse_text(
            "# generated\nview Home_View0\n  use layout.render\n  field title: str\nend\n",
        );
        assert!(diagnostics.is_empty());
        assert_eq!(ast.views.len(), 1);

        let view = &ast.views[0];
        assert_eq!(view.name, "Home_View0");
        assert_eq!(view.line, 2);
        assert_eq!(view.uses.len(), 1);
        assert_eq!(view.uses[0].symbol, "layout.render");
        assert_eq!(view.fields.len(), 1);
        assert_eq!(view.fields[0].name, "title");
        assert_eq!(view.fields[0].ty, "str");
    }

    #[test]
    fn test_parse_strict_pragma() {
        let (ast, diagnostics) = parse_text("pragma strict\nview A\nend\n");
        assert!(ast.strict);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unknown_pragma_is_warning() {
        let (ast, diagnostics) = parse_text("pragma fancy\nview A\nend\n");
        assert!(!ast.strict);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, "W0003");
        assert_eq!(diagnostics[0].severity, Severity::Warning);
    }

    #[test]
    fn test_unrecognized_directive() {
        let (_, diagnostics) = parse_text("view A\n  render title\nend\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, "E0001");
        assert!(diagnostics[0].message.contains("render"));
    }

    #[test]
    fn test_missing_end() {
        let (ast, diagnostics) = parse_text("view A\n  field x: int\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, "E0002");
        assert!(diagnostics[0].message.contains("missing `end`"));
        // the partial view is still recorded
        assert_eq!(ast.views.len(), 1);
    }

    #[test]
    fn test_use_outside_view() {
        let (_, diagnostics) = parse_text("use layout.render\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, "E0002");
    }

    #[test]
    fn test_span_points_at_directive() {
        let source = "view A\n  use missing.helper\nend\n";
        let (ast, _) = parse_text(source);
        let span = ast.views[0].uses[0].span;
        assert_eq!(&source[span.start..span.end], "use missing.helper");
    }
}
