//! The vml compiler backend

use std::any::Any;
use std::sync::Arc;

use log::debug;
use viewforge_backend::{
    BackendError, CompilerBackend, Diagnostic, EmitBuffers, EmitResult, MetadataError,
    ParsedMetadata, ResolvedReference, Severity, SyntaxUnit,
};

use crate::checker;
use crate::format;
use crate::image::{
    self, MemberManifest, ModuleManifest, SymbolEntry, SymbolManifest, TypeManifest,
};
use crate::parser::{self, SourceAst};

/// Compiler backend for the view module language
#[derive(Debug, Clone, Copy, Default)]
pub struct VmlBackend;

impl VmlBackend {
    pub fn new() -> Self {
        Self
    }
}

/// Parsed vml document, retained between parse and emit
struct VmlUnit {
    origin: String,
    source: Arc<str>,
    ast: SourceAst,
    parse_diagnostics: Vec<Diagnostic>,
}

impl SyntaxUnit for VmlUnit {
    fn origin(&self) -> &str {
        &self.origin
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl CompilerBackend for VmlBackend {
    fn parse(&self, source: &str, origin: &str) -> Box<dyn SyntaxUnit> {
        let source: Arc<str> = Arc::from(source);
        let (ast, parse_diagnostics) = parser::parse(&source, origin);
        Box::new(VmlUnit {
            origin: origin.to_string(),
            source,
            ast,
            parse_diagnostics,
        })
    }

    fn parse_metadata(
        &self,
        origin: &str,
        bytes: Vec<u8>,
    ) -> Result<ParsedMetadata, MetadataError> {
        let (manifest, _triple) = image::read_module(&mut bytes.as_slice())
            .map_err(|e| MetadataError::new(format!("{}: {}", origin, e)))?;

        let mut exports = manifest.exports;
        for ty in &manifest.types {
            if !exports.contains(&ty.name) {
                exports.push(ty.name.clone());
            }
        }

        Ok(ParsedMetadata::new(origin, exports, bytes))
    }

    fn emit(
        &self,
        unit: &dyn SyntaxUnit,
        module_name: &str,
        references: &[ResolvedReference],
        output: &mut EmitBuffers,
    ) -> Result<EmitResult, BackendError> {
        let unit = unit
            .as_any()
            .downcast_ref::<VmlUnit>()
            .ok_or_else(|| BackendError::new("syntax unit was not produced by this backend"))?;

        let (exports, mut diagnostics) =
            checker::collect_exports(references, &unit.origin, &unit.source);
        diagnostics.extend(unit.parse_diagnostics.iter().cloned());
        diagnostics.extend(checker::check(&unit.ast, &unit.origin, &unit.source, &exports));

        if unit.ast.strict {
            for diagnostic in &mut diagnostics {
                if diagnostic.severity == Severity::Warning {
                    diagnostic.warning_as_error = true;
                }
            }
        }

        // stable sort keeps relative order of same-position diagnostics
        diagnostics.sort_by_key(|d| d.span.start);

        if diagnostics.iter().any(Diagnostic::is_error) {
            debug!(
                "emit of `{}` as `{}` failed with {} diagnostics",
                unit.origin,
                module_name,
                diagnostics.len()
            );
            return Ok(EmitResult::failed(diagnostics));
        }

        let manifest = ModuleManifest {
            name: module_name.to_string(),
            exports: unit.ast.views.iter().map(|v| v.name.clone()).collect(),
            types: unit
                .ast
                .views
                .iter()
                .map(|view| TypeManifest {
                    name: view.name.clone(),
                    members: view
                        .fields
                        .iter()
                        .map(|field| MemberManifest {
                            name: field.name.clone(),
                            ty: field.ty.clone(),
                        })
                        .collect(),
                })
                .collect(),
        };
        image::write_module(&mut output.binary, &manifest)
            .map_err(|e| BackendError::new(format!("failed to write module image: {}", e)))?;

        if let Some(symbols) = output.symbols.as_mut() {
            let symbol_manifest = SymbolManifest {
                module: module_name.to_string(),
                entries: unit
                    .ast
                    .views
                    .iter()
                    .map(|view| SymbolEntry {
                        view: view.name.clone(),
                        line: view.line,
                    })
                    .collect(),
            };
            image::write_symbols(symbols, &symbol_manifest)
                .map_err(|e| BackendError::new(format!("failed to write symbol image: {}", e)))?;
        }

        debug!(
            "emitted `{}` as module `{}` ({} bytes)",
            unit.origin,
            module_name,
            output.binary.len()
        );
        Ok(EmitResult::succeeded(diagnostics))
    }

    fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        format::render(diagnostic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viewforge_backend::{LoadError, ModuleLoader};

    fn emit_text(
        source: &str,
        references: &[ResolvedReference],
        with_symbols: bool,
    ) -> (EmitResult, EmitBuffers) {
        let backend = VmlBackend::new();
        let unit = backend.parse(source, "views/test.vml");
        let mut buffers = EmitBuffers::new(with_symbols);
        let result = backend
            .emit(unit.as_ref(), "vf_dyn_test", references, &mut buffers)
            .unwrap();
        (result, buffers)
    }

    #[test]
    fn test_emit_success_writes_image() {
        let (result, buffers) =
            emit_text("view Home_View0\n  field title: str\nend\n", &[], true);
        assert!(result.success);
        assert!(result.diagnostics.is_empty());
        assert!(!buffers.binary.is_empty());
        assert!(buffers.symbols.map(|s| !s.is_empty()).unwrap_or(false));
    }

    #[test]
    fn test_emit_failure_reports_unresolved_symbol() {
        let (result, _buffers) = emit_text(
            "view Home_View0\n  use missing.helper\n  field title: str\nend\n",
            &[],
            false,
        );
        assert!(!result.success);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].code, "E1001");
    }

    #[test]
    fn test_emit_success_with_plain_warning() {
        let (result, _) = emit_text(
            "view Home_View0\n  field title: widget\nend\n",
            &[],
            false,
        );
        assert!(result.success);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].code, "W0002");
    }

    #[test]
    fn test_strict_escalates_warnings() {
        let (result, _) = emit_text(
            "pragma strict\nview Home_View0\n  field title: widget\nend\n",
            &[],
            false,
        );
        assert!(!result.success);
        assert_eq!(result.diagnostics.len(), 1);
        assert!(result.diagnostics[0].warning_as_error);
        assert_eq!(result.diagnostics[0].severity, Severity::Warning);
    }

    #[test]
    fn test_symbol_visible_through_metadata_reference() {
        let backend = VmlBackend::new();
        let library = crate::library::LibraryBuilder::new("layout")
            .export("layout.render")
            .build()
            .unwrap();
        let metadata = backend.parse_metadata("/libs/layout.vfm", library).unwrap();

        let (result, _) = emit_text(
            "view Home_View0\n  use layout.render\n  field title: str\nend\n",
            &[ResolvedReference::Metadata(Arc::new(metadata))],
            false,
        );
        assert!(result.success);
    }

    #[test]
    fn test_emitted_image_loads() {
        let (result, mut buffers) =
            emit_text("view Home_View0\n  field title: str\nend\n", &[], false);
        assert!(result.success);

        buffers.rewind();
        let loader = crate::loader::InProcessLoader::new();
        let module = loader.load(&mut buffers.binary, None);
        assert!(module.is_ok());
    }

    #[test]
    fn test_metadata_parse_rejects_garbage() {
        let backend = VmlBackend::new();
        let err = backend.parse_metadata("/libs/bad.vfm", vec![0u8; 16]);
        assert!(err.is_err());
    }

    #[test]
    fn test_loader_rejects_unrewound_buffer() {
        let (result, mut buffers) =
            emit_text("view Home_View0\n  field title: str\nend\n", &[], false);
        assert!(result.success);

        // position is at the end of the written image; loading must fail
        let loader = crate::loader::InProcessLoader::new();
        let err = match loader.load(&mut buffers.binary, None) {
            Ok(_) => panic!("expected load to fail"),
            Err(e) => e,
        };
        assert_eq!(err, LoadError::Malformed("image is truncated".to_string()));
    }
}
