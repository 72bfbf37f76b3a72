//! The compilation service
//!
//! Orchestrates one compile call: warm the application reference set, drive
//! the backend through an in-memory emit, then either translate diagnostics
//! into a failure result or load the image and resolve the entry type.

use std::sync::Arc;

use log::debug;
use viewforge_backend::{CompilerBackend, FileSystem, LibraryManager, ModuleLoader};

use crate::config::ServiceConfig;
use crate::engine::{self, EmitOutcome};
use crate::entry::find_entry_type;
use crate::error::ServiceError;
use crate::references::ApplicationReferences;
use crate::resolver::ReferenceResolver;
use crate::result::{CompilationResult, SourceDocument};
use crate::translate::translate;

/// Compiles view source into loaded modules for one hosting application
pub struct CompilationService {
    backend: Arc<dyn CompilerBackend>,
    loader: Arc<dyn ModuleLoader>,
    references: ApplicationReferences,
    config: ServiceConfig,
}

impl CompilationService {
    pub fn new(
        config: ServiceConfig,
        backend: Arc<dyn CompilerBackend>,
        loader: Arc<dyn ModuleLoader>,
        libraries: Arc<dyn LibraryManager>,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        let resolver = ReferenceResolver::new(backend.clone(), fs);
        let references =
            ApplicationReferences::new(config.application_name.clone(), resolver, libraries);
        Self {
            backend,
            loader,
            references,
            config,
        }
    }

    /// Compile one source document.
    ///
    /// Returns `Ok(CompilationResult::Failure)` when the source has errors,
    /// and `Err(ServiceError)` when the compilation pipeline itself is
    /// broken (unreadable reference, loader rejection, missing entry type).
    pub fn compile(
        &self,
        document: &SourceDocument,
        source_text: &str,
    ) -> Result<CompilationResult, ServiceError> {
        let references = self.references.get()?;

        let outcome = engine::compile_unit(
            self.backend.as_ref(),
            source_text,
            document.path(),
            &references,
            self.config.debug_symbols_supported,
        )?;

        match outcome {
            EmitOutcome::Failure(diagnostics) => {
                let messages = translate(self.backend.as_ref(), &diagnostics);
                debug!(
                    "`{}` failed to compile: {} of {} diagnostics are errors",
                    document.path(),
                    messages.len(),
                    diagnostics.len()
                );
                Ok(CompilationResult::Failure {
                    source_text: source_text.to_string(),
                    messages,
                })
            }
            EmitOutcome::Success {
                mut binary,
                mut symbols,
            } => {
                let module = self.loader.load(&mut binary, symbols.as_mut())?;
                let entry = find_entry_type(module, &self.config.class_name_prefix)?;
                debug!(
                    "`{}` compiled into entry type `{}`",
                    document.path(),
                    entry.name()
                );
                Ok(CompilationResult::Success { entry })
            }
        }
    }

    /// The application reference set backing this service
    pub fn references(&self) -> &ApplicationReferences {
        &self.references
    }

    /// The configuration captured at construction
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}
