//! Compiler backend contract
//!
//! The service drives exactly one backend: parse the source into the
//! backend's own syntax representation, then emit a loadable module image
//! against a reference set. Parsing never fails by itself; everything wrong
//! with the source surfaces as diagnostics on the emit result, and a single
//! emit attempt is authoritative.

use std::any::Any;
use std::fmt;

use crate::diagnostic::Diagnostic;
use crate::image::EmitBuffers;
use crate::metadata::{MetadataError, ParsedMetadata};
use crate::reference::ResolvedReference;

/// Backend-private parsed representation of one source document
pub trait SyntaxUnit: Send {
    /// Identity of the document this unit was parsed from
    fn origin(&self) -> &str;

    /// Downcast support for the owning backend
    fn as_any(&self) -> &dyn Any;
}

/// Outcome of one emit attempt
#[derive(Debug, Clone)]
pub struct EmitResult {
    /// Whether a module image was written
    pub success: bool,
    /// Everything the backend reported, all severities, in source order
    pub diagnostics: Vec<Diagnostic>,
}

impl EmitResult {
    pub fn succeeded(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            success: true,
            diagnostics,
        }
    }

    pub fn failed(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            success: false,
            diagnostics,
        }
    }
}

/// The compiler backend the service wraps
pub trait CompilerBackend: Send + Sync {
    /// Parse source text, associating `origin` for diagnostic locations
    fn parse(&self, source: &str, origin: &str) -> Box<dyn SyntaxUnit>;

    /// Parse the bytes of an on-disk library into shared reference metadata
    fn parse_metadata(
        &self,
        origin: &str,
        bytes: Vec<u8>,
    ) -> Result<ParsedMetadata, MetadataError>;

    /// Compile one unit into `output` as a dynamically-loadable module named
    /// `module_name`, resolving symbols against `references`. Returns `Err`
    /// only when the backend itself malfunctions; source problems come back
    /// as a failed `EmitResult`.
    fn emit(
        &self,
        unit: &dyn SyntaxUnit,
        module_name: &str,
        references: &[ResolvedReference],
        output: &mut EmitBuffers,
    ) -> Result<EmitResult, BackendError>;

    /// Render a diagnostic to the consumer-facing message text
    fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String;
}

/// Error type for backend malfunctions (not source diagnostics)
#[derive(Debug, Clone)]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Backend error: {}", self.message)
    }
}

impl std::error::Error for BackendError {}

impl From<String> for BackendError {
    fn from(s: String) -> Self {
        Self { message: s }
    }
}

impl From<&str> for BackendError {
    fn from(s: &str) -> Self {
        Self {
            message: s.to_string(),
        }
    }
}
