//! Reference descriptors and resolved references
//!
//! The hosting application describes its libraries as `ReferenceDescriptor`s;
//! the service resolves each into a `ResolvedReference` the backend can
//! consume directly. Descriptor kinds are open-ended (the enum is
//! non-exhaustive), so resolvers must treat unknown kinds as a failure.

use std::fmt;
use std::sync::Arc;

use crate::metadata::ParsedMetadata;

/// A backend-consumable reference: either shared parsed metadata or a raw
/// in-memory library image
#[derive(Clone)]
pub enum ResolvedReference {
    /// Parsed metadata handle, shared via the process-wide cache
    Metadata(Arc<ParsedMetadata>),
    /// Raw library image bytes, materialized per resolution
    Image(Arc<[u8]>),
}

impl ResolvedReference {
    pub fn metadata(&self) -> Option<&Arc<ParsedMetadata>> {
        match self {
            ResolvedReference::Metadata(metadata) => Some(metadata),
            ResolvedReference::Image(_) => None,
        }
    }

    pub fn image_bytes(&self) -> Option<&[u8]> {
        match self {
            ResolvedReference::Metadata(_) => None,
            ResolvedReference::Image(bytes) => Some(bytes),
        }
    }
}

impl fmt::Debug for ResolvedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedReference::Metadata(metadata) => f
                .debug_struct("Metadata")
                .field("origin", &metadata.origin())
                .finish(),
            ResolvedReference::Image(bytes) => {
                f.debug_struct("Image").field("len", &bytes.len()).finish()
            }
        }
    }
}

/// How the hosting application describes one of its reference libraries
#[non_exhaustive]
#[derive(Clone)]
pub enum ReferenceDescriptor {
    /// Already a backend reference; passes through resolution unchanged
    Resolved(ResolvedReference),
    /// Library image embedded in the application itself
    EmbeddedImage(Arc<[u8]>),
    /// Library on disk, resolved through the metadata cache
    FilePath(String),
    /// Companion project whose output is emitted on the fly
    ProjectOutput(Arc<dyn ProjectReference>),
}

impl ReferenceDescriptor {
    /// Short name of the descriptor kind, for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            ReferenceDescriptor::Resolved(_) => "resolved",
            ReferenceDescriptor::EmbeddedImage(_) => "embedded-image",
            ReferenceDescriptor::FilePath(_) => "file-path",
            ReferenceDescriptor::ProjectOutput(_) => "project-output",
        }
    }
}

impl fmt::Debug for ReferenceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceDescriptor::Resolved(reference) => {
                f.debug_tuple("Resolved").field(reference).finish()
            }
            ReferenceDescriptor::EmbeddedImage(bytes) => f
                .debug_struct("EmbeddedImage")
                .field("len", &bytes.len())
                .finish(),
            ReferenceDescriptor::FilePath(path) => {
                f.debug_tuple("FilePath").field(path).finish()
            }
            ReferenceDescriptor::ProjectOutput(project) => f
                .debug_struct("ProjectOutput")
                .field("name", &project.name())
                .finish(),
        }
    }
}

/// A companion project that can emit its reference image on demand.
/// `emit_reference_image` must fully materialize the buffer before returning.
pub trait ProjectReference: Send + Sync {
    /// Project name, for error messages
    fn name(&self) -> &str;

    /// Emit the project's library image into a byte buffer
    fn emit_reference_image(&self) -> Result<Vec<u8>, ProjectEmitError>;
}

/// Error type for project reference emission failures
#[derive(Debug, Clone)]
pub struct ProjectEmitError {
    pub message: String,
}

impl ProjectEmitError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl fmt::Display for ProjectEmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Project emit error: {}", self.message)
    }
}

impl std::error::Error for ProjectEmitError {}

impl From<String> for ProjectEmitError {
    fn from(s: String) -> Self {
        Self { message: s }
    }
}
