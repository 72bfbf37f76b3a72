//! Environment and contract failures
//!
//! Everything here is distinct from a source diagnostic: a `ServiceError`
//! means the compilation pipeline itself is broken (misconfigured
//! application, unreadable reference, loader rejection, generator not
//! honoring the naming convention), not that the submitted source has an
//! error. Source problems come back as `CompilationResult::Failure`.

use thiserror::Error;
use viewforge_backend::{BackendError, LoadError, MetadataError, ProjectEmitError};

/// Error type for compilation-environment failures
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unsupported reference descriptor kind `{0}`")]
    UnsupportedReferenceKind(&'static str),

    #[error("failed to read reference `{path}`")]
    ReferenceIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse reference metadata for `{path}`")]
    MetadataParse {
        path: String,
        #[source]
        source: MetadataError,
    },

    #[error("project reference `{name}` failed to emit its image")]
    ProjectEmit {
        name: String,
        #[source]
        source: ProjectEmitError,
    },

    #[error("compiler backend malfunction")]
    Backend(#[from] BackendError),

    #[error("host loader rejected the emitted module image")]
    ModuleLoad(#[from] LoadError),

    #[error("compiled module exports no type matching prefix `{prefix}`")]
    EntryTypeNotFound { prefix: String },
}
