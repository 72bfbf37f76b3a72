//! # Viewforge Compilation Service
//!
//! Dynamic source-compilation service: compiles generated view source
//! against the hosting application's reference libraries into an in-memory
//! module image, loads the image into the running process, and returns a
//! handle to the entry view type, or the compiler's diagnostics when the
//! source does not compile.
//!
//! The service is safe to call from parallel threads. Reference metadata is
//! parsed once per file path and cached for the process lifetime; the
//! application's full reference set is resolved once on first use and never
//! recomputed.

pub mod cache;
pub mod config;
pub mod entry;
pub mod error;
pub mod references;
pub mod resolver;
pub mod result;
pub mod service;

mod engine;
mod translate;

pub use cache::MetadataCache;
pub use config::ServiceConfig;
pub use entry::EntryType;
pub use error::ServiceError;
pub use references::ApplicationReferences;
pub use resolver::ReferenceResolver;
pub use result::{CompilationMessage, CompilationResult, SourceDocument};
pub use service::CompilationService;
