//! Reference descriptor resolution
//!
//! Converts the heterogeneous descriptors the library manager hands out into
//! uniform backend references. File-path descriptors go through the metadata
//! cache; project outputs are emitted synchronously into a fresh image on
//! every resolution, since project output can change between calls.

use std::sync::Arc;

use viewforge_backend::{
    CompilerBackend, FileSystem, ReferenceDescriptor, ResolvedReference,
};

use crate::cache::MetadataCache;
use crate::error::ServiceError;

/// Resolves reference descriptors into compiler-consumable references
pub struct ReferenceResolver {
    backend: Arc<dyn CompilerBackend>,
    fs: Arc<dyn FileSystem>,
    cache: MetadataCache,
}

impl ReferenceResolver {
    pub fn new(backend: Arc<dyn CompilerBackend>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            backend,
            fs,
            cache: MetadataCache::new(),
        }
    }

    /// Resolve one descriptor
    pub fn resolve(
        &self,
        descriptor: &ReferenceDescriptor,
    ) -> Result<ResolvedReference, ServiceError> {
        match descriptor {
            ReferenceDescriptor::Resolved(reference) => Ok(reference.clone()),
            ReferenceDescriptor::EmbeddedImage(bytes) => {
                Ok(ResolvedReference::Image(bytes.clone()))
            }
            ReferenceDescriptor::FilePath(path) => {
                let metadata =
                    self.cache
                        .get_or_create(path, self.backend.as_ref(), self.fs.as_ref())?;
                Ok(ResolvedReference::Metadata(metadata))
            }
            ReferenceDescriptor::ProjectOutput(project) => {
                let bytes =
                    project
                        .emit_reference_image()
                        .map_err(|source| ServiceError::ProjectEmit {
                            name: project.name().to_string(),
                            source,
                        })?;
                Ok(ResolvedReference::Image(Arc::from(bytes)))
            }
            other => Err(ServiceError::UnsupportedReferenceKind(other.kind_name())),
        }
    }

    /// The metadata cache backing file-path resolution
    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viewforge_backend::{ProjectEmitError, ProjectReference, StdFileSystem};
    use viewforge_vml::{LibraryBuilder, VmlBackend};

    fn resolver() -> ReferenceResolver {
        ReferenceResolver::new(Arc::new(VmlBackend::new()), Arc::new(StdFileSystem))
    }

    struct FixedProject {
        name: String,
        bytes: Result<Vec<u8>, String>,
    }

    impl ProjectReference for FixedProject {
        fn name(&self) -> &str {
            &self.name
        }

        fn emit_reference_image(&self) -> Result<Vec<u8>, ProjectEmitError> {
            self.bytes.clone().map_err(ProjectEmitError::new)
        }
    }

    #[test]
    fn test_already_resolved_passes_through() {
        let reference = ResolvedReference::Image(Arc::from(vec![1u8, 2, 3]));
        let resolved = resolver()
            .resolve(&ReferenceDescriptor::Resolved(reference))
            .unwrap();
        assert_eq!(resolved.image_bytes(), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn test_embedded_image_wraps_bytes() {
        let bytes: Arc<[u8]> = Arc::from(vec![9u8, 8, 7]);
        let resolved = resolver()
            .resolve(&ReferenceDescriptor::EmbeddedImage(bytes.clone()))
            .unwrap();
        assert_eq!(resolved.image_bytes(), Some(&bytes[..]));
    }

    #[test]
    fn test_file_path_goes_through_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.vfm");
        std::fs::write(
            &path,
            LibraryBuilder::new("layout")
                .export("layout.render")
                .build()
                .unwrap(),
        )
        .unwrap();
        let path = path.to_string_lossy().into_owned();

        let resolver = resolver();
        let first = resolver
            .resolve(&ReferenceDescriptor::FilePath(path.clone()))
            .unwrap();
        let second = resolver
            .resolve(&ReferenceDescriptor::FilePath(path))
            .unwrap();

        let first = first.metadata().unwrap();
        let second = second.metadata().unwrap();
        assert!(Arc::ptr_eq(first, second));
        assert_eq!(resolver.cache().len(), 1);
    }

    #[test]
    fn test_project_output_emits_fresh_image() {
        let bytes = LibraryBuilder::new("companion")
            .export("companion.helper")
            .build()
            .unwrap();
        let project = Arc::new(FixedProject {
            name: "companion".to_string(),
            bytes: Ok(bytes.clone()),
        });

        let resolved = resolver()
            .resolve(&ReferenceDescriptor::ProjectOutput(project))
            .unwrap();
        assert_eq!(resolved.image_bytes(), Some(&bytes[..]));
    }

    #[test]
    fn test_project_emit_failure_is_environment_error() {
        let project = Arc::new(FixedProject {
            name: "companion".to_string(),
            bytes: Err("build is broken".to_string()),
        });

        let err = resolver()
            .resolve(&ReferenceDescriptor::ProjectOutput(project))
            .unwrap_err();
        assert!(matches!(err, ServiceError::ProjectEmit { .. }));
    }
}
