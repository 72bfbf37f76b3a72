//! Application reference set
//!
//! The full reference list for the hosting application, resolved once on
//! first use and reused for every compilation afterwards. This is a
//! deliberate build-once snapshot: later changes to the application's
//! library set are not picked up for the rest of the process lifetime.

use std::sync::{Arc, OnceLock};

use log::info;
use parking_lot::Mutex;
use viewforge_backend::{LibraryManager, ResolvedReference};

use crate::error::ServiceError;
use crate::resolver::ReferenceResolver;

/// Lazily-computed, process-lifetime reference snapshot
pub struct ApplicationReferences {
    application: String,
    resolver: ReferenceResolver,
    libraries: Arc<dyn LibraryManager>,
    resolved: OnceLock<Arc<Vec<ResolvedReference>>>,
    init: Mutex<()>,
}

impl ApplicationReferences {
    pub fn new(
        application: impl Into<String>,
        resolver: ReferenceResolver,
        libraries: Arc<dyn LibraryManager>,
    ) -> Self {
        Self {
            application: application.into(),
            resolver,
            libraries,
            resolved: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    /// The resolved reference list. The first successful call computes it;
    /// every later call returns the same list. Concurrent first calls
    /// serialize so only one resolution pass runs. A failed computation is
    /// not retained, so the error propagates and a later call starts over.
    pub fn get(&self) -> Result<Arc<Vec<ResolvedReference>>, ServiceError> {
        if let Some(found) = self.resolved.get() {
            return Ok(found.clone());
        }

        let _guard = self.init.lock();
        if let Some(found) = self.resolved.get() {
            return Ok(found.clone());
        }

        let descriptors = self.libraries.exported_references(&self.application);
        let mut resolved = Vec::with_capacity(descriptors.len());
        for descriptor in &descriptors {
            resolved.push(self.resolver.resolve(descriptor)?);
        }
        info!(
            "resolved {} references for application `{}`",
            resolved.len(),
            self.application
        );

        let resolved = Arc::new(resolved);
        Ok(self.resolved.get_or_init(|| resolved).clone())
    }

    /// The resolver (and its metadata cache) backing this reference set
    pub fn resolver(&self) -> &ReferenceResolver {
        &self.resolver
    }
}
