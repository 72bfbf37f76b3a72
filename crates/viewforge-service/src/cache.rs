//! Process-wide reference metadata cache
//!
//! Maps a reference's file path to its parsed metadata so the same on-disk
//! library is never parsed twice. Lookup is case-insensitive on the path.
//! The cache is unbounded and never evicts: the set of distinct file-path
//! references in a process is assumed small and stable.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, trace};
use parking_lot::RwLock;
use viewforge_backend::{CompilerBackend, FileSystem, ParsedMetadata};

use crate::error::ServiceError;

/// Keyed store of parsed reference metadata
#[derive(Default)]
pub struct MetadataCache {
    entries: RwLock<HashMap<String, Arc<ParsedMetadata>>>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached metadata for `path`, parsing it from disk on first
    /// use. Concurrent calls for the same path may both parse; the first
    /// writer wins and every caller receives the retained instance.
    pub fn get_or_create(
        &self,
        path: &str,
        backend: &dyn CompilerBackend,
        fs: &dyn FileSystem,
    ) -> Result<Arc<ParsedMetadata>, ServiceError> {
        let key = path.to_lowercase();

        if let Some(found) = self.entries.read().get(&key) {
            trace!("metadata cache hit for `{}`", path);
            return Ok(found.clone());
        }

        let bytes = fs
            .read_file_bytes(path)
            .map_err(|source| ServiceError::ReferenceIo {
                path: path.to_string(),
                source,
            })?;
        let parsed = backend
            .parse_metadata(path, bytes)
            .map_err(|source| ServiceError::MetadataParse {
                path: path.to_string(),
                source,
            })?;
        debug!(
            "parsed reference metadata for `{}` ({} exports)",
            path,
            parsed.exports().len()
        );

        let mut entries = self.entries.write();
        let retained = entries
            .entry(key)
            .or_insert_with(|| Arc::new(parsed))
            .clone();
        Ok(retained)
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
