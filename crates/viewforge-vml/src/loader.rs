//! In-process module loader
//!
//! Turns an emitted module image back into a live, introspectable module and
//! keeps it resident in a process-wide registry. The loader refuses images
//! it cannot trust: bad envelopes, images from a newer emitter, or images
//! built for a different target than the running host.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info};
use parking_lot::Mutex;
use viewforge_backend::{ImageBuffer, LoadError, LoadedModule, ModuleLoader, TypeShape};

use crate::image::{self, ImageError};

/// A vml module resident in the process
pub struct VmlModule {
    name: String,
    types: Vec<TypeShape>,
    lines: HashMap<String, u32>,
}

impl LoadedModule for VmlModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn exported_types(&self) -> Vec<TypeShape> {
        self.types.clone()
    }

    fn source_line(&self, type_name: &str) -> Option<u32> {
        self.lines.get(type_name).copied()
    }
}

/// Loader that keeps every loaded module alive for the process lifetime
#[derive(Default)]
pub struct InProcessLoader {
    loaded: Mutex<Vec<Arc<VmlModule>>>,
}

impl InProcessLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of modules loaded so far
    pub fn loaded_count(&self) -> usize {
        self.loaded.lock().len()
    }
}

impl ModuleLoader for InProcessLoader {
    fn load(
        &self,
        binary: &mut ImageBuffer,
        symbols: Option<&mut ImageBuffer>,
    ) -> Result<Arc<dyn LoadedModule>, LoadError> {
        let (manifest, triple) = image::read_module(binary).map_err(to_load_error)?;

        let host = image::host_triple();
        if triple != host {
            return Err(LoadError::ForeignTarget {
                expected: host,
                found: triple,
            });
        }

        let mut lines = HashMap::new();
        if let Some(symbols) = symbols {
            let symbol_manifest = image::read_symbols(symbols).map_err(to_load_error)?;
            if symbol_manifest.module != manifest.name {
                return Err(LoadError::Malformed(format!(
                    "symbol image belongs to module `{}`, not `{}`",
                    symbol_manifest.module, manifest.name
                )));
            }
            for entry in symbol_manifest.entries {
                lines.insert(entry.view, entry.line);
            }
            debug!("attached symbol image for module `{}`", manifest.name);
        }

        let module = Arc::new(VmlModule {
            name: manifest.name,
            types: manifest.types.iter().map(|t| t.to_shape()).collect(),
            lines,
        });

        self.loaded.lock().push(module.clone());
        info!(
            "loaded module `{}` ({} exported types)",
            module.name,
            module.types.len()
        );
        Ok(module)
    }
}

fn to_load_error(err: ImageError) -> LoadError {
    match err {
        ImageError::UnsupportedVersion(version) => LoadError::UnsupportedVersion(version),
        other => LoadError::Malformed(other.to_string()),
    }
}
