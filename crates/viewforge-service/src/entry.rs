//! Entry type resolution
//!
//! After a successful load, the compiled module is expected to export the
//! entry type under the naming convention established at construction: the
//! first exported type whose name starts with the configured prefix.

use std::fmt;
use std::sync::Arc;

use viewforge_backend::{LoadedModule, TypeShape};

use crate::error::ServiceError;

/// Handle to the entry type of a compiled module. Keeps the loaded module
/// alive for as long as the handle exists.
#[derive(Clone)]
pub struct EntryType {
    shape: TypeShape,
    module: Arc<dyn LoadedModule>,
}

impl EntryType {
    /// Simple name of the entry type
    pub fn name(&self) -> &str {
        &self.shape.name
    }

    /// Structural description of the entry type
    pub fn shape(&self) -> &TypeShape {
        &self.shape
    }

    /// The module the entry type lives in
    pub fn module(&self) -> &Arc<dyn LoadedModule> {
        &self.module
    }
}

impl fmt::Debug for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryType")
            .field("shape", &self.shape)
            .field("module", &self.module.name())
            .finish()
    }
}

/// Select the entry type from a loaded module by name prefix, byte-wise
/// comparison, first match in loader order wins
pub(crate) fn find_entry_type(
    module: Arc<dyn LoadedModule>,
    prefix: &str,
) -> Result<EntryType, ServiceError> {
    let shape = module
        .exported_types()
        .into_iter()
        .find(|shape| shape.name.starts_with(prefix))
        .ok_or_else(|| ServiceError::EntryTypeNotFound {
            prefix: prefix.to_string(),
        })?;
    Ok(EntryType { shape, module })
}
