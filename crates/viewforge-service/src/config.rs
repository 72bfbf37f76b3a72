//! Service configuration

use serde::{Deserialize, Serialize};

/// Configuration captured once at service construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Name of the hosting application, passed to the library manager when
    /// enumerating reference descriptors
    pub application_name: String,
    /// Naming convention for entry types: the first exported type whose name
    /// starts with this prefix is the compile result
    pub class_name_prefix: String,
    /// Whether the host runtime supports separate debug-symbol streams.
    /// Resolved once at startup and never re-checked per call.
    #[serde(default = "default_debug_symbols")]
    pub debug_symbols_supported: bool,
}

fn default_debug_symbols() -> bool {
    true
}

impl ServiceConfig {
    pub fn new(application_name: impl Into<String>, class_name_prefix: impl Into<String>) -> Self {
        Self {
            application_name: application_name.into(),
            class_name_prefix: class_name_prefix.into(),
            debug_symbols_supported: true,
        }
    }

    pub fn with_debug_symbols(mut self, supported: bool) -> Self {
        self.debug_symbols_supported = supported;
        self
    }
}
