//! Parsed reference metadata
//!
//! The backend parses an on-disk library image once into a `ParsedMetadata`
//! handle; the service caches the handle process-wide and shares it across
//! compilations. Handles are read-only after creation.

use std::fmt;
use std::sync::Arc;

/// Parsed binary metadata of a reference library
#[derive(Debug, Clone)]
pub struct ParsedMetadata {
    origin: String,
    exports: Vec<String>,
    image: Arc<[u8]>,
}

impl ParsedMetadata {
    pub fn new(origin: impl Into<String>, exports: Vec<String>, image: Vec<u8>) -> Self {
        Self {
            origin: origin.into(),
            exports,
            image: Arc::from(image),
        }
    }

    /// Path (or other identity) this metadata was parsed from
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Symbols this library makes visible to compilations referencing it
    pub fn exports(&self) -> &[String] {
        &self.exports
    }

    pub fn exports_symbol(&self, symbol: &str) -> bool {
        self.exports.iter().any(|s| s == symbol)
    }

    /// Raw bytes of the underlying library image
    pub fn image(&self) -> &[u8] {
        &self.image
    }
}

/// Error type for metadata parse failures
#[derive(Debug, Clone)]
pub struct MetadataError {
    pub message: String,
}

impl MetadataError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl fmt::Display for MetadataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Metadata error: {}", self.message)
    }
}

impl std::error::Error for MetadataError {}

impl From<String> for MetadataError {
    fn from(s: String) -> Self {
        Self { message: s }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_lookup() {
        let metadata = ParsedMetadata::new(
            "/libs/layout.vfm",
            vec!["layout.render".to_string(), "layout.head".to_string()],
            vec![1, 2, 3],
        );
        assert!(metadata.exports_symbol("layout.render"));
        assert!(!metadata.exports_symbol("layout.missing"));
        assert_eq!(metadata.origin(), "/libs/layout.vfm");
        assert_eq!(metadata.image(), &[1, 2, 3]);
    }
}
