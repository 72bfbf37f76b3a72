//! Programmatic construction of reference library images
//!
//! Companion projects and tests use this to produce the same image format
//! the backend emits, without going through source text.

use std::io;

use crate::image::{self, MemberManifest, ModuleManifest, TypeManifest};

/// Builder for a reference library image
#[derive(Debug, Clone)]
pub struct LibraryBuilder {
    name: String,
    exports: Vec<String>,
    types: Vec<TypeManifest>,
}

impl LibraryBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exports: Vec::new(),
            types: Vec::new(),
        }
    }

    /// Export a symbol (e.g. `layout.render`)
    pub fn export(mut self, symbol: impl Into<String>) -> Self {
        self.exports.push(symbol.into());
        self
    }

    /// Add an exported type with `(name, type)` members; the type name is
    /// exported as a symbol as well
    pub fn view(mut self, name: impl Into<String>, members: &[(&str, &str)]) -> Self {
        let name = name.into();
        self.exports.push(name.clone());
        self.types.push(TypeManifest {
            name,
            members: members
                .iter()
                .map(|(member, ty)| MemberManifest {
                    name: member.to_string(),
                    ty: ty.to_string(),
                })
                .collect(),
        });
        self
    }

    /// Serialize the library to module-image bytes targeting the host
    pub fn build(self) -> io::Result<Vec<u8>> {
        let manifest = ModuleManifest {
            name: self.name,
            exports: self.exports,
            types: self.types,
        };
        let mut bytes = Vec::new();
        image::write_module(&mut bytes, &manifest)?;
        Ok(bytes)
    }
}
