//! Loaded modules and the host loader contract
//!
//! Once the backend emits a module image, the host runtime's loader turns it
//! into a live, introspectable module resident in the process. The loader is
//! a collaborator: the service only knows "load these bytes, enumerate the
//! exported types".

use std::fmt;
use std::sync::Arc;

use crate::image::ImageBuffer;

/// One member of an exported type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeMember {
    pub name: String,
    pub ty: String,
}

/// Structural description of a type exported by a loaded module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeShape {
    pub name: String,
    pub members: Vec<TypeMember>,
}

impl TypeShape {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }
}

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{ ", self.name)?;
        for (i, member) in self.members.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", member.name, member.ty)?;
        }
        write!(f, " }}")
    }
}

/// A module loaded into the running process
pub trait LoadedModule: Send + Sync {
    /// Module name recorded in the image
    fn name(&self) -> &str;

    /// Publicly exported types, in the order the image declares them
    fn exported_types(&self) -> Vec<TypeShape>;

    /// Source line of an exported type, when the module was loaded with a
    /// symbol image
    fn source_line(&self, type_name: &str) -> Option<u32>;
}

/// Host runtime capability: load an in-memory module image into the process
pub trait ModuleLoader: Send + Sync {
    /// Load a module image (and optional symbol image), both positioned at
    /// their start
    fn load(
        &self,
        binary: &mut ImageBuffer,
        symbols: Option<&mut ImageBuffer>,
    ) -> Result<Arc<dyn LoadedModule>, LoadError>;
}

/// Why the host loader rejected a module image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// Image bytes are not a well-formed module image
    Malformed(String),
    /// Image was produced by an incompatible format version
    UnsupportedVersion(u16),
    /// Image was built for a different target than the running process
    ForeignTarget { expected: String, found: String },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Malformed(reason) => write!(f, "malformed module image: {}", reason),
            LoadError::UnsupportedVersion(version) => {
                write!(f, "unsupported module image format version {}", version)
            }
            LoadError::ForeignTarget { expected, found } => write!(
                f,
                "module image targets {} but the host is {}",
                found, expected
            ),
        }
    }
}

impl std::error::Error for LoadError {}
