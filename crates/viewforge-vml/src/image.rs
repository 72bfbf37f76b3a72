//! Module and symbol image envelopes
//!
//! An emitted module is a small binary envelope (magic, format version,
//! target triple) wrapping a JSON manifest of the module's exported types.
//! Symbol images use the same envelope with their own magic and carry source
//! line information for debuggers.

use std::fmt;
use std::io::{self, Read, Write};

use serde::{Deserialize, Serialize};
use viewforge_backend::{TypeMember, TypeShape};

pub const MODULE_MAGIC: &[u8; 8] = b"VFMODIMG";
pub const SYMBOL_MAGIC: &[u8; 8] = b"VFSYMTAB";
pub const FORMAT_VERSION: u16 = 1;

/// Everything a module image records about itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleManifest {
    /// Synthetic module name assigned at emit time
    pub name: String,
    /// Symbols this module makes visible to units referencing it
    pub exports: Vec<String>,
    /// Exported types, in declaration order
    pub types: Vec<TypeManifest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeManifest {
    pub name: String,
    pub members: Vec<MemberManifest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberManifest {
    pub name: String,
    pub ty: String,
}

impl TypeManifest {
    pub fn to_shape(&self) -> TypeShape {
        TypeShape {
            name: self.name.clone(),
            members: self
                .members
                .iter()
                .map(|member| TypeMember {
                    name: member.name.clone(),
                    ty: member.ty.clone(),
                })
                .collect(),
        }
    }
}

/// Debug-symbol manifest: source lines of the module's exported types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolManifest {
    /// Name of the module the symbols belong to
    pub module: String,
    pub entries: Vec<SymbolEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub view: String,
    pub line: u32,
}

/// Target triple of the running process
pub fn host_triple() -> String {
    target_lexicon::Triple::host().to_string()
}

/// Error type for image decoding failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    /// Image ended before the envelope was complete
    Truncated,
    /// Magic bytes did not match the expected image kind
    BadMagic,
    /// Envelope declares a format version this reader does not understand
    UnsupportedVersion(u16),
    /// Envelope was intact but the manifest did not decode
    Payload(String),
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::Truncated => write!(f, "image is truncated"),
            ImageError::BadMagic => write!(f, "image magic does not match"),
            ImageError::UnsupportedVersion(version) => {
                write!(f, "unsupported image format version {}", version)
            }
            ImageError::Payload(reason) => write!(f, "invalid image payload: {}", reason),
        }
    }
}

impl std::error::Error for ImageError {}

/// Write a module image targeting the host
pub fn write_module(out: &mut impl Write, manifest: &ModuleManifest) -> io::Result<()> {
    write_module_with_triple(out, manifest, &host_triple())
}

/// Write a module image with an explicit target triple
pub fn write_module_with_triple(
    out: &mut impl Write,
    manifest: &ModuleManifest,
    triple: &str,
) -> io::Result<()> {
    let payload = serde_json::to_vec(manifest)?;
    write_envelope(out, MODULE_MAGIC, FORMAT_VERSION, triple, &payload)
}

/// Write a symbol image targeting the host
pub fn write_symbols(out: &mut impl Write, manifest: &SymbolManifest) -> io::Result<()> {
    let payload = serde_json::to_vec(manifest)?;
    write_envelope(out, SYMBOL_MAGIC, FORMAT_VERSION, &host_triple(), &payload)
}

/// Decode a module image, returning the manifest and the target triple it
/// was built for
pub fn read_module(input: &mut impl Read) -> Result<(ModuleManifest, String), ImageError> {
    let (triple, payload) = read_envelope(input, MODULE_MAGIC)?;
    let manifest =
        serde_json::from_slice(&payload).map_err(|e| ImageError::Payload(e.to_string()))?;
    Ok((manifest, triple))
}

/// Decode a symbol image
pub fn read_symbols(input: &mut impl Read) -> Result<SymbolManifest, ImageError> {
    let (_triple, payload) = read_envelope(input, SYMBOL_MAGIC)?;
    serde_json::from_slice(&payload).map_err(|e| ImageError::Payload(e.to_string()))
}

pub(crate) fn write_envelope(
    out: &mut impl Write,
    magic: &[u8; 8],
    version: u16,
    triple: &str,
    payload: &[u8],
) -> io::Result<()> {
    out.write_all(magic)?;
    out.write_all(&version.to_le_bytes())?;
    let triple_bytes = triple.as_bytes();
    out.write_all(&(triple_bytes.len() as u16).to_le_bytes())?;
    out.write_all(triple_bytes)?;
    out.write_all(&(payload.len() as u32).to_le_bytes())?;
    out.write_all(payload)?;
    Ok(())
}

fn read_envelope(
    input: &mut impl Read,
    expected_magic: &[u8; 8],
) -> Result<(String, Vec<u8>), ImageError> {
    let mut magic = [0u8; 8];
    read_all(input, &mut magic)?;
    if &magic != expected_magic {
        return Err(ImageError::BadMagic);
    }

    let mut version = [0u8; 2];
    read_all(input, &mut version)?;
    let version = u16::from_le_bytes(version);
    if version != FORMAT_VERSION {
        return Err(ImageError::UnsupportedVersion(version));
    }

    let mut triple_len = [0u8; 2];
    read_all(input, &mut triple_len)?;
    let mut triple = vec![0u8; u16::from_le_bytes(triple_len) as usize];
    read_all(input, &mut triple)?;
    let triple =
        String::from_utf8(triple).map_err(|e| ImageError::Payload(e.to_string()))?;

    let mut payload_len = [0u8; 4];
    read_all(input, &mut payload_len)?;
    let mut payload = vec![0u8; u32::from_le_bytes(payload_len) as usize];
    read_all(input, &mut payload)?;

    Ok((triple, payload))
}

fn read_all(input: &mut impl Read, buf: &mut [u8]) -> Result<(), ImageError> {
    input.read_exact(buf).map_err(|_| ImageError::Truncated)
}
