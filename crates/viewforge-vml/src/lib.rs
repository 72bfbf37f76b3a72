//! # Viewforge VML Backend
//!
//! The concrete compiler backend the compilation service wraps: a
//! line-oriented language for generated view modules ("vml"), compiled
//! against a reference set into an in-memory module image, plus the
//! in-process loader that turns emitted images back into live modules.
//!
//! A vml document is a sequence of directives:
//!
//! ```text
//! pragma strict
//!
//! view Home_View0
//!   use layout.render
//!   field title: str
//!   field count: int
//! end
//! ```
//!
//! `view` opens an exported type, `use` requires a symbol exported by some
//! reference, `field` adds a member, and `end` closes the type. Under
//! `pragma strict` every warning is escalated to an error.

mod backend;
mod checker;
mod format;
mod parser;

pub mod image;
pub mod library;
pub mod loader;

pub use backend::VmlBackend;
pub use library::LibraryBuilder;
pub use loader::InProcessLoader;
