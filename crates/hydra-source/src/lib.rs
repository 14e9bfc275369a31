//! Front-end adapter boundary for the Hydra binding generator.
//!
//! The compiler front end (libclang or anything else able to walk a C++
//! translation unit) is an external oracle. This crate defines what Hydra
//! needs from it and nothing more:
//! - A flat arena of cursors and type descriptors (`TranslationUnit`) with
//!   lightweight borrowed views (`Cursor`, `Type`) mirroring the front end's
//!   query surface
//! - Loading of a serialized parse (JSON AST dump) with index validation
//! - A fixture builder (`UnitBuilder`) used by tests and adapters alike
//! - Front-end diagnostics and the include list of the parse
//! - Synthesis of the umbrella header handed to the front end
//!
//! Cursor and type references are plain indices into the arena, so a unit can
//! be cyclic in reference terms (a record whose field type points back at
//! the record) without any lifetime games.

mod builder;
mod cursor;
mod diagnostic;
mod error;
mod load;
mod types;
mod umbrella;
mod unit;

pub use builder::{CursorBuilder, UnitBuilder};
pub use cursor::{AccessSpecifier, Cursor, CursorData, CursorFlags, CursorKind, SourceLocation};
pub use diagnostic::{FrontEndDiagnostic, Include, Severity};
pub use error::SourceError;
pub use load::load_unit;
pub use types::{Type, TypeData, TypeKind};
pub use umbrella::{synthesize_umbrella, write_umbrella};
pub use unit::{CursorId, TranslationUnit, TypeId};
