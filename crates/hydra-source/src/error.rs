use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::cursor::CursorKind;

/// Errors raised while loading or validating front-end output.
#[derive(Debug, Error, Diagnostic)]
pub enum SourceError {
    /// The AST dump or header could not be read or written.
    #[error("I/O error on {path}")]
    #[diagnostic(code(hydra_source::io_error))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The AST dump is not valid JSON for a translation unit.
    #[error("Malformed AST dump: {message}")]
    #[diagnostic(
        code(hydra_source::decode_error),
        help("The dump must be produced by a front-end adapter for this version of hydra")
    )]
    Decode {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// A cursor index points outside the cursor table.
    #[error("Dangling cursor reference #{id} in {context}")]
    #[diagnostic(code(hydra_source::dangling_cursor))]
    DanglingCursor { id: u32, context: String },

    /// A type index points outside the type table.
    #[error("Dangling type reference t{id} in {context}")]
    #[diagnostic(code(hydra_source::dangling_type))]
    DanglingType { id: u32, context: String },

    /// A cursor listed as a child more than once along the tree, which
    /// would make the walk loop.
    #[error("Cursor #{id} is reached a second time as a child of #{parent}")]
    #[diagnostic(
        code(hydra_source::cyclic_cursor),
        help("Child lists in the AST dump must form a tree rooted at the translation unit")
    )]
    CyclicCursor { id: u32, parent: u32 },

    /// The root cursor is not a translation unit.
    #[error("Root cursor #{id} is {kind:?}, expected a translation unit")]
    #[diagnostic(code(hydra_source::bad_root))]
    BadRoot { id: u32, kind: CursorKind },
}
