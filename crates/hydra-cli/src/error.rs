use std::path::PathBuf;

use hydra_bind::BindError;
use hydra_dom::LookupError;
use hydra_source::SourceError;
use miette::Diagnostic;
use thiserror::Error;

/// CLI-specific error type that provides rich diagnostics
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("I/O error while {operation}")]
    #[diagnostic(code(hydra::cli::io_error))]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No hydra.toml found in {searched_path} or any parent directory")]
    #[diagnostic(
        code(hydra::cli::config_not_found),
        help("Pass --config explicitly or run from inside a project")
    )]
    ConfigNotFound { searched_path: PathBuf },

    #[error("Cannot dump from `{path}`")]
    #[diagnostic(code(hydra::cli::lookup_error))]
    Lookup {
        path: String,
        #[source]
        #[diagnostic_source]
        source: LookupError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Bind(#[from] BindError),
}
