use std::path::PathBuf;

use hydra_source::SourceLocation;
use miette::Diagnostic;
use thiserror::Error;

use crate::closure::Veto;

/// Errors of the binding stage.
///
/// Only [`BindError::DependencyCycle`] can come out of a well-formed run;
/// the others are input problems.
#[derive(Debug, Error, Diagnostic)]
pub enum BindError {
    /// The binding order cannot be established.
    #[error("Dependency cycle between bindings: {}", cycle.join(" -> "))]
    #[diagnostic(
        code(hydra_bind::dependency_cycle),
        help("Exclude one of the entities in the cycle or mark it as a caster")
    )]
    DependencyCycle {
        /// Full names along the cycle, the first one repeated at the end.
        cycle: Vec<String>,
    },

    /// A requested binding root is not declared in the parsed unit.
    #[error("Binding root `{name}` not found: {reason}")]
    #[diagnostic(
        code(hydra_bind::unknown_root),
        help("Check that the header declaring it is listed in [[bindings]]")
    )]
    UnknownRoot { name: String, reason: String },

    /// The project configuration file could not be read.
    #[error("Error reading configuration {path}")]
    #[diagnostic(code(hydra_bind::config_read))]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The project configuration is not valid TOML for `hydra.toml`.
    #[error("Invalid configuration: {message}")]
    #[diagnostic(
        code(hydra_bind::config_parse),
        help("Check your hydra.toml syntax against the documented sections")
    )]
    Config { message: String },
}

/// Non-fatal outcomes of the binding stage, kept for the caller to report.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum BindDiagnostic {
    /// An entity the closure ran into and refused to bind.
    #[error("{location}: `{name}` is not bound ({veto})")]
    #[diagnostic(
        code(hydra_bind::vetoed),
        severity(Advice),
        help("members that need it are emitted disabled unless it is a caster")
    )]
    Vetoed {
        name: String,
        veto: Veto,
        location: SourceLocation,
    },
}
