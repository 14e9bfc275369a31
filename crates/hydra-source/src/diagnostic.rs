//! Diagnostics and include records reported by the front end.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cursor::SourceLocation;

/// Severity of a front-end diagnostic, as in libclang.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Ignored,
    Note,
    Warning,
    Error,
    Fatal,
}

/// A diagnostic produced while parsing. Always recorded, never fatal for the
/// model: the build proceeds best-effort on whatever the front end produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontEndDiagnostic {
    pub severity: Severity,
    pub message: String,
    #[serde(default)]
    pub location: SourceLocation,
}

impl fmt::Display for FrontEndDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}: {}", self.location, self.severity, self.message)
    }
}

/// A file pulled in while parsing, with its inclusion depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Include {
    pub path: String,
    #[serde(default)]
    pub depth: u32,
}

impl fmt::Display for Include {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<include {} {:?}>", self.depth, self.path)
    }
}
