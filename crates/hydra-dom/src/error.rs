use miette::Diagnostic;
use thiserror::Error;

use hydra_source::{Severity, SourceLocation};

/// Non-fatal conditions recorded while building the DOM or resolving types.
///
/// None of these stop the run: the offending node is orphaned or its
/// dependency set shrinks, and the diagnostic is kept on the session for the
/// caller to report.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum DomDiagnostic {
    /// The semantic parent of a declaration is not (yet) part of the DOM.
    #[error("{location}: owner `{owner}` of `{name}` is not in the model, declaration dropped")]
    #[diagnostic(
        code(hydra_dom::unresolved_owner),
        severity(Warning),
        help("the owner is usually declared in a header that was not parsed")
    )]
    UnresolvedOwner {
        name: String,
        owner: String,
        location: SourceLocation,
    },

    /// The owner's acceptance table does not allow this child, or the
    /// relocation from the lexical container is not permitted.
    #[error("{location}: `{owner}` does not accept {child_kind} `{name}`")]
    #[diagnostic(code(hydra_dom::rejected_child), severity(Advice))]
    RejectedChild {
        name: String,
        child_kind: String,
        owner: String,
        location: SourceLocation,
    },

    /// A type-bearing node whose type could not be mapped to any node.
    #[error("{location}: cannot resolve type `{spelling}` of `{name}`")]
    #[diagnostic(code(hydra_dom::unresolved_type), severity(Warning))]
    UnresolvedType {
        name: String,
        spelling: String,
        location: SourceLocation,
    },

    /// A base specifier without a usable record behind it.
    #[error("{location}: base `{base}` of `{name}` cannot be resolved")]
    #[diagnostic(
        code(hydra_dom::unresolved_base),
        severity(Warning),
        help("the record is kept without this base unless the policy drops such records")
    )]
    UnresolvedBase {
        name: String,
        base: String,
        location: SourceLocation,
    },

    /// A record that lists itself among its bases.
    #[error("{location}: `{name}` resolves to its own base")]
    #[diagnostic(code(hydra_dom::self_base), severity(Warning))]
    SelfBase { name: String, location: SourceLocation },

    /// A diagnostic the front end reported while parsing.
    #[error("{location}: {severity:?}: {message}")]
    #[diagnostic(code(hydra_dom::parse_diagnostic), severity(Advice))]
    ParseDiagnostic {
        severity: Severity,
        message: String,
        location: SourceLocation,
    },
}

impl DomDiagnostic {
    pub fn location(&self) -> &SourceLocation {
        match self {
            DomDiagnostic::UnresolvedOwner { location, .. }
            | DomDiagnostic::RejectedChild { location, .. }
            | DomDiagnostic::UnresolvedType { location, .. }
            | DomDiagnostic::UnresolvedBase { location, .. }
            | DomDiagnostic::SelfBase { location, .. }
            | DomDiagnostic::ParseDiagnostic { location, .. } => location,
        }
    }
}

/// Failure to look a qualified path up in the DOM.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("`{segment}` not found while looking up `{path}`")]
    #[diagnostic(code(hydra_dom::not_found))]
    NotFound { path: String, segment: String },

    #[error("`{segment}` is ambiguous while looking up `{path}` ({count} candidates)")]
    #[diagnostic(
        code(hydra_dom::ambiguous),
        help("overloaded names can only be the last segment of a path")
    )]
    Ambiguous {
        path: String,
        segment: String,
        count: usize,
    },

    #[error("empty lookup path")]
    #[diagnostic(code(hydra_dom::empty_path))]
    EmptyPath,
}
