//! Semantic model ("the DOM") of a parsed C++ translation unit.
//!
//! A [`BuildSession`] walks the cursor tree of a
//! [`TranslationUnit`](hydra_source::TranslationUnit) once and produces a
//! deduplicated, correctly nested graph of declarations:
//! - every declaration with a USR maps to exactly one node, however many
//!   times the front end reports it
//! - children are re-homed to their semantic owner (out-of-line methods end
//!   up in their class) under a static acceptance table
//! - overloads share a name key without being fused
//!
//! After the pass the session resolves types lazily ([`BuildSession::resolve_type`])
//! and derives per-node [`dependencies`](BuildSession::dependencies), which
//! is what the binding closure in `hydra-bind` is computed from.
//!
//! Nothing in here is fatal: owner lookups that fail, rejected children and
//! unresolvable types are recorded as [`DomDiagnostic`]s on the session.

mod accept;
mod builder;
mod dom;
mod error;
mod factory;
mod node;
mod resolve;
mod session;

pub use accept::allows;
pub use dom::Dom;
pub use error::{DomDiagnostic, LookupError};
pub use factory::{Constructor, Factory};
pub use node::{CallableKind, Node, NodeId, NodeKind, RecordKind};
pub use session::BuildSession;
