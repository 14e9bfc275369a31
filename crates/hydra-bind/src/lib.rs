//! From a DOM and a policy to an ordered binding plan.
//!
//! The pipeline is:
//! 1. [`compute_closure`]: starting from the requested roots, collect every
//!    bindable entity they need, skipping casters and exclusions
//! 2. [`binding_order`]: sort the closure so that dependencies come first,
//!    failing with the full cycle when that is impossible
//! 3. [`build_plan`]: resolve members, skipped members and per-callable
//!    policies into [`BindingPlan`] entries
//!
//! A [`Renderer`] then turns the plan into text without further resolution.
//! [`plan_bindings`] runs all three steps.

mod closure;
mod config;
mod error;
mod order;
mod plan;
mod policy;
mod render;

pub use closure::{compute_closure, resolve_root, resolve_roots, Closure, Veto};
pub use config::{BindingSpec, EmitConfig, FrontendConfig, PolicyConfig, ProjectConfig, CONFIG_FILE_NAME};
pub use error::{BindDiagnostic, BindError};
pub use order::binding_order;
pub use plan::{build_plan, plan_bindings, BindingEntry, BindingPlan, EntryItem, EnumBinding, MemberBinding, RecordBinding};
pub use policy::{is_excluded, return_policy, Policy, PolicyProvider};
pub use render::{OutlineRenderer, Renderer};
