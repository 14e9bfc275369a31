//! What to bind and how: exclusions, casters and per-callable overrides.

use fxhash::FxHashSet;
use indexmap::IndexMap;

use hydra_dom::{BuildSession, Dom, NodeId, NodeKind};

use crate::config::PolicyConfig;

/// Answers the questions the closure engine and the plan builder ask about
/// individual entities. Keys are full names (`ns::Foo::bar`) or, for a
/// single overload, `full_name(signature)`.
pub trait PolicyProvider {
    fn is_excluded(&self, key: &str) -> bool;

    /// Code bound in place of a callable.
    fn custom_replacement(&self, full_name: &str, signature: &str) -> Option<&str>;

    /// Return value / ownership policy of a callable.
    fn ownership_policy(&self, key: &str) -> Option<&str>;

    /// Whether the runtime already converts this type, in which case it is
    /// never bound itself.
    fn is_type_caster(&self, dom: &Dom, node: NodeId) -> bool;

    fn addon_methods(&self, _record: &str) -> Vec<(&str, &str)> {
        Vec::new()
    }

    fn exports_enum_values(&self, _full_name: &str) -> bool {
        false
    }

    fn drop_records_with_unresolved_bases(&self) -> bool {
        false
    }
}

/// Exclusion by full name, and for callables also by signature key.
pub fn is_excluded<P: PolicyProvider + ?Sized>(policy: &P, dom: &Dom, id: NodeId) -> bool {
    policy.is_excluded(&dom.full_name(id)) || (dom.kind(id).is_callable() && policy.is_excluded(&dom.signature_key(id)))
}

/// Ownership policy by full name first, then by signature key.
pub fn return_policy<'p, P: PolicyProvider + ?Sized>(policy: &'p P, dom: &Dom, id: NodeId) -> Option<&'p str> {
    policy
        .ownership_policy(&dom.full_name(id))
        .or_else(|| policy.ownership_policy(&dom.signature_key(id)))
}

/// The policy described by the `[policy]` table of `hydra.toml`.
#[derive(Debug, Clone, Default)]
pub struct Policy {
    config: PolicyConfig,
    excluded: FxHashSet<String>,
    named_casters: FxHashSet<String>,
    exported_enums: FxHashSet<String>,
    /// Caster target -> the specialization that declares it.
    detected_casters: IndexMap<NodeId, NodeId>,
}

impl Policy {
    pub fn new(config: PolicyConfig) -> Self {
        Self {
            excluded: config.exclude.iter().cloned().collect(),
            named_casters: config.casters.iter().cloned().collect(),
            exported_enums: config.exported_enums.iter().cloned().collect(),
            detected_casters: IndexMap::new(),
            config,
        }
    }

    pub fn exclude(mut self, key: impl Into<String>) -> Self {
        self.excluded.insert(key.into());
        self
    }

    pub fn caster(mut self, name: impl Into<String>) -> Self {
        self.named_casters.insert(name.into());
        self
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Finds every specialization of the configured caster template and
    /// marks the type its first type reference resolves to as a caster.
    /// Returns the number of casters found.
    pub fn detect_casters(&mut self, session: &mut BuildSession<'_>) -> usize {
        let Some(template) = self.config.caster_template.clone() else {
            return 0;
        };
        let dom = session.dom();
        let specializations: Vec<NodeId> = match dom.lookup(dom.root(), &template) {
            Ok(set) => set.iter().copied().filter(|id| dom.kind(*id).is_record()).collect(),
            Err(err) => {
                log::debug!("no caster template: {err}");
                return 0;
            }
        };

        for specialization in specializations {
            let first_ref = session
                .dom()
                .children(specialization)
                .find(|child| session.dom().kind(*child) == NodeKind::TypeRef);
            let Some(first_ref) = first_ref else {
                continue;
            };
            if let Some(target) = session.resolve_type(first_ref) {
                log::debug!("caster: {} via {}", session.dom().full_name(target), session.dom().full_name(specialization));
                self.detected_casters.insert(target, specialization);
            }
        }
        self.detected_casters.len()
    }

    pub fn detected_casters(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.detected_casters.keys().copied()
    }
}

impl PolicyProvider for Policy {
    fn is_excluded(&self, key: &str) -> bool {
        self.excluded.contains(key)
    }

    fn custom_replacement(&self, full_name: &str, signature: &str) -> Option<&str> {
        let key = format!("{full_name}({signature})");
        self.config
            .replacements
            .get(&key)
            .or_else(|| self.config.replacements.get(full_name))
            .map(String::as_str)
    }

    fn ownership_policy(&self, key: &str) -> Option<&str> {
        self.config.return_policies.get(key).map(String::as_str)
    }

    fn is_type_caster(&self, dom: &Dom, node: NodeId) -> bool {
        self.detected_casters.contains_key(&node) || self.named_casters.contains(&dom.full_name(node))
    }

    fn addon_methods(&self, record: &str) -> Vec<(&str, &str)> {
        self.config
            .addon_methods
            .get(record)
            .map(|methods| methods.iter().map(|(name, code)| (name.as_str(), code.as_str())).collect())
            .unwrap_or_default()
    }

    fn exports_enum_values(&self, full_name: &str) -> bool {
        self.exported_enums.contains(full_name)
    }

    fn drop_records_with_unresolved_bases(&self) -> bool {
        self.config.drop_records_with_unresolved_bases
    }
}
