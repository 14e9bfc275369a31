//! The binding plan handed to a renderer.
//!
//! Everything a renderer needs is resolved here: members that are private
//! or excluded are already gone, members whose dependencies will not be
//! bound are kept but marked, and per-callable policy lookups are done.
//! Rendering a plan never touches the resolver.

use fxhash::FxHashSet;

use hydra_dom::{BuildSession, CallableKind, Dom, NodeId, NodeKind};

use crate::closure::compute_closure;
use crate::config::EmitConfig;
use crate::error::BindError;
use crate::order::binding_order;
use crate::policy::{is_excluded, return_policy, PolicyProvider};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingPlan {
    pub module: String,
    pub prolog: Vec<String>,
    /// In binding order.
    pub entries: Vec<BindingEntry>,
}

impl BindingPlan {
    pub fn entry(&self, node: NodeId) -> Option<&BindingEntry> {
        self.entries.iter().find(|entry| entry.node == node)
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.iter().map(|entry| entry.node)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingEntry {
    pub node: NodeId,
    pub name: String,
    pub full_name: String,
    /// Direct dependencies, whether bound or not.
    pub dependencies: Vec<NodeId>,
    pub item: EntryItem,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryItem {
    Record(RecordBinding),
    Enum(EnumBinding),
    Function(MemberBinding),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordBinding {
    /// Resolved bases that are bound too, in declaration order.
    pub bases: Vec<NodeId>,
    pub is_abstract: bool,
    pub constructors: Vec<MemberBinding>,
    pub fields: Vec<MemberBinding>,
    pub methods: Vec<MemberBinding>,
    /// `(name, code)` pairs from the policy.
    pub addon_methods: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumBinding {
    pub constants: Vec<String>,
    /// Values are also exported into the enclosing scope. Always the case
    /// for anonymous enums.
    pub export_values: bool,
}

/// One field, method, constructor or free function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberBinding {
    pub node: NodeId,
    pub name: String,
    /// Parameter list as written (`int, const Foo &`).
    pub signature: String,
    pub parameters: Vec<String>,
    /// Dependencies that are neither bound, casters nor builtins. A member
    /// with any is emitted disabled.
    pub missing: Vec<NodeId>,
    pub replacement: Option<String>,
    pub return_policy: Option<String>,
    pub overloaded: bool,
    pub is_static: bool,
    /// Docstring taken from the declaration's brief comment.
    pub doc: Option<String>,
}

impl MemberBinding {
    pub fn is_skipped(&self) -> bool {
        !self.missing.is_empty()
    }
}

/// Closure, ordering and plan in one go.
pub fn plan_bindings<P: PolicyProvider + ?Sized>(
    session: &mut BuildSession<'_>,
    policy: &P,
    roots: &[NodeId],
    emit: &EmitConfig,
) -> Result<BindingPlan, BindError> {
    let closure = compute_closure(session, policy, roots);
    let order = binding_order(session, &closure)?;
    Ok(build_plan(session, policy, &order, emit))
}

/// Turns an ordered list of entities into plan entries. Non-public
/// entities are left out.
pub fn build_plan<P: PolicyProvider + ?Sized>(
    session: &mut BuildSession<'_>,
    policy: &P,
    order: &[NodeId],
    emit: &EmitConfig,
) -> BindingPlan {
    let bound: FxHashSet<NodeId> = order
        .iter()
        .copied()
        .filter(|id| {
            let public = session.dom().node(*id).is_public();
            if !public {
                log::debug!("not binding non-public {}", session.dom().full_name(*id));
            }
            public
        })
        .collect();

    let mut planner = Planner { session, policy, emit, bound };
    let mut entries = Vec::new();
    for &id in order {
        if !planner.bound.contains(&id) {
            continue;
        }
        if let Some(entry) = planner.entry(id) {
            entries.push(entry);
        }
    }

    BindingPlan { module: emit.module.clone(), prolog: emit.prolog.clone(), entries }
}

struct Planner<'s, 'tu, P: ?Sized> {
    session: &'s mut BuildSession<'tu>,
    policy: &'s P,
    emit: &'s EmitConfig,
    bound: FxHashSet<NodeId>,
}

impl<P: PolicyProvider + ?Sized> Planner<'_, '_, P> {
    fn dom(&self) -> &Dom {
        self.session.dom()
    }

    fn entry(&mut self, id: NodeId) -> Option<BindingEntry> {
        let item = match self.dom().kind(id) {
            NodeKind::Record(_) => EntryItem::Record(self.record(id)),
            NodeKind::Enum => EntryItem::Enum(self.enumeration(id)),
            NodeKind::Callable(CallableKind::Function) => EntryItem::Function(self.member(id)),
            kind => {
                log::warn!("don't know how to bind {kind} {}", self.dom().full_name(id));
                return None;
            }
        };
        let dependencies = self.session.dependencies(id).into_iter().collect();
        let node = self.dom().node(id);
        Some(BindingEntry {
            node: id,
            name: node.name.clone(),
            full_name: self.dom().full_name(id),
            dependencies,
            item,
        })
    }

    fn record(&mut self, id: NodeId) -> RecordBinding {
        let mut bases = Vec::new();
        for base in self.session.bases(id) {
            if self.bound.contains(&base) {
                bases.push(base);
            } else {
                log::warn!("base {} of {} is not bound", self.dom().full_name(base), self.dom().full_name(id));
            }
        }

        let dom = self.dom();
        let visible = |members: Vec<NodeId>| -> Vec<NodeId> {
            members
                .into_iter()
                .filter(|member| dom.node(*member).is_public() && !is_excluded(self.policy, dom, *member))
                .collect()
        };
        let constructors = if self.emit.constructors { visible(dom.constructors(id).collect()) } else { Vec::new() };
        let fields = if self.emit.fields { visible(dom.fields(id).collect()) } else { Vec::new() };
        let methods = if self.emit.methods { visible(dom.methods(id).collect()) } else { Vec::new() };

        let full_name = dom.full_name(id);
        let addon_methods = self
            .policy
            .addon_methods(&full_name)
            .into_iter()
            .map(|(name, code)| (name.to_string(), code.to_string()))
            .collect();
        let is_abstract = dom.node(id).is_abstract();

        RecordBinding {
            bases,
            is_abstract,
            constructors: constructors.into_iter().map(|member| self.member(member)).collect(),
            fields: fields.into_iter().map(|member| self.member(member)).collect(),
            methods: methods.into_iter().map(|member| self.member(member)).collect(),
            addon_methods,
        }
    }

    fn enumeration(&self, id: NodeId) -> EnumBinding {
        let dom = self.dom();
        let node = dom.node(id);
        EnumBinding {
            constants: dom.enum_constants(id).map(|constant| dom.name(constant).to_string()).collect(),
            export_values: node.is_anonymous() || self.policy.exports_enum_values(&dom.full_name(id)),
        }
    }

    fn member(&mut self, id: NodeId) -> MemberBinding {
        let missing: Vec<NodeId> = self
            .session
            .dependencies(id)
            .into_iter()
            .filter(|dep| {
                !self.bound.contains(dep) && !self.policy.is_type_caster(self.session.dom(), *dep) && !self.session.dom().is_builtin(*dep)
            })
            .collect();

        let dom = self.dom();
        let node = dom.node(id);
        let full_name = dom.full_name(id);
        let signature = dom.cpp_signature(id).to_string();
        if let Some(&first) = missing.first() {
            log::warn!("skipping {}({}): {} is not bound", full_name, signature, dom.full_name(first));
        }

        MemberBinding {
            node: id,
            name: node.name.clone(),
            parameters: dom.parameters(id).map(|param| dom.name(param).to_string()).collect(),
            missing,
            replacement: self.policy.custom_replacement(&full_name, &signature).map(str::to_string),
            return_policy: return_policy(self.policy, dom, id).map(str::to_string),
            overloaded: node.kind.is_callable() && dom.is_overloaded(id),
            is_static: node.is_static(),
            doc: node.brief_comment.clone(),
            signature,
        }
    }
}
