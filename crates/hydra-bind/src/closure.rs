//! The binding closure: everything the requested roots need bound with them.

use std::fmt;

use indexmap::{IndexMap, IndexSet};

use hydra_dom::{BuildSession, Dom, LookupError, NodeId};

use crate::error::{BindDiagnostic, BindError};
use crate::policy::{is_excluded, PolicyProvider};

/// Why an entity is kept out of the closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Veto {
    /// The runtime converts the type natively.
    Caster,
    /// Excluded by name or signature.
    Excluded,
    /// A base failed to resolve and the policy drops such records.
    UnresolvedBase,
}

impl fmt::Display for Veto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Veto::Caster => f.write_str("caster"),
            Veto::Excluded => f.write_str("excluded"),
            Veto::UnresolvedBase => f.write_str("unresolved base"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Closure {
    /// Entities to bind, in the order they were settled.
    pub settled: IndexSet<NodeId>,
    /// Every entity the closure ran into and refused.
    pub vetoed: IndexMap<NodeId, Veto>,
}

impl Closure {
    pub fn contains(&self, id: NodeId) -> bool {
        self.settled.contains(&id)
    }

    pub fn veto(&self, id: NodeId) -> Option<Veto> {
        self.vetoed.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.settled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settled.is_empty()
    }

    /// One diagnostic per vetoed entity, in the order they were vetoed.
    pub fn diagnostics(&self, dom: &Dom) -> Vec<BindDiagnostic> {
        self.vetoed
            .iter()
            .map(|(id, veto)| BindDiagnostic::Vetoed {
                name: dom.full_name(*id),
                veto: *veto,
                location: dom.node(*id).location.clone(),
            })
            .collect()
    }
}

/// Looks a binding root up by qualified name. Overloaded free functions
/// come back together.
pub fn resolve_root(dom: &Dom, name: &str) -> Result<Vec<NodeId>, BindError> {
    let set = dom.lookup(dom.root(), name).map_err(|err| unknown_root(name, err))?;
    let roots: Vec<NodeId> = set.iter().copied().filter(|id| dom.is_bindable(*id)).collect();
    if roots.is_empty() {
        let kind = dom.kind(set[0]);
        return Err(BindError::UnknownRoot { name: name.to_string(), reason: format!("{kind} is not bindable") });
    }
    Ok(roots)
}

fn unknown_root(name: &str, err: LookupError) -> BindError {
    BindError::UnknownRoot { name: name.to_string(), reason: err.to_string() }
}

/// Resolves every root, collecting the ones that failed instead of stopping
/// at the first.
pub fn resolve_roots<'a>(dom: &Dom, names: impl IntoIterator<Item = &'a str>) -> (Vec<NodeId>, Vec<BindError>) {
    let mut roots = IndexSet::new();
    let mut errors = Vec::new();
    for name in names {
        match resolve_root(dom, name) {
            Ok(found) => roots.extend(found),
            Err(err) => errors.push(err),
        }
    }
    (roots.into_iter().collect(), errors)
}

/// Fixpoint over a LIFO work queue. A popped entity that is vetoed is
/// dropped without looking at its dependencies; otherwise it is settled
/// and its bindable dependencies are queued, along with the public nested
/// records and enums of a record and the dependencies of its public
/// members.
pub fn compute_closure<P: PolicyProvider + ?Sized>(
    session: &mut BuildSession<'_>,
    policy: &P,
    roots: &[NodeId],
) -> Closure {
    let mut engine = Engine { session, policy, queue: roots.iter().copied().collect(), closure: Closure::default() };
    engine.run();
    log::debug!(
        "closure of {} roots: {} settled, {} vetoed",
        roots.len(),
        engine.closure.settled.len(),
        engine.closure.vetoed.len()
    );
    engine.closure
}

struct Engine<'s, 'tu, P: ?Sized> {
    session: &'s mut BuildSession<'tu>,
    policy: &'s P,
    queue: IndexSet<NodeId>,
    closure: Closure,
}

impl<P: PolicyProvider + ?Sized> Engine<'_, '_, P> {
    fn run(&mut self) {
        while let Some(node) = self.queue.pop() {
            if self.veto(node).is_some() || self.closure.settled.contains(&node) {
                continue;
            }
            self.closure.settled.insert(node);
            log::info!("bind {}", self.session.dom().full_name(node));

            let deps = self.session.dependencies(node);
            self.enqueue_all(deps);

            if self.session.dom().kind(node).is_record() {
                self.visit_members(node);
            }
        }
    }

    fn visit_members(&mut self, record: NodeId) {
        let dom = self.session.dom();
        let nested: Vec<NodeId> = dom
            .records(record)
            .chain(dom.enums(record))
            .filter(|id| self.is_visible(*id))
            .collect();
        let members: Vec<NodeId> = dom
            .fields(record)
            .chain(dom.methods(record))
            .chain(dom.constructors(record))
            .filter(|id| self.is_visible(*id))
            .collect();

        self.enqueue_all(nested);
        for member in members {
            let deps = self.session.dependencies(member);
            self.enqueue_all(deps);
        }
    }

    /// Public and not excluded.
    fn is_visible(&self, id: NodeId) -> bool {
        let dom = self.session.dom();
        dom.node(id).is_public() && !is_excluded(self.policy, dom, id)
    }

    fn enqueue_all(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        for id in ids {
            self.enqueue(id);
        }
    }

    fn enqueue(&mut self, id: NodeId) {
        if !self.session.dom().is_bindable(id) || self.closure.settled.contains(&id) || self.queue.contains(&id) {
            return;
        }
        if self.veto(id).is_some() {
            return;
        }
        log::debug!("queue {}", self.session.dom().full_name(id));
        self.queue.insert(id);
    }

    /// Decides once per entity; the answer is kept in `vetoed`.
    fn veto(&mut self, id: NodeId) -> Option<Veto> {
        if let Some(veto) = self.closure.veto(id) {
            return Some(veto);
        }
        let veto = {
            let dom = self.session.dom();
            if self.policy.is_type_caster(dom, id) {
                Some(Veto::Caster)
            } else if is_excluded(self.policy, dom, id) {
                Some(Veto::Excluded)
            } else {
                None
            }
        };
        let veto = veto.or_else(|| {
            let drop = self.policy.drop_records_with_unresolved_bases()
                && self.session.dom().kind(id).is_record()
                && self.session.has_unresolved_bases(id);
            drop.then_some(Veto::UnresolvedBase)
        });

        if let Some(veto) = veto {
            log::warn!("veto ({veto}): {}", self.session.dom().full_name(id));
            self.closure.vetoed.insert(id, veto);
        }
        veto
    }
}
