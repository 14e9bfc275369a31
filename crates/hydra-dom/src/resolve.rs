//! Type resolution and dependency derivation.
//!
//! Resolution maps a type-bearing node to the node its type denotes. It runs
//! lazily after the builder pass and is memoized per node; a re-entrant
//! request (a type that refers back to itself through its own references)
//! resolves to nothing instead of recursing.

use fxhash::FxHashSet;
use indexmap::IndexSet;

use hydra_source::{Cursor, CursorKind, Type};

use crate::error::DomDiagnostic;
use crate::node::{BaseList, Node, NodeId, NodeKind, Resolution};
use crate::session::BuildSession;

impl<'tu> BuildSession<'tu> {
    /// The node the type of `id` denotes: a declaration, an alias, or a
    /// builtin marker. `None` when the node carries no type or resolution
    /// failed (a diagnostic is recorded for the latter).
    pub fn resolve_type(&mut self, id: NodeId) -> Option<NodeId> {
        match self.dom.node(id).resolution {
            Resolution::Done(result) => return result,
            Resolution::InProgress => {
                log::debug!("type of {} requested while being resolved", self.dom.full_name(id));
                return None;
            }
            Resolution::Pending => {}
        }
        if !self.dom.kind(id).holds_type() {
            self.dom.node_mut(id).resolution = Resolution::Done(None);
            return None;
        }

        self.dom.node_mut(id).resolution = Resolution::InProgress;
        let result = self.compute_type(id);
        self.dom.node_mut(id).resolution = Resolution::Done(result);
        result
    }

    /// Return type of a callable.
    pub fn return_type(&mut self, id: NodeId) -> Option<NodeId> {
        if self.dom.kind(id).is_callable() {
            self.resolve_type(id)
        } else {
            None
        }
    }

    fn compute_type(&mut self, id: NodeId) -> Option<NodeId> {
        let cursor = self.cursor_of(id)?;
        let kind = self.dom.kind(id);

        if kind.is_reference() {
            return self.resolve_reference(cursor);
        }

        let refs: Vec<NodeId> = self.dom.children(id).filter(|child| self.dom.kind(*child).is_reference()).collect();
        let raw = self.raw_type(id, cursor);

        // --- Explicit type references win over the cursor type ---
        let resolved = if let Some(&last) = refs.last() {
            if refs.len() > 1 {
                log::debug!(
                    "{} type references in {}, assuming the last one is the type",
                    refs.len(),
                    self.dom.full_name(id)
                );
            }
            self.resolve_type(last)
        } else if let Some(raw) = raw {
            self.resolve_raw(raw)
        } else {
            log::debug!("no usable type on {}", self.dom.full_name(id));
            return None;
        };
        if resolved.is_some() {
            return resolved;
        }

        // --- Last chance for parameters: the raw declaration itself ---
        if kind == NodeKind::Param {
            let fallback = raw
                .and_then(|raw| raw.declaration())
                .and_then(|decl| decl.usr())
                .and_then(|usr| self.dom.by_usr(usr));
            if fallback.is_some() {
                log::debug!("parameter {} resolved through its raw declaration", self.dom.full_name(id));
                return fallback;
            }
        }

        // Unresolved bases are reported by `bases`.
        if kind != NodeKind::BaseSpecifier {
            let spelling = raw.map(|raw| raw.spelling().to_string()).unwrap_or_default();
            let location = self.dom.node(id).location.clone();
            self.report(DomDiagnostic::UnresolvedType { name: self.dom.full_name(id), spelling, location });
        }
        None
    }

    /// The type a node's resolution starts from, per node kind. Invalid
    /// types read as absent.
    fn raw_type(&self, id: NodeId, cursor: Cursor<'tu>) -> Option<Type<'tu>> {
        let raw = match self.dom.kind(id) {
            NodeKind::Callable(_) => cursor.result_type(),
            NodeKind::Param => cursor.ty().map(|ty| ty.strip_pointers()),
            NodeKind::Field => cursor.definition().unwrap_or(cursor).ty(),
            NodeKind::TypeDef | NodeKind::TypeAlias => cursor.ty().map(|ty| ty.canonical()),
            NodeKind::BaseSpecifier => self.first_reference(id).and_then(|reference| reference.ty()),
            _ => cursor.ty(),
        };
        raw.filter(|ty| ty.is_valid())
    }

    fn first_reference(&self, id: NodeId) -> Option<Cursor<'tu>> {
        self.dom
            .children(id)
            .find(|child| self.dom.kind(*child).is_reference())
            .and_then(|reference| self.cursor_of(reference))
    }

    /// A type reference resolves through the definition it points at, and
    /// failing that through its own type.
    fn resolve_reference(&mut self, cursor: Cursor<'tu>) -> Option<NodeId> {
        if let Some(definition) = cursor.definition() {
            match definition.usr().and_then(|usr| self.dom.by_usr(usr)) {
                Some(target) => return Some(target),
                None => log::debug!("lookup failed for definition {:?} of {:?}", definition, cursor),
            }
        }
        let ty = cursor.ty().filter(|ty| ty.is_valid())?;
        self.resolve_raw(ty)
    }

    /// Strips one level of indirection and maps the declaration to a node.
    /// Types without a declaration become builtins.
    fn resolve_raw(&mut self, ty: Type<'tu>) -> Option<NodeId> {
        let target = ty.pointee().unwrap_or(ty);
        let declaration = match target.declaration() {
            Some(decl) if decl.kind() != CursorKind::NoDeclFound => decl,
            _ => return Some(self.make_builtin(target.spelling())),
        };

        if let Some(definition) = declaration.definition() {
            match definition.usr().and_then(|usr| self.dom.by_usr(usr)) {
                Some(node) => return Some(node),
                None => log::debug!("lookup failed (definition): {:?}", definition),
            }
        }
        let node = declaration.usr().and_then(|usr| self.dom.by_usr(usr));
        if node.is_none() {
            log::debug!("lookup failed (declaration): {:?} {:?}", declaration, declaration.usr());
        }
        node
    }

    /// The builtin marker for a spelling, created on first use.
    pub fn make_builtin(&mut self, spelling: &str) -> NodeId {
        if let Some(existing) = self.dom.builtin(spelling) {
            return existing;
        }
        let id = self.dom.alloc(Node::builtin(spelling));
        self.dom.builtins.insert(spelling.to_string(), id);
        id
    }

    /// Declarations a node's type brings in: the resolved declaration, one
    /// more hop through references, the end of an alias chain. Builtins and
    /// unresolved types contribute nothing.
    pub fn type_dependencies(&mut self, id: NodeId) -> IndexSet<NodeId> {
        match self.resolve_type(id) {
            Some(target) => self.flatten(target),
            None => IndexSet::new(),
        }
    }

    /// Follows references and aliases from `target` down to declarations.
    fn flatten(&mut self, target: NodeId) -> IndexSet<NodeId> {
        let mut out = IndexSet::new();
        let mut seen = FxHashSet::default();
        let mut pending = vec![target];
        while let Some(node) = pending.pop() {
            if !seen.insert(node) {
                continue;
            }
            match self.dom.kind(node) {
                NodeKind::Builtin => {}
                kind if kind.is_reference() || kind.is_alias() => {
                    if let Some(next) = self.resolve_type(node) {
                        pending.push(next);
                    }
                }
                _ => {
                    out.insert(node);
                }
            }
        }
        out
    }

    /// Direct dependencies of a node, per kind.
    ///
    /// - record: owning record (for nested records) and bases
    /// - enum: owning record
    /// - callable: return type and every parameter's dependencies
    /// - field: the flattened type plus that type's own dependencies
    /// - alias: the end of the alias chain, never the alias itself
    pub fn dependencies(&mut self, id: NodeId) -> IndexSet<NodeId> {
        match self.dom.kind(id) {
            NodeKind::Record(_) => {
                let mut deps = self.record_owner(id).into_iter().collect::<IndexSet<_>>();
                deps.extend(self.bases(id).into_iter().filter(|base| *base != id));
                deps
            }
            NodeKind::Enum => self.record_owner(id).into_iter().collect(),
            NodeKind::Callable(_) => {
                let mut deps = self.type_dependencies(id);
                let params: Vec<NodeId> = self.dom.parameters(id).collect();
                for param in params {
                    let param_deps = self.dependencies(param);
                    deps.extend(param_deps);
                }
                deps
            }
            NodeKind::Field => {
                let targets = self.type_dependencies(id);
                let mut deps = targets.clone();
                for target in targets {
                    if target == id {
                        continue;
                    }
                    let nested = self.dependencies(target);
                    deps.extend(nested);
                }
                deps
            }
            NodeKind::BaseSpecifier => self.resolve_base(id).into_iter().collect(),
            NodeKind::Param
            | NodeKind::Variable
            | NodeKind::TypeDef
            | NodeKind::TypeAlias
            | NodeKind::TypeRef
            | NodeKind::TemplateRef => self.type_dependencies(id),
            NodeKind::TranslationUnit
            | NodeKind::Namespace
            | NodeKind::EnumConstant
            | NodeKind::TypeAliasTemplate
            | NodeKind::TemplateTypeParam
            | NodeKind::TemplateNonTypeParam
            | NodeKind::Builtin => IndexSet::new(),
        }
    }

    fn record_owner(&self, id: NodeId) -> Option<NodeId> {
        self.dom.node(id).owner.filter(|owner| self.dom.kind(*owner).is_record())
    }

    /// Resolved base records, in declaration order. Specifiers that yield no
    /// record, or the record itself, are dropped with a diagnostic.
    pub fn bases(&mut self, id: NodeId) -> Vec<NodeId> {
        self.base_list(id).resolved
    }

    /// Whether any base specifier of the record failed to resolve.
    pub fn has_unresolved_bases(&mut self, id: NodeId) -> bool {
        self.base_list(id).unresolved > 0
    }

    fn base_list(&mut self, id: NodeId) -> BaseList {
        if let Some(list) = &self.dom.node(id).bases {
            return list.clone();
        }

        let mut list = BaseList::default();
        let specifiers: Vec<NodeId> = self.dom.base_specifiers(id).collect();
        for specifier in specifiers {
            match self.resolve_base(specifier) {
                Some(base) if base == id => {
                    let location = self.dom.node(specifier).location.clone();
                    self.report(DomDiagnostic::SelfBase { name: self.dom.full_name(id), location });
                }
                Some(base) => {
                    if !list.resolved.contains(&base) {
                        list.resolved.push(base);
                    }
                }
                None => {
                    list.unresolved += 1;
                    let node = self.dom.node(specifier);
                    let (base, location) = (node.display_name.clone(), node.location.clone());
                    self.report(DomDiagnostic::UnresolvedBase { name: self.dom.full_name(id), base, location });
                }
            }
        }
        self.dom.node_mut(id).bases = Some(list.clone());
        list
    }

    /// The record behind a base specifier. An explicitly invalid type on
    /// the first reference yields no base; aliases are looked through.
    fn resolve_base(&mut self, specifier: NodeId) -> Option<NodeId> {
        let first = self.first_reference(specifier)?;
        if first.ty().is_some_and(|ty| !ty.is_valid()) {
            log::debug!("base specifier {:?} has an invalid type", first);
            return None;
        }
        let target = self.resolve_type(specifier)?;
        let target = if self.dom.kind(target).is_alias() {
            self.flatten(target).into_iter().next()?
        } else {
            target
        };
        self.dom.kind(target).is_record().then_some(target)
    }
}
