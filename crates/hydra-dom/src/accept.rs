//! Ownership resolution and the acceptance policy.
//!
//! Lexical nesting in the cursor stream is not semantic ownership: an
//! out-of-line method sits in a namespace but belongs to its class. Every
//! child is therefore re-homed to its semantic owner, subject to a static
//! allow-list per owner kind and a small set of relocation rules.

use hydra_source::{Cursor, CursorKind};

use crate::error::DomDiagnostic;
use crate::node::{CallableKind, NodeId, NodeKind, RecordKind};
use crate::session::BuildSession;

/// Whether an owner of kind `owner` takes a child cursor of kind `child`.
pub fn allows(owner: NodeKind, child: CursorKind) -> bool {
    use CursorKind as C;

    let type_ref = matches!(child, C::TypeRef | C::TemplateRef);
    let template_param = matches!(child, C::TemplateTypeParameter | C::TemplateNonTypeParameter);

    match owner {
        NodeKind::TranslationUnit | NodeKind::Namespace => matches!(
            child,
            C::Namespace
                | C::FunctionDecl
                | C::FunctionTemplate
                | C::ClassDecl
                | C::StructDecl
                | C::ClassTemplate
                | C::ClassTemplatePartialSpecialization
                | C::EnumDecl
                | C::TypedefDecl
                | C::TypeAliasDecl
                | C::TypeAliasTemplateDecl
                | C::VarDecl
        ),
        NodeKind::Record(kind) => {
            let member = matches!(
                child,
                C::FieldDecl
                    | C::CxxMethod
                    | C::Constructor
                    | C::Destructor
                    | C::VarDecl
                    | C::CxxBaseSpecifier
                    | C::ClassDecl
                    | C::StructDecl
                    | C::ClassTemplate
                    | C::ClassTemplatePartialSpecialization
                    | C::EnumDecl
                    | C::TypedefDecl
                    | C::TypeAliasDecl
                    | C::TypeAliasTemplateDecl
                    | C::FunctionTemplate
                    | C::TypeRef
            );
            let templated = matches!(kind, RecordKind::ClassTemplate | RecordKind::PartialSpecialization);
            member || (templated && (template_param || child == C::TemplateRef))
        }
        NodeKind::Callable(CallableKind::FunctionTemplate) => child == C::ParmDecl || type_ref || template_param,
        NodeKind::Callable(_) => child == C::ParmDecl || type_ref,
        NodeKind::Param
        | NodeKind::Field
        | NodeKind::TypeAlias
        | NodeKind::BaseSpecifier
        | NodeKind::TemplateTypeParam => type_ref,
        NodeKind::Variable => type_ref || template_param,
        NodeKind::TypeAliasTemplate => type_ref || template_param || child == C::TypeAliasDecl,
        NodeKind::TypeDef => type_ref || matches!(child, C::EnumDecl | C::StructDecl),
        NodeKind::TemplateRef => type_ref || child == C::TypeAliasDecl,
        NodeKind::TemplateNonTypeParam => child == C::TypeRef,
        NodeKind::Enum => child == C::EnumConstantDecl,
        NodeKind::TypeRef | NodeKind::EnumConstant | NodeKind::Builtin => false,
    }
}

/// Whether a child may land in an owner other than its lexical container.
fn relocation_allowed(container: NodeKind, item: NodeKind, owner: NodeKind) -> bool {
    let owner_is_scope = owner == NodeKind::Namespace || owner.is_record();
    match item {
        _ if owner == NodeKind::Record(RecordKind::ClassTemplate) => true,
        NodeKind::TypeAliasTemplate if owner_is_scope => true,
        NodeKind::Callable(CallableKind::Method | CallableKind::Constructor | CallableKind::Destructor)
            if owner.is_record() =>
        {
            true
        }
        _ => container.is_scope() && owner_is_scope,
    }
}

/// An enum or struct spelled inside a typedef, or inside a field of a
/// record, belongs to both the typedef/field and the semantic owner.
fn is_elaboration(container: NodeKind, item: NodeKind, owner: NodeKind) -> bool {
    let elaborated = matches!(item, NodeKind::Enum | NodeKind::Record(RecordKind::Struct));
    elaborated && (container == NodeKind::TypeDef || (container == NodeKind::Field && owner.is_record()))
}

impl<'tu> BuildSession<'tu> {
    /// Hands `item` (made from `cursor`) to its owner. Returns `false` when
    /// the item is rejected; the item then stays orphaned.
    pub(crate) fn accept(&mut self, container: NodeId, item: NodeId, cursor: Cursor<'tu>) -> bool {
        let Some(owner) = self.semantic_owner(container, cursor) else {
            let owner = cursor
                .semantic_parent()
                .map(|parent| parent.display_name().to_string())
                .unwrap_or_default();
            self.report(DomDiagnostic::UnresolvedOwner {
                name: self.dom.full_name(item),
                owner,
                location: cursor.location().clone(),
            });
            return false;
        };

        let container_kind = self.dom.kind(container);
        let item_kind = self.dom.kind(item);
        let owner_kind = self.dom.kind(owner);

        if is_elaboration(container_kind, item_kind, owner_kind) {
            if !self.owner_allows(owner, cursor.kind()) {
                self.reject(owner, item, cursor);
                return false;
            }
            log::debug!("accept (*) {:?} in {} and {}", cursor, self.dom.name(container), self.dom.name(owner));
            self.dom.attach(container, item);
            self.dom.attach(owner, item);
            self.dom.node_mut(item).owner = Some(owner);
            return true;
        }

        if !self.owner_allows(owner, cursor.kind())
            || (owner != container && !relocation_allowed(container_kind, item_kind, owner_kind))
        {
            self.reject(owner, item, cursor);
            return false;
        }

        log::debug!("accept {:?} in {}", cursor, self.dom.name(owner));
        self.dom.attach(owner, item);
        self.dom.node_mut(item).owner = Some(owner);
        if owner_kind == NodeKind::TemplateNonTypeParam {
            self.dom.node_mut(owner).ref_type = Some(item);
        }
        true
    }

    /// The node the child semantically belongs to.
    ///
    /// Template parameters and type references always stay with their
    /// lexical container. Otherwise the semantic parent is looked up by USR
    /// unless it is the container itself; `None` means the lookup failed.
    fn semantic_owner(&self, container: NodeId, cursor: Cursor<'tu>) -> Option<NodeId> {
        let kind = cursor.kind();
        if kind.is_template_parameter() || kind.is_reference() {
            return Some(container);
        }
        let Some(parent) = cursor.semantic_parent() else {
            return Some(container);
        };
        if parent.kind() == CursorKind::TranslationUnit {
            return Some(self.dom.root());
        }
        let parent_usr = parent.usr();
        if parent_usr == self.dom.node(container).usr.as_deref() {
            return Some(container);
        }
        parent_usr.and_then(|usr| self.dom.by_usr(usr))
    }

    fn owner_allows(&self, owner: NodeId, child: CursorKind) -> bool {
        let node = self.dom.node(owner);
        if node.kind == NodeKind::TemplateNonTypeParam && node.ref_type.is_some() {
            return false;
        }
        allows(node.kind, child)
    }

    fn reject(&mut self, owner: NodeId, item: NodeId, cursor: Cursor<'tu>) {
        let owner_name = match self.dom.full_name(owner) {
            name if name.is_empty() => format!("<anonymous {}>", self.dom.kind(owner)),
            name => name,
        };
        self.report(DomDiagnostic::RejectedChild {
            name: self.dom.node(item).name.clone(),
            child_kind: self.dom.kind(item).to_string(),
            owner: owner_name,
            location: cursor.location().clone(),
        });
    }
}
