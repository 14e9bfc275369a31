use fxhash::FxHashMap;

use hydra_source::{Cursor, CursorKind};

use crate::node::{CallableKind, NodeKind, RecordKind};

/// Decides the node kind for a cursor, or declines it (`None`), in which
/// case the cursor and its whole subtree are skipped.
pub type Constructor = fn(Cursor<'_>) -> Option<NodeKind>;

/// Cursor kind to node constructor table. Kinds without an entry are not
/// modeled.
#[derive(Clone)]
pub struct Factory {
    table: FxHashMap<CursorKind, Constructor>,
}

impl Factory {
    pub fn empty() -> Self {
        Self { table: FxHashMap::default() }
    }

    pub fn register(&mut self, kind: CursorKind, constructor: Constructor) -> &mut Self {
        self.table.insert(kind, constructor);
        self
    }

    pub fn unregister(&mut self, kind: CursorKind) -> &mut Self {
        self.table.remove(&kind);
        self
    }

    pub fn get(&self, kind: CursorKind) -> Option<Constructor> {
        self.table.get(&kind).copied()
    }

    pub fn is_modeled(&self, kind: CursorKind) -> bool {
        self.table.contains_key(&kind)
    }
}

impl Default for Factory {
    fn default() -> Self {
        let entries: &[(CursorKind, Constructor)] = &[
            (CursorKind::TranslationUnit, |_| Some(NodeKind::TranslationUnit)),
            (CursorKind::Namespace, |_| Some(NodeKind::Namespace)),
            (CursorKind::ClassDecl, |_| Some(NodeKind::Record(RecordKind::Class))),
            (CursorKind::StructDecl, |_| Some(NodeKind::Record(RecordKind::Struct))),
            (CursorKind::ClassTemplate, |_| Some(NodeKind::Record(RecordKind::ClassTemplate))),
            (
                CursorKind::ClassTemplatePartialSpecialization,
                |_| Some(NodeKind::Record(RecordKind::PartialSpecialization)),
            ),
            (CursorKind::FunctionDecl, |_| Some(NodeKind::Callable(CallableKind::Function))),
            (CursorKind::FunctionTemplate, |_| Some(NodeKind::Callable(CallableKind::FunctionTemplate))),
            (CursorKind::CxxMethod, |_| Some(NodeKind::Callable(CallableKind::Method))),
            (CursorKind::Constructor, |_| Some(NodeKind::Callable(CallableKind::Constructor))),
            (CursorKind::Destructor, |_| Some(NodeKind::Callable(CallableKind::Destructor))),
            (CursorKind::ParmDecl, |_| Some(NodeKind::Param)),
            (CursorKind::FieldDecl, |_| Some(NodeKind::Field)),
            (CursorKind::VarDecl, |_| Some(NodeKind::Variable)),
            (CursorKind::EnumDecl, |_| Some(NodeKind::Enum)),
            (CursorKind::EnumConstantDecl, |_| Some(NodeKind::EnumConstant)),
            (CursorKind::TypedefDecl, |_| Some(NodeKind::TypeDef)),
            (CursorKind::TypeAliasDecl, |_| Some(NodeKind::TypeAlias)),
            (CursorKind::TypeAliasTemplateDecl, |_| Some(NodeKind::TypeAliasTemplate)),
            (CursorKind::CxxBaseSpecifier, |_| Some(NodeKind::BaseSpecifier)),
            (CursorKind::TypeRef, |_| Some(NodeKind::TypeRef)),
            (CursorKind::TemplateRef, |_| Some(NodeKind::TemplateRef)),
            (CursorKind::TemplateTypeParameter, |_| Some(NodeKind::TemplateTypeParam)),
            (CursorKind::TemplateNonTypeParameter, |_| Some(NodeKind::TemplateNonTypeParam)),
        ];
        let mut factory = Self::empty();
        for &(kind, constructor) in entries {
            factory.register(kind, constructor);
        }
        factory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hydra_source::UnitBuilder;

    #[test]
    fn unions_and_using_directives_are_not_modeled() {
        let factory = Factory::default();
        assert!(!factory.is_modeled(CursorKind::UnionDecl));
        assert!(!factory.is_modeled(CursorKind::UsingDirective));
        assert!(factory.is_modeled(CursorKind::TemplateNonTypeParameter));
    }

    #[test]
    fn custom_constructor_can_decline() {
        let mut b = UnitBuilder::new("t.hpp");
        let root = b.root();
        let hidden = b.cursor(root, CursorKind::ClassDecl, "detail_Impl").id();
        let unit = b.finish();

        let mut factory = Factory::default();
        factory.register(CursorKind::ClassDecl, |cursor| {
            (!cursor.spelling().starts_with("detail_")).then_some(NodeKind::Record(RecordKind::Class))
        });
        let constructor = factory.get(CursorKind::ClassDecl).unwrap();
        assert_eq!(constructor(unit.cursor(hidden)), None);
    }
}
