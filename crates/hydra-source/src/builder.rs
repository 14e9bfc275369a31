//! Programmatic construction of translation units.
//!
//! Front-end adapters use this to translate their native AST into a
//! [`TranslationUnit`]; tests use it to write fixtures without a compiler.

use crate::cursor::{AccessSpecifier, CursorData, CursorKind, SourceLocation};
use crate::diagnostic::{FrontEndDiagnostic, Include, Severity};
use crate::types::{TypeData, TypeKind};
use crate::unit::{CursorId, TranslationUnit, TypeId};

/// Incrementally builds a [`TranslationUnit`].
///
/// ```
/// use hydra_source::{CursorKind, UnitBuilder};
///
/// let mut b = UnitBuilder::new("module.hpp");
/// let root = b.root();
/// let ns = b.cursor(root, CursorKind::Namespace, "ns").usr("c:@N@ns").id();
/// let foo = b.cursor(ns, CursorKind::ClassDecl, "Foo").usr("c:@N@ns@S@Foo").definition_of_itself().id();
/// let unit = b.finish();
/// assert_eq!(unit.cursor(foo).semantic_parent().map(|c| c.id()), Some(ns));
/// ```
pub struct UnitBuilder {
    unit: TranslationUnit,
    next_line: u32,
}

impl UnitBuilder {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let root = CursorData::new(CursorKind::TranslationUnit, path.clone());
        Self {
            unit: TranslationUnit {
                path,
                root: CursorId(0),
                cursors: vec![root],
                types: Vec::new(),
                diagnostics: Vec::new(),
                includes: Vec::new(),
            },
            next_line: 1,
        }
    }

    pub fn root(&self) -> CursorId {
        self.unit.root
    }

    /// Adds a cursor as the last child of `parent`. Both the lexical and the
    /// semantic parent default to `parent`; members default to public access.
    pub fn cursor(&mut self, parent: CursorId, kind: CursorKind, spelling: impl Into<String>) -> CursorBuilder<'_> {
        let id = CursorId(self.unit.cursors.len() as u32);
        let mut data = CursorData::new(kind, spelling);
        data.semantic_parent = Some(parent);
        data.lexical_parent = Some(parent);
        data.location = SourceLocation::new(self.unit.path.clone(), self.next_line, 1);
        self.next_line += 1;
        if matches!(
            self.unit.cursors[parent.index()].kind,
            CursorKind::ClassDecl
                | CursorKind::StructDecl
                | CursorKind::ClassTemplate
                | CursorKind::ClassTemplatePartialSpecialization
        ) {
            data.access = AccessSpecifier::Public;
        }
        self.unit.cursors.push(data);
        self.unit.cursors[parent.index()].children.push(id);
        CursorBuilder { builder: self, id }
    }

    /// Re-opens an existing cursor for further edits.
    pub fn edit(&mut self, id: CursorId) -> CursorBuilder<'_> {
        CursorBuilder { builder: self, id }
    }

    pub fn ty(&mut self, data: TypeData) -> TypeId {
        let id = TypeId(self.unit.types.len() as u32);
        self.unit.types.push(data);
        id
    }

    /// A fundamental type: no declaration.
    pub fn fundamental(&mut self, spelling: &str) -> TypeId {
        self.ty(TypeData::new(TypeKind::Builtin, spelling))
    }

    pub fn invalid_type(&mut self) -> TypeId {
        self.ty(TypeData::new(TypeKind::Invalid, ""))
    }

    /// The type a declaration introduces (`Record` for classes, `Enum` for
    /// enums, `Typedef` for aliases), spelled with the cursor's spelling.
    pub fn declared_type(&mut self, decl: CursorId) -> TypeId {
        let cursor = &self.unit.cursors[decl.index()];
        let kind = match cursor.kind {
            CursorKind::EnumDecl => TypeKind::Enum,
            CursorKind::TypedefDecl | CursorKind::TypeAliasDecl => TypeKind::Typedef,
            CursorKind::ClassTemplate => TypeKind::Unexposed,
            _ => TypeKind::Record,
        };
        let mut data = TypeData::new(kind, cursor.spelling.clone());
        data.declaration = Some(decl);
        self.ty(data)
    }

    /// An alias type declared by `decl` whose canonical form is `canonical`.
    pub fn alias_type(&mut self, decl: CursorId, canonical: TypeId) -> TypeId {
        let spelling = self.unit.cursors[decl.index()].spelling.clone();
        let mut data = TypeData::new(TypeKind::Typedef, spelling);
        data.declaration = Some(decl);
        data.canonical = Some(self.canonical_of(canonical));
        self.ty(data)
    }

    pub fn pointer_to(&mut self, pointee: TypeId) -> TypeId {
        self.indirection(TypeKind::Pointer, pointee, " *")
    }

    pub fn lvalue_ref_to(&mut self, pointee: TypeId) -> TypeId {
        self.indirection(TypeKind::LValueReference, pointee, " &")
    }

    pub fn rvalue_ref_to(&mut self, pointee: TypeId) -> TypeId {
        self.indirection(TypeKind::RValueReference, pointee, " &&")
    }

    fn indirection(&mut self, kind: TypeKind, pointee: TypeId, suffix: &str) -> TypeId {
        let spelling = format!("{}{}", self.unit.types[pointee.index()].spelling, suffix);
        let mut data = TypeData::new(kind, spelling);
        data.pointee = Some(pointee);
        self.ty(data)
    }

    fn canonical_of(&self, ty: TypeId) -> TypeId {
        self.unit.types[ty.index()].canonical.unwrap_or(ty)
    }

    pub fn diagnostic(&mut self, severity: Severity, message: impl Into<String>, location: SourceLocation) {
        self.unit.diagnostics.push(FrontEndDiagnostic { severity, message: message.into(), location });
    }

    pub fn include(&mut self, path: impl Into<String>, depth: u32) {
        self.unit.includes.push(Include { path: path.into(), depth });
    }

    pub fn finish(self) -> TranslationUnit {
        self.unit
    }
}

/// Fluent edits on a freshly added (or re-opened) cursor.
pub struct CursorBuilder<'b> {
    builder: &'b mut UnitBuilder,
    id: CursorId,
}

impl CursorBuilder<'_> {
    fn data(&mut self) -> &mut CursorData {
        &mut self.builder.unit.cursors[self.id.index()]
    }

    pub fn usr(mut self, usr: impl Into<String>) -> Self {
        self.data().usr = Some(usr.into());
        self
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.data().display_name = Some(name.into());
        self
    }

    /// Overrides the semantic parent (out-of-line definitions, friend
    /// declarations, ...). The lexical parent stays where the cursor was added.
    pub fn semantic_parent(mut self, parent: CursorId) -> Self {
        self.data().semantic_parent = Some(parent);
        self
    }

    pub fn no_semantic_parent(mut self) -> Self {
        self.data().semantic_parent = None;
        self
    }

    pub fn access(mut self, access: AccessSpecifier) -> Self {
        self.data().access = access;
        self
    }

    pub fn ty(mut self, ty: TypeId) -> Self {
        self.data().ty = Some(ty);
        self
    }

    pub fn result_type(mut self, ty: TypeId) -> Self {
        self.data().result_type = Some(ty);
        self
    }

    pub fn definition(mut self, definition: CursorId) -> Self {
        self.data().definition = Some(definition);
        self
    }

    pub fn definition_of_itself(mut self) -> Self {
        self.data().flags.is_definition = true;
        self
    }

    pub fn brief_comment(mut self, comment: impl Into<String>) -> Self {
        self.data().brief_comment = Some(comment.into());
        self
    }

    pub fn location(mut self, file: &str, line: u32) -> Self {
        self.data().location = SourceLocation::new(file, line, 1);
        self
    }

    pub fn is_static(mut self) -> Self {
        self.data().flags.is_static = true;
        self
    }

    pub fn is_virtual(mut self) -> Self {
        self.data().flags.is_virtual = true;
        self
    }

    pub fn is_pure_virtual(mut self) -> Self {
        let flags = &mut self.data().flags;
        flags.is_virtual = true;
        flags.is_pure_virtual = true;
        self
    }

    pub fn is_abstract(mut self) -> Self {
        self.data().flags.is_abstract = true;
        self
    }

    pub fn id(self) -> CursorId {
        self.id
    }
}
