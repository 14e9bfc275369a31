// Common fixture helpers for binding tests

use hydra_source::{CursorId, CursorKind, TranslationUnit, TypeId, UnitBuilder};

/// Thin layer over `UnitBuilder` for the shapes binding tests need:
/// records with bases, typed fields and methods.
pub struct Header {
    pub b: UnitBuilder,
}

impl Header {
    pub fn new() -> Self {
        Self { b: UnitBuilder::new("module.hpp") }
    }

    pub fn root(&self) -> CursorId {
        self.b.root()
    }

    pub fn namespace(&mut self, parent: CursorId, name: &str) -> CursorId {
        self.b.cursor(parent, CursorKind::Namespace, name).usr(format!("c:@N@{name}")).id()
    }

    /// A defined class. The parent's cursor id keeps USRs unique across scopes.
    pub fn class(&mut self, parent: CursorId, name: &str) -> CursorId {
        let usr = format!("c:@S@{}#{}", parent.0, name);
        self.b.cursor(parent, CursorKind::ClassDecl, name).usr(usr).definition_of_itself().id()
    }

    pub fn ty(&mut self, decl: CursorId) -> TypeId {
        self.b.declared_type(decl)
    }

    pub fn base(&mut self, record: CursorId, base: CursorId, spelling: &str) {
        let ty = self.b.declared_type(base);
        let spec = self.b.cursor(record, CursorKind::CxxBaseSpecifier, spelling).id();
        self.b.cursor(spec, CursorKind::TypeRef, format!("class {spelling}")).definition(base).ty(ty).id();
    }

    pub fn field(&mut self, record: CursorId, name: &str, ty: TypeId) -> CursorId {
        let usr = format!("c:@S@{}@FI@{}", record.0, name);
        self.b.cursor(record, CursorKind::FieldDecl, name).usr(usr).ty(ty).id()
    }

    /// A method `name(p1, p2, ...)`; parameters are `(name, type, spelling)`.
    pub fn method(
        &mut self,
        record: CursorId,
        kind: CursorKind,
        name: &str,
        result: Option<TypeId>,
        params: &[(&str, TypeId, &str)],
    ) -> CursorId {
        let signature: Vec<&str> = params.iter().map(|(_, _, spelling)| *spelling).collect();
        let display = format!("{name}({})", signature.join(", "));
        let usr = format!("c:@S@{}@F@{}", record.0, display);
        let mut cursor = self.b.cursor(record, kind, name).usr(usr).display_name(display);
        if let Some(result) = result {
            cursor = cursor.result_type(result);
        }
        let id = cursor.id();
        for (param, ty, _) in params {
            self.b.cursor(id, CursorKind::ParmDecl, *param).ty(*ty).id();
        }
        id
    }

    pub fn finish(self) -> TranslationUnit {
        self.b.finish()
    }
}
