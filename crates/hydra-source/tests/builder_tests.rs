use hydra_source::{AccessSpecifier, CursorKind, TypeKind, UnitBuilder};

#[test]
fn test_builder_links_parents_and_children() {
    let mut b = UnitBuilder::new("module.hpp");
    let root = b.root();
    let ns = b.cursor(root, CursorKind::Namespace, "ns").usr("c:@N@ns").id();
    let foo = b.cursor(ns, CursorKind::ClassDecl, "Foo").usr("c:@N@ns@S@Foo").id();
    let field = b.cursor(foo, CursorKind::FieldDecl, "x").usr("c:@N@ns@S@Foo@FI@x").id();
    let unit = b.finish();

    assert_eq!(unit.root().kind(), CursorKind::TranslationUnit);
    let ns_children: Vec<_> = unit.cursor(ns).children().map(|c| c.id()).collect();
    assert_eq!(ns_children, vec![foo]);

    let field = unit.cursor(field);
    assert_eq!(field.semantic_parent().map(|c| c.id()), Some(foo));
    assert_eq!(field.lexical_parent().map(|c| c.id()), Some(foo));

    // Class members default to public, namespace members carry no access
    assert_eq!(field.access(), AccessSpecifier::Public);
    assert_eq!(unit.cursor(foo).access(), AccessSpecifier::None);
}

#[test]
fn test_out_of_line_semantic_parent() {
    let mut b = UnitBuilder::new("module.hpp");
    let root = b.root();
    let foo = b.cursor(root, CursorKind::ClassDecl, "Foo").usr("c:@S@Foo").id();
    // void Foo::bar() {} written at namespace scope
    let bar = b
        .cursor(root, CursorKind::CxxMethod, "bar")
        .usr("c:@S@Foo@F@bar#")
        .semantic_parent(foo)
        .id();
    let unit = b.finish();

    let bar = unit.cursor(bar);
    assert_eq!(bar.semantic_parent().map(|c| c.id()), Some(foo));
    assert_eq!(bar.lexical_parent().map(|c| c.id()), Some(root));
}

#[test]
fn test_type_helpers() {
    let mut b = UnitBuilder::new("module.hpp");
    let root = b.root();
    let foo = b.cursor(root, CursorKind::StructDecl, "Foo").usr("c:@S@Foo").definition_of_itself().id();
    let foo_ty = b.declared_type(foo);
    let ptr = b.pointer_to(foo_ty);
    let ptr_ptr = b.pointer_to(ptr);
    let reference = b.lvalue_ref_to(foo_ty);
    let alias = b.cursor(root, CursorKind::TypedefDecl, "FooPtr").usr("c:@T@FooPtr").id();
    let alias_ty = b.alias_type(alias, ptr);
    let int = b.fundamental("int");
    let unit = b.finish();

    assert_eq!(unit.ty(ptr_ptr).spelling(), "Foo * *");
    assert_eq!(unit.ty(ptr_ptr).strip_pointers().id(), foo_ty);
    // References survive pointer stripping
    assert_eq!(unit.ty(reference).strip_pointers().id(), reference);
    assert_eq!(unit.ty(reference).pointee().map(|t| t.id()), Some(foo_ty));

    assert_eq!(unit.ty(alias_ty).kind(), TypeKind::Typedef);
    assert_eq!(unit.ty(alias_ty).canonical().id(), ptr);
    assert_eq!(unit.ty(foo_ty).definition().map(|c| c.id()), Some(foo));

    assert!(unit.ty(int).declaration().is_none());
    assert!(unit.ty(int).pointee().is_none());
}

#[test]
fn test_definition_link() {
    let mut b = UnitBuilder::new("module.hpp");
    let root = b.root();
    let fwd = b.cursor(root, CursorKind::ClassDecl, "Foo").usr("c:@S@Foo").id();
    let def = b.cursor(root, CursorKind::ClassDecl, "Foo").usr("c:@S@Foo").definition_of_itself().id();
    b.edit(fwd).definition(def);
    let unit = b.finish();

    assert_eq!(unit.cursor(fwd).definition().map(|c| c.id()), Some(def));
    assert_eq!(unit.cursor(def).definition().map(|c| c.id()), Some(def));
}
