use hydra_bind::{binding_order, compute_closure, resolve_root, BindError, Policy};
use hydra_dom::BuildSession;
use hydra_source::{CursorKind, TranslationUnit};

use crate::common::Header;

// class Base {}; class Mid : Base { Leaf l; }; class Leaf {};
// class Top : Mid { enum Kind {}; }; Top make(Leaf);
fn layered() -> TranslationUnit {
    let mut h = Header::new();
    let root = h.root();
    let base = h.class(root, "Base");
    let mid = h.class(root, "Mid");
    let leaf = h.class(root, "Leaf");
    let top = h.class(root, "Top");
    h.base(mid, base, "Base");
    let leaf_ty = h.ty(leaf);
    h.field(mid, "l", leaf_ty);
    h.base(top, mid, "Mid");
    h.b.cursor(top, CursorKind::EnumDecl, "Kind").usr("c:@S@Top@E@Kind").id();
    let top_ty = h.ty(top);
    let make = h
        .b
        .cursor(root, CursorKind::FunctionDecl, "make")
        .usr("c:@F@make#$@S@Leaf#")
        .display_name("make(Leaf)")
        .result_type(top_ty)
        .id();
    h.b.cursor(make, CursorKind::ParmDecl, "leaf").ty(leaf_ty).id();
    h.finish()
}

#[test]
fn test_dependencies_precede_dependents() {
    let unit = layered();
    let mut session = BuildSession::build_from(&unit);
    let roots = resolve_root(session.dom(), "make").unwrap();
    let closure = compute_closure(&mut session, &Policy::default(), &roots);
    let order = binding_order(&mut session, &closure).unwrap();

    assert_eq!(order.len(), closure.len());
    for (position, node) in order.iter().enumerate() {
        for dep in session.dependencies(*node) {
            if let Some(dep_position) = order.iter().position(|other| *other == dep) {
                assert!(
                    dep_position < position,
                    "{} must come before {}",
                    session.dom().full_name(dep),
                    session.dom().full_name(*node)
                );
            }
        }
    }
}

#[test]
fn test_order_is_stable() {
    let unit = layered();
    let names: Vec<Vec<String>> = (0..2)
        .map(|_| {
            let mut session = BuildSession::build_from(&unit);
            let roots = resolve_root(session.dom(), "make").unwrap();
            let closure = compute_closure(&mut session, &Policy::default(), &roots);
            let order = binding_order(&mut session, &closure).unwrap();
            order.into_iter().map(|id| session.dom().full_name(id)).collect()
        })
        .collect();

    assert_eq!(names[0], names[1]);
    assert_eq!(names[0], vec!["Leaf", "Base", "Mid", "Top", "make", "Top::Kind"]);
}

#[test]
fn test_independent_entities_keep_settle_order() {
    let mut h = Header::new();
    let root = h.root();
    h.class(root, "First");
    h.class(root, "Second");
    let unit = h.finish();

    let mut session = BuildSession::build_from(&unit);
    let mut roots = resolve_root(session.dom(), "First").unwrap();
    roots.extend(resolve_root(session.dom(), "Second").unwrap());
    let closure = compute_closure(&mut session, &Policy::default(), &roots);
    let order = binding_order(&mut session, &closure).unwrap();

    assert_eq!(order, closure.settled.iter().copied().collect::<Vec<_>>());
}

#[test]
fn test_mutual_dependency_reports_the_cycle() {
    // A front end reporting `class A : B` and `class B : A`
    let mut h = Header::new();
    let root = h.root();
    let a = h.class(root, "A");
    let b = h.class(root, "B");
    h.base(a, b, "B");
    h.base(b, a, "A");
    let unit = h.finish();

    let mut session = BuildSession::build_from(&unit);
    let roots = resolve_root(session.dom(), "A").unwrap();
    let closure = compute_closure(&mut session, &Policy::default(), &roots);
    assert_eq!(closure.len(), 2);

    match binding_order(&mut session, &closure) {
        Err(BindError::DependencyCycle { cycle }) => {
            assert_eq!(cycle.len(), 3);
            assert_eq!(cycle.first(), cycle.last());
            assert!(cycle.contains(&"A".to_string()));
            assert!(cycle.contains(&"B".to_string()));
        }
        other => panic!("expected a cycle, got {other:?}"),
    }
}

#[test]
fn test_excluding_a_cycle_member_breaks_the_cycle() {
    let mut h = Header::new();
    let root = h.root();
    let a = h.class(root, "A");
    let b = h.class(root, "B");
    h.base(a, b, "B");
    h.base(b, a, "A");
    let unit = h.finish();

    let mut session = BuildSession::build_from(&unit);
    let roots = resolve_root(session.dom(), "A").unwrap();
    let closure = compute_closure(&mut session, &Policy::default().exclude("B"), &roots);
    let order = binding_order(&mut session, &closure).unwrap();
    assert_eq!(order.len(), 1);
}
