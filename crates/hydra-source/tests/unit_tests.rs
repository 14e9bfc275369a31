use hydra_source::{CursorKind, Severity, SourceError, SourceLocation, TranslationUnit, UnitBuilder};

#[test]
fn test_json_round_trip_preserves_structure() {
    let mut b = UnitBuilder::new("module.hpp");
    let root = b.root();
    let foo = b.cursor(root, CursorKind::ClassDecl, "Foo").usr("c:@S@Foo").definition_of_itself().id();
    let int = b.fundamental("int");
    b.cursor(foo, CursorKind::FieldDecl, "x").usr("c:@S@Foo@FI@x").ty(int).id();
    b.diagnostic(Severity::Warning, "unused include", SourceLocation::new("module.hpp", 3, 1));
    b.include("core/Foo.h", 1);
    let unit = b.finish();

    let json = unit.to_json().unwrap();
    let reloaded = TranslationUnit::from_json(&json).unwrap();
    assert_eq!(reloaded, unit);
    assert_eq!(reloaded.diagnostics[0].severity, Severity::Warning);
    assert_eq!(reloaded.includes[0].to_string(), "<include 1 \"core/Foo.h\">");
}

#[test]
fn test_unknown_kinds_decode_as_other() {
    let json = r#"{
        "root": 0,
        "cursors": [
            { "kind": "TRANSLATION_UNIT", "children": [1] },
            { "kind": "OBJC_INTERFACE_DECL", "spelling": "NSObject", "semantic_parent": 0 }
        ]
    }"#;
    let unit = TranslationUnit::from_json(json).unwrap();
    let child = unit.root().children().next().unwrap();
    assert_eq!(child.kind(), CursorKind::Other);
    assert_eq!(child.usr(), None);
}

#[test]
fn test_empty_usr_reads_as_absent() {
    let json = r#"{
        "root": 0,
        "cursors": [
            { "kind": "TRANSLATION_UNIT", "children": [1] },
            { "kind": "STRUCT_DECL", "spelling": "", "usr": "", "semantic_parent": 0 }
        ]
    }"#;
    let unit = TranslationUnit::from_json(json).unwrap();
    assert_eq!(unit.root().children().next().unwrap().usr(), None);
}

#[test]
fn test_root_must_be_translation_unit() {
    let json = r#"{ "root": 0, "cursors": [ { "kind": "NAMESPACE", "spelling": "ns" } ] }"#;
    let err = TranslationUnit::from_json(json).unwrap_err();
    assert!(matches!(err, SourceError::BadRoot { id: 0, kind: CursorKind::Namespace }));
}

#[test]
fn test_dangling_type_reference() {
    let json = r#"{
        "root": 0,
        "cursors": [ { "kind": "TRANSLATION_UNIT", "type": 4 } ],
        "types": []
    }"#;
    let err = TranslationUnit::from_json(json).unwrap_err();
    assert!(matches!(err, SourceError::DanglingType { id: 4, .. }), "got {err:?}");
}

#[test]
fn test_child_list_cycle_is_rejected() {
    // A parameter without a USR listing itself as its own child
    let json = r#"{
        "root": 0,
        "cursors": [
            { "kind": "TRANSLATION_UNIT", "children": [1] },
            { "kind": "FUNCTION_DECL", "spelling": "f", "usr": "c:@F@f#", "children": [2] },
            { "kind": "PARM_DECL", "spelling": "x", "children": [2] }
        ]
    }"#;
    let err = TranslationUnit::from_json(json).unwrap_err();
    assert!(matches!(err, SourceError::CyclicCursor { id: 2, parent: 2 }), "got {err:?}");
}

#[test]
fn test_cursor_shared_between_parents_is_rejected() {
    let json = r#"{
        "root": 0,
        "cursors": [
            { "kind": "TRANSLATION_UNIT", "children": [1, 2] },
            { "kind": "NAMESPACE", "spelling": "a", "usr": "c:@N@a", "children": [3] },
            { "kind": "NAMESPACE", "spelling": "b", "usr": "c:@N@b", "children": [3] },
            { "kind": "STRUCT_DECL", "spelling": "S", "usr": "c:@S@S" }
        ]
    }"#;
    let err = TranslationUnit::from_json(json).unwrap_err();
    assert!(matches!(err, SourceError::CyclicCursor { id: 3, .. }), "got {err:?}");
}

#[test]
fn test_garbage_is_decode_error() {
    let err = TranslationUnit::from_json("not json").unwrap_err();
    assert!(matches!(err, SourceError::Decode { .. }));
}

#[test]
fn test_location_display() {
    assert_eq!(SourceLocation::new("a.h", 4, 2).to_string(), "a.h:4:2");
    assert_eq!(SourceLocation::default().to_string(), "<unknown location>");
}
