use hydra_bind::{
    plan_bindings, resolve_roots, BindingPlan, EmitConfig, EntryItem, OutlineRenderer, Policy, ProjectConfig, Renderer,
};
use hydra_dom::BuildSession;
use hydra_source::{AccessSpecifier, CursorKind, TranslationUnit};

use crate::common::Header;

const CONFIG: &str = r##"
[[bindings]]
name = "h2::Song"
header = "core/Song.h"

[[bindings]]
name = "h2::make_song"
header = "core/Song.h"

[policy]
exclude = ["h2::Pattern", "h2::Song::clear"]
casters = ["QString"]
exported_enums = ["h2::Song::Mode"]

[policy.return_policies]
"h2::Song::get_name" = "reference_internal"

[policy.replacements]
"h2::Song::get_name()" = "[](const h2::Song &s) { return s.get_name(); }"

[policy.addon_methods."h2::Song"]
__repr__ = "[](const h2::Song &s) { return s.get_name(); }"

[emit]
module = "h2core"
prolog = ["#include \"qtreset.h\"\n"]
"##;

// class QString;
// namespace h2 {
//   class Base (abstract); class Pattern;
//   class Song : public Base { ... };
//   Song make_song();
// }
fn song_unit() -> TranslationUnit {
    let mut h = Header::new();
    let root = h.root();
    let qstring = h.class(root, "QString");
    let h2 = h.namespace(root, "h2");
    let base = h.class(h2, "Base");
    h.b.edit(base).is_abstract();
    let pattern = h.class(h2, "Pattern");
    let song = h.class(h2, "Song");
    h.base(song, base, "h2::Base");

    let qstring_ty = h.ty(qstring);
    let qstring_ref = h.b.lvalue_ref_to(qstring_ty);
    let pattern_ty = h.ty(pattern);
    let song_ty = h.ty(song);
    let song_ptr = h.b.pointer_to(song_ty);
    let int = h.b.fundamental("int");
    let double = h.b.fundamental("double");

    h.method(song, CursorKind::Constructor, "Song", None, &[("name", qstring_ref, "const QString &")]);
    h.field(song, "pattern", pattern_ty);
    h.field(song, "tempo", double);
    let get_name = h.method(song, CursorKind::CxxMethod, "get_name", Some(qstring_ty), &[]);
    h.b.edit(get_name).brief_comment("Display name of the song.");
    h.method(song, CursorKind::CxxMethod, "set_tempo", None, &[("tempo", int, "int")]);
    h.method(song, CursorKind::CxxMethod, "set_tempo", None, &[("tempo", double, "double")]);
    let create = h.method(song, CursorKind::CxxMethod, "create", Some(song_ptr), &[]);
    h.b.edit(create).is_static();
    h.method(song, CursorKind::CxxMethod, "clear", None, &[]);
    let secret = h.method(song, CursorKind::CxxMethod, "secret", Some(pattern_ty), &[]);
    h.b.edit(secret).access(AccessSpecifier::Private);

    let mode = h.b.cursor(song, CursorKind::EnumDecl, "Mode").usr("c:@N@h2@S@Song@E@Mode").id();
    h.b.cursor(mode, CursorKind::EnumConstantDecl, "A").usr("c:@N@h2@S@Song@E@Mode@A").id();
    h.b.cursor(mode, CursorKind::EnumConstantDecl, "B").usr("c:@N@h2@S@Song@E@Mode@B").id();
    let anon = h.b.cursor(song, CursorKind::EnumDecl, "").usr("c:@N@h2@S@Song@Ea@20:5").id();
    h.b.cursor(anon, CursorKind::EnumConstantDecl, "MAX").usr("c:@N@h2@S@Song@Ea@20:5@MAX").id();

    h.b.cursor(h2, CursorKind::FunctionDecl, "make_song")
        .usr("c:@N@h2@F@make_song#")
        .brief_comment("Creates an empty song.")
        .display_name("make_song()")
        .result_type(song_ty)
        .id();
    h.finish()
}

fn plan(session: &mut BuildSession<'_>, config: &ProjectConfig) -> BindingPlan {
    let policy = Policy::new(config.policy.clone());
    let (roots, errors) = resolve_roots(session.dom(), config.root_names());
    assert!(errors.is_empty(), "{errors:?}");
    plan_bindings(session, &policy, &roots, &config.emit).unwrap()
}

#[test]
fn test_outline_of_a_plan() {
    let unit = song_unit();
    let config = ProjectConfig::parse(CONFIG).unwrap();
    let mut session = BuildSession::build_from(&unit);
    let plan = plan(&mut session, &config);

    expect_test::expect![[r#"
        module h2core
        | #include "qtreset.h"
        abstract class h2::Base
        class h2::Song : h2::Base
          init(const QString &)
          # field pattern [needs h2::Pattern]
          field tempo
          method get_name() [reference_internal] [replaced]
          method set_tempo(int) [overloaded]
          method set_tempo(double) [overloaded]
          static method create()
          addon __repr__
        function h2::make_song()
        enum <anonymous> [export]
          MAX
        enum h2::Song::Mode [export]
          A
          B
    "#]]
    .assert_eq(&OutlineRenderer.render_to_string(session.dom(), &plan));
}

#[test]
fn test_member_with_excluded_dependency_is_skipped() {
    let unit = song_unit();
    let config = ProjectConfig::parse(CONFIG).unwrap();
    let mut session = BuildSession::build_from(&unit);
    let plan = plan(&mut session, &config);

    let song = session.dom().resolve_path("h2::Song").unwrap();
    let pattern = session.dom().resolve_path("h2::Pattern").unwrap();
    assert!(plan.entry(pattern).is_none());

    let Some(EntryItem::Record(record)) = plan.entry(song).map(|entry| &entry.item) else {
        panic!("h2::Song should be planned as a record");
    };
    let skipped: Vec<&str> = record.fields.iter().filter(|f| f.is_skipped()).map(|f| f.name.as_str()).collect();
    assert_eq!(skipped, vec!["pattern"]);
    assert_eq!(record.fields[0].missing, vec![pattern]);

    // Members referring only to casters and builtins are bound normally
    assert!(record.constructors.iter().all(|c| !c.is_skipped()));
    assert_eq!(record.constructors[0].parameters, vec!["name"]);
}

#[test]
fn test_brief_comments_become_docstrings() {
    let unit = song_unit();
    let config = ProjectConfig::parse(CONFIG).unwrap();
    let mut session = BuildSession::build_from(&unit);
    let plan = plan(&mut session, &config);
    let dom = session.dom();

    let song = dom.resolve_path("h2::Song").unwrap();
    let Some(EntryItem::Record(record)) = plan.entry(song).map(|entry| &entry.item) else {
        panic!("h2::Song should be planned as a record");
    };
    let docs: Vec<(&str, Option<&str>)> =
        record.methods.iter().map(|m| (m.name.as_str(), m.doc.as_deref())).collect();
    assert_eq!(
        docs,
        vec![
            ("get_name", Some("Display name of the song.")),
            ("set_tempo", None),
            ("set_tempo", None),
            ("create", None),
        ]
    );

    let make_song = dom.resolve_path("h2::make_song").unwrap();
    let Some(EntryItem::Function(function)) = plan.entry(make_song).map(|entry| &entry.item) else {
        panic!("h2::make_song should be planned as a function");
    };
    assert_eq!(function.doc.as_deref(), Some("Creates an empty song."));
}

#[test]
fn test_emit_switches_drop_member_kinds() {
    let unit = song_unit();
    let mut config = ProjectConfig::parse(CONFIG).unwrap();
    config.emit = EmitConfig { fields: false, methods: false, ..EmitConfig::default() };
    let mut session = BuildSession::build_from(&unit);
    let plan = plan(&mut session, &config);

    assert_eq!(plan.module, "bindings");
    let song = session.dom().resolve_path("h2::Song").unwrap();
    let Some(EntryItem::Record(record)) = plan.entry(song).map(|entry| &entry.item) else {
        panic!("h2::Song should be planned as a record");
    };
    assert!(record.fields.is_empty());
    assert!(record.methods.is_empty());
    assert_eq!(record.constructors.len(), 1);
}

#[test]
fn test_plan_is_idempotent() {
    let unit = song_unit();
    let config = ProjectConfig::parse(CONFIG).unwrap();
    let first = plan(&mut BuildSession::build_from(&unit), &config);
    let second = plan(&mut BuildSession::build_from(&unit), &config);
    assert_eq!(first, second);
}
