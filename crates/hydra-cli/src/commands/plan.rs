use std::path::{Path, PathBuf};

use hydra_bind::{binding_order, build_plan, compute_closure, resolve_roots, OutlineRenderer, Policy, ProjectConfig, Renderer};
use hydra_dom::BuildSession;
use hydra_source::load_unit;

use super::{emit, report_diagnostics};
use crate::error::CliError;
use crate::utils::locate_config;

/// Computes the binding plan for the roots of the project file (or the
/// roots given on the command line) and prints its outline.
///
/// Roots that cannot be found are reported and skipped, as is every entity
/// the closure refused to bind. A dependency cycle fails the command.
pub fn handle_plan(
    unit_path: &Path,
    config: Option<PathBuf>,
    roots: &[String],
    output: Option<&Path>,
) -> Result<(), CliError> {
    let config_path = locate_config(config)?;
    let config = ProjectConfig::load(&config_path)?;
    let unit = load_unit(unit_path)?;

    let mut session = BuildSession::build_from(&unit);
    report_diagnostics(session.diagnostics().iter().cloned());

    let mut policy = Policy::new(config.policy.clone());
    let detected = policy.detect_casters(&mut session);
    if detected > 0 {
        log::info!("{detected} types have a caster specialization");
    }

    let names: Vec<&str> = if roots.is_empty() { config.root_names() } else { roots.iter().map(String::as_str).collect() };
    let (roots, errors) = resolve_roots(session.dom(), names);
    report_diagnostics(errors);

    let closure = compute_closure(&mut session, &policy, &roots);
    report_diagnostics(closure.diagnostics(session.dom()));
    let order = binding_order(&mut session, &closure)?;
    let plan = build_plan(&mut session, &policy, &order, &config.emit);
    log::info!("{} entities in the binding plan", plan.entries.len());
    emit(&OutlineRenderer.render_to_string(session.dom(), &plan), output)
}

#[cfg(test)]
mod tests {
    use super::*;

    use hydra_bind::BindError;
    use hydra_source::{CursorKind, UnitBuilder};

    // namespace ns { class Foo; class Bar : Foo; struct Loop : Loop2; struct Loop2 : Loop; }
    fn write_unit(dir: &Path) -> PathBuf {
        let mut b = UnitBuilder::new("module.hpp");
        let root = b.root();
        let ns = b.cursor(root, CursorKind::Namespace, "ns").usr("c:@N@ns").id();
        let foo = b.cursor(ns, CursorKind::ClassDecl, "Foo").usr("c:@N@ns@S@Foo").definition_of_itself().id();
        let bar = b.cursor(ns, CursorKind::ClassDecl, "Bar").usr("c:@N@ns@S@Bar").definition_of_itself().id();
        let foo_ty = b.declared_type(foo);
        let spec = b.cursor(bar, CursorKind::CxxBaseSpecifier, "ns::Foo").id();
        b.cursor(spec, CursorKind::TypeRef, "class ns::Foo").definition(foo).ty(foo_ty).id();

        let first = b.cursor(ns, CursorKind::StructDecl, "Loop").usr("c:@N@ns@S@Loop").definition_of_itself().id();
        let second = b.cursor(ns, CursorKind::StructDecl, "Loop2").usr("c:@N@ns@S@Loop2").definition_of_itself().id();
        for (record, base) in [(first, second), (second, first)] {
            let ty = b.declared_type(base);
            let spec = b.cursor(record, CursorKind::CxxBaseSpecifier, "base").id();
            b.cursor(spec, CursorKind::TypeRef, "struct base").definition(base).ty(ty).id();
        }

        let path = dir.join("module.json");
        std::fs::write(&path, b.finish().to_json().unwrap()).unwrap();
        path
    }

    fn write_config(dir: &Path) -> PathBuf {
        let path = dir.join("hydra.toml");
        std::fs::write(
            &path,
            r#"
            [[bindings]]
            name = "ns::Bar"
            header = "ns.h"

            [[bindings]]
            name = "ns::Missing"
            header = "ns.h"
            "#,
        )
        .unwrap();
        path
    }

    #[test]
    fn plan_skips_unknown_roots() {
        let dir = tempfile::tempdir().unwrap();
        let unit = write_unit(dir.path());
        let config = write_config(dir.path());
        let output = dir.path().join("plan.txt");

        handle_plan(&unit, Some(config), &[], Some(&output)).unwrap();
        assert_eq!(std::fs::read_to_string(output).unwrap(), "module bindings\nclass ns::Foo\nclass ns::Bar : ns::Foo\n");
    }

    #[test]
    fn plan_fails_on_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let unit = write_unit(dir.path());
        let config = write_config(dir.path());

        let err = handle_plan(&unit, Some(config), &["ns::Loop".to_string()], None).unwrap_err();
        match err {
            CliError::Bind(BindError::DependencyCycle { cycle }) => {
                assert_eq!(cycle.first(), cycle.last());
                assert_eq!(cycle.len(), 3);
            }
            other => panic!("expected a dependency cycle, got {other:?}"),
        }
    }
}
