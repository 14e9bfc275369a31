use std::path::Path;

use hydra_dom::BuildSession;
use hydra_source::load_unit;

use super::emit;
use crate::error::CliError;

/// Prints the model tree, whole or from the entity at `path`.
pub fn handle_dump(unit_path: &Path, path: Option<&str>, output: Option<&Path>) -> Result<(), CliError> {
    let unit = load_unit(unit_path)?;
    let session = BuildSession::build_from(&unit);
    let dom = session.dom();

    let text = match path {
        Some(path) => {
            let node = dom
                .resolve_path(path)
                .map_err(|source| CliError::Lookup { path: path.to_string(), source })?;
            dom.dump_from(node)
        }
        None => dom.dump(),
    };
    emit(&text, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    use hydra_dom::LookupError;
    use hydra_source::{CursorKind, UnitBuilder};

    fn write_unit(dir: &Path) -> std::path::PathBuf {
        let mut b = UnitBuilder::new("module.hpp");
        let root = b.root();
        let ns = b.cursor(root, CursorKind::Namespace, "ns").usr("c:@N@ns").id();
        b.cursor(ns, CursorKind::EnumDecl, "Color").usr("c:@N@ns@E@Color").id();
        let path = dir.join("module.json");
        std::fs::write(&path, b.finish().to_json().unwrap()).unwrap();
        path
    }

    #[test]
    fn dump_subtree_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let unit = write_unit(dir.path());
        let output = dir.path().join("dump.txt");

        handle_dump(&unit, Some("ns"), Some(&output)).unwrap();
        assert_eq!(std::fs::read_to_string(output).unwrap(), "namespace ns\n  enum Color\n");
    }

    #[test]
    fn dump_unknown_path_is_a_lookup_error() {
        let dir = tempfile::tempdir().unwrap();
        let unit = write_unit(dir.path());

        let err = handle_dump(&unit, Some("ns::Shape"), None).unwrap_err();
        assert!(
            matches!(&err, CliError::Lookup { source: LookupError::NotFound { segment, .. }, .. } if segment == "Shape"),
            "got {err:?}"
        );
    }
}
