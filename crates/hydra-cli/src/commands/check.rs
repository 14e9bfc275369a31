use std::path::Path;

use hydra_dom::BuildSession;
use hydra_source::{load_unit, TranslationUnit};

use super::report_diagnostics;
use crate::error::CliError;

/// Builds the model of a unit and reports its diagnostics. Diagnostics are
/// never fatal, so this only fails when the unit cannot be loaded.
pub fn handle_check(unit_path: &Path) -> Result<(), CliError> {
    let unit = load_unit(unit_path)?;
    let session = BuildSession::build_from(&unit);
    report_diagnostics(session.diagnostics().iter().cloned());

    println!("checked {}: {}", unit_path.display(), summary(&unit, &session));
    Ok(())
}

fn summary(unit: &TranslationUnit, session: &BuildSession<'_>) -> String {
    let max_depth = unit.includes.iter().map(|include| include.depth).max().unwrap_or(0);
    format!(
        "{} nodes, {} diagnostics, {} includes (max depth {})",
        session.dom().len(),
        session.diagnostics().len(),
        unit.includes.len(),
        max_depth
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use hydra_source::{CursorKind, UnitBuilder};

    #[test]
    fn summary_counts_includes_of_the_parse() {
        let mut b = UnitBuilder::new("module.hpp");
        let root = b.root();
        b.cursor(root, CursorKind::Namespace, "ns").usr("c:@N@ns").id();
        b.include("core/Song.h", 1);
        b.include("QtCore/QString", 3);
        b.include("core/Pattern.h", 1);
        let unit = b.finish();
        let session = BuildSession::build_from(&unit);

        assert_eq!(
            summary(&unit, &session),
            format!("{} nodes, 0 diagnostics, 3 includes (max depth 3)", session.dom().len())
        );
    }
}
