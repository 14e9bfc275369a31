use std::path::Path;

use crate::error::SourceError;
use crate::unit::TranslationUnit;

/// Reads a JSON AST dump written by a front-end adapter and validates it.
pub fn load_unit(path: &Path) -> Result<TranslationUnit, SourceError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| SourceError::Io { path: path.to_path_buf(), source })?;
    let unit = TranslationUnit::from_json(&text)?;
    log::debug!(
        "loaded {} ({} cursors, {} types, {} diagnostics)",
        path.display(),
        unit.cursors.len(),
        unit.types.len(),
        unit.diagnostics.len()
    );
    Ok(unit)
}
