use std::path::Path;

use fxhash::FxHashSet;

use crate::error::SourceError;

/// Builds the umbrella header parsed in a single front-end run: one
/// `#include <...>` per distinct header, in first-seen order.
pub fn synthesize_umbrella<I, S>(headers: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = FxHashSet::default();
    let mut text = String::new();
    for header in headers {
        let header = header.as_ref().trim();
        if header.is_empty() || !seen.insert(header.to_string()) {
            continue;
        }
        text.push_str("#include <");
        text.push_str(header);
        text.push_str(">\n");
    }
    text
}

/// Writes the umbrella header to `path`.
pub fn write_umbrella<I, S>(path: &Path, headers: I) -> Result<(), SourceError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let text = synthesize_umbrella(headers);
    std::fs::write(path, text).map_err(|source| SourceError::Io { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn umbrella_deduplicates_in_order() {
        let text = synthesize_umbrella(["core/Song.h", "core/Pattern.h", "core/Song.h", " ", "pybind11/stl.h"]);
        assert_eq!(
            text,
            "#include <core/Song.h>\n#include <core/Pattern.h>\n#include <pybind11/stl.h>\n"
        );
    }

    #[test]
    fn umbrella_written_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("module.hpp");
        write_umbrella(&path, ["a.h"]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "#include <a.h>\n");
    }
}
