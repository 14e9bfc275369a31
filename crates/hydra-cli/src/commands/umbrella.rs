use std::path::PathBuf;

use hydra_bind::ProjectConfig;
use hydra_source::{synthesize_umbrella, write_umbrella};

use crate::error::CliError;
use crate::utils::locate_config;

/// Writes the umbrella header for every header named in the project file.
pub fn handle_umbrella(config: Option<PathBuf>, output: Option<PathBuf>) -> Result<(), CliError> {
    let config_path = locate_config(config)?;
    let config = ProjectConfig::load(&config_path)?;
    let headers = config.umbrella_headers();

    match output {
        Some(path) => {
            write_umbrella(&path, headers.iter().copied())?;
            log::info!("wrote umbrella header {} ({} headers)", path.display(), headers.len());
        }
        None => print!("{}", synthesize_umbrella(headers)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn umbrella_lists_bindings_then_plugins() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("hydra.toml");
        std::fs::write(
            &config,
            r#"
            [frontend]
            plugins = ["pybind11/stl.h"]

            [[bindings]]
            name = "h2::Song"
            header = "core/Song.h"
            "#,
        )
        .unwrap();
        let output = dir.path().join("module.hpp");

        handle_umbrella(Some(config), Some(output.clone())).unwrap();
        assert_eq!(
            std::fs::read_to_string(output).unwrap(),
            "#include <core/Song.h>\n#include <pybind11/stl.h>\n"
        );
    }
}
