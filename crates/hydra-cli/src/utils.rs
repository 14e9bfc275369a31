use std::path::{Path, PathBuf};

use hydra_bind::CONFIG_FILE_NAME;

use crate::error::CliError;

/// Finds the directory holding `hydra.toml` by searching upwards from
/// `start_path`.
pub fn find_config_root(start_path: &Path) -> Result<PathBuf, CliError> {
    let mut current = if start_path.is_dir() {
        start_path.to_path_buf()
    } else {
        start_path.parent().map_or_else(|| start_path.to_path_buf(), Path::to_path_buf)
    };

    loop {
        if current.join(CONFIG_FILE_NAME).is_file() {
            return current.canonicalize().map_err(|source| CliError::Io {
                path: current.clone(),
                operation: format!("canonicalizing project root '{}'", current.display()),
                source,
            });
        }
        if !current.pop() {
            return Err(CliError::ConfigNotFound { searched_path: start_path.to_path_buf() });
        }
    }
}

/// The explicit config path, or `hydra.toml` in the nearest project root
/// above the current directory.
pub fn locate_config(explicit: Option<PathBuf>) -> Result<PathBuf, CliError> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    let current_dir = std::env::current_dir().map_err(|source| CliError::Io {
        path: PathBuf::from("."),
        operation: "getting current directory".to_string(),
        source,
    })?;
    Ok(find_config_root(&current_dir)?.join(CONFIG_FILE_NAME))
}
