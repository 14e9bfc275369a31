pub mod check;
pub mod dump;
pub mod plan;
pub mod umbrella;

use std::path::Path;

use miette::Diagnostic;

use crate::error::CliError;

/// Prints every diagnostic as a miette report on stderr.
pub fn report_diagnostics<D>(diagnostics: impl IntoIterator<Item = D>)
where
    D: Diagnostic + Send + Sync + 'static,
{
    for diagnostic in diagnostics {
        eprintln!("{:?}", miette::Report::new(diagnostic));
    }
}

/// Writes `text` to `output`, or to stdout when no output was given.
pub fn emit(text: &str, output: Option<&Path>) -> Result<(), CliError> {
    match output {
        Some(path) => std::fs::write(path, text).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            operation: format!("writing '{}'", path.display()),
            source,
        }),
        None => {
            print!("{text}");
            Ok(())
        }
    }
}
