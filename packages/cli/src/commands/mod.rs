pub mod edit;
pub mod inspect;
pub mod session;
pub mod tag;

pub use edit::{edit, EditArgs};
pub use inspect::{inspect, InspectArgs};
pub use session::{session, SessionArgs};
pub use tag::{tag, TagArgs};

use anyhow::{anyhow, Result};
use jsxed_editor::EditorError;
use jsxed_parser::format_error;
use std::path::{Path, PathBuf};

/// Resolve `path` against the working directory and read it
pub(crate) fn read_markup(path: &str, cwd: &str) -> Result<(PathBuf, String)> {
    let full = PathBuf::from(cwd).join(path);
    let source = std::fs::read_to_string(&full)
        .map_err(|e| anyhow!("Cannot read {}: {}", full.display(), e))?;
    Ok((full, source))
}

/// Render editor errors, with a source report for parse errors
pub(crate) fn report(err: EditorError, path: &Path, source: &str) -> anyhow::Error {
    match err {
        EditorError::Parse(parse) => {
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown");
            anyhow!("\n{}", format_error(source, file_name, &parse))
        }
        other => anyhow!(other),
    }
}
