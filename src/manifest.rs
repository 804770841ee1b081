//! Launcher manifest patching.
//!
//! Manifests are flat text files that record an install as
//! `"InstallLocation": "<path>"`, with the path written as a JSON string
//! literal (every backslash doubled). Patching finds the manifests that point
//! at the old install and swaps the old escaped directory prefix for the new
//! one everywhere in those files.

use crate::error::{MoveError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Default manifest directory of the Epic Games Launcher.
pub const DEFAULT_MANIFEST_DIR: &str = r"C:\ProgramData\Epic\EpicGamesLauncher\Data\Manifests";

const ESCAPED_SEPARATOR: &str = r"\\";

/// Double every backslash and make sure the result ends with an escaped
/// separator.
pub fn escape_path(path: &str) -> String {
    let mut escaped = path.replace('\\', ESCAPED_SEPARATOR);
    if !escaped.ends_with(ESCAPED_SEPARATOR) {
        escaped.push_str(ESCAPED_SEPARATOR);
    }
    escaped
}

/// The literal text a manifest carries for an install named `name` under the
/// already escaped directory `escaped_dir`.
pub fn install_marker(escaped_dir: &str, name: &str) -> String {
    format!("\"InstallLocation\": \"{escaped_dir}{name}\"")
}

/// Files directly inside `dir` whose content contains `text`, ignoring case.
///
/// Blank `text` or `dir` yields no matches. A file that cannot be read as text
/// fails the whole scan.
pub fn find_files_containing(text: &str, dir: &Path) -> Result<Vec<PathBuf>> {
    if text.trim().is_empty() || dir.as_os_str().to_string_lossy().trim().is_empty() {
        return Ok(Vec::new());
    }

    let needle = text.to_lowercase();
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| MoveError::io(dir, e))? {
        let path = entry.map_err(|e| MoveError::io(dir, e))?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    let mut matches = Vec::new();
    for path in files {
        let content = fs::read_to_string(&path).map_err(|e| MoveError::io(&path, e))?;
        if content.to_lowercase().contains(&needle) {
            matches.push(path);
        }
    }
    Ok(matches)
}

/// Replace every occurrence of `from` with `to` in the file at `path`.
pub fn replace_in_file(path: &Path, from: &str, to: &str) -> Result<()> {
    let content = fs::read_to_string(path).map_err(|e| MoveError::io(path, e))?;
    fs::write(path, content.replace(from, to)).map_err(|e| MoveError::io(path, e))
}

/// Retarget every manifest in `manifest_dir` that records `name` as installed
/// under `old_root` so that it points under `new_root` instead.
///
/// Returns the manifests that were rewritten.
pub fn patch_manifests(
    old_root: &str,
    new_root: &str,
    name: &str,
    manifest_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let escaped_old = escape_path(old_root);
    let escaped_new = escape_path(new_root);
    let marker = install_marker(&escaped_old, name);

    let relevant = find_files_containing(&marker, manifest_dir)?;
    for file in &relevant {
        replace_in_file(file, &escaped_old, &escaped_new)?;
        tracing::debug!("Rewrote manifest {}", file.display());
    }
    tracing::info!(
        "{} manifest(s) in {} now point at {}",
        relevant.len(),
        manifest_dir.display(),
        new_root
    );
    Ok(relevant)
}
