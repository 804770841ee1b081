//! Recursive directory copy that refuses to overwrite.

use crate::error::{MoveError, Result};
use crate::progress::CopyProgress;
use fs_extra::error::ErrorKind;
use fs_extra::file::{self, CopyOptions};
use std::fs;
use std::path::{Path, PathBuf};

/// Copy `source` into `destination`, creating it if needed.
///
/// Files directly in `source` are copied first, then subdirectories when
/// `recurse` is set. The first file that already exists at the destination
/// aborts the whole copy; whatever was copied before it stays on disk.
pub fn copy_dir(
    source: &Path,
    destination: &Path,
    recurse: bool,
    progress: &CopyProgress,
) -> Result<()> {
    if !source.is_dir() {
        return Err(MoveError::SourceNotFound(source.to_path_buf()));
    }

    let (files, dirs) = list_entries(source)?;

    fs::create_dir_all(destination).map_err(|e| MoveError::io(destination, e))?;

    let options = CopyOptions::new();
    for path in files {
        let Some(file_name) = path.file_name() else { continue };
        let target = destination.join(file_name);
        if target.exists() {
            return Err(MoveError::DestinationExists(target));
        }
        let bytes = file::copy(&path, &target, &options).map_err(|e| match e.kind {
            ErrorKind::AlreadyExists => MoveError::DestinationExists(target.clone()),
            _ => MoveError::Copy(e),
        })?;
        progress.record_file(bytes);
        tracing::debug!("Copied {} ({} bytes)", path.display(), bytes);
    }

    if recurse {
        for dir in dirs {
            let Some(dir_name) = dir.file_name() else { continue };
            copy_dir(&dir, &destination.join(dir_name), recurse, progress)?;
        }
    }

    Ok(())
}

/// Files and subdirectories directly under `dir`, each sorted by name.
fn list_entries(dir: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let mut files = Vec::new();
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| MoveError::io(dir, e))? {
        let entry = entry.map_err(|e| MoveError::io(dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        } else {
            files.push(path);
        }
    }
    files.sort();
    dirs.sort();
    Ok((files, dirs))
}
