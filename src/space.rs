//! Free-space check for the destination disk.

use crate::error::{MoveError, Result};
use std::path::{Path, PathBuf};
use sysinfo::Disks;

/// Available bytes on the disk that would hold `path`, or `None` when no
/// mounted disk covers it.
pub fn available_space(path: &Path) -> Option<u64> {
    let target = existing_ancestor(path)?;
    let disks = Disks::new_with_refreshed_list();
    disks
        .list()
        .iter()
        .filter(|disk| target.starts_with(disk.mount_point()))
        .max_by_key(|disk| disk.mount_point().as_os_str().len())
        .map(|disk| disk.available_space())
}

/// Fail with `InsufficientSpace` if the disk under `destination` cannot take
/// `required` more bytes. Skipped when the disk cannot be identified.
pub fn ensure_space(destination: &Path, required: u64) -> Result<()> {
    match available_space(destination) {
        Some(available) if available < required => {
            Err(MoveError::InsufficientSpace { required, available })
        }
        Some(available) => {
            tracing::debug!(
                "{} bytes needed, {} available under {}",
                required,
                available,
                destination.display()
            );
            Ok(())
        }
        None => {
            tracing::debug!(
                "No disk found for {}, skipping free space check",
                destination.display()
            );
            Ok(())
        }
    }
}

/// Nearest existing ancestor of `path`, made absolute.
///
/// Kept in the same prefix form disks report their mount points in, so no
/// `\\?\` verbatim paths.
fn existing_ancestor(path: &Path) -> Option<PathBuf> {
    path.ancestors()
        .find(|p| !p.as_os_str().is_empty() && p.exists())
        .and_then(|p| std::path::absolute(p).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_existing_ancestor_walks_up() -> std::io::Result<()> {
        let temp_dir = TempDir::new()?;
        let missing = temp_dir.path().join("a/b/c");
        assert_eq!(existing_ancestor(&missing), Some(std::path::absolute(temp_dir.path())?));
        Ok(())
    }

    #[test]
    fn test_ancestor_is_not_verbatim() -> std::io::Result<()> {
        let temp_dir = TempDir::new()?;
        let ancestor = existing_ancestor(&temp_dir.path().join("x")).unwrap();
        assert!(ancestor.is_absolute());
        assert!(!ancestor.to_string_lossy().starts_with(r"\\?\"), "{}", ancestor.display());
        Ok(())
    }

    #[cfg(windows)]
    #[test]
    fn test_disk_found_for_temp_dir() -> std::io::Result<()> {
        let temp_dir = TempDir::new()?;
        assert!(available_space(&temp_dir.path().join("new")).is_some());
        Ok(())
    }

    #[test]
    fn test_zero_bytes_always_fits() -> std::io::Result<()> {
        let temp_dir = TempDir::new()?;
        assert!(ensure_space(&temp_dir.path().join("new"), 0).is_ok());
        Ok(())
    }

    #[test]
    fn test_impossible_requirement_fails_when_disk_is_known() -> std::io::Result<()> {
        let temp_dir = TempDir::new()?;
        if available_space(temp_dir.path()).is_none() {
            return Ok(());
        }
        let err = ensure_space(temp_dir.path(), u64::MAX).unwrap_err();
        assert!(matches!(err, MoveError::InsufficientSpace { required: u64::MAX, .. }));
        Ok(())
    }
}
