//! One move run: copy the install, remove the original, patch manifests.

use crate::copier;
use crate::error::{MoveError, Result};
use crate::manifest;
use crate::progress::CopyProgress;
use crate::space;
use std::ffi::OsString;
use std::path::{self, Component, Path, PathBuf};

/// An install to move, as entered by the user.
#[derive(Debug, Clone)]
pub struct MoveRequest {
    /// Install folder name, shared by both roots and the manifest marker.
    pub name: String,
    pub source_root: PathBuf,
    pub destination_root: PathBuf,
    pub manifest_dir: PathBuf,
}

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub check_free_space: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { check_free_space: true }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MoveReport {
    pub files_copied: u64,
    pub bytes_copied: u64,
    pub manifests: Vec<PathBuf>,
}

impl MoveRequest {
    /// Build a request from raw user input. `name` is kept verbatim.
    pub fn new(
        name: impl Into<String>,
        source_root: impl Into<PathBuf>,
        destination_root: impl Into<PathBuf>,
        manifest_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            source_root: source_root.into(),
            destination_root: destination_root.into(),
            manifest_dir: manifest_dir.into(),
        }
    }

    pub fn source_path(&self) -> Result<PathBuf> {
        install_path(&self.source_root, &self.name)
    }

    pub fn destination_path(&self) -> Result<PathBuf> {
        install_path(&self.destination_root, &self.name)
    }
}

/// `root` with a trailing separator, followed by `name` as one folder.
///
/// `name` must be a single plain path segment so the install always stays
/// under `root`.
fn install_path(root: &Path, name: &str) -> Result<PathBuf> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => {}
        _ => return Err(MoveError::InvalidName(name.to_string())),
    }

    let mut joined = OsString::from(root.as_os_str());
    let root_text = root.to_string_lossy();
    if !root_text.is_empty() && !root_text.ends_with(path::is_separator) {
        joined.push(path::MAIN_SEPARATOR_STR);
    }
    joined.push(name);
    Ok(PathBuf::from(joined))
}

/// Run the whole move. Progress is reset first and updated while copying.
///
/// The source is removed only once every file has been copied. Nothing is
/// rolled back on failure.
pub fn run(request: &MoveRequest, progress: &CopyProgress, options: &RunOptions) -> Result<MoveReport> {
    progress.reset();
    let source = request.source_path()?;
    let destination = request.destination_path()?;

    tracing::info!("Moving {} to {}", source.display(), destination.display());

    if !source.is_dir() {
        return Err(MoveError::SourceNotFound(source));
    }

    if options.check_free_space {
        let required = fs_extra::dir::get_size(&source)?;
        progress.set_total_bytes(required);
        space::ensure_space(&destination, required)?;
    }

    copier::copy_dir(&source, &destination, true, progress)?;
    let copied = progress.snapshot();
    tracing::info!(
        "Copied {} files ({} bytes) to {}",
        copied.files_copied,
        copied.bytes_copied,
        destination.display()
    );

    remove_source(&source)?;

    let manifests = manifest::patch_manifests(
        &request.source_root.to_string_lossy(),
        &request.destination_root.to_string_lossy(),
        &request.name,
        &request.manifest_dir,
    )?;

    Ok(MoveReport {
        files_copied: copied.files_copied,
        bytes_copied: copied.bytes_copied,
        manifests,
    })
}

fn remove_source(source: &Path) -> Result<()> {
    fs_extra::dir::remove(source)?;
    tracing::info!("Removed {}", source.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn request(root: &Path) -> MoveRequest {
        MoveRequest {
            name: "Game".to_string(),
            source_root: root.join("lib_a"),
            destination_root: root.join("lib_b"),
            manifest_dir: root.join("manifests"),
        }
    }

    #[test]
    fn test_paths_join_name() {
        let req = MoveRequest::new("Fortnite", "games", "other/", "");
        assert_eq!(req.source_path().unwrap(), Path::new("games").join("Fortnite"));
        assert_eq!(req.destination_path().unwrap(), Path::new("other").join("Fortnite"));
    }

    #[test]
    fn test_name_is_kept_verbatim() {
        let req = MoveRequest::new(" Fortnite ", "games", "other", "manifests");
        assert_eq!(req.name, " Fortnite ");
        assert_eq!(req.source_path().unwrap(), Path::new("games").join(" Fortnite "));
    }

    #[test]
    fn test_root_gets_separator_before_name() {
        let req = MoveRequest::new("Fortnite", "D:", "", "");
        let expected = format!("D:{}Fortnite", path::MAIN_SEPARATOR);
        assert_eq!(req.source_path().unwrap(), PathBuf::from(expected));
        assert_eq!(req.destination_path().unwrap(), PathBuf::from("Fortnite"));
    }

    #[test]
    fn test_name_must_be_one_folder() {
        let absolute = std::env::temp_dir().join("Precious");
        for name in [
            absolute.to_string_lossy().to_string(),
            format!("{}Fortnite", path::MAIN_SEPARATOR),
            format!("Epic{}Fortnite", path::MAIN_SEPARATOR),
            "..".to_string(),
            ".".to_string(),
            String::new(),
        ] {
            let req = MoveRequest::new(name.clone(), "games", "other", "");
            assert!(
                matches!(req.source_path(), Err(MoveError::InvalidName(_))),
                "{name:?} was accepted"
            );
        }
    }

    #[test]
    fn test_name_outside_root_is_rejected_before_copying() -> std::io::Result<()> {
        let temp_dir = TempDir::new()?;
        let outside = temp_dir.path().join("Precious");
        fs::create_dir_all(&outside)?;
        fs::write(outside.join("save.dat"), b"keep me")?;
        let mut req = request(temp_dir.path());
        req.name = outside.to_string_lossy().to_string();

        let err = run(&req, &CopyProgress::new(), &RunOptions::default()).unwrap_err();

        assert!(matches!(err, MoveError::InvalidName(_)));
        assert_eq!(fs::read(outside.join("save.dat"))?, b"keep me");
        assert!(!temp_dir.path().join("lib_b").exists());
        Ok(())
    }

    #[test]
    fn test_missing_source_touches_nothing() -> std::io::Result<()> {
        let temp_dir = TempDir::new()?;
        let req = request(temp_dir.path());
        let progress = CopyProgress::new();

        let err = run(&req, &progress, &RunOptions::default()).unwrap_err();
        assert!(matches!(err, MoveError::SourceNotFound(_)));
        assert!(!req.destination_path().unwrap().exists());
        Ok(())
    }

    #[test]
    fn test_failed_copy_keeps_source() -> std::io::Result<()> {
        let temp_dir = TempDir::new()?;
        let req = request(temp_dir.path());
        let src = req.source_path().unwrap();
        let dst = req.destination_path().unwrap();
        fs::create_dir_all(src.join("data"))?;
        fs::write(src.join("a.txt"), b"a")?;
        fs::write(src.join("data/z.txt"), b"z")?;
        fs::create_dir_all(dst.join("data"))?;
        fs::write(dst.join("data/z.txt"), b"old")?;
        fs::create_dir_all(&req.manifest_dir)?;

        let progress = CopyProgress::new();
        let err = run(&req, &progress, &RunOptions { check_free_space: false }).unwrap_err();

        assert!(matches!(err, MoveError::DestinationExists(_)));
        assert!(src.join("a.txt").is_file());
        assert!(src.join("data/z.txt").is_file());
        assert_eq!(fs::read(dst.join("data/z.txt"))?, b"old");
        Ok(())
    }

    #[test]
    fn test_progress_is_reset_between_runs() -> std::io::Result<()> {
        let temp_dir = TempDir::new()?;
        let req = request(temp_dir.path());
        let src = req.source_path().unwrap();
        fs::create_dir_all(&src)?;
        fs::write(src.join("one.bin"), b"12345")?;
        fs::create_dir_all(&req.manifest_dir)?;

        let progress = CopyProgress::new();
        progress.record_file(1_000);

        let report = run(&req, &progress, &RunOptions::default()).unwrap();
        assert_eq!(report.files_copied, 1);
        assert_eq!(report.bytes_copied, 5);
        assert_eq!(progress.snapshot().total_bytes, 5);
        assert!(report.manifests.is_empty());
        assert!(!src.exists());
        Ok(())
    }
}
