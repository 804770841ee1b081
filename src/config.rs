use crate::error::{MoveError, Result};
use crate::manifest::DEFAULT_MANIFEST_DIR;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub manifest_dir: Option<PathBuf>,
    #[serde(default)]
    pub source_root: Option<PathBuf>,
    #[serde(default)]
    pub destination_root: Option<PathBuf>,
    #[serde(default = "default_check_free_space")]
    pub check_free_space: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_check_free_space() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manifest_dir: None,
            source_root: None,
            destination_root: None,
            check_free_space: default_check_free_space(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// `config.json` in the per-user config directory.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "example", "InstallMover")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load the user's config, falling back to defaults on any failure.
    pub fn load() -> Self {
        Self::default_path()
            .and_then(|path| Self::load_from(&path).ok())
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|e| MoveError::io(path, e))?;
        serde_json::from_str(&data).map_err(|e| MoveError::Config(format!("{}: {e}", path.display())))
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()
            .ok_or_else(|| MoveError::Config("no home directory for config".to_string()))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| MoveError::io(dir, e))?;
        }
        let data = serde_json::to_string_pretty(self).map_err(|e| MoveError::Config(e.to_string()))?;
        fs::write(path, data).map_err(|e| MoveError::io(path, e))
    }

    /// The configured manifest directory, or the launcher's default one.
    pub fn effective_manifest_dir(&self) -> PathBuf {
        self.manifest_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST_DIR))
    }
}
