//! Error types for a move run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MoveError {
    #[error("Source directory does not exist or could not be found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Install name must be a single folder name: {0:?}")]
    InvalidName(String),

    #[error("Destination file already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    #[error("Not enough free space on destination: {required} bytes required, {available} available")]
    InsufficientSpace { required: u64, available: u64 },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Copy failed: {0}")]
    Copy(#[from] fs_extra::error::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Move worker panicked")]
    WorkerPanicked,
}

impl MoveError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MoveError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, MoveError>;
