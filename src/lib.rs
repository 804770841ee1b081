//! Move an installed game to another library folder and retarget the
//! launcher manifests that point at it.

pub mod config;
pub mod copier;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod progress;
pub mod relocate;
pub mod space;
pub mod worker;

pub use config::Config;
pub use error::{MoveError, Result};
pub use progress::{CopyProgress, ProgressSnapshot};
pub use relocate::{MoveReport, MoveRequest, RunOptions};
pub use worker::{spawn_move, MoveHandle, SharedStatus, Status};
