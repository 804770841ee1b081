//! Background execution of a move run with periodic progress reporting.
//!
//! The worker thread runs the move; a reporter thread publishes the copy
//! counters every [`REPORT_INTERVAL`] until the worker signals completion
//! over a channel.

use crate::error::{MoveError, Result};
use crate::progress::{CopyProgress, ProgressSnapshot};
use crate::relocate::{self, MoveReport, MoveRequest, RunOptions};
use std::fmt;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub const REPORT_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Running,
    Progress(ProgressSnapshot),
    Completed,
    Failed(String),
}

impl Status {
    pub fn is_finished(&self) -> bool {
        matches!(self, Status::Completed | Status::Failed(_))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Idle => Ok(()),
            Status::Running => f.write_str("Running..."),
            Status::Progress(snapshot) => f.write_str(&snapshot.status_line()),
            Status::Completed => f.write_str("Completed!"),
            Status::Failed(message) => write!(f, "An error occurred: {message}"),
        }
    }
}

type Listener = Arc<dyn Fn(&Status) + Send + Sync>;

/// Status line shared between the worker, the reporter and the front-end.
#[derive(Clone, Default)]
pub struct SharedStatus {
    current: Arc<Mutex<Status>>,
    listener: Option<Listener>,
}

impl SharedStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also call `listener` on every status change.
    pub fn with_listener(listener: impl Fn(&Status) + Send + Sync + 'static) -> Self {
        Self {
            current: Arc::default(),
            listener: Some(Arc::new(listener)),
        }
    }

    pub fn set(&self, status: Status) {
        if let Some(listener) = &self.listener {
            listener(&status);
        }
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = status;
    }

    pub fn get(&self) -> Status {
        self.current.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

pub struct MoveHandle {
    worker: JoinHandle<Result<MoveReport>>,
}

impl MoveHandle {
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Block until the run is over.
    pub fn join(self) -> Result<MoveReport> {
        self.worker
            .join()
            .unwrap_or_else(|_| Err(MoveError::WorkerPanicked))
    }
}

/// Start a move on a background thread.
pub fn spawn_move(
    request: MoveRequest,
    options: RunOptions,
    progress: Arc<CopyProgress>,
    status: SharedStatus,
) -> MoveHandle {
    spawn_with_interval(request, options, progress, status, REPORT_INTERVAL)
}

fn spawn_with_interval(
    request: MoveRequest,
    options: RunOptions,
    progress: Arc<CopyProgress>,
    status: SharedStatus,
    interval: Duration,
) -> MoveHandle {
    let worker = thread::spawn(move || {
        progress.reset();
        status.set(Status::Running);

        let (done_tx, done_rx) = mpsc::channel::<()>();
        let reporter = spawn_reporter(progress.clone(), status.clone(), done_rx, interval);

        let result = relocate::run(&request, &progress, &options);

        drop(done_tx);
        if reporter.join().is_err() {
            tracing::warn!("Progress reporter panicked");
        }

        match &result {
            Ok(report) => {
                tracing::info!(
                    "Moved {} ({} files, {} manifest(s) updated)",
                    request.name,
                    report.files_copied,
                    report.manifests.len()
                );
                status.set(Status::Completed);
            }
            Err(e) => {
                tracing::error!("Moving {} failed: {}", request.name, e);
                status.set(Status::Failed(e.to_string()));
            }
        }
        result
    });

    MoveHandle { worker }
}

fn spawn_reporter(
    progress: Arc<CopyProgress>,
    status: SharedStatus,
    done: mpsc::Receiver<()>,
    interval: Duration,
) -> JoinHandle<()> {
    thread::spawn(move || loop {
        match done.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => status.set(Status::Progress(progress.snapshot())),
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    })
}
