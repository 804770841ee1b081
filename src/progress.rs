use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared between the copy routine and whoever reports on it.
///
/// Readers may observe a slightly stale pair; the values are advisory.
#[derive(Debug, Default)]
pub struct CopyProgress {
    files_copied: AtomicU64,
    bytes_copied: AtomicU64,
    total_bytes: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub files_copied: u64,
    pub bytes_copied: u64,
    pub total_bytes: u64,
}

impl CopyProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&self) {
        self.files_copied.store(0, Ordering::Relaxed);
        self.bytes_copied.store(0, Ordering::Relaxed);
        self.total_bytes.store(0, Ordering::Relaxed);
    }

    pub fn record_file(&self, bytes: u64) {
        self.files_copied.fetch_add(1, Ordering::Relaxed);
        self.bytes_copied.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn set_total_bytes(&self, total: u64) {
        self.total_bytes.store(total, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            files_copied: self.files_copied.load(Ordering::Relaxed),
            bytes_copied: self.bytes_copied.load(Ordering::Relaxed),
            total_bytes: self.total_bytes.load(Ordering::Relaxed),
        }
    }
}

impl ProgressSnapshot {
    pub fn total_progress(&self) -> f32 {
        if self.total_bytes == 0 { 0.0 } else { self.bytes_copied as f32 / self.total_bytes as f32 }
    }

    /// `Files copied: {n} - {m}MB`, megabytes truncated.
    pub fn status_line(&self) -> String {
        format!(
            "Files copied: {} - {}MB",
            self.files_copied,
            self.bytes_copied / 1_000_000
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_reset() {
        let progress = CopyProgress::new();
        progress.record_file(10);
        progress.record_file(32);
        progress.set_total_bytes(100);

        let snap = progress.snapshot();
        assert_eq!(snap.files_copied, 2);
        assert_eq!(snap.bytes_copied, 42);
        assert!((snap.total_progress() - 0.42).abs() < 1e-6);

        progress.reset();
        assert_eq!(progress.snapshot(), ProgressSnapshot::default());
    }

    #[test]
    fn test_status_line_truncates_megabytes() {
        let snap = ProgressSnapshot {
            files_copied: 7,
            bytes_copied: 2_999_999,
            total_bytes: 0,
        };
        assert_eq!(snap.status_line(), "Files copied: 7 - 2MB");
        assert_eq!(snap.total_progress(), 0.0);
    }
}
