//! The poll protocol every backend implements.

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Size value meaning "not known yet".
pub const UNKNOWN_SIZE: i64 = -1;

/// Outcome of one bounded unit of backend work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// More work remains; poll again.
    Pending,
    /// The operation finished successfully.
    Done,
}

/// Progress counters a backend updates while it works.
///
/// Counters only move forward: [`Progress::advance`] adds and
/// [`Progress::set_bytes`] ignores values below the current count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Progress {
    bytes_processed: i64,
    total_size: i64,
    current_file: Option<PathBuf>,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            bytes_processed: 0,
            total_size: UNKNOWN_SIZE,
            current_file: None,
        }
    }
}

impl Progress {
    pub fn bytes_processed(&self) -> i64 {
        self.bytes_processed
    }

    /// Total size in bytes, or [`UNKNOWN_SIZE`].
    pub fn total_size(&self) -> i64 {
        self.total_size
    }

    pub fn total_size_known(&self) -> Option<u64> {
        u64::try_from(self.total_size).ok()
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    pub fn advance(&mut self, bytes: u64) {
        let bytes = i64::try_from(bytes).unwrap_or(i64::MAX);
        self.bytes_processed = self.bytes_processed.saturating_add(bytes);
    }

    pub fn set_bytes(&mut self, bytes: u64) {
        let bytes = i64::try_from(bytes).unwrap_or(i64::MAX);
        self.bytes_processed = self.bytes_processed.max(bytes);
    }

    pub fn set_total(&mut self, total: Option<u64>) {
        self.total_size = total
            .and_then(|t| i64::try_from(t).ok())
            .unwrap_or(UNKNOWN_SIZE);
    }

    pub fn set_current_file(&mut self, path: impl Into<PathBuf>) {
        self.current_file = Some(path.into());
    }

    pub fn clear_current_file(&mut self) {
        self.current_file = None;
    }

    /// Percentage done, when the total is known.
    pub fn percentage(&self) -> Option<f64> {
        self.total_size_known().map(|total| {
            if total == 0 {
                100.0
            } else {
                (self.bytes_processed as f64 / total as f64) * 100.0
            }
        })
    }
}

/// One capability implemented against one native facility.
///
/// Construction plays the role of `start`: a backend value only exists once
/// its one-time setup succeeded, so a failed start never leaves state behind.
/// The [`Handle`](crate::Handle) owns the boxed backend and drops it as soon
/// as the operation reaches a terminal state.
pub trait Backend: Send {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Perform exactly one bounded increment of work.
    ///
    /// Implementations update `progress` before returning, including on the
    /// final step.
    fn poll(&mut self, progress: &mut Progress) -> Result<Step>;

    /// Teardown run on the cancellation path before the state is dropped.
    fn cancel(&mut self) {}

    /// Whether the backend already did all of its work during construction.
    ///
    /// Such backends cannot honour cancellation mid-transfer; cancelling only
    /// discards the result before it is committed.
    fn blocks_in_start(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_progress_has_unknown_total() {
        let progress = Progress::default();
        assert_eq!(progress.bytes_processed(), 0);
        assert_eq!(progress.total_size(), UNKNOWN_SIZE);
        assert_eq!(progress.total_size_known(), None);
        assert_eq!(progress.percentage(), None);
    }

    #[test]
    fn counters_never_move_backwards() {
        let mut progress = Progress::default();
        progress.advance(10);
        progress.set_bytes(4);
        assert_eq!(progress.bytes_processed(), 10);
        progress.set_bytes(25);
        assert_eq!(progress.bytes_processed(), 25);
    }

    #[test]
    fn percentage_of_known_total() {
        let mut progress = Progress::default();
        progress.set_total(Some(200));
        progress.advance(50);
        assert_eq!(progress.percentage(), Some(25.0));
    }

    #[test]
    fn empty_total_reports_full() {
        let mut progress = Progress::default();
        progress.set_total(Some(0));
        assert_eq!(progress.percentage(), Some(100.0));
    }
}
