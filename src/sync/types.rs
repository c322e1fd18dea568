//! Sync result types.
//!
//! A sync pass produces one [`FileOutcome`] per candidate file; the
//! [`SyncReport`] aggregates them for the caller.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// What happened to one file during a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum FileStatus {
    /// Content was sent to the wiki and accepted.
    Published,
    /// Content matches the last published digest; nothing was sent.
    Unchanged,
    /// The file could not be read or the wiki refused the edit.
    Failed(String),
}

/// Outcome of syncing a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: FileStatus,
}

impl FileOutcome {
    pub fn new(path: impl Into<PathBuf>, status: FileStatus) -> Self {
        Self {
            path: path.into(),
            status,
        }
    }

    /// Published and unchanged files both count as in sync.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        !matches!(self.status, FileStatus::Failed(_))
    }

    #[must_use]
    pub fn was_published(&self) -> bool {
        self.status == FileStatus::Published
    }
}

/// Aggregated outcomes of one sync pass, in enumeration order.
#[derive(Debug, Default, Clone, Serialize)]
pub struct SyncReport {
    pub files: Vec<FileOutcome>,
}

impl SyncReport {
    pub fn push(&mut self, outcome: FileOutcome) {
        self.files.push(outcome);
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.files.iter().filter(|f| f.succeeded()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// Number of files actually sent to the wiki.
    #[must_use]
    pub fn published(&self) -> usize {
        self.files.iter().filter(|f| f.was_published()).count()
    }

    #[must_use]
    pub fn unchanged(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.status == FileStatus::Unchanged)
            .count()
    }

    pub fn failed_paths(&self) -> impl Iterator<Item = &Path> {
        self.files
            .iter()
            .filter(|f| !f.succeeded())
            .map(|f| f.path.as_path())
    }

    /// Outcome for a given path, as a success flag.
    #[must_use]
    pub fn outcome(&self, path: &Path) -> Option<bool> {
        self.files
            .iter()
            .find(|f| f.path == path)
            .map(FileOutcome::succeeded)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }
}

/// Totals of a finished watch loop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WatchSummary {
    /// Number of completed sync passes.
    pub passes: u64,
    /// Number of publishes across all passes.
    pub published: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> SyncReport {
        SyncReport {
            files: vec![
                FileOutcome::new("a.mediawiki", FileStatus::Published),
                FileOutcome::new("b.mediawiki", FileStatus::Unchanged),
                FileOutcome::new("c.mediawiki", FileStatus::Failed("HTTP status 500".into())),
            ],
        }
    }

    #[test]
    fn test_report_tally() {
        let report = report();
        assert_eq!(report.total(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.published(), 1);
        assert_eq!(report.unchanged(), 1);
        assert!(!report.all_succeeded());
    }

    #[test]
    fn test_failed_paths() {
        let report = report();
        let failed: Vec<_> = report.failed_paths().collect();
        assert_eq!(failed, vec![Path::new("c.mediawiki")]);
        assert_eq!(report.outcome(Path::new("b.mediawiki")), Some(true));
        assert_eq!(report.outcome(Path::new("c.mediawiki")), Some(false));
        assert_eq!(report.outcome(Path::new("d.mediawiki")), None);
    }

    #[test]
    fn test_empty_report() {
        let report = SyncReport::default();
        assert!(report.is_empty());
        assert!(report.all_succeeded());
    }

    #[test]
    fn test_outcome_serializes_flat() {
        let outcome = FileOutcome::new("c.mediawiki", FileStatus::Failed("boom".into()));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["path"], "c.mediawiki");
        assert_eq!(json["status"], "failed");
        assert_eq!(json["reason"], "boom");
    }
}
