//! Sync engine: discovery, change detection and publishing.
//!
//! The engine owns an authenticated [`WikiApi`] and the [`FingerprintStore`].
//! It can only be built through [`SyncEngine::connect`], so no edit is ever
//! attempted before login succeeded.
//!
//! Per-file problems never escape as errors: they become
//! [`FileStatus::Failed`] entries and the batch carries on.

use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::sync::hash::{FingerprintStore, content_digest};
use crate::sync::title::{CONTENT_EXTENSION, title_for_path};
use crate::sync::types::{FileOutcome, FileStatus, SyncReport};
use crate::wiki::{AuthError, Credentials, RemoteDocument, WikiApi};

/// Timestamp format used in edit summaries.
const SUMMARY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Pushes changed content files to a wiki.
pub struct SyncEngine<A> {
    api: A,
    store: FingerprintStore,
}

impl<A: WikiApi> SyncEngine<A> {
    /// Log in and return an engine ready to publish.
    ///
    /// # Errors
    ///
    /// Returns the [`AuthError`] of a failed login; no engine is built.
    pub async fn connect(mut api: A, credentials: &Credentials) -> Result<Self, AuthError> {
        api.login(credentials).await?;
        Ok(Self {
            api,
            store: FingerprintStore::new(),
        })
    }

    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    #[must_use]
    pub fn store(&self) -> &FingerprintStore {
        &self.store
    }

    /// Sync one file, publishing it only if it changed (or `force` is set).
    pub async fn sync_file(&mut self, path: &Path, force: bool) -> FileOutcome {
        let status = self.try_sync_file(path, force).await;
        match &status {
            FileStatus::Published => info!(path = %path.display(), "Published"),
            FileStatus::Unchanged => debug!(path = %path.display(), "Unchanged, skipped"),
            FileStatus::Failed(reason) => warn!(path = %path.display(), %reason, "Sync failed"),
        }
        FileOutcome::new(path, status)
    }

    async fn try_sync_file(&mut self, path: &Path, force: bool) -> FileStatus {
        if !path.is_file() {
            return FileStatus::Failed("file not found".to_string());
        }

        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) => return FileStatus::Failed(format!("read error: {e}")),
        };

        let digest = content_digest(&bytes);
        if !self.store.should_publish(path, &digest, force) {
            return FileStatus::Unchanged;
        }

        let text = match String::from_utf8(bytes) {
            Ok(t) => t,
            Err(e) => return FileStatus::Failed(format!("not valid UTF-8: {e}")),
        };

        let document = RemoteDocument {
            title: title_for_path(path),
            text,
            summary: edit_summary(path),
        };

        match self.api.publish(&document).await {
            Ok(()) => {
                self.store.record(path, digest);
                FileStatus::Published
            }
            Err(e) => FileStatus::Failed(e.to_string()),
        }
    }

    /// Sync every content file under `dir`.
    ///
    /// A missing directory or one without content files yields an empty
    /// report, not an error.
    pub async fn sync_directory(&mut self, dir: &Path, force: bool) -> SyncReport {
        let mut report = SyncReport::default();

        let files = discover(dir);
        if files.is_empty() {
            warn!(dir = %dir.display(), "No .{CONTENT_EXTENSION} files found");
            return report;
        }

        info!(dir = %dir.display(), count = files.len(), "Syncing content");
        for path in files {
            let outcome = self.sync_file(&path, force).await;
            report.push(outcome);
        }
        report
    }
}

/// Build the edit summary for a file: source name plus local timestamp.
fn edit_summary(path: &Path) -> String {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!(
        "Synced from {filename} at {}",
        Local::now().format(SUMMARY_TIME_FORMAT)
    )
}

/// Find all content files under `dir`, recursively, in sorted order.
///
/// Symlinks are followed, so a linked content file is synced like any
/// other. Unreadable entries, broken links and link loops are logged and
/// skipped.
#[must_use]
pub fn discover(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        warn!(dir = %dir.display(), "Content directory not found");
        return Vec::new();
    }

    WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == CONTENT_EXTENSION))
        .map(walkdir::DirEntry::into_path)
        .collect()
}
