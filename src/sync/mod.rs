//! One-way content sync to a wiki.
//!
//! - **Hashing**: SHA256 fingerprints decide which files changed
//! - **Titles**: file names map to page titles
//! - **Engine**: discovery and per-file publishing
//! - **Watch**: repeated passes until interrupted
//! - **Report**: per-pass outcome aggregation and display
//!
//! # Example
//!
//! ```ignore
//! use wikisync::sync::{SyncEngine, Shutdown, watch};
//! use wikisync::wiki::{Credentials, MediaWikiClient};
//!
//! let client = MediaWikiClient::new(&creds.endpoint)?;
//! let mut engine = SyncEngine::connect(client, &creds).await?;
//!
//! // One pass
//! let report = engine.sync_directory(dir, false).await;
//!
//! // Or keep going until Ctrl+C
//! let shutdown = Shutdown::new();
//! watch(&mut engine, dir, interval, &shutdown, |_, _| {}).await;
//! ```

mod engine;
mod hash;
mod report;
mod title;
mod types;
mod watch;

pub use engine::{SyncEngine, discover};
#[cfg(test)]
pub(crate) use engine::testing as engine_testing;
pub use hash::{ContentDigest, FingerprintStore, content_digest, has_changed};
pub use report::{print_pass, print_report};
pub use title::{CONTENT_EXTENSION, title_for, title_for_path};
pub use types::{FileOutcome, FileStatus, SyncReport, WatchSummary};
pub use watch::{Shutdown, watch};
