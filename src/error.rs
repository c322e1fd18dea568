//! Error types for wikisync.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=auth, 3=sync, 4=config, 5=io)
//! - Context-aware recovery hints
//! - Structured JSON output for `--json` consumers

use std::path::PathBuf;
use thiserror::Error;

use crate::wiki::AuthError;

/// Result type alias for wikisync operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Auth (exit 2)
    AuthFailed,

    // Sync (exit 3)
    SyncFailed,

    // Config (exit 4)
    ConfigError,

    // I/O (exit 5)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::AuthFailed => "AUTH_FAILED",
            Self::SyncFailed => "SYNC_FAILED",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code (1-5).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::AuthFailed => 2,
            Self::SyncFailed => 3,
            Self::ConfigError => 4,
            Self::IoError | Self::JsonError => 5,
        }
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that end a wikisync run.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("{failed} of {total} files failed to sync")]
    SyncFailed { failed: usize, total: usize },

    #[error("Failed to sync {}: {reason}", path.display())]
    FileSyncFailed { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Auth(_) => ErrorCode::AuthFailed,
            Self::SyncFailed { .. } | Self::FileSyncFailed { .. } => ErrorCode::SyncFailed,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Http(_) | Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::Auth(AuthError::LoginRejected(_)) => Some(
                "Check --username/--password (WIKISYNC_USERNAME / WIKISYNC_PASSWORD). \
                 Bot passwords use the form `User@BotName`."
                    .to_string(),
            ),
            Self::Auth(AuthError::Transport(_)) => Some(
                "Check that --url (WIKISYNC_URL) points at the wiki base URL, \
                 e.g. http://localhost:8080"
                    .to_string(),
            ),
            Self::Auth(AuthError::TokenUnavailable(_)) => Some(
                "The wiki did not hand out a token. Is the Action API enabled at <url>/api.php?"
                    .to_string(),
            ),
            Self::SyncFailed { .. } | Self::FileSyncFailed { .. } => {
                Some("Re-run to retry the failed files; unchanged files are skipped.".to_string())
            }
            Self::Config(msg) if msg.contains("interval") => {
                Some("Use a watch interval of at least 1 second.".to_string())
            }
            Self::Config(_) | Self::Http(_) | Self::Io(_) | Self::Json(_) | Self::Other(_) => {
                None
            }
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
