//! Per-file import outcomes.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of importing one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    /// The imported file.
    pub path: PathBuf,
    /// Statements sent to the connection.
    pub statements: usize,
    /// Statements that were empty after trimming and not sent.
    pub skipped_empty: usize,
}

impl FileSummary {
    /// An empty summary for `path`.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            statements: 0,
            skipped_empty: 0,
        }
    }
}

/// What happened to a file of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// Every statement succeeded.
    Imported,
    /// The file could not be read or a statement failed.
    Failed,
    /// Not attempted because an earlier file failed.
    Skipped,
}

impl FileStatus {
    /// Short marker used in status listings.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Imported => "[X]",
            Self::Failed => "[!]",
            Self::Skipped => "[ ]",
        }
    }
}

/// The record kept for each file of a batch.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    /// The file.
    pub path: PathBuf,
    /// Final status.
    pub status: FileStatus,
    /// Statements executed, including failed ones.
    pub statements: usize,
    /// The first error, rendered.
    pub error: Option<String>,
    /// When the import of this file ended. `None` when skipped.
    pub finished_at: Option<DateTime<Utc>>,
}

impl FileOutcome {
    /// A successfully imported file.
    #[must_use]
    pub fn imported(summary: &FileSummary) -> Self {
        Self {
            path: summary.path.clone(),
            status: FileStatus::Imported,
            statements: summary.statements,
            error: None,
            finished_at: Some(Utc::now()),
        }
    }

    /// A file whose import failed.
    #[must_use]
    pub fn failed(summary: &FileSummary, error: &impl ToString) -> Self {
        Self {
            path: summary.path.clone(),
            status: FileStatus::Failed,
            statements: summary.statements,
            error: Some(error.to_string()),
            finished_at: Some(Utc::now()),
        }
    }

    /// A file that was never attempted.
    #[must_use]
    pub fn skipped(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            status: FileStatus::Skipped,
            statements: 0,
            error: None,
            finished_at: None,
        }
    }
}
