//! Error types for dump imports.

use std::path::PathBuf;

/// Longest statement preview kept in an error message, in chars.
const STATEMENT_PREVIEW_CHARS: usize = 200;

/// Errors that can occur while importing dump files.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// A file or directory is missing or unreadable.
    #[error("Cannot access '{}': {source}", path.display())]
    FileAccess {
        /// The path that could not be accessed.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Reading a file failed after it was opened.
    #[error("Failed to read '{}': {source}", path.display())]
    Stream {
        /// The file being read.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// The database rejected a statement.
    #[error("Statement failed in '{}': {source}\n  {statement}", path.display())]
    Statement {
        /// The file the statement came from.
        path: PathBuf,
        /// A preview of the rejected statement.
        statement: String,
        /// The database error.
        source: sqlx::Error,
    },

    /// Connecting, switching database or disconnecting failed.
    #[error("Connection error: {0}")]
    Connection(#[source] sqlx::Error),

    /// The requested text encoding is not supported.
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),
}

impl ImportError {
    /// Builds a [`ImportError::Statement`] with a shortened statement text.
    pub fn statement(path: impl Into<PathBuf>, statement: &str, source: sqlx::Error) -> Self {
        Self::Statement {
            path: path.into(),
            statement: preview(statement),
            source,
        }
    }
}

fn preview(statement: &str) -> String {
    match statement.char_indices().nth(STATEMENT_PREVIEW_CHARS) {
        Some((end, _)) => format!("{}...", &statement[..end]),
        None => statement.to_string(),
    }
}

/// Result type for import operations.
pub type Result<T> = std::result::Result<T, ImportError>;
