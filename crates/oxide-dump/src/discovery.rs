//! Discovery of `.sql` files under one or more root paths.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ImportError, Result};

/// File extension of dump files, matched case-insensitively.
pub const SQL_EXTENSION: &str = "sql";

/// Resolves `roots` into an ordered list of absolute `.sql` file paths.
///
/// Roots are visited in the given order. Directories are walked depth-first
/// with an explicit stack, their entries in file-name order. Symlinks are
/// followed; entries that are neither files nor directories are skipped.
pub async fn discover_sql_files<P: AsRef<Path>>(roots: &[P]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for root in roots {
        let root = absolute(root.as_ref()).await?;
        let mut stack = vec![root];

        while let Some(path) = stack.pop() {
            let metadata = tokio::fs::metadata(&path)
                .await
                .map_err(|source| access_error(&path, source))?;

            if metadata.is_dir() {
                let mut children = read_dir_sorted(&path).await?;
                // Reversed so the first entry is popped first.
                children.reverse();
                stack.extend(children);
            } else if metadata.is_file() {
                if is_sql_file(&path) {
                    debug!(path = %path.display(), "Discovered dump file");
                    files.push(path);
                }
            } else {
                debug!(path = %path.display(), "Skipping special file");
            }
        }
    }

    Ok(files)
}

/// Returns whether `path` has a `.sql` extension, ignoring case.
#[must_use]
pub fn is_sql_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(SQL_EXTENSION))
}

async fn read_dir_sorted(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|source| access_error(dir, source))?;

    let mut children = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|source| access_error(dir, source))?
    {
        children.push(entry.path());
    }
    children.sort();
    Ok(children)
}

async fn absolute(path: &Path) -> Result<PathBuf> {
    tokio::fs::canonicalize(path)
        .await
        .map_err(|source| access_error(path, source))
}

fn access_error(path: &Path, source: std::io::Error) -> ImportError {
    ImportError::FileAccess {
        path: path.to_path_buf(),
        source,
    }
}
