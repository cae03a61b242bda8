//! Dump importer.
//!
//! This module replays dump files against a [`Connection`]: each file is
//! streamed through a [`ChunkFeeder`] and every statement the splitter emits
//! is executed before the next one is submitted. Files of a batch are
//! imported strictly one after another.

use std::path::{Path, PathBuf};

use oxide_dump_core::{ChunkFeeder, StatementSplitter};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, trace, warn};

use crate::connection::Connection;
use crate::error::{ImportError, Result};
use crate::report::{FileOutcome, FileSummary};
use crate::source::{ChunkSource, DEFAULT_CHUNK_SIZE, Encoding};

/// Imports dump files through an exclusively owned connection.
pub struct Importer<C: Connection> {
    connection: C,
    encoding: Encoding,
    chunk_size: usize,
    imported: Vec<PathBuf>,
    outcomes: Vec<FileOutcome>,
}

impl<C: Connection> Importer<C> {
    /// Creates a new importer.
    pub fn new(connection: C) -> Self {
        Self {
            connection,
            encoding: Encoding::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            imported: Vec::new(),
            outcomes: Vec::new(),
        }
    }

    /// Sets the text encoding of the dump files.
    #[must_use]
    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Sets how many bytes are read per chunk.
    #[must_use]
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Returns the connection.
    #[must_use]
    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// Returns the connection mutably.
    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.connection
    }

    /// Files of the last batch that were imported successfully, in order.
    #[must_use]
    pub fn imported(&self) -> &[PathBuf] {
        &self.imported
    }

    /// One record per file of the last batch.
    #[must_use]
    pub fn outcomes(&self) -> &[FileOutcome] {
        &self.outcomes
    }

    /// Switches the default database of the connection.
    pub async fn use_database(&mut self, name: &str) -> Result<()> {
        info!(database = %name, "Switching database");
        self.connection
            .change_database(name)
            .await
            .map_err(ImportError::Connection)
    }

    /// Imports a single file.
    ///
    /// A statement failure does not stop the file: the remaining statements
    /// are still executed and the first failure is returned afterwards.
    /// Statements already executed are not rolled back.
    pub async fn import_file(&mut self, path: impl AsRef<Path>) -> Result<FileSummary> {
        let mut summary = FileSummary::new(path.as_ref());
        self.run_file(path.as_ref(), &mut summary).await?;
        Ok(summary)
    }

    /// Imports `paths` in order.
    ///
    /// Once a file fails, the remaining files are recorded as skipped and the
    /// first error is returned.
    pub async fn import_all<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<()> {
        self.imported.clear();
        self.outcomes.clear();
        let mut first_error = None;

        for path in paths {
            let path = path.as_ref();
            if first_error.is_some() {
                debug!(path = %path.display(), "Skipping file after earlier failure");
                self.outcomes.push(FileOutcome::skipped(path));
                continue;
            }

            let mut summary = FileSummary::new(path);
            match self.run_file(path, &mut summary).await {
                Ok(()) => {
                    info!(
                        path = %path.display(),
                        statements = summary.statements,
                        "File imported successfully"
                    );
                    self.outcomes.push(FileOutcome::imported(&summary));
                    self.imported.push(path.to_path_buf());
                }
                Err(err) => {
                    error!(path = %path.display(), error = %err, "File import failed");
                    self.outcomes.push(FileOutcome::failed(&summary, &err));
                    first_error = Some(err);
                }
            }
        }

        info!(
            imported = self.imported.len(),
            total = paths.len(),
            "Batch finished"
        );

        first_error.map_or(Ok(()), Err)
    }

    /// Closes the connection.
    pub async fn close(self, graceful: bool) -> Result<()> {
        self.connection
            .close(graceful)
            .await
            .map_err(ImportError::Connection)
    }

    async fn run_file(&mut self, path: &Path, summary: &mut FileSummary) -> Result<()> {
        info!(path = %path.display(), encoding = %self.encoding, "Importing file");

        let mut source = ChunkSource::open(path, self.encoding, self.chunk_size).await?;

        let (statement_tx, mut statements) = mpsc::unbounded_channel();
        let mut splitter = StatementSplitter::new();
        splitter.on_statement(move |statement| {
            let _ = statement_tx.send(statement);
        });
        let mut feeder = ChunkFeeder::new(splitter);
        let mut first_error = None;

        while let Some(chunk) = source.next_chunk().await? {
            feeder.enqueue(chunk);
            self.execute_pending(path, &mut statements, summary, &mut first_error)
                .await;
        }

        let (drained_tx, drained) = oneshot::channel();
        feeder.on_drained(move || {
            let _ = drained_tx.send(());
        });
        let splitter = feeder.into_splitter();
        drained.await.map_err(|_| ImportError::Stream {
            path: path.to_path_buf(),
            source: std::io::Error::other("chunk queue was not drained"),
        })?;
        self.execute_pending(path, &mut statements, summary, &mut first_error)
            .await;

        let residual = splitter.residual().trim();
        if !residual.is_empty() {
            warn!(
                path = %path.display(),
                bytes = residual.len(),
                delimiter = %splitter.delimiter(),
                "Dropping unterminated input at end of file"
            );
        }

        first_error.map_or(Ok(()), Err)
    }

    async fn execute_pending(
        &mut self,
        path: &Path,
        statements: &mut mpsc::UnboundedReceiver<String>,
        summary: &mut FileSummary,
        first_error: &mut Option<ImportError>,
    ) {
        while let Ok(statement) = statements.try_recv() {
            if statement.is_empty() {
                summary.skipped_empty += 1;
                continue;
            }

            debug!(bytes = statement.len(), "Executing statement");
            trace!(sql = %statement, "Executing SQL");
            summary.statements += 1;

            if let Err(source) = self.connection.execute(&statement).await {
                let err = ImportError::statement(path, &statement, source);
                if first_error.is_none() {
                    *first_error = Some(err);
                } else {
                    warn!(path = %path.display(), error = %err, "Further statement failed");
                }
            }
        }
    }
}
