//! Replay SQL dump files against a database.
//!
//! `oxide-dump` reads dump files (as written by `mysqldump` and similar
//! tools), splits them into statements with [`oxide_dump_core`] and executes
//! the statements one at a time, in source order.
//!
//! # Architecture
//!
//! - **Discovery** - Resolves root paths into an ordered list of `.sql` files
//! - **Source** - Reads a file as decoded text chunks
//! - **Importer** - Splits each file into statements and executes them,
//!   one file at a time, stopping the batch at the first failing file
//! - **Connection** - Executes statements (sqlx, or dry run)
//!
//! A failing file is not rolled back: statements that ran before the failure
//! stay applied.
//!
//! # Example
//!
//! ```rust,ignore
//! use oxide_dump::prelude::*;
//!
//! let files = discover_sql_files(&["dumps/"]).await?;
//! let connection = SqlxConnection::connect("mysql://root@localhost/shop").await?;
//!
//! let mut importer = Importer::new(connection).encoding(Encoding::Utf8);
//! importer.import_all(&files).await?;
//! println!("imported {} files", importer.imported().len());
//! importer.close(true).await?;
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Import every .sql file below dumps/
//! oxide-dump --database mysql://root@localhost/shop import dumps/
//!
//! # Print the statements instead of executing them
//! oxide-dump import --dry-run dumps/
//!
//! # Show which files would be imported
//! oxide-dump list dumps/
//! ```

pub mod connection;
pub mod discovery;
pub mod error;
pub mod importer;
pub mod report;
pub mod source;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::connection::{Connection, DryRunConnection, SqlxConnection};
    pub use crate::discovery::discover_sql_files;
    pub use crate::error::{ImportError, Result};
    pub use crate::importer::Importer;
    pub use crate::report::{FileOutcome, FileStatus, FileSummary};
    pub use crate::source::{ChunkSource, Encoding};
    pub use oxide_dump_core::{ChunkFeeder, StatementSplitter, split};
}
