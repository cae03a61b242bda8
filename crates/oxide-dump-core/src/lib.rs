//! # oxide-dump-core
//!
//! Streaming statement splitting for SQL dump files.
//!
//! This crate provides:
//! - A character-level [`StatementSplitter`] that respects string literals,
//!   backslash escapes and `DELIMITER` directives
//! - A [`ChunkFeeder`] that drives arbitrarily chunked input through a
//!   splitter in arrival order
//!
//! It does not parse SQL. It only decides where one statement ends and the
//! next one begins.
//!
//! ## Splitting a dump
//!
//! ```rust
//! use oxide_dump_core::split;
//!
//! let dump = "DELIMITER //\nCREATE TRIGGER t BEFORE INSERT ON x FOR EACH ROW SET @a = 1//\nDELIMITER ;\nSELECT 'a;b';\n";
//! assert_eq!(
//!     split(dump),
//!     [
//!         "CREATE TRIGGER t BEFORE INSERT ON x FOR EACH ROW SET @a = 1",
//!         "SELECT 'a;b'",
//!     ]
//! );
//! ```
//!
//! ## Feeding chunks
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use oxide_dump_core::{ChunkFeeder, StatementSplitter};
//!
//! let statements = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&statements);
//!
//! let mut splitter = StatementSplitter::new();
//! splitter.on_statement(move |s| sink.lock().unwrap().push(s));
//!
//! let mut feeder = ChunkFeeder::new(splitter);
//! feeder.enqueue("INSERT INTO t VALUES ('a");
//! feeder.enqueue(";b'); SELECT 1;");
//!
//! assert_eq!(*statements.lock().unwrap(), ["INSERT INTO t VALUES ('a;b')", "SELECT 1"]);
//! ```

pub mod feeder;
pub mod splitter;

pub use feeder::ChunkFeeder;
pub use splitter::{DEFAULT_DELIMITER, ParserState, Quote, StatementSplitter, split};
