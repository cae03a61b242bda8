#![allow(dead_code)]

use std::path::{Path, PathBuf};

use oxide_dump::connection::Connection;

/// A connection that records every statement and rejects configured ones.
#[derive(Debug, Default)]
pub struct RecordingConnection {
    pub executed: Vec<String>,
    pub reject: Vec<String>,
    pub database: Option<String>,
}

impl RecordingConnection {
    pub fn rejecting(statements: &[&str]) -> Self {
        Self {
            reject: statements.iter().map(ToString::to_string).collect(),
            ..Self::default()
        }
    }
}

impl Connection for RecordingConnection {
    async fn execute(&mut self, sql: &str) -> Result<(), sqlx::Error> {
        self.executed.push(sql.to_string());
        if self.reject.iter().any(|r| r == sql) {
            return Err(sqlx::Error::Protocol(format!("rejected: {sql}")));
        }
        Ok(())
    }

    async fn change_database(&mut self, name: &str) -> Result<(), sqlx::Error> {
        self.database = Some(name.to_string());
        Ok(())
    }

    async fn close(self, _graceful: bool) -> Result<(), sqlx::Error> {
        Ok(())
    }
}

/// Writes `contents` to `dir/name` and returns the path.
pub fn write_dump(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}
