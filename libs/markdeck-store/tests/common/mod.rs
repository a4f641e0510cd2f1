//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for a library backed by a SQLite file in a temp directory
//! - Helper functions for creating test data

#![allow(dead_code)]

pub mod fixtures;

use std::path::PathBuf;
use std::sync::Arc;

use markdeck_store::{DeckLibrary, SqliteStore};
use tempfile::TempDir;

/// Test context owning a temporary directory with a SQLite database.
pub struct TestContext {
    dir: TempDir,
    db_path: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = dir.path().join("markdeck.db");
        Self { dir, db_path }
    }

    /// Open the database, as a fresh process would.
    pub fn open_store(&self) -> Arc<SqliteStore> {
        Arc::new(SqliteStore::open(&self.db_path).expect("Failed to open database"))
    }

    /// Load the library from the database.
    pub fn open_library(&self) -> DeckLibrary<SqliteStore> {
        DeckLibrary::load(self.open_store()).expect("Failed to load library")
    }

    /// Write a markdown file into the temp directory.
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }
}
