#![allow(dead_code)]

use remark_import::error::{Error, Result};
use remark_import::model::Comment;
use remark_import::storage::{SqliteStorage, Store};
use std::collections::HashSet;
use std::sync::Once;
use tempfile::TempDir;

pub mod fixtures;

static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        remark_import::logging::init_test_logging();
    });
}

pub fn test_db() -> SqliteStorage {
    init_test_logging();
    SqliteStorage::open_memory().expect("Failed to create test database")
}

pub fn test_db_with_dir() -> (SqliteStorage, TempDir) {
    init_test_logging();
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("remark.db");
    let storage = SqliteStorage::open(&db_path).expect("Failed to create test database");
    (storage, dir)
}

/// In-memory store that records every call and can be told to fail.
#[derive(Debug, Default)]
pub struct MockStore {
    pub fail_delete: bool,
    pub reject_ids: HashSet<String>,
    pub deleted_sites: Vec<String>,
    pub created: Vec<Comment>,
    pub create_calls: usize,
}

impl MockStore {
    pub fn rejecting(ids: &[&str]) -> Self {
        Self {
            reject_ids: ids.iter().map(|id| (*id).to_string()).collect(),
            ..Self::default()
        }
    }
}

impl Store for MockStore {
    fn delete_all(&mut self, site_id: &str) -> Result<()> {
        if self.fail_delete {
            return Err(Error::Config("backend unavailable".to_string()));
        }
        self.deleted_sites.push(site_id.to_string());
        Ok(())
    }

    fn create(&mut self, comment: &Comment) -> Result<String> {
        self.create_calls += 1;
        if self.reject_ids.contains(&comment.id) {
            return Err(Error::validation("id", "rejected by mock"));
        }
        self.created.push(comment.clone());
        Ok(comment.id.clone())
    }
}
