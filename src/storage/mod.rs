//! `SQLite` storage layer for `remark_import`.
//!
//! Importers talk to storage only through the [`Store`] trait, so any
//! backend offering "wipe a site" and "insert one comment" can receive an
//! import. [`SqliteStorage`] is the bundled implementation.
//!
//! # Submodules
//!
//! - [`schema`] - Database schema definitions
//! - [`sqlite`] - Main `SQLite` storage implementation

pub mod schema;
pub mod sqlite;

pub use sqlite::SqliteStorage;

use crate::error::Result;
use crate::model::Comment;

/// Write operations an importer needs from a comment backend.
pub trait Store {
    /// Remove every comment belonging to `site_id`.
    ///
    /// Must succeed when the site has no comments, so repeated calls are safe.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot perform the deletion.
    fn delete_all(&mut self, site_id: &str) -> Result<()>;

    /// Persist one comment, returning the id it was stored under.
    ///
    /// # Errors
    ///
    /// Returns an error if the comment is rejected (constraint violation,
    /// validation failure) or the backend is unreachable.
    fn create(&mut self, comment: &Comment) -> Result<String>;

    /// Bookkeeping hook called once an import run has drained.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot record the run.
    fn record_import(&mut self, _site_id: &str, _imported: usize) -> Result<()> {
        Ok(())
    }
}

impl<S: Store + ?Sized> Store for &mut S {
    fn delete_all(&mut self, site_id: &str) -> Result<()> {
        (**self).delete_all(site_id)
    }

    fn create(&mut self, comment: &Comment) -> Result<String> {
        (**self).create(comment)
    }

    fn record_import(&mut self, site_id: &str, imported: usize) -> Result<()> {
        (**self).record_import(site_id, imported)
    }
}
