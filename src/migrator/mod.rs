//! Importers for third-party comment exports.
//!
//! Every importer follows the same flow:
//! 1. Wipe the target site in the [`Store`] (an import replaces, never merges)
//! 2. Decode the export on a producer thread, sending normalized comments
//!    through a rendezvous channel
//! 3. Drain the channel on the calling thread with [`save_comments`],
//!    creating one comment at a time
//!
//! Channel closure is the only completion signal. A document that cannot be
//! decoded is logged and yields zero comments; it is not reported as an
//! error, so callers see it only as "0 imported".

pub mod cusdis;
pub mod time;

pub use cusdis::Cusdis;
pub use time::{ExportTime, TIME_LAYOUTS, parse_export_time};

use crate::error::{Error, Result};
use crate::model::Comment;
use crate::storage::Store;
use std::fmt;
use std::io::Read;
use std::str::FromStr;

/// An importer for one export format.
pub trait Importer {
    /// Replace all comments of `site_id` with the contents of `reader`.
    ///
    /// Returns the number of comments saved.
    ///
    /// # Errors
    ///
    /// Returns the store's error verbatim if the site cannot be wiped,
    /// [`Error::SaveFailed`] when only some comments were saved, and
    /// [`Error::ImportFailed`] when comments were offered but none saved.
    fn import<R: Read + Send>(&mut self, reader: R, site_id: &str) -> Result<usize>;
}

/// Export formats with a bundled importer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImporterKind {
    Cusdis,
}

impl ImporterKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cusdis => "cusdis",
        }
    }
}

impl fmt::Display for ImporterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImporterKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "cusdis" => Ok(Self::Cusdis),
            other => Err(Error::UnknownImporter(other.to_string())),
        }
    }
}

/// Run the importer for `kind` against `store`.
///
/// # Errors
///
/// See [`Importer::import`].
pub fn import_with<S, R>(kind: ImporterKind, store: &mut S, reader: R, site_id: &str) -> Result<usize>
where
    S: Store,
    R: Read + Send,
{
    match kind {
        ImporterKind::Cusdis => Cusdis::new(store).import(reader, site_id),
    }
}

/// Persist a stream of comments, tallying successes and failures.
///
/// A failed create is counted and skipped; it never stops the stream and is
/// never retried.
///
/// # Errors
///
/// Returns [`Error::SaveFailed`] if some comments failed and some were saved,
/// [`Error::ImportFailed`] if every offered comment failed.
pub fn save_comments<S, I>(store: &mut S, site_id: &str, comments: I) -> Result<usize>
where
    S: Store + ?Sized,
    I: IntoIterator<Item = Comment>,
{
    let mut passed = 0;
    let mut failed = 0;

    for comment in comments {
        match store.create(&comment) {
            Ok(_) => passed += 1,
            Err(err) => {
                tracing::debug!(id = %comment.id, error = %err, "Failed to save comment");
                failed += 1;
            }
        }
    }

    tracing::debug!("imported {} comments to site {}", passed, site_id);

    if let Err(err) = store.record_import(site_id, passed) {
        tracing::warn!(site_id, error = %err, "Failed to record import");
    }

    match (failed, passed) {
        (0, _) => Ok(passed),
        (_, 0) => Err(Error::ImportFailed { failed }),
        _ => Err(Error::SaveFailed {
            failed,
            imported: passed,
        }),
    }
}
