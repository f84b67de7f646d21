//! Importer for Cusdis JSON exports.
//!
//! A Cusdis export is a single JSON array of comment records. The whole
//! array is decoded up front; records are then filtered and converted in
//! document order:
//!
//! - soft-deleted records (`deletedAt` set) are dropped
//! - unapproved records are dropped
//! - every other record becomes a [`Comment`] attributed to a synthesized
//!   user whose id is derived from the record id

use crate::error::{Error, Result};
use crate::migrator::time::ExportTime;
use crate::migrator::{Importer, save_comments};
use crate::model::{Comment, Locator, User};
use crate::storage::Store;
use crate::util::encode_id;
use serde::{Deserialize, Deserializer};
use std::io::{BufReader, Read};
use std::sync::mpsc::{self, SyncSender};
use std::thread;

/// Namespace prefix of synthesized user ids.
pub const USER_ID_PREFIX: &str = "cusdis_";

/// One record of a Cusdis export.
#[derive(Debug, Clone, Deserialize)]
struct CusdisRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    id: String,
    #[serde(rename = "pageId", default, deserialize_with = "null_as_default")]
    page_id: String,
    /// Required. A record without it, or with `null`, fails the whole
    /// document the same way an unparsable timestamp does; no placeholder
    /// instant is invented.
    created_at: ExportTime,
    #[allow(dead_code)]
    #[serde(default)]
    updated_at: Option<ExportTime>,
    #[serde(rename = "deletedAt", default)]
    deleted_at: Option<ExportTime>,
    #[allow(dead_code)]
    #[serde(rename = "moderatorId", default)]
    moderator_id: Option<String>,
    #[allow(dead_code)]
    #[serde(default)]
    by_email: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    by_nickname: String,
    #[serde(default, deserialize_with = "null_as_default")]
    content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    approved: bool,
    #[serde(rename = "parentId", default)]
    parent_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    url: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Pseudonymous author for a Cusdis record.
///
/// Cusdis exports carry no stable author key, so the id is derived from the
/// record id alone: equal record ids always give byte-identical users.
#[must_use]
pub fn synthesize_user(record_id: &str, nickname: &str) -> User {
    User {
        name: nickname.to_string(),
        id: format!("{USER_ID_PREFIX}{}", encode_id(record_id)),
    }
}

/// Apply the admission rules to one record.
fn admit(record: CusdisRecord, site_id: &str) -> Option<Comment> {
    let user = synthesize_user(&record.id, &record.by_nickname);

    if record.deleted_at.is_some() {
        tracing::debug!(id = %record.id, page_id = %record.page_id, "Skipping deleted comment");
        return None;
    }
    if !record.approved {
        tracing::debug!(id = %record.id, page_id = %record.page_id, "Skipping unapproved comment");
        return None;
    }
    if record.id.is_empty() {
        tracing::warn!(page_id = %record.page_id, "Skipping comment without id");
        return None;
    }

    Some(Comment {
        id: record.id,
        locator: Locator {
            site_id: site_id.to_string(),
            url: record.url,
        },
        user,
        text: record.content,
        timestamp: record.created_at.into_inner(),
        parent_id: record.parent_id.unwrap_or_default(),
        imported: true,
    })
}

/// Decode the first JSON value of the stream as an export.
///
/// Anything after the first value is ignored.
fn decode_export<R: Read>(reader: R) -> Result<Vec<CusdisRecord>> {
    let mut values = serde_json::Deserializer::from_reader(BufReader::new(reader))
        .into_iter::<Vec<CusdisRecord>>();
    match values.next() {
        Some(records) => Ok(records?),
        None => Err(Error::Json(<serde_json::Error as serde::de::Error>::custom(
            "empty export document",
        ))),
    }
}

/// Decode an export and send every admitted comment to `sender`.
///
/// The sender is dropped on return, which closes the channel. A document
/// that fails to decode (bad JSON, wrong shape, unknown timestamp layout)
/// is logged and produces nothing. Returns the number of comments sent.
pub fn convert<R: Read>(reader: R, site_id: &str, sender: SyncSender<Comment>) -> usize {
    let records = match decode_export(reader) {
        Ok(records) => records,
        Err(err) => {
            tracing::warn!(error = %err, "can't decode cusdis export json");
            return 0;
        }
    };

    let total = records.len();
    let mut sent = 0;
    for record in records {
        let Some(comment) = admit(record, site_id) else {
            continue;
        };
        if sender.send(comment).is_err() {
            tracing::warn!(site_id, sent, "Comment receiver closed before export was drained");
            break;
        }
        sent += 1;
    }

    tracing::debug!(site_id, total, sent, "Converted cusdis export");
    sent
}

/// Imports Cusdis exports into a [`Store`].
#[derive(Debug)]
pub struct Cusdis<S> {
    store: S,
}

impl<S: Store> Cusdis<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

impl<S: Store> Importer for Cusdis<S> {
    fn import<R: Read + Send>(&mut self, reader: R, site_id: &str) -> Result<usize> {
        self.store.delete_all(site_id)?;

        let store = &mut self.store;
        thread::scope(|scope| {
            let (sender, receiver) = mpsc::sync_channel(0);
            let producer = scope.spawn(move || convert(reader, site_id, sender));

            let outcome = save_comments(store, site_id, receiver);

            producer
                .join()
                .map_err(|_| Error::Producer("cusdis decoder panicked".to_string()))?;
            outcome
        })
    }
}
