//! `SQLite` storage implementation.

use crate::error::{Error, Result};
use crate::model::{Comment, Locator, PostInfo, User};
use crate::storage::Store;
use crate::storage::schema::apply_schema;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row};
use std::path::Path;
use std::time::Duration;

const COMMENT_COLUMNS: &str =
    "site_id, id, url, user_id, user_name, text, parent_id, imported, created_at";

/// SQLite-based storage backend.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open a new connection to the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema application fails.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        apply_schema(&conn)?;
        tracing::info!(path = %path.display(), "Opened comment database");
        Ok(Self { conn })
    }

    /// Open a database, waiting up to `busy_timeout` for locks held by other writers.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema application fails.
    pub fn open_with_timeout(path: &Path, busy_timeout: Duration) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(busy_timeout)?;
        apply_schema(&conn)?;
        tracing::info!(
            path = %path.display(),
            ?busy_timeout,
            "Opened comment database"
        );
        Ok(Self { conn })
    }

    /// Open an in-memory database for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Fetch a single comment by site and id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_comment(&self, site_id: &str, id: &str) -> Result<Option<Comment>> {
        let sql = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE site_id = ? AND id = ?");
        let comment = self
            .conn
            .query_row(&sql, rusqlite::params![site_id, id], comment_from_row)
            .optional()?;
        Ok(comment)
    }

    /// Most recent comments of a site, newest first.
    ///
    /// A `limit` of 0 returns every comment.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn last(&self, site_id: &str, limit: usize) -> Result<Vec<Comment>> {
        let limit = if limit == 0 {
            -1
        } else {
            i64::try_from(limit).unwrap_or(i64::MAX)
        };
        let sql = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments
             WHERE site_id = ?
             ORDER BY created_at DESC, id DESC
             LIMIT ?"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let comments = stmt
            .query_map(rusqlite::params![site_id, limit], comment_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(comments)
    }

    /// Pages of a site that have comments, with per-page counts.
    ///
    /// Ordered by the time of the first comment on each page.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_posts(&self, site_id: &str) -> Result<Vec<PostInfo>> {
        let mut stmt = self.conn.prepare(
            "SELECT url, COUNT(*), MIN(created_at), MAX(created_at)
             FROM comments
             WHERE site_id = ?
             GROUP BY url
             ORDER BY MIN(created_at) ASC, url ASC",
        )?;
        let posts = stmt
            .query_map([site_id], |row| {
                Ok(PostInfo {
                    url: row.get(0)?,
                    count: count_column(row, 1)?,
                    first_time: datetime_column(row, 2)?,
                    last_time: datetime_column(row, 3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(posts)
    }

    /// Number of comments on one page.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count(&self, locator: &Locator) -> Result<usize> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM comments WHERE site_id = ? AND url = ?",
            rusqlite::params![locator.site_id, locator.url],
            |row| count_column(row, 0),
        )?;
        Ok(count)
    }

    /// Number of comments across all pages of a site.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_site(&self, site_id: &str) -> Result<usize> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM comments WHERE site_id = ?",
            [site_id],
            |row| count_column(row, 0),
        )?;
        Ok(count)
    }

    /// Get a metadata value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_metadata(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM metadata WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Set a metadata value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn set_metadata(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES (?, ?)",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }
}

impl Store for SqliteStorage {
    fn delete_all(&mut self, site_id: &str) -> Result<()> {
        let removed = self
            .conn
            .execute("DELETE FROM comments WHERE site_id = ?", [site_id])?;
        tracing::debug!(site_id, removed, "Deleted site comments");
        Ok(())
    }

    fn create(&mut self, comment: &Comment) -> Result<String> {
        if comment.id.is_empty() {
            return Err(Error::validation("id", "comment id cannot be empty"));
        }
        if comment.locator.site_id.is_empty() {
            return Err(Error::validation("site_id", "site id cannot be empty"));
        }

        self.conn.execute(
            "INSERT INTO comments (
                site_id, id, url, user_id, user_name, text, parent_id, imported, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            rusqlite::params![
                comment.locator.site_id,
                comment.id,
                comment.locator.url,
                comment.user.id,
                comment.user.name,
                comment.text,
                comment.parent_id,
                comment.imported,
                format_datetime(&comment.timestamp),
            ],
        )?;
        Ok(comment.id.clone())
    }

    fn record_import(&mut self, site_id: &str, imported: usize) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES (?, ?)",
            rusqlite::params![
                format!("last_import_time:{site_id}"),
                format_datetime(&Utc::now())
            ],
        )?;
        tx.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES (?, ?)",
            rusqlite::params![format!("last_import_count:{site_id}"), imported.to_string()],
        )?;
        tx.commit()?;
        Ok(())
    }
}

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn datetime_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn count_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<usize> {
    let count: i64 = row.get(idx)?;
    usize::try_from(count).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Integer, Box::new(e))
    })
}

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        locator: Locator {
            site_id: row.get(0)?,
            url: row.get(2)?,
        },
        id: row.get(1)?,
        user: User {
            id: row.get(3)?,
            name: row.get(4)?,
        },
        text: row.get(5)?,
        parent_id: row.get(6)?,
        imported: row.get(7)?,
        timestamp: datetime_column(row, 8)?,
    })
}
