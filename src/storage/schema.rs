//! Database schema definitions and migration logic.

use rusqlite::{Connection, Result};

pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// The complete SQL schema for the comment database.
pub const SCHEMA_SQL: &str = r"
    -- Comments table
    -- A comment is unique per site; the same id may exist on two sites.
    CREATE TABLE IF NOT EXISTS comments (
        site_id TEXT NOT NULL CHECK(length(site_id) > 0),
        id TEXT NOT NULL CHECK(length(id) > 0),
        url TEXT NOT NULL DEFAULT '',
        user_id TEXT NOT NULL DEFAULT '',
        user_name TEXT NOT NULL DEFAULT '',
        text TEXT NOT NULL DEFAULT '',
        parent_id TEXT NOT NULL DEFAULT '',
        imported INTEGER NOT NULL DEFAULT 0,
        created_at DATETIME NOT NULL,
        PRIMARY KEY (site_id, id)
    );

    -- Read-back patterns (per page counts, newest first)
    CREATE INDEX IF NOT EXISTS idx_comments_locator ON comments(site_id, url);
    CREATE INDEX IF NOT EXISTS idx_comments_created_at ON comments(site_id, created_at);

    -- Key/value metadata (last import bookkeeping)
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
";

/// Apply the schema to the database.
///
/// Safe to call on an already initialized database.
///
/// # Errors
///
/// Returns an error if the SQL execution fails or pragmas cannot be set.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // WAL lets readers run alongside the single import writer
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "temp_store", "MEMORY")?;
    conn.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION)?;

    Ok(())
}
