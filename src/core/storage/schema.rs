//! Database schema and migrations.

use rusqlite::Connection;

use crate::core::error::Result;

/// Current schema version, stored in `PRAGMA user_version`
pub const SCHEMA_VERSION: i64 = 1;

const SCHEMA_V1: &str = "
CREATE TABLE IF NOT EXISTS files (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    fileName TEXT NOT NULL,
    fullPath TEXT NOT NULL UNIQUE,
    fileFormat TEXT NOT NULL DEFAULT '',
    fileSize INTEGER NOT NULL DEFAULT 0,
    isTextFile INTEGER NOT NULL DEFAULT 0,
    content TEXT NOT NULL DEFAULT '',
    contentHash TEXT NOT NULL,
    indexedAt TEXT NOT NULL,
    createdAt TEXT NOT NULL,
    modifiedAt TEXT NOT NULL,
    updateIdent INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_files_hash ON files(contentHash);
CREATE INDEX IF NOT EXISTS idx_files_format ON files(fileFormat);

CREATE TABLE IF NOT EXISTS file_vectors (
    id INTEGER PRIMARY KEY,
    dimensions INTEGER NOT NULL,
    embedding BLOB NOT NULL
);

CREATE TABLE IF NOT EXISTS audit (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    auditKey TEXT NOT NULL UNIQUE,
    auditValue TEXT NOT NULL,
    updateIdent INTEGER NOT NULL DEFAULT 0
);

CREATE VIRTUAL TABLE IF NOT EXISTS files_fts USING fts5(
    content,
    content='files',
    content_rowid='id'
);

CREATE TRIGGER IF NOT EXISTS files_ai AFTER INSERT ON files
WHEN new.isTextFile = 1
BEGIN
    INSERT INTO files_fts(rowid, content) VALUES (new.id, new.content);
END;

CREATE TRIGGER IF NOT EXISTS files_ad AFTER DELETE ON files
WHEN old.isTextFile = 1
BEGIN
    INSERT INTO files_fts(files_fts, rowid, content) VALUES ('delete', old.id, old.content);
END;

CREATE TRIGGER IF NOT EXISTS files_au AFTER UPDATE ON files
BEGIN
    INSERT INTO files_fts(files_fts, rowid, content)
        SELECT 'delete', old.id, old.content WHERE old.isTextFile = 1;
    INSERT INTO files_fts(rowid, content)
        SELECT new.id, new.content WHERE new.isTextFile = 1;
END;
";

/// Apply connection pragmas and create the schema
///
/// Idempotent; safe to run on every open.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    // journal_mode returns a row, so it cannot go through execute_batch
    let _mode: String = conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;
    conn.execute_batch(SCHEMA_V1)?;
    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    Ok(())
}

/// Read the stored schema version
pub fn schema_version(conn: &Connection) -> Result<i64> {
    let version = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    Ok(version)
}
