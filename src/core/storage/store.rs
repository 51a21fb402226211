//! SQLite-backed store for file records, vectors, and the audit
//! ledger.
//!
//! A single connection sits behind a mutex. Every write method holds
//! the lock for its whole statement or transaction, so a batch
//! commit is never interleaved with another write.

use rusqlite::{params, Connection, OptionalExtension, Row};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crate::core::error::{FiledexError, Result};
use crate::core::storage::schema::run_migrations;
use crate::core::storage::vectors::{from_bytes, l2_distance, to_bytes};
use crate::core::types::{AuditEntry, CommittedRow, FileRecord, Neighbor, PendingRecord};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const UPSERT_FILE: &str = "
INSERT INTO files (
    fileName, fullPath, fileFormat, fileSize, isTextFile,
    content, contentHash, indexedAt, createdAt, modifiedAt
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
ON CONFLICT(fullPath) DO UPDATE SET
    updateIdent = updateIdent + 1,
    indexedAt = excluded.indexedAt,
    fileName = excluded.fileName,
    fileFormat = excluded.fileFormat,
    fileSize = excluded.fileSize,
    isTextFile = excluded.isTextFile,
    content = excluded.content,
    contentHash = excluded.contentHash,
    modifiedAt = excluded.modifiedAt
RETURNING id, updateIdent";

const FILE_COLUMNS: &str = "id, fileName, fullPath, fileFormat, fileSize, isTextFile, \
     content, contentHash, indexedAt, createdAt, modifiedAt, updateIdent";

/// Handle to the index database
pub struct Store {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl Store {
    /// Open (or create) the database file and apply migrations
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        run_migrations(&conn)?;

        tracing::debug!("Opened store at {:?}", path);
        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// Database file location, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| FiledexError::Storage("connection lock poisoned".to_string()))
    }

    /// Upsert a batch of records in one transaction
    ///
    /// Rows are written in slice order. Any error rolls the whole
    /// batch back and nothing is returned.
    pub fn commit_batch(&self, records: &[PendingRecord]) -> Result<Vec<CommittedRow>> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut committed = Vec::with_capacity(records.len());

        {
            let mut stmt = tx.prepare_cached(UPSERT_FILE)?;
            for record in records {
                let (id, update_ident): (i64, i64) = stmt.query_row(
                    params![
                        record.file_name,
                        record.full_path,
                        record.file_format,
                        record.file_size as i64,
                        record.is_text_file,
                        record.content,
                        record.content_hash,
                        record.indexed_at,
                        record.created_at,
                        record.modified_at,
                    ],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )?;

                committed.push(CommittedRow {
                    id,
                    full_path: record.full_path.clone(),
                    update_ident,
                    inserted: update_ident == 0,
                });
            }
        }

        tx.commit()?;
        Ok(committed)
    }

    /// Fetch a file record by id
    pub fn get_file(&self, id: i64) -> Result<Option<FileRecord>> {
        let conn = self.lock()?;
        let sql = format!("SELECT {FILE_COLUMNS} FROM files WHERE id = ?1");
        let record = conn.query_row(&sql, params![id], map_file).optional()?;
        Ok(record)
    }

    /// Fetch a file record by its full path
    pub fn get_file_by_path(&self, full_path: &str) -> Result<Option<FileRecord>> {
        let conn = self.lock()?;
        let sql = format!("SELECT {FILE_COLUMNS} FROM files WHERE fullPath = ?1");
        let record = conn
            .query_row(&sql, params![full_path], map_file)
            .optional()?;
        Ok(record)
    }

    /// Number of file records
    pub fn count_files(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM files", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Whether a vector exists for the given file id
    pub fn has_vector(&self, id: i64) -> Result<bool> {
        let conn = self.lock()?;
        let exists = conn
            .query_row(
                "SELECT 1 FROM file_vectors WHERE id = ?1",
                params![id],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        Ok(exists)
    }

    /// Store a vector unless one already exists for the id
    ///
    /// Returns true if a row was written.
    pub fn put_vector(&self, id: i64, vector: &[f32]) -> Result<bool> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "INSERT OR IGNORE INTO file_vectors (id, dimensions, embedding) VALUES (?1, ?2, ?3)",
            params![id, vector.len() as i64, to_bytes(vector)],
        )?;
        Ok(changed > 0)
    }

    /// Fetch the vector for a file id
    pub fn get_vector(&self, id: i64) -> Result<Option<Vec<f32>>> {
        let conn = self.lock()?;
        let blob: Option<Vec<u8>> = conn
            .query_row(
                "SELECT embedding FROM file_vectors WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;

        blob.map(|b| from_bytes(&b)).transpose()
    }

    /// The `k` vectors closest to `query` by L2 distance
    ///
    /// Only vectors with the query's dimensionality are considered.
    /// Ties keep ascending id order.
    pub fn nearest(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if k == 0 || query.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, embedding FROM file_vectors WHERE dimensions = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![query.len() as i64], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, Vec<u8>>(1)?))
        })?;

        let mut neighbors = Vec::new();
        for row in rows {
            let (id, blob) = row?;
            let vector = from_bytes(&blob)?;
            neighbors.push(Neighbor {
                id,
                distance: l2_distance(query, &vector),
            });
        }

        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        neighbors.truncate(k);
        Ok(neighbors)
    }

    /// Upsert an audit entry, bumping its version on repeat keys
    pub fn put_audit(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO audit (auditKey, auditValue) VALUES (?1, ?2)
             ON CONFLICT(auditKey) DO UPDATE SET
                 auditValue = excluded.auditValue,
                 updateIdent = updateIdent + 1",
            params![key, value],
        )?;
        Ok(())
    }

    /// Fetch one audit entry
    pub fn get_audit(&self, key: &str) -> Result<Option<AuditEntry>> {
        let conn = self.lock()?;
        let entry = conn
            .query_row(
                "SELECT auditKey, auditValue, updateIdent FROM audit WHERE auditKey = ?1",
                params![key],
                map_audit,
            )
            .optional()?;
        Ok(entry)
    }

    /// All audit entries in first-written order
    pub fn list_audit(&self) -> Result<Vec<AuditEntry>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT auditKey, auditValue, updateIdent FROM audit ORDER BY id")?;
        let entries = stmt
            .query_map([], map_audit)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Force a full WAL checkpoint
    pub fn checkpoint(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.query_row("PRAGMA wal_checkpoint(FULL)", [], |_| Ok(()))?;
        Ok(())
    }

    /// Rebuild the full-text index from text rows and optimize it
    ///
    /// Returns the number of rows indexed.
    pub fn rebuild_fulltext(&self) -> Result<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute("INSERT INTO files_fts(files_fts) VALUES ('delete-all')", [])?;
        let indexed = tx.execute(
            "INSERT INTO files_fts(rowid, content)
             SELECT id, content FROM files WHERE isTextFile = 1",
            [],
        )?;
        tx.execute("INSERT INTO files_fts(files_fts) VALUES ('optimize')", [])?;
        tx.commit()?;
        Ok(indexed)
    }

    /// Full-text search over text excerpts, best match first
    pub fn search_content(&self, query: &str, limit: usize) -> Result<Vec<FileRecord>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {} FROM files_fts JOIN files f ON f.id = files_fts.rowid
             WHERE files_fts MATCH ?1 ORDER BY files_fts.rank LIMIT ?2",
            qualified_columns("f")
        );
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(params![query, limit as i64], map_file)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

fn qualified_columns(alias: &str) -> String {
    FILE_COLUMNS
        .split(", ")
        .map(|c| format!("{alias}.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn map_file(row: &Row<'_>) -> rusqlite::Result<FileRecord> {
    Ok(FileRecord {
        id: row.get(0)?,
        file_name: row.get(1)?,
        full_path: row.get(2)?,
        file_format: row.get(3)?,
        file_size: row.get::<_, i64>(4)? as u64,
        is_text_file: row.get(5)?,
        content: row.get(6)?,
        content_hash: row.get(7)?,
        indexed_at: row.get(8)?,
        created_at: row.get(9)?,
        modified_at: row.get(10)?,
        update_ident: row.get(11)?,
    })
}

fn map_audit(row: &Row<'_>) -> rusqlite::Result<AuditEntry> {
    Ok(AuditEntry {
        audit_key: row.get(0)?,
        audit_value: row.get(1)?,
        update_ident: row.get(2)?,
    })
}
