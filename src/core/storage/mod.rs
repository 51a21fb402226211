//! Storage layer backed by SQLite.
//!
//! # Architecture
//!
//! - **Store**: connection owner; file upserts, vectors, audit rows,
//!   full-text search
//! - **AuditLedger**: run bookkeeping on top of the store
//! - **schema**: migrations, including the FTS5 sync triggers
//! - **vectors**: little-endian `f32` blob encoding and L2 distance
//!
//! # Tables
//!
//! ```text
//! files          one row per distinct path (UNIQUE fullPath)
//! file_vectors   at most one embedding per files.id
//! audit          auditKey -> auditValue, versioned
//! files_fts      external-content FTS5 over files.content (text rows)
//! ```

mod ledger;
pub mod schema;
mod store;
pub mod vectors;

pub use ledger::AuditLedger;
pub use store::Store;
