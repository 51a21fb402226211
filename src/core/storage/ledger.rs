//! Audit ledger: run bookkeeping keyed by name.

use std::sync::Arc;

use crate::core::error::Result;
use crate::core::storage::Store;
use crate::core::types::AuditEntry;

/// Key/value run metadata persisted next to the index
pub struct AuditLedger {
    store: Arc<Store>,
    checkpoint: bool,
}

impl AuditLedger {
    /// Create a ledger; `checkpoint` forces a WAL checkpoint per write
    pub fn new(store: Arc<Store>, checkpoint: bool) -> Self {
        Self { store, checkpoint }
    }

    /// Upsert an entry
    pub fn record(&self, key: &str, value: impl AsRef<str>) -> Result<()> {
        self.store.put_audit(key, value.as_ref())?;
        if self.checkpoint {
            self.store.checkpoint()?;
        }
        Ok(())
    }

    /// Upsert an entry, logging instead of returning a failure
    pub fn record_or_warn(&self, key: &str, value: impl AsRef<str>) {
        if let Err(e) = self.record(key, value) {
            tracing::warn!("Failed to record audit entry '{}': {}", key, e);
        }
    }

    /// Look up one entry
    pub fn get(&self, key: &str) -> Result<Option<AuditEntry>> {
        self.store.get_audit(key)
    }

    /// All entries
    pub fn entries(&self) -> Result<Vec<AuditEntry>> {
        self.store.list_audit()
    }
}
