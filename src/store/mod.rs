//! Scan Record Storage
//!
//! Append-only persistence for finished scans. Records are never updated;
//! they are inserted once and may later be deleted.

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryScanStore;
pub use sqlite::SqliteScanStore;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::scan::ScanResult;

#[async_trait]
pub trait ScanRecordStore: Send + Sync {
    /// Append a scan. Fails if a record with the same id already exists.
    async fn insert(&self, scan: ScanResult) -> Result<()>;

    /// Snapshot of every record, newest first.
    async fn list_all(&self) -> Result<Vec<ScanResult>>;

    /// Remove a record. Returns whether anything was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool>;

    async fn get(&self, id: Uuid) -> Result<Option<ScanResult>>;

    async fn count(&self) -> Result<usize>;
}
