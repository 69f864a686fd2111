//! In-process scan store

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::ScanRecordStore;
use crate::scan::ScanResult;

/// Keeps scans in a `Vec` sorted newest first.
#[derive(Clone, Default)]
pub struct InMemoryScanStore {
    scans: Arc<RwLock<Vec<ScanResult>>>,
}

impl InMemoryScanStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScanRecordStore for InMemoryScanStore {
    async fn insert(&self, scan: ScanResult) -> Result<()> {
        let mut scans = self.scans.write().await;
        if scans.iter().any(|s| s.id() == scan.id()) {
            bail!("scan {} already stored", scan.id());
        }
        // Insert after any record with an equal or newer timestamp.
        let pos = scans.partition_point(|s| s.timestamp() >= scan.timestamp());
        debug!("Storing scan {} at position {}", scan.id(), pos);
        scans.insert(pos, scan);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<ScanResult>> {
        Ok(self.scans.read().await.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut scans = self.scans.write().await;
        let before = scans.len();
        scans.retain(|s| s.id() != id);
        Ok(scans.len() != before)
    }

    async fn get(&self, id: Uuid) -> Result<Option<ScanResult>> {
        Ok(self.scans.read().await.iter().find(|s| s.id() == id).cloned())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.scans.read().await.len())
    }
}
