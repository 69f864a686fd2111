//! SQLite-backed scan store
//!
//! Each call opens its own connection on the blocking pool, so the store is
//! cheap to clone and safe to share across tasks.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::{debug, info};
use uuid::Uuid;

use super::ScanRecordStore;
use crate::scan::{ConditionResult, ScanResult};

#[derive(Clone)]
pub struct SqliteScanStore {
    db_path: PathBuf,
}

impl SqliteScanStore {
    pub async fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let path = db_path.as_ref().to_path_buf();
        let path_clone = path.clone();

        task::spawn_blocking(move || {
            let conn = Connection::open(&path_clone)
                .with_context(|| format!("opening scan database {:?}", path_clone))?;

            conn.execute(
                r#"
                CREATE TABLE IF NOT EXISTS scans (
                    id TEXT PRIMARY KEY,
                    created_at TEXT NOT NULL,
                    conditions TEXT NOT NULL,
                    image BLOB
                );
                "#,
                [],
            )?;

            conn.execute("CREATE INDEX IF NOT EXISTS idx_scans_created_at ON scans(created_at);", [])?;

            Ok::<_, anyhow::Error>(())
        }).await??;

        info!("Scan store ready at {:?}", path);
        Ok(Self { db_path: path })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }
}

/// Fixed-width RFC 3339 so text order matches time order.
fn encode_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn decode_row(row: &Row<'_>) -> rusqlite::Result<(String, String, String, Option<Vec<u8>>)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn into_scan((id, created_at, conditions, image): (String, String, String, Option<Vec<u8>>)) -> Result<ScanResult> {
    let id = Uuid::parse_str(&id).with_context(|| format!("bad scan id '{id}'"))?;
    let timestamp = DateTime::parse_from_rfc3339(&created_at)
        .with_context(|| format!("bad timestamp '{created_at}' on scan {id}"))?
        .with_timezone(&Utc);
    let conditions: Vec<ConditionResult> = serde_json::from_str(&conditions)
        .with_context(|| format!("decoding conditions of scan {id}"))?;
    if conditions.is_empty() {
        bail!("scan {id} has no conditions");
    }
    Ok(ScanResult::restore(id, timestamp, conditions, image))
}

#[async_trait]
impl ScanRecordStore for SqliteScanStore {
    async fn insert(&self, scan: ScanResult) -> Result<()> {
        let path = self.db_path.clone();
        let conditions = serde_json::to_string(scan.conditions())?;

        task::spawn_blocking(move || {
            let conn = Connection::open(&path)?;
            conn.execute(
                "INSERT INTO scans (id, created_at, conditions, image) VALUES (?1, ?2, ?3, ?4)",
                params![
                    scan.id().to_string(),
                    encode_timestamp(scan.timestamp()),
                    &conditions,
                    scan.image_bytes(),
                ],
            )
            .with_context(|| format!("inserting scan {}", scan.id()))?;
            debug!("Inserted scan {}", scan.id());
            Ok::<_, anyhow::Error>(())
        }).await?
    }

    async fn list_all(&self) -> Result<Vec<ScanResult>> {
        let path = self.db_path.clone();

        task::spawn_blocking(move || {
            let conn = Connection::open(&path)?;
            let mut stmt = conn.prepare(
                "SELECT id, created_at, conditions, image FROM scans ORDER BY created_at DESC, id ASC",
            )?;
            let rows = stmt.query_map([], decode_row)?;

            let mut scans = Vec::new();
            for row in rows {
                scans.push(into_scan(row?)?);
            }
            Ok::<_, anyhow::Error>(scans)
        }).await?
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let path = self.db_path.clone();

        task::spawn_blocking(move || {
            let conn = Connection::open(&path)?;
            let removed = conn.execute("DELETE FROM scans WHERE id = ?1", params![id.to_string()])?;
            debug!("Deleted scan {} ({} rows)", id, removed);
            Ok::<_, anyhow::Error>(removed > 0)
        }).await?
    }

    async fn get(&self, id: Uuid) -> Result<Option<ScanResult>> {
        let path = self.db_path.clone();

        task::spawn_blocking(move || {
            let conn = Connection::open(&path)?;
            let row = conn
                .query_row(
                    "SELECT id, created_at, conditions, image FROM scans WHERE id = ?1",
                    params![id.to_string()],
                    decode_row,
                )
                .optional()?;
            let scan = row.map(into_scan).transpose()?;
            Ok::<_, anyhow::Error>(scan)
        }).await?
    }

    async fn count(&self) -> Result<usize> {
        let path = self.db_path.clone();

        task::spawn_blocking(move || {
            let conn = Connection::open(&path)?;
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM scans", [], |row| row.get(0))?;
            Ok::<_, anyhow::Error>(count as usize)
        }).await?
    }
}
