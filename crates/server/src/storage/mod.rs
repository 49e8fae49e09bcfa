//! In-memory log tables

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

/// One accepted `log` call
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub id: String,
    /// Seconds since the Unix epoch
    pub received_at: u64,
    pub payload: Value,
}

/// Records grouped by table name
#[derive(Clone, Default)]
pub struct LogStore {
    tables: Arc<RwLock<HashMap<String, Vec<LogRecord>>>>,
}

impl LogStore {
    /// Append a record and return its id
    pub async fn append(&self, table: &str, payload: Value) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let received_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let record = LogRecord {
            id: id.clone(),
            received_at,
            payload,
        };
        self.tables
            .write()
            .await
            .entry(table.to_string())
            .or_default()
            .push(record);
        id
    }

    /// All records of `table`, oldest first
    pub async fn records(&self, table: &str) -> Vec<LogRecord> {
        self.tables
            .read()
            .await
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn count(&self, table: &str) -> usize {
        self.tables.read().await.get(table).map_or(0, Vec::len)
    }
}
