//! SQLite-backed record store.
//!
//! Records are append-only rows; the autoincrement rowid fixes the record
//! order, so loading `ORDER BY id` always reproduces the sequence the
//! snapshot was built from. Embeddings are stored as little-endian f32
//! blobs.

use super::{EmbeddingRecord, IndexSnapshot};
use crate::error::{HarkError, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_id TEXT NOT NULL,
    source_title TEXT NOT NULL,
    source_url TEXT NOT NULL,
    start_offset REAL NOT NULL,
    text TEXT NOT NULL,
    embedding BLOB NOT NULL,
    indexed_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_records_source_id ON records(source_id);
"#;

/// Summary information for one indexed source.
#[derive(Debug, Clone)]
pub struct IndexedSource {
    pub source_id: String,
    pub source_title: String,
    pub record_count: u32,
    pub indexed_at: DateTime<Utc>,
}

/// Append-only store for the persisted embedding record sequence.
pub struct IndexStore {
    conn: Mutex<Connection>,
}

impl IndexStore {
    /// Open (or create) the store at the given path.
    #[instrument(skip_all)]
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // WAL for better concurrent read behavior
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Opened index store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Serialize embedding to bytes.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize embedding from bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| {
                let arr: [u8; 4] = chunk.try_into().unwrap_or_default();
                f32::from_le_bytes(arr)
            })
            .collect()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| HarkError::Store(format!("Failed to acquire lock: {}", e)))
    }

    /// Load the full record sequence in insertion order.
    #[instrument(skip(self))]
    pub fn load_records(&self) -> Result<Vec<EmbeddingRecord>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT source_id, source_title, source_url, start_offset, text, embedding, indexed_at
            FROM records
            ORDER BY id
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            let embedding_bytes: Vec<u8> = row.get(5)?;
            let indexed_at_str: String = row.get(6)?;

            Ok(EmbeddingRecord {
                source_id: row.get(0)?,
                source_title: row.get(1)?,
                source_url: row.get(2)?,
                start_offset: row.get(3)?,
                text: row.get(4)?,
                embedding: Self::bytes_to_embedding(&embedding_bytes),
                indexed_at: DateTime::parse_from_rfc3339(&indexed_at_str)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
            })
        })?;

        let records: Vec<EmbeddingRecord> = rows.filter_map(|r| r.ok()).collect();
        debug!("Loaded {} records", records.len());
        Ok(records)
    }

    /// Append new records after the existing ones, in one transaction.
    #[instrument(skip(self, records))]
    pub fn append_records(&self, records: &[EmbeddingRecord]) -> Result<usize> {
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction()?;

        for record in records {
            let embedding_bytes = Self::embedding_to_bytes(&record.embedding);

            tx.execute(
                r#"
                INSERT INTO records
                (source_id, source_title, source_url, start_offset, text, embedding, indexed_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    record.source_id,
                    record.source_title,
                    record.source_url,
                    record.start_offset,
                    record.text,
                    embedding_bytes,
                    record.indexed_at.to_rfc3339(),
                ],
            )?;
        }

        tx.commit()?;
        info!("Appended {} records", records.len());
        Ok(records.len())
    }

    /// The set of source identifiers present in the persisted record set.
    pub fn indexed_source_ids(&self) -> Result<HashSet<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT DISTINCT source_id FROM records")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Total record count.
    pub fn record_count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Per-source summaries, most recently indexed first.
    #[instrument(skip(self))]
    pub fn list_sources(&self) -> Result<Vec<IndexedSource>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT source_id, source_title, COUNT(*) as record_count, MAX(indexed_at) as indexed_at
            FROM records
            GROUP BY source_id
            ORDER BY indexed_at DESC
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            let indexed_at_str: String = row.get(3)?;
            Ok(IndexedSource {
                source_id: row.get(0)?,
                source_title: row.get(1)?,
                record_count: row.get(2)?,
                indexed_at: DateTime::parse_from_rfc3339(&indexed_at_str)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
            })
        })?;

        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Load a snapshot built from the full persisted record sequence.
    pub fn load_snapshot(&self) -> Result<IndexSnapshot> {
        Ok(IndexSnapshot::build(self.load_records()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::test_record;

    #[test]
    fn test_append_preserves_order() {
        let store = IndexStore::in_memory().unwrap();

        store
            .append_records(&[
                test_record("ep1", "alpha", vec![1.0, 0.0]),
                test_record("ep1", "beta", vec![0.0, 1.0]),
            ])
            .unwrap();
        store
            .append_records(&[test_record("ep2", "gamma", vec![0.5, 0.5])])
            .unwrap();

        let records = store.load_records().unwrap();
        let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["alpha", "beta", "gamma"]);
        assert_eq!(records[1].embedding, vec![0.0, 1.0]);
    }

    #[test]
    fn test_indexed_source_ids() {
        let store = IndexStore::in_memory().unwrap();
        store
            .append_records(&[
                test_record("ep1", "a", vec![1.0]),
                test_record("ep1", "b", vec![1.0]),
                test_record("ep2", "c", vec![1.0]),
            ])
            .unwrap();

        let ids = store.indexed_source_ids().unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("ep1"));
        assert!(ids.contains("ep2"));
    }

    #[test]
    fn test_list_sources_counts() {
        let store = IndexStore::in_memory().unwrap();
        store
            .append_records(&[
                test_record("ep1", "a", vec![1.0]),
                test_record("ep1", "b", vec![1.0]),
            ])
            .unwrap();

        let sources = store.list_sources().unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].source_id, "ep1");
        assert_eq!(sources[0].record_count, 2);
    }

    #[test]
    fn test_open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.db");

        {
            let store = IndexStore::open(&path).unwrap();
            store
                .append_records(&[test_record("ep1", "persisted", vec![1.0, 0.0])])
                .unwrap();
        }

        let store = IndexStore::open(&path).unwrap();
        assert_eq!(store.record_count().unwrap(), 1);
        let snapshot = store.load_snapshot().unwrap();
        assert_eq!(snapshot.records()[0].text, "persisted");
    }
}
