//! Local filesystem storage implementation.
//!
//! Each solver's records live in a pretty-printed JSON array. Appends splice
//! the new entry in front of the closing bracket, so the bytes of earlier
//! entries never change and the file stays a single valid array.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! ├── last_id.txt                  # Checkpoint
//! └── {Solver_Name}_zbll_algs.json # Records
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{SolveRecord, solver_file_name};
use crate::storage::{CheckpointStore, RecordStore};

const EMPTY_COLLECTION: &str = "[]";

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
    checkpoint_key: String,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self::with_checkpoint(root_dir, "last_id.txt")
    }

    /// Create a LocalStorage with a custom checkpoint file name.
    pub fn with_checkpoint(root_dir: impl Into<PathBuf>, checkpoint_key: impl Into<String>) -> Self {
        Self {
            root_dir: root_dir.into(),
            checkpoint_key: checkpoint_key.into(),
        }
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    async fn reset_collection(&self, key: &str) -> Result<()> {
        self.write_bytes(key, EMPTY_COLLECTION.as_bytes()).await
    }
}

/// Insert `record` as the last element of the JSON array in `existing`.
fn splice_record(existing: &str, record: &SolveRecord) -> Result<String> {
    let close = existing
        .rfind(']')
        .ok_or_else(|| AppError::storage("record collection", "missing closing bracket"))?;
    let head = existing[..close].trim_end();
    let separator = if head.ends_with('[') { "\n" } else { ",\n" };
    let entry = serde_json::to_string_pretty(record)?;

    Ok(format!("{head}{separator}{entry}\n]"))
}

#[async_trait]
impl RecordStore for LocalStorage {
    async fn load_existing_ids(&self, solver: &str) -> Result<HashSet<u64>> {
        let key = solver_file_name(solver);

        let Some(bytes) = self.read_bytes(&key).await? else {
            log::info!("Creating empty record file {}", key);
            self.reset_collection(&key).await?;
            return Ok(HashSet::new());
        };

        // Only a syntax error means the file is corrupt; entries are read for their `id` alone.
        let collection = match serde_json::from_slice::<Value>(&bytes) {
            Ok(collection) => collection,
            Err(e) => {
                log::warn!("{} is unreadable ({}). Reinitializing as empty.", key, e);
                self.reset_collection(&key).await?;
                return Ok(HashSet::new());
            }
        };

        let Some(entries) = collection.as_array() else {
            log::warn!("{} is not a JSON array, leaving it untouched.", key);
            return Ok(HashSet::new());
        };

        let ids: HashSet<u64> = entries
            .iter()
            .filter_map(|entry| entry.get("id").and_then(Value::as_u64))
            .collect();
        if ids.len() < entries.len() {
            log::debug!("{}: {} entries without a usable id", key, entries.len() - ids.len());
        }
        Ok(ids)
    }

    async fn append(&self, solver: &str, record: &SolveRecord) -> Result<()> {
        let key = solver_file_name(solver);
        let existing = match self.read_bytes(&key).await? {
            Some(bytes) => {
                String::from_utf8(bytes).map_err(|e| AppError::storage(key.as_str(), e))?
            }
            None => EMPTY_COLLECTION.to_string(),
        };

        let updated =
            splice_record(&existing, record).map_err(|e| AppError::storage(key.as_str(), e))?;
        self.write_bytes(&key, updated.as_bytes()).await
    }

    async fn load_records(&self, solver: &str) -> Result<Vec<SolveRecord>> {
        let key = solver_file_name(solver);
        match self.read_bytes(&key).await? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl CheckpointStore for LocalStorage {
    async fn read_last_id(&self, default: u64) -> Result<u64> {
        let Some(bytes) = self.read_bytes(&self.checkpoint_key).await? else {
            return Ok(default);
        };

        let text = String::from_utf8_lossy(&bytes);
        match text.trim().parse::<u64>() {
            Ok(last_id) => Ok(last_id),
            Err(e) => {
                log::warn!(
                    "Checkpoint {} is invalid ({}). Starting from {}.",
                    self.checkpoint_key,
                    e,
                    default
                );
                Ok(default)
            }
        }
    }

    async fn write_last_id(&self, last_id: u64) -> Result<()> {
        self.write_bytes(&self.checkpoint_key, last_id.to_string().as_bytes())
            .await
    }
}
