// src/storage.rs
//! Persisted key-value store playing the role of the browser's local storage.
//!
//! Values are strings, like in the browser. A store opened on a path writes
//! the whole map back to disk on every change; an in-memory store never
//! touches the file system.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::core::FsOps;

/// Well-known storage keys
pub mod keys {
    pub const TOKEN: &str = "green-matchers-token";
    pub const USER: &str = "green-matchers-user";
    pub const LANGUAGE: &str = "green-matchers-language";
    pub const REMEMBERED_EMAIL: &str = "green-matchers-remembered-email";
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    updated_at: Option<DateTime<Utc>>,
    entries: BTreeMap<String, String>,
}

#[derive(Debug)]
pub struct LocalStore {
    path: Option<PathBuf>,
    entries: RwLock<BTreeMap<String, String>>,
}

impl LocalStore {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Open the store file at `path`; a missing file starts an empty store
    pub async fn open(path: &Path) -> Result<Self> {
        let entries = match FsOps::read_optional(path).await? {
            Some(content) => {
                let file: StoreFile = serde_json::from_str(&content)
                    .with_context(|| format!("Corrupt store file: {}", path.display()))?;
                file.entries
            }
            None => BTreeMap::new(),
        };

        info!(
            "Opened local store at {} ({} entries)",
            path.display(),
            entries.len()
        );

        Ok(Self {
            path: Some(path.to_path_buf()),
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value.to_string());
        debug!("Store set '{}'", key);
        self.flush(&entries).await
    }

    pub async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        if entries.remove(key).is_some() {
            debug!("Store removed '{}'", key);
            self.flush(&entries).await?;
        }
        Ok(())
    }

    /// Deserialize a JSON value stored under `key`; unparseable values read as absent
    pub async fn get_json<T>(&self, key: &str) -> Option<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let raw = self.get(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("Ignoring unparseable value under '{}': {}", key, e);
                None
            }
        }
    }

    pub async fn set_json<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        let raw = serde_json::to_string(value)
            .with_context(|| format!("Failed to serialize value for '{}'", key))?;
        self.set(key, &raw).await
    }

    async fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let file = StoreFile {
            updated_at: Some(Utc::now()),
            entries: entries.clone(),
        };
        let content =
            serde_json::to_string_pretty(&file).context("Failed to serialize store")?;
        FsOps::write_file_atomic(path, &content).await
    }
}
