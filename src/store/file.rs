use std::{collections::BTreeMap, path::PathBuf};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use log::error;
use tokio::{fs, sync::Mutex};

use super::KeyValueStore;

/// All keys kept in one pretty-printed JSON object on disk.
///
/// The document is rewritten on every `set`/`remove`; the in-memory map only
/// changes once the write has landed.
///
/// A file that does not parse is never overwritten: every call fails until
/// the file is repaired or moved away.
pub struct JsonFileStore {
    path: PathBuf,
    data: Mutex<BTreeMap<String, String>>,
    unreadable: Option<String>,
}

impl JsonFileStore {
    pub async fn open(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("failed to create store directory {}", parent.display())
            })?;
        }

        let exists = fs::try_exists(&path)
            .await
            .with_context(|| format!("Failed to check for store at {}", path.display()))?;

        let mut unreadable = None;
        let data = if exists {
            let contents = fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read store from {}", path.display()))?;
            match serde_json::from_str(&contents) {
                Ok(data) => data,
                Err(err) => {
                    error!(
                        "Store file {} is not a JSON object ({err}); leaving it untouched",
                        path.display()
                    );
                    unreadable = Some(err.to_string());
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            data: Mutex::new(data),
            unreadable,
        })
    }

    fn ensure_readable(&self) -> Result<()> {
        if let Some(reason) = &self.unreadable {
            bail!("store file {} is malformed: {reason}", self.path.display());
        }
        Ok(())
    }

    async fn persist(&self, data: &BTreeMap<String, String>) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, serialized)
            .await
            .with_context(|| format!("Failed to write store to {}", staging.display()))?;
        fs::rename(&staging, &self.path)
            .await
            .with_context(|| format!("Failed to replace store at {}", self.path.display()))
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.ensure_readable()?;
        Ok(self.data.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.ensure_readable()?;
        let mut guard = self.data.lock().await;
        let mut next = guard.clone();
        next.insert(key.to_string(), value);
        self.persist(&next).await?;
        *guard = next;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.ensure_readable()?;
        let mut guard = self.data.lock().await;
        if !guard.contains_key(key) {
            return Ok(());
        }
        let mut next = guard.clone();
        next.remove(key);
        self.persist(&next).await?;
        *guard = next;
        Ok(())
    }
}
