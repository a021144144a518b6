use std::{env, path::PathBuf, str::FromStr, sync::Arc};

use anyhow::{anyhow, Result};
use log::{info, warn};

use crate::{
    db::Database,
    models::ColorScheme,
    store::{JsonFileStore, KeyValueStore, MemoryStore},
};

pub const BACKEND_ENV: &str = "MOOD_SNACKS_BACKEND";
pub const DATA_DIR_ENV: &str = "MOOD_SNACKS_DATA_DIR";
pub const THEME_ENV: &str = "MOOD_SNACKS_THEME";

const SQLITE_FILE: &str = "mood-snacks.sqlite3";
const JSON_FILE: &str = "store.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Json,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StorageBackend::Sqlite),
            "json" => Ok(StorageBackend::Json),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(anyhow!("unknown storage backend '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(backend: StorageBackend, data_dir: PathBuf) -> Self {
        Self { backend, data_dir }
    }

    /// Apply the environment overrides on top of the platform data directory.
    /// An unrecognised backend name is logged and ignored.
    pub fn from_env(default_data_dir: PathBuf) -> Self {
        let backend = match env::var(BACKEND_ENV) {
            Ok(raw) => raw.parse().unwrap_or_else(|err| {
                warn!("Ignoring {BACKEND_ENV}: {err}");
                StorageBackend::default()
            }),
            Err(_) => StorageBackend::default(),
        };

        let data_dir = env::var_os(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or(default_data_dir);

        Self { backend, data_dir }
    }

    pub fn store_path(&self) -> Option<PathBuf> {
        match self.backend {
            StorageBackend::Sqlite => Some(self.data_dir.join(SQLITE_FILE)),
            StorageBackend::Json => Some(self.data_dir.join(JSON_FILE)),
            StorageBackend::Memory => None,
        }
    }

    pub async fn open(&self) -> Result<Arc<dyn KeyValueStore>> {
        let store: Arc<dyn KeyValueStore> = match (self.backend, self.store_path()) {
            (StorageBackend::Sqlite, Some(path)) => Arc::new(Database::new(path)?),
            (StorageBackend::Json, Some(path)) => Arc::new(JsonFileStore::open(path).await?),
            _ => Arc::new(MemoryStore::new()),
        };
        info!("Using {:?} storage in {}", self.backend, self.data_dir.display());
        Ok(store)
    }
}

/// `MOOD_SNACKS_THEME` when set to `light`/`dark`, else `detected`.
pub fn system_color_scheme(detected: ColorScheme) -> ColorScheme {
    match env::var(THEME_ENV).ok().as_deref().map(str::trim) {
        Some(value) if value.eq_ignore_ascii_case("dark") => ColorScheme::Dark,
        Some(value) if value.eq_ignore_ascii_case("light") => ColorScheme::Light,
        Some(other) => {
            warn!("Ignoring {THEME_ENV}={other}");
            detected
        }
        None => detected,
    }
}
