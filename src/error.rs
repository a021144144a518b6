use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Logical collections owned by the state controller, one store key each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Collection {
    Moods,
    Snacks,
    Theme,
}

impl Collection {
    pub fn key(&self) -> &'static str {
        match self {
            Collection::Moods => crate::store::MOODS_KEY,
            Collection::Snacks => crate::store::SNACKS_KEY,
            Collection::Theme => crate::store::DARK_MODE_KEY,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A store read/write failed or returned data that would not parse.
#[derive(Error, Debug)]
#[error("Storage error on {collection}: {source:#}")]
pub struct PersistenceError {
    pub collection: Collection,
    #[source]
    pub source: anyhow::Error,
}

impl PersistenceError {
    pub fn new(collection: Collection, source: impl Into<anyhow::Error>) -> Self {
        Self {
            collection,
            source: source.into(),
        }
    }
}

/// Rejections raised by the entry forms before anything reaches the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Select a mood before saving")]
    NoMoodSelected,

    #[error("Intensity must be between 1 and 5, got {0}")]
    IntensityOutOfRange(u8),

    #[error("Snack name is required")]
    MissingName,

    #[error("Pick at least one mood for this snack")]
    NoMoodTags,
}

pub type Result<T> = std::result::Result<T, PersistenceError>;

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn test_persistence_error_names_key_and_cause() {
        let err = PersistenceError::new(
            Collection::Snacks,
            anyhow!("disk full").context("failed to write key 'snacks'"),
        );
        assert_eq!(
            err.to_string(),
            "Storage error on snacks: failed to write key 'snacks': disk full"
        );

        let parse = serde_json::from_str::<bool>("maybe").unwrap_err();
        let err = PersistenceError::new(Collection::Theme, parse);
        assert!(err.to_string().starts_with("Storage error on isDarkMode: "));
    }
}
