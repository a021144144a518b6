use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MoodCategory;

/// A single recorded mood.
///
/// Field names on the wire follow the layout already persisted under the
/// `"moods"` key, so older data keeps loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoodEntry {
    pub id: String,
    #[serde(rename = "name")]
    pub label: String,
    #[serde(rename = "emoji")]
    pub symbol: String,
    #[serde(rename = "timestamp")]
    pub recorded_at: DateTime<Utc>,
    /// Expected in 1..=5; only the form layer enforces it.
    pub intensity: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl MoodEntry {
    pub fn new(
        id: impl Into<String>,
        category: MoodCategory,
        intensity: u8,
        note: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: category.label().to_string(),
            symbol: category.glyph().to_string(),
            recorded_at: Utc::now(),
            intensity,
            note,
        }
    }

    pub fn category(&self) -> Option<MoodCategory> {
        MoodCategory::from_label(&self.label)
    }
}
