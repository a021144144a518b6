use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

/// Fixed mood vocabulary shared by mood entries and snack tags.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MoodCategory {
    Happy,
    Sad,
    Stressed,
    Energetic,
    Tired,
    Angry,
}

impl MoodCategory {
    /// Display order used by pickers.
    pub const ALL: [MoodCategory; 6] = [
        MoodCategory::Happy,
        MoodCategory::Sad,
        MoodCategory::Stressed,
        MoodCategory::Energetic,
        MoodCategory::Tired,
        MoodCategory::Angry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MoodCategory::Happy => "happy",
            MoodCategory::Sad => "sad",
            MoodCategory::Stressed => "stressed",
            MoodCategory::Energetic => "energetic",
            MoodCategory::Tired => "tired",
            MoodCategory::Angry => "angry",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MoodCategory::Happy => "Happy",
            MoodCategory::Sad => "Sad",
            MoodCategory::Stressed => "Stressed",
            MoodCategory::Energetic => "Energetic",
            MoodCategory::Tired => "Tired",
            MoodCategory::Angry => "Angry",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            MoodCategory::Happy => "😊",
            MoodCategory::Sad => "😢",
            MoodCategory::Stressed => "😰",
            MoodCategory::Energetic => "⚡",
            MoodCategory::Tired => "😴",
            MoodCategory::Angry => "😠",
        }
    }

    /// Resolve a category from its display label, the only link a stored
    /// mood entry keeps back to the vocabulary.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.label() == label)
    }

    pub fn option(&self) -> MoodOption {
        MoodOption {
            id: *self,
            label: self.label(),
            glyph: self.glyph(),
        }
    }
}

impl fmt::Display for MoodCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoodCategory {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "happy" => Ok(MoodCategory::Happy),
            "sad" => Ok(MoodCategory::Sad),
            "stressed" => Ok(MoodCategory::Stressed),
            "energetic" => Ok(MoodCategory::Energetic),
            "tired" => Ok(MoodCategory::Tired),
            "angry" => Ok(MoodCategory::Angry),
            other => Err(anyhow!("unknown mood category '{other}'")),
        }
    }
}

/// Picker entry handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodOption {
    pub id: MoodCategory,
    pub label: &'static str,
    pub glyph: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_resolve_back_to_categories() {
        for category in MoodCategory::ALL {
            assert_eq!(MoodCategory::from_label(category.label()), Some(category));
            assert_eq!(category.as_str().parse::<MoodCategory>().unwrap(), category);
        }
        assert_eq!(MoodCategory::from_label("Bored"), None);
        assert!("bored".parse::<MoodCategory>().is_err());
    }

    #[test]
    fn test_serializes_as_lowercase_id() {
        let json = serde_json::to_string(&MoodCategory::Energetic).unwrap();
        assert_eq!(json, "\"energetic\"");

        let parsed: Vec<MoodCategory> = serde_json::from_str(r#"["sad","angry"]"#).unwrap();
        assert_eq!(parsed, vec![MoodCategory::Sad, MoodCategory::Angry]);
    }
}
