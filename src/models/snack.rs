use serde::{Deserialize, Serialize};

use super::MoodCategory;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snack {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "mood")]
    pub mood_tags: Vec<MoodCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Snack {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        mood_tags: Vec<MoodCategory>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            mood_tags,
            image: None,
        }
    }

    pub fn is_recommended_for(&self, category: MoodCategory) -> bool {
        self.mood_tags.contains(&category)
    }
}
