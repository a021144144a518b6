//! Entry forms for moods and snacks.
//!
//! These hold the in-progress values a screen edits and turn them into
//! entries once they pass validation. Nothing here touches the store until a
//! [`Submission`] is committed.

use chrono::Utc;

use crate::{
    error::{self, FormError},
    models::{MoodCategory, MoodEntry, Snack},
    state::StateController,
};

pub const DEFAULT_INTENSITY: u8 = 3;
pub const INTENSITY_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// Millisecond timestamp, the id scheme used for every user-created entry.
pub fn generate_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

/// A validated entry and whether it replaces an existing one.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<T> {
    Create(T),
    Update(T),
}

impl<T> Submission<T> {
    pub fn entry(&self) -> &T {
        match self {
            Submission::Create(entry) | Submission::Update(entry) => entry,
        }
    }

    pub fn into_entry(self) -> T {
        match self {
            Submission::Create(entry) | Submission::Update(entry) => entry,
        }
    }
}

impl Submission<MoodEntry> {
    pub async fn commit(self, state: &StateController) -> error::Result<Vec<MoodEntry>> {
        match self {
            Submission::Create(mood) => state.create_mood(mood).await,
            Submission::Update(mood) => state.replace_mood(mood).await,
        }
    }
}

impl Submission<Snack> {
    pub async fn commit(self, state: &StateController) -> error::Result<Vec<Snack>> {
        match self {
            Submission::Create(snack) => state.create_snack(snack).await,
            Submission::Update(snack) => state.replace_snack(snack).await,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoodForm {
    pub category: Option<MoodCategory>,
    pub intensity: u8,
    pub note: String,
    editing: Option<String>,
}

impl Default for MoodForm {
    fn default() -> Self {
        Self {
            category: None,
            intensity: DEFAULT_INTENSITY,
            note: String::new(),
            editing: None,
        }
    }
}

impl MoodForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `entry` for editing. The category is recovered from the label.
    pub fn edit(entry: &MoodEntry) -> Self {
        Self {
            category: entry.category(),
            intensity: entry.intensity,
            note: entry.note.clone().unwrap_or_default(),
            editing: Some(entry.id.clone()),
        }
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    /// Drop back to a blank form if the entry being edited was deleted.
    pub fn forget(&mut self, deleted_id: &str) {
        if self.editing.as_deref() == Some(deleted_id) {
            self.reset();
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn submit(&self) -> Result<Submission<MoodEntry>, FormError> {
        let category = self.category.ok_or(FormError::NoMoodSelected)?;
        if !INTENSITY_RANGE.contains(&self.intensity) {
            return Err(FormError::IntensityOutOfRange(self.intensity));
        }

        let note = Some(self.note.clone());
        Ok(match &self.editing {
            Some(id) => Submission::Update(MoodEntry::new(id.clone(), category, self.intensity, note)),
            None => Submission::Create(MoodEntry::new(generate_id(), category, self.intensity, note)),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnackForm {
    pub name: String,
    pub description: String,
    tags: Vec<MoodCategory>,
    editing: Option<Snack>,
}

impl SnackForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edit(snack: &Snack) -> Self {
        Self {
            name: snack.name.clone(),
            description: snack.description.clone(),
            tags: snack.mood_tags.clone(),
            editing: Some(snack.clone()),
        }
    }

    pub fn tags(&self) -> &[MoodCategory] {
        &self.tags
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing.as_ref().map(|snack| snack.id.as_str())
    }

    /// Select `category` if it is not selected yet, otherwise deselect it.
    pub fn toggle_tag(&mut self, category: MoodCategory) {
        if self.tags.contains(&category) {
            self.tags.retain(|tag| *tag != category);
        } else {
            self.tags.push(category);
        }
    }

    pub fn forget(&mut self, deleted_id: &str) {
        if self.editing_id() == Some(deleted_id) {
            self.reset();
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn submit(&self) -> Result<Submission<Snack>, FormError> {
        if self.name.is_empty() {
            return Err(FormError::MissingName);
        }
        if self.tags.is_empty() {
            return Err(FormError::NoMoodTags);
        }

        Ok(match &self.editing {
            Some(original) => Submission::Update(Snack {
                id: original.id.clone(),
                name: self.name.clone(),
                description: self.description.clone(),
                mood_tags: self.tags.clone(),
                image: original.image.clone(),
            }),
            None => Submission::Create(Snack::new(
                generate_id(),
                self.name.clone(),
                self.description.clone(),
                self.tags.clone(),
            )),
        })
    }
}
