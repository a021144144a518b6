pub mod category;
pub mod mood;
pub mod snack;

pub use category::{MoodCategory, MoodOption};
pub use mood::MoodEntry;
pub use snack::Snack;

use serde::{Deserialize, Serialize};

/// Host platform color preference, used when no theme has been saved yet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    pub fn is_dark(&self) -> bool {
        matches!(self, ColorScheme::Dark)
    }
}
