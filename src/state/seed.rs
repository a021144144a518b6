use crate::models::{MoodCategory, Snack};

/// Snacks adopted and persisted on first run, when the store has none.
pub fn default_snacks() -> Vec<Snack> {
    use MoodCategory::*;

    vec![
        Snack::new(
            "1",
            "Dark Chocolate",
            "Rich in antioxidants and mood-boosting compounds",
            vec![Sad, Stressed],
        ),
        Snack::new(
            "2",
            "Mixed Nuts",
            "Healthy fats and protein for sustained energy",
            vec![Tired, Stressed],
        ),
        Snack::new(
            "3",
            "Fresh Fruit",
            "Natural sugars for quick energy boost",
            vec![Sad, Tired],
        ),
        Snack::new(
            "4",
            "Green Tea",
            "Calming and focusing effects",
            vec![Stressed, Angry],
        ),
        Snack::new(
            "5",
            "Yogurt with Berries",
            "Probiotics and antioxidants for overall wellness",
            vec![Happy, Energetic],
        ),
    ]
}
