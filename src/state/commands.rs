use tauri::State;

use crate::{
    models::{MoodCategory, MoodEntry, MoodOption, Snack},
    state::StateController,
    AppState,
};

fn controller_from_state(state: &State<'_, AppState>) -> StateController {
    state.controller.clone()
}

#[tauri::command]
pub fn get_mood_categories() -> Vec<MoodOption> {
    MoodCategory::ALL.iter().map(MoodCategory::option).collect()
}

#[tauri::command]
pub fn get_moods(state: State<'_, AppState>) -> Vec<MoodEntry> {
    state.controller.moods()
}

#[tauri::command]
pub async fn create_mood(
    state: State<'_, AppState>,
    mood: MoodEntry,
) -> Result<Vec<MoodEntry>, String> {
    let controller = controller_from_state(&state);
    controller.create_mood(mood).await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn update_mood(
    state: State<'_, AppState>,
    mood: MoodEntry,
) -> Result<Vec<MoodEntry>, String> {
    let controller = controller_from_state(&state);
    controller.replace_mood(mood).await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn delete_mood(
    state: State<'_, AppState>,
    id: String,
) -> Result<Vec<MoodEntry>, String> {
    let controller = controller_from_state(&state);
    controller.remove_mood(&id).await.map_err(|e| e.to_string())
}

#[tauri::command]
pub fn get_snacks(state: State<'_, AppState>) -> Vec<Snack> {
    state.controller.snacks()
}

#[tauri::command]
pub async fn create_snack(state: State<'_, AppState>, snack: Snack) -> Result<Vec<Snack>, String> {
    let controller = controller_from_state(&state);
    controller.create_snack(snack).await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn update_snack(state: State<'_, AppState>, snack: Snack) -> Result<Vec<Snack>, String> {
    let controller = controller_from_state(&state);
    controller.replace_snack(snack).await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn delete_snack(state: State<'_, AppState>, id: String) -> Result<Vec<Snack>, String> {
    let controller = controller_from_state(&state);
    controller.remove_snack(&id).await.map_err(|e| e.to_string())
}

#[tauri::command]
pub fn get_recommended_snacks(state: State<'_, AppState>, mood: MoodCategory) -> Vec<Snack> {
    state.controller.recommended_snacks_for(mood)
}

#[tauri::command]
pub fn get_theme(state: State<'_, AppState>) -> bool {
    state.controller.is_dark_mode()
}

#[tauri::command]
pub async fn set_theme(state: State<'_, AppState>, enabled: bool) -> Result<bool, String> {
    let controller = controller_from_state(&state);
    controller.set_theme_enabled(enabled).await;
    Ok(controller.is_dark_mode())
}

#[tauri::command]
pub async fn toggle_theme(state: State<'_, AppState>) -> Result<bool, String> {
    let controller = controller_from_state(&state);
    Ok(controller.toggle_theme().await)
}
