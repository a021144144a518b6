pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod models;
pub mod state;
pub mod store;

pub use config::{StorageBackend, StorageConfig};
pub use db::Database;
pub use error::{Collection, FormError, PersistenceError};
pub use models::{ColorScheme, MoodCategory, MoodEntry, MoodOption, Snack};
pub use state::StateController;
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};

/// `info` and above unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    let _ = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();
}

#[cfg(feature = "desktop")]
pub struct AppState {
    pub(crate) controller: StateController,
}

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use state::commands::{
        create_mood, create_snack, delete_mood, delete_snack, get_mood_categories, get_moods,
        get_recommended_snacks, get_snacks, get_theme, set_theme, toggle_theme, update_mood,
        update_snack,
    };
    use tauri::Manager;

    init_logging();

    log::info!("Mood Snacks starting up...");

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let result = (|| -> anyhow::Result<()> {
                let app_data_dir = app
                    .path()
                    .app_data_dir()
                    .map_err(|err| anyhow::anyhow!(err))?;
                let storage = StorageConfig::from_env(app_data_dir);

                let detected = app
                    .get_webview_window("main")
                    .and_then(|window| window.theme().ok())
                    .map(|theme| match theme {
                        tauri::Theme::Dark => ColorScheme::Dark,
                        _ => ColorScheme::Light,
                    })
                    .unwrap_or_default();
                let scheme = config::system_color_scheme(detected);

                let controller = tauri::async_runtime::block_on(async move {
                    let store = storage.open().await?;
                    Ok::<_, anyhow::Error>(StateController::load(store, scheme).await)
                })?;

                app.manage(AppState { controller });

                Ok(())
            })();

            result.map_err(|err| err.into())
        })
        .invoke_handler(tauri::generate_handler![
            get_mood_categories,
            get_moods,
            create_mood,
            update_mood,
            delete_mood,
            get_snacks,
            create_snack,
            update_snack,
            delete_snack,
            get_recommended_snacks,
            get_theme,
            set_theme,
            toggle_theme,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
