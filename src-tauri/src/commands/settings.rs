use tauri::{AppHandle, Manager};

use crate::persistence;
use crate::state::{AppState, Settings};

#[tauri::command]
pub fn get_settings(app_handle: AppHandle) -> Result<Settings, String> {
    let state = app_handle.state::<AppState>();
    let settings = state.settings.lock().clone();
    Ok(settings)
}

#[tauri::command]
pub fn update_settings(app_handle: AppHandle, settings: Settings) -> Result<(), String> {
    let state = app_handle.state::<AppState>();
    state.player.lock().set_settings(settings.playback.clone());
    persistence::save_settings(state.storage.as_ref(), &settings);
    *state.settings.lock() = settings;
    Ok(())
}

#[tauri::command]
pub fn get_app_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
