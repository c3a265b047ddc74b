use tauri::{AppHandle, Manager};

use crate::content::stories::{StoryCard, StoryReceipt};
use crate::state::AppState;

/// Tauri command: story form submission
#[tauri::command]
pub fn submit_story(
    app_handle: AppHandle,
    name: String,
    story: String,
) -> Result<StoryReceipt, String> {
    let state = app_handle.state::<AppState>();
    let receipt = state.stories.submit(&name, &story).map_err(|e| e.to_string())?;
    state.navigator.lock().show(receipt.navigate_to);
    Ok(receipt)
}

/// Tauri command: cards for the Confesiones list, newest first
#[tauri::command]
pub fn list_stories(app_handle: AppHandle) -> Result<Vec<StoryCard>, String> {
    let state = app_handle.state::<AppState>();
    Ok(state.stories.load().iter().map(|s| s.card()).collect())
}
