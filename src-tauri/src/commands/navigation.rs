use tauri::{AppHandle, Manager};

use crate::content::navigation::NavigationState;
use crate::state::AppState;

#[tauri::command]
pub fn show_section(app_handle: AppHandle, section: String) -> Result<NavigationState, String> {
    let state = app_handle.state::<AppState>();
    let navigation = state.navigator.lock().show(&section);
    Ok(navigation)
}
