use std::time::Duration;
use tauri::{AppHandle, Emitter, Manager};

use crate::content::newsletter::Subscription;
use crate::state::AppState;

pub const FEEDBACK_CLEARED_EVENT: &str = "newsletter://feedback-cleared";

/// Tauri command: newsletter form submission
#[tauri::command]
pub fn subscribe_newsletter(app_handle: AppHandle, email: String) -> Result<Subscription, String> {
    let state = app_handle.state::<AppState>();
    let subscription = state.newsletter.subscribe(&email).map_err(|e| {
        tracing::error!("Error subscribing: {}", e);
        e.feedback().map(str::to_string).unwrap_or_else(|| e.to_string())
    })?;

    let clear_after = Duration::from_millis(state.settings.lock().general.feedback_clear_ms);
    let app_handle = app_handle.clone();
    tauri::async_runtime::spawn(async move {
        tokio::time::sleep(clear_after).await;
        let _ = app_handle.emit(FEEDBACK_CLEARED_EVENT, ());
    });

    Ok(subscription)
}

#[tauri::command]
pub fn newsletter_status(app_handle: AppHandle) -> Result<Option<String>, String> {
    let state = app_handle.state::<AppState>();
    Ok(state.newsletter.status())
}
