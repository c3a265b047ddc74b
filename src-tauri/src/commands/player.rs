use tauri::{AppHandle, Manager};

use crate::player::{PlaybackSnapshot, SessionEvent, ToggleOutcome};
use crate::state::AppState;

/// Tauri command: play a track card, or stop it if it is already playing
#[tauri::command]
pub fn play_track(
    app_handle: AppHandle,
    track_id: String,
    title: String,
    artist: String,
) -> Result<PlaybackSnapshot, String> {
    let state = app_handle.state::<AppState>();
    let mut player = state.player.lock();
    let outcome = player.play(&track_id, &title, &artist);
    tracing::debug!("play_track('{}') -> {:?}", track_id, outcome);
    Ok(player.snapshot())
}

#[tauri::command]
pub fn stop_playback(app_handle: AppHandle) -> Result<PlaybackSnapshot, String> {
    let state = app_handle.state::<AppState>();
    let mut player = state.player.lock();
    player.stop();
    Ok(player.snapshot())
}

/// Tauri command: main play/pause button
#[tauri::command]
pub fn toggle_playback(app_handle: AppHandle) -> Result<PlaybackSnapshot, String> {
    let state = app_handle.state::<AppState>();
    let mut player = state.player.lock();
    if player.toggle() == ToggleOutcome::Failed {
        return Err("Playback could not be resumed".into());
    }
    Ok(player.snapshot())
}

/// Tauri command: click on the progress bar
#[tauri::command]
pub fn scrub_playback(
    app_handle: AppHandle,
    pointer_x: f64,
    bar_left: f64,
    bar_width: f64,
) -> Result<bool, String> {
    let state = app_handle.state::<AppState>();
    let seeked = state.player.lock().scrub(pointer_x, bar_left, bar_width);
    Ok(seeked)
}

#[tauri::command]
pub fn get_playback(app_handle: AppHandle) -> Result<PlaybackSnapshot, String> {
    let state = app_handle.state::<AppState>();
    let snapshot = state.player.lock().snapshot();
    Ok(snapshot)
}

/// Tauri command: callback from the page's audio element or speechSynthesis
#[tauri::command]
pub fn report_backend_event(app_handle: AppHandle, event: SessionEvent) -> Result<(), String> {
    let state = app_handle.state::<AppState>();
    state.events.dispatch(event).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn set_speech_available(app_handle: AppHandle, available: bool) -> Result<(), String> {
    let state = app_handle.state::<AppState>();
    state.speech.set_available(available);
    tracing::info!("Speech synthesis available: {}", available);
    Ok(())
}
