use tauri::AppHandle;
use tauri_plugin_opener::OpenerExt;

use crate::content::video::{self, VideoAction};

/// Tauri command: click on a video card. Plain clicks open YouTube in the
/// browser; the returned action tells the page whether to embed instead.
#[tauri::command]
pub fn activate_video(
    app_handle: AppHandle,
    video_id: Option<String>,
    modifier: bool,
) -> Result<VideoAction, String> {
    let action = video::activate(video_id.as_deref(), modifier);
    if let VideoAction::OpenExternal { url } = &action {
        app_handle
            .opener()
            .open_url(url, None::<&str>)
            .map_err(|e| e.to_string())?;
    }
    Ok(action)
}
