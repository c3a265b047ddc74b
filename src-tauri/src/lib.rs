pub mod backend;
pub mod content;
pub mod error;
pub mod persistence;
pub mod player;
pub mod state;

#[cfg(feature = "desktop")]
mod commands;

#[cfg(feature = "desktop")]
pub use desktop::run;

#[cfg(feature = "desktop")]
mod desktop {
    use std::sync::Arc;
    use tauri::Manager;

    use crate::backend::bridge::{WebviewAudio, WebviewDisplay, WebviewIndicator, WebviewSpeech};
    use crate::backend::{Backends, IndicatorMap, SpeechCapability, Surface, TrackIndicator};
    use crate::commands;
    use crate::persistence::{self, JsonFileStorage, Storage, TauriStore};
    use crate::player::{self, EventBus, PlaybackController, TrackCatalog};
    use crate::state::AppState;

    #[cfg_attr(mobile, tauri::mobile_entry_point)]
    pub fn run() {
        tracing_subscriber::fmt::init();

        tracing::info!("Starting The Break v{}", env!("CARGO_PKG_VERSION"));

        tauri::Builder::default()
            .plugin(tauri_plugin_opener::init())
            .plugin(tauri_plugin_store::Builder::new().build())
            .invoke_handler(tauri::generate_handler![
                commands::player::play_track,
                commands::player::stop_playback,
                commands::player::toggle_playback,
                commands::player::scrub_playback,
                commands::player::get_playback,
                commands::player::report_backend_event,
                commands::player::set_speech_available,
                commands::stories::submit_story,
                commands::stories::list_stories,
                commands::newsletter::subscribe_newsletter,
                commands::newsletter::newsletter_status,
                commands::navigation::show_section,
                commands::video::activate_video,
                commands::settings::get_settings,
                commands::settings::update_settings,
                commands::settings::get_app_version,
            ])
            .setup(|app| {
                let handle = app.handle().clone();

                let storage = open_storage(&handle);
                let settings = persistence::load_settings(storage.as_ref());
                tracing::info!("Settings loaded from store");

                // The webview reports its speechSynthesis support once loaded
                let speech = SpeechCapability::new(false);
                let catalog = TrackCatalog::builtin();
                let indicators =
                    IndicatorMap::build(catalog.track_ids(), |id| -> Box<dyn TrackIndicator> {
                        Box::new(WebviewIndicator::new(handle.clone(), id))
                    });
                let backends = Backends::new(
                    Box::new(WebviewAudio::new(handle.clone())),
                    Box::new(WebviewSpeech::new(handle.clone(), speech.clone())),
                );
                let surface = Surface::new(Box::new(WebviewDisplay::new(handle.clone())), indicators);

                let (events, rx) = EventBus::channel();
                let runtime =
                    tauri::async_runtime::block_on(async { tokio::runtime::Handle::current() });
                let controller = PlaybackController::new(
                    catalog,
                    backends,
                    surface,
                    events.clone(),
                    runtime,
                    settings.playback.clone(),
                );

                let state = AppState::new(controller, events, speech, settings, storage);
                tauri::async_runtime::spawn(player::run_event_loop(state.player.clone(), rx));
                app.manage(state);

                tracing::info!("App setup complete");
                Ok(())
            })
            .run(tauri::generate_context!())
            .expect("error while running tauri application");
    }

    fn open_storage(app_handle: &tauri::AppHandle) -> Arc<dyn Storage> {
        match TauriStore::open(app_handle) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::warn!("Failed to open plugin store: {:#}. Trying the data directory.", e);
                persistence::file_or_memory(JsonFileStorage::default_path())
            }
        }
    }
}
