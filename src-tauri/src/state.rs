use std::sync::Arc;
use std::time::Duration;
use parking_lot::Mutex;
use serde::{Serialize, Deserialize};

use crate::backend::SpeechCapability;
use crate::content::navigation::Navigator;
use crate::content::newsletter::Newsletter;
use crate::content::stories::StoryBoard;
use crate::persistence::Storage;
use crate::player::{EventBus, PlaybackController};
use crate::player::progress::{DEFAULT_TICK_INTERVAL, DEFAULT_WORDS_PER_MINUTE};

pub struct AppState {
    pub player: Arc<Mutex<PlaybackController>>,
    pub events: EventBus,
    pub speech: SpeechCapability,
    pub settings: Mutex<Settings>,
    pub navigator: Mutex<Navigator>,
    pub stories: StoryBoard,
    pub newsletter: Newsletter,
    pub storage: Arc<dyn Storage>,
}

impl AppState {
    pub fn new(
        player: PlaybackController,
        events: EventBus,
        speech: SpeechCapability,
        settings: Settings,
        storage: Arc<dyn Storage>,
    ) -> Self {
        let navigator = Navigator::builtin(&settings.general.default_section);
        let stories = StoryBoard::new(storage.clone(), settings.storage.stories_limit);
        let newsletter = Newsletter::new(storage.clone());
        Self {
            player: Arc::new(Mutex::new(player)),
            events,
            speech,
            settings: Mutex::new(settings),
            navigator: Mutex::new(navigator),
            stories,
            newsletter,
            storage,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub playback: PlaybackSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub general: GeneralSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSettings {
    pub speech_language: String,
    pub speech_rate: f32,
    pub words_per_minute: u32,
    pub progress_interval_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            speech_language: "es-ES".to_string(),
            speech_rate: 1.0,
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            progress_interval_ms: DEFAULT_TICK_INTERVAL.as_millis() as u64,
        }
    }
}

impl PlaybackSettings {
    pub fn tick_interval(&self) -> Duration {
        if self.progress_interval_ms == 0 {
            DEFAULT_TICK_INTERVAL
        } else {
            Duration::from_millis(self.progress_interval_ms)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Oldest stories beyond this are dropped on save
    pub stories_limit: usize,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self { stories_limit: 200 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralSettings {
    pub default_section: String,
    pub feedback_clear_ms: u64,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            default_section: "home".to_string(),
            feedback_clear_ms: 4000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_fill_in_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"playback":{"speech_language":"es-MX","speech_rate":1.2,"words_per_minute":120,"progress_interval_ms":0}}"#)
                .unwrap();
        assert_eq!(settings.playback.speech_language, "es-MX");
        assert_eq!(settings.playback.tick_interval(), DEFAULT_TICK_INTERVAL);
        assert_eq!(settings.storage.stories_limit, 200);
        assert_eq!(settings.general.default_section, "home");
    }
}
