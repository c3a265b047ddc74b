//! Backends whose work happens in the webview. The page owns the `<audio>`
//! element and `speechSynthesis`; it receives commands as Tauri events and
//! reports callbacks back through the `report_backend_event` command.

use std::time::Duration;
use anyhow::{Context, Result};
use serde::Serialize;
use tauri::{AppHandle, Emitter};

use crate::player::{EventSink, SessionId};
use super::{
    AudioBackend, DisplaySurface, PlayIcon, SpeechBackend, SpeechCapability, SpeechRequest,
    TrackIndicator,
};

pub const AUDIO_EVENT: &str = "player://audio";
pub const SPEECH_EVENT: &str = "player://speech";
pub const DISPLAY_EVENT: &str = "player://display";
pub const INDICATOR_EVENT: &str = "player://indicator";

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
enum AudioCommand<'a> {
    Load { session: SessionId, src: &'a str },
    Play { session: SessionId },
    Pause { session: SessionId },
    Seek { session: SessionId, position_secs: f64 },
    Unload { session: SessionId },
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
enum SpeechCommand<'a> {
    Speak {
        session: SessionId,
        text: &'a str,
        lang: &'a str,
        rate: f32,
    },
    Cancel {
        session: SessionId,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
enum DisplayUpdate<'a> {
    Title(&'a str),
    Artist(&'a str),
    Icon(PlayIcon),
    Progress(f64),
}

#[derive(Debug, Clone, Serialize)]
struct IndicatorUpdate<'a> {
    track_id: &'a str,
    icon: PlayIcon,
}

pub struct WebviewAudio {
    app_handle: AppHandle,
    loaded: Option<SessionId>,
}

impl WebviewAudio {
    pub fn new(app_handle: AppHandle) -> Self {
        Self {
            app_handle,
            loaded: None,
        }
    }

    fn send(&self, command: AudioCommand<'_>) -> Result<()> {
        self.app_handle
            .emit(AUDIO_EVENT, command)
            .context("Failed to reach the audio element")
    }

    fn loaded(&self) -> Result<SessionId> {
        self.loaded.context("No audio loaded")
    }
}

impl AudioBackend for WebviewAudio {
    fn load(&mut self, source: &str, sink: EventSink) -> Result<()> {
        let session = sink.session();
        self.send(AudioCommand::Load {
            session,
            src: source,
        })?;
        self.loaded = Some(session);
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        let session = self.loaded()?;
        self.send(AudioCommand::Play { session })
    }

    fn pause(&mut self) -> Result<()> {
        let session = self.loaded()?;
        self.send(AudioCommand::Pause { session })
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        let session = self.loaded()?;
        self.send(AudioCommand::Seek {
            session,
            position_secs: position.as_secs_f64(),
        })
    }

    fn unload(&mut self) {
        if let Some(session) = self.loaded.take() {
            if let Err(e) = self.send(AudioCommand::Unload { session }) {
                tracing::warn!("{:#}", e);
            }
        }
    }
}

pub struct WebviewSpeech {
    app_handle: AppHandle,
    capability: SpeechCapability,
    speaking: Option<SessionId>,
}

impl WebviewSpeech {
    pub fn new(app_handle: AppHandle, capability: SpeechCapability) -> Self {
        Self {
            app_handle,
            capability,
            speaking: None,
        }
    }
}

impl SpeechBackend for WebviewSpeech {
    fn is_available(&self) -> bool {
        self.capability.is_available()
    }

    fn speak(&mut self, request: &SpeechRequest, sink: EventSink) -> Result<()> {
        let session = sink.session();
        self.app_handle
            .emit(
                SPEECH_EVENT,
                SpeechCommand::Speak {
                    session,
                    text: &request.text,
                    lang: &request.language,
                    rate: request.rate,
                },
            )
            .context("Failed to reach speechSynthesis")?;
        self.speaking = Some(session);
        Ok(())
    }

    fn cancel(&mut self) {
        if let Some(session) = self.speaking.take() {
            let _ = self
                .app_handle
                .emit(SPEECH_EVENT, SpeechCommand::Cancel { session });
        }
    }
}

pub struct WebviewDisplay {
    app_handle: AppHandle,
}

impl WebviewDisplay {
    pub fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }

    fn update(&self, update: DisplayUpdate<'_>) {
        let _ = self.app_handle.emit(DISPLAY_EVENT, update);
    }
}

impl DisplaySurface for WebviewDisplay {
    fn set_title(&self, title: &str) {
        self.update(DisplayUpdate::Title(title));
    }

    fn set_artist(&self, artist: &str) {
        self.update(DisplayUpdate::Artist(artist));
    }

    fn set_play_icon(&self, icon: PlayIcon) {
        self.update(DisplayUpdate::Icon(icon));
    }

    fn set_progress(&self, fraction: f64) {
        self.update(DisplayUpdate::Progress(fraction));
    }
}

pub struct WebviewIndicator {
    app_handle: AppHandle,
    track_id: String,
}

impl WebviewIndicator {
    pub fn new(app_handle: AppHandle, track_id: &str) -> Self {
        Self {
            app_handle,
            track_id: track_id.to_string(),
        }
    }
}

impl TrackIndicator for WebviewIndicator {
    fn set_icon(&self, icon: PlayIcon) {
        let _ = self.app_handle.emit(
            INDICATOR_EVENT,
            IndicatorUpdate {
                track_id: &self.track_id,
                icon,
            },
        );
    }
}
