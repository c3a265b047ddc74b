use std::sync::Arc;
use std::time::Duration;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Instant;

use crate::backend::{Backends, BackendKind, PlayIcon, SpeechRequest, Surface};
use crate::state::PlaybackSettings;
use super::catalog::{Resolved, TrackCatalog};
use super::events::{BackendEvent, EventBus, SessionEvent};
use super::progress::{clamp_fraction, scrub_fraction, ProgressTicker, SpeechEstimate};
use super::session::{PlaybackSnapshot, PlaybackState, Session, SessionId};

/// Result of a `play` request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// A new session was created and is waiting for the backend to start
    Starting {
        session: SessionId,
        backend: BackendKind,
    },
    /// The requested track was already active and has been stopped
    ToggledOff,
    /// Neither backend can play the track
    NoSource,
    /// The backend rejected the start request
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    PauseRequested,
    ResumeRequested,
    Ignored,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Teardown {
    Stopped,
    ToggledOff,
    Superseded,
    Ended,
    Failed,
}

/// Owns the single playback session and mediates between recorded audio and
/// synthesized speech.
///
/// Every operation is synchronous. Backend callbacks come back as
/// [`SessionEvent`]s through the [`EventBus`] and are applied with
/// [`handle_event`](Self::handle_event); events tagged with any session other
/// than the active one are dropped.
pub struct PlaybackController {
    catalog: TrackCatalog,
    backends: Backends,
    surface: Surface,
    bus: EventBus,
    runtime: Handle,
    settings: PlaybackSettings,
    session: Option<Session>,
    last_session: SessionId,
}

impl PlaybackController {
    pub fn new(
        catalog: TrackCatalog,
        backends: Backends,
        surface: Surface,
        bus: EventBus,
        runtime: Handle,
        settings: PlaybackSettings,
    ) -> Self {
        Self {
            catalog,
            backends,
            surface,
            bus,
            runtime,
            settings,
            session: None,
            last_session: SessionId::new(0),
        }
    }

    pub fn catalog(&self) -> &TrackCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &PlaybackSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: PlaybackSettings) {
        self.settings = settings;
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn active_track(&self) -> Option<&str> {
        self.session.as_ref().map(Session::track_id)
    }

    pub fn state(&self) -> PlaybackState {
        self.session
            .as_ref()
            .map(Session::state)
            .unwrap_or(PlaybackState::Idle)
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot::of(self.session.as_ref())
    }

    /// Play `track_id`, or stop it if it is the active track.
    pub fn play(&mut self, track_id: &str, title: &str, artist: &str) -> PlayOutcome {
        self.surface.display.set_title(title);
        self.surface.display.set_artist(artist);

        if self.active_track() == Some(track_id) {
            self.teardown(Teardown::ToggledOff);
            return PlayOutcome::ToggledOff;
        }
        self.teardown(Teardown::Superseded);

        let speech_available = self.backends.speech.is_available();
        match self.catalog.resolve(track_id, speech_available) {
            Some(Resolved::Speech(text)) => self.start_speech(track_id, text),
            Some(Resolved::Audio(source)) => self.start_audio(track_id, &source),
            None => {
                tracing::warn!(
                    "No playable source for track '{}' (speech available: {}). Add audio/{}.mp3 or a text payload.",
                    track_id,
                    speech_available,
                    track_id
                );
                PlayOutcome::NoSource
            }
        }
    }

    /// Tear down whatever is playing. Does nothing when idle.
    pub fn stop(&mut self) {
        if self.session.is_none() {
            tracing::debug!("Stop requested while idle");
            return;
        }
        self.teardown(Teardown::Stopped);
    }

    /// Global play/pause button. Only recorded audio can pause.
    pub fn toggle(&mut self) -> ToggleOutcome {
        let state = match self.session.as_ref() {
            Some(s) if s.backend == BackendKind::RecordedAudio => s.state,
            _ => return ToggleOutcome::Ignored,
        };

        match state {
            PlaybackState::Playing => match self.backends.audio.pause() {
                Ok(()) => ToggleOutcome::PauseRequested,
                Err(e) => {
                    tracing::error!("Failed to pause audio: {:#}", e);
                    ToggleOutcome::Failed
                }
            },
            PlaybackState::Paused => match self.backends.audio.play() {
                Ok(()) => ToggleOutcome::ResumeRequested,
                Err(e) => {
                    tracing::error!("Failed to resume audio: {:#}", e);
                    self.teardown(Teardown::Failed);
                    ToggleOutcome::Failed
                }
            },
            PlaybackState::Starting | PlaybackState::Idle => ToggleOutcome::Ignored,
        }
    }

    /// Seek recorded audio to `fraction` of its reported duration.
    /// Returns false when there is nothing seekable.
    pub fn seek(&mut self, fraction: f64) -> bool {
        let timing = match self.session.as_ref() {
            Some(s) if s.backend == BackendKind::RecordedAudio => s.timing,
            _ => return false,
        };
        let Some(timing) = timing.filter(|t| t.has_duration()) else {
            return false;
        };

        let secs = clamp_fraction(fraction) * timing.duration_secs;
        let target = match Duration::try_from_secs_f64(secs) {
            Ok(target) => target,
            Err(e) => {
                tracing::warn!("Cannot seek to {}s: {}", secs, e);
                return false;
            }
        };
        match self.backends.audio.seek(target) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Seek to {:?} failed: {:#}", target, e);
                false
            }
        }
    }

    /// Seek from a pointer position along the progress bar
    pub fn scrub(&mut self, pointer_x: f64, bar_left: f64, bar_width: f64) -> bool {
        self.seek(scrub_fraction(pointer_x, bar_left, bar_width))
    }

    pub fn handle_event(&mut self, event: SessionEvent) {
        let SessionEvent { session, event } = event;
        let backend = match self.session.as_ref() {
            Some(s) if s.id == session => s.backend,
            _ => {
                tracing::debug!("Ignoring {:?} from stale session {}", event, session);
                return;
            }
        };

        match event {
            BackendEvent::Started => self.on_started(),
            BackendEvent::Paused => self.on_paused(),
            BackendEvent::Ended => self.teardown(Teardown::Ended),
            BackendEvent::TimeUpdate {
                position_secs,
                duration_secs,
            } => self.on_time_update(position_secs, duration_secs),
            BackendEvent::ProgressTick => self.on_progress_tick(),
            BackendEvent::Errored { message } => {
                match backend {
                    BackendKind::RecordedAudio => {
                        tracing::error!("Audio playback failed in session {}: {}", session, message)
                    }
                    BackendKind::SynthesizedSpeech => {
                        tracing::error!("TTS error in session {}: {}", session, message)
                    }
                }
                self.teardown(Teardown::Failed);
            }
        }
    }

    fn next_session_id(&mut self) -> SessionId {
        self.last_session = self.last_session.next();
        self.last_session
    }

    fn start_speech(&mut self, track_id: &str, text: String) -> PlayOutcome {
        let id = self.next_session_id();
        let estimate = SpeechEstimate::for_text(&text, self.settings.words_per_minute);
        let request = SpeechRequest {
            text,
            language: self.settings.speech_language.clone(),
            rate: self.settings.speech_rate,
        };

        if let Err(e) = self.backends.speech.speak(&request, self.bus.sink(id)) {
            tracing::error!("Failed to start speech for '{}': {:#}", track_id, e);
            self.backends.speech.cancel();
            return PlayOutcome::Failed;
        }

        tracing::info!(
            "Session {} speaking '{}' (estimated {:.1}s)",
            id,
            track_id,
            estimate.total().as_secs_f64()
        );
        self.session = Some(Session::spoken(id, track_id, estimate));
        PlayOutcome::Starting {
            session: id,
            backend: BackendKind::SynthesizedSpeech,
        }
    }

    fn start_audio(&mut self, track_id: &str, source: &str) -> PlayOutcome {
        let id = self.next_session_id();
        let audio = &mut self.backends.audio;

        if let Err(e) = audio.load(source, self.bus.sink(id)).and_then(|()| audio.play()) {
            tracing::error!("Error playing audio '{}' for '{}': {:#}", source, track_id, e);
            audio.unload();
            return PlayOutcome::Failed;
        }

        tracing::info!("Session {} playing '{}' from {}", id, track_id, source);
        self.session = Some(Session::recorded(id, track_id));
        PlayOutcome::Starting {
            session: id,
            backend: BackendKind::RecordedAudio,
        }
    }

    fn on_started(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !matches!(session.state, PlaybackState::Starting | PlaybackState::Paused) {
            return;
        }
        session.state = PlaybackState::Playing;

        if session.backend == BackendKind::SynthesizedSpeech && session.ticker.is_none() {
            if let Some(estimate) = session.estimate.as_mut() {
                estimate.mark_started(Instant::now());
            }
            session.ticker = Some(ProgressTicker::spawn(
                &self.runtime,
                self.bus.sink(session.id),
                self.settings.tick_interval(),
            ));
        }

        self.surface.indicators.set(&session.track_id, PlayIcon::Pause);
        self.surface.display.set_play_icon(PlayIcon::Pause);
    }

    fn on_paused(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.state != PlaybackState::Playing {
            return;
        }
        session.state = PlaybackState::Paused;
        self.surface.display.set_play_icon(PlayIcon::Play);
    }

    fn on_time_update(&mut self, position_secs: f64, duration_secs: f64) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.backend != BackendKind::RecordedAudio {
            return;
        }

        let timing = super::session::AudioTiming {
            position_secs,
            duration_secs,
        };
        session.timing = Some(timing);
        if !timing.has_duration() {
            return;
        }
        session.progress = clamp_fraction(position_secs / duration_secs);
        self.surface.display.set_progress(session.progress);
    }

    fn on_progress_tick(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.state != PlaybackState::Playing {
            return;
        }
        let Some(estimate) = session.estimate.as_ref() else {
            return;
        };
        session.progress = estimate.fraction_at(Instant::now());
        self.surface.display.set_progress(session.progress);
    }

    fn teardown(&mut self, reason: Teardown) {
        let Some(mut session) = self.session.take() else {
            return;
        };

        if let Some(ticker) = session.ticker.take() {
            ticker.cancel();
        }
        match session.backend {
            BackendKind::RecordedAudio => self.backends.audio.unload(),
            BackendKind::SynthesizedSpeech => self.backends.speech.cancel(),
        }

        self.surface.indicators.set(&session.track_id, PlayIcon::Play);
        self.surface.display.set_progress(0.0);
        self.surface.display.set_play_icon(PlayIcon::Play);

        tracing::info!(
            "Session {} for '{}' closed ({:?})",
            session.id,
            session.track_id,
            reason
        );
    }
}

/// Apply backend events to the controller until every sender is gone.
/// One consumer, so callbacks never run concurrently.
pub async fn run_event_loop(
    player: Arc<Mutex<PlaybackController>>,
    mut events: UnboundedReceiver<SessionEvent>,
) {
    while let Some(event) = events.recv().await {
        player.lock().handle_event(event);
    }
    tracing::info!("Playback event loop finished");
}
