use std::fmt;
use serde::{Serialize, Deserialize};

use crate::backend::BackendKind;
use super::progress::{ProgressTicker, SpeechEstimate};

/// Version tag for one playback attempt. Every backend callback carries the
/// id of the session it was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(u64);

impl SessionId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Idle,
    Starting,
    Playing,
    Paused,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Last position/duration pair reported by the recorded-audio backend, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioTiming {
    pub position_secs: f64,
    pub duration_secs: f64,
}

impl AudioTiming {
    /// Media elements report NaN or zero until metadata is loaded
    pub fn has_duration(&self) -> bool {
        self.duration_secs.is_finite() && self.duration_secs > 0.0
    }
}

/// Bookkeeping for the single active playback attempt
#[derive(Debug)]
pub struct Session {
    pub(crate) id: SessionId,
    pub(crate) track_id: String,
    pub(crate) backend: BackendKind,
    pub(crate) state: PlaybackState,
    pub(crate) progress: f64,
    pub(crate) timing: Option<AudioTiming>,
    pub(crate) estimate: Option<SpeechEstimate>,
    pub(crate) ticker: Option<ProgressTicker>,
}

impl Session {
    pub(crate) fn recorded(id: SessionId, track_id: &str) -> Self {
        Self::new(id, track_id, BackendKind::RecordedAudio, None)
    }

    pub(crate) fn spoken(id: SessionId, track_id: &str, estimate: SpeechEstimate) -> Self {
        Self::new(id, track_id, BackendKind::SynthesizedSpeech, Some(estimate))
    }

    fn new(
        id: SessionId,
        track_id: &str,
        backend: BackendKind,
        estimate: Option<SpeechEstimate>,
    ) -> Self {
        Self {
            id,
            track_id: track_id.to_string(),
            backend,
            state: PlaybackState::Starting,
            progress: 0.0,
            timing: None,
            estimate,
            ticker: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn track_id(&self) -> &str {
        &self.track_id
    }

    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn has_ticker(&self) -> bool {
        self.ticker.is_some()
    }
}

/// Serializable view of the controller for the host page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackSnapshot {
    pub session: Option<SessionId>,
    pub track_id: Option<String>,
    pub backend: Option<BackendKind>,
    pub state: PlaybackState,
    pub progress: f64,
}

impl PlaybackSnapshot {
    pub(crate) fn of(session: Option<&Session>) -> Self {
        match session {
            Some(s) => Self {
                session: Some(s.id),
                track_id: Some(s.track_id.clone()),
                backend: Some(s.backend),
                state: s.state,
                progress: s.progress,
            },
            None => Self {
                session: None,
                track_id: None,
                backend: None,
                state: PlaybackState::Idle,
                progress: 0.0,
            },
        }
    }
}
