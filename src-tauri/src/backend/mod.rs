#[cfg(feature = "desktop")]
pub mod bridge;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use anyhow::Result;
use serde::{Serialize, Deserialize};

use crate::player::EventSink;

/// Playback mechanism behind a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    RecordedAudio,
    SynthesizedSpeech,
}

/// Icon shown on the global play button and on per-track buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayIcon {
    Play,
    Pause,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
    pub language: String,
    pub rate: f32,
}

/// Pre-recorded audio playback. Start is a request: the backend confirms
/// through `BackendEvent::Started` on the sink it was loaded with.
pub trait AudioBackend: Send {
    fn load(&mut self, source: &str, sink: EventSink) -> Result<()>;
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
    fn seek(&mut self, position: Duration) -> Result<()>;
    /// Stop and release the loaded resource. Safe to call when nothing is loaded.
    fn unload(&mut self);
}

/// Speech synthesis. Has no pause or seek primitive.
pub trait SpeechBackend: Send {
    fn is_available(&self) -> bool;
    fn speak(&mut self, request: &SpeechRequest, sink: EventSink) -> Result<()>;
    fn cancel(&mut self);
}

/// Player chrome on the host page
pub trait DisplaySurface: Send {
    fn set_title(&self, title: &str);
    fn set_artist(&self, artist: &str);
    fn set_play_icon(&self, icon: PlayIcon);
    /// `fraction` is in [0, 1]
    fn set_progress(&self, fraction: f64);
}

/// Play button attached to one track card
pub trait TrackIndicator: Send {
    fn set_icon(&self, icon: PlayIcon);
}

/// Track id -> indicator handle, built once when the page is wired up
pub struct IndicatorMap {
    handles: HashMap<String, Box<dyn TrackIndicator>>,
}

impl IndicatorMap {
    pub fn build<'a, I, F>(track_ids: I, mut make: F) -> Self
    where
        I: IntoIterator<Item = &'a str>,
        F: FnMut(&str) -> Box<dyn TrackIndicator>,
    {
        let handles = track_ids
            .into_iter()
            .map(|id| (id.to_string(), make(id)))
            .collect();
        Self { handles }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn set(&self, track_id: &str, icon: PlayIcon) {
        match self.handles.get(track_id) {
            Some(indicator) => indicator.set_icon(icon),
            None => tracing::debug!("No indicator registered for track '{}'", track_id),
        }
    }
}

/// Whether the host can synthesize speech. Queried, never assumed.
#[derive(Debug, Clone, Default)]
pub struct SpeechCapability(Arc<AtomicBool>);

impl SpeechCapability {
    pub fn new(available: bool) -> Self {
        Self(Arc::new(AtomicBool::new(available)))
    }

    pub fn is_available(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn set_available(&self, available: bool) {
        self.0.store(available, Ordering::Release);
    }
}

/// The two backends a controller mediates between
pub struct Backends {
    pub audio: Box<dyn AudioBackend>,
    pub speech: Box<dyn SpeechBackend>,
}

impl Backends {
    pub fn new(audio: Box<dyn AudioBackend>, speech: Box<dyn SpeechBackend>) -> Self {
        Self { audio, speech }
    }
}

/// Display chrome plus the per-track buttons
pub struct Surface {
    pub display: Box<dyn DisplaySurface>,
    pub indicators: IndicatorMap,
}

impl Surface {
    pub fn new(display: Box<dyn DisplaySurface>, indicators: IndicatorMap) -> Self {
        Self { display, indicators }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct Recording(Arc<Mutex<Vec<PlayIcon>>>);

    impl TrackIndicator for Recording {
        fn set_icon(&self, icon: PlayIcon) {
            self.0.lock().push(icon);
        }
    }

    #[test]
    fn indicator_map_routes_by_track_id() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let map = IndicatorMap::build(["intro", "tip1"], |id| -> Box<dyn TrackIndicator> {
            let sink = if id == "intro" {
                log.clone()
            } else {
                Arc::new(Mutex::new(Vec::new()))
            };
            Box::new(Recording(sink))
        });

        assert_eq!(map.len(), 2);
        map.set("intro", PlayIcon::Pause);
        map.set("unknown", PlayIcon::Pause);
        assert_eq!(*log.lock(), vec![PlayIcon::Pause]);
    }

    #[test]
    fn speech_capability_is_shared() {
        let capability = SpeechCapability::new(false);
        let clone = capability.clone();
        clone.set_available(true);
        assert!(capability.is_available());
    }
}
