//! Narration playback: one session at a time, backed by either a recording
//! or speech synthesis.

pub mod catalog;
pub mod controller;
pub mod events;
pub mod progress;
pub mod session;

pub use catalog::{Resolved, TrackCatalog, TrackSource};
pub use controller::{run_event_loop, PlayOutcome, PlaybackController, ToggleOutcome};
pub use events::{BackendEvent, EventBus, EventSink, SessionEvent};
pub use session::{PlaybackSnapshot, PlaybackState, Session, SessionId};
