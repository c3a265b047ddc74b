use anyhow::Result;
use serde::{Serialize, Deserialize};
use tokio::sync::mpsc;

use super::session::SessionId;

/// Callback reported by a backend (or the progress timer) for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendEvent {
    /// Playback actually began, or resumed after a pause
    Started,
    Paused,
    Ended,
    TimeUpdate {
        position_secs: f64,
        duration_secs: f64,
    },
    Errored {
        message: String,
    },
    /// Periodic sample for the speech progress estimate
    ProgressTick,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEvent {
    pub session: SessionId,
    pub event: BackendEvent,
}

/// Sending half of the controller's event queue
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl EventBus {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// A sink that stamps every event with `session`
    pub fn sink(&self, session: SessionId) -> EventSink {
        EventSink {
            session,
            tx: self.tx.clone(),
        }
    }

    /// Forward an already tagged event, e.g. one reported by the webview
    pub fn dispatch(&self, event: SessionEvent) -> Result<()> {
        self.tx
            .send(event)
            .map_err(|_| anyhow::anyhow!("Playback event loop is not running"))
    }
}

/// Session-scoped event sender handed to a backend when it starts
#[derive(Debug, Clone)]
pub struct EventSink {
    session: SessionId,
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl EventSink {
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Returns false once the event loop has gone away
    pub fn emit(&self, event: BackendEvent) -> bool {
        self.tx
            .send(SessionEvent {
                session: self.session,
                event,
            })
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_tags_events_with_its_session() {
        let (bus, mut rx) = EventBus::channel();
        let sink = bus.sink(SessionId::new(7));

        assert!(sink.emit(BackendEvent::Started));
        let received = rx.try_recv().unwrap();
        assert_eq!(received.session, SessionId::new(7));
        assert_eq!(received.event, BackendEvent::Started);
    }

    #[test]
    fn emit_reports_closed_loop() {
        let (bus, rx) = EventBus::channel();
        let sink = bus.sink(SessionId::new(1));
        drop(rx);

        assert!(!sink.emit(BackendEvent::Ended));
        assert!(bus
            .dispatch(SessionEvent {
                session: SessionId::new(1),
                event: BackendEvent::Ended,
            })
            .is_err());
    }

    #[test]
    fn webview_payload_deserializes() {
        let json = r#"{"session":3,"event":{"kind":"time_update","position_secs":1.5,"duration_secs":60.0}}"#;
        let event: SessionEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.session, SessionId::new(3));
        assert_eq!(
            event.event,
            BackendEvent::TimeUpdate {
                position_secs: 1.5,
                duration_secs: 60.0
            }
        );
    }
}
