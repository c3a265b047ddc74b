use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use super::events::{BackendEvent, EventSink};

pub const DEFAULT_WORDS_PER_MINUTE: u32 = 150;
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(200);

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Clamp to [0, 1]; NaN maps to 0
pub fn clamp_fraction(fraction: f64) -> f64 {
    if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    }
}

/// Fraction of `total` covered by `elapsed`. A zero-length estimate is complete.
pub fn elapsed_fraction(elapsed: Duration, total: Duration) -> f64 {
    if total.is_zero() {
        return 1.0;
    }
    clamp_fraction(elapsed.as_secs_f64() / total.as_secs_f64())
}

/// Fraction along a progress bar for a pointer at `pointer_x`
pub fn scrub_fraction(pointer_x: f64, bar_left: f64, bar_width: f64) -> f64 {
    if !bar_width.is_finite() || bar_width <= 0.0 {
        return 0.0;
    }
    clamp_fraction((pointer_x - bar_left) / bar_width)
}

/// Wall-clock estimate of how long speech synthesis takes for a text.
/// Speech engines give no position signal, so this is never corrected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeechEstimate {
    total: Duration,
    started_at: Option<Instant>,
}

impl SpeechEstimate {
    pub fn for_text(text: &str, words_per_minute: u32) -> Self {
        let wpm = if words_per_minute == 0 {
            DEFAULT_WORDS_PER_MINUTE
        } else {
            words_per_minute
        };
        let minutes = word_count(text) as f64 / wpm as f64;
        Self {
            total: Duration::from_secs_f64(minutes * 60.0),
            started_at: None,
        }
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn mark_started(&mut self, at: Instant) {
        self.started_at = Some(at);
    }

    pub fn fraction_at(&self, now: Instant) -> f64 {
        match self.started_at {
            Some(start) => elapsed_fraction(now.saturating_duration_since(start), self.total),
            None => 0.0,
        }
    }
}

/// Repeating timer that posts `ProgressTick` for one speech session
#[derive(Debug)]
pub struct ProgressTicker {
    handle: JoinHandle<()>,
}

impl ProgressTicker {
    pub fn spawn(runtime: &Handle, sink: EventSink, period: Duration) -> Self {
        let handle = runtime.spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                if !sink.emit(BackendEvent::ProgressTick) {
                    break;
                }
            }
        });
        Self { handle }
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::events::EventBus;
    use crate::player::session::SessionId;

    #[test]
    fn counts_words_across_any_whitespace() {
        assert_eq!(word_count("uno  dos\ntres\tcuatro "), 4);
        assert_eq!(word_count("   "), 0);
    }

    #[test]
    fn estimate_uses_words_per_minute() {
        let text = vec!["palabra"; 150].join(" ");
        let estimate = SpeechEstimate::for_text(&text, 150);
        assert_eq!(estimate.total(), Duration::from_secs(60));

        let fast = SpeechEstimate::for_text(&text, 300);
        assert_eq!(fast.total(), Duration::from_secs(30));
    }

    #[test]
    fn zero_wpm_falls_back_to_default() {
        let text = vec!["x"; 75].join(" ");
        assert_eq!(
            SpeechEstimate::for_text(&text, 0).total(),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn fraction_is_clamped() {
        let total = Duration::from_secs(10);
        assert_eq!(elapsed_fraction(Duration::from_secs(5), total), 0.5);
        assert_eq!(elapsed_fraction(Duration::from_secs(3600), total), 1.0);
        assert_eq!(elapsed_fraction(Duration::ZERO, Duration::ZERO), 1.0);
        assert_eq!(clamp_fraction(-0.2), 0.0);
        assert_eq!(clamp_fraction(f64::NAN), 0.0);
    }

    #[test]
    fn unstarted_estimate_reports_zero() {
        let estimate = SpeechEstimate::for_text("hola mundo", 150);
        assert_eq!(estimate.fraction_at(Instant::now()), 0.0);
    }

    #[test]
    fn scrub_fraction_maps_pointer_to_bar() {
        assert_eq!(scrub_fraction(150.0, 100.0, 200.0), 0.25);
        assert_eq!(scrub_fraction(50.0, 100.0, 200.0), 0.0);
        assert_eq!(scrub_fraction(400.0, 100.0, 200.0), 1.0);
        assert_eq!(scrub_fraction(150.0, 100.0, 0.0), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_posts_ticks_until_cancelled() {
        let (bus, mut rx) = EventBus::channel();
        let ticker = ProgressTicker::spawn(
            &Handle::current(),
            bus.sink(SessionId::new(4)),
            DEFAULT_TICK_INTERVAL,
        );

        time::sleep(Duration::from_millis(650)).await;
        let mut ticks = 0;
        while let Ok(event) = rx.try_recv() {
            assert_eq!(event.session, SessionId::new(4));
            assert_eq!(event.event, BackendEvent::ProgressTick);
            ticks += 1;
        }
        assert_eq!(ticks, 3);

        ticker.cancel();
        time::sleep(Duration::from_secs(2)).await;
        assert!(rx.try_recv().is_err());
        assert!(ticker.is_finished());
    }
}
