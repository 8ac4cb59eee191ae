#![forbid(unsafe_code)]

//! Activity detector: lifecycle, sampling, and the bounded log.
//!
//! [`ActivityDetector`] owns the pieces from `actprobe-core` and wires them to
//! a host through two injected capabilities:
//!
//! - a [`ProbeClock`], the only source of time, and
//! - an optional [`ActivityEventSource`]. A detector built without one is
//!   *headless* (no page to observe); `start()` and `stop()` then log a
//!   diagnostic and do nothing.
//!
//! # Driving the detector
//!
//! Nothing happens on its own. The host calls [`ActivityDetector::tick`] from
//! its event loop (an animation frame, a timer, a test step). Each tick:
//!
//! 1. fires the scheduled auto-start if it is due,
//! 2. replays queued events in arrival order, each at its arrival instant:
//!    a sample whose cooldown ended before the arrival is recorded first,
//!    then the event is offered to the throttle,
//! 3. records the pending sample if its cooldown has ended by now.
//!
//! Which events are sampled depends only on arrival times, never on the
//! tick cadence. A sampled entry is stamped with its due instant; ticking
//! late delays when it appears in the log, not its timestamp.
//!
//! # Sessions
//!
//! `start()` opens a session and resets the start instant; timestamps are
//! milliseconds since then. `stop()` cancels any pending sample, so nothing is
//! recorded after it returns. The log and the previous-entry context survive
//! stop/start cycles; only [`ActivityDetector::clear_log`] empties the log.
//! Timestamps restart at 0 on each session, so range queries over a log that
//! spans sessions are best-effort.

use core::time::Duration;

use actprobe_backend::{ActivityEventSource, ProbeClock, TimedEvent};
use actprobe_core::classifier::classify;
use actprobe_core::event::InputEvent;
use actprobe_core::log_buffer::LogBuffer;
use actprobe_core::log_entry::LogEntry;
use actprobe_core::throttle::{Throttle, ThrottleDecision};

use crate::{DeterministicClock, WebEventSource};
use crate::config::DetectorConfig;
use crate::error::Result;

/// Lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectorState {
    #[default]
    Stopped,
    Started,
}

impl DetectorState {
    /// Short label (`"start"` / `"stop"`), as exposed to JS hosts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Stopped => "stop",
            Self::Started => "start",
        }
    }
}

/// True iff no event source is available to observe.
#[must_use]
pub fn is_headless<S>(source: Option<&S>) -> bool {
    source.is_none()
}

/// Throttled, bounded recorder of user activity.
#[derive(Debug)]
pub struct ActivityDetector<C, S> {
    config: DetectorConfig,
    clock: C,
    source: Option<S>,
    state: DetectorState,
    started_at: Option<Duration>,
    auto_start_at: Option<Duration>,
    throttle: Throttle<InputEvent>,
    log: LogBuffer,
    pre_event: Option<LogEntry>,
}

impl<C: ProbeClock, S: ActivityEventSource> ActivityDetector<C, S> {
    /// Build a detector in the stopped state.
    ///
    /// With `auto_init`, a start is scheduled `time_to_start` after now and
    /// fires from the first [`tick`](Self::tick) at or after that instant.
    pub fn new(config: DetectorConfig, clock: C, source: Option<S>) -> Result<Self> {
        config.validate()?;
        let auto_start_at = config
            .auto_init
            .then(|| clock.now_mono().saturating_add(config.time_to_start()));

        if source.is_none() {
            tracing::debug!("activity detector constructed without an event source");
        }

        Ok(Self {
            throttle: Throttle::new(config.sampling_time()),
            log: LogBuffer::new(config.log_stack_max_length),
            config,
            clock,
            source,
            state: DetectorState::Stopped,
            started_at: None,
            auto_start_at,
            pre_event: None,
        })
    }

    /// Open a session and register listeners for every configured event.
    ///
    /// No-op when headless or already started. Cancels a scheduled auto-start.
    pub fn start(&mut self) {
        self.auto_start_at = None;
        let Some(source) = self.source.as_mut() else {
            tracing::error!("activity detector has no event source; start ignored");
            return;
        };
        if self.state == DetectorState::Started {
            tracing::debug!("activity detector already started");
            return;
        }

        self.started_at = Some(self.clock.now_mono());
        self.state = DetectorState::Started;
        for name in &self.config.activity_events {
            if let Err(err) = source.add_listener(name) {
                tracing::warn!(event = %name, error = %err, "failed to register listener");
            }
        }
        tracing::info!(
            events = self.config.activity_events.len(),
            capacity = self.log.capacity(),
            sampling_ms = self.config.sampling_time_ms,
            "activity detector started"
        );
    }

    /// Close the session, drop any pending sample, and unregister listeners.
    ///
    /// No-op when headless or already stopped. The log is kept.
    pub fn stop(&mut self) {
        self.auto_start_at = None;
        let Some(source) = self.source.as_mut() else {
            tracing::error!("activity detector has no event source; stop ignored");
            return;
        };
        if self.state == DetectorState::Stopped {
            tracing::debug!("activity detector already stopped");
            return;
        }

        self.started_at = None;
        self.state = DetectorState::Stopped;
        if let Some(task) = self.throttle.cancel() {
            tracing::debug!(category = task.payload.category(), "pending sample cancelled");
        }
        for name in &self.config.activity_events {
            if let Err(err) = source.remove_listener(name) {
                tracing::warn!(event = %name, error = %err, "failed to unregister listener");
            }
        }
        tracing::info!(retained = self.log.len(), "activity detector stopped");
    }

    /// Advance the detector to the clock's current time.
    pub fn tick(&mut self) {
        let now = self.clock.now_mono();
        if self.auto_start_at.is_some_and(|due| now >= due) {
            tracing::debug!("scheduled start is due");
            self.start();
        }
        self.drain_source(now);
        self.record_due(now);
    }

    /// Offer one already-translated event arriving now, bypassing the source
    /// queue. Events already queued are replayed first.
    ///
    /// Ignored while stopped.
    pub fn dispatch(&mut self, event: InputEvent) {
        let now = self.clock.now_mono();
        self.drain_source(now);
        self.record_due(now);
        self.offer(now, event);
    }

    /// Empty the log. Lifecycle state and previous-entry context are untouched.
    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Entries within `pre_time_ms` of the newest entry, or the whole log.
    ///
    /// See [`LogBuffer::since_last`].
    #[must_use]
    pub fn get_pre_time_log(&self, pre_time_ms: Option<u64>) -> Vec<LogEntry> {
        self.log.since_last(pre_time_ms)
    }

    /// Entries between two exact timestamps, or the whole log.
    ///
    /// See [`LogBuffer::range`] for bound handling.
    #[must_use]
    pub fn get_log(&self, start_ms: Option<u64>, end_ms: Option<u64>) -> Vec<LogEntry> {
        self.log.range(start_ms, end_ms)
    }

    /// Milliseconds since the session started, or 0 while stopped.
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms_at(self.clock.now_mono())
    }

    fn offer(&mut self, now: Duration, event: InputEvent) {
        if self.state != DetectorState::Started {
            tracing::trace!(category = event.category(), "event ignored while stopped");
            return;
        }
        let category = event.category().to_owned();
        match self.throttle.offer(now, event) {
            ThrottleDecision::Armed { due } => {
                tracing::debug!(category = %category, due_ms = millis(due), "sample armed");
            }
            ThrottleDecision::Dropped => {
                tracing::trace!(category = %category, "event dropped during cooldown");
            }
        }
    }

    fn record_due(&mut self, now: Duration) {
        let Some(task) = self.throttle.poll_task(now) else {
            return;
        };
        let event = task.payload;
        let timestamp_ms = self.elapsed_ms_at(task.due);
        match classify(&event, self.pre_event.as_ref(), timestamp_ms) {
            Some(entry) => {
                tracing::debug!(kind = %entry.kind(), timestamp_ms, "entry recorded");
                if let Some(oldest) = self.log.push(entry.clone()) {
                    tracing::trace!(timestamp_ms = oldest.timestamp_ms(), "oldest entry evicted");
                }
                self.pre_event = Some(entry);
            }
            None => {
                tracing::trace!(category = event.category(), "unrecognized event dropped");
            }
        }
    }

    fn drain_source(&mut self, now: Duration) {
        loop {
            let Some(source) = self.source.as_mut() else {
                return;
            };
            match source.read_event() {
                Ok(Some(TimedEvent { at, event })) => {
                    // Arrivals stamped after `now` are treated as arriving now.
                    let at = at.min(now);
                    self.record_due(at);
                    self.offer(at, event);
                }
                Ok(None) => return,
                Err(err) => {
                    tracing::warn!(error = %err, "event source read failed");
                    return;
                }
            }
        }
    }

    fn elapsed_ms_at(&self, now: Duration) -> u64 {
        self.started_at
            .map_or(0, |start| millis(now.saturating_sub(start)))
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl<C, S> ActivityDetector<C, S> {
    #[must_use]
    pub const fn state(&self) -> DetectorState {
        self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == DetectorState::Started
    }

    /// Whether the detector was built without an event source.
    #[must_use]
    pub fn is_headless(&self) -> bool {
        is_headless(self.source.as_ref())
    }

    /// Whether a scheduled auto-start has not fired yet.
    #[must_use]
    pub const fn auto_start_pending(&self) -> bool {
        self.auto_start_at.is_some()
    }

    /// Whether a sampled event is waiting out its cooldown.
    #[must_use]
    pub const fn sample_pending(&self) -> bool {
        self.throttle.is_armed()
    }

    /// Most recently recorded entry.
    #[must_use]
    pub const fn pre_event(&self) -> Option<&LogEntry> {
        self.pre_event.as_ref()
    }

    /// Read-only view of the log.
    #[must_use]
    pub const fn log(&self) -> &LogBuffer {
        &self.log
    }

    #[must_use]
    pub const fn config(&self) -> &DetectorConfig {
        &self.config
    }

    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    #[must_use]
    pub const fn source(&self) -> Option<&S> {
        self.source.as_ref()
    }

    pub fn source_mut(&mut self) -> Option<&mut S> {
        self.source.as_mut()
    }
}

impl<C: ProbeClock> ActivityDetector<C, WebEventSource> {
    /// Deliver an event to the host-driven source, stamped with the clock's
    /// current time. Returns `false` when headless, when nothing listens for
    /// `name`, or when the source queue is full.
    pub fn push_event(&mut self, name: &str, event: InputEvent) -> bool {
        let now = self.clock.now_mono();
        self.source
            .as_mut()
            .is_some_and(|source| source.push_event(name, now, event))
    }
}

impl<S: ActivityEventSource> ActivityDetector<DeterministicClock, S> {
    /// Advance the deterministic clock by `dt`, then [`tick`](Self::tick).
    pub fn advance_time(&mut self, dt: Duration) {
        self.clock.advance(dt);
        self.tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WebEventSource;
    use actprobe_core::log_entry::EventKind;

    type TestDetector = ActivityDetector<DeterministicClock, WebEventSource>;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn manual() -> TestDetector {
        let config = DetectorConfig::default().with_auto_init(false);
        ActivityDetector::new(config, DeterministicClock::new(), Some(WebEventSource::new()))
            .expect("default config is valid")
    }

    #[test]
    fn millis_saturates_instead_of_truncating() {
        assert_eq!(millis(ms(250)), 250);
        assert_eq!(millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn constructed_stopped() {
        let detector = manual();
        assert_eq!(detector.state(), DetectorState::Stopped);
        assert!(!detector.is_headless());
        assert!(!detector.auto_start_pending());
        assert!(detector.log().is_empty());
        assert_eq!(detector.elapsed_ms(), 0);
    }

    #[test]
    fn start_registers_every_configured_event() {
        let mut detector = manual();
        detector.start();
        assert!(detector.is_running());
        let source = detector.source().unwrap();
        for name in &detector.config().activity_events {
            assert!(source.is_listening(name), "{name} should be registered");
        }
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let mut detector = manual();
        detector.start();
        detector.advance_time(ms(50));
        detector.start();
        // Second start did not reset the session.
        assert_eq!(detector.elapsed_ms(), 50);

        detector.stop();
        detector.stop();
        assert_eq!(detector.state(), DetectorState::Stopped);
        assert_eq!(detector.source().unwrap().listeners().count(), 0);
    }

    #[test]
    fn sampled_entry_stamped_at_fire_time() {
        let mut detector = manual();
        detector.start();
        assert!(detector.push_event("mousemove", InputEvent::pointer_move(5, 5)));
        detector.tick();
        assert!(detector.sample_pending());
        assert!(detector.log().is_empty());

        detector.advance_time(ms(100));
        let entries = detector.get_log(None, None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind(), EventKind::Move);
        assert_eq!(entries[0].timestamp_ms(), 100);
        assert_eq!(detector.pre_event(), Some(&entries[0]));
    }

    #[test]
    fn queued_arrivals_are_throttled_at_arrival_time() {
        let mut detector = manual();
        detector.start();
        assert!(detector.push_event("mousemove", InputEvent::pointer_move(1, 1)));
        detector.clock_mut().advance(ms(10));
        assert!(detector.push_event("click", InputEvent::click(2, 2)));
        detector.clock_mut().advance(ms(140));
        assert!(detector.push_event("keydown", InputEvent::key("k")));

        // One late tick replays all three arrivals.
        detector.advance_time(ms(500));
        let entries = detector.get_log(None, None);
        let kinds: Vec<_> = entries.iter().map(LogEntry::kind).collect();
        assert_eq!(kinds, vec![EventKind::Move, EventKind::Keydown]);
        assert_eq!(entries[0].timestamp_ms(), 100);
        assert_eq!(entries[1].timestamp_ms(), 250);
    }

    #[test]
    fn headless_push_is_rejected() {
        let config = DetectorConfig::default().with_auto_init(false);
        let mut detector: TestDetector =
            ActivityDetector::new(config, DeterministicClock::new(), None).unwrap();
        assert!(!detector.push_event("click", InputEvent::click(0, 0)));
    }

    #[test]
    fn stop_cancels_pending_sample() {
        let mut detector = manual();
        detector.start();
        detector.dispatch(InputEvent::key("a"));
        assert!(detector.sample_pending());
        detector.stop();
        assert!(!detector.sample_pending());
        detector.advance_time(ms(1_000));
        assert!(detector.log().is_empty());
    }

    #[test]
    fn dispatch_ignored_while_stopped() {
        let mut detector = manual();
        detector.dispatch(InputEvent::Focus);
        detector.advance_time(ms(200));
        assert!(detector.log().is_empty());
        assert!(detector.pre_event().is_none());
    }

    #[test]
    fn unrecognized_event_consumes_window_without_recording() {
        let mut detector = manual();
        detector.start();
        detector.dispatch(InputEvent::Other("scroll".into()));
        detector.dispatch(InputEvent::Focus);
        detector.advance_time(ms(100));
        assert!(detector.log().is_empty());
        assert!(detector.pre_event().is_none());
        assert!(!detector.sample_pending());
    }

    #[test]
    fn auto_init_starts_on_first_due_tick() {
        let config = DetectorConfig::default().with_time_to_start(ms(30));
        let mut detector: TestDetector =
            ActivityDetector::new(config, DeterministicClock::new(), Some(WebEventSource::new()))
                .unwrap();
        assert!(detector.auto_start_pending());
        detector.advance_time(ms(29));
        assert!(!detector.is_running());
        detector.advance_time(ms(1));
        assert!(detector.is_running());
        assert!(!detector.auto_start_pending());
        assert_eq!(detector.elapsed_ms(), 0);
    }

    #[test]
    fn explicit_stop_cancels_scheduled_start() {
        let config = DetectorConfig::default().with_time_to_start(ms(30));
        let mut detector: TestDetector =
            ActivityDetector::new(config, DeterministicClock::new(), Some(WebEventSource::new()))
                .unwrap();
        detector.stop();
        detector.advance_time(ms(100));
        assert!(!detector.is_running());
    }

    #[test]
    fn headless_start_and_stop_are_noops() {
        let config = DetectorConfig::default().with_auto_init(false);
        let mut detector: TestDetector =
            ActivityDetector::new(config, DeterministicClock::new(), None).unwrap();
        assert!(detector.is_headless());
        detector.start();
        assert_eq!(detector.state(), DetectorState::Stopped);
        detector.stop();
        assert_eq!(detector.state(), DetectorState::Stopped);
    }

    #[test]
    fn invalid_config_rejected() {
        let config = DetectorConfig::default().with_log_stack_max_length(0);
        let result: Result<TestDetector> =
            ActivityDetector::new(config, DeterministicClock::new(), Some(WebEventSource::new()));
        assert!(result.is_err());
    }

    #[test]
    fn state_labels() {
        assert_eq!(DetectorState::Started.label(), "start");
        assert_eq!(DetectorState::Stopped.label(), "stop");
    }

    #[test]
    fn is_headless_guard() {
        assert!(is_headless::<WebEventSource>(None));
        assert!(!is_headless(Some(&WebEventSource::new())));
    }
}
