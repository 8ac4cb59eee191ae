#![forbid(unsafe_code)]
#![doc = "Host boundary traits for actprobe: event source registration and monotonic time."]
#![doc = ""]
#![doc = "This crate defines the boundary between the activity detector and the page it"]
#![doc = "observes. `actprobe-web` provides a host-driven implementation for tests and"]
#![doc = "embedders, and a `window`-backed one on `wasm32`."]

use core::time::Duration;

use actprobe_core::event::InputEvent;

/// Monotonic clock abstraction.
///
/// Native builds use `Instant`; wasm builds use `performance.now()`. The
/// detector never reads time any other way.
pub trait ProbeClock {
    /// Elapsed time since an unspecified epoch, monotonically non-decreasing.
    fn now_mono(&self) -> Duration;
}

impl<C: ProbeClock + ?Sized> ProbeClock for &C {
    fn now_mono(&self) -> Duration {
        (**self).now_mono()
    }
}

/// An event together with the monotonic instant it arrived at the source.
///
/// The detector applies its cooldown at `at`, not at the time it reads the
/// event, so read cadence never changes which events are sampled.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedEvent {
    pub at: Duration,
    pub event: InputEvent,
}

impl TimedEvent {
    #[must_use]
    pub const fn new(at: Duration, event: InputEvent) -> Self {
        Self { at, event }
    }
}

/// Named-event subscription and delivery.
///
/// Mirrors a DOM event target: the detector registers interest in event
/// names (`"click"`, `"keydown"`, ...) and reads back events already
/// translated to [`InputEvent`] and stamped with the clock the detector
/// uses. Only events whose name is registered are delivered.
pub trait ActivityEventSource {
    /// Platform-specific error type.
    type Error: core::fmt::Debug + core::fmt::Display;

    /// Start delivering events named `event`.
    ///
    /// Registering a name that is already registered must not duplicate
    /// delivery.
    fn add_listener(&mut self, event: &str) -> Result<(), Self::Error>;

    /// Stop delivering events named `event`, discarding any not yet read.
    fn remove_listener(&mut self, event: &str) -> Result<(), Self::Error>;

    /// Next delivered event with its arrival time, or `None` if none is
    /// pending. Events are yielded in arrival order. Never blocks.
    fn read_event(&mut self) -> Result<Option<TimedEvent>, Self::Error>;
}
