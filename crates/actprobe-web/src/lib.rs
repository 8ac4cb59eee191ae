#![forbid(unsafe_code)]

//! `actprobe-web` runs the activity detector against a page.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment delivers events through an
//!   [`ActivityEventSource`] and drives [`ActivityDetector::tick`].
//! - **Deterministic time**: tests and replays advance a [`DeterministicClock`]
//!   explicitly; browsers use [`SystemClock`].
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! On `wasm32` the crate also exports [`BrowserEventSource`], which listens on
//! the global `window`, and the `ActivityProbe` JS binding.

pub mod config;
pub mod detector;
pub mod error;

#[cfg(target_arch = "wasm32")]
pub mod browser;
#[cfg(target_arch = "wasm32")]
mod wasm;

use core::time::Duration;
use std::collections::VecDeque;

pub use actprobe_backend::{ActivityEventSource, ProbeClock, TimedEvent};
use actprobe_core::event::InputEvent;

#[cfg(target_arch = "wasm32")]
pub use browser::{BrowserEventSource, window_absent};
pub use config::DetectorConfig;
pub use detector::{ActivityDetector, DetectorState, is_headless};
pub use error::{DetectorError, Result};
#[cfg(target_arch = "wasm32")]
pub use wasm::ActivityProbe;

/// Default bound on events delivered but not yet read.
///
/// Only the first arrival of each cooldown window is ever recorded, so a
/// queue this deep covers many windows between reads.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Read a JS millisecond argument with JS truthiness.
///
/// `0`, negative, and non-finite numbers count as "not given". Positive
/// fractions are truncated, so `0.5` becomes `Some(0)`.
#[must_use]
pub fn millis_from_js(value: Option<f64>) -> Option<u64> {
    value
        .filter(|ms| ms.is_finite() && *ms > 0.0)
        .map(|ms| ms.trunc() as u64)
}

/// Host-driven event source error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebSourceError {
    /// Listener names must be non-empty.
    InvalidEventName,
}

impl core::fmt::Display for WebSourceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidEventName => f.write_str("event name must not be empty"),
        }
    }
}

impl std::error::Error for WebSourceError {}

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

impl ProbeClock for DeterministicClock {
    fn now_mono(&self) -> Duration {
        self.now
    }
}

/// Wall clock backed by `performance.now()` on wasm and `Instant` elsewhere.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: web_time::Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: web_time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ProbeClock for SystemClock {
    fn now_mono(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Host-driven event source.
///
/// The host pushes `(name, arrival, event)`; like a DOM target with no
/// matching listener, events whose name is not registered are rejected.
/// The queue is bounded: once full, new arrivals are counted as overflow and
/// discarded until the detector reads.
#[derive(Debug, Clone)]
pub struct WebEventSource {
    listeners: Vec<String>,
    queue: VecDeque<(String, TimedEvent)>,
    capacity: usize,
    rejected: u64,
    overflowed: u64,
}

impl Default for WebEventSource {
    fn default() -> Self {
        Self::with_queue_capacity(DEFAULT_QUEUE_CAPACITY)
    }
}

impl WebEventSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Source holding at most `capacity` unread events (minimum 1).
    #[must_use]
    pub fn with_queue_capacity(capacity: usize) -> Self {
        Self {
            listeners: Vec::new(),
            queue: VecDeque::new(),
            capacity: capacity.max(1),
            rejected: 0,
            overflowed: 0,
        }
    }

    /// Deliver an event that arrived at monotonic time `at`.
    ///
    /// Returns `false` if nothing listens for `name` or the queue is full.
    pub fn push_event(&mut self, name: &str, at: Duration, event: InputEvent) -> bool {
        if !self.is_listening(name) {
            self.rejected = self.rejected.saturating_add(1);
            return false;
        }
        if self.queue.len() >= self.capacity {
            self.overflowed = self.overflowed.saturating_add(1);
            return false;
        }
        self.queue
            .push_back((name.to_string(), TimedEvent::new(at, event)));
        true
    }

    #[must_use]
    pub fn is_listening(&self, name: &str) -> bool {
        self.listeners.iter().any(|listener| listener == name)
    }

    /// Registered event names, in registration order.
    pub fn listeners(&self) -> impl Iterator<Item = &str> + '_ {
        self.listeners.iter().map(String::as_str)
    }

    /// Events delivered but not yet read.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Maximum number of unread events.
    #[must_use]
    pub const fn queue_capacity(&self) -> usize {
        self.capacity
    }

    /// Events rejected for lack of a listener.
    #[must_use]
    pub const fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Events discarded because the queue was full.
    #[must_use]
    pub const fn overflowed(&self) -> u64 {
        self.overflowed
    }
}

impl ActivityEventSource for WebEventSource {
    type Error = WebSourceError;

    fn add_listener(&mut self, event: &str) -> core::result::Result<(), Self::Error> {
        if event.is_empty() {
            return Err(WebSourceError::InvalidEventName);
        }
        if !self.is_listening(event) {
            self.listeners.push(event.to_string());
        }
        Ok(())
    }

    fn remove_listener(&mut self, event: &str) -> core::result::Result<(), Self::Error> {
        self.listeners.retain(|listener| listener != event);
        self.queue.retain(|(name, _)| name != event);
        Ok(())
    }

    fn read_event(&mut self) -> core::result::Result<Option<TimedEvent>, Self::Error> {
        Ok(self.queue.pop_front().map(|(_, event)| event))
    }
}
