#![forbid(unsafe_code)]

//! Cooldown-drop throttle with an explicit task slot.
//!
//! The first offer while the gate is open arms a task due `delay` later and
//! captures that offer's payload. Every offer that arrives while the task is
//! pending is dropped, not queued. When the owner polls at or after the due
//! time the task fires with the payload captured at arm time and the gate
//! reopens.
//!
//! Nothing fires on its own: the owner polls with the current time, and can
//! cancel the pending task synchronously.
//!
//! ```
//! use actprobe_core::throttle::{Throttle, ThrottleDecision};
//! use core::time::Duration;
//!
//! let mut throttle = Throttle::new(Duration::from_millis(100));
//! let t0 = Duration::ZERO;
//!
//! assert!(matches!(throttle.offer(t0, "move"), ThrottleDecision::Armed { .. }));
//! assert_eq!(throttle.offer(Duration::from_millis(10), "click"), ThrottleDecision::Dropped);
//!
//! assert_eq!(throttle.poll(Duration::from_millis(99)), None);
//! assert_eq!(throttle.poll(Duration::from_millis(100)), Some("move"));
//! assert!(!throttle.is_armed());
//! ```

use core::time::Duration;

/// Outcome of offering a payload to a [`Throttle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// The gate was open; a task is now pending until `due`.
    Armed { due: Duration },
    /// A task was already pending; the payload was discarded.
    Dropped,
}

/// A pending delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTask<A> {
    /// Monotonic instant at which the task becomes due.
    pub due: Duration,
    /// Payload captured when the task was armed.
    pub payload: A,
}

/// Cooldown-drop throttle.
///
/// # Thread Safety
///
/// Not synchronized; owned and polled from a single event loop.
#[derive(Debug, Clone)]
pub struct Throttle<A> {
    delay: Duration,
    pending: Option<ScheduledTask<A>>,
    dropped: u64,
}

impl<A> Throttle<A> {
    /// Create a throttle with the given cooldown.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            dropped: 0,
        }
    }

    /// Cooldown between arming and delivery.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether a task is pending.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Due instant of the pending task.
    #[must_use]
    pub fn due_at(&self) -> Option<Duration> {
        self.pending.as_ref().map(|task| task.due)
    }

    /// Payloads dropped since construction.
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Offer a payload at monotonic time `now`.
    pub fn offer(&mut self, now: Duration, payload: A) -> ThrottleDecision {
        if self.pending.is_some() {
            self.dropped = self.dropped.saturating_add(1);
            return ThrottleDecision::Dropped;
        }
        let due = now.saturating_add(self.delay);
        self.pending = Some(ScheduledTask { due, payload });
        ThrottleDecision::Armed { due }
    }

    /// Take the pending payload if its task is due at `now`.
    pub fn poll(&mut self, now: Duration) -> Option<A> {
        self.poll_task(now).map(|task| task.payload)
    }

    /// Take the pending task if it is due at `now`, keeping its due instant.
    pub fn poll_task(&mut self, now: Duration) -> Option<ScheduledTask<A>> {
        if self.pending.as_ref().is_some_and(|task| now >= task.due) {
            self.pending.take()
        } else {
            None
        }
    }

    /// Abort the pending task, returning it.
    pub fn cancel(&mut self) -> Option<ScheduledTask<A>> {
        self.pending.take()
    }
}
