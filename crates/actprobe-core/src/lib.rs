#![forbid(unsafe_code)]

//! Core: input events, log entries, throttling, and bounded history.
//!
//! # Role in actprobe
//! `actprobe-core` is the platform-independent half of the probe. It owns the
//! normalized [`event::InputEvent`] the host translates native events into,
//! the tagged [`log_entry::LogEntry`] record, and the algorithms that turn a
//! stream of events into a bounded, queryable history.
//!
//! # Primary responsibilities
//! - **InputEvent**: closed set of pointer, keyboard, focus, wheel, and touch inputs.
//! - **Throttle**: cooldown-drop sampling with an explicit, cancellable task slot.
//! - **Classifier**: maps an input plus the previous entry to a `LogEntry`.
//! - **LogBuffer**: fixed-capacity FIFO with range queries over timestamps.
//!
//! # How it fits in the system
//! `actprobe-web` owns the lifecycle (start/stop, clock, event source) and
//! drives these pieces. Nothing here reads a clock or touches a host API;
//! time always arrives as an argument.

pub mod classifier;
pub mod event;
pub mod geometry;
pub mod log_buffer;
pub mod log_entry;
pub mod search;
pub mod throttle;

pub use classifier::classify;
pub use event::{
    DEFAULT_ACTIVITY_EVENTS, EventNameHint, InputEvent, KeyInput, PointerInput, PointerKind,
    TouchInput, WheelInput,
};
pub use geometry::{Point, distance};
pub use log_buffer::{DEFAULT_LOG_CAPACITY, LogBuffer};
pub use log_entry::{
    EventKind, FocusEntry, KeyboardEntry, LogEntry, MOUSE_SENTINEL, PointerEntry, WheelEntry,
};
pub use throttle::{ScheduledTask, Throttle, ThrottleDecision};
