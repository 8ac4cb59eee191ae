#![forbid(unsafe_code)]

//! `window`-backed event source. Only compiled on `wasm32` targets.
//!
//! Each registered name gets one closure attached to `window`. The closure
//! translates the native event into an [`InputEvent`], stamps it with the
//! detector's clock, and queues it; the detector replays the queue on its
//! next tick. The queue is bounded by [`DEFAULT_QUEUE_CAPACITY`] and counts
//! what it discards. Closures are kept so that removal detaches the exact
//! function that was attached.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use actprobe_backend::{ActivityEventSource, ProbeClock, TimedEvent};
use actprobe_core::event::{EventNameHint, InputEvent, PointerInput, TouchInput};
use actprobe_core::geometry::Point;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, KeyboardEvent, MouseEvent, TouchEvent, WheelEvent, Window};

use crate::{DEFAULT_QUEUE_CAPACITY, SystemClock};

type Queue = Rc<RefCell<VecDeque<(String, TimedEvent)>>>;

/// True iff there is no global `window` (worker, server-side render).
#[must_use]
pub fn window_absent() -> bool {
    web_sys::window().is_none()
}

#[derive(Debug, thiserror::Error)]
pub enum BrowserSourceError {
    #[error("addEventListener failed for {event}: {message}")]
    Attach { event: String, message: String },

    #[error("removeEventListener failed for {event}: {message}")]
    Detach { event: String, message: String },
}

/// Event source listening on the global `window`.
pub struct BrowserEventSource {
    window: Window,
    clock: SystemClock,
    queue: Queue,
    overflowed: Rc<Cell<u64>>,
    listeners: HashMap<String, Closure<dyn FnMut(Event)>>,
}

impl BrowserEventSource {
    /// Attach to the global `window`, or `None` when there is none.
    ///
    /// `clock` must be the detector's clock (or a copy of it) so arrival
    /// stamps share its epoch.
    #[must_use]
    pub fn attach(clock: SystemClock) -> Option<Self> {
        let window = web_sys::window()?;
        Some(Self {
            window,
            clock,
            queue: Rc::new(RefCell::new(VecDeque::new())),
            overflowed: Rc::new(Cell::new(0)),
            listeners: HashMap::new(),
        })
    }

    /// Events discarded because the queue was full.
    #[must_use]
    pub fn overflowed(&self) -> u64 {
        self.overflowed.get()
    }
}

impl core::fmt::Debug for BrowserEventSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BrowserEventSource")
            .field("listeners", &self.listeners.keys().collect::<Vec<_>>())
            .field("pending", &self.queue.borrow().len())
            .field("overflowed", &self.overflowed.get())
            .finish()
    }
}

impl ActivityEventSource for BrowserEventSource {
    type Error = BrowserSourceError;

    fn add_listener(&mut self, event: &str) -> Result<(), Self::Error> {
        if self.listeners.contains_key(event) {
            return Ok(());
        }
        let queue = Rc::clone(&self.queue);
        let overflowed = Rc::clone(&self.overflowed);
        let clock = self.clock;
        let name = event.to_string();
        let closure = Closure::<dyn FnMut(Event)>::new(move |native: Event| {
            let mut queue = queue.borrow_mut();
            if queue.len() >= DEFAULT_QUEUE_CAPACITY {
                overflowed.set(overflowed.get().saturating_add(1));
                return;
            }
            let timed = TimedEvent::new(clock.now_mono(), translate(&name, &native));
            queue.push_back((name.clone(), timed));
        });
        self.window
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(|err| BrowserSourceError::Attach {
                event: event.to_string(),
                message: format!("{err:?}"),
            })?;
        self.listeners.insert(event.to_string(), closure);
        Ok(())
    }

    fn remove_listener(&mut self, event: &str) -> Result<(), Self::Error> {
        self.queue.borrow_mut().retain(|(name, _)| name != event);
        let Some(closure) = self.listeners.remove(event) else {
            return Ok(());
        };
        self.window
            .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(|err| BrowserSourceError::Detach {
                event: event.to_string(),
                message: format!("{err:?}"),
            })
    }

    fn read_event(&mut self) -> Result<Option<TimedEvent>, Self::Error> {
        Ok(self.queue.borrow_mut().pop_front().map(|(_, event)| event))
    }
}

impl Drop for BrowserEventSource {
    fn drop(&mut self) {
        for (event, closure) in self.listeners.drain() {
            let _ = self
                .window
                .remove_event_listener_with_callback(&event, closure.as_ref().unchecked_ref());
        }
    }
}

/// Translate a native event registered under `name`.
///
/// `WheelEvent` is a `MouseEvent` subtype, so wheel names are matched before
/// pointer names are considered.
fn translate(name: &str, native: &Event) -> InputEvent {
    let other = || InputEvent::Other(name.to_string());
    match EventNameHint::from_event_name(name) {
        Some(EventNameHint::Wheel) => {
            // Legacy `DOMMouseScroll` is not a WheelEvent; record it without deltas.
            let (dx, dy) = native
                .dyn_ref::<WheelEvent>()
                .map_or((0.0, 0.0), |wheel| (wheel.delta_x(), wheel.delta_y()));
            InputEvent::wheel(dx, dy)
        }
        Some(EventNameHint::Pointer(kind)) => match native.dyn_ref::<MouseEvent>() {
            Some(mouse) => {
                InputEvent::Pointer(PointerInput::new(kind, mouse.client_x(), mouse.client_y()))
            }
            None => other(),
        },
        Some(EventNameHint::Keyboard) => match native.dyn_ref::<KeyboardEvent>() {
            Some(key) => InputEvent::key(key.key()),
            None => other(),
        },
        Some(EventNameHint::Focus) => InputEvent::Focus,
        Some(EventNameHint::Touch) => match native.dyn_ref::<TouchEvent>() {
            Some(touch) => {
                let list = touch.touches();
                let touches = (0..list.length())
                    .filter_map(|index| list.get(index))
                    .map(|point| Point::new(point.client_x(), point.client_y()))
                    .collect();
                InputEvent::Touch(TouchInput { touches })
            }
            None => other(),
        },
        None => other(),
    }
}
