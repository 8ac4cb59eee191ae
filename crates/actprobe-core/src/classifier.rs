#![forbid(unsafe_code)]

//! Maps an [`InputEvent`] plus the previously recorded entry to a [`LogEntry`].
//!
//! Classification is pure. The caller owns the buffer and decides what the
//! "previous entry" is; the detector passes its most recently recorded one.

use crate::event::{InputEvent, PointerKind};
use crate::geometry::Point;
use crate::log_entry::{
    FocusEntry, KeyboardEntry, LogEntry, MOUSE_SENTINEL, PointerEntry, WheelEntry,
};

/// Build the log entry for `event`, using `prev` as context.
///
/// Returns `None` for [`InputEvent::Other`] and for touch events with no
/// active touch point.
pub fn classify(event: &InputEvent, prev: Option<&LogEntry>, timestamp_ms: u64) -> Option<LogEntry> {
    let prev_kind = prev.map(LogEntry::kind);

    let entry = match event {
        InputEvent::Pointer(pointer) => {
            let record = pointer_entry(pointer.position(), prev, timestamp_ms);
            match pointer.kind {
                PointerKind::Move => LogEntry::Move(record),
                PointerKind::Click => LogEntry::Click(record),
                PointerKind::Down => LogEntry::Down(record),
            }
        }
        InputEvent::Touch(touch) => {
            let point = touch.primary()?;
            LogEntry::Touch(pointer_entry(point, prev, timestamp_ms))
        }
        InputEvent::Keyboard(key) => LogEntry::Keydown(KeyboardEntry {
            key: key.key.clone(),
            prev_key: prev
                .and_then(LogEntry::key)
                .unwrap_or(MOUSE_SENTINEL)
                .to_string(),
            prev_kind,
            timestamp_ms,
        }),
        InputEvent::Focus => LogEntry::Focus(FocusEntry {
            prev_kind,
            timestamp_ms,
        }),
        InputEvent::Wheel(wheel) => LogEntry::Wheel(WheelEntry {
            prev_kind,
            delta_x: wheel.delta_x,
            delta_y: wheel.delta_y,
            timestamp_ms,
        }),
        InputEvent::Other(_) => return None,
    };
    Some(entry)
}

fn pointer_entry(at: Point, prev: Option<&LogEntry>, timestamp_ms: u64) -> PointerEntry {
    let prev_point = prev
        .and_then(LogEntry::as_pointer)
        .map(|p| Point::new(p.x, p.y));

    PointerEntry {
        x: at.x,
        y: at.y,
        prev_x: prev_point.map_or(0, |p| p.x),
        prev_y: prev_point.map_or(0, |p| p.y),
        distance_from_prev: prev_point.map_or(0, |p| at.distance_to(p)),
        prev_kind: prev.map(LogEntry::kind),
        timestamp_ms,
    }
}
