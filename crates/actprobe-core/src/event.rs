#![forbid(unsafe_code)]

//! Canonical input event types.
//!
//! The host translates native page events into [`InputEvent`] before handing
//! them to the probe. Classification is then a closed `match`; nothing here
//! inspects runtime types.
//!
//! # Design Notes
//!
//! - Coordinates are viewport (client) coordinates in CSS pixels.
//! - Wheel deltas keep the host's units (pixels, lines, or pages).
//! - [`InputEvent::Other`] carries the event name of anything the host could
//!   not map; it never produces a log entry.

use crate::geometry::Point;

/// Default event names monitored by a detector.
///
/// Includes both legacy wheel names; `DOMMouseScroll` is the old Gecko name.
pub const DEFAULT_ACTIVITY_EVENTS: [&str; 9] = [
    "click",
    "mousemove",
    "keydown",
    "DOMMouseScroll",
    "mousewheel",
    "mousedown",
    "touchstart",
    "touchmove",
    "focus",
];

/// Canonical input event.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputEvent {
    /// Pointer motion, press, or click.
    Pointer(PointerInput),

    /// A key press.
    Keyboard(KeyInput),

    /// The page (or an element in it) gained focus.
    Focus,

    /// Wheel or legacy scroll.
    Wheel(WheelInput),

    /// Touch start or move.
    Touch(TouchInput),

    /// An event the host could not translate, by name.
    Other(String),
}

impl InputEvent {
    /// Pointer motion to `(x, y)`.
    #[must_use]
    pub const fn pointer_move(x: i32, y: i32) -> Self {
        Self::Pointer(PointerInput::new(PointerKind::Move, x, y))
    }

    /// Click at `(x, y)`.
    #[must_use]
    pub const fn click(x: i32, y: i32) -> Self {
        Self::Pointer(PointerInput::new(PointerKind::Click, x, y))
    }

    /// Press at `(x, y)`.
    #[must_use]
    pub const fn pointer_down(x: i32, y: i32) -> Self {
        Self::Pointer(PointerInput::new(PointerKind::Down, x, y))
    }

    /// Key press with the DOM `key` identifier.
    #[must_use]
    pub fn key(key: impl Into<String>) -> Self {
        Self::Keyboard(KeyInput { key: key.into() })
    }

    /// Wheel with the given deltas.
    #[must_use]
    pub const fn wheel(delta_x: f64, delta_y: f64) -> Self {
        Self::Wheel(WheelInput { delta_x, delta_y })
    }

    /// Touch with a single active touch point.
    #[must_use]
    pub fn touch(x: i32, y: i32) -> Self {
        Self::Touch(TouchInput {
            touches: vec![Point::new(x, y)],
        })
    }

    /// Coarse category name, used in diagnostics.
    #[must_use]
    pub fn category(&self) -> &str {
        match self {
            Self::Pointer(_) => "pointer",
            Self::Keyboard(_) => "keyboard",
            Self::Focus => "focus",
            Self::Wheel(_) => "wheel",
            Self::Touch(_) => "touch",
            Self::Other(name) => name,
        }
    }
}

/// Pointer event flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PointerKind {
    /// Motion without button change.
    Move,
    /// Completed click.
    Click,
    /// Button press.
    Down,
}

/// Pointer position and flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointerInput {
    pub kind: PointerKind,
    pub x: i32,
    pub y: i32,
}

impl PointerInput {
    /// Create a pointer input.
    #[must_use]
    pub const fn new(kind: PointerKind, x: i32, y: i32) -> Self {
        Self { kind, x, y }
    }

    /// Position as a point.
    #[must_use]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A key press.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyInput {
    /// DOM `KeyboardEvent.key` value (`"a"`, `"Enter"`, `"ArrowLeft"`, ...).
    pub key: String,
}

/// Wheel deltas.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WheelInput {
    pub delta_x: f64,
    pub delta_y: f64,
}

/// Active touch points, in the host's order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TouchInput {
    pub touches: Vec<Point>,
}

impl TouchInput {
    /// The first active touch point, if any.
    #[must_use]
    pub fn primary(&self) -> Option<Point> {
        self.touches.first().copied()
    }
}

/// Which [`InputEvent`] variant a DOM event name is expected to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventNameHint {
    Pointer(PointerKind),
    Keyboard,
    Focus,
    Wheel,
    Touch,
}

impl EventNameHint {
    /// Map a DOM event name to the variant a host should build for it.
    ///
    /// Returns `None` for names with no dedicated translation; hosts should
    /// produce [`InputEvent::Other`] for those.
    #[must_use]
    pub fn from_event_name(name: &str) -> Option<Self> {
        let hint = match name {
            "click" => Self::Pointer(PointerKind::Click),
            "mousedown" | "pointerdown" => Self::Pointer(PointerKind::Down),
            "mousemove" | "pointermove" => Self::Pointer(PointerKind::Move),
            "wheel" | "mousewheel" | "DOMMouseScroll" => Self::Wheel,
            "touchstart" | "touchmove" => Self::Touch,
            "keydown" => Self::Keyboard,
            "focus" | "focusin" => Self::Focus,
            _ => return None,
        };
        Some(hint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_build_expected_variants() {
        assert_eq!(
            InputEvent::pointer_move(3, 4),
            InputEvent::Pointer(PointerInput::new(PointerKind::Move, 3, 4))
        );
        assert_eq!(
            InputEvent::key("Enter"),
            InputEvent::Keyboard(KeyInput {
                key: "Enter".to_string()
            })
        );
        assert_eq!(
            InputEvent::touch(1, 2),
            InputEvent::Touch(TouchInput {
                touches: vec![Point::new(1, 2)]
            })
        );
    }

    #[test]
    fn touch_primary_is_first_point() {
        let touch = TouchInput {
            touches: vec![Point::new(5, 6), Point::new(7, 8)],
        };
        assert_eq!(touch.primary(), Some(Point::new(5, 6)));
        assert_eq!(TouchInput::default().primary(), None);
    }

    #[test]
    fn default_event_names_all_have_hints() {
        for name in DEFAULT_ACTIVITY_EVENTS {
            assert!(
                EventNameHint::from_event_name(name).is_some(),
                "{name} should map to a translation hint"
            );
        }
    }

    #[test]
    fn event_name_hints() {
        assert_eq!(
            EventNameHint::from_event_name("click"),
            Some(EventNameHint::Pointer(PointerKind::Click))
        );
        assert_eq!(
            EventNameHint::from_event_name("pointerdown"),
            Some(EventNameHint::Pointer(PointerKind::Down))
        );
        assert_eq!(
            EventNameHint::from_event_name("DOMMouseScroll"),
            Some(EventNameHint::Wheel)
        );
        assert_eq!(EventNameHint::from_event_name("scroll"), None);
    }

    #[test]
    fn other_category_is_its_name() {
        assert_eq!(InputEvent::Other("scroll".into()).category(), "scroll");
        assert_eq!(InputEvent::Focus.category(), "focus");
    }
}
