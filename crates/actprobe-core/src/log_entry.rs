#![forbid(unsafe_code)]

//! Normalized, timestamped interaction records.
//!
//! With the `serde` feature a [`LogEntry`] serializes as a flat JSON object
//! tagged by `type`, using the field names consumers of the probe's log
//! already read:
//!
//! ```text
//! {"type":"mousemove","x":12,"y":30,"preX":0,"preY":0,"changeDistance":0,"timestamp":100}
//! {"type":"keydown","key":"a","preKey":"mouse","preType":"mousemove","timestamp":240}
//! ```

/// Sentinel `prev_key` for keyboard entries not preceded by another key press.
pub const MOUSE_SENTINEL: &str = "mouse";

/// Coarse kind of a recorded entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    #[cfg_attr(feature = "serde", serde(rename = "mousemove"))]
    Move,
    #[cfg_attr(feature = "serde", serde(rename = "click"))]
    Click,
    #[cfg_attr(feature = "serde", serde(rename = "mousedown"))]
    Down,
    #[cfg_attr(feature = "serde", serde(rename = "keydown"))]
    Keydown,
    #[cfg_attr(feature = "serde", serde(rename = "wheel"))]
    Wheel,
    #[cfg_attr(feature = "serde", serde(rename = "touch"))]
    Touch,
    #[cfg_attr(feature = "serde", serde(rename = "focus"))]
    Focus,
}

impl EventKind {
    /// Wire name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Move => "mousemove",
            Self::Click => "click",
            Self::Down => "mousedown",
            Self::Keydown => "keydown",
            Self::Wheel => "wheel",
            Self::Touch => "touch",
            Self::Focus => "focus",
        }
    }

    /// Whether entries of this kind carry coordinates.
    #[must_use]
    pub const fn is_pointer_like(self) -> bool {
        matches!(self, Self::Move | Self::Click | Self::Down | Self::Touch)
    }
}

impl core::fmt::Display for EventKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pointer or touch record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PointerEntry {
    pub x: i32,
    pub y: i32,
    /// Previous entry's `x`, or 0 when it had no coordinates.
    #[cfg_attr(feature = "serde", serde(rename = "preX"))]
    pub prev_x: i32,
    /// Previous entry's `y`, or 0 when it had no coordinates.
    #[cfg_attr(feature = "serde", serde(rename = "preY"))]
    pub prev_y: i32,
    /// Truncated distance from the previous pointer-like entry, else 0.
    #[cfg_attr(feature = "serde", serde(rename = "changeDistance"))]
    pub distance_from_prev: u64,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "preType", default, skip_serializing_if = "Option::is_none")
    )]
    pub prev_kind: Option<EventKind>,
    #[cfg_attr(feature = "serde", serde(rename = "timestamp"))]
    pub timestamp_ms: u64,
}

/// Key press record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyboardEntry {
    pub key: String,
    /// Previous key, or [`MOUSE_SENTINEL`] if the previous entry was not a key press.
    #[cfg_attr(feature = "serde", serde(rename = "preKey"))]
    pub prev_key: String,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "preType", default, skip_serializing_if = "Option::is_none")
    )]
    pub prev_kind: Option<EventKind>,
    #[cfg_attr(feature = "serde", serde(rename = "timestamp"))]
    pub timestamp_ms: u64,
}

/// Focus record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FocusEntry {
    #[cfg_attr(
        feature = "serde",
        serde(rename = "preType", default, skip_serializing_if = "Option::is_none")
    )]
    pub prev_kind: Option<EventKind>,
    #[cfg_attr(feature = "serde", serde(rename = "timestamp"))]
    pub timestamp_ms: u64,
}

/// Wheel record.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WheelEntry {
    #[cfg_attr(
        feature = "serde",
        serde(rename = "preType", default, skip_serializing_if = "Option::is_none")
    )]
    pub prev_kind: Option<EventKind>,
    #[cfg_attr(feature = "serde", serde(rename = "deltaX"))]
    pub delta_x: f64,
    #[cfg_attr(feature = "serde", serde(rename = "deltaY"))]
    pub delta_y: f64,
    #[cfg_attr(feature = "serde", serde(rename = "timestamp"))]
    pub timestamp_ms: u64,
}

/// A single normalized record of one user interaction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum LogEntry {
    #[cfg_attr(feature = "serde", serde(rename = "mousemove"))]
    Move(PointerEntry),
    #[cfg_attr(feature = "serde", serde(rename = "click"))]
    Click(PointerEntry),
    #[cfg_attr(feature = "serde", serde(rename = "mousedown"))]
    Down(PointerEntry),
    #[cfg_attr(feature = "serde", serde(rename = "touch"))]
    Touch(PointerEntry),
    #[cfg_attr(feature = "serde", serde(rename = "keydown"))]
    Keydown(KeyboardEntry),
    #[cfg_attr(feature = "serde", serde(rename = "focus"))]
    Focus(FocusEntry),
    #[cfg_attr(feature = "serde", serde(rename = "wheel"))]
    Wheel(WheelEntry),
}

impl LogEntry {
    /// Kind tag of this entry.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Move(_) => EventKind::Move,
            Self::Click(_) => EventKind::Click,
            Self::Down(_) => EventKind::Down,
            Self::Touch(_) => EventKind::Touch,
            Self::Keydown(_) => EventKind::Keydown,
            Self::Focus(_) => EventKind::Focus,
            Self::Wheel(_) => EventKind::Wheel,
        }
    }

    /// Milliseconds since detector start (0 when recorded while stopped).
    #[must_use]
    pub const fn timestamp_ms(&self) -> u64 {
        match self {
            Self::Move(e) | Self::Click(e) | Self::Down(e) | Self::Touch(e) => e.timestamp_ms,
            Self::Keydown(e) => e.timestamp_ms,
            Self::Focus(e) => e.timestamp_ms,
            Self::Wheel(e) => e.timestamp_ms,
        }
    }

    /// Kind of the entry recorded before this one.
    #[must_use]
    pub const fn prev_kind(&self) -> Option<EventKind> {
        match self {
            Self::Move(e) | Self::Click(e) | Self::Down(e) | Self::Touch(e) => e.prev_kind,
            Self::Keydown(e) => e.prev_kind,
            Self::Focus(e) => e.prev_kind,
            Self::Wheel(e) => e.prev_kind,
        }
    }

    /// Pointer payload for pointer and touch entries.
    #[must_use]
    pub const fn as_pointer(&self) -> Option<&PointerEntry> {
        match self {
            Self::Move(e) | Self::Click(e) | Self::Down(e) | Self::Touch(e) => Some(e),
            _ => None,
        }
    }

    /// Key pressed, for keyboard entries.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Keydown(e) => Some(&e.key),
            _ => None,
        }
    }
}
