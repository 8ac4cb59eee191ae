#![forbid(unsafe_code)]

//! Geometric primitives.

/// A point in viewport (client) coordinates.
///
/// Origin at the top-left of the page viewport, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Truncated Euclidean distance to `other`.
    #[inline]
    pub fn distance_to(self, other: Point) -> u64 {
        distance(self.x, self.y, other.x, other.y)
    }
}

/// Integer-truncated Euclidean distance between `(x1, y1)` and `(x2, y2)`.
///
/// Computes `floor(sqrt(dx² + dy²))` with an exact integer square root, so the
/// result is correct for the full `i32` coordinate range.
#[inline]
pub fn distance(x1: i32, y1: i32, x2: i32, y2: i32) -> u64 {
    let dx = (i64::from(x1) - i64::from(x2)).unsigned_abs() as u128;
    let dy = (i64::from(y1) - i64::from(y2)).unsigned_abs() as u128;
    (dx * dx + dy * dy).isqrt() as u64
}
