#![forbid(unsafe_code)]

//! Geometric primitives.

use serde::{Deserialize, Serialize};

use crate::event::PointerPosition;

/// A rectangle in CSS pixels, used for tile bounds and hit testing.
///
/// Origin is the top-left corner of the grid container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: u32,
    /// Top edge (inclusive).
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a pointer position falls inside the rectangle.
    ///
    /// Negative coordinates (pointer left of or above the container) never hit.
    #[inline]
    pub const fn contains(&self, position: PointerPosition) -> bool {
        if position.x < 0 || position.y < 0 {
            return false;
        }
        let x = position.x as u32;
        let y = position.y as u32;
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}
