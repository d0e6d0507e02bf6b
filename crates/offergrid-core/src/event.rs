#![forbid(unsafe_code)]

//! Pointer vocabulary shared by mouse and touch input.
//!
//! Browsers deliver mouse and touch gestures through different event families.
//! Hosts normalize both into these types before handing them to the drag
//! machinery, so nothing downstream needs to know which device was used.

use serde::{Deserialize, Serialize};

/// Input device that produced a pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

impl PointerKind {
    /// Whether the host must hit-test to learn which element is under the
    /// contact point (touch events keep targeting the element they started on).
    #[must_use]
    pub const fn requires_hit_test(self) -> bool {
        matches!(self, Self::Touch | Self::Pen)
    }
}

/// Mouse button (or the implicit primary contact for touch and pen).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

impl PointerButton {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub const fn from_dom(button: i16) -> Option<Self> {
        match button {
            0 => Some(Self::Primary),
            1 => Some(Self::Middle),
            2 => Some(Self::Secondary),
            _ => None,
        }
    }
}

/// Pointer position relative to the grid container, in CSS pixels.
///
/// Signed so positions left of or above the container stay representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

impl PointerPosition {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_button_codes() {
        assert_eq!(PointerButton::from_dom(0), Some(PointerButton::Primary));
        assert_eq!(PointerButton::from_dom(1), Some(PointerButton::Middle));
        assert_eq!(PointerButton::from_dom(2), Some(PointerButton::Secondary));
        assert_eq!(PointerButton::from_dom(3), None);
        assert_eq!(PointerButton::from_dom(-1), None);
    }

    #[test]
    fn touch_needs_hit_test() {
        assert!(PointerKind::Touch.requires_hit_test());
        assert!(PointerKind::Pen.requires_hit_test());
        assert!(!PointerKind::Mouse.requires_hit_test());
    }

    #[test]
    fn pointer_kind_serializes_snake_case() {
        let json = serde_json::to_string(&PointerKind::Touch).expect("serialize");
        assert_eq!(json, "\"touch\"");
    }
}
