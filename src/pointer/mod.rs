//! Pointer-control facility
//!
//! The poller only needs three operations from the host pointer: read the
//! absolute position, move to an absolute position and click a button at a
//! position. [`PointerControl`] captures exactly that, [`enigo_pointer`]
//! implements it for the desktop session the HAT is attached to.

pub mod enigo_pointer;

pub use enigo_pointer::EnigoPointer;

use std::fmt;

/// Mouse button emitted by a click key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Button 1
    Primary,
    /// Button 2
    Secondary,
}

impl PointerButton {
    pub fn id(self) -> u8 {
        match self {
            PointerButton::Primary => 1,
            PointerButton::Secondary => 2,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(PointerButton::Primary),
            2 => Some(PointerButton::Secondary),
            _ => None,
        }
    }
}

impl fmt::Display for PointerButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "button {}", self.id())
    }
}

// Pointer errors
#[derive(Debug, thiserror::Error)]
pub enum PointerError {
    #[error("Failed to connect to pointer backend: {0}")]
    Connection(String),

    #[error("Failed to read pointer position: {0}")]
    Position(String),

    #[error("Failed to move pointer to ({x}, {y}): {reason}")]
    Move { x: i32, y: i32, reason: String },

    #[error("Failed to click {button}: {reason}")]
    Click {
        button: PointerButton,
        reason: String,
    },
}

/// Absolute pointer control
pub trait PointerControl {
    fn position(&mut self) -> Result<(i32, i32), PointerError>;

    fn move_to(&mut self, x: i32, y: i32) -> Result<(), PointerError>;

    /// Places the pointer at `(x, y)` and clicks `button` there
    fn click(&mut self, x: i32, y: i32, button: PointerButton) -> Result<(), PointerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_ids_match_click_keys() {
        assert_eq!(PointerButton::Primary.id(), 1);
        assert_eq!(PointerButton::Secondary.id(), 2);
        assert_eq!(PointerButton::Secondary.to_string(), "button 2");
        for button in [PointerButton::Primary, PointerButton::Secondary] {
            assert_eq!(PointerButton::from_id(button.id()), Some(button));
        }
        assert_eq!(PointerButton::from_id(0), None);
        assert_eq!(PointerButton::from_id(3), None);
    }
}
