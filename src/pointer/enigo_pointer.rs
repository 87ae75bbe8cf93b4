use super::{PointerButton, PointerControl, PointerError};
use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};
use tracing::{debug, error, info};

/// Host pointer driven through enigo
pub struct EnigoPointer {
    enigo: Enigo,
}

impl EnigoPointer {
    pub fn connect() -> Result<Self, PointerError> {
        info!("Connecting to pointer backend");
        let enigo = match Enigo::new(&Settings::default()) {
            Ok(e) => e,
            Err(e) => {
                error!("Failed to connect to pointer backend: {}", e);
                return Err(PointerError::Connection(e.to_string()));
            }
        };
        info!("Pointer backend connected");
        Ok(Self { enigo })
    }
}

fn map_button(button: PointerButton) -> Button {
    match button {
        PointerButton::Primary => Button::Left,
        PointerButton::Secondary => Button::Right,
    }
}

impl PointerControl for EnigoPointer {
    fn position(&mut self) -> Result<(i32, i32), PointerError> {
        self.enigo
            .location()
            .map_err(|e| PointerError::Position(e.to_string()))
    }

    fn move_to(&mut self, x: i32, y: i32) -> Result<(), PointerError> {
        self.enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|e| PointerError::Move {
                x,
                y,
                reason: e.to_string(),
            })
    }

    fn click(&mut self, x: i32, y: i32, button: PointerButton) -> Result<(), PointerError> {
        self.move_to(x, y)?;
        debug!("Clicking {} at ({}, {})", button, x, y);
        self.enigo
            .button(map_button(button), Direction::Click)
            .map_err(|e| PointerError::Click {
                button,
                reason: e.to_string(),
            })
    }
}
