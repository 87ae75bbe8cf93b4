//! Pin assignment and GPIO input for the six HAT buttons
//!
//! The joystick and the two keys are wired active-low: every pin is biased
//! with the internal pull-up, so an idle button reads `High` and a pressed
//! one reads `Low`.

use rppal::gpio::{Gpio, InputPin};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, error, info};

/// Logical role of an input pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Up,
    Down,
    Left,
    Right,
    Key1,
    Key2,
}

impl Role {
    /// Every role, in the order pins are sampled
    pub const ALL: [Role; 6] = [
        Role::Up,
        Role::Down,
        Role::Left,
        Role::Right,
        Role::Key1,
        Role::Key2,
    ];
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Up => write!(f, "up"),
            Role::Down => write!(f, "down"),
            Role::Left => write!(f, "left"),
            Role::Right => write!(f, "right"),
            Role::Key1 => write!(f, "key1"),
            Role::Key2 => write!(f, "key2"),
        }
    }
}

/// Logical level of a digital input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    High,
    Low,
}

impl Level {
    /// Pull-up wiring: a pressed button pulls the line low
    pub fn is_asserted(self) -> bool {
        self == Level::Low
    }
}

impl From<rppal::gpio::Level> for Level {
    fn from(level: rppal::gpio::Level) -> Self {
        match level {
            rppal::gpio::Level::High => Level::High,
            rppal::gpio::Level::Low => Level::Low,
        }
    }
}

/// Fixed role → BCM pin mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinAssignment {
    pub up: u8,
    pub down: u8,
    pub left: u8,
    pub right: u8,
    pub key1: u8,
    pub key2: u8,
}

impl PinAssignment {
    /// BCM numbering of the 1.3" LCD HAT joystick and keys
    pub const HAT: PinAssignment = PinAssignment {
        up: 5,
        down: 26,
        left: 19,
        right: 6,
        key1: 21,
        key2: 20,
    };

    pub fn pin(&self, role: Role) -> u8 {
        match role {
            Role::Up => self.up,
            Role::Down => self.down,
            Role::Left => self.left,
            Role::Right => self.right,
            Role::Key1 => self.key1,
            Role::Key2 => self.key2,
        }
    }

    pub fn pins(&self) -> impl Iterator<Item = (Role, u8)> + '_ {
        Role::ALL.into_iter().map(move |role| (role, self.pin(role)))
    }
}

/// Levels of all six pins, sampled once per poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinSnapshot {
    levels: HashMap<Role, Level>,
}

impl PinSnapshot {
    /// Snapshot with every button released
    #[cfg(test)]
    pub fn released() -> Self {
        Self {
            levels: Role::ALL.into_iter().map(|r| (r, Level::High)).collect(),
        }
    }

    /// Snapshot with only the given roles pressed
    #[cfg(test)]
    pub fn pressed(roles: &[Role]) -> Self {
        let mut snapshot = Self::released();
        for role in roles {
            snapshot.levels.insert(*role, Level::Low);
        }
        snapshot
    }

    pub fn level(&self, role: Role) -> Level {
        self.levels.get(&role).copied().unwrap_or(Level::High)
    }

    pub fn is_asserted(&self, role: Role) -> bool {
        self.level(role).is_asserted()
    }

    pub fn any_asserted(&self) -> bool {
        self.levels.values().any(|l| l.is_asserted())
    }
}

// GPIO errors
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Failed to access GPIO: {0}")]
    Gpio(#[from] rppal::gpio::Error),

    #[error("Pin {0} is not configured as input")]
    UnknownPin(u8),
}

/// Digital input facility consumed by the poller
pub trait PinReader {
    /// Current logical level of a BCM pin
    fn read_pin(&mut self, pin: u8) -> Result<Level, InputError>;

    /// Samples every role of the assignment
    fn snapshot(&mut self, assignment: &PinAssignment) -> Result<PinSnapshot, InputError> {
        let mut levels = HashMap::with_capacity(Role::ALL.len());
        for (role, pin) in assignment.pins() {
            levels.insert(role, self.read_pin(pin)?);
        }
        Ok(PinSnapshot { levels })
    }
}

/// Input pins on the Raspberry Pi header, backed by rppal
pub struct GpioPins {
    inputs: HashMap<u8, InputPin>,
}

impl GpioPins {
    /// Configures every assigned pin as input with pull-up bias
    pub fn open(assignment: &PinAssignment) -> Result<Self, InputError> {
        info!("Opening GPIO for pin assignment: {:?}", assignment);
        let gpio = match Gpio::new() {
            Ok(g) => g,
            Err(e) => {
                error!("Failed to open GPIO peripheral: {}", e);
                return Err(InputError::Gpio(e));
            }
        };

        let mut inputs = HashMap::new();
        for (role, pin) in assignment.pins() {
            let input = gpio.get(pin)?.into_input_pullup();
            debug!("Configured BCM {} ({}) as pull-up input", pin, role);
            inputs.insert(pin, input);
        }

        info!("Configured {} input pins", inputs.len());
        Ok(Self { inputs })
    }
}

impl PinReader for GpioPins {
    fn read_pin(&mut self, pin: u8) -> Result<Level, InputError> {
        self.inputs
            .get(&pin)
            .map(|input| input.read().into())
            .ok_or(InputError::UnknownPin(pin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct FixedPins(HashMap<u8, Level>);

    impl PinReader for FixedPins {
        fn read_pin(&mut self, pin: u8) -> Result<Level, InputError> {
            self.0.get(&pin).copied().ok_or(InputError::UnknownPin(pin))
        }
    }

    #[test]
    fn hat_assignment_uses_six_distinct_pins() {
        let pins: HashSet<u8> = PinAssignment::HAT.pins().map(|(_, p)| p).collect();
        assert_eq!(pins.len(), 6);
        assert_eq!(PinAssignment::HAT.pin(Role::Up), 5);
        assert_eq!(PinAssignment::HAT.pin(Role::Key2), 20);
    }

    #[test]
    fn low_level_means_pressed() {
        assert!(Level::Low.is_asserted());
        assert!(!Level::High.is_asserted());
    }

    #[test]
    fn snapshot_reads_every_role() {
        let assignment = PinAssignment::HAT;
        let mut levels: HashMap<u8, Level> =
            assignment.pins().map(|(_, p)| (p, Level::High)).collect();
        levels.insert(assignment.key1, Level::Low);
        let mut reader = FixedPins(levels);

        let snapshot = reader.snapshot(&assignment).unwrap();
        assert!(snapshot.is_asserted(Role::Key1));
        assert!(!snapshot.is_asserted(Role::Up));
        assert_eq!(snapshot, PinSnapshot::pressed(&[Role::Key1]));
    }

    #[test]
    fn snapshot_fails_on_unreadable_pin() {
        let mut reader = FixedPins(HashMap::new());
        let err = reader.snapshot(&PinAssignment::HAT).unwrap_err();
        assert!(matches!(err, InputError::UnknownPin(5)));
    }

    #[test]
    fn released_snapshot_has_nothing_asserted() {
        assert!(!PinSnapshot::released().any_asserted());
        assert!(PinSnapshot::pressed(&[Role::Left]).any_asserted());
    }
}
