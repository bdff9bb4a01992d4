//! Hardware abstraction traits for GPIO input and positional motors.
//!
//! This module defines the interfaces that let brick-commander run
//! against real hardware on a Raspberry Pi or against the mocks in
//! [`crate::hal::mock`] on a desktop.
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`PinInput`] | Digital input pins (push buttons) |
//! | [`PositionMotor`] | Blocking positional motor moves (Build HAT style) |
//!
//! # Example
//!
//! ```rust
//! use brick_commander::traits::{PinInput, PinMode};
//! use brick_commander::hal::MockPins;
//!
//! let mut pins = MockPins::new();
//! pins.open_pin(12, PinMode::InputPullDown).unwrap();
//! assert!(!pins.read_level(12).unwrap());
//! ```

use crate::error::{HardwareError, MotorError};
use crate::monitor::PinId;

/// Input mode a pin is opened in.
///
/// Buttons on this board pull the line HIGH when pressed, so the
/// deployment opens everything in [`InputPullDown`](Self::InputPullDown).
/// Reconfiguration at runtime is not supported: a pin is opened once
/// before sampling begins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PinMode {
    /// Floating input.
    Input,
    /// Input with the internal pull-down resistor enabled.
    #[default]
    InputPullDown,
    /// Input with the internal pull-up resistor enabled.
    InputPullUp,
}

/// Digital input pin access.
///
/// Implement this for your GPIO backend. One implementor instance
/// owns all the pins it hands out; [`PinMonitor`](crate::monitor::PinMonitor)
/// takes the implementor by value and opens every monitored pin
/// before the first sweep.
///
/// # Contract
///
/// - `open_pin` is called exactly once per pin, before any read.
/// - `read_level` returns the logical level at the moment of the
///   call; `true` is HIGH. Reading an unopened pin is an error.
/// - A failed read must leave the backend usable for other pins.
pub trait PinInput {
    /// Open a pin for input in the given mode.
    fn open_pin(&mut self, pin: PinId, mode: PinMode) -> Result<(), HardwareError>;

    /// Read the current logical level of an opened pin.
    fn read_level(&mut self, pin: PinId) -> Result<bool, HardwareError>;
}

/// Which way an absolute positional move travels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PositionWay {
    /// Whichever direction reaches the target sooner.
    #[default]
    Shortest,
    /// Always travel clockwise.
    Clockwise,
    /// Always travel anticlockwise.
    AntiClockwise,
}

impl PositionWay {
    /// Returns the way as a lowercase string.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            PositionWay::Shortest => "shortest",
            PositionWay::Clockwise => "clockwise",
            PositionWay::AntiClockwise => "anticlockwise",
        }
    }

    /// Parse a way from text input.
    ///
    /// Accepts full names or single-letter abbreviations, trimmed and
    /// case-insensitive: `"shortest"`/`"s"`, `"clockwise"`/`"c"`,
    /// `"anticlockwise"`/`"a"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use brick_commander::traits::PositionWay;
    ///
    /// assert_eq!(PositionWay::from_text("shortest"), Some(PositionWay::Shortest));
    /// assert_eq!(PositionWay::from_text(" C "), Some(PositionWay::Clockwise));
    /// assert_eq!(PositionWay::from_text("a"), Some(PositionWay::AntiClockwise));
    /// assert_eq!(PositionWay::from_text("sideways"), None);
    /// ```
    pub fn from_text(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shortest" | "s" => Some(PositionWay::Shortest),
            "clockwise" | "c" => Some(PositionWay::Clockwise),
            "anticlockwise" | "a" => Some(PositionWay::AntiClockwise),
            _ => None,
        }
    }
}

/// Positional motor control, Build HAT style.
///
/// Moves are blocking when `blocking` is true: the call returns only
/// once the controller reports the move complete. Dispense routines
/// rely on this to sequence steps; a seconds-long move is normal.
///
/// # Implementation Notes
///
/// - `set_target_speed` sets the speed used by subsequent moves; the
///   Build HAT accepts -100..=100.
/// - `move_to_position` targets a position in degrees relative to the
///   encoder zero established at attach time.
/// - `move_to_absolute_position` additionally picks the travel way.
pub trait PositionMotor {
    /// Set the target speed for subsequent moves.
    fn set_target_speed(&mut self, speed: i32) -> Result<(), MotorError>;

    /// Move to a position (degrees from encoder zero).
    ///
    /// Blocks until the move completes when `blocking` is true.
    fn move_to_position(&mut self, position: i32, blocking: bool) -> Result<(), MotorError>;

    /// Move to an absolute position, travelling the given way.
    fn move_to_absolute_position(
        &mut self,
        position: i32,
        way: PositionWay,
        blocking: bool,
    ) -> Result<(), MotorError>;

    /// Current encoder position in degrees.
    fn position(&self) -> i32;
}
