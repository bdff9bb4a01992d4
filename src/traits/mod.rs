//! Trait definitions for hardware abstraction.
//!
//! The two seams that matter here:
//!
//! - [`PinInput`]: GPIO input pins (the push buttons).
//! - [`PositionMotor`]: positional motor moves (the dispensers).
//!
//! Mock implementations for both live in [`crate::hal::mock`]; a real
//! deployment supplies its own backends (Raspberry Pi GPIO, Build HAT
//! serial link).

pub mod hardware;

pub use hardware::*;
