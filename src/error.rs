//! Error types for the hardware, motor, action, and monitor layers.
//!
//! Each layer owns a small enum; outer layers wrap inner ones rather
//! than flattening everything into a single crate-wide error.

use core::fmt;

use crate::monitor::PinId;
use crate::motor::MotorPort;

// ============================================================================
// HardwareError
// ============================================================================

/// A GPIO backend failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HardwareError {
    /// The pin could not be opened for input.
    PinUnavailable(PinId),
    /// The pin was read before being opened.
    PinNotConfigured(PinId),
    /// A configured pin failed to report its level.
    ReadFailed(PinId),
}

impl fmt::Display for HardwareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HardwareError::PinUnavailable(pin) => {
                write!(f, "pin {pin} could not be opened for input")
            }
            HardwareError::PinNotConfigured(pin) => {
                write!(f, "pin {pin} was not configured before use")
            }
            HardwareError::ReadFailed(pin) => write!(f, "failed to read level of pin {pin}"),
        }
    }
}

impl std::error::Error for HardwareError {}

// ============================================================================
// MotorError
// ============================================================================

/// A motor controller failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MotorError {
    /// No motor is attached on the addressed port.
    NotAttached(MotorPort),
    /// The controller rejected or failed a move.
    MoveFailed(String),
    /// Speed outside the -100 to 100 range.
    InvalidSpeed(i32),
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::NotAttached(port) => write!(f, "no motor attached on port {port}"),
            MotorError::MoveFailed(reason) => write!(f, "motor move failed: {reason}"),
            MotorError::InvalidSpeed(speed) => {
                write!(f, "speed {speed} is outside the -100 to 100 range")
            }
        }
    }
}

impl std::error::Error for MotorError {}

// ============================================================================
// ActionError
// ============================================================================

/// A routine that did not run to completion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionError {
    /// A motor call failed partway through the sequence.
    Motor {
        /// The underlying controller failure.
        source: MotorError,
        /// Index of the step that failed, from 0.
        step: usize,
    },
    /// The target motor is held by another routine (fail-fast path only).
    MotorBusy(MotorPort),
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::Motor { source, step } => {
                write!(f, "routine failed at step {step}: {source}")
            }
            ActionError::MotorBusy(port) => write!(f, "motor on port {port} is busy"),
        }
    }
}

impl std::error::Error for ActionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ActionError::Motor { source, .. } => Some(source),
            ActionError::MotorBusy(_) => None,
        }
    }
}

// ============================================================================
// MonitorError
// ============================================================================

/// A pin monitor startup failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MonitorError {
    /// The monitor was already started once.
    AlreadyRunning,
    /// A monitored pin could not be opened.
    Hardware(HardwareError),
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorError::AlreadyRunning => f.write_str("pin monitor is already running"),
            MonitorError::Hardware(e) => write!(f, "pin monitor startup failed: {e}"),
        }
    }
}

impl std::error::Error for MonitorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MonitorError::AlreadyRunning => None,
            MonitorError::Hardware(e) => Some(e),
        }
    }
}

impl From<HardwareError> for MonitorError {
    fn from(e: HardwareError) -> Self {
        MonitorError::Hardware(e)
    }
}
