//! # brick-commander
//!
//! A dispenser brick controller: physical GPIO buttons and a web
//! remote both trigger fixed motor routines on a Build HAT style
//! motor controller.
//!
//! ## Features
//!
//! - **Hardware abstraction**: Traits for GPIO input and positional
//!   motors, with desktop mocks
//! - **Pin monitoring**: Background polling loop emitting one pulse
//!   per HIGH sample per sweep (hold-to-repeat by design)
//! - **Action routing**: A trigger-to-action table built once; both
//!   buttons and remote commands resolve through it
//! - **Per-motor mutual exclusion**: An action's whole step sequence
//!   runs under one lock acquisition, so two triggers for the same
//!   motor serialize instead of interleaving
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without
//! hardware:
//!
//! - `traits` - Hardware abstractions (pins, motors)
//! - `hal` - Mock implementations for testing
//! - `motor` - Motor handles, locking, and the brick that owns them
//! - `actions` - Dispense and calibration routines as step data
//! - `router` - Trigger-to-action dispatch
//! - `monitor` - Background pin polling
//! - `services` - Button-to-dispatch wiring and the HTTP facade
//!
//! ## Example
//!
//! ```rust
//! use brick_commander::{
//!     hal::MockMotor,
//!     motor::{Brick, MotorPort},
//!     router::{ActionRouter, ButtonColor, Trigger},
//! };
//!
//! // Build the brick and attach the dispenser motors
//! let mut brick = Brick::new();
//! brick.attach_motor(MotorPort::A, MockMotor::new());
//! brick.attach_motor(MotorPort::B, MockMotor::new());
//!
//! // Route a button press to its routine
//! let router = ActionRouter::new(brick);
//! router.dispatch(Trigger::Button(ButtonColor::Black)).unwrap();
//! ```

#![warn(missing_docs)]

/// Dispense and calibration routines expressed as step data.
pub mod actions;
/// Deployment configuration: pin bindings, poll interval, web.
pub mod config;
/// Error types for every subsystem.
pub mod error;
/// Mock hardware implementations for testing.
pub mod hal;
/// Background GPIO pin monitor.
pub mod monitor;
/// Motor ports, handles, and the brick.
pub mod motor;
/// Trigger-to-action routing and dispatch.
pub mod router;
/// Wiring services: button pump and the HTTP facade.
pub mod services;
/// Core traits for hardware abstraction.
pub mod traits;

// Re-exports for convenience
pub use actions::{
    dispense_pencil, dispense_tower, tower_calibrate, Action, Calibration, MotorStep, Routine,
};
pub use config::{Config, PinBinding, WebConfig};
pub use error::{ActionError, HardwareError, MonitorError, MotorError};
pub use monitor::{PinEvent, PinId, PinMonitor};
pub use motor::{Brick, MotorHandle, MotorPort};
pub use router::{ActionRouter, ButtonColor, DispatchOutcome, RemoteCommand, Trigger};
pub use services::ButtonDispatcher;
pub use traits::{PinInput, PinMode, PositionMotor, PositionWay};
