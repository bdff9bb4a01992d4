//! Named motor routines: dispense and calibration sequences.
//!
//! An [`Action`] is a fixed, ordered sequence of motor commands. The
//! sequences are data, not control flow. Each step blocks until the
//! motor controller reports the move complete, optionally followed by
//! a fixed settle delay. The whole sequence runs under one
//! acquisition of the motor's lock, so concurrent invocations on the
//! same motor serialize rather than interleave.
//!
//! Actions are stateless and safe to invoke repeatedly; a failed step
//! aborts the remainder of the sequence and is surfaced, never
//! retried (re-running a partially completed physical motion needs a
//! recovery protocol the controller doesn't offer).
//!
//! # Built-in routines
//!
//! | Action | Motor | Sequence |
//! |---|---|---|
//! | [`dispense_tower`] | B | 10→−160, 30→−40, 10→−5, wait 750 ms, →−180 |
//! | [`dispense_pencil`] | A | 40→−40, wait 500 ms, →0 |
//! | [`tower_calibrate`] | B | 5× (−180, settle, −170, settle), abs −180 |

use std::thread;
use std::time::Duration;

use crate::error::ActionError;
use crate::motor::{MotorHandle, MotorPort};
use crate::traits::{PositionMotor, PositionWay};

/// One step of a routine: optional speed change, blocking move,
/// optional settle delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MotorStep {
    /// Target speed to set before the move; `None` keeps the current
    /// speed.
    pub target_speed: Option<i32>,
    /// Position to move to (degrees from encoder zero).
    pub target_position: i32,
    /// Delay after the move completes, in milliseconds.
    pub wait_after_ms: u64,
}

impl MotorStep {
    /// A step that sets `speed` then moves to `position`.
    pub const fn at_speed(speed: i32, position: i32) -> Self {
        Self {
            target_speed: Some(speed),
            target_position: position,
            wait_after_ms: 0,
        }
    }

    /// A step that moves to `position` at the current speed.
    pub const fn move_to(position: i32) -> Self {
        Self {
            target_speed: None,
            target_position: position,
            wait_after_ms: 0,
        }
    }

    /// Add a settle delay after the move.
    pub const fn then_wait_ms(mut self, ms: u64) -> Self {
        self.wait_after_ms = ms;
        self
    }
}

/// Back-and-forth calibration parameters.
///
/// The motor shuttles between `zero_position` and
/// `zero_position + nudge` for `cycles` cycles with a settle delay
/// after each leg, then takes an absolute move to `zero_position` the
/// shortest way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Calibration {
    /// Number of back-and-forth cycles.
    pub cycles: u32,
    /// The position treated as mechanical zero.
    pub zero_position: i32,
    /// Offset of the far leg from zero.
    pub nudge: i32,
    /// Speed for the whole routine.
    pub target_speed: i32,
    /// Settle delay after each leg, in milliseconds.
    pub settle_ms: u64,
}

/// The body of an action: either a plain step sequence or a
/// calibration shuttle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Routine {
    /// Ordered steps, executed first to last.
    Steps(Vec<MotorStep>),
    /// Back-and-forth cycles ending in an absolute zero move.
    Calibrate(Calibration),
}

/// A named routine bound to one motor port.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Action {
    name: &'static str,
    port: MotorPort,
    routine: Routine,
}

impl Action {
    /// Define an action.
    pub fn new(name: &'static str, port: MotorPort, routine: Routine) -> Self {
        Self {
            name,
            port,
            routine,
        }
    }

    /// The action's name, e.g. `"dispense-tower"`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The motor port this action commands.
    pub fn port(&self) -> MotorPort {
        self.port
    }

    /// The routine body.
    pub fn routine(&self) -> &Routine {
        &self.routine
    }

    /// Run the routine to completion on `handle`, blocking if another
    /// routine currently holds the motor.
    ///
    /// The motor lock is held for the whole sequence.
    pub fn run<M: PositionMotor>(&self, handle: &MotorHandle<M>) -> Result<(), ActionError> {
        handle.with_motor(|motor| self.execute(motor))
    }

    /// Like [`run`](Self::run) but fails fast with
    /// [`ActionError::MotorBusy`] if the motor is held.
    pub fn try_run<M: PositionMotor>(&self, handle: &MotorHandle<M>) -> Result<(), ActionError> {
        handle
            .try_with_motor(|motor| self.execute(motor))
            .ok_or(ActionError::MotorBusy(handle.port()))?
    }

    fn execute<M: PositionMotor>(&self, motor: &mut M) -> Result<(), ActionError> {
        match &self.routine {
            Routine::Steps(steps) => {
                for (index, step) in steps.iter().enumerate() {
                    if let Some(speed) = step.target_speed {
                        motor
                            .set_target_speed(speed)
                            .map_err(|source| ActionError::Motor {
                                source,
                                step: index,
                            })?;
                    }
                    motor
                        .move_to_position(step.target_position, true)
                        .map_err(|source| ActionError::Motor {
                            source,
                            step: index,
                        })?;
                    if step.wait_after_ms > 0 {
                        thread::sleep(Duration::from_millis(step.wait_after_ms));
                    }
                }
                Ok(())
            }
            Routine::Calibrate(cal) => {
                let mut step = 0usize;
                motor
                    .set_target_speed(cal.target_speed)
                    .map_err(|source| ActionError::Motor { source, step })?;
                for _ in 0..cal.cycles {
                    motor
                        .move_to_position(cal.zero_position, true)
                        .map_err(|source| ActionError::Motor { source, step })?;
                    thread::sleep(Duration::from_millis(cal.settle_ms));
                    step += 1;
                    motor
                        .move_to_position(cal.zero_position + cal.nudge, true)
                        .map_err(|source| ActionError::Motor { source, step })?;
                    thread::sleep(Duration::from_millis(cal.settle_ms));
                    step += 1;
                }
                motor
                    .move_to_absolute_position(cal.zero_position, PositionWay::Shortest, true)
                    .map_err(|source| ActionError::Motor { source, step })
            }
        }
    }
}

// ============================================================================
// Built-in catalog
// ============================================================================

/// Candy tower dispense routine on motor B.
pub fn dispense_tower() -> Action {
    Action::new(
        "dispense-tower",
        MotorPort::B,
        Routine::Steps(vec![
            MotorStep::at_speed(10, -160),
            MotorStep::at_speed(30, -40),
            MotorStep::at_speed(10, -5).then_wait_ms(750),
            MotorStep::move_to(-180),
        ]),
    )
}

/// Pencil dispense routine on motor A.
pub fn dispense_pencil() -> Action {
    Action::new(
        "dispense-pencil",
        MotorPort::A,
        Routine::Steps(vec![
            MotorStep::at_speed(40, -40).then_wait_ms(500),
            MotorStep::move_to(0),
        ]),
    )
}

/// Tower calibration routine on motor B.
pub fn tower_calibrate() -> Action {
    Action::new(
        "tower-calibrate",
        MotorPort::B,
        Routine::Calibrate(Calibration {
            cycles: 5,
            zero_position: -180,
            nudge: 10,
            target_speed: 20,
            settle_ms: 100,
        }),
    )
}
