//! Trigger-to-action routing.
//!
//! [`ActionRouter`] translates a symbolic [`Trigger`] (a physical
//! button or a named remote command) into an [`Action`] invocation.
//! The mapping table is constructed once and looked up per event,
//! never re-derived. Both the button path and the remote facade call
//! [`dispatch`](ActionRouter::dispatch) concurrently; per-motor
//! serialization lives in the [`MotorHandle`](crate::motor::MotorHandle)
//! lock the action runs under.
//!
//! # Contention policy
//!
//! `dispatch` **blocks**: a second caller targeting a busy motor waits
//! for the running routine to finish, then runs its own in full. Use
//! [`try_dispatch`](ActionRouter::try_dispatch) for fail-fast callers;
//! it rejects with [`ActionError::MotorBusy`] instead of waiting.
//!
//! # Default mapping
//!
//! | Trigger | Action |
//! |---|---|
//! | button black | dispense-tower |
//! | button blue | (unbound, reserved) |
//! | button yellow | dispense-pencil |
//! | button red | (unbound, reserved) |
//! | remote tower-dispense | dispense-tower |
//! | remote pencil-dispense | dispense-pencil |
//! | remote tower-calibrate | tower-calibrate |
//!
//! Unbound triggers are logged and ignored: a no-op `Ok`, by the
//! forward-compatibility policy for buttons with no action yet.

use core::fmt;
use std::sync::Arc;

use crate::actions::{dispense_pencil, dispense_tower, tower_calibrate, Action};
use crate::error::{ActionError, MotorError};
use crate::motor::Brick;
use crate::traits::PositionMotor;

/// Physical button identity, by bezel color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ButtonColor {
    /// Black button (pin 12 in the deployment).
    Black,
    /// Blue button (pin 13).
    Blue,
    /// Yellow button (pin 18).
    Yellow,
    /// Red button (pin 19).
    Red,
}

impl ButtonColor {
    /// Returns the color as a lowercase string.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ButtonColor::Black => "black",
            ButtonColor::Blue => "blue",
            ButtonColor::Yellow => "yellow",
            ButtonColor::Red => "red",
        }
    }
}

impl fmt::Display for ButtonColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named remote command, as exposed by the web facade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum RemoteCommand {
    /// Dispense from the candy tower.
    TowerDispense,
    /// Dispense a pencil.
    PencilDispense,
    /// Calibrate the candy tower.
    TowerCalibrate,
}

impl RemoteCommand {
    /// Returns the command as a kebab-case string.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            RemoteCommand::TowerDispense => "tower-dispense",
            RemoteCommand::PencilDispense => "pencil-dispense",
            RemoteCommand::TowerCalibrate => "tower-calibrate",
        }
    }
}

impl fmt::Display for RemoteCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The symbolic cause selecting an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// A physical button pulse.
    Button(ButtonColor),
    /// A remote request through the facade.
    Remote(RemoteCommand),
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Button(color) => write!(f, "button {color}"),
            Trigger::Remote(cmd) => write!(f, "remote {cmd}"),
        }
    }
}

/// What a dispatch did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The mapped action ran to completion.
    Completed {
        /// Name of the action that ran.
        action: &'static str,
    },
    /// No action is bound to the trigger; nothing ran.
    Ignored,
}

/// Routes triggers to actions and executes them.
///
/// Cheap to clone; clones share the route table and the brick's motor
/// handles, so every clone participates in the same per-motor
/// serialization.
pub struct ActionRouter<M: PositionMotor> {
    routes: Arc<Vec<(Trigger, Action)>>,
    brick: Brick<M>,
}

impl<M: PositionMotor> Clone for ActionRouter<M> {
    fn clone(&self) -> Self {
        Self {
            routes: Arc::clone(&self.routes),
            brick: self.brick.clone(),
        }
    }
}

impl<M: PositionMotor> ActionRouter<M> {
    /// Create a router over `brick` with the default mapping.
    pub fn new(brick: Brick<M>) -> Self {
        Self::with_routes(brick, Self::default_routes())
    }

    /// Create a router with an explicit mapping table.
    pub fn with_routes(brick: Brick<M>, routes: Vec<(Trigger, Action)>) -> Self {
        Self {
            routes: Arc::new(routes),
            brick,
        }
    }

    /// The deployment's mapping table.
    ///
    /// Blue and red buttons are deliberately absent: they are wired
    /// and monitored but reserved, so their pulses fall through to
    /// the ignored path.
    pub fn default_routes() -> Vec<(Trigger, Action)> {
        vec![
            (Trigger::Button(ButtonColor::Black), dispense_tower()),
            (Trigger::Button(ButtonColor::Yellow), dispense_pencil()),
            (Trigger::Remote(RemoteCommand::TowerDispense), dispense_tower()),
            (Trigger::Remote(RemoteCommand::PencilDispense), dispense_pencil()),
            (Trigger::Remote(RemoteCommand::TowerCalibrate), tower_calibrate()),
        ]
    }

    /// The action bound to `trigger`, if any.
    pub fn action_for(&self, trigger: Trigger) -> Option<&Action> {
        self.routes
            .iter()
            .find(|(t, _)| *t == trigger)
            .map(|(_, action)| action)
    }

    /// The brick this router commands.
    pub fn brick(&self) -> &Brick<M> {
        &self.brick
    }

    /// Resolve `trigger` and run its action to completion, waiting
    /// out any routine already holding the target motor.
    ///
    /// Unbound triggers are logged and return
    /// [`DispatchOutcome::Ignored`], not an error. Motor failures
    /// abort the sequence at the failing step and propagate.
    pub fn dispatch(&self, trigger: Trigger) -> Result<DispatchOutcome, ActionError> {
        let Some(action) = self.action_for(trigger) else {
            log::info!("no action bound for {trigger}, ignoring");
            return Ok(DispatchOutcome::Ignored);
        };
        let handle = self.handle_for(action)?;

        log::debug!("{trigger}: running {}", action.name());
        match action.run(&handle) {
            Ok(()) => Ok(DispatchOutcome::Completed {
                action: action.name(),
            }),
            Err(e) => {
                log::error!("{trigger}: {} failed: {e}", action.name());
                Err(e)
            }
        }
    }

    /// Like [`dispatch`](Self::dispatch) but fails fast with
    /// [`ActionError::MotorBusy`] when the target motor is held.
    pub fn try_dispatch(&self, trigger: Trigger) -> Result<DispatchOutcome, ActionError> {
        let Some(action) = self.action_for(trigger) else {
            log::info!("no action bound for {trigger}, ignoring");
            return Ok(DispatchOutcome::Ignored);
        };
        let handle = self.handle_for(action)?;

        match action.try_run(&handle) {
            Ok(()) => Ok(DispatchOutcome::Completed {
                action: action.name(),
            }),
            Err(ActionError::MotorBusy(port)) => {
                log::debug!("{trigger}: motor {port} busy, rejected");
                Err(ActionError::MotorBusy(port))
            }
            Err(e) => {
                log::error!("{trigger}: {} failed: {e}", action.name());
                Err(e)
            }
        }
    }

    fn handle_for(&self, action: &Action) -> Result<crate::motor::MotorHandle<M>, ActionError> {
        self.brick
            .motor(action.port())
            .ok_or(ActionError::Motor {
                source: MotorError::NotAttached(action.port()),
                step: 0,
            })
    }
}
