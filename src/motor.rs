//! Motor ports, handles, and the brick that owns them.
//!
//! A [`MotorHandle`] is the addressable channel for one physical
//! motor and the unit of mutual exclusion: the hardware has no notion
//! of concurrent positional commands on one motor, so every path that
//! commands a motor, dispense routines and remote pass-throughs
//! alike, goes through the handle's lock.
//!
//! The [`Brick`] is the explicitly constructed owner of all handles.
//! There is no ambient global: the application builds one `Brick`,
//! attaches motors, and passes handle clones to whoever needs them.
//! Handles live for the process lifetime once attached.

use core::fmt;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use crate::error::MotorError;
use crate::traits::PositionMotor;

/// Build HAT motor port.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MotorPort {
    /// Port A (pencil dispenser in the deployment).
    A,
    /// Port B (candy tower in the deployment).
    B,
    /// Port C.
    C,
    /// Port D.
    D,
}

impl MotorPort {
    /// Returns the port letter.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            MotorPort::A => "A",
            MotorPort::B => "B",
            MotorPort::C => "C",
            MotorPort::D => "D",
        }
    }

    /// Parse a port from text, trimmed and case-insensitive.
    ///
    /// # Examples
    ///
    /// ```
    /// use brick_commander::motor::MotorPort;
    ///
    /// assert_eq!(MotorPort::from_text("a"), Some(MotorPort::A));
    /// assert_eq!(MotorPort::from_text(" B "), Some(MotorPort::B));
    /// assert_eq!(MotorPort::from_text("E"), None);
    /// ```
    pub fn from_text(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" => Some(MotorPort::A),
            "b" => Some(MotorPort::B),
            "c" => Some(MotorPort::C),
            "d" => Some(MotorPort::D),
            _ => None,
        }
    }
}

impl fmt::Display for MotorPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared handle to one motor channel.
///
/// Cloning a handle is cheap and refers to the same motor and the
/// same lock. The lock is held for the *entire* closure passed to
/// [`with_motor`](Self::with_motor): an action's whole step sequence
/// runs under one acquisition, never per step, so two routines on the
/// same motor can never interleave.
#[derive(Debug)]
pub struct MotorHandle<M> {
    port: MotorPort,
    inner: Arc<Mutex<M>>,
}

impl<M> Clone for MotorHandle<M> {
    fn clone(&self) -> Self {
        Self {
            port: self.port,
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M: PositionMotor> MotorHandle<M> {
    /// Wrap a motor attached to `port`.
    pub fn new(port: MotorPort, motor: M) -> Self {
        Self {
            port,
            inner: Arc::new(Mutex::new(motor)),
        }
    }

    /// The port this handle addresses.
    pub fn port(&self) -> MotorPort {
        self.port
    }

    /// Run `f` with exclusive access to the motor, blocking until the
    /// motor is free. Hold the guard for the full routine, not per
    /// step.
    pub fn with_motor<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut M) -> R,
    {
        let mut guard = self.lock();
        f(&mut guard)
    }

    /// Like [`with_motor`](Self::with_motor) but fails fast: returns
    /// `None` if another caller currently holds the motor.
    pub fn try_with_motor<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut M) -> R,
    {
        match self.inner.try_lock() {
            Ok(mut guard) => Some(f(&mut guard)),
            Err(TryLockError::WouldBlock) => None,
            Err(TryLockError::Poisoned(e)) => {
                let mut guard = e.into_inner();
                Some(f(&mut guard))
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, M> {
        // A panicked routine leaves the motor wherever it stopped;
        // the lock itself is still meaningful, so recover the guard.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// The brick: owner of every attached motor handle.
///
/// Built once at service start, after the hardware attach, and passed
/// by clone to the router and the web facade. Cloning shares the same
/// handles (and therefore the same locks).
///
/// # Example
///
/// ```rust
/// use brick_commander::hal::MockMotor;
/// use brick_commander::motor::{Brick, MotorPort};
///
/// let mut brick = Brick::new();
/// brick.attach_motor(MotorPort::A, MockMotor::new());
/// brick.attach_motor(MotorPort::B, MockMotor::new());
///
/// assert!(brick.motor(MotorPort::A).is_some());
/// assert!(brick.motor(MotorPort::C).is_none());
/// ```
#[derive(Debug)]
pub struct Brick<M> {
    motors: BTreeMap<MotorPort, MotorHandle<M>>,
}

impl<M> Clone for Brick<M> {
    fn clone(&self) -> Self {
        Self {
            motors: self.motors.clone(),
        }
    }
}

impl<M> Default for Brick<M> {
    fn default() -> Self {
        Self {
            motors: BTreeMap::new(),
        }
    }
}

impl<M: PositionMotor> Brick<M> {
    /// Creates a brick with no motors attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a motor to `port`, returning a handle to it.
    ///
    /// Attaching to an occupied port replaces the old handle; callers
    /// holding clones of the old one keep the old motor.
    pub fn attach_motor(&mut self, port: MotorPort, motor: M) -> MotorHandle<M> {
        let handle = MotorHandle::new(port, motor);
        self.motors.insert(port, handle.clone());
        handle
    }

    /// Handle for the motor on `port`, if one is attached.
    pub fn motor(&self, port: MotorPort) -> Option<MotorHandle<M>> {
        self.motors.get(&port).cloned()
    }

    /// Ports with a motor attached, in order.
    pub fn attached_ports(&self) -> Vec<MotorPort> {
        self.motors.keys().copied().collect()
    }

    /// Pass-through position read, under the port's motor lock.
    ///
    /// Blocks while a routine is running on that motor; reads never
    /// bypass the per-motor mutual exclusion.
    pub fn position(&self, port: MotorPort) -> Result<i32, MotorError> {
        let handle = self.motor(port).ok_or(MotorError::NotAttached(port))?;
        Ok(handle.with_motor(|m| m.position()))
    }

    /// Pass-through positional move, under the port's motor lock.
    ///
    /// Sets the target speed, blocks through the move, and returns
    /// the final position.
    pub fn move_motor(
        &self,
        port: MotorPort,
        speed: i32,
        position: i32,
    ) -> Result<i32, MotorError> {
        let handle = self.motor(port).ok_or(MotorError::NotAttached(port))?;
        handle.with_motor(|m| {
            m.set_target_speed(speed)?;
            m.move_to_position(position, true)?;
            Ok(m.position())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{MockMotor, MotorCall};
    use std::thread;
    use std::time::{Duration, Instant};

    #[test]
    fn port_round_trip() {
        for port in [MotorPort::A, MotorPort::B, MotorPort::C, MotorPort::D] {
            assert_eq!(MotorPort::from_text(port.as_str()), Some(port));
        }
    }

    #[test]
    fn port_display() {
        assert_eq!(MotorPort::B.to_string(), "B");
    }

    #[test]
    fn handle_clone_shares_motor() {
        let handle = MotorHandle::new(MotorPort::A, MockMotor::new());
        let other = handle.clone();
        handle.with_motor(|m| m.move_to_position(45, true).unwrap());
        assert_eq!(other.with_motor(|m| m.position()), 45);
    }

    #[test]
    fn try_with_motor_fails_while_held() {
        let handle = MotorHandle::new(MotorPort::A, MockMotor::new());
        let contender = handle.clone();

        handle.with_motor(|_m| {
            // Lock is held here; the contender must fail fast.
            assert!(contender.try_with_motor(|m| m.position()).is_none());
        });

        // Free again.
        assert_eq!(contender.try_with_motor(|m| m.position()), Some(0));
    }

    #[test]
    fn brick_attach_and_lookup() {
        let mut brick = Brick::new();
        brick.attach_motor(MotorPort::A, MockMotor::new());
        brick.attach_motor(MotorPort::B, MockMotor::new());

        assert_eq!(brick.attached_ports(), vec![MotorPort::A, MotorPort::B]);
        assert_eq!(brick.motor(MotorPort::A).unwrap().port(), MotorPort::A);
        assert!(brick.motor(MotorPort::D).is_none());
    }

    #[test]
    fn brick_position_unattached_port() {
        let brick: Brick<MockMotor> = Brick::new();
        assert_eq!(
            brick.position(MotorPort::C),
            Err(MotorError::NotAttached(MotorPort::C))
        );
    }

    #[test]
    fn brick_move_motor_sets_speed_then_moves() {
        let mut brick = Brick::new();
        let motor = MockMotor::new();
        brick.attach_motor(MotorPort::A, motor.clone());

        let final_pos = brick.move_motor(MotorPort::A, 30, 120).unwrap();
        assert_eq!(final_pos, 120);
        assert_eq!(
            motor.calls(),
            vec![MotorCall::SetSpeed(30), MotorCall::MoveTo { position: 120 }]
        );
    }

    #[test]
    fn position_read_waits_for_running_move() {
        let mut brick = Brick::new();
        let motor = MockMotor::new().with_move_delay(Duration::from_millis(50));
        brick.attach_motor(MotorPort::B, motor);

        let mover = brick.clone();
        let t = thread::spawn(move || {
            mover.move_motor(MotorPort::B, 20, -180).unwrap();
        });
        // Give the move a head start so the read contends with it.
        thread::sleep(Duration::from_millis(10));

        let start = Instant::now();
        let pos = brick.position(MotorPort::B).unwrap();
        t.join().unwrap();

        // The read could not jump the lock: it waited out the move.
        assert!(start.elapsed() >= Duration::from_millis(20));
        assert_eq!(pos, -180);
    }
}
