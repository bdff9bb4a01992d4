//! Mock implementations for testing without hardware.
//!
//! Test doubles for the two hardware traits, enabling development and
//! testing on desktop without a Raspberry Pi or a Build HAT attached.
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockPins`] | [`PinInput`] | Scripted levels, failure injection |
//! | [`MockMotor`] | [`PositionMotor`] | Recorded call log, simulated blocking moves |
//!
//! Both mocks are cheap clones over shared interior state, so a test
//! can hand one clone to the component under test (often on another
//! thread) and keep a clone for scripting and inspection.
//!
//! # Example
//!
//! ```rust
//! use brick_commander::hal::{MockMotor, MotorCall};
//! use brick_commander::traits::PositionMotor;
//!
//! let mut motor = MockMotor::new();
//! motor.set_target_speed(40).unwrap();
//! motor.move_to_position(-40, true).unwrap();
//!
//! assert_eq!(motor.position(), -40);
//! assert_eq!(
//!     motor.calls(),
//!     vec![MotorCall::SetSpeed(40), MotorCall::MoveTo { position: -40 }]
//! );
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::error::{HardwareError, MotorError};
use crate::monitor::PinId;
use crate::traits::{PinInput, PinMode, PositionMotor, PositionWay};

// ============================================================================
// MockPins
// ============================================================================

#[derive(Debug, Default)]
struct PinsInner {
    opened: HashMap<PinId, PinMode>,
    /// Per-pin scripted levels, consumed one per read.
    scripted: HashMap<PinId, VecDeque<bool>>,
    /// Steady level once the script is exhausted.
    steady: HashMap<PinId, bool>,
    fail_open: Vec<PinId>,
    read_errors: HashMap<PinId, HardwareError>,
    reads: Vec<PinId>,
}

/// Mock GPIO backend.
///
/// Levels default to LOW. Script transient presses with
/// [`queue_levels`](Self::queue_levels) (one entry consumed per read,
/// which in monitor terms means one per sweep) or hold a level with
/// [`set_level`](Self::set_level).
#[derive(Clone, Debug, Default)]
pub struct MockPins {
    inner: Arc<Mutex<PinsInner>>,
}

impl MockPins {
    /// Creates a mock backend with all pins LOW and openable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue levels to be returned by successive reads of `pin`.
    ///
    /// Once the queue drains, reads fall back to the steady level.
    pub fn queue_levels(&self, pin: PinId, levels: &[bool]) {
        let mut inner = self.inner.lock().unwrap();
        inner.scripted.entry(pin).or_default().extend(levels);
    }

    /// Hold `pin` at a steady level.
    pub fn set_level(&self, pin: PinId, high: bool) {
        self.inner.lock().unwrap().steady.insert(pin, high);
    }

    /// Make `open_pin` fail for `pin`.
    pub fn fail_open(&self, pin: PinId) {
        self.inner.lock().unwrap().fail_open.push(pin);
    }

    /// Make every read of `pin` fail with `error`.
    pub fn set_read_error(&self, pin: PinId, error: HardwareError) {
        self.inner.lock().unwrap().read_errors.insert(pin, error);
    }

    /// Stop failing reads of `pin`.
    pub fn clear_read_error(&self, pin: PinId) {
        self.inner.lock().unwrap().read_errors.remove(&pin);
    }

    /// The mode `pin` was opened in, if it was opened.
    pub fn opened_mode(&self, pin: PinId) -> Option<PinMode> {
        self.inner.lock().unwrap().opened.get(&pin).copied()
    }

    /// Total number of reads attempted (including failed ones).
    pub fn read_count(&self) -> usize {
        self.inner.lock().unwrap().reads.len()
    }

    /// Every read attempted, in order.
    pub fn reads(&self) -> Vec<PinId> {
        self.inner.lock().unwrap().reads.clone()
    }
}

impl PinInput for MockPins {
    fn open_pin(&mut self, pin: PinId, mode: PinMode) -> Result<(), HardwareError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_open.contains(&pin) {
            return Err(HardwareError::PinUnavailable(pin));
        }
        inner.opened.insert(pin, mode);
        Ok(())
    }

    fn read_level(&mut self, pin: PinId) -> Result<bool, HardwareError> {
        let mut inner = self.inner.lock().unwrap();
        inner.reads.push(pin);
        if !inner.opened.contains_key(&pin) {
            return Err(HardwareError::PinNotConfigured(pin));
        }
        if let Some(error) = inner.read_errors.get(&pin) {
            return Err(*error);
        }
        if let Some(queue) = inner.scripted.get_mut(&pin) {
            if let Some(level) = queue.pop_front() {
                return Ok(level);
            }
        }
        Ok(inner.steady.get(&pin).copied().unwrap_or(false))
    }
}

// ============================================================================
// MockMotor
// ============================================================================

/// One recorded motor controller call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotorCall {
    /// `set_target_speed(speed)`.
    SetSpeed(i32),
    /// `move_to_position(position, _)`.
    MoveTo {
        /// Target position in degrees.
        position: i32,
    },
    /// `move_to_absolute_position(position, way, _)`.
    MoveAbs {
        /// Target position in degrees.
        position: i32,
        /// Travel way.
        way: PositionWay,
    },
}

#[derive(Debug, Default)]
struct MotorInner {
    target_speed: i32,
    position: i32,
    calls: Vec<MotorCall>,
    move_delay: Duration,
    fail_next_move: bool,
}

/// Mock positional motor.
///
/// Records every call for verification and can simulate the
/// seconds-scale blocking of real moves via
/// [`with_move_delay`](Self::with_move_delay); serialization tests
/// use the delay to prove two routines on one motor never overlap.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use brick_commander::hal::MockMotor;
/// use brick_commander::traits::PositionMotor;
///
/// let mut motor = MockMotor::new().with_move_delay(Duration::from_millis(5));
/// motor.move_to_position(90, true).unwrap(); // sleeps 5ms
/// assert_eq!(motor.position(), 90);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MockMotor {
    inner: Arc<Mutex<MotorInner>>,
}

impl MockMotor {
    /// Creates a mock motor at position 0 with no move delay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate each blocking move taking `delay`.
    pub fn with_move_delay(self, delay: Duration) -> Self {
        self.inner.lock().unwrap().move_delay = delay;
        self
    }

    /// Make the next move call fail with [`MotorError::MoveFailed`].
    pub fn fail_next_move(&self) {
        self.inner.lock().unwrap().fail_next_move = true;
    }

    /// Every call recorded so far, in order.
    pub fn calls(&self) -> Vec<MotorCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Number of calls recorded so far.
    pub fn call_count(&self) -> usize {
        self.inner.lock().unwrap().calls.len()
    }

    /// The last target speed set.
    pub fn target_speed(&self) -> i32 {
        self.inner.lock().unwrap().target_speed
    }

    // Shared by both move variants: record, optionally fail, then
    // sleep outside the inner lock so inspection clones stay usable.
    fn do_move(&self, call: MotorCall, position: i32, blocking: bool) -> Result<(), MotorError> {
        let delay = {
            let mut inner = self.inner.lock().unwrap();
            inner.calls.push(call);
            if inner.fail_next_move {
                inner.fail_next_move = false;
                return Err(MotorError::MoveFailed("injected failure".into()));
            }
            inner.move_delay
        };
        if blocking && !delay.is_zero() {
            thread::sleep(delay);
        }
        self.inner.lock().unwrap().position = position;
        Ok(())
    }
}

impl PositionMotor for MockMotor {
    fn set_target_speed(&mut self, speed: i32) -> Result<(), MotorError> {
        if !(-100..=100).contains(&speed) {
            return Err(MotorError::InvalidSpeed(speed));
        }
        let mut inner = self.inner.lock().unwrap();
        inner.target_speed = speed;
        inner.calls.push(MotorCall::SetSpeed(speed));
        Ok(())
    }

    fn move_to_position(&mut self, position: i32, blocking: bool) -> Result<(), MotorError> {
        self.do_move(MotorCall::MoveTo { position }, position, blocking)
    }

    fn move_to_absolute_position(
        &mut self,
        position: i32,
        way: PositionWay,
        blocking: bool,
    ) -> Result<(), MotorError> {
        self.do_move(MotorCall::MoveAbs { position, way }, position, blocking)
    }

    fn position(&self) -> i32 {
        self.inner.lock().unwrap().position
    }
}
