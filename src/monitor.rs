//! Background GPIO pin monitor.
//!
//! [`PinMonitor`] owns a sampling thread that sweeps a fixed set of
//! input pins and fires a pulse callback for every pin observed HIGH.
//! Each sweep is followed by a fixed sleep (100 ms in the deployment),
//! and no edge state is kept between sweeps: a button held down longer
//! than the poll interval fires once per sweep. That hold-to-repeat
//! behavior is intentional; callers that want one event per press
//! must debounce downstream.
//!
//! # Example
//!
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use brick_commander::hal::MockPins;
//! use brick_commander::monitor::PinMonitor;
//!
//! let pins = MockPins::new();
//! pins.queue_levels(12, &[true]);
//!
//! let count = Arc::new(AtomicUsize::new(0));
//! let seen = Arc::clone(&count);
//!
//! let mut monitor = PinMonitor::new(pins, vec![12], Duration::from_millis(1));
//! monitor.start(move |_event| {
//!     seen.fetch_add(1, Ordering::SeqCst);
//! }).unwrap();
//!
//! std::thread::sleep(Duration::from_millis(50));
//! monitor.stop();
//! assert_eq!(count.load(Ordering::SeqCst), 1);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::MonitorError;
use crate::traits::{PinInput, PinMode};

/// BCM pin number of a digital input line.
pub type PinId = u8;

/// One detected HIGH-level sample of a monitored pin.
///
/// Produced once per sweep that observes the pin HIGH, consumed by
/// the pulse callback (in the deployment, forwarded over a channel to
/// the button dispatcher).
#[derive(Clone, Copy, Debug)]
pub struct PinEvent {
    /// The pin that was observed HIGH.
    pub pin: PinId,
    /// When the level was sampled.
    pub at: Instant,
}

/// Background polling loop over a fixed set of input pins.
///
/// # Lifecycle
///
/// The monitor is single-shot: [`start`](Self::start) consumes the
/// pin backend into the sampling thread, and after [`stop`](Self::stop)
/// it cannot be restarted. Calling `start` twice (or after `stop`)
/// fails with [`MonitorError::AlreadyRunning`].
///
/// # Failure semantics
///
/// A pin that cannot be *opened* fails `start` synchronously. A pin
/// that cannot be *read* during a sweep only loses that pin's check
/// for the sweep: the failure is logged and the loop carries on, so
/// polling survives transient hardware hiccups.
pub struct PinMonitor<P: PinInput + Send + 'static> {
    reader: Option<P>,
    pins: Vec<PinId>,
    poll_interval: Duration,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl<P: PinInput + Send + 'static> PinMonitor<P> {
    /// Create a monitor over the given pins.
    ///
    /// Nothing is opened or spawned until [`start`](Self::start).
    /// Pins are checked in the order given here, deterministically,
    /// on every sweep.
    pub fn new(reader: P, pins: Vec<PinId>, poll_interval: Duration) -> Self {
        Self {
            reader: Some(reader),
            pins,
            poll_interval,
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// The pins this monitor sweeps, in sweep order.
    pub fn pins(&self) -> &[PinId] {
        &self.pins
    }

    /// The sleep between full sweeps.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Whether the sampling thread is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Open all monitored pins and start the sampling thread.
    ///
    /// `on_pulse` is invoked synchronously from the sampling thread
    /// for every HIGH sample, so it must return quickly: forward the
    /// event to a channel rather than doing work inline (a blocking
    /// callback stalls every button for its duration).
    ///
    /// # Errors
    ///
    /// - [`MonitorError::AlreadyRunning`] if the monitor was already
    ///   started (including after `stop`).
    /// - [`MonitorError::Hardware`] if any monitored pin cannot be
    ///   opened; the monitor is unusable afterwards.
    pub fn start<F>(&mut self, mut on_pulse: F) -> Result<(), MonitorError>
    where
        F: FnMut(PinEvent) + Send + 'static,
    {
        if self.handle.is_some() || self.running.load(Ordering::SeqCst) {
            return Err(MonitorError::AlreadyRunning);
        }
        let mut reader = self.reader.take().ok_or(MonitorError::AlreadyRunning)?;

        for &pin in &self.pins {
            reader.open_pin(pin, PinMode::InputPullDown)?;
        }

        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);
        let pins = self.pins.clone();
        let interval = self.poll_interval;

        let handle = thread::spawn(move || {
            while running.load(Ordering::SeqCst) {
                for &pin in &pins {
                    match reader.read_level(pin) {
                        Ok(true) => on_pulse(PinEvent {
                            pin,
                            at: Instant::now(),
                        }),
                        Ok(false) => {}
                        Err(e) => log::warn!("skipping pin {pin} this sweep: {e}"),
                    }
                }
                thread::sleep(interval);
            }
        });
        self.handle = Some(handle);
        Ok(())
    }

    /// Signal the sampling thread to exit and block until it has.
    ///
    /// Once `stop` returns, no further `on_pulse` invocation will
    /// occur, regardless of where the thread was in a sweep. The
    /// callback (and anything it captured, such as a channel sender)
    /// is dropped with the thread. Safe to call from any thread and
    /// idempotent.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("pin monitor thread panicked");
            }
        }
    }
}

impl<P: PinInput + Send + 'static> Drop for PinMonitor<P> {
    fn drop(&mut self) {
        self.stop();
    }
}
