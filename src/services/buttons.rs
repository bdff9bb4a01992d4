//! Wiring from pin pulses to action dispatch.
//!
//! The pin monitor's callback must return quickly; a dispense
//! routine blocks for seconds and would stall every other button if
//! run inline in the sampling loop. [`ButtonDispatcher::wire`]
//! therefore plugs a channel in between: the monitor callback only
//! sends the [`PinEvent`], a pump thread maps it to a [`Trigger`]
//! through the pin bindings, and each dispatch runs on its own worker
//! thread, serializing per motor on the handle lock like every other
//! caller.
//!
//! ```text
//! PinMonitor sweep ──PinEvent──▶ channel ──▶ pump thread ──▶ worker thread
//!                                              (bindings)     router.dispatch
//! ```
//!
//! Stopping the monitor drops the channel sender, which ends the pump
//! thread; [`ButtonDispatcher::join`] then returns. Dispatches already
//! in flight run to completion on their worker threads.

use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use crate::config::PinBinding;
use crate::error::MonitorError;
use crate::monitor::{PinEvent, PinMonitor};
use crate::router::{ActionRouter, DispatchOutcome, Trigger};
use crate::traits::{PinInput, PositionMotor};

/// Handle to the running button-to-action pump.
pub struct ButtonDispatcher {
    handle: JoinHandle<()>,
}

impl ButtonDispatcher {
    /// Start the monitor and connect it to the router.
    ///
    /// Fails like [`PinMonitor::start`] does: `AlreadyRunning` on a
    /// second wiring, `Hardware` if a monitored pin cannot be opened.
    ///
    /// Pins with a pulse but no binding are logged and skipped; bound
    /// pins whose button has no routed action are handled (and
    /// ignored) by the router itself.
    pub fn wire<P, M>(
        monitor: &mut PinMonitor<P>,
        bindings: Vec<PinBinding>,
        router: ActionRouter<M>,
    ) -> Result<Self, MonitorError>
    where
        P: PinInput + Send + 'static,
        M: PositionMotor + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<PinEvent>();
        monitor.start(move |event| {
            // Receiver gone means we are shutting down; drop the event.
            let _ = tx.send(event);
        })?;

        let handle = thread::spawn(move || {
            for event in rx {
                let Some(color) = bindings
                    .iter()
                    .find(|b| b.pin == event.pin)
                    .map(|b| b.color)
                else {
                    log::warn!("pulse on unbound pin {}", event.pin);
                    continue;
                };

                let trigger = Trigger::Button(color);
                let router = router.clone();
                thread::spawn(move || match router.dispatch(trigger) {
                    Ok(DispatchOutcome::Completed { action }) => {
                        log::info!("{trigger}: completed {action}");
                    }
                    Ok(DispatchOutcome::Ignored) => {}
                    Err(e) => log::error!("{trigger}: dispatch failed: {e}"),
                });
            }
        });

        Ok(Self { handle })
    }

    /// Wait for the pump thread to exit.
    ///
    /// Returns once the monitor feeding it has been stopped. Worker
    /// threads for dispatches already started are not waited on.
    pub fn join(self) {
        if self.handle.join().is_err() {
            log::error!("button dispatcher thread panicked");
        }
    }
}
