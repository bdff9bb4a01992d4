//! Desktop daemon: pin monitor + button pump + web facade.
//!
//! Runs against the mock hardware backends; swap in real `PinInput`
//! and `PositionMotor` implementations at the two `attach` points to
//! drive a Raspberry Pi with a Build HAT.
//!
//! ```bash
//! cargo run --features web --bin brickd
//! # then:
//! curl -X POST http://localhost:8080/api/dispense/tower
//! ```

use anyhow::Context;

use brick_commander::hal::{MockMotor, MockPins};
use brick_commander::motor::{Brick, MotorPort};
use brick_commander::router::ActionRouter;
use brick_commander::services::{ButtonDispatcher, WebServerConfig};
use brick_commander::{Config, PinMonitor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Config::default().with_serial_from_env();
    log::info!(
        "starting brick-commander (serial {}, pins {:?})",
        config.serial_port,
        config.monitored_pins()
    );

    // Hardware attach. The mock backends stand in for the GPIO chip
    // and the Build HAT link on `config.serial_port`.
    let pins = MockPins::new();
    let mut brick = Brick::new();
    brick.attach_motor(MotorPort::A, MockMotor::new());
    brick.attach_motor(MotorPort::B, MockMotor::new());

    let router = ActionRouter::new(brick);

    // Button path: monitor -> channel -> dispatch workers.
    let mut monitor = PinMonitor::new(pins, config.monitored_pins(), config.poll_interval());
    let pump = ButtonDispatcher::wire(&mut monitor, config.pins.clone(), router.clone())
        .context("failed to start pin monitoring")?;

    // Remote path: same router, same motor locks.
    let web_config = WebServerConfig::from_config(&config.web);
    let result = brick_commander::services::run_server(router, web_config)
        .await
        .context("web server failed");

    monitor.stop();
    pump.join();
    result
}
