//! Deployment configuration.
//!
//! Defaults match the shipped dispenser: buttons on BCM pins 12
//! (black), 13 (blue), 18 (yellow), 19 (red), a 100 ms poll interval,
//! and the Build HAT on `/dev/serial0`.
//!
//! # Example
//!
//! ```rust
//! use brick_commander::config::Config;
//!
//! // Use defaults
//! let config = Config::default();
//! assert_eq!(config.poll_interval_ms, 100);
//!
//! // Or customize
//! let config = Config::default()
//!     .with_poll_interval_ms(50)
//!     .with_serial_port("/dev/ttyAMA0");
//! ```

use std::time::Duration;

use crate::monitor::PinId;
use crate::router::ButtonColor;

/// Which GPIO pin a button is wired to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PinBinding {
    /// BCM pin number.
    pub pin: PinId,
    /// The button on that pin.
    pub color: ButtonColor,
}

impl PinBinding {
    /// Bind `color` to `pin`.
    pub const fn new(pin: PinId, color: ButtonColor) -> Self {
        Self { pin, color }
    }
}

/// Web facade configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WebConfig {
    /// TCP port for the HTTP server.
    pub port: u16,
    /// Whether to allow any CORS origin.
    pub cors_permissive: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            cors_permissive: true,
        }
    }
}

impl WebConfig {
    /// Set the HTTP port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set CORS permissiveness.
    pub fn with_cors_permissive(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }
}

/// Complete application configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Button-to-pin wiring; every listed pin is monitored.
    pub pins: Vec<PinBinding>,
    /// Sleep between polling sweeps, in milliseconds.
    pub poll_interval_ms: u64,
    /// Serial device of the Build HAT link.
    pub serial_port: String,
    /// Web facade settings.
    pub web: WebConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pins: vec![
                PinBinding::new(12, ButtonColor::Black),
                PinBinding::new(13, ButtonColor::Blue),
                PinBinding::new(18, ButtonColor::Yellow),
                PinBinding::new(19, ButtonColor::Red),
            ],
            poll_interval_ms: 100,
            serial_port: "/dev/serial0".into(),
            web: WebConfig::default(),
        }
    }
}

impl Config {
    /// Replace the pin bindings.
    pub fn with_pins(mut self, pins: Vec<PinBinding>) -> Self {
        self.pins = pins;
        self
    }

    /// Set the poll interval in milliseconds.
    pub fn with_poll_interval_ms(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Set the Build HAT serial device.
    pub fn with_serial_port(mut self, port: impl Into<String>) -> Self {
        self.serial_port = port.into();
        self
    }

    /// Set the web facade configuration.
    pub fn with_web(mut self, web: WebConfig) -> Self {
        self.web = web;
        self
    }

    /// Override the serial device from the `SERIAL_PORT` environment
    /// variable, if set.
    pub fn with_serial_from_env(mut self) -> Self {
        if let Ok(port) = std::env::var("SERIAL_PORT") {
            self.serial_port = port;
        }
        self
    }

    /// The poll interval as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// The monitored pins, in sweep order.
    pub fn monitored_pins(&self) -> Vec<PinId> {
        self.pins.iter().map(|b| b.pin).collect()
    }

    /// The button wired to `pin`, if any.
    pub fn button_for(&self, pin: PinId) -> Option<ButtonColor> {
        self.pins
            .iter()
            .find(|b| b.pin == pin)
            .map(|b| b.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_match_deployment() {
        let config = Config::default();
        assert_eq!(config.monitored_pins(), vec![12, 13, 18, 19]);
        assert_eq!(config.button_for(12), Some(ButtonColor::Black));
        assert_eq!(config.button_for(13), Some(ButtonColor::Blue));
        assert_eq!(config.button_for(18), Some(ButtonColor::Yellow));
        assert_eq!(config.button_for(19), Some(ButtonColor::Red));
        assert_eq!(config.button_for(20), None);
    }

    #[test]
    fn default_timing_and_ports() {
        let config = Config::default();
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
        assert_eq!(config.serial_port, "/dev/serial0");
        assert_eq!(config.web.port, 8080);
        assert!(config.web.cors_permissive);
    }

    #[test]
    fn builders() {
        let config = Config::default()
            .with_poll_interval_ms(10)
            .with_serial_port("/dev/ttyAMA0")
            .with_pins(vec![PinBinding::new(5, ButtonColor::Red)])
            .with_web(WebConfig::default().with_port(3000).with_cors_permissive(false));

        assert_eq!(config.poll_interval_ms, 10);
        assert_eq!(config.serial_port, "/dev/ttyAMA0");
        assert_eq!(config.monitored_pins(), vec![5]);
        assert_eq!(config.web.port, 3000);
        assert!(!config.web.cors_permissive);
    }
}
