//! Services wiring the core to its input paths.
//!
//! - `buttons`: channel pump from pin pulses to action dispatch,
//!   always available.
//! - `api` / `web` (`web` feature): axum-based HTTP facade exposing
//!   the same actions to remote callers.
//!
//! Both paths end at the same [`ActionRouter`](crate::router::ActionRouter)
//! clone family and therefore the same per-motor locks: a button
//! press and a remote request for one motor serialize, never race.

pub mod buttons;

#[cfg(feature = "web")]
pub mod api;

#[cfg(feature = "web")]
pub mod web;

// Re-exports
pub use buttons::*;

#[cfg(feature = "web")]
pub use api::*;

#[cfg(feature = "web")]
pub use web::*;
