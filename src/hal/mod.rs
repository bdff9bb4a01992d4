//! Hardware Abstraction Layer implementations.
//!
//! Concrete implementations of the traits in [`crate::traits`].
//!
//! Only the mock backends ship with the crate: the Raspberry Pi GPIO
//! chip and the Build HAT serial link are deployment concerns supplied
//! by the embedding application.

pub mod mock;

pub use mock::*;
