//! milight-test-harness: mock radio transport for milight.
//!
//! This crate provides [`MockRadio`] for deterministic testing of the client
//! and formatters without real radio hardware.

pub mod mock_radio;

pub use mock_radio::{MockRadio, MockRadioHandle};
