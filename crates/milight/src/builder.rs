//! ClientBuilder -- fluent builder for constructing [`MiLightClient`] instances.
//!
//! Separates radio registration and timing policy from construction so that
//! callers can tune resends and pacing before the first packet goes out.
//!
//! # Example
//!
//! ```no_run
//! use milight::builder::ClientBuilder;
//! use milight::models::{cct, rgb_cct};
//! use std::time::Duration;
//!
//! # fn example(
//! #     cct_radio: Box<dyn milight::Transport>,
//! #     v2_radio: Box<dyn milight::Transport>,
//! # ) -> milight::Result<()> {
//! let client = ClientBuilder::new()
//!     .radio(cct(), cct_radio)
//!     .radio(rgb_cct(), v2_radio)
//!     .resend_count(5)
//!     .packet_delay(Duration::from_millis(20))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use milight_core::error::{Error, Result};
use milight_core::transport::Transport;

use crate::client::{MiLightClient, Radio};
use crate::models::RadioConfig;

/// Default number of writes per packet.
pub const DEFAULT_RESEND_COUNT: u32 = 10;

/// Default pause between distinct packets of one command.
pub const DEFAULT_PACKET_DELAY: Duration = Duration::from_millis(10);

/// Default number of relative steps spanning the full 0-100 range.
pub const DEFAULT_STEP_INTERVALS: u8 = 10;

/// Default number of writes per packet while emulating absolute levels.
pub const DEFAULT_STEP_RESEND_COUNT: u32 = 10;

/// Fluent builder for [`MiLightClient`].
///
/// Every setting has a default, so the simplest usage only registers radios:
///
/// ```ignore
/// let client = ClientBuilder::new()
///     .radio(rgbw(), Box::new(radio))
///     .build()?;
/// ```
pub struct ClientBuilder {
    radios: Vec<(RadioConfig, Box<dyn Transport>)>,
    resend_count: u32,
    packet_delay: Duration,
    step_intervals: u8,
    step_resend_count: u32,
}

impl ClientBuilder {
    pub fn new() -> Self {
        ClientBuilder {
            radios: Vec::new(),
            resend_count: DEFAULT_RESEND_COUNT,
            packet_delay: DEFAULT_PACKET_DELAY,
            step_intervals: DEFAULT_STEP_INTERVALS,
            step_resend_count: DEFAULT_STEP_RESEND_COUNT,
        }
    }

    /// Register a radio for one dialect.
    ///
    /// Each device type may be registered once.
    pub fn radio(mut self, config: RadioConfig, transport: Box<dyn Transport>) -> Self {
        self.radios.push((config, transport));
        self
    }

    /// Set how many times each packet is written (default: 10).
    pub fn resend_count(mut self, count: u32) -> Self {
        self.resend_count = count;
        self
    }

    /// Set the pause between distinct packets of one command
    /// (default: 10ms).
    pub fn packet_delay(mut self, delay: Duration) -> Self {
        self.packet_delay = delay;
        self
    }

    /// Set how many relative steps span the full range when an absolute
    /// level is emulated (default: 10, valid 1-100).
    pub fn step_intervals(mut self, intervals: u8) -> Self {
        self.step_intervals = intervals;
        self
    }

    /// Set the resend count used for each emulation step (default: 10).
    pub fn step_resend_count(mut self, count: u32) -> Self {
        self.step_resend_count = count;
        self
    }

    /// Validate the configuration and create the client.
    ///
    /// No transport is touched here; the first `switch_radio()` configures
    /// the selected radio.
    pub fn build(self) -> Result<MiLightClient> {
        if self.radios.is_empty() {
            return Err(Error::InvalidParameter(
                "at least one radio is required".into(),
            ));
        }
        if self.resend_count == 0 {
            return Err(Error::InvalidParameter(
                "resend_count must be at least 1".into(),
            ));
        }
        if self.step_resend_count == 0 {
            return Err(Error::InvalidParameter(
                "step_resend_count must be at least 1".into(),
            ));
        }
        if !(1..=100).contains(&self.step_intervals) {
            return Err(Error::InvalidParameter(format!(
                "step_intervals must be 1-100, got {}",
                self.step_intervals
            )));
        }

        let mut radios: Vec<Radio> = Vec::with_capacity(self.radios.len());
        for (config, transport) in self.radios {
            if radios
                .iter()
                .any(|r| r.config.device_type == config.device_type)
            {
                return Err(Error::InvalidParameter(format!(
                    "radio for {} registered twice",
                    config.device_type
                )));
            }
            radios.push(Radio {
                config,
                formatter: config.formatter()?,
                transport,
            });
        }

        Ok(MiLightClient::new(
            radios,
            self.resend_count,
            self.packet_delay,
            self.step_intervals,
            self.step_resend_count,
        ))
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
