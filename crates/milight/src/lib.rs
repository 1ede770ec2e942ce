//! # milight -- Packet formatting and radio orchestration for MiLight bulbs
//!
//! `milight` is an asynchronous Rust library that speaks the 2.4GHz packet
//! dialects of MiLight-style RF light bulbs. It builds and encrypts the
//! packets a physical remote would send, paces and repeats them over a raw
//! radio, and decodes packets heard from real remotes.
//!
//! ## Quick Start
//!
//! ```no_run
//! use milight::{ClientBuilder, DeviceType, LightCommand, Status};
//! use milight::models::rgb_cct;
//!
//! # async fn example(radio: Box<dyn milight::Transport>) -> milight::Result<()> {
//! let mut client = ClientBuilder::new()
//!     .radio(rgb_cct(), radio)
//!     .build()?;
//!
//! client.prepare(DeviceType::RgbCct, Some(0x1234), Some(1)).await?;
//! client.update_status(Status::On).await?;
//! client.update_brightness(60).await?;
//! client.apply("hue=240".parse::<LightCommand>()?).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! | Crate                  | Purpose                                          |
//! |------------------------|--------------------------------------------------|
//! | `milight-core`         | [`PacketFormatter`] and [`Transport`] traits, types, errors |
//! | `milight-rgbw`         | Legacy RGBW dialect                              |
//! | `milight-cct`          | Color-temperature dialect (relative controls)    |
//! | `milight-rgbcct`       | Encrypted V2 RGB+CCT dialect and its cipher      |
//! | **`milight`**          | This facade crate -- client, models, re-exports  |
//!
//! Formatters never touch a radio. The [`MiLightClient`] drains each
//! formatter's [`PacketStream`] onto the transport registered for that
//! dialect, so any radio driver that implements [`Transport`] can be used.
//!
//! ## Feature Flags
//!
//! | Feature  | Enables                           | Default |
//! |----------|-----------------------------------|---------|
//! | `rgbw`   | [`rgbw`] module (legacy dialect)  | yes     |
//! | `cct`    | [`cct`] module (CCT dialect)      | yes     |
//! | `rgbcct` | [`rgbcct`] module (V2 dialect)    | yes     |
//!
//! A [`RadioConfig`] whose dialect is compiled out is rejected by
//! [`ClientBuilder::build`].

pub use milight_core::*;

pub mod builder;
pub mod client;
pub mod command;
pub mod models;

pub use builder::ClientBuilder;
pub use client::MiLightClient;
pub use command::LightCommand;
pub use models::RadioConfig;

/// Legacy RGBW dialect.
///
/// Provides [`RgbwFormatter`](rgbw::RgbwFormatter) and the button tables in
/// [`protocol`](rgbw::protocol).
#[cfg(feature = "rgbw")]
pub mod rgbw {
    pub use milight_rgbw::*;
}

/// Color-temperature dialect.
///
/// Provides [`CctFormatter`](cct::CctFormatter). These bulbs only have
/// relative brightness and temperature buttons.
#[cfg(feature = "cct")]
pub mod cct {
    pub use milight_cct::*;
}

/// Encrypted V2 RGB+CCT dialect.
///
/// Provides [`RgbCctFormatter`](rgbcct::RgbCctFormatter) and the packet
/// [`cipher`](rgbcct::cipher).
#[cfg(feature = "rgbcct")]
pub mod rgbcct {
    pub use milight_rgbcct::*;
}

/// Returns the radio configs for every dialect enabled in this build.
///
/// # Example
///
/// ```
/// for config in milight::supported_radios() {
///     println!("{} ({} byte packets)", config.name, config.packet_length);
/// }
/// ```
pub fn supported_radios() -> Vec<RadioConfig> {
    models::all_configs()
        .into_iter()
        .filter(|config| config.formatter().is_ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_radios_matches_default_features() {
        let names: Vec<&str> = supported_radios().iter().map(|c| c.name).collect();
        #[cfg(all(feature = "rgbw", feature = "cct", feature = "rgbcct"))]
        assert_eq!(names, vec!["rgbw", "cct", "rgb_cct"]);
        #[cfg(not(feature = "rgbw"))]
        assert!(!names.contains(&"rgbw"));
    }
}
