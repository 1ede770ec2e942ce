//! Radio configuration definitions.
//!
//! Each supported device family is described by a [`RadioConfig`] that
//! captures its wire tag, packet length and what the bulbs can do natively.
//! The client keeps one radio per config and consults the capabilities to
//! decide when absolute levels must be emulated with relative steps.
//!
//! Configs are defined as factory functions (e.g. [`rgb_cct()`]) that return
//! a fully populated [`RadioConfig`]:
//!
//! | Config    | Tag  | Length | Brightness | Temperature | Color | Modes |
//! |-----------|------|--------|------------|-------------|-------|-------|
//! | `rgbw`    | 0xB8 | 7      | absolute   | none        | hue   | 9     |
//! | `cct`     | 0x5A | 7      | relative   | relative    | none  | 0     |
//! | `rgb_cct` | 0x20 | 9      | absolute   | absolute    | hue+sat | 9   |

use milight_core::error::{Error, Result};
use milight_core::formatter::PacketFormatter;
use milight_core::types::{DeviceType, LightCapabilities};

/// Static definition of one radio/dialect pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioConfig {
    /// Canonical lowercase name (`rgbw`, `cct`, `rgb_cct`).
    pub name: &'static str,
    pub device_type: DeviceType,
    /// Length of every on-air packet in bytes.
    pub packet_length: usize,
    pub capabilities: LightCapabilities,
}

impl RadioConfig {
    /// Create a fresh formatter speaking this config's dialect.
    ///
    /// Returns [`Error::Unsupported`] if the dialect was compiled out.
    pub fn formatter(&self) -> Result<Box<dyn PacketFormatter>> {
        match self.device_type {
            #[cfg(feature = "rgbw")]
            DeviceType::Rgbw => Ok(Box::new(milight_rgbw::RgbwFormatter::new())),
            #[cfg(feature = "cct")]
            DeviceType::Cct => Ok(Box::new(milight_cct::CctFormatter::new())),
            #[cfg(feature = "rgbcct")]
            DeviceType::RgbCct => Ok(Box::new(milight_rgbcct::RgbCctFormatter::new())),
            #[allow(unreachable_patterns)]
            other => Err(Error::Unsupported(format!(
                "{other} dialect is not enabled in this build"
            ))),
        }
    }

    /// Whether absolute brightness must be emulated with step commands.
    pub fn emulates_brightness(&self) -> bool {
        !self.capabilities.absolute_brightness && self.capabilities.relative_brightness
    }

    /// Whether absolute temperature must be emulated with step commands.
    pub fn emulates_temperature(&self) -> bool {
        !self.capabilities.absolute_temperature && self.capabilities.relative_temperature
    }
}

/// Legacy RGBW bulbs.
pub fn rgbw() -> RadioConfig {
    RadioConfig {
        name: "rgbw",
        device_type: DeviceType::Rgbw,
        packet_length: 7,
        capabilities: LightCapabilities {
            absolute_brightness: true,
            absolute_temperature: false,
            relative_brightness: false,
            relative_temperature: false,
            color: true,
            saturation: false,
            num_modes: 9,
        },
    }
}

/// Color-temperature bulbs with relative controls only.
pub fn cct() -> RadioConfig {
    RadioConfig {
        name: "cct",
        device_type: DeviceType::Cct,
        packet_length: 7,
        capabilities: LightCapabilities {
            absolute_brightness: false,
            absolute_temperature: false,
            relative_brightness: true,
            relative_temperature: true,
            color: false,
            saturation: false,
            num_modes: 0,
        },
    }
}

/// RGB+CCT bulbs speaking the encrypted V2 dialect.
pub fn rgb_cct() -> RadioConfig {
    RadioConfig {
        name: "rgb_cct",
        device_type: DeviceType::RgbCct,
        packet_length: 9,
        capabilities: LightCapabilities {
            absolute_brightness: true,
            absolute_temperature: true,
            relative_brightness: false,
            relative_temperature: false,
            color: true,
            saturation: true,
            num_modes: 9,
        },
    }
}

/// Return the config for a device type.
pub fn for_device_type(device_type: DeviceType) -> RadioConfig {
    match device_type {
        DeviceType::Rgbw => rgbw(),
        DeviceType::Cct => cct(),
        DeviceType::RgbCct => rgb_cct(),
    }
}

/// Look up a config by name (`rgbw`, `cct`, `rgb_cct` and aliases).
pub fn from_name(name: &str) -> Result<RadioConfig> {
    let device_type: DeviceType = name.parse()?;
    Ok(for_device_type(device_type))
}

/// Return all radio configs, in listening scan order.
pub fn all_configs() -> Vec<RadioConfig> {
    vec![rgbw(), cct(), rgb_cct()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_device_types() {
        for config in all_configs() {
            assert_eq!(config.name, config.device_type.name());
        }
    }

    #[test]
    fn packet_lengths() {
        assert_eq!(rgbw().packet_length, 7);
        assert_eq!(cct().packet_length, 7);
        assert_eq!(rgb_cct().packet_length, 9);
    }

    #[test]
    fn formatter_matches_config() {
        for config in all_configs() {
            let formatter = config.formatter().unwrap();
            assert_eq!(formatter.device_type(), config.device_type);
            assert_eq!(formatter.packet_length(), config.packet_length);
        }
    }

    #[test]
    fn only_cct_emulates_steps() {
        assert!(cct().emulates_brightness());
        assert!(cct().emulates_temperature());
        assert!(!rgbw().emulates_brightness());
        assert!(!rgbw().emulates_temperature());
        assert!(!rgb_cct().emulates_brightness());
        assert!(!rgb_cct().emulates_temperature());
    }

    #[test]
    fn from_name_accepts_aliases() {
        assert_eq!(from_name("rgb_cct").unwrap(), rgb_cct());
        assert_eq!(from_name("RGB+CCT").unwrap(), rgb_cct());
        assert_eq!(from_name("cct").unwrap(), cct());
    }

    #[test]
    fn from_name_unknown() {
        assert!(matches!(
            from_name("fut089"),
            Err(Error::UnknownDeviceType(_))
        ));
    }

    #[test]
    fn rgbw_has_no_temperature() {
        let caps = rgbw().capabilities;
        assert!(!caps.absolute_temperature);
        assert!(!caps.relative_temperature);
        assert_eq!(caps.num_modes, 9);
    }
}
