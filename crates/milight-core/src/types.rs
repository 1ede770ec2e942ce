//! Core types used throughout milight.
//!
//! These types provide a dialect-agnostic vocabulary over the three packet
//! framings (legacy RGBW, CCT and the encrypted V2 RGB+CCT protocol).

use std::fmt;
use std::str::FromStr;

/// Device family, identified on the wire by its leading tag byte.
///
/// The discriminant is the byte each dialect writes into its packet header
/// (byte 0 for RGBW and CCT, byte 1 for the V2 framing whose byte 0 seeds
/// the cipher).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DeviceType {
    /// Legacy RGBW bulbs (plain V1 framing with inline tables).
    Rgbw = 0xB8,
    /// Color-temperature-only bulbs (V1 framing, relative controls only).
    Cct = 0x5A,
    /// RGB+CCT bulbs speaking the obfuscated V2 framing.
    RgbCct = 0x20,
}

impl DeviceType {
    /// All device types, in the order radios are scanned when listening.
    pub const ALL: [DeviceType; 3] = [DeviceType::Rgbw, DeviceType::Cct, DeviceType::RgbCct];

    /// Return the wire tag byte for this device type.
    pub fn tag(&self) -> u8 {
        *self as u8
    }

    /// Return the canonical lowercase name (`rgbw`, `cct`, `rgb_cct`).
    pub fn name(&self) -> &'static str {
        match self {
            DeviceType::Rgbw => "rgbw",
            DeviceType::Cct => "cct",
            DeviceType::RgbCct => "rgb_cct",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string cannot be parsed into a [`DeviceType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDeviceTypeError(String);

impl fmt::Display for ParseDeviceTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown device type: {}", self.0)
    }
}

impl std::error::Error for ParseDeviceTypeError {}

impl From<ParseDeviceTypeError> for crate::error::Error {
    fn from(e: ParseDeviceTypeError) -> Self {
        crate::error::Error::UnknownDeviceType(e.0)
    }
}

impl FromStr for DeviceType {
    type Err = ParseDeviceTypeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rgbw" => Ok(DeviceType::Rgbw),
            "cct" => Ok(DeviceType::Cct),
            "rgb_cct" | "rgbcct" | "rgb+cct" => Ok(DeviceType::RgbCct),
            _ => Err(ParseDeviceTypeError(s.to_string())),
        }
    }
}

/// On/off state of a group.
///
/// The discriminants are the offsets the V1 dialects add to their per-group
/// ON button to get the matching OFF button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    On = 0,
    Off = 1,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::On => f.write_str("ON"),
            Status::Off => f.write_str("OFF"),
        }
    }
}

/// A remote/gateway identity plus the group it addresses.
///
/// Group `0` addresses every group paired with the device id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceAddress {
    /// 16-bit id of the emulated remote, sent big-endian.
    pub device_id: u16,
    /// Group (zone) number, `0` for all groups.
    pub group_id: u8,
}

impl DeviceAddress {
    /// Group id meaning "all groups" for this device id.
    pub const ALL_GROUPS: u8 = 0;

    pub fn new(device_id: u16, group_id: u8) -> Self {
        DeviceAddress {
            device_id,
            group_id,
        }
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06X}/{}", self.device_id, self.group_id)
    }
}

/// What a device family can do natively.
///
/// The client consults these flags to decide whether an absolute brightness
/// or temperature request must be emulated with relative step commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightCapabilities {
    /// Accepts an absolute brightness level in a single packet.
    pub absolute_brightness: bool,
    /// Accepts an absolute color temperature in a single packet.
    pub absolute_temperature: bool,
    /// Has relative brightness up/down buttons.
    pub relative_brightness: bool,
    /// Has relative temperature up/down buttons.
    pub relative_temperature: bool,
    /// Supports hue / raw color commands.
    pub color: bool,
    /// Supports saturation commands.
    pub saturation: bool,
    /// Number of built-in animation modes (0 if none).
    pub num_modes: u8,
}

/// Semantic content decoded from an inbound packet.
///
/// Fields a packet does not carry are left as `None`. Levels use the same
/// caller-facing ranges the formatters accept (0-100, hue 0-360).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedState {
    pub device_type: DeviceType,
    pub device_id: u16,
    pub group_id: u8,
    /// Raw command byte, after removing dialect flags such as "held".
    pub command: u8,
    pub status: Option<Status>,
    pub brightness: Option<u8>,
    pub hue: Option<u16>,
    pub temperature: Option<u8>,
    pub saturation: Option<u8>,
    pub mode: Option<u8>,
}

impl ParsedState {
    /// Create an empty state for the given header fields.
    pub fn new(device_type: DeviceType, device_id: u16, group_id: u8, command: u8) -> Self {
        ParsedState {
            device_type,
            device_id,
            group_id,
            command,
            status: None,
            brightness: None,
            hue: None,
            temperature: None,
            saturation: None,
            mode: None,
        }
    }
}
