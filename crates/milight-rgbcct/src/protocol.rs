//! RGB+CCT (V2) packet layout, command ids and argument encodings.
//!
//! Raw packets are 9 bytes before the cipher runs:
//!
//! ```text
//! [0] key tag            seeds the cipher, sent in the clear
//! [1] 0x20               protocol id
//! [2] device id (hi)
//! [3] device id (lo)
//! [4] command
//! [5] argument
//! [6] sequence number
//! [7] group
//! [8] checksum           filled in by the cipher
//! ```
//!
//! Brightness and saturation share command 4 and are told apart by their
//! argument ranges: brightness occupies `0x4F..=0xB3`, saturation wraps
//! around through `0xCD..=0x31`.

use milight_core::{rescale, Status};

/// Key tag used for every outgoing packet.
pub const KEY_TAG: u8 = 0x00;

/// Protocol id carried in byte 1.
pub const PROTOCOL_ID: u8 = 0x20;

pub const PROTOCOL_INDEX: usize = 1;
pub const SEQUENCE_INDEX: usize = 6;
pub const GROUP_INDEX: usize = 7;

// ---------------------------------------------------------------
// Command ids
// ---------------------------------------------------------------

pub const CMD_ON: u8 = 0x01;
pub const CMD_COLOR: u8 = 0x02;
pub const CMD_KELVIN: u8 = 0x03;
pub const CMD_BRIGHTNESS: u8 = 0x04;
pub const CMD_SATURATION: u8 = 0x04;
pub const CMD_MODE: u8 = 0x05;

// ---------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------

/// ON argument for group 0; group `n` ON is `STATUS_BASE + n`.
pub const STATUS_BASE: u8 = 0xC0;
/// Added to the ON argument to turn the group off instead.
pub const STATUS_OFF_SHIFT: u8 = 5;
pub const SPEED_UP_ARG: u8 = 0x0A;
pub const SPEED_DOWN_ARG: u8 = 0x0B;

pub const COLOR_OFFSET: u8 = 0x15;
pub const HUE_OFFSET: u16 = 20;
pub const KELVIN_OFFSET: u8 = 0x4C;
pub const BRIGHTNESS_OFFSET: u8 = 0x4F;
pub const SATURATION_OFFSET: u8 = 0x33;

/// Number of built-in animation modes.
pub const NUM_MODES: u8 = 9;

/// Highest group an ON/OFF argument can address.
pub const MAX_GROUP: u8 = 4;

/// ON/OFF argument for `group_id` (0 = all), or `None` past [`MAX_GROUP`].
pub fn status_arg(status: Status, group_id: u8) -> Option<u8> {
    if group_id > MAX_GROUP {
        return None;
    }
    let arg = STATUS_BASE + group_id;
    Some(match status {
        Status::On => arg,
        Status::Off => arg + STATUS_OFF_SHIFT,
    })
}

/// Inverse of [`status_arg`] for groups 0-4.
pub fn decode_status_arg(arg: u8) -> Option<(u8, Status)> {
    let offset = arg.checked_sub(STATUS_BASE)?;
    match offset {
        0..=MAX_GROUP => Some((offset, Status::On)),
        5..=9 => Some((offset - STATUS_OFF_SHIFT, Status::Off)),
        _ => None,
    }
}

/// Map a hue in degrees onto the raw 0-255 color wheel.
pub fn hue_to_raw(hue: u16) -> u8 {
    let shifted = (hue % 360 + HUE_OFFSET) % 360;
    rescale(shifted, 255, 360) as u8
}

/// Map a raw color wheel position back to degrees.
pub fn raw_to_hue(raw: u8) -> u16 {
    (rescale(u16::from(raw), 360, 255) + 360 - HUE_OFFSET) % 360
}

pub fn color_arg(raw: u8) -> u8 {
    raw.wrapping_add(COLOR_OFFSET)
}

pub fn decode_color_arg(arg: u8) -> u8 {
    arg.wrapping_sub(COLOR_OFFSET)
}

/// Temperature 0 (warm) to 100 (cool).
pub fn kelvin_arg(temperature: u8) -> u8 {
    KELVIN_OFFSET
        .wrapping_add(temperature.min(100))
        .wrapping_mul(2)
}

pub fn decode_kelvin_arg(arg: u8) -> u8 {
    ((arg / 2 + 52) % 128).min(100)
}

pub fn brightness_arg(brightness: u8) -> u8 {
    BRIGHTNESS_OFFSET + brightness.min(100)
}

pub fn saturation_arg(saturation: u8) -> u8 {
    saturation.min(100).wrapping_sub(SATURATION_OFFSET)
}

/// Tell a command-4 argument apart into brightness or saturation.
pub fn decode_level_arg(arg: u8) -> Level {
    let brightness = arg.wrapping_sub(BRIGHTNESS_OFFSET);
    if brightness <= 100 {
        return Level::Brightness(brightness);
    }
    let saturation = arg.wrapping_add(SATURATION_OFFSET);
    if saturation <= 100 {
        return Level::Saturation(saturation);
    }
    Level::Unknown
}

/// A decoded command-4 argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Brightness(u8),
    Saturation(u8),
    Unknown,
}
