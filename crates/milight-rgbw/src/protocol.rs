//! RGBW (legacy V1) packet layout and button codes.
//!
//! The RGBW dialect sends plain 7-byte packets with no obfuscation:
//!
//! ```text
//! [0] 0xB8 | mode        device tag, low bits carry the disco mode
//! [1] device id (hi)
//! [2] device id (lo)
//! [3] color              raw 0-255 color wheel position
//! [4] brightness << 3 | group
//! [5] button             bit 7 set while the button is held
//! [6] sequence number
//! ```
//!
//! Brightness lives on a 32-slot wheel of which 26 slots are used: the
//! minimum is slot 16 and the maximum slot 23, counting down through 0 and
//! wrapping from 31:
//!
//! ```text
//! [16, 15, ..., 1, 0, 31, 30, ..., 23]
//! ```

use milight_core::{rescale, Status};

/// Device tag written into byte 0.
pub const RGBW_TAG: u8 = 0xB8;

/// Total packet length in bytes.
pub const PACKET_LENGTH: usize = 7;

pub const COLOR_INDEX: usize = 3;
pub const BRIGHTNESS_GROUP_INDEX: usize = 4;
pub const COMMAND_INDEX: usize = 5;
pub const SEQUENCE_INDEX: usize = 6;

/// Repeat indicator ORed into the button byte while a button is held.
pub const HELD_FLAG: u8 = 0x80;

/// Number of built-in disco modes.
pub const NUM_MODES: u8 = 9;

/// Phase shift aligning the device color wheel with conventional hue 0.
pub const HUE_OFFSET: u16 = 40;

/// Number of usable brightness steps on the wheel (0..=25).
pub const BRIGHTNESS_STEPS: u16 = 25;

// ---------------------------------------------------------------
// Button codes
// ---------------------------------------------------------------

/// All groups on. Group `n` ON is `ALL_ON + 2n`, OFF is one higher.
pub const ALL_ON: u8 = 0x01;
pub const ALL_OFF: u8 = 0x02;
pub const GROUP_4_OFF: u8 = 0x0A;
pub const SPEED_UP: u8 = 0x0B;
pub const SPEED_DOWN: u8 = 0x0C;
pub const DISCO_MODE: u8 = 0x0D;
pub const BRIGHTNESS: u8 = 0x0E;
pub const COLOR: u8 = 0x0F;
/// All groups to white. Group `n` white is `ALL_MAX_LEVEL + 2n`.
pub const ALL_MAX_LEVEL: u8 = 0x11;
/// All groups to night light. Group `n` is `ALL_MIN_LEVEL + 2n`.
pub const ALL_MIN_LEVEL: u8 = 0x12;
pub const GROUP_4_MIN_LEVEL: u8 = 0x1A;

/// Highest addressable group. Group 0 addresses all groups.
pub const MAX_GROUP: u8 = 4;

/// Button that switches `group_id` (0 = all) on or off, or `None` for a
/// group the remote has no button for.
pub fn status_button(status: Status, group_id: u8) -> Option<u8> {
    (group_id <= MAX_GROUP).then(|| ALL_ON + group_id * 2 + status as u8)
}

/// Button that switches `group_id` (0 = all) to white.
pub fn white_button(group_id: u8) -> Option<u8> {
    (group_id <= MAX_GROUP).then(|| ALL_MAX_LEVEL + group_id * 2)
}

/// Button that switches `group_id` (0 = all) to night-light level.
pub fn night_button(group_id: u8) -> Option<u8> {
    (group_id <= MAX_GROUP).then(|| ALL_MIN_LEVEL + group_id * 2)
}

/// Map a 0-100 brightness onto the 5-bit wheel slot.
pub fn encode_brightness(percent: u8) -> u8 {
    let steps = rescale(u16::from(percent.min(100)), BRIGHTNESS_STEPS, 100) as u8;
    (31 - steps + 17) % 32
}

/// Map a wheel slot back to 0-100.
///
/// Slots outside the used range decode past the maximum and are clamped.
pub fn decode_brightness(slot: u8) -> u8 {
    let steps = (31 - (slot & 0x1F) + 17) % 32;
    rescale(u16::from(steps), 100, BRIGHTNESS_STEPS).min(100) as u8
}

/// Map a hue in degrees onto the raw color wheel.
pub fn encode_hue(hue: u16) -> u8 {
    let shifted = (hue % 360 + HUE_OFFSET) % 360;
    rescale(shifted, 255, 360) as u8
}

/// Map a raw color wheel position back to degrees.
pub fn decode_hue(raw: u8) -> u16 {
    (rescale(u16::from(raw), 360, 255) + 360 - HUE_OFFSET) % 360
}
