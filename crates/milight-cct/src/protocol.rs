//! CCT packet layout and button codes.
//!
//! ```text
//! [0] 0x5A               device tag
//! [1] device id (hi)
//! [2] device id (lo)
//! [3] group
//! [4] button
//! [5] sequence number
//! [6] sequence number    (repeated)
//! ```
//!
//! CCT remotes only have relative controls. Button codes are not laid out
//! arithmetically, so the per-group status buttons come from a table.

use milight_core::Status;

/// Device tag written into byte 0.
pub const CCT_TAG: u8 = 0x5A;

/// Total packet length in bytes.
pub const PACKET_LENGTH: usize = 7;

pub const GROUP_INDEX: usize = 3;
pub const COMMAND_INDEX: usize = 4;
pub const SEQUENCE_INDEX: usize = 5;
pub const SEQUENCE_REPEAT_INDEX: usize = 6;

/// Highest addressable group on a CCT remote.
pub const MAX_GROUP: u8 = 4;

// ---------------------------------------------------------------
// Button codes
// ---------------------------------------------------------------

pub const ALL_ON: u8 = 0x05;
pub const ALL_OFF: u8 = 0x09;
pub const GROUP_1_ON: u8 = 0x08;
pub const GROUP_1_OFF: u8 = 0x0B;
pub const GROUP_2_ON: u8 = 0x0D;
pub const GROUP_2_OFF: u8 = 0x03;
pub const GROUP_3_ON: u8 = 0x07;
pub const GROUP_3_OFF: u8 = 0x0A;
pub const GROUP_4_ON: u8 = 0x02;
pub const GROUP_4_OFF: u8 = 0x06;
pub const BRIGHTNESS_DOWN: u8 = 0x04;
pub const BRIGHTNESS_UP: u8 = 0x0C;
pub const TEMPERATURE_UP: u8 = 0x0E;
pub const TEMPERATURE_DOWN: u8 = 0x0F;

/// `(on, off)` buttons indexed by group, group 0 being "all".
const STATUS_BUTTONS: [(u8, u8); 5] = [
    (ALL_ON, ALL_OFF),
    (GROUP_1_ON, GROUP_1_OFF),
    (GROUP_2_ON, GROUP_2_OFF),
    (GROUP_3_ON, GROUP_3_OFF),
    (GROUP_4_ON, GROUP_4_OFF),
];

/// Button that switches `group_id` on or off, or `None` past group 4.
pub fn status_button(status: Status, group_id: u8) -> Option<u8> {
    let (on, off) = STATUS_BUTTONS.get(usize::from(group_id))?;
    Some(match status {
        Status::On => *on,
        Status::Off => *off,
    })
}

/// Reverse lookup of a status button into its group and state.
pub fn decode_status_button(button: u8) -> Option<(u8, Status)> {
    STATUS_BUTTONS
        .iter()
        .zip(0u8..)
        .find_map(|(&(on, off), group)| {
            if button == on {
                Some((group, Status::On))
            } else if button == off {
                Some((group, Status::Off))
            } else {
                None
            }
        })
}
