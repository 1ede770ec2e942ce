//! V2 packet cipher.
//!
//! RGB+CCT bulbs only accept packets run through a reversible byte-level
//! obfuscation keyed by byte 0 of the packet (the key tag). This module
//! handles the pure encode/decode of 9-byte V2 packets and the checksum
//! they carry.
//!
//! # Scheme
//!
//! ```text
//! key        = xor_key(tag)
//! encoded[i] = ((raw[i] + s1) ^ key) + s2        (mod 256)
//! ```
//!
//! - Byte 0 (the tag) is sent in the clear.
//! - Bytes 1-7 use `s1 = 0` and `s2 = offset_for(i, tag, jump_start)`.
//!   The argument byte (5) takes its jump start from the command in byte 4;
//!   the others take theirs from [`BYTE_JUMP_STARTS`].
//! - Byte 8 is the checksum `key + sum(raw[1..=7])`, encoded with
//!   `s1 = CHECKSUM_SALT` and no jump window.
//!
//! Decoding removes the salt again, so a decoded packet satisfies
//! `decoded[8] == checksum(decoded)`.

use milight_core::error::{Error, Result};
use milight_core::helpers::check_length;

/// Length of a V2 packet in bytes.
pub const PACKET_LENGTH: usize = 9;

/// Index of the cleartext key tag.
pub const KEY_INDEX: usize = 0;

/// Index of the command byte whose value selects the argument jump start.
pub const COMMAND_INDEX: usize = 4;

/// Index of the argument byte.
pub const ARGUMENT_INDEX: usize = 5;

/// Index of the checksum byte.
pub const CHECKSUM_INDEX: usize = 8;

/// Constant added to the checksum before encryption.
pub const CHECKSUM_SALT: u8 = 2;

/// Per-byte base offsets. Rows are byte positions 1-8, columns `tag % 4`.
pub const V2_OFFSETS: [[u8; 4]; 8] = [
    [0x45, 0x1F, 0x14, 0x5C],
    [0xAB, 0x49, 0x63, 0x91],
    [0x2D, 0x1F, 0x4A, 0xEB],
    [0xAF, 0x03, 0x1D, 0xF3],
    [0x5A, 0x22, 0x30, 0x11],
    [0x04, 0xD8, 0x71, 0x42],
    [0xAF, 0x04, 0xDD, 0x07],
    [0xE1, 0x93, 0xB8, 0xE4],
];

/// Jump-window start for each byte position. Zero means no window.
///
/// Position 0 is the cleartext tag, position 5 is looked up in
/// [`ARG_JUMP_STARTS`] instead and position 8 is the checksum.
pub const BYTE_JUMP_STARTS: [u8; PACKET_LENGTH] = [0, 0x54, 0x54, 0x14, 0x54, 0, 0x54, 0x54, 0];

/// Jump-window start for the argument byte, indexed by command id.
///
/// Command 0 does not exist; 4 is shared by brightness and saturation.
pub const ARG_JUMP_STARTS: [u8; 6] = [0, 0x14, 0x14, 0x14, 0x54, 0x14];

/// Width of the jump window above its start, inclusive.
const JUMP_WINDOW: u16 = 0x80;

/// Extra offset added inside a jump window.
const JUMP_OFFSET: u8 = 0x80;

/// Derive the XOR key from a key tag.
///
/// Only 128 distinct keys exist across the 256 possible tags.
pub fn xor_key(tag: u8) -> u8 {
    let shift = if tag & 0x0F < 0x04 { 0 } else { 1 };
    let x = ((tag >> 4) + shift + 6) % 8;
    let msn = (((4 + x) ^ 1) & 0x0F) << 4;
    let lsn = (((tag & 0x0F) + 4) ^ 2) & 0x0F;
    msn | lsn
}

/// Additive offset for byte `position` (1-8) under `tag`.
///
/// Adds 0x80 when `jump_start` is non-zero and
/// `jump_start <= tag <= jump_start + 0x80`.
pub fn offset_for(position: usize, tag: u8, jump_start: u8) -> u8 {
    let base = V2_OFFSETS[position - 1][usize::from(tag % 4)];
    let in_window = jump_start > 0
        && tag >= jump_start
        && u16::from(tag) <= u16::from(jump_start) + JUMP_WINDOW;
    if in_window {
        base.wrapping_add(JUMP_OFFSET)
    } else {
        base
    }
}

/// Jump-window start for the argument of `command`.
///
/// Returns [`Error::UnknownCommand`] for ids outside the table.
pub fn arg_jump_start(command: u8) -> Result<u8> {
    ARG_JUMP_STARTS
        .get(usize::from(command))
        .copied()
        .ok_or(Error::UnknownCommand(command))
}

/// Encode one byte: `((value + s1) ^ key) + s2`, wrapping.
pub fn encode_byte(value: u8, s1: u8, key: u8, s2: u8) -> u8 {
    (value.wrapping_add(s1) ^ key).wrapping_add(s2)
}

/// Exact inverse of [`encode_byte`] for the same parameters.
pub fn decode_byte(value: u8, s1: u8, key: u8, s2: u8) -> u8 {
    (value.wrapping_sub(s2) ^ key).wrapping_sub(s1)
}

/// Expected checksum of a raw (decoded) packet: `key + sum(bytes 1..=7)`.
pub fn checksum(packet: &[u8]) -> Result<u8> {
    check_length(packet, PACKET_LENGTH)?;
    Ok(packet[1..CHECKSUM_INDEX]
        .iter()
        .fold(xor_key(packet[KEY_INDEX]), |sum, b| sum.wrapping_add(*b)))
}

/// Return an error unless a decoded packet carries its expected checksum.
pub fn verify_checksum(packet: &[u8]) -> Result<()> {
    let expected = checksum(packet)?;
    if packet[CHECKSUM_INDEX] != expected {
        return Err(Error::InvalidPacket(format!(
            "checksum mismatch: expected {expected:#04X}, got {:#04X}",
            packet[CHECKSUM_INDEX]
        )));
    }
    Ok(())
}

/// Encrypt a raw V2 packet in place and fill in its checksum.
///
/// Whatever byte 8 held is replaced. On error the packet is left untouched.
pub fn encode_packet(packet: &mut [u8]) -> Result<()> {
    check_length(packet, PACKET_LENGTH)?;
    let tag = packet[KEY_INDEX];
    let arg_start = arg_jump_start(packet[COMMAND_INDEX])?;
    let key = xor_key(tag);
    let sum = checksum(packet)?;

    for i in 1..CHECKSUM_INDEX {
        let jump_start = if i == ARGUMENT_INDEX {
            arg_start
        } else {
            BYTE_JUMP_STARTS[i]
        };
        packet[i] = encode_byte(packet[i], 0, key, offset_for(i, tag, jump_start));
    }
    packet[CHECKSUM_INDEX] = encode_byte(
        sum,
        CHECKSUM_SALT,
        key,
        offset_for(CHECKSUM_INDEX, tag, BYTE_JUMP_STARTS[CHECKSUM_INDEX]),
    );
    Ok(())
}

/// Decrypt an on-air V2 packet in place.
///
/// The argument byte is decoded after the command byte, since the decoded
/// command selects its jump window. Does not verify the checksum; see
/// [`verify_checksum`]. On error the packet is left untouched.
pub fn decode_packet(packet: &mut [u8]) -> Result<()> {
    check_length(packet, PACKET_LENGTH)?;
    let tag = packet[KEY_INDEX];
    let key = xor_key(tag);

    let mut decoded = [0u8; PACKET_LENGTH];
    decoded.copy_from_slice(packet);

    for i in 1..CHECKSUM_INDEX {
        if i != ARGUMENT_INDEX {
            decoded[i] = decode_byte(decoded[i], 0, key, offset_for(i, tag, BYTE_JUMP_STARTS[i]));
        }
    }
    let arg_start = arg_jump_start(decoded[COMMAND_INDEX])?;
    decoded[ARGUMENT_INDEX] = decode_byte(
        decoded[ARGUMENT_INDEX],
        0,
        key,
        offset_for(ARGUMENT_INDEX, tag, arg_start),
    );
    decoded[CHECKSUM_INDEX] = decode_byte(
        decoded[CHECKSUM_INDEX],
        CHECKSUM_SALT,
        key,
        offset_for(CHECKSUM_INDEX, tag, BYTE_JUMP_STARTS[CHECKSUM_INDEX]),
    );

    packet.copy_from_slice(&decoded);
    Ok(())
}
