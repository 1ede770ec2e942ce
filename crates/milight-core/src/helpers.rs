//! Numeric remapping and diagnostic rendering shared by the dialects.

use std::fmt::Write;

use crate::error::{Error, Result};

/// Rescale `value` from the range `[0, old_max]` to `[0, new_max]`.
///
/// Computes `round(value * new_max / old_max)`, rounding halves away from
/// zero. Non-decreasing in `value` for fixed bounds. An `old_max` of zero
/// maps everything to zero.
///
/// # Example
///
/// ```
/// use milight_core::rescale;
///
/// assert_eq!(rescale(50, 255, 100), 128);
/// assert_eq!(rescale(100, 25, 100), 25);
/// assert_eq!(rescale(42, 25, 100), 11);
/// ```
pub fn rescale(value: u16, new_max: u16, old_max: u16) -> u16 {
    if old_max == 0 {
        return 0;
    }
    (f32::from(value) * f32::from(new_max) / f32::from(old_max)).round() as u16
}

/// Return an error unless `packet` is exactly `expected` bytes long.
pub fn check_length(packet: &[u8], expected: usize) -> Result<()> {
    if packet.len() != expected {
        return Err(Error::InvalidPacket(format!(
            "expected {expected} bytes, got {}",
            packet.len()
        )));
    }
    Ok(())
}

/// Render a 7-byte V1 packet (RGBW or CCT) as a labelled field dump.
///
/// The V1 dialects carry no obfuscation, so the dump is the raw fields:
///
/// ```text
/// Request type  : B8
/// Device ID     : 1234
/// b1            : 00
/// b2            : 02
/// b3            : 05
/// Sequence Num. : 00
/// ```
pub fn format_v1_packet(packet: &[u8]) -> Result<String> {
    check_length(packet, 7)?;

    let mut out = String::with_capacity(128);
    // Writing to a String cannot fail.
    let _ = writeln!(out, "Request type  : {:02X}", packet[0]);
    let _ = writeln!(out, "Device ID     : {:02X}{:02X}", packet[1], packet[2]);
    let _ = writeln!(out, "b1            : {:02X}", packet[3]);
    let _ = writeln!(out, "b2            : {:02X}", packet[4]);
    let _ = writeln!(out, "b3            : {:02X}", packet[5]);
    let _ = write!(out, "Sequence Num. : {:02X}", packet[6]);
    Ok(out)
}
