//! Legacy RGBW packet dialect for milight.
//!
//! This crate implements the plain 7-byte framing spoken by the first
//! generation of RGBW bulbs and their four-zone remotes. It provides:
//!
//! - **Packet layout** ([`protocol`]) -- byte offsets, button codes, and the
//!   brightness and color wheel mappings.
//! - **Formatter** ([`formatter`]) -- the
//!   [`PacketFormatter`](milight_core::PacketFormatter) implementation that
//!   stages button presses into packets.
//!
//! # Example
//!
//! ```
//! use milight_core::{PacketFormatter, Status};
//! use milight_rgbw::RgbwFormatter;
//!
//! let mut formatter = RgbwFormatter::new();
//! formatter.prepare(0xABCD, 2);
//! formatter.update_status(Status::On);
//!
//! let stream = formatter.build_packets().unwrap();
//! assert_eq!(
//!     stream.packets()[0].as_bytes(),
//!     &[0xB8, 0xAB, 0xCD, 0x00, 0x02, 0x05, 0x00]
//! );
//! ```

pub mod formatter;
pub mod protocol;

pub use formatter::RgbwFormatter;
