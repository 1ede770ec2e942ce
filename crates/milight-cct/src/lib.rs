//! Color-temperature (CCT) packet dialect for milight.
//!
//! CCT bulbs take a plain 7-byte packet and expose only relative brightness
//! and temperature buttons plus per-group on/off. This crate provides:
//!
//! - **Packet layout** ([`protocol`]) -- byte offsets and the button table.
//! - **Formatter** ([`formatter`]) -- the
//!   [`PacketFormatter`](milight_core::PacketFormatter) implementation.
//!
//! # Example
//!
//! ```
//! use milight_core::{PacketFormatter, Status};
//! use milight_cct::CctFormatter;
//!
//! let mut formatter = CctFormatter::new();
//! formatter.prepare(0x1234, 1);
//! formatter.update_status(Status::On);
//!
//! let stream = formatter.build_packets().unwrap();
//! assert_eq!(
//!     stream.packets()[0].as_bytes(),
//!     &[0x5A, 0x12, 0x34, 0x01, 0x08, 0x00, 0x00]
//! );
//! ```

pub mod formatter;
pub mod protocol;

pub use formatter::CctFormatter;
