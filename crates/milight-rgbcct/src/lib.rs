//! Encrypted V2 RGB+CCT packet dialect for milight.
//!
//! RGB+CCT bulbs speak a 9-byte framing protected by a reversible cipher
//! keyed by the first packet byte. This crate provides:
//!
//! - **Cipher** ([`cipher`]) -- key derivation, the per-byte offset tables
//!   with their jump windows, packet encode/decode and checksum checks.
//! - **Packet layout** ([`protocol`]) -- command ids and argument encodings.
//! - **Formatter** ([`formatter`]) -- the
//!   [`PacketFormatter`](milight_core::PacketFormatter) implementation, which
//!   encrypts packets as they are built and decrypts them for parsing.
//!
//! # Example
//!
//! ```
//! use milight_rgbcct::cipher::{decode_packet, encode_packet, verify_checksum};
//!
//! // ON for group 1 of remote 0x1234, sequence 0
//! let mut packet = [0x00, 0x20, 0x12, 0x34, 0x01, 0xC1, 0x00, 0x01, 0x00];
//! encode_packet(&mut packet).unwrap();
//! assert_eq!(packet, [0x00, 0xDB, 0x4F, 0xAF, 0x66, 0xD1, 0xBA, 0x66, 0x38]);
//!
//! decode_packet(&mut packet).unwrap();
//! verify_checksum(&packet).unwrap();
//! assert_eq!(packet[5], 0xC1);
//! ```

pub mod cipher;
pub mod formatter;
pub mod protocol;

pub use formatter::RgbCctFormatter;
