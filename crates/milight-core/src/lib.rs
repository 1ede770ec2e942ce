//! milight-core: Core traits, types, and error definitions for milight.
//!
//! This crate defines the dialect-agnostic abstractions that every packet
//! dialect implements. Front-ends and the client depend on these types
//! without pulling in any specific framing.
//!
//! # Key types
//!
//! - [`PacketFormatter`] -- the uniform command interface over one dialect
//! - [`PacketBuilder`] -- per-session staging state (address, sequence)
//! - [`PacketStream`] / [`Packet`] -- finalized packets for one command
//! - [`Transport`] -- raw packet radio link
//! - [`Error`] / [`Result`] -- error handling

pub mod error;
pub mod formatter;
pub mod helpers;
pub mod packet;
pub mod transport;
pub mod types;

// Re-export key types at crate root for ergonomic `use milight_core::*`.
pub use error::{Error, Result};
pub use formatter::{PAIR_REPEATS, PacketBuilder, PacketFormatter};
pub use helpers::{check_length, format_v1_packet, rescale};
pub use packet::{Packet, PacketStream, RepeatPolicy, hex_string, parse_hex};
pub use transport::Transport;
pub use types::*;
