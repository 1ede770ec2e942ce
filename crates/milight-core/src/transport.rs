//! Transport trait for the 2.4GHz radio link.
//!
//! The [`Transport`] trait abstracts over the physical radio that carries
//! raw packets for one dialect. Each dialect uses its own radio settings
//! (sync words, channels), so the client holds one transport per configured
//! device type and re-configures it whenever it becomes the active radio.
//!
//! Packet formatters never touch a transport. The client drains a
//! [`PacketStream`](crate::packet::PacketStream) and hands each packet to
//! the active transport, which keeps formatters pure and lets tests swap
//! in `MockRadio` from the `milight-test-harness` crate.

use async_trait::async_trait;

use crate::error::Result;

/// Asynchronous raw-packet transport for one radio dialect.
///
/// Packets are fixed-length per dialect (7 or 9 bytes). Writes are
/// fire-and-forget: writing the same packet several times is the resend
/// policy, not an error-recovery mechanism, and must have no side effect
/// beyond transmission.
#[async_trait]
pub trait Transport: Send {
    /// Apply this dialect's radio settings.
    ///
    /// Called whenever the client switches to this transport from a
    /// different dialect, before any packet is written.
    async fn configure(&mut self) -> Result<()>;

    /// Transmit one raw packet.
    async fn write(&mut self, packet: &[u8]) -> Result<()>;

    /// Check whether a received packet is waiting to be read.
    async fn available(&mut self) -> bool;

    /// Read one received packet into `buf`.
    ///
    /// Returns the number of bytes read, or `0` when no packet was waiting.
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize>;
}
