//! Finalized packets and the streams that carry them.
//!
//! A [`Packet`] is an immutable, fully encoded byte buffer ready for the
//! radio. A [`PacketStream`] is the finite sequence of packets produced by
//! one logical command: one packet for ordinary commands, several for
//! pairing or multi-button sequences. Streams are consumed once with a
//! single read cursor and are never restarted; the next command always
//! builds a new stream.

use std::fmt;
use std::ops::Deref;

use bytes::Bytes;

/// An immutable, finalized packet.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Packet(Bytes);

impl Packet {
    /// Wrap finalized packet bytes.
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Packet(bytes.into())
    }

    /// Return the raw packet bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Deref for Packet {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Packet {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Packet {
    fn from(bytes: Vec<u8>) -> Self {
        Packet(Bytes::from(bytes))
    }
}

impl fmt::Debug for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Packet({})", hex_string(&self.0))
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex_string(&self.0))
    }
}

/// How the client should transmit the packets of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatPolicy {
    /// Write every packet `resend_count` times.
    #[default]
    Resend,
    /// The formatter already expanded the stream (pairing); write each
    /// packet exactly once.
    Once,
}

/// A finite, ordered sequence of packets for one logical command.
#[derive(Debug, Clone, Default)]
pub struct PacketStream {
    packets: Vec<Packet>,
    cursor: usize,
    repeat: RepeatPolicy,
}

impl PacketStream {
    /// Create a stream over `packets` with the given repeat policy.
    pub fn new(packets: Vec<Packet>, repeat: RepeatPolicy) -> Self {
        PacketStream {
            packets,
            cursor: 0,
            repeat,
        }
    }

    /// An empty stream (the command staged nothing).
    pub fn empty() -> Self {
        PacketStream::default()
    }

    /// Return `true` while packets remain after the cursor.
    pub fn has_next(&self) -> bool {
        self.cursor < self.packets.len()
    }

    /// Total number of packets in the stream, independent of the cursor.
    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    /// The repeat policy the formatter chose for this stream.
    pub fn repeat(&self) -> RepeatPolicy {
        self.repeat
    }

    /// Number of times each packet should be written for a given resend count.
    pub fn writes_per_packet(&self, resend_count: u32) -> u32 {
        match self.repeat {
            RepeatPolicy::Resend => resend_count,
            RepeatPolicy::Once => 1,
        }
    }

    /// View all packets without moving the cursor.
    pub fn packets(&self) -> &[Packet] {
        &self.packets
    }
}

impl Iterator for PacketStream {
    type Item = Packet;

    fn next(&mut self) -> Option<Packet> {
        let packet = self.packets.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(packet)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.packets.len() - self.cursor;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PacketStream {}

/// Render bytes as space-separated uppercase hex (`"B8 12 34"`).
pub fn hex_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a hex packet such as `"B8 12 34"`, `"B81234"` or `"0xB8,0x12"`.
pub fn parse_hex(s: &str) -> crate::Result<Vec<u8>> {
    let cleaned: String = s
        .split(|c: char| c.is_whitespace() || c == ',' || c == ':')
        .map(|tok| {
            tok.strip_prefix("0x")
                .or_else(|| tok.strip_prefix("0X"))
                .unwrap_or(tok)
        })
        .collect();

    if !cleaned.is_ascii() {
        return Err(crate::Error::InvalidPacket(format!(
            "non-hex characters in {s:?}"
        )));
    }
    if cleaned.len() % 2 != 0 {
        return Err(crate::Error::InvalidPacket(format!(
            "odd number of hex digits in {s:?}"
        )));
    }

    (0..cleaned.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&cleaned[i..i + 2], 16)
                .map_err(|e| crate::Error::InvalidPacket(format!("invalid hex byte: {e}")))
        })
        .collect()
}
