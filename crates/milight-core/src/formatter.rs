//! The `PacketFormatter` trait -- uniform command interface for all dialects.
//!
//! Each dialect crate (milight-rgbw, milight-cct, milight-rgbcct) provides
//! a concrete formatter that implements this trait. The client programs
//! against `dyn PacketFormatter` and never needs to know which framing or
//! obfuscation is in use.
//!
//! # Staging model
//!
//! A formatter owns a [`PacketBuilder`]. Semantic commands (`update_hue`,
//! `update_status`, ...) stage bytes into the builder's current packet.
//! A command that needs more than one packet simply stages again: the
//! second staged command starts a fresh packet with the next sequence
//! number. [`build_packets`](PacketFormatter::build_packets) finalizes
//! copies of everything staged (running the V2 cipher where needed) into an
//! immutable [`PacketStream`], and [`reset`](PacketFormatter::reset)
//! discards the staged packets and writes a new header for the next
//! command.
//!
//! Operations a dialect does not support are no-ops by default: hardware
//! without that capability simply ignores it, so nothing is staged and
//! flushing writes no packet.

use crate::error::{Error, Result};
use crate::helpers::format_v1_packet;
use crate::packet::{Packet, PacketStream, RepeatPolicy};
use crate::types::{DeviceAddress, DeviceType, ParsedState, Status};

/// Number of packets in a pairing sequence.
///
/// The receiver accepts the command if any one of them arrives.
pub const PAIR_REPEATS: usize = 5;

/// Per-session packet staging state shared by every dialect.
///
/// Holds the bound address, the wrapping sequence counter, the packet
/// currently being staged and any packets completed earlier in the same
/// command.
#[derive(Debug, Clone)]
pub struct PacketBuilder {
    packet_length: usize,
    address: Option<DeviceAddress>,
    sequence: u8,
    current: Vec<u8>,
    staged: bool,
    finished: Vec<Vec<u8>>,
    repeat: RepeatPolicy,
}

impl PacketBuilder {
    /// Create an unbound builder for packets of `packet_length` bytes.
    pub fn new(packet_length: usize) -> Self {
        PacketBuilder {
            packet_length,
            address: None,
            sequence: 0,
            current: vec![0; packet_length],
            staged: false,
            finished: Vec::new(),
            repeat: RepeatPolicy::Resend,
        }
    }

    pub fn packet_length(&self) -> usize {
        self.packet_length
    }

    /// The bound address, or `None` before `prepare()`.
    pub fn address(&self) -> Option<DeviceAddress> {
        self.address
    }

    /// The bound group id, or `0` (all groups) before `prepare()`.
    pub fn group_id(&self) -> u8 {
        self.address.map_or(DeviceAddress::ALL_GROUPS, |a| a.group_id)
    }

    /// Bind addressing. Sequence state is preserved.
    pub fn bind(&mut self, address: DeviceAddress) {
        self.address = Some(address);
    }

    /// The sequence number the next packet header will carry.
    pub fn sequence(&self) -> u8 {
        self.sequence
    }

    /// Consume and return the next sequence number (wrapping).
    pub fn take_sequence(&mut self) -> u8 {
        let seq = self.sequence;
        self.sequence = seq.wrapping_add(1);
        seq
    }

    /// Discard all staged packets and zero the current buffer.
    pub fn clear(&mut self) {
        self.finished.clear();
        self.current.iter_mut().for_each(|b| *b = 0);
        self.staged = false;
        self.repeat = RepeatPolicy::Resend;
    }

    /// Replace the current packet with `header`.
    ///
    /// If the current packet already holds a staged command it is kept as
    /// a completed packet of this command first.
    pub fn start_packet(&mut self, header: Vec<u8>) {
        debug_assert_eq!(header.len(), self.packet_length);
        let previous = std::mem::replace(&mut self.current, header);
        if self.staged {
            self.finished.push(previous);
        }
        self.staged = false;
    }

    /// Whether the current packet already carries a command.
    pub fn is_staged(&self) -> bool {
        self.staged
    }

    pub fn mark_staged(&mut self) {
        self.staged = true;
    }

    /// The packet currently being staged.
    pub fn current(&self) -> &[u8] {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut [u8] {
        &mut self.current
    }

    pub fn repeat(&self) -> RepeatPolicy {
        self.repeat
    }

    pub fn set_repeat(&mut self, repeat: RepeatPolicy) {
        self.repeat = repeat;
    }

    /// Number of packets the current command has staged so far.
    pub fn pending_count(&self) -> usize {
        self.finished.len() + usize::from(self.staged)
    }

    /// Iterate over the staged, not yet finalized packets in order.
    pub fn pending(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.finished
            .iter()
            .map(Vec::as_slice)
            .chain(self.staged.then_some(self.current.as_slice()))
    }
}

/// Uniform command interface over one packet dialect.
///
/// Implementors supply the dialect's header layout
/// ([`initialize_packet`](PacketFormatter::initialize_packet)), optional
/// finalization (the V2 cipher), and the commands their hardware supports.
/// Everything else has a default.
pub trait PacketFormatter: Send {
    /// The device family this formatter speaks.
    fn device_type(&self) -> DeviceType;

    /// Shared staging state.
    fn builder(&self) -> &PacketBuilder;

    fn builder_mut(&mut self) -> &mut PacketBuilder;

    /// Write the dialect's fixed header into a zeroed packet.
    fn initialize_packet(&self, packet: &mut [u8], address: DeviceAddress, sequence: u8);

    /// Transform a staged packet into its on-air form.
    ///
    /// V1 dialects send packets as staged; the V2 dialect encrypts here.
    fn finalize_packet(&self, _packet: &mut [u8]) -> Result<()> {
        Ok(())
    }

    /// Length in bytes of every packet this dialect produces.
    fn packet_length(&self) -> usize {
        self.builder().packet_length()
    }

    /// Bind addressing and reset the packet buffer.
    ///
    /// Rebinding preserves the sequence counter.
    fn prepare(&mut self, device_id: u16, group_id: u8) {
        self.builder_mut()
            .bind(DeviceAddress::new(device_id, group_id));
        self.reset();
    }

    /// Discard staged packets and write a fresh header, advancing the
    /// sequence counter. Called after every drained command.
    fn reset(&mut self) {
        self.builder_mut().clear();
        self.start_packet();
    }

    /// Begin a new packet carrying the next sequence number.
    ///
    /// Does nothing before `prepare()`.
    fn start_packet(&mut self) {
        let Some(address) = self.builder().address() else {
            return;
        };
        let sequence = self.builder_mut().take_sequence();
        let mut header = vec![0u8; self.packet_length()];
        self.initialize_packet(&mut header, address, sequence);
        self.builder_mut().start_packet(header);
    }

    /// Make the current packet ready for a command.
    ///
    /// If the current packet already carries a command, a new packet is
    /// started so that multi-button sequences stage one packet per button.
    fn begin_command(&mut self) {
        if self.builder().is_staged() {
            self.start_packet();
        }
        self.builder_mut().mark_staged();
    }

    /// Lowest-level command: write a command code and argument into the
    /// current packet.
    fn command(&mut self, command: u8, arg: u8);

    /// Turn a specific group on or off.
    fn update_status_for_group(&mut self, status: Status, group_id: u8);

    /// Turn the bound group on or off.
    fn update_status(&mut self, status: Status) {
        let group_id = self.builder().group_id();
        self.update_status_for_group(status, group_id);
    }

    /// Mark subsequent commands as "button held" rather than "pressed".
    fn set_held(&mut self, _held: bool) {}

    /// Set hue in degrees, 0-360; 360 wraps to 0.
    fn update_hue(&mut self, _hue: u16) {}

    /// Set the device's raw 0-255 color wheel position.
    fn update_color_raw(&mut self, _value: u8) {}

    /// Switch to white light.
    fn update_color_white(&mut self) {}

    /// Set saturation, 0-100.
    fn update_saturation(&mut self, _value: u8) {}

    /// Set absolute brightness, 0-100.
    fn update_brightness(&mut self, _value: u8) {}

    fn increase_brightness(&mut self) {}

    fn decrease_brightness(&mut self) {}

    /// Set absolute color temperature, 0 (warm) to 100 (cool).
    fn update_temperature(&mut self, _value: u8) {}

    fn increase_temperature(&mut self) {}

    fn decrease_temperature(&mut self) {}

    /// Select an animation mode by index.
    fn update_mode(&mut self, _mode: u8) {}

    fn next_mode(&mut self) {}

    fn previous_mode(&mut self) {}

    fn mode_speed_up(&mut self) {}

    fn mode_speed_down(&mut self) {}

    /// Put the bound group into its dimmest night-light state.
    fn enable_night_mode(&mut self) {}

    /// Stage the pairing sequence: [`PAIR_REPEATS`] ON packets, each sent
    /// once.
    fn pair(&mut self) {
        for _ in 0..PAIR_REPEATS {
            self.update_status(Status::On);
        }
        self.builder_mut().set_repeat(RepeatPolicy::Once);
    }

    /// Stage the unpairing sequence. Defaults to the pairing sequence.
    fn unpair(&mut self) {
        self.pair();
    }

    /// Finalize everything staged since the last reset into a stream.
    ///
    /// Returns [`Error::NotPrepared`] if no address has been bound. The
    /// staged packets are left in place until `reset()`.
    fn build_packets(&self) -> Result<PacketStream> {
        let builder = self.builder();
        if builder.address().is_none() {
            return Err(Error::NotPrepared);
        }

        let mut packets = Vec::with_capacity(builder.pending_count());
        for staged in builder.pending() {
            let mut packet = staged.to_vec();
            self.finalize_packet(&mut packet)?;
            packets.push(Packet::from(packet));
        }
        Ok(PacketStream::new(packets, builder.repeat()))
    }

    /// Render a human-readable dump of a raw on-air packet.
    ///
    /// Never mutates protocol state.
    fn format(&self, packet: &[u8]) -> Result<String> {
        format_v1_packet(packet)
    }

    /// Decode the semantic content of a raw on-air packet.
    fn parse_packet(&self, _packet: &[u8]) -> Result<ParsedState> {
        Err(Error::Unsupported(format!(
            "packet parsing for {}",
            self.device_type()
        )))
    }
}
