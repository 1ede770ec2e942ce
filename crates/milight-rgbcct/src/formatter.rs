//! RgbCctFormatter -- the [`PacketFormatter`] implementation for RGB+CCT bulbs.
//!
//! Commands are staged into raw 9-byte packets as a `(command, argument)`
//! pair. The cipher runs only when packets are built, so staged state stays
//! readable and a failed encode never corrupts the builder.

use std::fmt::Write;

use tracing::{debug, warn};

use milight_core::error::{Error, Result};
use milight_core::formatter::{PacketBuilder, PacketFormatter, PAIR_REPEATS};
use milight_core::helpers::check_length;
use milight_core::packet::{hex_string, RepeatPolicy};
use milight_core::types::{DeviceAddress, DeviceType, ParsedState, Status};

use crate::cipher::{self, ARGUMENT_INDEX, CHECKSUM_INDEX, COMMAND_INDEX, PACKET_LENGTH};
use crate::protocol::*;

/// Packet formatter for the encrypted V2 RGB+CCT dialect.
#[derive(Debug, Clone)]
pub struct RgbCctFormatter {
    builder: PacketBuilder,
    last_mode: u8,
}

impl RgbCctFormatter {
    pub fn new() -> Self {
        RgbCctFormatter {
            builder: PacketBuilder::new(PACKET_LENGTH),
            last_mode: 0,
        }
    }

    /// The most recently selected mode.
    pub fn last_mode(&self) -> u8 {
        self.last_mode
    }
}

impl Default for RgbCctFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketFormatter for RgbCctFormatter {
    fn device_type(&self) -> DeviceType {
        DeviceType::RgbCct
    }

    fn builder(&self) -> &PacketBuilder {
        &self.builder
    }

    fn builder_mut(&mut self) -> &mut PacketBuilder {
        &mut self.builder
    }

    fn initialize_packet(&self, packet: &mut [u8], address: DeviceAddress, sequence: u8) {
        let [id_hi, id_lo] = address.device_id.to_be_bytes();
        packet[cipher::KEY_INDEX] = KEY_TAG;
        packet[PROTOCOL_INDEX] = PROTOCOL_ID;
        packet[2] = id_hi;
        packet[3] = id_lo;
        packet[COMMAND_INDEX] = 0;
        packet[ARGUMENT_INDEX] = 0;
        packet[SEQUENCE_INDEX] = sequence;
        packet[GROUP_INDEX] = address.group_id;
        packet[CHECKSUM_INDEX] = 0;
    }

    fn finalize_packet(&self, packet: &mut [u8]) -> Result<()> {
        cipher::encode_packet(packet)
    }

    fn command(&mut self, command: u8, arg: u8) {
        self.begin_command();
        let packet = self.builder.current_mut();
        packet[COMMAND_INDEX] = command;
        packet[ARGUMENT_INDEX] = arg;
    }

    fn update_status_for_group(&mut self, status: Status, group_id: u8) {
        match status_arg(status, group_id) {
            Some(arg) => self.command(CMD_ON, arg),
            None => warn!(group_id, %status, "no RGB+CCT status argument for group"),
        }
    }

    fn update_hue(&mut self, hue: u16) {
        self.update_color_raw(hue_to_raw(hue));
    }

    fn update_color_raw(&mut self, value: u8) {
        self.command(CMD_COLOR, color_arg(value));
    }

    fn update_color_white(&mut self) {
        self.update_temperature(0);
    }

    fn update_saturation(&mut self, value: u8) {
        self.command(CMD_SATURATION, saturation_arg(value));
    }

    fn update_brightness(&mut self, value: u8) {
        self.command(CMD_BRIGHTNESS, brightness_arg(value));
    }

    fn update_temperature(&mut self, value: u8) {
        self.command(CMD_KELVIN, kelvin_arg(value));
    }

    fn update_mode(&mut self, mode: u8) {
        self.last_mode = mode % NUM_MODES;
        self.command(CMD_MODE, self.last_mode);
    }

    fn next_mode(&mut self) {
        self.update_mode((self.last_mode + 1) % NUM_MODES);
    }

    fn previous_mode(&mut self) {
        self.update_mode((self.last_mode + NUM_MODES - 1) % NUM_MODES);
    }

    fn mode_speed_up(&mut self) {
        self.command(CMD_ON, SPEED_UP_ARG);
    }

    fn mode_speed_down(&mut self) {
        self.command(CMD_ON, SPEED_DOWN_ARG);
    }

    fn enable_night_mode(&mut self) {
        self.update_brightness(0);
    }

    /// Unlinking takes ON for all groups rather than the bound group.
    fn unpair(&mut self) {
        for _ in 0..PAIR_REPEATS {
            self.update_status_for_group(Status::On, DeviceAddress::ALL_GROUPS);
        }
        self.builder.set_repeat(RepeatPolicy::Once);
    }

    fn format(&self, packet: &[u8]) -> Result<String> {
        check_length(packet, PACKET_LENGTH)?;
        let mut decoded = [0u8; PACKET_LENGTH];
        decoded.copy_from_slice(packet);
        cipher::decode_packet(&mut decoded)?;

        let mut out = String::with_capacity(256);
        // Writing to a String cannot fail.
        let _ = write!(out, "Raw packet: {}", hex_string(packet));
        let _ = write!(out, "\n\nDecoded:\n");
        let _ = writeln!(out, "Key      : {:02X}", decoded[0]);
        let _ = writeln!(out, "b1       : {:02X}", decoded[1]);
        let _ = writeln!(out, "ID       : {:02X}{:02X}", decoded[2], decoded[3]);
        let _ = writeln!(out, "Command  : {:02X}", decoded[4]);
        let _ = writeln!(out, "Argument : {:02X}", decoded[5]);
        let _ = writeln!(out, "Sequence : {:02X}", decoded[6]);
        let _ = writeln!(out, "Group    : {:02X}", decoded[7]);
        let _ = write!(out, "Checksum : {:02X}", decoded[8]);
        Ok(out)
    }

    fn parse_packet(&self, packet: &[u8]) -> Result<ParsedState> {
        check_length(packet, PACKET_LENGTH)?;
        let mut decoded = [0u8; PACKET_LENGTH];
        decoded.copy_from_slice(packet);
        cipher::decode_packet(&mut decoded)?;
        cipher::verify_checksum(&decoded)?;

        if decoded[PROTOCOL_INDEX] != PROTOCOL_ID {
            return Err(Error::InvalidPacket(format!(
                "not an RGB+CCT packet: protocol id {:#04X}",
                decoded[PROTOCOL_INDEX]
            )));
        }

        let device_id = u16::from_be_bytes([decoded[2], decoded[3]]);
        let command = decoded[COMMAND_INDEX];
        let arg = decoded[ARGUMENT_INDEX];
        let mut state =
            ParsedState::new(DeviceType::RgbCct, device_id, decoded[GROUP_INDEX], command);

        match command {
            CMD_ON => {
                if let Some((_, status)) = decode_status_arg(arg) {
                    state.status = Some(status);
                }
            }
            CMD_COLOR => state.hue = Some(raw_to_hue(decode_color_arg(arg))),
            CMD_KELVIN => state.temperature = Some(decode_kelvin_arg(arg)),
            CMD_BRIGHTNESS => match decode_level_arg(arg) {
                Level::Brightness(b) => state.brightness = Some(b),
                Level::Saturation(s) => state.saturation = Some(s),
                Level::Unknown => {}
            },
            CMD_MODE => state.mode = Some(arg),
            _ => {}
        }

        debug!(
            device_id = format_args!("{device_id:#06X}"),
            group_id = state.group_id,
            command = format_args!("{command:#04X}"),
            arg = format_args!("{arg:#04X}"),
            "parsed RGB+CCT packet"
        );
        Ok(state)
    }
}
