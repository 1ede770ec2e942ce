//! CctFormatter -- the [`PacketFormatter`] implementation for CCT bulbs.
//!
//! CCT bulbs only understand relative brightness and temperature buttons.
//! Absolute levels are reached by the client's step emulation, which drives
//! the relative operations exposed here.

use tracing::{debug, warn};

use milight_core::error::{Error, Result};
use milight_core::formatter::{PacketBuilder, PacketFormatter};
use milight_core::helpers::check_length;
use milight_core::types::{DeviceAddress, DeviceType, ParsedState, Status};

use crate::protocol::*;

/// Packet formatter for the CCT dialect.
#[derive(Debug, Clone)]
pub struct CctFormatter {
    builder: PacketBuilder,
}

impl CctFormatter {
    pub fn new() -> Self {
        CctFormatter {
            builder: PacketBuilder::new(PACKET_LENGTH),
        }
    }
}

impl Default for CctFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketFormatter for CctFormatter {
    fn device_type(&self) -> DeviceType {
        DeviceType::Cct
    }

    fn builder(&self) -> &PacketBuilder {
        &self.builder
    }

    fn builder_mut(&mut self) -> &mut PacketBuilder {
        &mut self.builder
    }

    fn initialize_packet(&self, packet: &mut [u8], address: DeviceAddress, sequence: u8) {
        let [id_hi, id_lo] = address.device_id.to_be_bytes();
        packet[0] = CCT_TAG;
        packet[1] = id_hi;
        packet[2] = id_lo;
        packet[GROUP_INDEX] = address.group_id;
        packet[COMMAND_INDEX] = 0;
        packet[SEQUENCE_INDEX] = sequence;
        packet[SEQUENCE_REPEAT_INDEX] = sequence;
    }

    fn command(&mut self, command: u8, _arg: u8) {
        self.begin_command();
        self.builder.current_mut()[COMMAND_INDEX] = command;
    }

    fn update_status_for_group(&mut self, status: Status, group_id: u8) {
        match status_button(status, group_id) {
            Some(button) => self.command(button, 0),
            None => warn!(group_id, %status, "no CCT status button for group"),
        }
    }

    fn increase_brightness(&mut self) {
        self.command(BRIGHTNESS_UP, 0);
    }

    fn decrease_brightness(&mut self) {
        self.command(BRIGHTNESS_DOWN, 0);
    }

    fn increase_temperature(&mut self) {
        self.command(TEMPERATURE_UP, 0);
    }

    fn decrease_temperature(&mut self) {
        self.command(TEMPERATURE_DOWN, 0);
    }

    fn parse_packet(&self, packet: &[u8]) -> Result<ParsedState> {
        check_length(packet, PACKET_LENGTH)?;
        if packet[0] != CCT_TAG {
            return Err(Error::InvalidPacket(format!(
                "not a CCT packet: tag {:#04X}",
                packet[0]
            )));
        }

        let device_id = u16::from_be_bytes([packet[1], packet[2]]);
        let command = packet[COMMAND_INDEX];
        let mut state =
            ParsedState::new(DeviceType::Cct, device_id, packet[GROUP_INDEX], command);

        // The button, not the header, says which group a status press targets.
        if let Some((group_id, status)) = decode_status_button(command) {
            state.group_id = group_id;
            state.status = Some(status);
        }

        debug!(
            device_id = format_args!("{device_id:#06X}"),
            group_id = state.group_id,
            command = format_args!("{command:#04X}"),
            "parsed CCT packet"
        );
        Ok(state)
    }
}
