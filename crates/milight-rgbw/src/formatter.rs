//! RgbwFormatter -- the [`PacketFormatter`] implementation for legacy RGBW bulbs.
//!
//! Every semantic command maps to one button press on the original remote.
//! Absolute brightness and color are carried alongside the button in the
//! packet, so a single packet suffices for everything except night mode and
//! unpairing, which press two buttons in a row.

use tracing::{debug, warn};

use milight_core::error::{Error, Result};
use milight_core::formatter::{PacketBuilder, PacketFormatter};
use milight_core::helpers::check_length;
use milight_core::types::{DeviceAddress, DeviceType, ParsedState, Status};

use crate::protocol::*;

/// Packet formatter for the legacy RGBW dialect.
#[derive(Debug, Clone)]
pub struct RgbwFormatter {
    builder: PacketBuilder,
    held: bool,
    last_mode: u8,
}

impl RgbwFormatter {
    pub fn new() -> Self {
        RgbwFormatter {
            builder: PacketBuilder::new(PACKET_LENGTH),
            held: false,
            last_mode: 0,
        }
    }

    /// The most recently selected disco mode.
    pub fn last_mode(&self) -> u8 {
        self.last_mode
    }
}

impl Default for RgbwFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketFormatter for RgbwFormatter {
    fn device_type(&self) -> DeviceType {
        DeviceType::Rgbw
    }

    fn builder(&self) -> &PacketBuilder {
        &self.builder
    }

    fn builder_mut(&mut self) -> &mut PacketBuilder {
        &mut self.builder
    }

    fn initialize_packet(&self, packet: &mut [u8], address: DeviceAddress, sequence: u8) {
        let [id_hi, id_lo] = address.device_id.to_be_bytes();
        packet[0] = RGBW_TAG;
        packet[1] = id_hi;
        packet[2] = id_lo;
        packet[COLOR_INDEX] = 0;
        packet[BRIGHTNESS_GROUP_INDEX] = address.group_id & 0x07;
        packet[COMMAND_INDEX] = 0;
        packet[SEQUENCE_INDEX] = sequence;
    }

    /// Press `command` on the current packet. The argument is unused: the
    /// RGBW remote carries values in dedicated fields.
    fn command(&mut self, command: u8, _arg: u8) {
        self.begin_command();
        let button = if self.held { command | HELD_FLAG } else { command };
        self.builder.current_mut()[COMMAND_INDEX] = button;
    }

    fn update_status_for_group(&mut self, status: Status, group_id: u8) {
        match status_button(status, group_id) {
            Some(button) => self.command(button, 0),
            None => warn!(group_id, %status, "no RGBW status button for group"),
        }
    }

    fn set_held(&mut self, held: bool) {
        self.held = held;
    }

    fn update_hue(&mut self, hue: u16) {
        self.update_color_raw(encode_hue(hue));
    }

    fn update_color_raw(&mut self, value: u8) {
        self.command(COLOR, 0);
        self.builder.current_mut()[COLOR_INDEX] = value;
    }

    fn update_color_white(&mut self) {
        let group_id = self.builder.group_id();
        match white_button(group_id) {
            Some(button) => self.command(button, 0),
            None => warn!(group_id, "no RGBW white button for group"),
        }
    }

    fn update_brightness(&mut self, value: u8) {
        self.command(BRIGHTNESS, 0);
        self.builder.current_mut()[BRIGHTNESS_GROUP_INDEX] |= encode_brightness(value) << 3;
    }

    fn update_mode(&mut self, mode: u8) {
        self.last_mode = mode % NUM_MODES;
        self.command(DISCO_MODE, 0);
        self.builder.current_mut()[0] = RGBW_TAG | self.last_mode;
    }

    fn next_mode(&mut self) {
        self.update_mode((self.last_mode + 1) % NUM_MODES);
    }

    fn previous_mode(&mut self) {
        self.update_mode((self.last_mode + NUM_MODES - 1) % NUM_MODES);
    }

    fn mode_speed_up(&mut self) {
        self.command(SPEED_UP, 0);
    }

    fn mode_speed_down(&mut self) {
        self.command(SPEED_DOWN, 0);
    }

    fn enable_night_mode(&mut self) {
        let group_id = self.builder.group_id();
        let off = status_button(Status::Off, group_id);
        let night = night_button(group_id);
        let (Some(off), Some(night)) = (off, night) else {
            warn!(group_id, "no RGBW night buttons for group");
            return;
        };
        self.command(off, 0);
        self.command(night, 0);
    }

    /// Unlinking an RGBW bulb is ON followed by "white" for the group.
    fn unpair(&mut self) {
        self.update_status(Status::On);
        self.update_color_white();
    }

    fn parse_packet(&self, packet: &[u8]) -> Result<ParsedState> {
        check_length(packet, PACKET_LENGTH)?;
        if packet[0] & 0xF8 != RGBW_TAG {
            return Err(Error::InvalidPacket(format!(
                "not an RGBW packet: tag {:#04X}",
                packet[0]
            )));
        }

        let device_id = u16::from_be_bytes([packet[1], packet[2]]);
        let group_id = packet[BRIGHTNESS_GROUP_INDEX] & 0x07;
        let command = packet[COMMAND_INDEX] & !HELD_FLAG;
        let mut state = ParsedState::new(DeviceType::Rgbw, device_id, group_id, command);

        match command {
            ALL_ON..=GROUP_4_OFF => {
                state.status = Some(if command % 2 == 1 { Status::On } else { Status::Off });
            }
            BRIGHTNESS => {
                state.brightness = Some(decode_brightness(packet[BRIGHTNESS_GROUP_INDEX] >> 3));
            }
            COLOR => state.hue = Some(decode_hue(packet[COLOR_INDEX])),
            DISCO_MODE => state.mode = Some(packet[0] & 0x07),
            _ => {}
        }

        debug!(
            device_id = format_args!("{device_id:#06X}"),
            group_id,
            command = format_args!("{command:#04X}"),
            "parsed RGBW packet"
        );
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use milight_core::packet::RepeatPolicy;
    use milight_core::PAIR_REPEATS;

    fn prepared(device_id: u16, group_id: u8) -> RgbwFormatter {
        let mut f = RgbwFormatter::new();
        f.prepare(device_id, group_id);
        f
    }

    fn single_packet(f: &RgbwFormatter) -> Vec<u8> {
        let stream = f.build_packets().unwrap();
        assert_eq!(stream.len(), 1);
        stream.packets()[0].to_vec()
    }

    // ---------------------------------------------------------------
    // Status
    // ---------------------------------------------------------------

    #[test]
    fn on_for_group_two() {
        let mut f = prepared(0xABCD, 2);
        f.update_status(Status::On);
        assert_eq!(single_packet(&f), vec![0xB8, 0xAB, 0xCD, 0x00, 0x02, 0x05, 0x00]);
    }

    #[test]
    fn off_for_group_one() {
        let mut f = prepared(0x1234, 1);
        f.update_status(Status::Off);
        assert_eq!(single_packet(&f)[COMMAND_INDEX], 0x04);
    }

    #[test]
    fn unknown_group_stages_nothing() {
        let mut f = prepared(0x1234, 7);
        f.update_status(Status::On);
        assert!(f.build_packets().unwrap().is_empty());

        f.update_color_white();
        f.enable_night_mode();
        assert!(f.build_packets().unwrap().is_empty());
    }

    #[test]
    fn status_for_all_groups() {
        let mut f = prepared(0x1234, 3);
        f.update_status_for_group(Status::On, 0);
        assert_eq!(single_packet(&f)[COMMAND_INDEX], ALL_ON);
    }

    #[test]
    fn held_sets_high_bit() {
        let mut f = prepared(0x1234, 2);
        f.set_held(true);
        f.update_status(Status::On);
        assert_eq!(single_packet(&f)[COMMAND_INDEX], 0x85);

        f.reset();
        f.set_held(false);
        f.update_status(Status::On);
        assert_eq!(single_packet(&f)[COMMAND_INDEX], 0x05);
    }

    // ---------------------------------------------------------------
    // Brightness and color
    // ---------------------------------------------------------------

    #[test]
    fn brightness_extremes_share_byte_with_group() {
        let mut f = prepared(0x1234, 2);
        f.update_brightness(0);
        let packet = single_packet(&f);
        assert_eq!(packet[BRIGHTNESS_GROUP_INDEX], (16 << 3) | 2);
        assert_eq!(packet[COMMAND_INDEX], BRIGHTNESS);

        f.reset();
        f.update_brightness(100);
        assert_eq!(single_packet(&f)[BRIGHTNESS_GROUP_INDEX], (23 << 3) | 2);
    }

    #[test]
    fn hue_zero_is_shifted_onto_wheel() {
        let mut f = prepared(0x1234, 1);
        f.update_hue(0);
        let packet = single_packet(&f);
        assert_eq!(packet[COLOR_INDEX], 28);
        assert_eq!(packet[COMMAND_INDEX], COLOR);
    }

    #[test]
    fn raw_color_is_written_verbatim() {
        let mut f = prepared(0x1234, 1);
        f.update_color_raw(0xAA);
        assert_eq!(single_packet(&f)[COLOR_INDEX], 0xAA);
    }

    #[test]
    fn white_uses_group_button() {
        let mut f = prepared(0x1234, 2);
        f.update_color_white();
        assert_eq!(single_packet(&f)[COMMAND_INDEX], 0x15);
    }

    #[test]
    fn temperature_and_saturation_are_ignored() {
        let mut f = prepared(0x1234, 1);
        f.update_temperature(50);
        f.update_saturation(50);
        f.increase_temperature();
        assert!(f.build_packets().unwrap().is_empty());
    }

    // ---------------------------------------------------------------
    // Modes
    // ---------------------------------------------------------------

    #[test]
    fn mode_is_carried_in_tag_byte() {
        let mut f = prepared(0x1234, 1);
        f.update_mode(3);
        let packet = single_packet(&f);
        assert_eq!(packet[0], 0xBB);
        assert_eq!(packet[COMMAND_INDEX], DISCO_MODE);
        assert_eq!(f.last_mode(), 3);
    }

    #[test]
    fn next_and_previous_mode_wrap() {
        let mut f = prepared(0x1234, 1);
        f.previous_mode();
        assert_eq!(f.last_mode(), NUM_MODES - 1);
        f.reset();
        f.next_mode();
        assert_eq!(f.last_mode(), 0);
        f.reset();
        f.next_mode();
        assert_eq!(f.last_mode(), 1);
        assert_eq!(single_packet(&f)[0], 0xB9);
    }

    #[test]
    fn speed_buttons() {
        let mut f = prepared(0x1234, 1);
        f.mode_speed_up();
        assert_eq!(single_packet(&f)[COMMAND_INDEX], SPEED_UP);
        f.reset();
        f.mode_speed_down();
        assert_eq!(single_packet(&f)[COMMAND_INDEX], SPEED_DOWN);
    }

    // ---------------------------------------------------------------
    // Multi-packet sequences
    // ---------------------------------------------------------------

    #[test]
    fn night_mode_is_off_then_min_level() {
        let mut f = prepared(0x1234, 2);
        f.enable_night_mode();
        let stream = f.build_packets().unwrap();
        assert_eq!(stream.len(), 2);
        let first = &stream.packets()[0];
        let second = &stream.packets()[1];
        assert_eq!(first[COMMAND_INDEX], 0x06);
        assert_eq!(second[COMMAND_INDEX], 0x16);
        assert_eq!(second[SEQUENCE_INDEX], first[SEQUENCE_INDEX] + 1);
    }

    #[test]
    fn pair_is_five_on_packets() {
        let mut f = prepared(0x1234, 1);
        f.pair();
        let stream = f.build_packets().unwrap();
        assert_eq!(stream.len(), PAIR_REPEATS);
        assert_eq!(stream.repeat(), RepeatPolicy::Once);
        assert!(stream.packets().iter().all(|p| p[COMMAND_INDEX] == 0x03));
    }

    #[test]
    fn unpair_is_on_then_white() {
        let mut f = prepared(0x1234, 1);
        f.unpair();
        let stream = f.build_packets().unwrap();
        assert_eq!(stream.len(), 2);
        assert_eq!(stream.repeat(), RepeatPolicy::Resend);
        assert_eq!(stream.packets()[0][COMMAND_INDEX], 0x03);
        assert_eq!(stream.packets()[1][COMMAND_INDEX], 0x13);
    }

    // ---------------------------------------------------------------
    // Parsing and formatting
    // ---------------------------------------------------------------

    #[test]
    fn parse_status_packet() {
        let f = RgbwFormatter::new();
        let state = f
            .parse_packet(&[0xB8, 0xAB, 0xCD, 0x00, 0x02, 0x86, 0x11])
            .unwrap();
        assert_eq!(state.device_type, DeviceType::Rgbw);
        assert_eq!(state.device_id, 0xABCD);
        assert_eq!(state.group_id, 2);
        assert_eq!(state.command, 0x06);
        assert_eq!(state.status, Some(Status::Off));
    }

    #[test]
    fn parse_round_trips_brightness_and_mode() {
        let mut f = prepared(0x1234, 3);
        f.update_brightness(100);
        let state = f.parse_packet(&single_packet(&f)).unwrap();
        assert_eq!(state.brightness, Some(100));
        assert_eq!(state.group_id, 3);

        f.reset();
        f.update_mode(5);
        let state = f.parse_packet(&single_packet(&f)).unwrap();
        assert_eq!(state.mode, Some(5));
    }

    #[test]
    fn parse_rejects_foreign_packets() {
        let f = RgbwFormatter::new();
        assert!(matches!(
            f.parse_packet(&[0x5A, 0x12, 0x34, 0x01, 0x08, 0x00, 0x00]),
            Err(Error::InvalidPacket(_))
        ));
        assert!(f.parse_packet(&[0xB8, 0x12]).is_err());
    }

    #[test]
    fn format_dumps_fields() {
        let f = RgbwFormatter::new();
        let text = f.format(&[0xB8, 0xAB, 0xCD, 0x00, 0x02, 0x05, 0x00]).unwrap();
        assert!(text.starts_with("Request type  : B8\nDevice ID     : ABCD\n"));
    }
}
