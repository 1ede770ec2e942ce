//! MiLightClient -- sequences formatter commands onto the radios.
//!
//! The client owns one [`Radio`] per configured dialect: the static
//! [`RadioConfig`], a formatter, and the transport that carries its packets.
//! Exactly one radio is active at a time. Every semantic command is staged
//! on the active formatter and flushed immediately:
//!
//! 1. build the packet stream,
//! 2. write each packet `resend_count` times (pairing streams are already
//!    expanded and are written once per packet),
//! 3. pause `packet_delay` between distinct packets,
//! 4. reset the formatter for the next command, even if a write failed.
//!
//! Absolute brightness and temperature on dialects with only relative
//! buttons are emulated by driving the bulb to its floor and stepping back
//! up (see [`update_brightness`](MiLightClient::update_brightness)).

use std::time::Duration;

use tracing::{debug, trace, warn};

use milight_core::error::{Error, Result};
use milight_core::formatter::PacketFormatter;
use milight_core::transport::Transport;
use milight_core::types::{DeviceType, ParsedState, Status};

use crate::models::RadioConfig;

/// One dialect's formatter paired with the transport that carries it.
pub(crate) struct Radio {
    pub(crate) config: RadioConfig,
    pub(crate) formatter: Box<dyn PacketFormatter>,
    pub(crate) transport: Box<dyn Transport>,
}

/// Number of increase steps that walk a floored control up to `target`.
///
/// Computes `round(target / (100 / intervals))`, rounding halves away from
/// zero.
pub fn step_count(target: u8, intervals: u8) -> u32 {
    if intervals == 0 {
        return 0;
    }
    let step = 100.0 / f32::from(intervals);
    (f32::from(target.min(100)) / step).round() as u32
}

/// Orchestrates formatters and radios for all configured dialects.
///
/// Constructed via [`ClientBuilder`](crate::builder::ClientBuilder).
pub struct MiLightClient {
    radios: Vec<Radio>,
    current: Option<usize>,
    resend_count: u32,
    packet_delay: Duration,
    step_intervals: u8,
    step_resend_count: u32,
    held: bool,
}

impl MiLightClient {
    pub(crate) fn new(
        radios: Vec<Radio>,
        resend_count: u32,
        packet_delay: Duration,
        step_intervals: u8,
        step_resend_count: u32,
    ) -> Self {
        MiLightClient {
            radios,
            current: None,
            resend_count,
            packet_delay,
            step_intervals,
            step_resend_count,
            held: false,
        }
    }

    // -----------------------------------------------------------------
    // Radio selection
    // -----------------------------------------------------------------

    /// Configs of every radio this client can drive, in build order.
    pub fn radio_configs(&self) -> impl Iterator<Item = &RadioConfig> + '_ {
        self.radios.iter().map(|r| &r.config)
    }

    /// Config of the active radio, if any.
    pub fn current_radio(&self) -> Option<&RadioConfig> {
        self.current.map(|i| &self.radios[i].config)
    }

    /// Make the radio for `device_type` the active one.
    ///
    /// Changing dialect (or selecting the first radio) configures the newly
    /// active transport. Selecting the already active dialect does nothing
    /// else. Fails with [`Error::UnknownDeviceType`] if no radio speaks
    /// `device_type`; the active radio is left unchanged.
    pub async fn switch_radio(&mut self, device_type: DeviceType) -> Result<&RadioConfig> {
        let Some(index) = self
            .radios
            .iter()
            .position(|r| r.config.device_type == device_type)
        else {
            warn!(%device_type, "no radio configured for device type");
            return Err(Error::UnknownDeviceType(device_type.to_string()));
        };

        if self.current != Some(index) {
            debug!(%device_type, "switching radio");
            self.radios[index].transport.configure().await?;
            self.current = Some(index);
        }

        let held = self.held;
        let radio = &mut self.radios[index];
        radio.formatter.set_held(held);
        Ok(&radio.config)
    }

    /// Switch to `device_type` and bind addressing on its formatter.
    ///
    /// Without a `device_id` the radio is only selected (for passive
    /// listening); the formatter keeps whatever addressing it had. A missing
    /// `group_id` addresses all groups.
    pub async fn prepare(
        &mut self,
        device_type: DeviceType,
        device_id: Option<u16>,
        group_id: Option<u8>,
    ) -> Result<()> {
        self.switch_radio(device_type).await?;
        if let Some(device_id) = device_id {
            let group_id = group_id.unwrap_or(0);
            debug!(
                %device_type,
                device_id = format_args!("{device_id:#06X}"),
                group_id,
                "binding address"
            );
            self.active_mut()?.formatter.prepare(device_id, group_id);
        }
        Ok(())
    }

    fn active(&self) -> Result<&Radio> {
        self.current
            .map(|i| &self.radios[i])
            .ok_or(Error::TransportUnavailable)
    }

    fn active_mut(&mut self) -> Result<&mut Radio> {
        match self.current {
            Some(i) => Ok(&mut self.radios[i]),
            None => Err(Error::TransportUnavailable),
        }
    }

    // -----------------------------------------------------------------
    // Settings
    // -----------------------------------------------------------------

    pub fn resend_count(&self) -> u32 {
        self.resend_count
    }

    /// Set how many times each packet is written.
    pub fn set_resend_count(&mut self, resend_count: u32) {
        self.resend_count = resend_count;
    }

    pub fn held(&self) -> bool {
        self.held
    }

    /// Mark subsequent commands as "button held". Forwarded to the active
    /// formatter now and to every formatter selected later.
    pub fn set_held(&mut self, held: bool) {
        self.held = held;
        if let Ok(radio) = self.active_mut() {
            radio.formatter.set_held(held);
        }
    }

    // -----------------------------------------------------------------
    // Flushing
    // -----------------------------------------------------------------

    /// Stage one command on the active formatter and flush it.
    async fn run<F>(&mut self, op: F) -> Result<()>
    where
        F: FnOnce(&mut dyn PacketFormatter) + Send,
    {
        op(&mut *self.active_mut()?.formatter);
        self.flush().await
    }

    /// Write everything staged on the active formatter, then reset it.
    async fn flush(&mut self) -> Result<()> {
        let resend_count = self.resend_count;
        let packet_delay = self.packet_delay;
        let radio = self.active_mut()?;

        let result = send_stream(radio, resend_count, packet_delay).await;
        radio.formatter.reset();
        result
    }

    // -----------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------

    /// Turn the bound group on or off.
    pub async fn update_status(&mut self, status: Status) -> Result<()> {
        self.run(|f| f.update_status(status)).await
    }

    /// Turn a specific group (0 = all) on or off.
    pub async fn update_status_for_group(&mut self, status: Status, group_id: u8) -> Result<()> {
        self.run(|f| f.update_status_for_group(status, group_id))
            .await
    }

    /// Link the bound group to the emulated remote.
    pub async fn pair(&mut self) -> Result<()> {
        self.run(|f| f.pair()).await
    }

    pub async fn unpair(&mut self) -> Result<()> {
        self.run(|f| f.unpair()).await
    }

    pub async fn update_hue(&mut self, hue: u16) -> Result<()> {
        self.run(|f| f.update_hue(hue)).await
    }

    pub async fn update_color_raw(&mut self, value: u8) -> Result<()> {
        self.run(|f| f.update_color_raw(value)).await
    }

    pub async fn update_color_white(&mut self) -> Result<()> {
        self.run(|f| f.update_color_white()).await
    }

    pub async fn update_saturation(&mut self, value: u8) -> Result<()> {
        self.run(|f| f.update_saturation(value)).await
    }

    /// Set absolute brightness, 0-100.
    ///
    /// On radios with only relative buttons this sends `step_intervals`
    /// decreases to reach the floor and then
    /// [`step_count`]`(value, step_intervals)` increases, all at the step
    /// resend count. The bulb is assumed to clamp at its floor.
    pub async fn update_brightness(&mut self, value: u8) -> Result<()> {
        if self.active()?.config.emulates_brightness() {
            return self
                .emulate_steps(
                    value,
                    |f| f.decrease_brightness(),
                    |f| f.increase_brightness(),
                )
                .await;
        }
        self.run(|f| f.update_brightness(value)).await
    }

    pub async fn increase_brightness(&mut self) -> Result<()> {
        self.run(|f| f.increase_brightness()).await
    }

    pub async fn decrease_brightness(&mut self) -> Result<()> {
        self.run(|f| f.decrease_brightness()).await
    }

    /// Set absolute color temperature, 0 (warm) to 100 (cool).
    ///
    /// Emulated with steps like [`update_brightness`](Self::update_brightness)
    /// on radios with only relative temperature buttons.
    pub async fn update_temperature(&mut self, value: u8) -> Result<()> {
        if self.active()?.config.emulates_temperature() {
            return self
                .emulate_steps(
                    value,
                    |f| f.decrease_temperature(),
                    |f| f.increase_temperature(),
                )
                .await;
        }
        self.run(|f| f.update_temperature(value)).await
    }

    pub async fn increase_temperature(&mut self) -> Result<()> {
        self.run(|f| f.increase_temperature()).await
    }

    pub async fn decrease_temperature(&mut self) -> Result<()> {
        self.run(|f| f.decrease_temperature()).await
    }

    pub async fn update_mode(&mut self, mode: u8) -> Result<()> {
        self.run(|f| f.update_mode(mode)).await
    }

    pub async fn next_mode(&mut self) -> Result<()> {
        self.run(|f| f.next_mode()).await
    }

    pub async fn previous_mode(&mut self) -> Result<()> {
        self.run(|f| f.previous_mode()).await
    }

    pub async fn mode_speed_up(&mut self) -> Result<()> {
        self.run(|f| f.mode_speed_up()).await
    }

    pub async fn mode_speed_down(&mut self) -> Result<()> {
        self.run(|f| f.mode_speed_down()).await
    }

    pub async fn enable_night_mode(&mut self) -> Result<()> {
        self.run(|f| f.enable_night_mode()).await
    }

    /// Raw passthrough of a dialect command code and argument.
    pub async fn command(&mut self, command: u8, arg: u8) -> Result<()> {
        self.run(|f| f.command(command, arg)).await
    }

    async fn emulate_steps(
        &mut self,
        target: u8,
        decrease: fn(&mut dyn PacketFormatter),
        increase: fn(&mut dyn PacketFormatter),
    ) -> Result<()> {
        let decreases = u32::from(self.step_intervals);
        let increases = step_count(target, self.step_intervals);
        debug!(level = target, decreases, increases, "emulating absolute level with steps");

        let saved = self.resend_count;
        self.resend_count = self.step_resend_count;
        let result = self.walk_steps(decreases, increases, decrease, increase).await;
        self.resend_count = saved;
        result
    }

    async fn walk_steps(
        &mut self,
        decreases: u32,
        increases: u32,
        decrease: fn(&mut dyn PacketFormatter),
        increase: fn(&mut dyn PacketFormatter),
    ) -> Result<()> {
        for _ in 0..decreases {
            self.run(decrease).await?;
        }
        for _ in 0..increases {
            self.run(increase).await?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------
    // Raw I/O and diagnostics
    // -----------------------------------------------------------------

    /// Write an arbitrary raw packet `resend_count` times on the active radio.
    pub async fn write(&mut self, packet: &[u8]) -> Result<()> {
        let resend_count = self.resend_count;
        let radio = self.active_mut()?;
        trace!(packet = ?packet, resend_count, "writing raw packet");
        for _ in 0..resend_count {
            radio.transport.write(packet).await?;
            tokio::task::yield_now().await;
        }
        Ok(())
    }

    /// Whether the active radio has an inbound packet waiting.
    pub async fn available(&mut self) -> bool {
        match self.active_mut() {
            Ok(radio) => radio.transport.available().await,
            Err(_) => false,
        }
    }

    /// Read one inbound packet from the active radio into `buf`.
    ///
    /// Returns the number of bytes read, `0` if nothing was waiting.
    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.active_mut()?.transport.read(buf).await
    }

    /// Render a raw packet with the active formatter's diagnostic dump.
    pub fn format_packet(&self, packet: &[u8]) -> Result<String> {
        self.active()?.formatter.format(packet)
    }

    /// Decode a raw packet with the active formatter.
    pub fn parse_packet(&self, packet: &[u8]) -> Result<ParsedState> {
        self.active()?.formatter.parse_packet(packet)
    }
}

/// Build and transmit the active formatter's staged packets.
async fn send_stream(radio: &mut Radio, resend_count: u32, packet_delay: Duration) -> Result<()> {
    let stream = radio.formatter.build_packets()?;
    if stream.is_empty() {
        trace!(device_type = %radio.config.device_type, "nothing staged");
        return Ok(());
    }

    let writes = stream.writes_per_packet(resend_count);
    debug!(
        device_type = %radio.config.device_type,
        packets = stream.len(),
        writes_per_packet = writes,
        "flushing packets"
    );

    for (i, packet) in stream.enumerate() {
        if i > 0 {
            tokio::time::sleep(packet_delay).await;
        }
        trace!(%packet, "writing packet");
        for _ in 0..writes {
            radio.transport.write(&packet).await?;
            tokio::task::yield_now().await;
        }
    }
    Ok(())
}

#[cfg(all(test, feature = "rgbw", feature = "cct", feature = "rgbcct"))]
mod tests {
    use super::*;
    use crate::builder::ClientBuilder;
    use crate::models::{cct, rgb_cct, rgbw};
    use milight_cct::protocol as cct_protocol;
    use milight_rgbcct::cipher;
    use milight_test_harness::{MockRadio, MockRadioHandle};

    /// Client with all three radios, no pacing and a resend count of 3.
    fn make_test_client() -> (MiLightClient, MockRadioHandle, MockRadioHandle, MockRadioHandle) {
        let (rgbw_radio, rgbw_handle) = MockRadio::with_handle();
        let (cct_radio, cct_handle) = MockRadio::with_handle();
        let (v2_radio, v2_handle) = MockRadio::with_handle();
        let client = ClientBuilder::new()
            .radio(rgbw(), Box::new(rgbw_radio))
            .radio(cct(), Box::new(cct_radio))
            .radio(rgb_cct(), Box::new(v2_radio))
            .resend_count(3)
            .packet_delay(Duration::ZERO)
            .build()
            .unwrap();
        (client, rgbw_handle, cct_handle, v2_handle)
    }

    fn decode_v2(packet: &[u8]) -> Vec<u8> {
        let mut decoded = packet.to_vec();
        cipher::decode_packet(&mut decoded).unwrap();
        decoded
    }

    // -----------------------------------------------------------------
    // step_count
    // -----------------------------------------------------------------

    #[test]
    fn step_count_rounds() {
        assert_eq!(step_count(0, 10), 0);
        assert_eq!(step_count(42, 10), 4);
        assert_eq!(step_count(45, 10), 5);
        assert_eq!(step_count(100, 10), 10);
        assert_eq!(step_count(50, 4), 2);
    }

    #[test]
    fn step_count_clamps_target() {
        assert_eq!(step_count(200, 10), 10);
        assert_eq!(step_count(50, 0), 0);
    }

    // -----------------------------------------------------------------
    // Radio selection
    // -----------------------------------------------------------------

    #[tokio::test]
    async fn no_radio_selected_initially() {
        let (mut client, ..) = make_test_client();
        assert!(client.current_radio().is_none());
        assert!(matches!(
            client.update_status(Status::On).await,
            Err(Error::TransportUnavailable)
        ));
        assert!(!client.available().await);
    }

    #[tokio::test]
    async fn switch_configures_on_change_only() {
        let (mut client, rgbw_handle, cct_handle, _) = make_test_client();

        client.switch_radio(DeviceType::Rgbw).await.unwrap();
        client.switch_radio(DeviceType::Rgbw).await.unwrap();
        assert_eq!(rgbw_handle.configure_count(), 1);

        client.switch_radio(DeviceType::Cct).await.unwrap();
        assert_eq!(cct_handle.configure_count(), 1);

        client.switch_radio(DeviceType::Rgbw).await.unwrap();
        assert_eq!(rgbw_handle.configure_count(), 2);
        assert_eq!(client.current_radio().unwrap().device_type, DeviceType::Rgbw);
    }

    #[tokio::test]
    async fn switch_to_unconfigured_type_fails() {
        let (radio, handle) = MockRadio::with_handle();
        let mut client = ClientBuilder::new()
            .radio(rgbw(), Box::new(radio))
            .build()
            .unwrap();
        client.switch_radio(DeviceType::Rgbw).await.unwrap();

        let err = client.switch_radio(DeviceType::RgbCct).await.unwrap_err();
        assert!(matches!(err, Error::UnknownDeviceType(ref s) if s == "rgb_cct"));
        assert_eq!(client.current_radio().unwrap().device_type, DeviceType::Rgbw);

        let err = client.prepare(DeviceType::Cct, Some(1), Some(1)).await;
        assert!(err.is_err());
        assert_eq!(handle.sent_count(), 0);
    }

    #[tokio::test]
    async fn failed_configure_keeps_previous_radio() {
        let (mut client, _, cct_handle, _) = make_test_client();
        client.switch_radio(DeviceType::Rgbw).await.unwrap();
        cct_handle.set_connected(false);
        assert!(client.switch_radio(DeviceType::Cct).await.is_err());
        assert_eq!(client.current_radio().unwrap().device_type, DeviceType::Rgbw);
    }

    #[tokio::test]
    async fn prepare_without_address_only_selects() {
        let (mut client, rgbw_handle, ..) = make_test_client();
        client.prepare(DeviceType::Rgbw, None, None).await.unwrap();
        assert_eq!(rgbw_handle.configure_count(), 1);
        assert!(matches!(
            client.update_status(Status::On).await,
            Err(Error::NotPrepared)
        ));
        assert_eq!(rgbw_handle.sent_count(), 0);
    }

    // -----------------------------------------------------------------
    // Flushing
    // -----------------------------------------------------------------

    #[tokio::test]
    async fn command_is_written_resend_count_times() {
        let (mut client, rgbw_handle, ..) = make_test_client();
        client
            .prepare(DeviceType::Rgbw, Some(0xABCD), Some(2))
            .await
            .unwrap();
        client.update_status(Status::On).await.unwrap();

        let expected = vec![0xB8, 0xAB, 0xCD, 0x00, 0x02, 0x05, 0x00];
        assert_eq!(rgbw_handle.sent_packets(), vec![expected; 3]);
    }

    #[tokio::test]
    async fn each_command_advances_sequence() {
        let (mut client, rgbw_handle, ..) = make_test_client();
        client.set_resend_count(1);
        client
            .prepare(DeviceType::Rgbw, Some(0x1234), Some(1))
            .await
            .unwrap();
        client.update_status(Status::On).await.unwrap();
        client.update_brightness(100).await.unwrap();
        client.update_hue(0).await.unwrap();

        let sequences: Vec<u8> = rgbw_handle.sent_packets().iter().map(|p| p[6]).collect();
        assert_eq!(sequences, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn pair_writes_five_distinct_packets_once() {
        let (mut client, _, _, v2_handle) = make_test_client();
        client
            .prepare(DeviceType::RgbCct, Some(0x1234), Some(1))
            .await
            .unwrap();
        client.pair().await.unwrap();

        let sent = v2_handle.sent_packets();
        assert_eq!(sent.len(), 5);
        for (i, packet) in sent.iter().enumerate() {
            let decoded = decode_v2(packet);
            assert_eq!(decoded[4], 0x01);
            assert_eq!(decoded[5], 0xC1);
            assert_eq!(usize::from(decoded[6]), i);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn packet_delay_only_between_distinct_packets() {
        let (radio, handle) = MockRadio::with_handle();
        let mut client = ClientBuilder::new()
            .radio(rgb_cct(), Box::new(radio))
            .resend_count(20)
            .packet_delay(Duration::from_millis(50))
            .build()
            .unwrap();
        client
            .prepare(DeviceType::RgbCct, Some(0x1234), Some(1))
            .await
            .unwrap();

        // one packet resent 20 times back to back
        let start = tokio::time::Instant::now();
        client.update_status(Status::On).await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(handle.sent_count(), 20);

        // five distinct packets, four gaps
        handle.clear_sent();
        let start = tokio::time::Instant::now();
        client.pair().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_millis(200));
        assert_eq!(handle.sent_count(), 5);
    }

    #[tokio::test]
    async fn unpair_on_rgbw_is_resent() {
        let (mut client, rgbw_handle, ..) = make_test_client();
        client
            .prepare(DeviceType::Rgbw, Some(0x1234), Some(1))
            .await
            .unwrap();
        client.unpair().await.unwrap();

        let buttons: Vec<u8> = rgbw_handle.sent_packets().iter().map(|p| p[5]).collect();
        assert_eq!(buttons, vec![0x03, 0x03, 0x03, 0x13, 0x13, 0x13]);
    }

    #[tokio::test]
    async fn unsupported_command_writes_nothing() {
        let (mut client, _, cct_handle, _) = make_test_client();
        client
            .prepare(DeviceType::Cct, Some(0x1234), Some(1))
            .await
            .unwrap();
        client.update_hue(120).await.unwrap();
        client.update_mode(2).await.unwrap();
        assert_eq!(cct_handle.sent_count(), 0);
    }

    #[tokio::test]
    async fn failed_write_still_resets() {
        let (mut client, rgbw_handle, ..) = make_test_client();
        client
            .prepare(DeviceType::Rgbw, Some(0x1234), Some(1))
            .await
            .unwrap();
        rgbw_handle.fail_after(1);
        assert!(matches!(
            client.update_status(Status::On).await,
            Err(Error::Transport(_))
        ));

        // The failed command is gone; the next one starts a fresh packet.
        rgbw_handle.clear_sent();
        rgbw_handle.fail_after(usize::MAX);
        client.update_status(Status::Off).await.unwrap();
        let sent = rgbw_handle.sent_packets();
        assert_eq!(sent.len(), 3);
        assert!(sent.iter().all(|p| p[6] == 1));
        assert!(sent.iter().all(|p| p[5] == 0x04));
    }

    // -----------------------------------------------------------------
    // Step emulation
    // -----------------------------------------------------------------

    #[tokio::test]
    async fn cct_brightness_is_emulated_with_steps() {
        let (mut client, _, cct_handle, _) = make_test_client();
        client
            .prepare(DeviceType::Cct, Some(0x1234), Some(1))
            .await
            .unwrap();
        client.update_brightness(42).await.unwrap();

        let buttons: Vec<u8> = cct_handle.sent_packets().iter().map(|p| p[4]).collect();
        let mut expected = vec![cct_protocol::BRIGHTNESS_DOWN; 10 * 10];
        expected.extend(vec![cct_protocol::BRIGHTNESS_UP; 4 * 10]);
        assert_eq!(buttons, expected);
    }

    #[tokio::test]
    async fn cct_temperature_is_emulated_with_steps() {
        let (mut client, _, cct_handle, _) = make_test_client();
        client
            .prepare(DeviceType::Cct, Some(0x1234), Some(2))
            .await
            .unwrap();
        client.update_temperature(100).await.unwrap();

        let sent = cct_handle.sent_packets();
        let downs = sent
            .iter()
            .filter(|p| p[4] == cct_protocol::TEMPERATURE_DOWN)
            .count();
        let ups = sent
            .iter()
            .filter(|p| p[4] == cct_protocol::TEMPERATURE_UP)
            .count();
        assert_eq!(downs, 100);
        assert_eq!(ups, 100);
    }

    #[tokio::test]
    async fn step_emulation_restores_resend_count() {
        let (mut client, ..) = make_test_client();
        client
            .prepare(DeviceType::Cct, Some(0x1234), Some(1))
            .await
            .unwrap();
        client.update_brightness(0).await.unwrap();
        assert_eq!(client.resend_count(), 3);
    }

    #[tokio::test]
    async fn step_emulation_honours_builder_settings() {
        let (radio, handle) = MockRadio::with_handle();
        let mut client = ClientBuilder::new()
            .radio(cct(), Box::new(radio))
            .packet_delay(Duration::ZERO)
            .step_intervals(4)
            .step_resend_count(2)
            .build()
            .unwrap();
        client
            .prepare(DeviceType::Cct, Some(0x1234), Some(1))
            .await
            .unwrap();
        client.update_brightness(50).await.unwrap();
        // 4 decreases + 2 increases, 2 writes each
        assert_eq!(handle.sent_count(), 12);
    }

    #[tokio::test]
    async fn absolute_brightness_is_direct_on_v2() {
        let (mut client, _, _, v2_handle) = make_test_client();
        client
            .prepare(DeviceType::RgbCct, Some(0x1234), Some(1))
            .await
            .unwrap();
        client.update_brightness(42).await.unwrap();

        let sent = v2_handle.sent_packets();
        assert_eq!(sent.len(), 3);
        let decoded = decode_v2(&sent[0]);
        assert_eq!(decoded[4], 0x04);
        assert_eq!(decoded[5], 0x4F + 42);
    }

    // -----------------------------------------------------------------
    // Held flag
    // -----------------------------------------------------------------

    #[tokio::test]
    async fn held_is_forwarded_on_switch() {
        let (mut client, rgbw_handle, ..) = make_test_client();
        client.set_held(true);
        client
            .prepare(DeviceType::Rgbw, Some(0x1234), Some(1))
            .await
            .unwrap();
        client.update_status(Status::On).await.unwrap();
        assert_eq!(rgbw_handle.sent_packets()[0][5], 0x83);

        client.set_held(false);
        rgbw_handle.clear_sent();
        client.update_status(Status::On).await.unwrap();
        assert_eq!(rgbw_handle.sent_packets()[0][5], 0x03);
    }

    // -----------------------------------------------------------------
    // Raw I/O and diagnostics
    // -----------------------------------------------------------------

    #[tokio::test]
    async fn raw_write_is_resent() {
        let (mut client, _, cct_handle, _) = make_test_client();
        client.prepare(DeviceType::Cct, None, None).await.unwrap();
        client.write(&[0x5A, 1, 2, 3, 4, 5, 6]).await.unwrap();
        assert_eq!(cct_handle.sent_count(), 3);
    }

    #[tokio::test]
    async fn listen_and_parse_inbound() {
        let (mut client, rgbw_handle, ..) = make_test_client();
        client.prepare(DeviceType::Rgbw, None, None).await.unwrap();
        rgbw_handle.push_inbound(&[0xB8, 0xAB, 0xCD, 0x00, 0x02, 0x05, 0x11]);

        assert!(client.available().await);
        let mut buf = [0u8; 7];
        assert_eq!(client.read(&mut buf).await.unwrap(), 7);

        let state = client.parse_packet(&buf).unwrap();
        assert_eq!(state.device_id, 0xABCD);
        assert_eq!(state.status, Some(Status::On));

        let text = client.format_packet(&buf).unwrap();
        assert!(text.contains("Device ID     : ABCD"));
    }

    #[tokio::test]
    async fn raw_command_passthrough() {
        let (mut client, _, _, v2_handle) = make_test_client();
        client
            .prepare(DeviceType::RgbCct, Some(0xBEEF), Some(3))
            .await
            .unwrap();
        client.command(0x05, 0x02).await.unwrap();
        let decoded = decode_v2(&v2_handle.sent_packets()[0]);
        assert_eq!(&decoded[4..6], &[0x05, 0x02]);
        assert_eq!(decoded[7], 3);
    }
}
