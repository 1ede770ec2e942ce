//! Typed upstream command set.
//!
//! Front-ends (HTTP, UDP, the test app) translate their requests into
//! [`LightCommand`] values and hand them to
//! [`MiLightClient::apply`](crate::client::MiLightClient::apply). Each variant
//! maps to exactly one client operation.
//!
//! Commands also have a compact text form used on the command line:
//!
//! | Text                      | Command                       |
//! |---------------------------|-------------------------------|
//! | `on`, `off`               | [`LightCommand::Status`]      |
//! | `pair`, `unpair`          | pairing sequences             |
//! | `hue=240`                 | [`LightCommand::Hue`] (0-360) |
//! | `color=170`               | raw color byte                |
//! | `saturation=50`           | 0-100                         |
//! | `brightness=75`, `level=75` | 0-100                       |
//! | `color_temp=30`           | 0 (warm) to 100 (cool)        |
//! | `mode=3`, `next_mode`, `previous_mode` | animation modes  |
//! | `speed_up`, `speed_down`  | animation speed               |
//! | `white`, `night_mode`     | shortcuts                     |
//! | `held=true`               | button-held flag              |
//! | `command=0x05,0x02`       | raw command and argument      |
//! | `brightness_up`, `brightness_down`, `temperature_up`, `temperature_down` | relative steps |

use std::fmt;
use std::str::FromStr;

use milight_core::error::{Error, Result};
use milight_core::types::Status;

use crate::client::MiLightClient;

/// One upstream light command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightCommand {
    Status(Status),
    Pair,
    Unpair,
    /// Hue in degrees, 0-360.
    Hue(u16),
    /// Raw color byte.
    ColorRaw(u8),
    Saturation(u8),
    Brightness(u8),
    /// Alias for brightness kept for front-ends that say "level".
    Level(u8),
    ColorTemperature(u8),
    Mode(u8),
    NextMode,
    PreviousMode,
    ModeSpeedUp,
    ModeSpeedDown,
    White,
    NightMode,
    Held(bool),
    /// Raw passthrough of a dialect command code and argument.
    Raw { command: u8, arg: u8 },
    IncreaseBrightness,
    DecreaseBrightness,
    IncreaseTemperature,
    DecreaseTemperature,
}

impl MiLightClient {
    /// Run one upstream command on the active radio.
    pub async fn apply(&mut self, command: LightCommand) -> Result<()> {
        match command {
            LightCommand::Status(status) => self.update_status(status).await,
            LightCommand::Pair => self.pair().await,
            LightCommand::Unpair => self.unpair().await,
            LightCommand::Hue(hue) => self.update_hue(hue).await,
            LightCommand::ColorRaw(value) => self.update_color_raw(value).await,
            LightCommand::Saturation(value) => self.update_saturation(value).await,
            LightCommand::Brightness(value) | LightCommand::Level(value) => {
                self.update_brightness(value).await
            }
            LightCommand::ColorTemperature(value) => self.update_temperature(value).await,
            LightCommand::Mode(mode) => self.update_mode(mode).await,
            LightCommand::NextMode => self.next_mode().await,
            LightCommand::PreviousMode => self.previous_mode().await,
            LightCommand::ModeSpeedUp => self.mode_speed_up().await,
            LightCommand::ModeSpeedDown => self.mode_speed_down().await,
            LightCommand::White => self.update_color_white().await,
            LightCommand::NightMode => self.enable_night_mode().await,
            LightCommand::Held(held) => {
                self.set_held(held);
                Ok(())
            }
            LightCommand::Raw { command, arg } => self.command(command, arg).await,
            LightCommand::IncreaseBrightness => self.increase_brightness().await,
            LightCommand::DecreaseBrightness => self.decrease_brightness().await,
            LightCommand::IncreaseTemperature => self.increase_temperature().await,
            LightCommand::DecreaseTemperature => self.decrease_temperature().await,
        }
    }
}

fn invalid(s: &str, reason: &str) -> Error {
    Error::InvalidParameter(format!("{reason} in command {s:?}"))
}

/// Parse a decimal or `0x`-prefixed hex number.
fn parse_number<T>(s: &str) -> std::result::Result<T, String>
where
    T: TryFrom<u32>,
{
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).map_err(|e| e.to_string())?,
        None => s.parse::<u32>().map_err(|e| e.to_string())?,
    };
    T::try_from(parsed).map_err(|_| format!("{s} out of range"))
}

fn parse_percent(command: &str, value: &str) -> Result<u8> {
    let v: u8 = parse_number(value).map_err(|e| invalid(command, &e))?;
    if v > 100 {
        return Err(invalid(command, "value must be 0-100"));
    }
    Ok(v)
}

impl FromStr for LightCommand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let (name, value) = match trimmed.split_once('=') {
            Some((name, value)) => (name.trim(), Some(value.trim())),
            None => (trimmed, None),
        };
        let name = name.to_lowercase();

        let Some(value) = value else {
            return match name.as_str() {
                "on" => Ok(LightCommand::Status(Status::On)),
                "off" => Ok(LightCommand::Status(Status::Off)),
                "pair" => Ok(LightCommand::Pair),
                "unpair" => Ok(LightCommand::Unpair),
                "next_mode" => Ok(LightCommand::NextMode),
                "previous_mode" | "prev_mode" => Ok(LightCommand::PreviousMode),
                "speed_up" | "mode_speed_up" => Ok(LightCommand::ModeSpeedUp),
                "speed_down" | "mode_speed_down" => Ok(LightCommand::ModeSpeedDown),
                "white" => Ok(LightCommand::White),
                "night_mode" | "night" => Ok(LightCommand::NightMode),
                "brightness_up" => Ok(LightCommand::IncreaseBrightness),
                "brightness_down" => Ok(LightCommand::DecreaseBrightness),
                "temperature_up" => Ok(LightCommand::IncreaseTemperature),
                "temperature_down" => Ok(LightCommand::DecreaseTemperature),
                _ => Err(invalid(s, "unknown command")),
            };
        };

        match name.as_str() {
            "status" => match value.to_lowercase().as_str() {
                "on" => Ok(LightCommand::Status(Status::On)),
                "off" => Ok(LightCommand::Status(Status::Off)),
                _ => Err(invalid(s, "status must be on or off")),
            },
            "hue" => {
                let hue: u16 = parse_number(value).map_err(|e| invalid(s, &e))?;
                if hue > 360 {
                    return Err(invalid(s, "hue must be 0-360"));
                }
                Ok(LightCommand::Hue(hue))
            }
            "color" => {
                let raw = parse_number(value).map_err(|e| invalid(s, &e))?;
                Ok(LightCommand::ColorRaw(raw))
            }
            "saturation" => Ok(LightCommand::Saturation(parse_percent(s, value)?)),
            "brightness" => Ok(LightCommand::Brightness(parse_percent(s, value)?)),
            "level" => Ok(LightCommand::Level(parse_percent(s, value)?)),
            "color_temp" | "temperature" => {
                Ok(LightCommand::ColorTemperature(parse_percent(s, value)?))
            }
            "mode" => {
                let mode = parse_number(value).map_err(|e| invalid(s, &e))?;
                Ok(LightCommand::Mode(mode))
            }
            "held" => match value.to_lowercase().as_str() {
                "true" | "on" | "1" => Ok(LightCommand::Held(true)),
                "false" | "off" | "0" => Ok(LightCommand::Held(false)),
                _ => Err(invalid(s, "held must be true or false")),
            },
            "command" => {
                let Some((command, arg)) = value.split_once(',') else {
                    return Err(invalid(s, "expected command=CODE,ARG"));
                };
                let command = parse_number(command.trim()).map_err(|e| invalid(s, &e))?;
                let arg = parse_number(arg.trim()).map_err(|e| invalid(s, &e))?;
                Ok(LightCommand::Raw { command, arg })
            }
            _ => Err(invalid(s, "unknown command")),
        }
    }
}

impl fmt::Display for LightCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightCommand::Status(Status::On) => f.write_str("on"),
            LightCommand::Status(Status::Off) => f.write_str("off"),
            LightCommand::Pair => f.write_str("pair"),
            LightCommand::Unpair => f.write_str("unpair"),
            LightCommand::Hue(hue) => write!(f, "hue={hue}"),
            LightCommand::ColorRaw(raw) => write!(f, "color={raw}"),
            LightCommand::Saturation(v) => write!(f, "saturation={v}"),
            LightCommand::Brightness(v) => write!(f, "brightness={v}"),
            LightCommand::Level(v) => write!(f, "level={v}"),
            LightCommand::ColorTemperature(v) => write!(f, "color_temp={v}"),
            LightCommand::Mode(mode) => write!(f, "mode={mode}"),
            LightCommand::NextMode => f.write_str("next_mode"),
            LightCommand::PreviousMode => f.write_str("previous_mode"),
            LightCommand::ModeSpeedUp => f.write_str("speed_up"),
            LightCommand::ModeSpeedDown => f.write_str("speed_down"),
            LightCommand::White => f.write_str("white"),
            LightCommand::NightMode => f.write_str("night_mode"),
            LightCommand::Held(held) => write!(f, "held={held}"),
            LightCommand::Raw { command, arg } => write!(f, "command={command:#04X},{arg:#04X}"),
            LightCommand::IncreaseBrightness => f.write_str("brightness_up"),
            LightCommand::DecreaseBrightness => f.write_str("brightness_down"),
            LightCommand::IncreaseTemperature => f.write_str("temperature_up"),
            LightCommand::DecreaseTemperature => f.write_str("temperature_down"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> LightCommand {
        s.parse().unwrap()
    }

    // -----------------------------------------------------------------
    // Parsing
    // -----------------------------------------------------------------

    #[test]
    fn parse_bare_names() {
        assert_eq!(parse("on"), LightCommand::Status(Status::On));
        assert_eq!(parse("OFF"), LightCommand::Status(Status::Off));
        assert_eq!(parse("pair"), LightCommand::Pair);
        assert_eq!(parse("prev_mode"), LightCommand::PreviousMode);
        assert_eq!(parse("night"), LightCommand::NightMode);
        assert_eq!(parse(" brightness_down "), LightCommand::DecreaseBrightness);
    }

    #[test]
    fn parse_valued_commands() {
        assert_eq!(parse("hue=240"), LightCommand::Hue(240));
        assert_eq!(parse("hue=360"), LightCommand::Hue(360));
        assert_eq!(parse("color=0xAA"), LightCommand::ColorRaw(0xAA));
        assert_eq!(parse("saturation=50"), LightCommand::Saturation(50));
        assert_eq!(parse("level=10"), LightCommand::Level(10));
        assert_eq!(parse("temperature=30"), LightCommand::ColorTemperature(30));
        assert_eq!(parse("status=off"), LightCommand::Status(Status::Off));
        assert_eq!(parse("held=on"), LightCommand::Held(true));
    }

    #[test]
    fn parse_raw_command() {
        assert_eq!(
            parse("command=0x05, 2"),
            LightCommand::Raw {
                command: 0x05,
                arg: 0x02
            }
        );
    }

    #[test]
    fn parse_rejects_out_of_range() {
        for bad in ["hue=361", "brightness=101", "color=256", "mode=-1", "color_temp=x"] {
            assert!(
                matches!(bad.parse::<LightCommand>(), Err(Error::InvalidParameter(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn parse_rejects_unknown_and_malformed() {
        assert!("dim".parse::<LightCommand>().is_err());
        assert!("command=5".parse::<LightCommand>().is_err());
        assert!("held=maybe".parse::<LightCommand>().is_err());
        assert!("status=dim".parse::<LightCommand>().is_err());
    }

    // -----------------------------------------------------------------
    // Display
    // -----------------------------------------------------------------

    #[test]
    fn display_parses_back() {
        let commands = [
            LightCommand::Status(Status::On),
            LightCommand::Unpair,
            LightCommand::Hue(360),
            LightCommand::Brightness(0),
            LightCommand::ColorTemperature(100),
            LightCommand::Mode(8),
            LightCommand::ModeSpeedDown,
            LightCommand::Held(false),
            LightCommand::Raw {
                command: 0x01,
                arg: 0xC6,
            },
            LightCommand::IncreaseTemperature,
        ];
        for command in commands {
            assert_eq!(parse(&command.to_string()), command);
        }
    }

    #[test]
    fn display_raw_is_hex() {
        let command = LightCommand::Raw {
            command: 0x05,
            arg: 0x0A,
        };
        assert_eq!(command.to_string(), "command=0x05,0x0A");
    }
}

#[cfg(all(test, feature = "rgbw", feature = "cct"))]
mod apply_tests {
    use super::*;
    use crate::builder::ClientBuilder;
    use crate::models::{cct, rgbw};
    use milight_core::types::DeviceType;
    use milight_test_harness::MockRadio;
    use std::time::Duration;

    #[tokio::test]
    async fn apply_dispatches_to_formatter() {
        let (radio, handle) = MockRadio::with_handle();
        let mut client = ClientBuilder::new()
            .radio(rgbw(), Box::new(radio))
            .resend_count(1)
            .packet_delay(Duration::ZERO)
            .build()
            .unwrap();
        client
            .prepare(DeviceType::Rgbw, Some(0x1234), Some(1))
            .await
            .unwrap();

        client.apply("on".parse().unwrap()).await.unwrap();
        client.apply(LightCommand::White).await.unwrap();
        client.apply(LightCommand::Mode(3)).await.unwrap();

        let sent = handle.sent_packets();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[0][5], 0x03);
        assert_eq!(sent[1][5], 0x13);
        assert_eq!(sent[2][5], 0x0D);
        assert_eq!(sent[2][0], 0xB8 | 3);
    }

    #[tokio::test]
    async fn apply_held_writes_nothing() {
        let (radio, handle) = MockRadio::with_handle();
        let mut client = ClientBuilder::new()
            .radio(rgbw(), Box::new(radio))
            .build()
            .unwrap();
        client
            .prepare(DeviceType::Rgbw, Some(0x1234), Some(1))
            .await
            .unwrap();
        client.apply(LightCommand::Held(true)).await.unwrap();
        assert!(client.held());
        assert_eq!(handle.sent_count(), 0);
    }

    #[tokio::test]
    async fn apply_level_emulates_on_cct() {
        let (radio, handle) = MockRadio::with_handle();
        let mut client = ClientBuilder::new()
            .radio(cct(), Box::new(radio))
            .packet_delay(Duration::ZERO)
            .step_resend_count(1)
            .build()
            .unwrap();
        client
            .prepare(DeviceType::Cct, Some(0x1234), Some(1))
            .await
            .unwrap();
        client.apply(LightCommand::Level(100)).await.unwrap();
        assert_eq!(handle.sent_count(), 20);
    }
}
