// milight test application -- CLI tool for exercising the three packet
// dialects (legacy RGBW, CCT and encrypted V2 RGB+CCT) and the client
// without radio hardware.
//
// Usage:
//   milight-test-app list
//   milight-test-app parse --type rgb_cct "9A 10 C5 FD F5 D5 4C BB A5"
//   milight-test-app format --type rgbw "B8 12 34 00 01 03 00"
//   milight-test-app send --type rgbw --device-id 0x1234 --group 1 on
//   milight-test-app send --type cct --device-id 0x1234 --group 2 brightness=40
//   milight-test-app -v send --type rgb_cct --device-id 0xBEEF --resend 3 hue=240

use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use milight::models::{self, RadioConfig};
use milight::{
    ClientBuilder, LightCommand, PacketFormatter, ParsedState, Transport, hex_string, parse_hex,
};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// milight test application -- exercises the packet dialects from the
/// command line.
#[derive(Parser)]
#[command(name = "milight-test-app", version, about)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all radio configs and their capabilities.
    List,

    /// Print the diagnostic dump of a raw packet.
    Format {
        /// Device type: rgbw, cct, rgb_cct.
        #[arg(long)]
        r#type: String,

        /// Packet bytes in hex (e.g. "B8 12 34 00 01 03 00").
        packet: String,
    },

    /// Decode a raw packet as if it had been received.
    Parse {
        /// Device type: rgbw, cct, rgb_cct.
        #[arg(long)]
        r#type: String,

        /// Packet bytes in hex.
        packet: String,
    },

    /// Run one command through the client and print every packet written.
    Send {
        /// Device type: rgbw, cct, rgb_cct.
        #[arg(long)]
        r#type: String,

        /// Remote id (decimal or hex, e.g. 0x1234).
        #[arg(long, value_parser = parse_device_id)]
        device_id: u16,

        /// Group number (0 = all groups).
        #[arg(long, default_value_t = 0)]
        group: u8,

        /// Writes per packet (default: 1 so the output stays readable).
        #[arg(long, default_value_t = 1)]
        resend: u32,

        /// Mark the command as a held button.
        #[arg(long)]
        held: bool,

        /// Pause between distinct packets, in milliseconds.
        #[arg(long, default_value_t = 0)]
        delay_ms: u64,

        /// Command, e.g. on, off, pair, hue=240, brightness=40,
        /// color_temp=30, mode=3, night_mode, command=0x05,0x02.
        action: String,
    },
}

/// Parse a device id like "0x1234" or "4660" into a u16.
fn parse_device_id(s: &str) -> std::result::Result<u16, String> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16).map_err(|e| format!("invalid device id: {e}")),
        None => s.parse().map_err(|e| format!("invalid device id: {e}")),
    }
}

// ---------------------------------------------------------------------------
// Console transport
// ---------------------------------------------------------------------------

/// Transport that prints each written packet with its diagnostic dump.
///
/// Consecutive identical writes (resends) are printed once with a count.
struct ConsoleTransport {
    config: RadioConfig,
    formatter: Box<dyn PacketFormatter>,
    last: Option<Vec<u8>>,
    repeats: u32,
}

impl ConsoleTransport {
    fn new(config: RadioConfig) -> Result<Self> {
        Ok(ConsoleTransport {
            config,
            formatter: config.formatter()?,
            last: None,
            repeats: 0,
        })
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    async fn configure(&mut self) -> milight::Result<()> {
        println!(
            "-- radio configured for {} ({} byte packets)",
            self.config.name, self.config.packet_length
        );
        Ok(())
    }

    async fn write(&mut self, packet: &[u8]) -> milight::Result<()> {
        if self.last.as_deref() == Some(packet) {
            self.repeats += 1;
            println!("   (resend {})", self.repeats);
            return Ok(());
        }
        self.last = Some(packet.to_vec());
        self.repeats = 1;

        println!("\n>> {}", hex_string(packet));
        match self.formatter.format(packet) {
            Ok(dump) => {
                for line in dump.lines() {
                    println!("   {line}");
                }
            }
            Err(e) => println!("   (no dump: {e})"),
        }
        Ok(())
    }

    async fn available(&mut self) -> bool {
        false
    }

    async fn read(&mut self, _buf: &mut [u8]) -> milight::Result<usize> {
        Ok(0)
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn lookup_config(name: &str) -> Result<RadioConfig> {
    models::from_name(name).with_context(|| {
        let known: Vec<&str> = models::all_configs().iter().map(|c| c.name).collect();
        format!("supported device types: {}", known.join(", "))
    })
}

fn cmd_list() -> Result<()> {
    println!(
        "{:<8}  {:>4}  {:>6}  {:<10}  {:<11}  {:<5}  {:<10}  Modes",
        "Type", "Tag", "Length", "Brightness", "Temperature", "Color", "Saturation"
    );
    println!("{}", "-".repeat(76));

    for config in milight::supported_radios() {
        let caps = config.capabilities;
        let brightness = match (caps.absolute_brightness, caps.relative_brightness) {
            (true, _) => "absolute",
            (false, true) => "steps",
            (false, false) => "-",
        };
        let temperature = match (caps.absolute_temperature, caps.relative_temperature) {
            (true, _) => "absolute",
            (false, true) => "steps",
            (false, false) => "-",
        };
        println!(
            "{:<8}  0x{:02X}  {:>6}  {:<10}  {:<11}  {:<5}  {:<10}  {}",
            config.name,
            config.device_type.tag(),
            config.packet_length,
            brightness,
            temperature,
            if caps.color { "yes" } else { "-" },
            if caps.saturation { "yes" } else { "-" },
            caps.num_modes,
        );
    }
    Ok(())
}

fn read_packet(config: &RadioConfig, hex: &str) -> Result<Vec<u8>> {
    let packet = parse_hex(hex)?;
    if packet.len() != config.packet_length {
        bail!(
            "{} packets are {} bytes, got {}",
            config.name,
            config.packet_length,
            packet.len()
        );
    }
    Ok(packet)
}

fn cmd_format(type_name: &str, hex: &str) -> Result<()> {
    let config = lookup_config(type_name)?;
    let packet = read_packet(&config, hex)?;
    let formatter = config.formatter()?;
    println!("{}", formatter.format(&packet)?);
    Ok(())
}

fn print_field<T: std::fmt::Display>(label: &str, value: Option<T>) {
    if let Some(value) = value {
        println!("{label:<12}: {value}");
    }
}

fn print_state(state: &ParsedState) {
    println!("{:<12}: {}", "Device type", state.device_type);
    println!("{:<12}: {:04X}", "Device ID", state.device_id);
    println!("{:<12}: {}", "Group", state.group_id);
    println!("{:<12}: {:02X}", "Command", state.command);
    print_field("Status", state.status);
    print_field("Brightness", state.brightness);
    print_field("Hue", state.hue);
    print_field("Temperature", state.temperature);
    print_field("Saturation", state.saturation);
    print_field("Mode", state.mode);
}

fn cmd_parse(type_name: &str, hex: &str) -> Result<()> {
    let config = lookup_config(type_name)?;
    let packet = read_packet(&config, hex)?;
    let formatter = config.formatter()?;
    let state = formatter
        .parse_packet(&packet)
        .with_context(|| format!("could not decode {} packet", config.name))?;
    print_state(&state);
    Ok(())
}

struct SendArgs<'a> {
    type_name: &'a str,
    device_id: u16,
    group: u8,
    resend: u32,
    held: bool,
    delay: Duration,
    action: &'a str,
}

async fn cmd_send(args: SendArgs<'_>) -> Result<()> {
    let config = lookup_config(args.type_name)?;
    let command: LightCommand = args
        .action
        .parse()
        .with_context(|| format!("invalid action '{}'", args.action))?;

    let mut client = ClientBuilder::new()
        .radio(config, Box::new(ConsoleTransport::new(config)?))
        .resend_count(args.resend)
        .step_resend_count(args.resend)
        .packet_delay(args.delay)
        .build()?;

    client.set_held(args.held);
    client
        .prepare(config.device_type, Some(args.device_id), Some(args.group))
        .await?;

    println!(
        "-- sending '{command}' to {:04X}/{} as {}",
        args.device_id, args.group, config.name
    );
    client.apply(command).await?;
    println!("\nDone.");
    Ok(())
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Command::List => cmd_list(),
        Command::Format { r#type, packet } => cmd_format(r#type, packet),
        Command::Parse { r#type, packet } => cmd_parse(r#type, packet),
        Command::Send {
            r#type,
            device_id,
            group,
            resend,
            held,
            delay_ms,
            action,
        } => {
            cmd_send(SendArgs {
                type_name: r#type,
                device_id: *device_id,
                group: *group,
                resend: *resend,
                held: *held,
                delay: Duration::from_millis(*delay_ms),
                action,
            })
            .await
        }
    }
}
