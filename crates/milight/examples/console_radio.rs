//! Drive all three dialects against a radio that prints what it sends.
//!
//! Demonstrates registering one transport per dialect, addressing a bulb,
//! and how each dialect renders the same commands on the air. Absolute
//! brightness on a CCT bulb shows up as a burst of step packets.
//!
//! # Usage
//!
//! ```sh
//! cargo run -p milight --example console_radio
//! ```

use std::time::Duration;

use async_trait::async_trait;

use milight::models::{cct, rgb_cct, rgbw};
use milight::{ClientBuilder, DeviceType, Status, Transport, hex_string};

/// Prints every written packet instead of transmitting it.
struct PrintRadio {
    name: &'static str,
}

#[async_trait]
impl Transport for PrintRadio {
    async fn configure(&mut self) -> milight::Result<()> {
        println!("[{}] configure", self.name);
        Ok(())
    }

    async fn write(&mut self, packet: &[u8]) -> milight::Result<()> {
        println!("[{}] {}", self.name, hex_string(packet));
        Ok(())
    }

    async fn available(&mut self) -> bool {
        false
    }

    async fn read(&mut self, _buf: &mut [u8]) -> milight::Result<usize> {
        Ok(0)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let mut client = ClientBuilder::new()
        .radio(rgbw(), Box::new(PrintRadio { name: "rgbw" }))
        .radio(cct(), Box::new(PrintRadio { name: "cct" }))
        .radio(rgb_cct(), Box::new(PrintRadio { name: "rgb_cct" }))
        .resend_count(1)
        .step_resend_count(1)
        .packet_delay(Duration::from_millis(5))
        .build()?;

    for device_type in DeviceType::ALL {
        println!("\n== {device_type} ==");
        client.prepare(device_type, Some(0x1234), Some(1)).await?;
        client.update_status(Status::On).await?;
        client.update_brightness(40).await?;
        client.enable_night_mode().await?;
    }

    println!("\nDone.");
    Ok(())
}
