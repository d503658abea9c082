//! Example: listing 1-Wire devices through owserver
//!
//! Run with: cargo run --example list_devices -- [host:port]
//!
//! This example demonstrates:
//! - Listing the root directory
//! - Enumerating devices and reading their type
//! - Reading a raw attribute into a caller buffer

use ownet::{Client, ClientConfig, OwnetError};
use std::time::Duration;

fn main() -> ownet::Result<()> {
    // Empty address falls back to 127.0.0.1:4304
    let address = std::env::args().nth(1).unwrap_or_default();
    let config = ClientConfig::new(address).with_dial_timeout(Duration::from_secs(5));
    let client = Client::new(config);

    println!("=== Root directory of {} ===\n", client.address());
    for entry in client.dir("/")? {
        println!("  {}", entry);
    }

    println!("\n=== Devices ===\n");
    let devices = client.list_devices()?;
    if devices.is_empty() {
        println!("  (none)");
    }
    for device in &devices {
        let kind = client.get_type(device.as_str())?;
        println!("  {} family {} type {}", device, device.family(), kind);
    }

    if let Some(device) = devices.first() {
        println!("\n=== Raw read of {} ===\n", device.attr_path("address"));
        let mut buf = [0u8; 32];
        match client.read(&device.attr_path("address"), 0, &mut buf) {
            Ok(n) => println!("  {} bytes: {}", n, String::from_utf8_lossy(&buf[..n])),
            Err(OwnetError::Protocol { code }) => println!("  owserver error {}", code),
            Err(e) => return Err(e),
        }
    }

    Ok(())
}
