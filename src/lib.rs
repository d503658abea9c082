//! # OWNet Client Library
//!
//! A Rust client for the OWNet protocol spoken by `owserver`, the daemon that
//! exposes 1-Wire sensor and actuator networks as a virtual filesystem.
//! Every device and every device attribute is a path, for example
//! `/3A.BEE71B000000/PIO.B`.
//!
//! This is a **protocol-only** library: no polling, caching or scheduling.
//! Each call opens one TCP connection, sends one request, reads one response
//! and closes the connection. No automatic retries.
//!
//! ## Features
//!
//! - **Three verbs** - directory listing, byte-range read, byte-range write
//! - **Device helpers** - enumerate devices, get/set attributes, device type
//! - **Thread-safe** - one `Client` can be shared; operations are serialized
//! - **No panics** - all errors returned as `Result<T, OwnetError>`
//!
//! ## Quick Start
//!
//! ```no_run
//! use ownet::Client;
//!
//! fn main() -> ownet::Result<()> {
//!     // Empty address means the default 127.0.0.1:4304
//!     let client = Client::connect_to("");
//!
//!     // Root directory
//!     for entry in client.dir("/")? {
//!         println!("{}", entry);
//!     }
//!
//!     // Devices and their types
//!     for device in client.list_devices()? {
//!         println!("{}: {}", device, client.get_type(device.as_str())?);
//!     }
//!
//!     // Raw read and write
//!     let mut buf = [0u8; 16];
//!     let n = client.read("/3A.BEE71B000000/PIO.B", 0, &mut buf)?;
//!     println!("PIO.B = {}", String::from_utf8_lossy(&buf[..n]));
//!     client.write("/3A.BEE71B000000/PIO.B", 0, b"1")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Wire Format
//!
//! Every message, in both directions, is a 24-byte header of six big-endian
//! `i32`s followed by `payload` bytes. See [`OwHeader`].
//!
//! | Field | Request | Response |
//! |-------|---------|----------|
//! | version | 0 | unused |
//! | payload | length of NUL-terminated path (+ write data) | length of returned data |
//! | type | verb: 2 read, 3 write, 6 presence, 7 directory | status, negative on error |
//! | flags | `0x102` | unused |
//! | size | buffer size / write length | unused |
//! | offset | byte offset | unused |
//!
//! ## Error Handling
//!
//! ```no_run
//! use ownet::{Client, OwnetError};
//!
//! let client = Client::default();
//! match client.get_attr("10.67C6697351FF", "temperature") {
//!     Ok(value) => println!("{}", value.trim()),
//!     Err(OwnetError::Connection { address, .. }) => println!("owserver at {} unreachable", address),
//!     Err(OwnetError::Protocol { code }) => println!("owserver error {}", code),
//!     Err(e) => println!("Error: {}", e),
//! }
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`](https://docs.rs/tracing) events: dials and
//! every header sent or received at `debug`, oversize responses at `warn`.
//! Install a subscriber in the application to see them.

#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod client;
pub mod device;
mod error;
mod frame;
mod header;
mod message;
mod response;
mod transport;

// Public re-exports
pub use client::{Client, ClientConfig, DEFAULT_ATTR_CAPACITY};
pub use device::{DeviceId, DEVICE_ID_PATTERN};
pub use error::{OwnetError, Result};
pub use frame::{read_message, write_message};
pub use header::{OwHeader, DEFAULT_FLAGS, HEADER_SIZE, PING_PAYLOAD, PROTOCOL_VERSION};
pub use message::{MessageType, Request, DIR_BUFFER_SIZE};
pub use response::OwResponse;
pub use transport::{TcpTransport, DEFAULT_ADDRESS, DEFAULT_DIAL_TIMEOUT};
