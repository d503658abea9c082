//! High-level OWNet client for talking to owserver.
//!
//! This module provides the [`Client`] struct, the primary interface to an
//! owserver daemon.
//!
//! # Overview
//!
//! The client handles:
//! - Dialing owserver for every operation and closing afterwards
//! - Request construction and framing
//! - Status checking of responses
//! - Device enumeration and attribute helpers
//!
//! # Example
//!
//! ```no_run
//! use ownet::{Client, ClientConfig};
//!
//! let client = Client::new(ClientConfig::new("192.168.0.10:4304"));
//!
//! for device in client.list_devices()? {
//!     println!("{} is a {}", device, client.get_type(device.as_str())?);
//! }
//!
//! client.set_attr("3A.BEE71B000000", "PIO.B", "1")?;
//! # Ok::<(), ownet::OwnetError>(())
//! ```
//!
//! # Thread Safety
//!
//! `Client` is `Send + Sync`. A mutex is held for the whole of each
//! operation (dial, request, response, close), so concurrent callers are
//! served strictly one after another and never share a connection.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crate::device::{attr_path, filter_devices, DeviceId};
use crate::error::Result;
use crate::header::DEFAULT_FLAGS;
use crate::message::{Request, DIR_BUFFER_SIZE};
use crate::response::OwResponse;
use crate::transport::{TcpTransport, DEFAULT_ADDRESS, DEFAULT_DIAL_TIMEOUT};

/// Buffer size used by [`Client::get_attr`].
pub const DEFAULT_ATTR_CAPACITY: usize = 16;

/// Configuration for creating an OWNet client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// owserver address in `host:port` form.
    pub address: String,
    /// Timeout for establishing each connection.
    pub dial_timeout: Duration,
    /// Read/write timeout on the socket; `None` waits forever.
    pub io_timeout: Option<Duration>,
    /// Flag word sent with every request.
    pub flags: i32,
}

impl ClientConfig {
    /// Creates a configuration for the owserver at `address`.
    ///
    /// An empty address selects [`DEFAULT_ADDRESS`].
    ///
    /// # Example
    ///
    /// ```
    /// use ownet::ClientConfig;
    ///
    /// let config = ClientConfig::new("");
    /// assert_eq!(config.address, "127.0.0.1:4304");
    /// ```
    pub fn new(address: impl Into<String>) -> Self {
        let address = address.into();
        Self {
            address: if address.is_empty() {
                DEFAULT_ADDRESS.to_string()
            } else {
                address
            },
            dial_timeout: DEFAULT_DIAL_TIMEOUT,
            io_timeout: None,
            flags: DEFAULT_FLAGS,
        }
    }

    /// Sets the connection timeout (default is 30 seconds).
    ///
    /// # Example
    ///
    /// ```
    /// use ownet::ClientConfig;
    /// use std::time::Duration;
    ///
    /// let config = ClientConfig::new("owserver:4304")
    ///     .with_dial_timeout(Duration::from_secs(5));
    /// ```
    pub fn with_dial_timeout(mut self, timeout: Duration) -> Self {
        self.dial_timeout = timeout;
        self
    }

    /// Sets a read/write timeout for each connection (default is none).
    pub fn with_io_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.io_timeout = timeout;
        self
    }

    /// Overrides the request flag word (default is `0x102`).
    pub fn with_flags(mut self, flags: i32) -> Self {
        self.flags = flags;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ADDRESS)
    }
}

/// OWNet client.
///
/// Each public operation produces exactly one connection, one request and one
/// response. No automatic retries, caching, or persistent connections.
///
/// # Example
///
/// ```no_run
/// use ownet::Client;
///
/// let client = Client::connect_to("192.168.0.10:4304");
///
/// let entries = client.dir("/")?;
///
/// let mut buf = [0u8; 16];
/// let n = client.read("/3A.BEE71B000000/PIO.B", 0, &mut buf)?;
/// println!("PIO.B = {}", String::from_utf8_lossy(&buf[..n]));
///
/// client.write("/3A.BEE71B000000/PIO.B", 0, b"1")?;
/// # Ok::<(), ownet::OwnetError>(())
/// ```
pub struct Client {
    config: ClientConfig,
    conn: Mutex<Option<TcpTransport>>,
}

impl Client {
    /// Creates a new client. No connection is made until the first operation.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            conn: Mutex::new(None),
        }
    }

    /// Creates a client for `address` with default settings.
    pub fn connect_to(address: impl Into<String>) -> Self {
        Self::new(ClientConfig::new(address))
    }

    /// Runs one request/response exchange on a fresh connection.
    ///
    /// The lock is held throughout; the connection is closed before
    /// returning, whatever the outcome.
    fn exchange(&self, request: &Request, buf: &mut [u8]) -> Result<OwResponse> {
        let mut conn = self.lock();

        let transport = TcpTransport::dial(&self.config.address, self.config.dial_timeout)?;
        let transport = conn.insert(transport);

        let result = Self::round_trip(transport, self.config.io_timeout, request, buf);

        if let Some(transport) = conn.take() {
            transport.close();
        }
        result
    }

    fn round_trip(
        transport: &mut TcpTransport,
        io_timeout: Option<Duration>,
        request: &Request,
        buf: &mut [u8],
    ) -> Result<OwResponse> {
        if io_timeout.is_some() {
            transport.set_io_timeout(io_timeout)?;
        }
        transport.send(request.header(), request.payload())?;
        transport.receive(buf)
    }

    fn lock(&self) -> MutexGuard<'_, Option<TcpTransport>> {
        // Poisoned or not, the slot only ever holds a connection to drop.
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Lists the directory at `path`.
    ///
    /// Entries are returned in owserver's order, each with its leading `/`.
    /// An empty directory yields a single empty string.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path contains a NUL byte
    /// - Connection or communication fails
    /// - owserver returns a nonzero status (`OwnetError::Protocol`)
    /// - The listing exceeds 4096 bytes (`OwnetError::BufferTooSmall`)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ownet::Client;
    ///
    /// let client = Client::default();
    /// for entry in client.dir("/")? {
    ///     println!("{}", entry);
    /// }
    /// # Ok::<(), ownet::OwnetError>(())
    /// ```
    pub fn dir(&self, path: &str) -> Result<Vec<String>> {
        let request = Request::dir(path, self.config.flags)?;
        let mut buf = vec![0u8; DIR_BUFFER_SIZE];

        let response = self.exchange(&request, &mut buf)?;
        response.check_dir_status()?;
        response.check_fits(buf.len())?;

        let mut listing = &buf[..response.len];
        // Some owserver versions NUL-terminate the listing.
        while let [rest @ .., 0] = listing {
            listing = rest;
        }
        Ok(String::from_utf8_lossy(listing)
            .split(',')
            .map(str::to_string)
            .collect())
    }

    /// Reads from the file at `path`, starting at `offset`, into `buf`.
    ///
    /// Returns the number of bytes stored at the front of `buf`, which may be
    /// less than its length.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path contains a NUL byte or `offset` exceeds `i32::MAX`
    /// - Connection or communication fails
    /// - owserver returns a negative status (`OwnetError::Protocol`)
    /// - The response is larger than `buf` (`OwnetError::BufferTooSmall`)
    pub fn read(&self, path: &str, offset: u32, buf: &mut [u8]) -> Result<usize> {
        let request = Request::read(path, offset, buf.len(), self.config.flags)?;

        let response = self.exchange(&request, buf)?;
        response.check_error()?;
        response.check_fits(buf.len())?;
        Ok(response.len)
    }

    /// Writes `data` to the file at `path`, starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path contains a NUL byte or `offset` exceeds `i32::MAX`
    /// - Connection or communication fails
    /// - owserver returns a negative status (`OwnetError::Protocol`)
    pub fn write(&self, path: &str, offset: u32, data: &[u8]) -> Result<()> {
        let request = Request::write(path, offset, data, self.config.flags)?;

        let response = self.exchange(&request, &mut [0u8; 0])?;
        response.check_error()?;
        response.check_fits(0)
    }

    /// Returns whether `path` exists on owserver.
    ///
    /// # Errors
    ///
    /// Returns an error if the path contains a NUL byte or if connection or
    /// communication fails. A negative status is reported as `false`.
    pub fn presence(&self, path: &str) -> Result<bool> {
        let request = Request::presence(path, self.config.flags)?;

        let response = self.exchange(&request, &mut [0u8; 0])?;
        Ok(response.is_success())
    }

    /// Lists the devices present on the bus.
    ///
    /// Root entries that are not device identifiers are skipped.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Client::dir`].
    pub fn list_devices(&self) -> Result<Vec<DeviceId>> {
        let entries = self.dir("/")?;
        Ok(filter_devices(&entries).collect())
    }

    /// Reads attribute `attr` of `device` as a string.
    ///
    /// Uses a 16-byte buffer; see [`Client::get_attr_with_capacity`] for
    /// longer values.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Client::read`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ownet::Client;
    ///
    /// let client = Client::default();
    /// let temp = client.get_attr("10.67C6697351FF", "temperature")?;
    /// println!("{}", temp.trim());
    /// # Ok::<(), ownet::OwnetError>(())
    /// ```
    pub fn get_attr(&self, device: &str, attr: &str) -> Result<String> {
        self.get_attr_with_capacity(device, attr, DEFAULT_ATTR_CAPACITY)
    }

    /// Reads attribute `attr` of `device` with a `capacity`-byte buffer.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Client::read`].
    pub fn get_attr_with_capacity(
        &self,
        device: &str,
        attr: &str,
        capacity: usize,
    ) -> Result<String> {
        let mut buf = vec![0u8; capacity];
        let n = self.read(&attr_path(device, attr), 0, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf[..n]).into_owned())
    }

    /// Sets attribute `attr` of `device` to `value`.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Client::write`].
    pub fn set_attr(&self, device: &str, attr: &str, value: &str) -> Result<()> {
        self.write(&attr_path(device, attr), 0, value.as_bytes())
    }

    /// Returns the device type (its `type` attribute, e.g. `DS2413`).
    ///
    /// # Errors
    ///
    /// Returns any error from [`Client::read`].
    pub fn get_type(&self, device: &str) -> Result<String> {
        self.get_attr(device, "type")
    }

    /// Releases the connection, if one is held.
    ///
    /// Connections only live for the length of one operation, so between
    /// calls there is nothing to release. Waits for an operation in progress
    /// on another thread to finish rather than interrupting it.
    pub fn close(&self) {
        if let Some(transport) = self.lock().take() {
            transport.close();
        }
    }

    /// Returns the owserver address.
    pub fn address(&self) -> &str {
        &self.config.address
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish()
    }
}
