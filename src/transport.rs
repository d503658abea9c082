//! TCP transport to owserver.
//!
//! This module provides [`TcpTransport`], a thin wrapper around one
//! `TcpStream`. It knows how to dial with a timeout and how to move frames,
//! nothing about what the frames mean.
//!
//! # Design
//!
//! - **One connection per operation** - the client dials, exchanges one
//!   request and one response, and drops the transport
//! - **Synchronous** - blocking socket calls; only the dial is bounded by
//!   default, read/write timeouts are opt-in
//! - **Simple** - no pooling, no reconnection
//!
//! # Example
//!
//! ```no_run
//! use ownet::{OwHeader, TcpTransport, DEFAULT_DIAL_TIMEOUT};
//!
//! let mut transport = TcpTransport::dial("127.0.0.1:4304", DEFAULT_DIAL_TIMEOUT)?;
//! transport.send(OwHeader::new(7, 2, 0x102, 4096, 0), b"/\0")?;
//!
//! let mut buf = [0u8; 4096];
//! let response = transport.receive(&mut buf)?;
//! println!("{}", String::from_utf8_lossy(&buf[..response.len]));
//! # Ok::<(), ownet::OwnetError>(())
//! ```

use std::io;
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::error::{OwnetError, Result};
use crate::frame::{read_frame, write_message};
use crate::header::OwHeader;
use crate::response::OwResponse;

/// Default owserver address.
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:4304";

/// Timeout for establishing a connection.
pub const DEFAULT_DIAL_TIMEOUT: Duration = Duration::from_secs(30);

/// A single TCP connection to owserver.
pub struct TcpTransport {
    stream: TcpStream,
    remote_addr: SocketAddr,
}

impl TcpTransport {
    /// Opens a connection to `address` (`host:port`).
    ///
    /// Every address the name resolves to is tried in turn, each bounded by
    /// `timeout`; the first successful connection wins.
    ///
    /// # Errors
    ///
    /// Returns `OwnetError::Connection` if the name cannot be resolved or no
    /// resolved address accepts the connection in time.
    pub fn dial(address: &str, timeout: Duration) -> Result<Self> {
        tracing::debug!("dialing owserver at {address}");

        let addrs = address
            .to_socket_addrs()
            .map_err(|e| OwnetError::connection(address, e))?;

        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => {
                    // Requests are a single small write; don't wait for more.
                    stream
                        .set_nodelay(true)
                        .map_err(|e| OwnetError::connection(address, e))?;
                    tracing::debug!("connected to owserver at {addr}");
                    return Ok(Self {
                        stream,
                        remote_addr: addr,
                    });
                }
                Err(e) => {
                    tracing::debug!("connect to {addr} failed: {e}");
                    last_err = Some(e);
                }
            }
        }

        let source = last_err.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                "address resolved to no socket addresses",
            )
        });
        Err(OwnetError::connection(address, source))
    }

    /// Sets read and write timeouts on the socket. `None` blocks forever.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the socket rejects the timeout (e.g. zero).
    pub fn set_io_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.stream.set_read_timeout(timeout)?;
        self.stream.set_write_timeout(timeout)?;
        Ok(())
    }

    /// Sends one request frame.
    ///
    /// # Errors
    ///
    /// See [`write_message`].
    pub fn send(&mut self, header: OwHeader, payload: &[u8]) -> Result<()> {
        write_message(&mut self.stream, header, payload)
    }

    /// Receives one response frame, storing its payload in `buf`.
    ///
    /// A payload larger than `buf` is discarded rather than reported, so the
    /// status can be checked first; follow up with [`OwResponse::check_fits`].
    ///
    /// # Errors
    ///
    /// Returns `OwnetError::Framing` or `OwnetError::Io` as
    /// [`read_message`](crate::read_message) does.
    pub fn receive(&mut self, buf: &mut [u8]) -> Result<OwResponse> {
        let (header, len) = read_frame(&mut self.stream, buf)?;
        Ok(OwResponse::new(header, len))
    }

    /// Shuts the connection down. Dropping the transport also closes it.
    pub fn close(self) {
        if let Err(e) = self.stream.shutdown(Shutdown::Both) {
            // Peer may already have hung up.
            tracing::trace!("shutdown of {} failed: {e}", self.remote_addr);
        }
    }

    /// Returns the owserver address this transport is connected to.
    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }
}

impl std::fmt::Debug for TcpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcpTransport")
            .field("remote_addr", &self.remote_addr)
            .field("local_addr", &self.stream.local_addr().ok())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn test_default_constants() {
        assert_eq!(DEFAULT_ADDRESS, "127.0.0.1:4304");
        assert_eq!(DEFAULT_DIAL_TIMEOUT, Duration::from_secs(30));
    }

    #[test]
    fn test_dial_and_debug() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let transport = TcpTransport::dial(&addr.to_string(), Duration::from_secs(1)).unwrap();
        assert_eq!(transport.remote_addr(), addr);

        let debug_str = format!("{:?}", transport);
        assert!(debug_str.contains("TcpTransport"));
        assert!(debug_str.contains(&addr.to_string()));
        transport.close();
    }

    #[test]
    fn test_dial_refused() {
        // Bind then drop to get a port with nothing listening.
        let addr = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();

        let result = TcpTransport::dial(&addr.to_string(), Duration::from_secs(1));
        match result {
            Err(OwnetError::Connection { address, .. }) => assert_eq!(address, addr.to_string()),
            other => panic!("Expected Connection error, got {:?}", other),
        }
    }

    #[test]
    fn test_dial_unresolvable() {
        let result = TcpTransport::dial("not an address", Duration::from_secs(1));
        assert!(matches!(result, Err(OwnetError::Connection { .. })));
    }

    #[test]
    fn test_send_receive() {
        use std::io::{Read, Write};

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 24 + 2];
            stream.read_exact(&mut request).unwrap();
            assert_eq!(&request[24..], b"/\0");

            let mut reply = OwHeader::new(0, 5, 0, 0, 0).to_bytes().to_vec();
            reply.extend_from_slice(b"/bus0");
            stream.write_all(&reply).unwrap();
        });

        let mut transport = TcpTransport::dial(&addr.to_string(), Duration::from_secs(1)).unwrap();
        transport.set_io_timeout(Some(Duration::from_secs(5))).unwrap();
        transport
            .send(OwHeader::new(7, 2, 0x102, 4096, 0), b"/\0")
            .unwrap();

        let mut buf = [0u8; 64];
        let response = transport.receive(&mut buf).unwrap();
        assert_eq!(response.status(), 0);
        assert_eq!(&buf[..response.len], b"/bus0");

        server.join().unwrap();
    }

    #[test]
    fn test_receive_keeps_status_of_oversize_reply() {
        use std::io::Write;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reply = OwHeader::new(-2, 20, 0, 0, 0).to_bytes().to_vec();
            reply.extend_from_slice(&[b'x'; 20]);
            stream.write_all(&reply).unwrap();
        });

        let mut transport = TcpTransport::dial(&addr.to_string(), Duration::from_secs(1)).unwrap();
        transport.set_io_timeout(Some(Duration::from_secs(5))).unwrap();

        let mut buf = [0u8; 16];
        let response = transport.receive(&mut buf).unwrap();
        assert_eq!(response.status(), -2);
        assert_eq!(response.len, 0);
        assert!(matches!(
            response.check_fits(buf.len()),
            Err(OwnetError::BufferTooSmall {
                declared: 20,
                capacity: 16
            })
        ));

        server.join().unwrap();
    }
}
