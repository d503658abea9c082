//! OWNet message header.
//!
//! Every request and every response starts with the same fixed 24-byte header:
//! six signed 32-bit integers, big-endian.
//!
//! | Offset | Field | Request | Response |
//! |--------|-------|---------|----------|
//! | 0 | version | protocol version (0) | unused |
//! | 4 | payload | bytes following the header | bytes following the header |
//! | 8 | type | verb (see [`MessageType`](crate::MessageType)) | status, `< 0` is an error |
//! | 12 | flags | client format flags (`0x102`) | unused |
//! | 16 | size | requested buffer size / write data size | unused |
//! | 20 | offset | byte offset for read/write | unused |
//!
//! # Example
//!
//! ```
//! use ownet::{OwHeader, HEADER_SIZE};
//!
//! let header = OwHeader::new(2, 23, 0x102, 16, 0);
//! let bytes = header.to_bytes();
//! assert_eq!(bytes.len(), HEADER_SIZE);
//! assert_eq!(OwHeader::from_bytes(&bytes).unwrap(), header);
//! ```

use crate::error::{OwnetError, Result};

/// Header size in bytes (six `i32` fields).
pub const HEADER_SIZE: usize = 24;

/// The only protocol version this client speaks.
pub const PROTOCOL_VERSION: i32 = 0;

/// Flag word sent with every request.
///
/// `0x100` identifies an OWNet client, `0x002` asks for bus entries in
/// listings. The temperature scale and device format bits are left at zero,
/// which gives Celsius and the `XX.YYYYYYYYYYYY` names [`DeviceId`](crate::DeviceId)
/// expects.
pub const DEFAULT_FLAGS: i32 = 0x102;

/// Payload value owserver uses for keep-alive frames sent while a slow
/// request is still being served.
pub const PING_PAYLOAD: i32 = -1;

/// OWNet message header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OwHeader {
    /// Protocol version.
    pub version: i32,
    /// Exact length of the data segment following the header.
    pub payload: i32,
    /// Verb on a request, status on a response.
    pub msg_type: i32,
    /// Format/capability flags.
    pub flags: i32,
    /// Requested buffer size (read) or data size (write).
    pub size: i32,
    /// Byte offset for read/write.
    pub offset: i32,
}

impl OwHeader {
    /// Creates a request header with the current protocol version.
    pub fn new(msg_type: i32, payload: i32, flags: i32, size: i32, offset: i32) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            payload,
            msg_type,
            flags,
            size,
            offset,
        }
    }

    /// Serializes the header to its big-endian wire form.
    pub fn to_bytes(self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        let fields = [
            self.version,
            self.payload,
            self.msg_type,
            self.flags,
            self.size,
            self.offset,
        ];
        for (chunk, field) in buf.chunks_exact_mut(4).zip(fields) {
            chunk.copy_from_slice(&field.to_be_bytes());
        }
        buf
    }

    /// Parses a header from bytes.
    ///
    /// # Errors
    ///
    /// Returns `OwnetError::Framing` if the slice is shorter than [`HEADER_SIZE`].
    ///
    /// # Example
    ///
    /// ```
    /// use ownet::OwHeader;
    ///
    /// let mut bytes = [0u8; 24];
    /// bytes[8..12].copy_from_slice(&(-1i32).to_be_bytes());
    ///
    /// let header = OwHeader::from_bytes(&bytes).unwrap();
    /// assert_eq!(header.msg_type, -1);
    /// ```
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(OwnetError::framing(format!(
                "header too short: expected {} bytes, got {}",
                HEADER_SIZE,
                data.len()
            )));
        }

        let field = |i: usize| {
            let start = i * 4;
            i32::from_be_bytes([data[start], data[start + 1], data[start + 2], data[start + 3]])
        };

        Ok(Self {
            version: field(0),
            payload: field(1),
            msg_type: field(2),
            flags: field(3),
            size: field(4),
            offset: field(5),
        })
    }

    /// Returns whether this is an owserver keep-alive frame.
    pub fn is_ping(self) -> bool {
        self.payload == PING_PAYLOAD
    }

    /// Declared payload length, with zero and negative values mapped to 0.
    pub fn payload_len(self) -> usize {
        usize::try_from(self.payload).unwrap_or(0)
    }
}
