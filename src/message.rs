//! OWNet message types and request construction.
//!
//! A request is a header followed by a payload. For every verb this client
//! sends, the payload starts with the NUL-terminated owserver path; a write
//! request appends the raw data after the terminator.
//!
//! # Request Types
//!
//! - [`Request::dir`] - List a directory (`DirAll`)
//! - [`Request::read`] - Read a byte range of a file
//! - [`Request::write`] - Write a byte range of a file
//! - [`Request::presence`] - Check whether a path exists
//!
//! # Example
//!
//! ```
//! use ownet::{MessageType, Request, DEFAULT_FLAGS};
//!
//! let req = Request::write("/3A.BEE71B000000/PIO.B", 0, b"1", DEFAULT_FLAGS).unwrap();
//! assert_eq!(req.header().msg_type, MessageType::Write.code());
//! assert_eq!(req.payload(), b"/3A.BEE71B000000/PIO.B\x001");
//! ```

use crate::error::{OwnetError, Result};
use crate::header::{OwHeader, HEADER_SIZE};

/// Size of the scratch buffer requested for directory listings.
pub const DIR_BUFFER_SIZE: usize = 4096;

/// OWNet message types (verbs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// Error / no-op reply marker.
    Error,
    /// No operation.
    Nop,
    /// Read a file.
    Read,
    /// Write a file.
    Write,
    /// List a directory, one reply per entry.
    Dir,
    /// Size of a file.
    Size,
    /// Check presence of a path.
    Presence,
    /// List a directory in a single comma-separated reply.
    DirAll,
    /// Read a file or list a directory, whichever the path is.
    Get,
    /// `DirAll` with a trailing `/` on directory entries.
    DirAllSlash,
    /// `Get` with a trailing `/` on directory entries.
    GetSlash,
}

impl MessageType {
    /// Returns the wire code of this message type.
    pub fn code(self) -> i32 {
        match self {
            MessageType::Error => 0,
            MessageType::Nop => 1,
            MessageType::Read => 2,
            MessageType::Write => 3,
            MessageType::Dir => 4,
            MessageType::Size => 5,
            MessageType::Presence => 6,
            MessageType::DirAll => 7,
            MessageType::Get => 8,
            MessageType::DirAllSlash => 9,
            MessageType::GetSlash => 10,
        }
    }

    /// Looks up a message type by wire code.
    ///
    /// # Example
    ///
    /// ```
    /// use ownet::MessageType;
    ///
    /// assert_eq!(MessageType::from_code(7), Some(MessageType::DirAll));
    /// assert_eq!(MessageType::from_code(-1), None);
    /// ```
    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            0 => MessageType::Error,
            1 => MessageType::Nop,
            2 => MessageType::Read,
            3 => MessageType::Write,
            4 => MessageType::Dir,
            5 => MessageType::Size,
            6 => MessageType::Presence,
            7 => MessageType::DirAll,
            8 => MessageType::Get,
            9 => MessageType::DirAllSlash,
            10 => MessageType::GetSlash,
            _ => return None,
        })
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MessageType::Error => "ERROR",
            MessageType::Nop => "NOP",
            MessageType::Read => "READ",
            MessageType::Write => "WRITE",
            MessageType::Dir => "DIR",
            MessageType::Size => "SIZE",
            MessageType::Presence => "PRESENCE",
            MessageType::DirAll => "DIRALL",
            MessageType::Get => "GET",
            MessageType::DirAllSlash => "DIRALLSLASH",
            MessageType::GetSlash => "GETSLASH",
        };
        f.write_str(name)
    }
}

/// A request ready to be framed: header plus payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    header: OwHeader,
    payload: Vec<u8>,
}

impl Request {
    /// Builds a directory listing request for `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the path contains a NUL byte or is too long.
    ///
    /// # Example
    ///
    /// ```
    /// use ownet::{Request, DEFAULT_FLAGS, DIR_BUFFER_SIZE};
    ///
    /// let req = Request::dir("/", DEFAULT_FLAGS).unwrap();
    /// assert_eq!(req.header().payload, 2);
    /// assert_eq!(req.header().size, DIR_BUFFER_SIZE as i32);
    /// ```
    pub fn dir(path: &str, flags: i32) -> Result<Self> {
        Self::build(MessageType::DirAll, path, &[], flags, DIR_BUFFER_SIZE, 0)
    }

    /// Builds a read request for up to `size` bytes of `path` at `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if the path contains a NUL byte, or if `size` or
    /// `offset` does not fit the header's `i32` fields.
    pub fn read(path: &str, offset: u32, size: usize, flags: i32) -> Result<Self> {
        Self::build(MessageType::Read, path, &[], flags, size, offset)
    }

    /// Builds a write request storing `data` into `path` at `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if the path contains a NUL byte, or if the payload
    /// or `offset` does not fit the header's `i32` fields.
    pub fn write(path: &str, offset: u32, data: &[u8], flags: i32) -> Result<Self> {
        Self::build(MessageType::Write, path, data, flags, data.len(), offset)
    }

    /// Builds a presence check for `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the path contains a NUL byte or is too long.
    pub fn presence(path: &str, flags: i32) -> Result<Self> {
        Self::build(MessageType::Presence, path, &[], flags, 0, 0)
    }

    fn build(
        msg_type: MessageType,
        path: &str,
        data: &[u8],
        flags: i32,
        size: usize,
        offset: u32,
    ) -> Result<Self> {
        validate_path(path)?;

        let mut payload = Vec::with_capacity(path.len() + 1 + data.len());
        payload.extend_from_slice(path.as_bytes());
        payload.push(0);
        payload.extend_from_slice(data);

        let header = OwHeader::new(
            msg_type.code(),
            to_i32("payload", payload.len())?,
            flags,
            to_i32("size", size)?,
            to_i32("offset", offset as usize)?,
        );

        Ok(Self { header, payload })
    }

    /// Returns the request header.
    pub fn header(&self) -> OwHeader {
        self.header
    }

    /// Returns the request payload (NUL-terminated path, then data).
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Returns the message type of this request.
    pub fn message_type(&self) -> Option<MessageType> {
        MessageType::from_code(self.header.msg_type)
    }

    /// Serializes header and payload into a single frame.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_SIZE + self.payload.len());
        bytes.extend_from_slice(&self.header.to_bytes());
        bytes.extend_from_slice(&self.payload);
        bytes
    }
}

fn validate_path(path: &str) -> Result<()> {
    if path.as_bytes().contains(&0) {
        return Err(OwnetError::invalid_parameter(
            "path",
            "must not contain a NUL byte",
        ));
    }
    Ok(())
}

fn to_i32(parameter: &str, value: usize) -> Result<i32> {
    i32::try_from(value).map_err(|_| {
        OwnetError::invalid_parameter(parameter, format!("{} exceeds i32::MAX", value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::DEFAULT_FLAGS;

    const ATTR: &str = "/3A.BEE71B000000/PIO.B";

    #[test]
    fn test_message_type_codes() {
        assert_eq!(MessageType::Error.code(), 0);
        assert_eq!(MessageType::Read.code(), 2);
        assert_eq!(MessageType::Write.code(), 3);
        assert_eq!(MessageType::Presence.code(), 6);
        assert_eq!(MessageType::DirAll.code(), 7);
        assert_eq!(MessageType::GetSlash.code(), 10);
    }

    #[test]
    fn test_message_type_from_code() {
        for code in 0..=10 {
            let msg_type = MessageType::from_code(code).unwrap();
            assert_eq!(msg_type.code(), code);
        }
        assert_eq!(MessageType::from_code(11), None);
        assert_eq!(MessageType::from_code(-1), None);
    }

    #[test]
    fn test_message_type_display() {
        assert_eq!(MessageType::DirAll.to_string(), "DIRALL");
        assert_eq!(MessageType::Read.to_string(), "READ");
    }

    #[test]
    fn test_dir_request() {
        let req = Request::dir("/", DEFAULT_FLAGS).unwrap();
        assert_eq!(req.header(), OwHeader::new(7, 2, 0x102, 4096, 0));
        assert_eq!(req.payload(), b"/\0");
        assert_eq!(req.message_type(), Some(MessageType::DirAll));
    }

    #[test]
    fn test_read_request() {
        let req = Request::read(ATTR, 3, 16, DEFAULT_FLAGS).unwrap();
        let header = req.header();
        assert_eq!(header.msg_type, 2);
        assert_eq!(header.payload, ATTR.len() as i32 + 1);
        assert_eq!(header.size, 16);
        assert_eq!(header.offset, 3);
        assert_eq!(req.payload().last(), Some(&0));
    }

    #[test]
    fn test_write_request_payload() {
        let req = Request::write(ATTR, 0, b"1", DEFAULT_FLAGS).unwrap();
        let header = req.header();
        assert_eq!(header.msg_type, 3);
        assert_eq!(header.payload, (ATTR.len() + 1 + 1) as i32);
        assert_eq!(header.size, 1);

        let mut expected = ATTR.as_bytes().to_vec();
        expected.push(0);
        expected.push(b'1');
        assert_eq!(req.payload(), expected.as_slice());
    }

    #[test]
    fn test_write_request_empty_data() {
        let req = Request::write("/a", 0, &[], DEFAULT_FLAGS).unwrap();
        assert_eq!(req.header().payload, 3);
        assert_eq!(req.header().size, 0);
        assert_eq!(req.payload(), b"/a\0");
    }

    #[test]
    fn test_presence_request() {
        let req = Request::presence("/10.67C6697351FF", DEFAULT_FLAGS).unwrap();
        assert_eq!(req.header().msg_type, 6);
        assert_eq!(req.header().size, 0);
    }

    #[test]
    fn test_request_rejects_nul_in_path() {
        let result = Request::read("/bad\0path", 0, 16, DEFAULT_FLAGS);
        assert!(matches!(result, Err(OwnetError::InvalidParameter { .. })));
    }

    #[test]
    fn test_request_rejects_large_offset() {
        let result = Request::read("/a", u32::MAX, 16, DEFAULT_FLAGS);
        assert!(matches!(
            result,
            Err(OwnetError::InvalidParameter { ref parameter, .. }) if parameter == "offset"
        ));
    }

    #[test]
    fn test_request_to_bytes() {
        let req = Request::dir("/", 0).unwrap();
        assert_eq!(
            hex::encode(req.to_bytes()),
            "000000000000000200000007000000000000100000000000".to_string() + "2f00"
        );
    }
}
