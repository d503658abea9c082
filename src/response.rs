//! Response status checks.
//!
//! On a response the header's type field is a status code. Zero or positive
//! means success, negative is an error code chosen by owserver (a negated
//! errno). Directory listings are stricter: any nonzero status is an error.
//!
//! # Example
//!
//! ```
//! use ownet::{OwHeader, OwResponse};
//!
//! let ok = OwResponse::new(OwHeader::new(2, 1, 0, 0, 0), 1);
//! assert!(ok.check_error().is_ok());
//!
//! let failed = OwResponse::new(OwHeader::new(-1, 0, 0, 0, 0), 0);
//! assert_eq!(failed.check_error().unwrap_err().protocol_code(), Some(-1));
//! ```

use crate::error::{OwnetError, Result};
use crate::header::OwHeader;

/// A received response: its header and how many payload bytes were stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwResponse {
    /// Response header.
    pub header: OwHeader,
    /// Number of payload bytes copied into the caller's buffer.
    pub len: usize,
}

impl OwResponse {
    /// Wraps a decoded header and the number of payload bytes read.
    pub fn new(header: OwHeader, len: usize) -> Self {
        Self { header, len }
    }

    /// Returns the status code (the header's type field).
    pub fn status(&self) -> i32 {
        self.header.msg_type
    }

    /// Returns whether the status indicates success (`>= 0`).
    pub fn is_success(&self) -> bool {
        self.status() >= 0
    }

    /// Checks the status of a read, write or presence response.
    ///
    /// # Errors
    ///
    /// Returns `OwnetError::Protocol` if the status is negative.
    pub fn check_error(&self) -> Result<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(OwnetError::protocol(self.status()))
        }
    }

    /// Checks that the payload fitted the caller's `capacity`-byte buffer.
    ///
    /// Call after the status check, so an error status takes precedence.
    ///
    /// # Errors
    ///
    /// Returns `OwnetError::BufferTooSmall` if the header declared more
    /// payload than was stored.
    pub fn check_fits(&self, capacity: usize) -> Result<()> {
        let declared = self.header.payload_len();
        if declared > self.len {
            Err(OwnetError::buffer_too_small(declared, capacity))
        } else {
            Ok(())
        }
    }

    /// Checks the status of a directory listing response.
    ///
    /// # Errors
    ///
    /// Returns `OwnetError::Protocol` if the status is nonzero.
    pub fn check_dir_status(&self) -> Result<()> {
        match self.status() {
            0 => Ok(()),
            code => Err(OwnetError::protocol(code)),
        }
    }
}
