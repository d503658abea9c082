//! Error types for the OWNet client.

use std::io;
use thiserror::Error;

/// Result type alias for OWNet operations.
pub type Result<T> = std::result::Result<T, OwnetError>;

/// Errors that can occur while talking to owserver.
#[derive(Debug, Error)]
pub enum OwnetError {
    /// The TCP connection to owserver could not be established.
    #[error("Connection to {address} failed: {source}")]
    Connection {
        /// Address that was dialed.
        address: String,
        /// Underlying dial error (refused, unreachable, timed out, ...).
        #[source]
        source: io::Error,
    },

    /// A message header could not be read or decoded.
    #[error("Framing error: {reason}")]
    Framing {
        /// Description of the framing problem.
        reason: String,
    },

    /// I/O error on an established connection.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// owserver answered with an error status.
    ///
    /// The code is passed through as received; owserver uses negated
    /// errno values.
    #[error("owserver returned error {code}")]
    Protocol {
        /// Raw status code from the response header.
        code: i32,
    },

    /// The response carried more data than the caller's buffer can hold.
    ///
    /// The excess payload has already been consumed from the connection.
    #[error("Buffer too small: response declares {declared} bytes, buffer holds {capacity}")]
    BufferTooSmall {
        /// Payload length declared by the response header.
        declared: usize,
        /// Capacity of the caller's buffer.
        capacity: usize,
    },

    /// Invalid parameter provided.
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// Name of the invalid parameter.
        parameter: String,
        /// Description of why the parameter is invalid.
        reason: String,
    },
}

impl OwnetError {
    /// Creates a new `Connection` error.
    pub fn connection(address: impl Into<String>, source: io::Error) -> Self {
        Self::Connection {
            address: address.into(),
            source,
        }
    }

    /// Creates a new `Framing` error.
    ///
    /// # Example
    ///
    /// ```
    /// use ownet::OwnetError;
    ///
    /// let err = OwnetError::framing("header too short");
    /// ```
    pub fn framing(reason: impl Into<String>) -> Self {
        Self::Framing {
            reason: reason.into(),
        }
    }

    /// Creates a new `Protocol` error from a response status code.
    ///
    /// # Example
    ///
    /// ```
    /// use ownet::OwnetError;
    ///
    /// let err = OwnetError::protocol(-2);
    /// assert_eq!(err.protocol_code(), Some(-2));
    /// ```
    pub fn protocol(code: i32) -> Self {
        Self::Protocol { code }
    }

    /// Creates a new `BufferTooSmall` error.
    pub fn buffer_too_small(declared: usize, capacity: usize) -> Self {
        Self::BufferTooSmall { declared, capacity }
    }

    /// Creates a new `InvalidParameter` error.
    ///
    /// # Example
    ///
    /// ```
    /// use ownet::OwnetError;
    ///
    /// let err = OwnetError::invalid_parameter("path", "contains a NUL byte");
    /// ```
    pub fn invalid_parameter(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Returns the owserver status code if this is a `Protocol` error.
    pub fn protocol_code(&self) -> Option<i32> {
        match self {
            Self::Protocol { code } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_display() {
        let err = OwnetError::protocol(-1);
        assert_eq!(err.to_string(), "owserver returned error -1");
    }

    #[test]
    fn test_protocol_code() {
        assert_eq!(OwnetError::protocol(-42).protocol_code(), Some(-42));
        assert_eq!(OwnetError::framing("x").protocol_code(), None);
    }

    #[test]
    fn test_connection_error_display() {
        let source = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
        let err = OwnetError::connection("127.0.0.1:4304", source);
        assert_eq!(err.to_string(), "Connection to 127.0.0.1:4304 failed: refused");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_buffer_too_small_display() {
        let err = OwnetError::buffer_too_small(32, 16);
        assert_eq!(
            err.to_string(),
            "Buffer too small: response declares 32 bytes, buffer holds 16"
        );
    }

    #[test]
    fn test_invalid_parameter_display() {
        let err = OwnetError::invalid_parameter("offset", "exceeds i32::MAX");
        assert_eq!(
            err.to_string(),
            "Invalid parameter 'offset': exceeds i32::MAX"
        );
    }

    #[test]
    fn test_io_error_from() {
        let err: OwnetError = io::Error::new(io::ErrorKind::UnexpectedEof, "eof").into();
        assert!(matches!(err, OwnetError::Io(_)));
    }
}
