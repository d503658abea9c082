//! Frame codec: one header plus its declared payload.
//!
//! [`write_message`] and [`read_message`] work on any `io::Write` / `io::Read`,
//! so the same code drives a `TcpStream` in production and an in-memory
//! cursor in tests.

use std::io::{self, Read, Write};

use crate::error::{OwnetError, Result};
use crate::header::{OwHeader, HEADER_SIZE};

/// Writes `header` followed by `payload`.
///
/// The header's `payload` field must equal `payload.len()`.
/// Partial writes are retried until the whole frame is written.
///
/// # Errors
///
/// Returns `OwnetError::InvalidParameter` if the header's declared payload
/// length disagrees with `payload`, or `OwnetError::Io` on write failure.
///
/// # Example
///
/// ```
/// use ownet::{write_message, OwHeader};
///
/// let mut wire: Vec<u8> = Vec::new();
/// write_message(&mut wire, OwHeader::new(7, 2, 0x102, 4096, 0), b"/\0").unwrap();
/// assert_eq!(wire.len(), 24 + 2);
/// ```
pub fn write_message<W: Write>(writer: &mut W, header: OwHeader, payload: &[u8]) -> Result<()> {
    if header.payload_len() != payload.len() || header.payload < 0 {
        return Err(OwnetError::invalid_parameter(
            "payload",
            format!(
                "header declares {} bytes, payload has {}",
                header.payload,
                payload.len()
            ),
        ));
    }

    tracing::debug!(
        "-> version={} payload={} type={} flags={:#x} size={} offset={}",
        header.version,
        header.payload,
        header.msg_type,
        header.flags,
        header.size,
        header.offset
    );

    let mut frame = Vec::with_capacity(HEADER_SIZE + payload.len());
    frame.extend_from_slice(&header.to_bytes());
    frame.extend_from_slice(payload);

    writer.write_all(&frame)?;
    writer.flush()?;
    Ok(())
}

/// Reads one response frame.
///
/// Keep-alive frames are skipped. When the response declares a positive
/// payload that fits `buf`, exactly that many bytes are read into the front
/// of `buf` and the count is returned alongside the header.
///
/// A response with a negative status whose payload does not fit `buf` is
/// still returned: the payload is discarded and the count is zero, so the
/// caller sees the status rather than a capacity error.
///
/// # Errors
///
/// - `OwnetError::Framing` if a full header cannot be read
/// - `OwnetError::Io` if the payload read fails
/// - `OwnetError::BufferTooSmall` if a successful response's payload is
///   larger than `buf`; the payload is consumed and discarded first, so the
///   stream stays aligned
pub fn read_message<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<(OwHeader, usize)> {
    let (header, len) = read_frame(reader, buf)?;
    let declared = header.payload_len();
    if header.msg_type >= 0 && declared > len {
        return Err(OwnetError::buffer_too_small(declared, buf.len()));
    }
    Ok((header, len))
}

/// Reads one response frame, discarding a payload that does not fit `buf`.
///
/// A discarded payload shows as a header declaring more bytes than the
/// returned count (which is zero), leaving the status check to the caller.
pub(crate) fn read_frame<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<(OwHeader, usize)> {
    let header = loop {
        let header = read_header(reader)?;
        if header.is_ping() {
            tracing::debug!("<- keep-alive frame, waiting for response");
            continue;
        }
        break header;
    };

    tracing::debug!(
        "<- version={} payload={} type={} flags={:#x} size={} offset={}",
        header.version,
        header.payload,
        header.msg_type,
        header.flags,
        header.size,
        header.offset
    );

    let declared = header.payload_len();
    if declared == 0 {
        return Ok((header, 0));
    }

    if declared > buf.len() {
        tracing::warn!(
            "response payload of {} bytes exceeds buffer of {} bytes, discarding",
            declared,
            buf.len()
        );
        discard(reader, declared)?;
        return Ok((header, 0));
    }

    reader.read_exact(&mut buf[..declared])?;
    tracing::trace!("<- {} payload bytes", declared);
    Ok((header, declared))
}

fn read_header<R: Read>(reader: &mut R) -> Result<OwHeader> {
    let mut bytes = [0u8; HEADER_SIZE];
    reader.read_exact(&mut bytes).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => OwnetError::framing(format!(
            "connection closed before a full {}-byte header was received",
            HEADER_SIZE
        )),
        _ => OwnetError::framing(format!("header read failed: {}", e)),
    })?;
    OwHeader::from_bytes(&bytes)
}

fn discard<R: Read>(reader: &mut R, len: usize) -> Result<()> {
    let copied = io::copy(&mut reader.by_ref().take(len as u64), &mut io::sink())?;
    if copied < len as u64 {
        return Err(OwnetError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("payload truncated: expected {} bytes, got {}", len, copied),
        )));
    }
    Ok(())
}
