//! Native messaging framing: a 4-byte native-endian length, then UTF-8 JSON

use std::io::{self, Read, Write};

use thiserror::Error;

/// Largest message the browser will send to a host
pub const MAX_INBOUND: usize = 64 * 1024 * 1024;

/// Largest message the browser accepts from a host
pub const MAX_OUTBOUND: usize = 1024 * 1024;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Message of {0} bytes exceeds the {1} byte limit")]
    TooLarge(usize, usize),
}

/// Read one framed message; `None` on clean EOF or a zero-length frame
pub fn read_message<R: Read>(reader: &mut R) -> Result<Option<Vec<u8>>, FrameError> {
    let mut length_bytes = [0u8; 4];

    match reader.read_exact(&mut length_bytes) {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }

    let length = u32::from_ne_bytes(length_bytes) as usize;
    if length == 0 {
        return Ok(None);
    }
    if length > MAX_INBOUND {
        return Err(FrameError::TooLarge(length, MAX_INBOUND));
    }

    let mut message = vec![0u8; length];
    reader.read_exact(&mut message)?;

    Ok(Some(message))
}

/// Write one framed message and flush
pub fn write_message<W: Write>(writer: &mut W, message: &[u8]) -> Result<(), FrameError> {
    if message.len() > MAX_OUTBOUND {
        return Err(FrameError::TooLarge(message.len(), MAX_OUTBOUND));
    }

    let length_bytes = (message.len() as u32).to_ne_bytes();
    writer.write_all(&length_bytes)?;
    writer.write_all(message)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn frame(payload: &[u8]) -> Vec<u8> {
        let mut bytes = (payload.len() as u32).to_ne_bytes().to_vec();
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn test_reads_consecutive_frames() {
        let mut input = frame(b"{\"a\":1}");
        input.extend(frame(b"{}"));
        let mut reader = Cursor::new(input);

        assert_eq!(read_message(&mut reader).unwrap().unwrap(), b"{\"a\":1}");
        assert_eq!(read_message(&mut reader).unwrap().unwrap(), b"{}");
        assert!(read_message(&mut reader).unwrap().is_none());
    }

    #[test]
    fn test_zero_length_ends_stream() {
        let mut reader = Cursor::new(0u32.to_ne_bytes().to_vec());
        assert!(read_message(&mut reader).unwrap().is_none());
    }

    #[test]
    fn test_truncated_body_is_error() {
        let mut input = 10u32.to_ne_bytes().to_vec();
        input.extend_from_slice(b"abc");
        let mut reader = Cursor::new(input);
        assert!(matches!(read_message(&mut reader), Err(FrameError::Io(_))));
    }

    #[test]
    fn test_oversized_inbound_rejected() {
        let length = (MAX_INBOUND as u32) + 1;
        let mut reader = Cursor::new(length.to_ne_bytes().to_vec());
        assert!(matches!(read_message(&mut reader), Err(FrameError::TooLarge(_, MAX_INBOUND))));
    }

    #[test]
    fn test_write_frames_message() {
        let mut out = Vec::new();
        write_message(&mut out, b"{\"status\":\"ok\"}").unwrap();
        assert_eq!(out, frame(b"{\"status\":\"ok\"}"));
    }

    #[test]
    fn test_oversized_outbound_rejected() {
        let mut out = Vec::new();
        let big = vec![b'x'; MAX_OUTBOUND + 1];
        assert!(matches!(write_message(&mut out, &big), Err(FrameError::TooLarge(_, MAX_OUTBOUND))));
        assert!(out.is_empty());
    }
}
