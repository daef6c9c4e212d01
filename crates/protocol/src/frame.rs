//! Length-prefixed JSON framing.
//!
//! Every message on the channel is written as a 4-byte little-endian length
//! followed by the JSON payload. Both ends use the same helpers, so the
//! framing stays symmetric by construction.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Number of bytes in the length prefix.
pub const LEN_PREFIX: usize = 4;

/// Frames larger than this are rejected rather than buffered.
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("frame too large: {0} bytes")]
    TooLarge(usize),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Encode `msg` as `[len (4 bytes LE)][JSON bytes]`.
pub fn encode_frame<T: Serialize>(msg: &T) -> Result<Vec<u8>, FrameError> {
    let payload = serde_json::to_vec(msg)?;
    if payload.len() > MAX_FRAME_LEN {
        return Err(FrameError::TooLarge(payload.len()));
    }
    let mut frame = Vec::with_capacity(LEN_PREFIX + payload.len());
    frame.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    frame.extend_from_slice(&payload);
    Ok(frame)
}

/// Decode the payload length from a frame header.
pub fn payload_len(header: [u8; LEN_PREFIX]) -> Result<usize, FrameError> {
    let len = u32::from_le_bytes(header) as usize;
    if len > MAX_FRAME_LEN {
        return Err(FrameError::TooLarge(len));
    }
    Ok(len)
}

/// Decode a frame payload (the bytes after the length prefix).
pub fn decode_payload<T: DeserializeOwned>(payload: &[u8]) -> Result<T, FrameError> {
    Ok(serde_json::from_slice(payload)?)
}
