//! Framed message pipe over a pair of byte streams.
//!
//! Carries one serde-serializable message per frame, each written as a
//! 4-byte little-endian length prefix followed by the JSON payload. Both
//! the executor side (over the agent child's stdio) and the agent side
//! (over its own stdin/stdout) use this same type, which keeps the framing
//! symmetric by construction.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use dockhand_protocol::frame::{self, LEN_PREFIX};

use crate::error::TransportError;

pub struct FramedPipe<R, W> {
	reader: R,
	writer: W,
}

impl<R, W> FramedPipe<R, W>
where
	R: AsyncRead + Unpin,
	W: AsyncWrite + Unpin,
{
	pub fn new(reader: R, writer: W) -> Self {
		Self { reader, writer }
	}

	/// Write one message as a single frame and flush it.
	pub async fn send<T: Serialize>(&mut self, msg: &T) -> Result<(), TransportError> {
		let bytes = frame::encode_frame(msg)?;
		self.writer
			.write_all(&bytes)
			.await
			.map_err(TransportError::Write)?;
		self.writer.flush().await.map_err(TransportError::Write)?;
		Ok(())
	}

	/// Read one message. Returns `Ok(None)` on a clean EOF between frames.
	pub async fn recv<T: DeserializeOwned>(&mut self) -> Result<Option<T>, TransportError> {
		let mut prefix = [0u8; LEN_PREFIX];

		// Read the first prefix byte separately so EOF between frames is
		// distinguishable from a truncated frame.
		match self.reader.read(&mut prefix[..1]).await {
			Ok(0) => return Ok(None),
			Ok(_) => {}
			Err(err) => return Err(TransportError::ReadPrefix(err)),
		}
		self.reader
			.read_exact(&mut prefix[1..])
			.await
			.map_err(TransportError::ReadPrefix)?;

		let len = frame::payload_len(prefix)?;
		let mut payload = vec![0u8; len];
		self.reader
			.read_exact(&mut payload)
			.await
			.map_err(TransportError::ReadPayload)?;

		Ok(Some(frame::decode_payload(&payload)?))
	}

	/// Consume the pipe, closing the write side.
	pub async fn shutdown(mut self) -> Result<(), TransportError> {
		self.writer.shutdown().await.map_err(TransportError::Write)
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;
	use tokio::io::{AsyncReadExt, AsyncWriteExt};

	use super::*;

	#[tokio::test]
	async fn send_writes_length_prefixed_json() {
		let (mut our_end, their_end) = tokio::io::duplex(1024);
		let (read_half, write_half) = tokio::io::split(their_end);
		let mut pipe = FramedPipe::new(read_half, write_half);

		let msg = json!({"target": "projects.list_projects", "args": []});
		pipe.send(&msg).await.unwrap();

		let mut len_buf = [0u8; 4];
		our_end.read_exact(&mut len_buf).await.unwrap();
		let len = u32::from_le_bytes(len_buf) as usize;
		let mut payload = vec![0u8; len];
		our_end.read_exact(&mut payload).await.unwrap();

		let received: serde_json::Value = serde_json::from_slice(&payload).unwrap();
		assert_eq!(received, msg);
	}

	#[tokio::test]
	async fn recv_reads_multiple_frames_in_sequence() {
		let (mut our_end, their_end) = tokio::io::duplex(4096);
		let (read_half, write_half) = tokio::io::split(their_end);
		let mut pipe = FramedPipe::new(read_half, write_half);

		let messages = vec![
			json!({"target": "first"}),
			json!({"target": "second"}),
			json!({"target": "third"}),
		];
		for msg in &messages {
			let bytes = serde_json::to_vec(msg).unwrap();
			our_end
				.write_all(&(bytes.len() as u32).to_le_bytes())
				.await
				.unwrap();
			our_end.write_all(&bytes).await.unwrap();
		}
		drop(our_end);

		for expected in &messages {
			let received: serde_json::Value = pipe.recv().await.unwrap().unwrap();
			assert_eq!(&received, expected);
		}
		assert!(pipe.recv::<serde_json::Value>().await.unwrap().is_none());
	}

	#[tokio::test]
	async fn recv_handles_large_frames() {
		let (mut our_end, their_end) = tokio::io::duplex(1024 * 1024);
		let (read_half, write_half) = tokio::io::split(their_end);
		let mut pipe = FramedPipe::new(read_half, write_half);

		let msg = json!({"args": ["x".repeat(100_000)]});
		let bytes = serde_json::to_vec(&msg).unwrap();
		assert!(bytes.len() > 32_768);

		let writer = tokio::spawn(async move {
			our_end
				.write_all(&(bytes.len() as u32).to_le_bytes())
				.await
				.unwrap();
			our_end.write_all(&bytes).await.unwrap();
			our_end
		});

		let received: serde_json::Value = pipe.recv().await.unwrap().unwrap();
		assert_eq!(received, msg);
		drop(writer.await.unwrap());
	}

	#[tokio::test]
	async fn truncated_prefix_is_an_error_not_eof() {
		let (mut our_end, their_end) = tokio::io::duplex(64);
		let (read_half, write_half) = tokio::io::split(their_end);
		let mut pipe = FramedPipe::new(read_half, write_half);

		our_end.write_all(&[0x01, 0x02]).await.unwrap();
		drop(our_end);

		let err = pipe.recv::<serde_json::Value>().await.unwrap_err();
		assert!(err.to_string().contains("length prefix"));
	}

	#[tokio::test]
	async fn truncated_payload_is_an_error() {
		let (mut our_end, their_end) = tokio::io::duplex(64);
		let (read_half, write_half) = tokio::io::split(their_end);
		let mut pipe = FramedPipe::new(read_half, write_half);

		our_end.write_all(&100u32.to_le_bytes()).await.unwrap();
		our_end.write_all(b"short").await.unwrap();
		drop(our_end);

		let err = pipe.recv::<serde_json::Value>().await.unwrap_err();
		assert!(err.to_string().contains("payload"));
	}

	#[tokio::test]
	async fn clean_eof_is_none() {
		let (our_end, their_end) = tokio::io::duplex(64);
		let (read_half, write_half) = tokio::io::split(their_end);
		let mut pipe = FramedPipe::new(read_half, write_half);

		drop(our_end);
		assert!(pipe.recv::<serde_json::Value>().await.unwrap().is_none());
	}
}
