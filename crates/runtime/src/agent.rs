//! Host-side serve loop for the remote execution channel.
//!
//! The SSH executor starts `dockhand agent` on the far end and speaks the
//! frame protocol over the child's stdio. Each iteration reads one request
//! frame, resolves it through the dispatch catalogue, and writes one
//! response frame; a clean EOF on the input ends the loop.

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, warn};

use dockhand_protocol::{CallRequest, CallResponse, FrameError, RemoteFault, fault_kind};
use dockhand_registry::ProjectRegistry;

use crate::dispatch::dispatch;
use crate::error::TransportError;
use crate::transport::FramedPipe;

/// Serve requests from `reader`, writing responses to `writer`, until EOF.
pub async fn serve<R, W>(
	registry: &ProjectRegistry,
	reader: R,
	writer: W,
) -> Result<(), TransportError>
where
	R: AsyncRead + Unpin,
	W: AsyncWrite + Unpin,
{
	let mut pipe = FramedPipe::new(reader, writer);
	loop {
		let req: CallRequest = match pipe.recv().await {
			Ok(Some(req)) => req,
			Ok(None) => {
				debug!(target = "dockhand.agent", "peer closed the channel");
				return Ok(());
			}
			// An unparsable frame still gets a response so the caller sees
			// a fault rather than a dead channel, but the stream cannot be
			// trusted past this point.
			Err(TransportError::Frame(FrameError::Json(err))) => {
				warn!(target = "dockhand.agent", error = %err, "malformed request frame");
				let fault = RemoteFault::new(fault_kind::SERIALIZATION, err.to_string());
				pipe.send(&CallResponse::fault(fault)).await?;
				return Ok(());
			}
			Err(err) => return Err(err),
		};

		let resp = dispatch(registry, &req);
		pipe.send(&resp).await?;
	}
}

/// Serve over this process's own stdin/stdout.
pub async fn serve_stdio(registry: &ProjectRegistry) -> Result<(), TransportError> {
	serve(registry, tokio::io::stdin(), tokio::io::stdout()).await
}

#[cfg(test)]
mod tests {
	use serde_json::{Value, json};
	use tempfile::TempDir;
	use tokio::io::{AsyncWriteExt, duplex, split};

	use super::*;

	#[tokio::test]
	async fn serves_requests_until_eof() {
		let temp = TempDir::new().unwrap();
		let registry = ProjectRegistry::new(temp.path());

		let (client_end, agent_end) = duplex(4096);
		let (agent_read, agent_write) = split(agent_end);
		let server =
			tokio::spawn(async move { serve(&registry, agent_read, agent_write).await });

		let (client_read, client_write) = split(client_end);
		let mut pipe = FramedPipe::new(client_read, client_write);

		pipe.send(&CallRequest::new("projects.new_project", vec![json!("alpha")]))
			.await
			.unwrap();
		let resp: CallResponse = pipe.recv().await.unwrap().unwrap();
		assert_eq!(resp.into_result().unwrap(), Value::Null);

		pipe.send(&CallRequest::new("projects.list_projects", vec![]))
			.await
			.unwrap();
		let resp: CallResponse = pipe.recv().await.unwrap().unwrap();
		assert_eq!(resp.into_result().unwrap(), json!(["alpha"]));

		pipe.shutdown().await.unwrap();
		server.await.unwrap().unwrap();
	}

	#[tokio::test]
	async fn malformed_frame_gets_a_serialization_fault() {
		let temp = TempDir::new().unwrap();
		let registry = ProjectRegistry::new(temp.path());

		let (client_end, agent_end) = duplex(1024);
		let (agent_read, agent_write) = split(agent_end);
		let server =
			tokio::spawn(async move { serve(&registry, agent_read, agent_write).await });

		let (client_read, mut client_write) = split(client_end);

		// Valid frame envelope, invalid JSON payload.
		let garbage = b"not json at all";
		client_write
			.write_all(&(garbage.len() as u32).to_le_bytes())
			.await
			.unwrap();
		client_write.write_all(garbage).await.unwrap();
		client_write.flush().await.unwrap();

		let mut pipe = FramedPipe::new(client_read, client_write);
		let resp: CallResponse = pipe.recv().await.unwrap().unwrap();
		let fault = resp.into_result().unwrap_err();
		assert_eq!(fault.kind, fault_kind::SERIALIZATION);

		server.await.unwrap().unwrap();
	}
}
