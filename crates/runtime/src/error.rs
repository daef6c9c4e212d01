use dockhand_protocol::{FrameError, RemoteFault};
use thiserror::Error;

/// Errors out of a [`crate::RemoteExecutor`] call.
///
/// `Fault` is the reconstructed remote error (or, for the local executor,
/// the registry error rendered the same way), so matching on the fault kind
/// behaves identically for both variants. `Transport` and `Serialization`
/// are the channel's own failure modes and are never retried here.
#[derive(Debug, Error)]
pub enum ExecutorError {
	#[error("transport failure: {0}")]
	Transport(String),

	#[error(transparent)]
	Serialization(#[from] serde_json::Error),

	#[error(transparent)]
	Fault(#[from] RemoteFault),
}

impl ExecutorError {
	/// The fault kind name, if this is a remote-side fault.
	pub fn fault_kind(&self) -> Option<&str> {
		match self {
			ExecutorError::Fault(fault) => Some(&fault.kind),
			_ => None,
		}
	}
}

/// Errors on the framed byte channel itself.
#[derive(Debug, Error)]
pub enum TransportError {
	#[error("failed to read length prefix: {0}")]
	ReadPrefix(std::io::Error),

	#[error("failed to read frame payload: {0}")]
	ReadPayload(std::io::Error),

	#[error("failed to write frame: {0}")]
	Write(std::io::Error),

	#[error(transparent)]
	Frame(#[from] FrameError),
}

impl From<TransportError> for ExecutorError {
	fn from(err: TransportError) -> Self {
		match err {
			TransportError::Frame(FrameError::Json(err)) => ExecutorError::Serialization(err),
			other => ExecutorError::Transport(other.to_string()),
		}
	}
}
