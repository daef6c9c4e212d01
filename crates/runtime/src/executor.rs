//! The two interchangeable executor variants.
//!
//! A caller obtains an executor for the configured host and performs
//! registry operations through it; the operations run where the project
//! directories physically live. `LocalExecutor` resolves the call
//! in-process and is the reference for correctness; `SshExecutor` marshals
//! it across an SSH channel to a companion `dockhand agent` process and
//! reconstructs the result or the error. For the same target and arguments
//! the two are observationally equivalent: same success value, or a fault
//! with the same kind.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use serde_json::Value;
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::debug;

use dockhand_protocol::{CallRequest, CallResponse};
use dockhand_registry::ProjectRegistry;

use crate::config::RemoteConfig;
use crate::dispatch::dispatch;
use crate::error::{ExecutorError, TransportError};
use crate::transport::FramedPipe;

/// Capability to execute a named operation against a host.
///
/// One call at a time; the caller blocks until the result is back. No
/// retries live here - retry policy, if any, belongs to the caller.
#[async_trait]
pub trait RemoteExecutor: Send {
	/// Invoke `target` with `args`, returning the result value or the
	/// (possibly reconstructed) error.
	async fn call(&mut self, target: &str, args: Vec<Value>) -> Result<Value, ExecutorError>;

	/// Tear down whatever the executor holds. Must be called on every
	/// exit path; for the SSH variant this terminates the companion
	/// process.
	async fn close(&mut self) -> Result<(), ExecutorError>;
}

/// Executor for the configured host: in-process for the local machine,
/// SSH-channelled otherwise.
pub async fn new_executor(
	remote: &RemoteConfig,
	project_root: Option<PathBuf>,
) -> Result<Box<dyn RemoteExecutor>, ExecutorError> {
	if remote.is_local() {
		let root = project_root.unwrap_or_else(default_project_root);
		Ok(Box::new(LocalExecutor::new(ProjectRegistry::new(root))))
	} else {
		Ok(Box::new(SshExecutor::connect(remote, project_root).await?))
	}
}

fn default_project_root() -> PathBuf {
	dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// In-process variant: resolves the target against the dispatch catalogue
/// directly. Registry errors surface as faults carrying the error kind
/// name, exactly as they would after a round trip over the wire.
pub struct LocalExecutor {
	registry: ProjectRegistry,
}

impl LocalExecutor {
	pub fn new(registry: ProjectRegistry) -> Self {
		Self { registry }
	}

	pub fn registry(&self) -> &ProjectRegistry {
		&self.registry
	}
}

#[async_trait]
impl RemoteExecutor for LocalExecutor {
	async fn call(&mut self, target: &str, args: Vec<Value>) -> Result<Value, ExecutorError> {
		let req = CallRequest::new(target, args);
		Ok(dispatch(&self.registry, &req).into_result()?)
	}

	async fn close(&mut self) -> Result<(), ExecutorError> {
		Ok(())
	}
}

/// Remote variant: one `ssh` session per executor, running the companion
/// agent on the far end. Each call writes one request frame to the child's
/// stdin and blocks for one response frame from its stdout.
pub struct SshExecutor {
	child: Child,
	pipe: Option<FramedPipe<ChildStdout, ChildStdin>>,
	destination: String,
}

impl SshExecutor {
	/// Open the SSH session and start the companion agent.
	pub async fn connect(
		remote: &RemoteConfig,
		project_root: Option<PathBuf>,
	) -> Result<Self, ExecutorError> {
		let mut cmd = Command::new("ssh");
		cmd.arg("-T").arg(remote.destination());
		cmd.arg("dockhand").arg("agent");
		if let Some(root) = &project_root {
			cmd.arg("--root").arg(root);
		}
		Self::spawn(cmd, remote.destination()).await
	}

	async fn spawn(mut cmd: Command, destination: String) -> Result<Self, ExecutorError> {
		cmd.stdin(Stdio::piped())
			.stdout(Stdio::piped())
			.kill_on_drop(true);
		let mut child = cmd
			.spawn()
			.map_err(|err| ExecutorError::Transport(format!("failed to spawn ssh: {err}")))?;

		let stdin = child
			.stdin
			.take()
			.ok_or_else(|| ExecutorError::Transport("child stdin unavailable".into()))?;
		let stdout = child
			.stdout
			.take()
			.ok_or_else(|| ExecutorError::Transport("child stdout unavailable".into()))?;

		debug!(target = "dockhand.executor", %destination, "companion agent started");
		Ok(Self {
			child,
			pipe: Some(FramedPipe::new(stdout, stdin)),
			destination,
		})
	}

	/// The exit the companion made when the channel went quiet.
	async fn channel_lost(&mut self) -> ExecutorError {
		match self.child.wait().await {
			Ok(status) => ExecutorError::Transport(format!(
				"agent on {} exited ({status}) without a response",
				self.destination
			)),
			Err(err) => ExecutorError::Transport(format!(
				"agent on {} lost: {err}",
				self.destination
			)),
		}
	}
}

#[async_trait]
impl RemoteExecutor for SshExecutor {
	async fn call(&mut self, target: &str, args: Vec<Value>) -> Result<Value, ExecutorError> {
		let req = CallRequest::new(target, args);
		let exchanged = match self.pipe.as_mut() {
			Some(pipe) => match pipe.send(&req).await {
				Ok(()) => pipe.recv::<CallResponse>().await,
				Err(err) => Err(err),
			},
			None => return Err(ExecutorError::Transport("executor already closed".into())),
		};

		match exchanged {
			Ok(Some(resp)) => Ok(resp.into_result()?),
			// Stdout closed without a response: the agent is gone. Drop
			// our end of the pipe so a still-open stdin cannot keep the
			// child from exiting, then report its status.
			Ok(None) => {
				self.pipe = None;
				Err(self.channel_lost().await)
			}
			// An unencodable request never reached the wire and the
			// channel is still usable; report it without touching the
			// child.
			Err(err @ TransportError::Frame(_)) => Err(err.into()),
			Err(err) => {
				debug!(target = "dockhand.executor", error = %err, "channel i/o failed");
				self.pipe = None;
				Err(self.channel_lost().await)
			}
		}
	}

	async fn close(&mut self) -> Result<(), ExecutorError> {
		if let Some(pipe) = self.pipe.take() {
			// Closing stdin is the shutdown signal; the agent leaves its
			// serve loop on EOF.
			let _ = pipe.shutdown().await;
			self.child
				.wait()
				.await
				.map_err(|err| ExecutorError::Transport(err.to_string()))?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;
	use tempfile::TempDir;

	use super::*;

	#[tokio::test]
	async fn local_executor_runs_the_catalogue() {
		let temp = TempDir::new().unwrap();
		let mut exec = LocalExecutor::new(ProjectRegistry::new(temp.path()));

		exec.call("projects.new_project", vec![json!("alpha")])
			.await
			.unwrap();
		let listed = exec.call("projects.list_projects", vec![]).await.unwrap();
		assert_eq!(listed, json!(["alpha"]));
		exec.close().await.unwrap();
	}

	#[tokio::test]
	async fn local_executor_faults_carry_kind() {
		let temp = TempDir::new().unwrap();
		let mut exec = LocalExecutor::new(ProjectRegistry::new(temp.path()));

		let err = exec
			.call("projects.remove_project", vec![json!("ghost")])
			.await
			.unwrap_err();
		assert_eq!(err.fault_kind(), Some("DoesNotExist"));
	}

	#[cfg(unix)]
	#[tokio::test]
	async fn oversized_request_fails_fast_while_companion_runs() {
		use dockhand_protocol::MAX_FRAME_LEN;

		// A companion that stays alive and echoes nothing useful: the
		// oversized request must be rejected before the wire, not parked
		// on the child's exit.
		let cmd = Command::new("cat");
		let mut exec = SshExecutor::spawn(cmd, "test".to_string()).await.unwrap();

		let oversized = json!("x".repeat(MAX_FRAME_LEN + 1));
		let call = exec.call("projects.new_project", vec![oversized]);
		let err = tokio::time::timeout(std::time::Duration::from_secs(3), call)
			.await
			.expect("call returned promptly")
			.unwrap_err();
		assert!(matches!(err, ExecutorError::Transport(_)), "{err}");

		// The channel survived the rejected request.
		exec.close().await.unwrap();
	}

	#[cfg(unix)]
	#[tokio::test]
	async fn ssh_executor_surfaces_silent_exit_as_transport_error() {
		// A companion that exits without ever writing a response frame.
		let mut cmd = Command::new("true");
		cmd.stderr(Stdio::null());
		let mut exec = SshExecutor::spawn(cmd, "test".to_string()).await.unwrap();

		let err = exec
			.call("projects.list_projects", vec![])
			.await
			.unwrap_err();
		assert!(matches!(err, ExecutorError::Transport(_)), "{err}");
		exec.close().await.unwrap();
	}
}
