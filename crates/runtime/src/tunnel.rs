//! SSH tunnel to the Docker daemon on another machine.
//!
//! Forwards a local TCP port to the remote control endpoint (by default the
//! daemon's unix socket) so that host-native tooling can be pointed at
//! `tcp://localhost:<port>`. The forwarding subprocess is owned exclusively
//! by the tunnel value and is terminated and waited on when the tunnel is
//! closed; `kill_on_drop` backstops every other exit path.

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::process::{Child, Command};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::RemoteConfig;

/// How often the readiness probe re-attempts a connection.
const PROBE_INTERVAL: Duration = Duration::from_millis(100);

/// Tunnel lifecycle: `Starting -> Alive -> {Ended | Failed}`.
///
/// `Alive` holds while the forwarding process is running. `Starting` is
/// [`wait_ready`](SshTunnel::wait_ready)'s answer when its deadline passes
/// before the forward accepts a connection. `Ended` is a clean shutdown
/// (exit 0, or explicit close by the owner); `Failed` is a non-zero exit -
/// authentication rejected, host unreachable, local port already bound. A
/// failed tunnel is surfaced as state, never as an error: the caller
/// decides whether to abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TunnelStatus {
	Starting,
	Alive,
	Ended,
	Failed,
}

/// Endpoint mapping for a Docker tunnel.
#[derive(Debug, Clone)]
pub struct TunnelConfig {
	pub remote: RemoteConfig,
	/// Local TCP port mirroring the remote control endpoint.
	pub local_port: u16,
	/// Remote unix socket path or TCP address forwarded to.
	pub remote_endpoint: String,
}

impl TunnelConfig {
	pub const DEFAULT_LOCAL_PORT: u16 = 2375;
	pub const DEFAULT_REMOTE_ENDPOINT: &str = "/var/run/docker.sock";

	pub fn new(remote: RemoteConfig) -> Self {
		Self {
			remote,
			local_port: Self::DEFAULT_LOCAL_PORT,
			remote_endpoint: Self::DEFAULT_REMOTE_ENDPOINT.to_string(),
		}
	}

	pub fn with_local_port(mut self, port: u16) -> Self {
		self.local_port = port;
		self
	}

	pub fn with_remote_endpoint(mut self, endpoint: impl Into<String>) -> Self {
		self.remote_endpoint = endpoint.into();
		self
	}
}

/// An open (or opening) forward, owning its `ssh -NL` subprocess.
pub struct SshTunnel {
	child: Child,
	local_port: u16,
}

impl SshTunnel {
	/// Spawn the forwarding process and return the tunnel together with
	/// the local-facing address string (`tcp://localhost:<port>`).
	///
	/// The spawn itself succeeding says nothing about the forward being
	/// usable yet; poll [`status`](Self::status) or use
	/// [`wait_ready`](Self::wait_ready).
	pub fn open(config: &TunnelConfig) -> std::io::Result<(Self, String)> {
		let mapping = format!("{}:{}", config.local_port, config.remote_endpoint);
		let mut cmd = Command::new("ssh");
		cmd.arg("-N")
			.arg("-L")
			.arg(&mapping)
			.arg(config.remote.destination())
			.stdin(Stdio::null());
		debug!(
			target = "dockhand.tunnel",
			%mapping,
			destination = %config.remote.destination(),
			"opening tunnel"
		);
		Self::spawn(cmd, config.local_port)
	}

	fn spawn(mut cmd: Command, local_port: u16) -> std::io::Result<(Self, String)> {
		cmd.kill_on_drop(true);
		let child = cmd.spawn()?;
		let tunnel = Self { child, local_port };
		let addr = tunnel.local_addr();
		Ok((tunnel, addr))
	}

	/// The address host-native tooling should be pointed at.
	pub fn local_addr(&self) -> String {
		format!("tcp://localhost:{}", self.local_port)
	}

	/// Poll the forwarding process without blocking.
	///
	/// A running process is `Alive` regardless of whether the forward has
	/// accepted a connection yet; use [`wait_ready`](Self::wait_ready) for
	/// the readiness signal.
	pub fn status(&mut self) -> TunnelStatus {
		match self.child.try_wait() {
			Ok(Some(status)) => terminal(status),
			Ok(None) => TunnelStatus::Alive,
			Err(err) => {
				warn!(target = "dockhand.tunnel", error = %err, "liveness poll failed");
				TunnelStatus::Failed
			}
		}
	}

	/// Wait until the forward accepts connections, the process exits, or
	/// the timeout passes.
	///
	/// Returns `Alive` once a probe connection to the local endpoint
	/// succeeds, the terminal state if the process exits first, or
	/// `Starting` if the timeout elapses with neither observed.
	pub async fn wait_ready(&mut self, timeout: Duration) -> TunnelStatus {
		enum Step {
			Exit(std::io::Result<ExitStatus>),
			Probe(bool),
			Timeout,
		}

		let deadline = Instant::now() + timeout;
		let probe_addr = format!("127.0.0.1:{}", self.local_port);
		loop {
			let step = tokio::select! {
				exit = self.child.wait() => Step::Exit(exit),
				probe = TcpStream::connect(&probe_addr) => Step::Probe(probe.is_ok()),
				_ = tokio::time::sleep_until(deadline) => Step::Timeout,
			};
			match step {
				Step::Exit(Ok(status)) => return terminal(status),
				Step::Exit(Err(_)) => return TunnelStatus::Failed,
				Step::Probe(true) => return TunnelStatus::Alive,
				Step::Probe(false) => {
					// Forward not up yet; pause before the next probe.
					if Instant::now() >= deadline {
						return TunnelStatus::Starting;
					}
					tokio::time::sleep(PROBE_INTERVAL).await;
				}
				Step::Timeout => return TunnelStatus::Starting,
			}
		}
	}

	/// Block until the forwarding process exits on its own.
	pub async fn wait(&mut self) -> TunnelStatus {
		match self.child.wait().await {
			Ok(status) => terminal(status),
			Err(err) => {
				warn!(target = "dockhand.tunnel", error = %err, "wait failed");
				TunnelStatus::Failed
			}
		}
	}

	/// Terminate the forwarding process and wait for it to exit.
	///
	/// Safe on every exit path; a process that already exited reports its
	/// actual terminal state, while an owner-initiated termination counts
	/// as a clean shutdown.
	pub async fn close(mut self) -> TunnelStatus {
		if let Ok(Some(status)) = self.child.try_wait() {
			return terminal(status);
		}
		self.terminate();
		if let Err(err) = self.child.wait().await {
			warn!(target = "dockhand.tunnel", error = %err, "wait after terminate failed");
		}
		debug!(target = "dockhand.tunnel", "tunnel closed");
		TunnelStatus::Ended
	}

	#[cfg(unix)]
	fn terminate(&mut self) {
		if let Some(pid) = self.child.id() {
			// SAFETY: plain kill(2) on a pid we own.
			unsafe {
				libc::kill(pid as libc::pid_t, libc::SIGTERM);
			}
		}
	}

	#[cfg(not(unix))]
	fn terminate(&mut self) {
		let _ = self.child.start_kill();
	}
}

fn terminal(status: ExitStatus) -> TunnelStatus {
	if status.success() {
		TunnelStatus::Ended
	} else {
		TunnelStatus::Failed
	}
}
