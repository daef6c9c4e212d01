use std::time::Duration;

use tracing::{info, warn};

use dockhand_runtime::{SshTunnel, TunnelStatus};

use crate::config::GlobalConfig;
use crate::error::{CliError, Result};

const READY_TIMEOUT: Duration = Duration::from_secs(15);

pub async fn run(local_port: Option<u16>) -> Result<()> {
    let config = GlobalConfig::load()?;
    let mut tunnel_config = config.tunnel();
    if let Some(port) = local_port {
        tunnel_config = tunnel_config.with_local_port(port);
    }

    let (mut tunnel, addr) = SshTunnel::open(&tunnel_config)?;
    match tunnel.wait_ready(READY_TIMEOUT).await {
        TunnelStatus::Alive => {
            info!(target = "dockhand.tunnel", %addr, "tunnel ready");
        }
        TunnelStatus::Starting => {
            // Process is up but the forward never accepted a probe; leave
            // the decision to the user instead of tearing it down.
            warn!(target = "dockhand.tunnel", %addr, "tunnel not confirmed ready yet");
        }
        TunnelStatus::Ended => {
            println!("tunnel closed before becoming ready");
            return Ok(());
        }
        TunnelStatus::Failed => {
            tunnel.close().await;
            return Err(CliError::TunnelFailed);
        }
    }

    println!("docker daemon available at {addr}");
    println!("  export DOCKER_HOST={addr}");
    println!("press Ctrl-C to close the tunnel");

    let exited = tokio::select! {
        _ = tokio::signal::ctrl_c() => None,
        state = tunnel.wait() => Some(state),
    };
    match exited {
        None => {
            tunnel.close().await;
            println!("tunnel closed");
            Ok(())
        }
        Some(TunnelStatus::Failed) => Err(CliError::TunnelFailed),
        Some(_) => {
            println!("tunnel closed by the remote end");
            Ok(())
        }
    }
}
