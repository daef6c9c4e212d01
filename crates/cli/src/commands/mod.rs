mod agent;
mod connect;
mod info;
mod ls;
mod new;
mod remote;
mod rm;
mod tunnel;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use serde_json::Value;

use dockhand_runtime::executor::{RemoteExecutor, new_executor};
use dockhand_runtime::RemoteConfig;

use crate::cli::Commands;
use crate::config::{GlobalConfig, ProjectFile};
use crate::error::Result;
use crate::namegen::namegen;

pub async fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::New { name, host } => new::run(name, host).await,
        Commands::Connect { name, host } => connect::run(name, host).await,
        Commands::Ls => ls::run().await,
        Commands::Rm { yes, name } => rm::run(yes, name).await,
        Commands::Info => info::run(),
        Commands::Tunnel { local_port } => tunnel::run(local_port).await,
        Commands::Remote { target } => remote::run(target),
        Commands::Name => {
            println!("{}", namegen());
            Ok(())
        }
        Commands::Agent { root } => agent::run(root).await,
    }
}

/// The directory whose attachment file governs the command.
pub(crate) fn working_dir() -> Result<PathBuf> {
    Ok(std::env::current_dir().context("cannot determine the working directory")?)
}

/// Which remote a command talks to: an explicit `[user@]host` argument
/// wins, then the attached project's remote, then the configured default.
pub(crate) fn resolve_remote(
    explicit: Option<String>,
    attached: Option<&ProjectFile>,
    config: &GlobalConfig,
) -> RemoteConfig {
    explicit
        .map(|spec| RemoteConfig::parse(&spec))
        .or_else(|| attached.map(ProjectFile::remote))
        .unwrap_or_else(|| config.remote())
}

/// One call with scoped executor teardown: the companion process is closed
/// whether the call succeeded or not.
pub(crate) async fn scoped_call(
    remote: &RemoteConfig,
    target: &str,
    args: Vec<Value>,
) -> Result<Value> {
    let mut client = new_executor(remote, None).await?;
    let result = client.call(target, args).await;
    let closed = client.close().await;
    let value = result?;
    closed?;
    Ok(value)
}

pub(crate) fn confirm(question: &str) -> Result<bool> {
    print!("{question} [N/y] ");
    std::io::stdout().flush()?;
    let mut reply = String::new();
    std::io::stdin().read_line(&mut reply)?;
    Ok(matches!(
        reply.trim().to_lowercase().as_str(),
        "y" | "yes" | "ok" | "true"
    ))
}
