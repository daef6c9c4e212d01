use serde_json::json;
use tracing::info;

use dockhand_runtime::dispatch::target;

use crate::commands::{resolve_remote, scoped_call};
use crate::config::{GlobalConfig, ProjectFile};
use crate::error::{CliError, Result};
use crate::namegen::namegen;

pub async fn run(name: Option<String>, host: Option<String>) -> Result<()> {
    let dir = crate::commands::working_dir()?;
    if let Some(existing) = ProjectFile::load(&dir)? {
        return Err(CliError::AlreadyAttached(existing.project));
    }

    let config = GlobalConfig::load()?;
    let remote = resolve_remote(host, None, &config);
    let name = name.unwrap_or_else(namegen);

    scoped_call(&remote, target::NEW_PROJECT, vec![json!(name)]).await?;
    ProjectFile::new(&name, &remote).save(&dir)?;

    info!(target = "dockhand", name, remote = %remote, "project created");
    println!("created project {name:?} on {remote}");
    Ok(())
}
