use serde_json::json;
use tracing::info;

use dockhand_runtime::dispatch::target;

use crate::commands::{confirm, resolve_remote, scoped_call};
use crate::config::{GlobalConfig, ProjectFile};
use crate::error::{CliError, Result};

pub async fn run(yes: bool, name: Option<String>) -> Result<()> {
    let dir = crate::commands::working_dir()?;
    let attached = ProjectFile::load(&dir)?;
    let config = GlobalConfig::load()?;

    let name = match name.or_else(|| attached.as_ref().map(|file| file.project.clone())) {
        Some(name) => name,
        None => return Err(CliError::NotAttached),
    };
    let remote = resolve_remote(None, attached.as_ref(), &config);

    if !yes && !confirm(&format!("delete project {name:?} on {remote}?"))? {
        println!("aborted");
        return Ok(());
    }

    scoped_call(&remote, target::REMOVE_PROJECT, vec![json!(name)]).await?;
    if attached.is_some_and(|file| file.project == name) {
        ProjectFile::remove(&dir)?;
    }

    info!(target = "dockhand", name, remote = %remote, "project removed");
    println!("removed project {name:?}");
    Ok(())
}
