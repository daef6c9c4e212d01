use serde_json::json;

use dockhand_runtime::dispatch::target;

use crate::commands::{resolve_remote, scoped_call};
use crate::config::{GlobalConfig, ProjectFile};
use crate::error::{CliError, Result};

pub async fn run(name: String, host: Option<String>) -> Result<()> {
    let dir = crate::commands::working_dir()?;
    if let Some(existing) = ProjectFile::load(&dir)? {
        return Err(CliError::AlreadyAttached(existing.project));
    }

    let config = GlobalConfig::load()?;
    let remote = resolve_remote(host, None, &config);

    let exists = scoped_call(&remote, target::PROJECT_EXISTS, vec![json!(name)]).await?;
    if exists != json!(true) {
        return Err(CliError::NoSuchProject(name));
    }

    ProjectFile::new(&name, &remote).save(&dir)?;
    println!("attached to project {name:?} on {remote}");
    Ok(())
}
