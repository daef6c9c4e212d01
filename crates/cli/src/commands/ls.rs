use dockhand_runtime::dispatch::target;

use crate::commands::{resolve_remote, scoped_call};
use crate::config::{GlobalConfig, ProjectFile};
use crate::error::Result;

pub async fn run() -> Result<()> {
    let dir = crate::commands::working_dir()?;
    let attached = ProjectFile::load(&dir)?;
    let config = GlobalConfig::load()?;
    let remote = resolve_remote(None, attached.as_ref(), &config);

    let listed = scoped_call(&remote, target::LIST_PROJECTS, vec![]).await?;
    let names: Vec<String> = serde_json::from_value(listed)?;
    for name in names {
        println!("{name}");
    }
    Ok(())
}
