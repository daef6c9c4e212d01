use std::path::PathBuf;

use tracing::debug;

use dockhand_registry::ProjectRegistry;
use dockhand_runtime::agent::serve_stdio;
use dockhand_runtime::ExecutorError;

use crate::config::GlobalConfig;
use crate::error::Result;

/// Host-side entry point: the ssh executor runs `dockhand agent` on the
/// remote and speaks the frame protocol over this process's stdio.
pub async fn run(root: Option<PathBuf>) -> Result<()> {
    let config = GlobalConfig::load()?;
    let root = root
        .or(config.project_root)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    debug!(target = "dockhand.agent", root = %root.display(), "agent serving");
    let registry = ProjectRegistry::new(root);
    serve_stdio(&registry)
        .await
        .map_err(ExecutorError::from)?;
    Ok(())
}
