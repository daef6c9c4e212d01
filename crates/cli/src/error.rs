use thiserror::Error;

use dockhand_runtime::ExecutorError;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("this directory is already attached to project {0:?}")]
    AlreadyAttached(String),

    #[error("this directory is not attached to a project")]
    NotAttached,

    #[error("project {0:?} does not exist on the remote")]
    NoSuchProject(String),

    #[error("tunnel failed: forwarding process exited with an error")]
    TunnelFailed,

    #[error(transparent)]
    Executor(#[from] ExecutorError),

    #[error(transparent)]
    Registry(#[from] dockhand_registry::RegistryError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
