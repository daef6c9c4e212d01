//! Project bookkeeping for a dockhand host.
//!
//! A project is a named working directory under a single project root,
//! identified solely by its metadata marker file. A directory without the
//! marker is invisible to the registry even if it is non-empty.
//!
//! These operations run where the project directories physically live: the
//! local machine, or a remote host via the dispatch catalogue in
//! `dockhand-runtime`. The registry's true concurrency domain is the
//! filesystem shared across process instances, so mutual exclusion is an
//! advisory file lock next to the marker, not an in-process mutex.

mod error;
mod lock;
mod projects;

pub use error::RegistryError;
pub use lock::ProjectLock;
pub use projects::{METADATA_FILE, ProjectMetadata, ProjectRegistry};

pub type Result<T> = std::result::Result<T, RegistryError>;
