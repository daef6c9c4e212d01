//! The project registry proper: create, list, remove, existence.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RegistryError;
use crate::lock::ProjectLock;
use crate::Result;

/// Marker file whose presence is the sole existence signal for a project.
pub const METADATA_FILE: &str = ".dockhand-project";

/// Contents of the metadata marker. Currently an empty record, reserved
/// for future fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectMetadata {}

/// Bookkeeping of named project directories under a single root.
///
/// The root is an explicit constructor argument rather than process-wide
/// configuration, so multiple hosts' registries can coexist in one process
/// and tests can run against scratch roots without shared fixtures.
#[derive(Debug, Clone)]
pub struct ProjectRegistry {
    root: PathBuf,
}

impl ProjectRegistry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `true` if `name` matches `^[A-Za-z0-9_.-]+$`.
    pub fn valid_name(name: &str) -> bool {
        !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    }

    /// Path of the project directory for `name` (`root/name`).
    pub fn project_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn metadata_path(&self, name: &str) -> PathBuf {
        self.project_path(name).join(METADATA_FILE)
    }

    /// Existence check: the marker file only. Does not validate `name`.
    pub fn project_exists(&self, name: &str) -> bool {
        self.metadata_path(name).is_file()
    }

    /// The exact set of marker-bearing immediate children of the root at
    /// call time. No caching; a missing root reads as an empty set.
    pub fn list_projects(&self) -> Result<BTreeSet<String>> {
        let mut projects = BTreeSet::new();
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(projects),
            Err(err) => return Err(err.into()),
        };
        for entry in entries {
            let entry = entry?;
            if entry.path().join(METADATA_FILE).is_file() {
                projects.insert(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(projects)
    }

    /// Create a new project directory with its metadata marker.
    ///
    /// The directory is created before the marker is written, so a
    /// concurrent `project_exists` never observes a marker without its
    /// directory.
    pub fn new_project(&self, name: &str) -> Result<()> {
        if !Self::valid_name(name) {
            return Err(RegistryError::InvalidName(name.to_string()));
        }
        let metadata_path = self.metadata_path(name);
        if metadata_path.is_file() {
            return Err(RegistryError::AlreadyExists(name.to_string()));
        }
        fs::create_dir_all(self.project_path(name))?;
        let record = serde_json::to_string(&ProjectMetadata::default())
            .map_err(std::io::Error::other)?;
        fs::write(&metadata_path, record)?;
        debug!(target = "dockhand.registry", name, "project created");
        Ok(())
    }

    /// Delete the whole project directory tree.
    ///
    /// TODO: check whether containers are still running inside the project
    /// and refuse deletion until they are stopped.
    pub fn remove_project(&self, name: &str) -> Result<()> {
        if !self.project_exists(name) {
            return Err(RegistryError::DoesNotExist(name.to_string()));
        }
        fs::remove_dir_all(self.project_path(name))?;
        debug!(target = "dockhand.registry", name, "project removed");
        Ok(())
    }

    /// Create volume directories for a project. Relative paths resolve
    /// under the project path; existing directories are not an error.
    pub fn ensure_volume_dirs<I, P>(&self, name: &str, dirs: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let project_path = self.project_path(name);
        for dir in dirs {
            let dir = dir.as_ref();
            let resolved = if dir.is_absolute() {
                dir.to_path_buf()
            } else {
                project_path.join(dir)
            };
            fs::create_dir_all(&resolved)?;
        }
        Ok(())
    }

    /// Acquire the advisory lock for a project, blocking until it is free.
    ///
    /// Intended to bracket multi-step mutating sequences (ensure-dirs then
    /// launch, check then remove) from the caller's side. Fails with
    /// `DoesNotExist` if the project has not been created yet.
    pub fn project_lock(&self, name: &str) -> Result<ProjectLock> {
        let metadata_path = self.metadata_path(name);
        if !metadata_path.is_file() {
            return Err(RegistryError::DoesNotExist(name.to_string()));
        }
        let mut lock_path = metadata_path.into_os_string();
        lock_path.push(".lock");
        Ok(ProjectLock::acquire(Path::new(&lock_path))?)
    }
}
