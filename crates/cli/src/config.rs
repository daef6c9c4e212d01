//! Configuration persistence.
//!
//! Two files, both schema'd JSON:
//! - a global config under the user config dir
//!   (`~/.config/dockhand/config.json`) holding the default remote and
//!   tunnel settings;
//! - a per-directory project file (`.dockhand.json`) recording which
//!   project the directory is attached to and on which remote it lives.
//!
//! Configuration is resolved into explicit values (`RemoteConfig`,
//! `TunnelConfig`) before anything is constructed from it; nothing in the
//! process reads this as global state.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use dockhand_runtime::{RemoteConfig, TunnelConfig};

use crate::error::Result;

const CONFIG_SCHEMA_VERSION: u32 = 1;

/// User assumed on a remote host when none is configured.
const DEFAULT_REMOTE_USER: &str = "dockhand";

/// User the tunnel connects as when none is configured. Forwarding the
/// daemon's unix socket usually needs more privilege than project
/// bookkeeping does.
const DEFAULT_TUNNEL_USER: &str = "root";

/// Per-directory attachment file.
pub const PROJECT_FILE: &str = ".dockhand.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalConfig {
    pub schema: u32,
    #[serde(default)]
    pub remote_host: Option<String>,
    #[serde(default)]
    pub remote_user: Option<String>,
    #[serde(default)]
    pub tunnel_local_port: Option<u16>,
    #[serde(default)]
    pub tunnel_remote_endpoint: Option<String>,
    #[serde(default)]
    pub tunnel_remote_user: Option<String>,
    /// Host-side project root override; the agent defaults to the home
    /// directory of whatever user it runs as.
    #[serde(default)]
    pub project_root: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            schema: CONFIG_SCHEMA_VERSION,
            remote_host: None,
            remote_user: None,
            tunnel_local_port: None,
            tunnel_remote_endpoint: None,
            tunnel_remote_user: None,
            project_root: None,
        }
    }
}

impl GlobalConfig {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dockhand")
            .join("config.json")
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// The configured default remote. `localhost` when nothing is set; a
    /// non-local host with no configured user falls back to the dockhand
    /// service user.
    pub fn remote(&self) -> RemoteConfig {
        let host = self
            .remote_host
            .clone()
            .unwrap_or_else(|| "localhost".to_string());
        let user = match &self.remote_user {
            Some(user) => Some(user.clone()),
            None if host != "localhost" => Some(DEFAULT_REMOTE_USER.to_string()),
            None => None,
        };
        RemoteConfig::new(host, user)
    }

    pub fn set_remote(&mut self, remote: &RemoteConfig) {
        self.remote_host = Some(remote.host.clone());
        self.remote_user = remote.user.clone();
    }

    /// Tunnel endpoints for the configured remote.
    pub fn tunnel(&self) -> TunnelConfig {
        let user = self
            .tunnel_remote_user
            .clone()
            .unwrap_or_else(|| DEFAULT_TUNNEL_USER.to_string());
        let mut config = TunnelConfig::new(RemoteConfig::new(self.remote().host, Some(user)));
        if let Some(port) = self.tunnel_local_port {
            config = config.with_local_port(port);
        }
        if let Some(endpoint) = &self.tunnel_remote_endpoint {
            config = config.with_remote_endpoint(endpoint);
        }
        config
    }
}

/// Attachment of a working directory to a project on some remote.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    pub project: String,
    pub remote_host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_user: Option<String>,
}

impl ProjectFile {
    pub fn new(project: impl Into<String>, remote: &RemoteConfig) -> Self {
        Self {
            project: project.into(),
            remote_host: remote.host.clone(),
            remote_user: remote.user.clone(),
        }
    }

    pub fn load(dir: &Path) -> Result<Option<Self>> {
        match fs::read_to_string(dir.join(PROJECT_FILE)) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::write(dir.join(PROJECT_FILE), serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn remove(dir: &Path) -> Result<()> {
        match fs::remove_file(dir.join(PROJECT_FILE)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn remote(&self) -> RemoteConfig {
        RemoteConfig::new(self.remote_host.clone(), self.remote_user.clone())
    }
}
