//! The resolved remote target an executor or tunnel is pointed at.
//!
//! This is an explicit value threaded into constructors, never process-wide
//! state, so multiple targets can coexist in one process.

use serde::{Deserialize, Serialize};

/// A `(host, user)` pair identifying the remote side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
	pub host: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user: Option<String>,
}

impl RemoteConfig {
	pub fn new(host: impl Into<String>, user: Option<String>) -> Self {
		Self {
			host: host.into(),
			user,
		}
	}

	/// The local machine; selects the in-process executor.
	pub fn localhost() -> Self {
		Self::new("localhost", None)
	}

	/// Parse `host` or `user@host`.
	pub fn parse(spec: &str) -> Self {
		match spec.split_once('@') {
			Some((user, host)) if !user.is_empty() && !host.is_empty() => {
				Self::new(host, Some(user.to_string()))
			}
			_ => Self::new(spec, None),
		}
	}

	/// `true` if operations against this target should run in-process.
	pub fn is_local(&self) -> bool {
		self.host == "localhost" && self.user.is_none()
	}

	/// The `user@host` (or bare `host`) string handed to `ssh`.
	pub fn destination(&self) -> String {
		match &self.user {
			Some(user) => format!("{user}@{}", self.host),
			None => self.host.clone(),
		}
	}
}

impl std::fmt::Display for RemoteConfig {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.destination())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_accepts_bare_host_and_user_host() {
		assert_eq!(RemoteConfig::parse("box"), RemoteConfig::new("box", None));
		assert_eq!(
			RemoteConfig::parse("deploy@box"),
			RemoteConfig::new("box", Some("deploy".to_string()))
		);
		// A dangling separator is treated as a literal host name.
		assert_eq!(RemoteConfig::parse("@box"), RemoteConfig::new("@box", None));
	}

	#[test]
	fn localhost_without_user_is_local() {
		assert!(RemoteConfig::localhost().is_local());
		assert!(!RemoteConfig::new("localhost", Some("me".into())).is_local());
		assert!(!RemoteConfig::new("box", None).is_local());
	}

	#[test]
	fn destination_formats_user() {
		assert_eq!(RemoteConfig::parse("deploy@box").destination(), "deploy@box");
		assert_eq!(RemoteConfig::parse("box").destination(), "box");
	}
}
