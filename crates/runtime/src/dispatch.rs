//! The fixed catalogue of operations invocable over the channel.
//!
//! A call target is a name resolvable here, never shipped code; both the
//! local executor and the host-side agent resolve calls through this one
//! function, which is what makes the two executor variants observationally
//! equivalent.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use dockhand_protocol::{CallRequest, CallResponse, RemoteFault, fault_kind};
use dockhand_registry::{ProjectRegistry, RegistryError};

pub mod target {
	pub const LIST_PROJECTS: &str = "projects.list_projects";
	pub const PROJECT_EXISTS: &str = "projects.project_exists";
	pub const NEW_PROJECT: &str = "projects.new_project";
	pub const REMOVE_PROJECT: &str = "projects.remove_project";
	pub const ENSURE_VOLUME_DIRS: &str = "projects.ensure_volume_dirs";
}

/// Resolve and invoke one call against the registry.
pub fn dispatch(registry: &ProjectRegistry, req: &CallRequest) -> CallResponse {
	debug!(target = "dockhand.dispatch", call = %req.target, "dispatching");
	match invoke(registry, req) {
		Ok(value) => CallResponse::ok(value),
		Err(fault) => CallResponse::fault(fault),
	}
}

fn invoke(registry: &ProjectRegistry, req: &CallRequest) -> Result<Value, RemoteFault> {
	match req.target.as_str() {
		target::LIST_PROJECTS => {
			let projects = registry.list_projects().map_err(registry_fault)?;
			Ok(json!(projects))
		}
		target::PROJECT_EXISTS => {
			let name: String = arg(req, 0, "name")?;
			Ok(json!(registry.project_exists(&name)))
		}
		target::NEW_PROJECT => {
			let name: String = arg(req, 0, "name")?;
			registry.new_project(&name).map_err(registry_fault)?;
			Ok(Value::Null)
		}
		target::REMOVE_PROJECT => {
			let name: String = arg(req, 0, "name")?;
			// Mutating sequence: hold the project lock across the check
			// and the delete. The lock itself reports DoesNotExist for a
			// project that was never created.
			let _lock = registry.project_lock(&name).map_err(registry_fault)?;
			registry.remove_project(&name).map_err(registry_fault)?;
			Ok(Value::Null)
		}
		target::ENSURE_VOLUME_DIRS => {
			let name: String = arg(req, 0, "name")?;
			let dirs: Vec<PathBuf> = arg(req, 1, "dirs")?;
			let _lock = registry.project_lock(&name).map_err(registry_fault)?;
			registry.ensure_volume_dirs(&name, dirs).map_err(registry_fault)?;
			Ok(Value::Null)
		}
		other => Err(RemoteFault::new(
			fault_kind::UNKNOWN_TARGET,
			format!("no such operation: {other}"),
		)),
	}
}

fn arg<T: DeserializeOwned>(req: &CallRequest, index: usize, name: &str) -> Result<T, RemoteFault> {
	let value = req.args.get(index).ok_or_else(|| {
		RemoteFault::new(
			fault_kind::SERIALIZATION,
			format!("{}: missing argument {index} ({name})", req.target),
		)
	})?;
	serde_json::from_value(value.clone()).map_err(|err| {
		RemoteFault::new(
			fault_kind::SERIALIZATION,
			format!("{}: bad argument {index} ({name}): {err}", req.target),
		)
	})
}

fn registry_fault(err: RegistryError) -> RemoteFault {
	RemoteFault::new(err.kind_name(), err.to_string())
}

#[cfg(test)]
mod tests {
	use serde_json::json;
	use tempfile::TempDir;

	use super::*;

	fn registry() -> (TempDir, ProjectRegistry) {
		let temp = TempDir::new().unwrap();
		let registry = ProjectRegistry::new(temp.path());
		(temp, registry)
	}

	fn call(registry: &ProjectRegistry, target: &str, args: Vec<Value>) -> Result<Value, RemoteFault> {
		dispatch(registry, &CallRequest::new(target, args)).into_result()
	}

	#[test]
	fn full_project_lifecycle() {
		let (_temp, registry) = registry();

		assert_eq!(
			call(&registry, target::LIST_PROJECTS, vec![]).unwrap(),
			json!([])
		);
		call(&registry, target::NEW_PROJECT, vec![json!("alpha")]).unwrap();
		assert_eq!(
			call(&registry, target::PROJECT_EXISTS, vec![json!("alpha")]).unwrap(),
			json!(true)
		);
		assert_eq!(
			call(&registry, target::LIST_PROJECTS, vec![]).unwrap(),
			json!(["alpha"])
		);
		call(&registry, target::REMOVE_PROJECT, vec![json!("alpha")]).unwrap();
		assert_eq!(
			call(&registry, target::PROJECT_EXISTS, vec![json!("alpha")]).unwrap(),
			json!(false)
		);
	}

	#[test]
	fn registry_errors_keep_their_kind_on_the_wire() {
		let (_temp, registry) = registry();

		call(&registry, target::NEW_PROJECT, vec![json!("alpha")]).unwrap();
		let dup = call(&registry, target::NEW_PROJECT, vec![json!("alpha")]).unwrap_err();
		assert_eq!(dup.kind, fault_kind::ALREADY_EXISTS);

		let ghost = call(&registry, target::REMOVE_PROJECT, vec![json!("ghost")]).unwrap_err();
		assert_eq!(ghost.kind, fault_kind::DOES_NOT_EXIST);

		let bad = call(&registry, target::NEW_PROJECT, vec![json!("not valid")]).unwrap_err();
		assert_eq!(bad.kind, fault_kind::INVALID_NAME);
	}

	#[test]
	fn ensure_volume_dirs_round_trip() {
		let (temp, registry) = registry();
		call(&registry, target::NEW_PROJECT, vec![json!("alpha")]).unwrap();
		call(
			&registry,
			target::ENSURE_VOLUME_DIRS,
			vec![json!("alpha"), json!(["data/db", "data/cache"])],
		)
		.unwrap();
		assert!(temp.path().join("alpha/data/db").is_dir());
		assert!(temp.path().join("alpha/data/cache").is_dir());
	}

	#[test]
	fn unknown_target_and_bad_args_fault() {
		let (_temp, registry) = registry();

		let unknown = call(&registry, "projects.launch_missiles", vec![]).unwrap_err();
		assert_eq!(unknown.kind, fault_kind::UNKNOWN_TARGET);

		let missing = call(&registry, target::NEW_PROJECT, vec![]).unwrap_err();
		assert_eq!(missing.kind, fault_kind::SERIALIZATION);

		let wrong_type = call(&registry, target::NEW_PROJECT, vec![json!(42)]).unwrap_err();
		assert_eq!(wrong_type.kind, fault_kind::SERIALIZATION);
	}
}
