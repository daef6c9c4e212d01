//! Request and response shapes for a single remote call.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single invocation of a named host-side operation.
///
/// `target` is a dotted operation name (e.g. `projects.new_project`) that
/// both ends resolve against a fixed dispatch catalogue. It is never a
/// closure or a bound object - it has to cross a process boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRequest {
    pub target: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

impl CallRequest {
    pub fn new(target: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            target: target.into(),
            args,
        }
    }
}

/// Response to a [`CallRequest`]: `{"ok": value}` or `{"error": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CallResponse {
    Ok { ok: Value },
    Err { error: RemoteFault },
}

impl CallResponse {
    pub fn ok(value: Value) -> Self {
        CallResponse::Ok { ok: value }
    }

    pub fn fault(fault: RemoteFault) -> Self {
        CallResponse::Err { error: fault }
    }

    pub fn into_result(self) -> Result<Value, RemoteFault> {
        match self {
            CallResponse::Ok { ok } => Ok(ok),
            CallResponse::Err { error } => Err(error),
        }
    }
}

/// A remote error reconstructed on the caller's side.
///
/// Errors cross the wire as the originating error kind's name plus its
/// message, not as a live error object. Callers match on `kind` the same
/// way they would match on the typed error from an in-process call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct RemoteFault {
    pub kind: String,
    pub message: String,
}

impl RemoteFault {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

/// Fault kind names shared by both ends of the channel.
pub mod fault_kind {
    pub const INVALID_NAME: &str = "InvalidName";
    pub const ALREADY_EXISTS: &str = "AlreadyExists";
    pub const DOES_NOT_EXIST: &str = "DoesNotExist";
    pub const IO: &str = "Io";
    pub const UNKNOWN_TARGET: &str = "UnknownTarget";
    pub const SERIALIZATION: &str = "SerializationError";
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn request_round_trips() {
        let req = CallRequest::new("projects.new_project", vec![json!("alpha")]);
        let bytes = serde_json::to_vec(&req).unwrap();
        let back: CallRequest = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(back, req);
    }

    #[test]
    fn request_args_default_to_empty() {
        let req: CallRequest =
            serde_json::from_value(json!({"target": "projects.list_projects"})).unwrap();
        assert!(req.args.is_empty());
    }

    #[test]
    fn response_ok_shape() {
        let resp = CallResponse::ok(json!(["alpha", "beta"]));
        let wire = serde_json::to_value(&resp).unwrap();
        assert_eq!(wire, json!({"ok": ["alpha", "beta"]}));
    }

    #[test]
    fn response_error_shape() {
        let resp = CallResponse::fault(RemoteFault::new(
            fault_kind::ALREADY_EXISTS,
            "project \"alpha\" already exists",
        ));
        let wire = serde_json::to_value(&resp).unwrap();
        assert_eq!(
            wire,
            json!({"error": {"kind": "AlreadyExists", "message": "project \"alpha\" already exists"}})
        );
    }

    #[test]
    fn response_ok_with_null_value() {
        // new_project returns no payload; the wire still carries {"ok": null}.
        let resp: CallResponse = serde_json::from_value(json!({"ok": null})).unwrap();
        assert_eq!(resp.into_result().unwrap(), Value::Null);
    }

    #[test]
    fn fault_kind_survives_round_trip() {
        let resp = CallResponse::fault(RemoteFault::new(fault_kind::DOES_NOT_EXIST, "ghost"));
        let bytes = serde_json::to_vec(&resp).unwrap();
        let back: CallResponse = serde_json::from_slice(&bytes).unwrap();
        let fault = back.into_result().unwrap_err();
        assert_eq!(fault.kind, fault_kind::DOES_NOT_EXIST);
        assert_eq!(fault.message, "ghost");
    }
}
