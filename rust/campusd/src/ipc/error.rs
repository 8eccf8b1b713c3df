use serde_json::json;

use crate::error::{Error, Result};

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

/// Error envelope for a domain failure.
pub fn fail(id: &str, e: &Error) -> serde_json::Value {
    tracing::warn!(request = id, code = e.code(), "request failed: {e}");
    let details = match e {
        Error::UnknownField { field, .. } => Some(json!({ "field": field })),
        Error::NotFound { kind, id: missing } => Some(json!({ "kind": kind, "id": missing })),
        _ => None,
    };
    err(id, e.code(), e.to_string(), details)
}

pub fn respond(id: &str, result: Result<serde_json::Value>) -> serde_json::Value {
    match result {
        Ok(v) => ok(id, v),
        Err(e) => fail(id, &e),
    }
}
