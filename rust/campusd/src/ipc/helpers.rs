use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

pub fn required_str(params: &Value, key: &str) -> Result<String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| Error::invalid(format!("missing params.{key}")))
}

/// Decode the whole params object; `null` reads as an empty object.
pub fn parse_params<P: DeserializeOwned>(params: &Value) -> Result<P> {
    let raw = if params.is_null() {
        Value::Object(Default::default())
    } else {
        params.clone()
    };
    serde_json::from_value(raw).map_err(|e| Error::invalid(format!("bad params: {e}")))
}

/// Decode `params[key]`, treating a missing key like `null`.
pub fn optional_param<P: DeserializeOwned>(params: &Value, key: &str) -> Result<Option<P>> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => serde_json::from_value(v.clone())
            .map(Some)
            .map_err(|e| Error::invalid(format!("bad params.{key}: {e}"))),
    }
}
