//! Response interpretation shared by both API generations.
//!
//! # Design
//! `parse_response` is a pure function from `HttpResponse` to either the
//! normalized payload or an `AmoError`:
//! - 204 is an empty object, the body is never looked at.
//! - An empty body decodes to an empty object.
//! - A body with a top-level `error` key, or any status >= 400, is an error
//!   carrying the decoded body and the observed status.
//! - A top-level `response` key (legacy envelope) is unwrapped. An `error`
//!   key inside the envelope is an error carrying the unwrapped payload.
//! - A body that is not JSON is an error with status 500.

use serde_json::{Map, Value};

use crate::error::{AmoError, Result};
use crate::http::HttpResponse;

pub fn parse_response(response: HttpResponse) -> Result<Value> {
    if response.status == 204 {
        return Ok(empty_object());
    }

    let data = decode_body(&response.body)?;

    if has_key(&data, "error") || response.status >= 400 {
        return Err(AmoError::new(data, response.status));
    }

    let payload = unwrap_envelope(data);
    if has_key(&payload, "error") {
        return Err(AmoError::new(payload, response.status));
    }
    Ok(payload)
}

/// Decode a raw body, treating blank input as an empty object.
pub(crate) fn decode_body(body: &str) -> Result<Value> {
    if body.trim().is_empty() {
        return Ok(empty_object());
    }
    serde_json::from_str(body).map_err(AmoError::transport)
}

fn unwrap_envelope(data: Value) -> Value {
    match data {
        Value::Object(mut map) if map.contains_key("response") => {
            map.remove("response").unwrap_or_else(empty_object)
        }
        other => other,
    }
}

fn has_key(data: &Value, key: &str) -> bool {
    data.as_object().is_some_and(|map| map.contains_key(key))
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}
