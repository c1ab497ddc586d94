//! Error type for every amoCRM call.
//!
//! # Design
//! The vendor reports failures as arbitrary JSON documents, so `AmoError`
//! carries the decoded payload plus the HTTP status instead of splitting into
//! variants. Transport failures (connection refused, timeouts, malformed JSON)
//! are folded into the same type with status 500, so callers match on one
//! shape no matter where the failure came from.

use serde_json::{json, Value};
use thiserror::Error;

/// Status code attached to failures that never produced an HTTP response.
pub const TRANSPORT_ERROR_CODE: u16 = 500;

/// A classified amoCRM failure: the decoded error body and a status code.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Code: {code}, Detail: {}", render_detail(.data))]
pub struct AmoError {
    code: u16,
    data: Value,
}

pub type Result<T> = std::result::Result<T, AmoError>;

impl AmoError {
    pub fn new(data: Value, code: u16) -> Self {
        Self { code, data }
    }

    /// Wrap a failure that happened before or instead of a usable response.
    pub fn transport(message: impl std::fmt::Display) -> Self {
        Self::new(json!({ "error": message.to_string() }), TRANSPORT_ERROR_CODE)
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn into_data(self) -> Value {
        self.data
    }

    pub fn is_unauthorized(&self) -> bool {
        self.code == 401
    }
}

fn render_detail(data: &Value) -> String {
    match data {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| match v {
                Value::String(s) => format!("{k}: {s}"),
                other => format!("{k}: {other}"),
            })
            .collect::<Vec<_>>()
            .join(", "),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
