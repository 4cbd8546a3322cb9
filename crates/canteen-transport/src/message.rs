//! # Request & Response Messages
//!
//! The two values exchanged across the [`Transport`](crate::Transport) seam.
//!
//! An [`ApiRequest`] is a fully described call: method, path relative to the
//! backend base URL, query pairs, body and (optionally) the bearer credential.
//! Keeping it a plain value lets the mock transport record and assert on exactly
//! what would have gone over the wire.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Generic failure text used when the backend gives no `detail`.
pub const GENERIC_FAILURE: &str = "API request failed";

/// HTTP verbs used by the canteen backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        };
        f.write_str(verb)
    }
}

/// Request payload encodings.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    /// `application/x-www-form-urlencoded`, used by the token endpoint.
    Form(Vec<(String, String)>),
}

/// A single call to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            bearer: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    /// Serializes `payload` as the JSON body.
    pub fn json<T: Serialize>(mut self, payload: &T) -> Result<Self, serde_json::Error> {
        self.body = RequestBody::Json(serde_json::to_value(payload)?);
        Ok(self)
    }

    pub fn form<K: Into<String>, V: Into<String>>(
        mut self,
        fields: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        self.body = RequestBody::Form(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }

    /// Short `METHOD path` label used in logs and mock diagnostics.
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// A backend reply. Non-2xx statuses are still `Ok` at the transport level.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Parsed JSON body, or `Value::Null` when the body was empty or not JSON.
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn ok(body: Value) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Extracts the backend's machine `detail` message.
    ///
    /// FastAPI sends either a string or, for validation failures, a list of
    /// objects each carrying a `msg`; the latter are joined with `"; "`.
    pub fn detail(&self) -> Option<String> {
        match self.body.get("detail")? {
            Value::String(message) if !message.is_empty() => Some(message.clone()),
            Value::Array(entries) => {
                let messages: Vec<&str> = entries
                    .iter()
                    .filter_map(|entry| entry.get("msg").and_then(Value::as_str))
                    .collect();
                if messages.is_empty() {
                    None
                } else {
                    Some(messages.join("; "))
                }
            }
            _ => None,
        }
    }

    /// The `detail` message, or [`GENERIC_FAILURE`].
    pub fn failure_message(&self) -> String {
        self.detail()
            .unwrap_or_else(|| GENERIC_FAILURE.to_string())
    }
}
