//! Domain DTOs for the todo API.
//!
//! # Design
//! `Todo` is owned by the remote service. The adapter keeps the JSON object
//! exactly as the server sent it, explicit nulls and odd types included, and
//! offers read-only accessors for the fields it knows about. Serializing a
//! `Todo` yields the server's record unchanged.
//!
//! Request payloads carry only what the caller supplied: every optional field
//! is skipped during serialization when absent, giving partial-update
//! semantics rather than "set to null".

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single todo item returned by the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Todo(Map<String, Value>);

impl Todo {
    /// The server-assigned identifier. Numeric ids are rendered as text.
    pub fn id(&self) -> Option<String> {
        match self.0.get("id")? {
            Value::String(id) => Some(id.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.str_field("title")
    }

    pub fn description(&self) -> Option<&str> {
        self.str_field("description")
    }

    /// ISO-8601 timestamp, passed through as-is.
    pub fn deadline(&self) -> Option<&str> {
        self.str_field("deadline")
    }

    /// Missing or null counts as not completed.
    pub fn completed(&self) -> bool {
        self.0.get("completed").and_then(Value::as_bool).unwrap_or(false)
    }

    /// Any field, including ones the adapter does not interpret.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for Todo {
    fn from(record: Map<String, Value>) -> Self {
        Self(record)
    }
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

impl CreateTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Request payload for updating an existing todo. Only the fields present in
/// the JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateTodo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

impl UpdateTodo {
    /// The payload sent by `complete`: `{"completed": true}` and nothing else.
    pub fn completed() -> Self {
        Self {
            completed: Some(true),
            ..Self::default()
        }
    }
}

/// Static authentication token sent as the `token` cookie.
///
/// An empty credential is allowed; the remote service rejects it.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value for the `Cookie` request header.
    pub fn cookie(&self) -> String {
        format!("token={}", self.0)
    }
}

impl From<String> for Credential {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}
