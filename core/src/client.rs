//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only the base URL and the credential and carries no
//! mutable state between calls. Each operation is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that consumes
//! an `HttpResponse`. `TodoAdapter` wires the two together through a
//! `Transport`.
//!
//! Identifiers are substituted into paths verbatim. The remote service owns
//! them and the adapter neither validates nor escapes them.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, Operation, UNKNOWN_ERROR};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateTodo, Credential, Todo, UpdateTodo};

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
    credential: Credential,
}

impl TodoClient {
    pub fn new(base_url: &str, credential: Credential) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credential,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/todos".to_string(), None)
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        let body = encode(Operation::Create, input)?;
        Ok(self.request(HttpMethod::Post, "/todos".to_string(), Some(body)))
    }

    pub fn build_update_todo(&self, id: &str, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        let body = encode(Operation::Update, input)?;
        Ok(self.request(HttpMethod::Put, format!("/todos/{id}"), Some(body)))
    }

    pub fn build_delete_todo(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, format!("/todos/{id}"), None)
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        check_status(Operation::List, &response, 200)?;
        decode(Operation::List, &response)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(Operation::Create, &response, 201)?;
        decode(Operation::Create, &response)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(Operation::Update, &response, 200)?;
        decode(Operation::Update, &response)
    }

    /// The body of a successful delete is ignored.
    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<bool, ApiError> {
        check_status(Operation::Delete, &response, 200)?;
        Ok(true)
    }

    fn request(&self, method: HttpMethod, path: String, body: Option<String>) -> HttpRequest {
        HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            headers: vec![
                ("Cookie".to_string(), self.credential.cookie()),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
            body,
        }
    }
}

fn encode<T: serde::Serialize>(operation: Operation, input: &T) -> Result<String, ApiError> {
    serde_json::to_string(input)
        .map_err(|e| ApiError::new(operation, format!("invalid request body: {e}")))
}

fn decode<T: DeserializeOwned>(operation: Operation, response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body)
        .map_err(|e| ApiError::new(operation, format!("invalid response body: {e}")))
}

/// Turn any status other than `expected` into an `ApiError`.
fn check_status(operation: Operation, response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    Err(ApiError::new(operation, error_message(&response.body)))
}

/// Pull the server's `error` field out of a failure body.
///
/// Missing or null fields and unparsable bodies yield `UNKNOWN_ERROR`.
/// Non-string values are rendered as compact JSON.
pub fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return UNKNOWN_ERROR.to_string();
    };
    match value.get("error") {
        Some(Value::String(message)) => message.clone(),
        Some(Value::Null) | None => UNKNOWN_ERROR.to_string(),
        Some(other) => other.to_string(),
    }
}
