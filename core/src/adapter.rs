//! One call per operation: build, execute, parse.
//!
//! `TodoAdapter` is the piece the host talks to. It owns a `TodoClient` and a
//! `Transport` and performs exactly one blocking exchange per operation. No
//! retries, no caching and no shared mutable state: the adapter can be shared
//! behind an `Arc` and called from any thread.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::client::TodoClient;
use crate::error::{ApiError, Operation};
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{CreateTodo, Todo, UpdateTodo};

/// Executes a built request against the network.
///
/// Non-2xx responses must come back as `Ok`; only failures to obtain a
/// response at all (connection, DNS, TLS) are `Err`, carrying the transport's
/// error text.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, String>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, String> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, String> {
        (**self).execute(request)
    }
}

#[derive(Debug, Clone)]
pub struct TodoAdapter<T> {
    client: TodoClient,
    transport: T,
}

impl<T: Transport> TodoAdapter<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    pub fn list_todos(&self) -> Result<Vec<Todo>, ApiError> {
        let response = self.send(Operation::List, self.client.build_list_todos())?;
        self.client.parse_list_todos(response).inspect_err(log_failure)
    }

    pub fn create_todo(&self, input: &CreateTodo) -> Result<Todo, ApiError> {
        let request = self.client.build_create_todo(input)?;
        let response = self.send(Operation::Create, request)?;
        self.client.parse_create_todo(response).inspect_err(log_failure)
    }

    pub fn update_todo(&self, id: &str, input: &UpdateTodo) -> Result<Todo, ApiError> {
        let request = self.client.build_update_todo(id, input)?;
        let response = self.send(Operation::Update, request)?;
        self.client.parse_update_todo(response).inspect_err(log_failure)
    }

    pub fn delete_todo(&self, id: &str) -> Result<bool, ApiError> {
        let response = self.send(Operation::Delete, self.client.build_delete_todo(id))?;
        self.client.parse_delete_todo(response).inspect_err(log_failure)
    }

    /// Same request as `update_todo(id, {"completed": true})`.
    pub fn complete_todo(&self, id: &str) -> Result<Todo, ApiError> {
        self.update_todo(id, &UpdateTodo::completed())
    }

    fn send(&self, operation: Operation, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(%operation, method = %request.method, url = %request.url, "sending request");
        let response = self
            .transport
            .execute(request)
            .map_err(|message| ApiError::new(operation, message))
            .inspect_err(log_failure)?;
        debug!(%operation, status = response.status, "received response");
        Ok(response)
    }
}

fn log_failure(err: &ApiError) {
    warn!(operation = %err.operation, message = %err.message, "todo operation failed");
}
