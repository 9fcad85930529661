//! Error type for the todo adapter.
//!
//! # Design
//! There is a single failure shape: the operation that failed plus a
//! human-readable message. Authentication failures, unknown ids, validation
//! errors, transport errors and malformed bodies all land here and differ only
//! in their message text, which usually comes straight from the server's
//! `error` field.

use std::fmt;

use thiserror::Error;

/// Message used when a failed response carries no usable `error` field.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// The logical operation an `ApiError` belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Fixed prefix placed in front of every failure message.
    pub fn failure_prefix(self) -> &'static str {
        match self {
            Operation::List => "Failed to get todos",
            Operation::Create => "Failed to create todo",
            Operation::Update => "Failed to update todo",
            Operation::Delete => "Failed to delete todo",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// A remote todo operation failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {message}", .operation.failure_prefix())]
pub struct ApiError {
    pub operation: Operation,
    pub message: String,
}

impl ApiError {
    pub fn new(operation: Operation, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}
