//! Synchronous API client core for the remote todo service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). `TodoAdapter` pairs the
//! client with a `Transport` so each logical operation becomes exactly one
//! HTTP exchange.
//!
//! # Design
//! - `TodoClient` is stateless: it holds the base URL and the credential.
//! - Each operation is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit.
//! - Every failure is an `ApiError`: operation label plus message.

pub mod adapter;
pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use adapter::{TodoAdapter, Transport};
pub use client::TodoClient;
pub use error::{ApiError, Operation};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{CreateTodo, Credential, Todo, UpdateTodo};
