//! MCP adapter for a remote todo-list service.
//!
//! # Overview
//! `todo-mcp` is launched by a hosting agent and speaks MCP over stdio. It
//! exposes the `todo://` resource and four tools, each of which becomes one
//! HTTP call against the todo API through `todo_core::TodoAdapter`.
//!
//! # Design
//! - `config`: flags and environment (`TOKEN`, `TODO_API_URL`), built once
//!   and passed in explicitly.
//! - `transport`: blocking ureq implementation of `todo_core::Transport`.
//! - `mcp`: rmcp server handler; adapter calls run on the blocking pool.

pub mod config;
pub mod mcp;
pub mod transport;

use std::sync::Arc;

use todo_core::{TodoAdapter, TodoClient, Transport};

pub use config::Config;
pub use mcp::{SharedAdapter, TodoMcpServer, TODO_RESOURCE_URI};
pub use transport::UreqTransport;

/// Build the adapter described by `config`.
pub fn build_adapter(config: &Config) -> SharedAdapter {
    if config.token.is_empty() {
        tracing::warn!("TOKEN is not set; requests will be sent with an empty credential");
    }
    let client = TodoClient::new(&config.base_url, config.token.clone());
    let transport: Box<dyn Transport> = Box::new(UreqTransport::new(config.timeout()));
    Arc::new(TodoAdapter::new(client, transport))
}

/// Serve MCP on stdio until the host disconnects.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let adapter = build_adapter(&config);
    tracing::info!(base_url = %adapter.client().base_url(), "starting todo mcp server");
    mcp::serve_stdio(adapter).await
}
