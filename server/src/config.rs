//! Command-line and environment configuration.
//!
//! Values come from flags first, then environment variables (a `.env` file
//! in the working directory is loaded into the environment before parsing).

use std::time::Duration;

use clap::Parser;
use todo_core::Credential;

pub const DEFAULT_BASE_URL: &str = "https://thetodaytodo.netlify.app/api";

#[derive(Debug, Clone, Parser)]
#[command(name = "todo-mcp", version, about = "Expose a remote todo list over MCP stdio")]
pub struct Config {
    /// Token sent as the `token` cookie on every request
    #[arg(long, env = "TOKEN", default_value = "", hide_env_values = true, hide_default_value = true)]
    pub token: Credential,

    /// Base URL of the todo API, including the `/api` prefix
    #[arg(long, env = "TODO_API_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Give up on a request after this many seconds (no limit when unset)
    #[arg(long, env = "TODO_API_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

impl Config {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
