//! MCP server exposing the todo adapter to a hosting agent.
//!
//! Surface:
//! - resource `todo://`: the full todo list as JSON
//! - tools `create_todo`, `update_todo`, `complete_todo`, `delete_todo`
//!
//! Adapter calls block on the network, so each one runs on tokio's blocking
//! pool. Failed operations come back as tool results with `isError` set and
//! the adapter's message as text; the host decides what to do with them.

use std::sync::Arc;

use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars,
    schemars::JsonSchema,
    tool, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use serde::{Deserialize, Serialize};
use todo_core::{ApiError, CreateTodo, TodoAdapter, Transport, UpdateTodo};

pub const TODO_RESOURCE_URI: &str = "todo://";

const INSTRUCTIONS: &str = "Manage the user's todo list. Read the `todo://` resource to see every \
todo with its id, then use the tools to create, update, complete or delete todos by id. \
Deadlines are ISO 8601 timestamps such as 2025-05-01T12:00:00Z.";

pub type SharedAdapter = Arc<TodoAdapter<Box<dyn Transport>>>;

#[derive(Clone)]
pub struct TodoMcpServer {
    adapter: SharedAdapter,
    tool_router: ToolRouter<Self>,
}

impl TodoMcpServer {
    pub fn new(adapter: SharedAdapter) -> Self {
        Self {
            adapter,
            tool_router: Self::tool_router(),
        }
    }

    /// Read a resource by URI. Only `todo://` exists.
    pub async fn read_todo_resource(&self, uri: &str) -> Result<ReadResourceResult, McpError> {
        if uri != TODO_RESOURCE_URI {
            return Err(McpError::resource_not_found(
                format!("Unknown resource: {uri}"),
                None,
            ));
        }
        let todos = self
            .blocking(|adapter| adapter.list_todos())
            .await?
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        let json = serde_json::to_string_pretty(&todos)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(ReadResourceResult::new(vec![ResourceContents::text(
            json,
            TODO_RESOURCE_URI,
        )]))
    }

    /// Run an adapter call on the blocking pool.
    async fn blocking<T, F>(&self, f: F) -> Result<Result<T, ApiError>, McpError>
    where
        T: Send + 'static,
        F: FnOnce(&TodoAdapter<Box<dyn Transport>>) -> Result<T, ApiError> + Send + 'static,
    {
        let adapter = Arc::clone(&self.adapter);
        tokio::task::spawn_blocking(move || f(&adapter))
            .await
            .map_err(|e| McpError::internal_error(e.to_string(), None))
    }

    async fn call_adapter<T, F>(&self, f: F) -> Result<CallToolResult, McpError>
    where
        T: Serialize + Send + 'static,
        F: FnOnce(&TodoAdapter<Box<dyn Transport>>) -> Result<T, ApiError> + Send + 'static,
    {
        match self.blocking(f).await? {
            Ok(value) => ok_json(&value),
            Err(err) => Ok(CallToolResult::error(vec![Content::text(err.to_string())])),
        }
    }
}

impl ServerHandler for TodoMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(
            ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
        )
        .with_protocol_version(ProtocolVersion::LATEST)
        .with_server_info(
            Implementation::new("Todo", env!("CARGO_PKG_VERSION")).with_title("Todo MCP Server"),
        )
        .with_instructions(INSTRUCTIONS)
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let tcc = rmcp::handler::server::tool::ToolCallContext::new(self, request, context);
        self.tool_router.call(tcc).await
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            meta: None,
            next_cursor: None,
        })
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult {
            resources: vec![todo_list_resource()],
            meta: None,
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        self.read_todo_resource(&request.uri).await
    }
}

fn todo_list_resource() -> Resource {
    let mut resource = RawResource::new(TODO_RESOURCE_URI, "todo-list");
    resource.description = Some("Get the todo list from the server.".to_string());
    resource.mime_type = Some("application/json".to_string());
    resource.no_annotation()
}

// ============================================================================
// Tool Parameter Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct TodoIdParams {
    /// ID of the todo
    pub todo_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateTodoParams {
    /// Title of the todo
    pub title: String,
    /// Optional description of the todo
    pub description: Option<String>,
    /// Optional deadline in ISO format (e.g., '2025-05-01T12:00:00Z')
    pub deadline: Option<String>,
}

impl From<CreateTodoParams> for CreateTodo {
    fn from(params: CreateTodoParams) -> Self {
        CreateTodo {
            title: params.title,
            description: params.description,
            deadline: params.deadline,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UpdateTodoParams {
    /// ID of the todo to update
    pub todo_id: String,
    /// Optional new title
    pub title: Option<String>,
    /// Optional new description
    pub description: Option<String>,
    /// Optional completion status
    pub completed: Option<bool>,
    /// Optional new deadline in ISO format
    pub deadline: Option<String>,
}

impl UpdateTodoParams {
    fn into_parts(self) -> (String, UpdateTodo) {
        let update = UpdateTodo {
            title: self.title,
            description: self.description,
            completed: self.completed,
            deadline: self.deadline,
        };
        (self.todo_id, update)
    }
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl TodoMcpServer {
    #[tool(
        name = "delete_todo",
        description = "Delete a todo. Returns true if deletion was successful."
    )]
    async fn delete_todo(&self, params: Parameters<TodoIdParams>) -> Result<CallToolResult, McpError> {
        let id = params.0.todo_id;
        self.call_adapter(move |adapter| adapter.delete_todo(&id)).await
    }

    #[tool(
        name = "create_todo",
        description = "Create a new todo. Returns the created todo."
    )]
    async fn create_todo(
        &self,
        params: Parameters<CreateTodoParams>,
    ) -> Result<CallToolResult, McpError> {
        let input = CreateTodo::from(params.0);
        self.call_adapter(move |adapter| adapter.create_todo(&input)).await
    }

    #[tool(
        name = "update_todo",
        description = "Update an existing todo. Only the fields provided are changed. Returns the updated todo."
    )]
    async fn update_todo(
        &self,
        params: Parameters<UpdateTodoParams>,
    ) -> Result<CallToolResult, McpError> {
        let (id, update) = params.0.into_parts();
        self.call_adapter(move |adapter| adapter.update_todo(&id, &update)).await
    }

    #[tool(
        name = "complete_todo",
        description = "Mark a todo as completed. Returns the updated todo."
    )]
    async fn complete_todo(
        &self,
        params: Parameters<TodoIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let id = params.0.todo_id;
        self.call_adapter(move |adapter| adapter.complete_todo(&id)).await
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn ok_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Server Entry Point
// ============================================================================

/// Run the MCP server with stdio transport until the host disconnects.
pub async fn serve_stdio(adapter: SharedAdapter) -> anyhow::Result<()> {
    use rmcp::transport::io::stdio;

    let service = TodoMcpServer::new(adapter).serve(stdio()).await?;
    let reason = service.waiting().await?;
    tracing::info!(?reason, "mcp session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::Value;
    use todo_core::{Credential, HttpMethod, HttpRequest, HttpResponse, TodoClient};

    use super::*;

    /// Answers every request with one fixed response and records what it saw.
    struct Canned {
        response: HttpResponse,
        seen: Arc<Mutex<Vec<HttpRequest>>>,
    }

    impl Transport for Canned {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, String> {
            self.seen.lock().unwrap().push(request);
            Ok(self.response.clone())
        }
    }

    fn server(status: u16, body: &str) -> (TodoMcpServer, Arc<Mutex<Vec<HttpRequest>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let transport = Canned {
            response: HttpResponse::new(status, body),
            seen: Arc::clone(&seen),
        };
        let client = TodoClient::new("https://todo.test/api", Credential::new("tok"));
        let adapter: SharedAdapter = Arc::new(TodoAdapter::new(client, Box::new(transport)));
        (TodoMcpServer::new(adapter), seen)
    }

    fn as_json<T: Serialize>(value: &T) -> Value {
        serde_json::to_value(value).unwrap()
    }

    fn text_of(result: &CallToolResult) -> String {
        as_json(result)["content"][0]["text"].as_str().unwrap().to_string()
    }

    fn is_error(result: &CallToolResult) -> bool {
        as_json(result)["isError"] == Value::Bool(true)
    }

    #[tokio::test]
    async fn create_todo_sends_title_only_and_returns_record() {
        let record = r#"{"id":"42","title":"Buy milk","completed":false}"#;
        let (server, seen) = server(201, record);

        let result = server
            .create_todo(Parameters(CreateTodoParams {
                title: "Buy milk".to_string(),
                description: None,
                deadline: None,
            }))
            .await
            .unwrap();

        assert!(!is_error(&result));
        let returned: Value = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(returned, serde_json::from_str::<Value>(record).unwrap());

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].method, HttpMethod::Post);
        assert_eq!(seen[0].body.as_deref(), Some(r#"{"title":"Buy milk"}"#));
    }

    #[tokio::test]
    async fn update_todo_sends_only_supplied_fields() {
        let (server, seen) = server(200, r#"{"id":"42","title":"t","completed":false}"#);

        server
            .update_todo(Parameters(UpdateTodoParams {
                todo_id: "42".to_string(),
                title: None,
                description: None,
                completed: None,
                deadline: Some("2025-05-01T12:00:00Z".to_string()),
            }))
            .await
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].url, "https://todo.test/api/todos/42");
        assert_eq!(seen[0].body.as_deref(), Some(r#"{"deadline":"2025-05-01T12:00:00Z"}"#));
    }

    #[tokio::test]
    async fn complete_todo_matches_update_with_completed() {
        let (server, seen) = server(200, r#"{"id":"7","title":"t","completed":true}"#);

        let completed = server
            .complete_todo(Parameters(TodoIdParams {
                todo_id: "7".to_string(),
            }))
            .await
            .unwrap();
        let updated = server
            .update_todo(Parameters(UpdateTodoParams {
                todo_id: "7".to_string(),
                title: None,
                description: None,
                completed: Some(true),
                deadline: None,
            }))
            .await
            .unwrap();

        assert_eq!(text_of(&completed), text_of(&updated));
        let seen = seen.lock().unwrap();
        assert_eq!(seen[0], seen[1]);
    }

    #[tokio::test]
    async fn delete_todo_returns_true() {
        let (server, _) = server(200, r#"{"message":"Todo deleted successfully"}"#);
        let result = server
            .delete_todo(Parameters(TodoIdParams {
                todo_id: "42".to_string(),
            }))
            .await
            .unwrap();
        assert!(!is_error(&result));
        assert_eq!(text_of(&result), "true");
    }

    #[tokio::test]
    async fn delete_failure_is_a_tool_error_with_message() {
        let (server, _) = server(404, r#"{"error":"not found"}"#);
        let result = server
            .delete_todo(Parameters(TodoIdParams {
                todo_id: "99".to_string(),
            }))
            .await
            .unwrap();
        assert!(is_error(&result));
        assert_eq!(text_of(&result), "Failed to delete todo: not found");
    }

    #[tokio::test]
    async fn todo_resource_returns_list_as_json() {
        let (server, seen) = server(200, r#"[{"id":"1","title":"A","completed":false}]"#);

        let result = server.read_todo_resource(TODO_RESOURCE_URI).await.unwrap();
        let contents = as_json(&result)["contents"][0].clone();
        assert_eq!(contents["uri"], TODO_RESOURCE_URI);
        let todos: Value = serde_json::from_str(contents["text"].as_str().unwrap()).unwrap();
        assert_eq!(todos[0]["title"], "A");
        assert_eq!(seen.lock().unwrap()[0].method, HttpMethod::Get);
    }

    #[tokio::test]
    async fn todo_resource_failure_carries_prefix() {
        let (server, _) = server(401, r#"{"error":"Unauthorized"}"#);
        let err = server.read_todo_resource(TODO_RESOURCE_URI).await.unwrap_err();
        assert_eq!(err.message, "Failed to get todos: Unauthorized");
    }

    #[tokio::test]
    async fn unknown_resource_is_not_found() {
        let (server, seen) = server(200, "[]");
        let err = server.read_todo_resource("todo://other").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RESOURCE_NOT_FOUND);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn info_advertises_tools_and_resources() {
        let (server, _) = server(200, "[]");
        let info = server.get_info();
        assert_eq!(info.server_info.name, "Todo");
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());
    }

    #[test]
    fn router_lists_the_four_tools() {
        let (server, _) = server(200, "[]");
        let mut names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();
        assert_eq!(names, ["complete_todo", "create_todo", "delete_todo", "update_todo"]);
    }

    #[test]
    fn resource_listing_describes_todo_uri() {
        let resource = as_json(&todo_list_resource());
        assert_eq!(resource["uri"], TODO_RESOURCE_URI);
        assert_eq!(resource["mimeType"], "application/json");
    }
}
