//! In-memory stand-in for the remote todo API.
//!
//! Serves `/api/todos` and `/api/todos/{id}` behind a `token` cookie check and
//! answers failures with `{"error": "..."}` bodies, the shape the adapter
//! expects from the real service.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{DefaultBodyLimit, Path, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub deadline: Option<String>,
}

pub type Db = Arc<RwLock<HashMap<String, Todo>>>;

#[derive(Clone)]
struct AppState {
    db: Db,
    token: Arc<str>,
}

/// A failure rendered as `{"error": message}`.
struct ApiFailure(StatusCode, &'static str);

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "error": self.1 }))).into_response()
    }
}

/// Build the router. Requests must carry the cookie `token=<token>`.
pub fn app(token: &str) -> Router {
    let state = AppState {
        db: Db::default(),
        token: Arc::from(token),
    };
    let api = Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", put(update_todo).delete(delete_todo))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token))
        // Bodies past axum's 2 MB default are allowed.
        .layer(DefaultBodyLimit::disable());
    Router::new().nest("/api", api).with_state(state)
}

pub async fn run(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(token)).await
}

async fn require_token(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if cookie_token(request.headers()) == Some(&*state.token) {
        next.run(request).await
    } else {
        ApiFailure(StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
    }
}

fn cookie_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| pair.trim().strip_prefix("token="))
}

async fn list_todos(State(state): State<AppState>) -> Json<Vec<Todo>> {
    let todos = state.db.read().await;
    let mut all: Vec<Todo> = todos.values().cloned().collect();
    all.sort_by_key(|todo| todo.created_at);
    Json(all)
}

async fn create_todo(
    State(state): State<AppState>,
    Json(input): Json<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), ApiFailure> {
    if input.title.trim().is_empty() {
        return Err(ApiFailure(StatusCode::BAD_REQUEST, "Title is required"));
    }
    let todo = Todo {
        id: Uuid::new_v4().to_string(),
        title: input.title,
        description: input.description,
        deadline: input.deadline,
        completed: false,
        created_at: Utc::now(),
    };
    state.db.write().await.insert(todo.id.clone(), todo.clone());
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Todo>, ApiFailure> {
    let mut todos = state.db.write().await;
    let todo = todos
        .get_mut(&id)
        .ok_or(ApiFailure(StatusCode::NOT_FOUND, "Todo not found"))?;
    if let Some(title) = input.title {
        todo.title = title;
    }
    if let Some(description) = input.description {
        todo.description = Some(description);
    }
    if let Some(completed) = input.completed {
        todo.completed = completed;
    }
    if let Some(deadline) = input.deadline {
        todo.deadline = Some(deadline);
    }
    Ok(Json(todo.clone()))
}

async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiFailure> {
    let mut todos = state.db.write().await;
    todos
        .remove(&id)
        .map(|_| Json(json!({ "message": "Todo deleted successfully" })))
        .ok_or(ApiFailure(StatusCode::NOT_FOUND, "Todo not found"))
}
