use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use tokio::net;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::core::{Ack, CreateTodo, Todo, TodoError, TodoPage, UpdateTodo};
use crate::storage::{NewTodo, TodoStore};

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_LIMIT: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpServerConfig<'a> {
    pub port: &'a str,
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

pub async fn list_todos(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<TodoPage>, TodoError> {
    let page = params.page.unwrap_or(DEFAULT_PAGE).max(1);
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).max(1);
    let page = state.store.list(page, limit).await?;
    Ok(Json(page))
}

pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, TodoError> {
    let todo = state.store.get(&id).await?;
    Ok(Json(todo))
}

pub async fn create_todo(
    State(state): State<AppState>,
    Json(body): Json<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), TodoError> {
    let title = body
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| TodoError::Validation("title is required".to_string()))?;
    let todo = state
        .store
        .create(NewTodo {
            title,
            description: body.description.unwrap_or_default(),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateTodo>,
) -> Result<Json<Todo>, TodoError> {
    if matches!(&body.title, Some(t) if t.trim().is_empty()) {
        return Err(TodoError::Validation("title must not be empty".to_string()));
    }
    let todo = state.store.update(&id, body).await?;
    Ok(Json(todo))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Ack>, TodoError> {
    state.store.delete(&id).await?;
    Ok(Json(Ack {
        message: "Todo deleted successfully".to_string(),
    }))
}

pub struct HttpServer {
    router: Router,
    listener: net::TcpListener,
}

impl HttpServer {
    pub async fn new(store: Arc<dyn TodoStore>, config: HttpServerConfig<'_>) -> anyhow::Result<Self> {
        let trace_layer =
            TraceLayer::new_for_http().make_span_with(|request: &axum::extract::Request<_>| {
                let uri = request.uri().to_string();
                tracing::info_span!("http_request", method = ?request.method(), uri)
            });

        let state = AppState { store };

        let router = Router::new()
            .route("/health", get(health_route))
            .nest("/api", api_routes())
            .layer(trace_layer)
            .layer(CorsLayer::permissive())
            .with_state(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.port.parse::<u16>().unwrap_or(5000)));
        let listener = net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to listen on port {}", config.port))?;

        Ok(Self { router, listener })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        self.listener.local_addr().context("listener has no address")
    }

    pub async fn run(self) -> anyhow::Result<()> {
        tracing::debug!("listening on {:?}", self.listener.local_addr());
        axum::serve(self.listener, self.router)
            .await
            .context("received error from running server")?;
        Ok(())
    }
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/todos", get(list_todos))
        .route("/todos", post(create_todo))
        .route("/todos/{id}", get(get_todo))
        .route("/todos/{id}", put(update_todo))
        .route("/todos/{id}", delete(delete_todo))
}

async fn health_route() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}
