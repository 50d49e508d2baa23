use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{MethodRouter, get, post},
};
use parking_lot::RwLock;
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::pages;
use crate::store::{Store, StoreError};

/// Identifier of a routed page. Create and edit variants share a form page;
/// the bound `:id` segment is what tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    TaskList,
    TaskForm,
    ProjectTable,
    ProjectForm,
}

#[derive(Debug, Clone, Copy)]
pub struct RouteSpec {
    pub pattern: &'static str,
    pub page: Page,
}

/// Where an exact match on the root path lands.
pub const ROOT_REDIRECT: &str = "/tasks";

/// The navigation contract: every page of the application and the path
/// pattern that reaches it. Patterns must be unique; axum rejects duplicate
/// registrations when the router is built.
pub const ROUTE_TABLE: &[RouteSpec] = &[
    RouteSpec {
        pattern: "/tasks",
        page: Page::TaskList,
    },
    RouteSpec {
        pattern: "/tasks/:id",
        page: Page::TaskForm,
    },
    RouteSpec {
        pattern: "/tasks-create",
        page: Page::TaskForm,
    },
    RouteSpec {
        pattern: "/projects",
        page: Page::ProjectTable,
    },
    RouteSpec {
        pattern: "/projects/:id",
        page: Page::ProjectForm,
    },
    RouteSpec {
        pattern: "/project-create",
        page: Page::ProjectForm,
    },
];

#[derive(Clone)]
pub struct AppState {
    store: Arc<RwLock<Store>>,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    pub fn with_shared(store: Arc<RwLock<Store>>) -> Self {
        Self { store }
    }

    pub(crate) fn store(&self) -> Arc<RwLock<Store>> {
        self.store.clone()
    }
}

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Invalid(String),
    Internal(String),
}

impl AppError {
    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        AppError::Invalid(message.into())
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::ProjectNotFound(_) | StoreError::TaskNotFound(_) => {
                AppError::NotFound(value.to_string())
            }
            StoreError::MissingProject(_) => AppError::Invalid(value.to_string()),
        }
    }
}

impl From<askama::Error> for AppError {
    fn from(value: askama::Error) -> Self {
        AppError::Internal(value.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(message) => {
                pages::error_response(StatusCode::NOT_FOUND, &message)
            }
            AppError::Invalid(message) => {
                pages::error_response(StatusCode::BAD_REQUEST, &message)
            }
            AppError::Internal(message) => {
                pages::error_response(StatusCode::INTERNAL_SERVER_ERROR, &message)
            }
        }
    }
}

fn page_routes(page: Page) -> MethodRouter<AppState> {
    match page {
        Page::TaskList => get(pages::task_list),
        Page::TaskForm => get(pages::task_form).post(pages::save_task),
        Page::ProjectTable => get(pages::project_table),
        Page::ProjectForm => get(pages::project_form).post(pages::save_project),
    }
}

pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/", get(redirect_root))
        .route("/health", get(health));
    for spec in ROUTE_TABLE {
        app = app.route(spec.pattern, page_routes(spec.page));
    }
    app.route("/tasks/:id/delete", post(pages::delete_task))
        .route("/projects/:id/delete", post(pages::delete_project))
        .fallback(pages::not_found)
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, store: Store) -> std::io::Result<()> {
    let state = AppState::new(store);
    let app = router(state).layer(TraceLayer::new_for_http());
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn redirect_root() -> Redirect {
    Redirect::to(ROOT_REDIRECT)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
