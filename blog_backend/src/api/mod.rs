mod auth;
mod blog_info;
mod comments;
mod posts;

pub use auth::AuthUser;

use crate::auth::SessionService;
use crate::blog::{BlogError, BlogService};
use crate::config::BlogConfig;
use crate::database::Database;
use crate::schema::{FieldError, ValidationErrors};
use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: BlogConfig,
    pub blog: BlogService,
    pub sessions: SessionService,
}

impl AppState {
    pub fn new(config: BlogConfig, database: Database) -> Self {
        let sessions = SessionService::new(database.clone(), &config.session);
        Self {
            config,
            blog: BlogService::new(database),
            sessions,
        }
    }
}

pub(crate) type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationErrors),
    Unauthorized,
    NotFound(String),
    PayloadTooLarge(String),
    Internal(anyhow::Error),
}

impl ApiError {
    fn into_response_parts(self) -> (StatusCode, ErrorResponse) {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    message: errors.to_string(),
                    errors: Some(errors.errors),
                },
            ),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::message("Unauthorized"),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse::message(msg)),
            ApiError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, ErrorResponse::message(msg))
            }
            ApiError::Internal(err) => {
                tracing::error!(error = ?err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::message("internal server error"),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.into_response_parts();
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<BlogError> for ApiError {
    fn from(err: BlogError) -> Self {
        match err {
            BlogError::Validation(errors) => ApiError::Validation(errors),
            BlogError::NotFound(what) => ApiError::NotFound(not_found_message(what)),
            BlogError::Storage(err) => ApiError::Internal(err),
        }
    }
}

/// Bodies over the configured limit are 413; any other rejection (malformed
/// JSON, missing or mistyped fields, wrong content type) is a validation
/// error on the body itself.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::PayloadTooLarge(rejection.body_text());
        }
        ApiError::Validation(ValidationErrors::single("body", rejection.body_text()))
    }
}

pub(crate) fn not_found_message(what: &str) -> String {
    let mut chars = what.chars();
    match chars.next() {
        Some(first) => format!("{}{} not found", first.to_uppercase(), chars.as_str()),
        None => "Not found".to_string(),
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
}

impl ErrorResponse {
    fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SuccessResponse {
    success: bool,
}

impl SuccessResponse {
    pub(crate) fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
    version: &'static str,
    api_port: u16,
    posts: usize,
}

async fn health_handler(State(state): State<AppState>) -> ApiResult<HealthResponse> {
    let posts = state.blog.count_posts()?;
    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        api_port: state.config.api_port,
        posts,
    }))
}

pub fn router(state: AppState) -> Router {
    let max_body_bytes = state.config.http.max_body_bytes;
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/blog-info",
            get(blog_info::get_blog_info).put(blog_info::update_blog_info),
        )
        .route("/api/posts", get(posts::list_posts).post(posts::create_post))
        .route("/api/posts/:id", get(posts::get_post))
        .route("/api/posts/:id/like", post(posts::like_post))
        .route(
            "/api/posts/:id/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route("/api/comments/:id", delete(comments::delete_comment))
        .route("/api/auth/user", get(auth::current_user))
        .route("/api/logout", post(auth::logout))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Tries to bind to the given port, or finds the next available port
async fn find_available_port(start_port: u16) -> Result<(TcpListener, u16)> {
    const MAX_PORT_ATTEMPTS: u16 = 100;

    for offset in 0..MAX_PORT_ATTEMPTS {
        let Some(port) = start_port.checked_add(offset) else {
            break;
        };
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        match TcpListener::bind(addr).await {
            Ok(listener) => return Ok((listener, port)),
            Err(e) => {
                if offset == 0 {
                    tracing::debug!(port, error = %e, "Port in use, trying next port");
                }
                continue;
            }
        }
    }

    anyhow::bail!(
        "Could not find available port in range {}-{}",
        start_port,
        start_port.saturating_add(MAX_PORT_ATTEMPTS - 1)
    )
}

pub async fn serve_http(config: BlogConfig, database: Database) -> Result<()> {
    let requested_port = config.api_port;
    let (listener, actual_port) = find_available_port(requested_port).await?;
    if actual_port != requested_port {
        tracing::warn!(
            requested_port,
            actual_port,
            "Configured port was in use, bound to next available port"
        );
    }

    let mut config = config;
    config.api_port = actual_port;
    tracing::info!(
        max_body_kb = config.http.max_body_bytes / 1024,
        session_cookie = %config.session.cookie_name,
        "configured HTTP limits"
    );
    let state = AppState::new(config, database);
    serve_with_listener(listener, state).await
}

/// Serves the API on an already bound listener.
pub async fn serve_with_listener(listener: TcpListener, state: AppState) -> Result<()> {
    let addr = listener.local_addr()?;
    let router = router(state);
    tracing::info!(?addr, "HTTP server listening");
    axum::serve(listener, router.into_make_service()).await?;
    Ok(())
}
