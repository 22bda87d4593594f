//! HTTP route handlers.

use std::path::Path;
use std::time::Duration;

use askama::Template;
use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::domain::StationName;
use crate::planner::{SearchError, SearchRequest};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory; every request
/// is cut off after `request_timeout`.
pub fn create_router(
    state: AppState,
    static_dir: impl AsRef<Path>,
    request_timeout: Duration,
) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/api/lines", get(list_lines))
        .route("/api/stations/search", get(search_stations))
        .route("/route", post(plan_route))
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Index page with the route form.
async fn index_page(State(state): State<AppState>) -> impl IntoResponse {
    Html(
        IndexTemplate::from_network(&state.network)
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e)),
    )
}

/// All lines with their stations and map positions.
async fn list_lines(State(state): State<AppState>) -> Json<LinesResponse> {
    Json(LinesResponse::from_network(&state.network))
}

/// Search stations by name.
async fn search_stations(
    State(state): State<AppState>,
    Query(req): Query<StationSearchRequest>,
) -> Json<StationSearchResponse> {
    let limit = req.limit.unwrap_or(10).min(50);
    let stations = state
        .network
        .search_stations(&req.q, limit)
        .into_iter()
        .map(|s| s.to_string())
        .collect();

    Json(StationSearchResponse { stations })
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Parse a required station field from the request body.
fn required_station(field: &str, value: Option<&str>) -> Result<StationName, AppError> {
    let value = value.ok_or_else(|| AppError::BadRequest {
        message: format!("Missing field: {field}"),
    })?;
    StationName::parse(value).map_err(|e| AppError::BadRequest {
        message: format!("Invalid {field} station: {e}"),
    })
}

/// Plan a route between two stations.
async fn plan_route(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    // Parse JSON manually so we can log the body on failure
    let req: RouteRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(&body), "invalid route request JSON");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    let origin = required_station("start", req.start.as_deref())?;
    let destination = required_station("end", req.end.as_deref())?;
    let request = SearchRequest::new(origin, destination);

    let answer = state.cache.plan(&state.planner(), &request).await?;

    // Return HTML or JSON based on Accept header
    if accepts_html(&headers) {
        let template = RouteResultTemplate {
            route: RouteView::from_answer(&answer),
        };
        let html = template.render().map_err(|e| AppError::Internal {
            message: format!("Template error: {}", e),
        })?;

        Ok(Html(html).into_response())
    } else {
        Ok(Json(RouteResponse::from_answer(&answer)).into_response())
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        if e.is_not_found() {
            AppError::NotFound {
                message: format!("Route not found: {e}"),
            }
        } else {
            AppError::BadRequest {
                message: e.to_string(),
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
