//! HTTP surface under `/dtako`.
//!
//! Each record kind gets the same three routes: a windowed list, a lookup by
//! id and an import. Failures render as `{"code", "message"}` JSON.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::error::DtakoError;
use crate::import::ImportScope;
use crate::models::{DrivingEvent, FerryCrossing, ImportRequest, ImportSummary, ListParams, TripRow};
use crate::service::RecordService;

/// One service per record kind, shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub rows: Arc<RecordService<TripRow>>,
    pub events: Arc<RecordService<DrivingEvent>>,
    pub ferry_rows: Arc<RecordService<FerryCrossing>>,
}

impl IntoResponse for DtakoError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Self::InvalidDate { .. } => (StatusCode::BAD_REQUEST, "invalid_date"),
            Self::InvalidRange { .. } => (StatusCode::BAD_REQUEST, "invalid_range"),
            Self::InvalidFilter { .. } => (StatusCode::BAD_REQUEST, "invalid_filter"),
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            Self::SourceUnavailable => (StatusCode::SERVICE_UNAVAILABLE, "source_unavailable"),
            Self::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "timeout"),
            Self::Connection { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "connection_failed"),
            Self::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
        };
        let body = Json(json!({
            "code": code,
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_records<R>(
    State(service): State<Arc<RecordService<R>>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<R>>, DtakoError>
where
    R: ImportScope + Serialize,
{
    Ok(Json(service.list(&params).await?))
}

async fn get_record<R>(
    State(service): State<Arc<RecordService<R>>>,
    Path(id): Path<String>,
) -> Result<Json<R>, DtakoError>
where
    R: ImportScope + Serialize,
{
    Ok(Json(service.get(&id).await?))
}

async fn import_records<R>(
    State(service): State<Arc<RecordService<R>>>,
    Json(request): Json<ImportRequest>,
) -> Result<Json<ImportSummary>, DtakoError>
where
    R: ImportScope + Serialize,
{
    Ok(Json(service.import(&request).await?))
}

fn record_routes<R>(service: Arc<RecordService<R>>) -> Router
where
    R: ImportScope + Serialize,
{
    Router::new()
        .route("/", get(list_records::<R>))
        .route("/import", post(import_records::<R>))
        .route("/:id", get(get_record::<R>))
        .with_state(service)
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/dtako/rows", record_routes(state.rows))
        .nest("/dtako/events", record_routes(state.events))
        .nest("/dtako/ferry_rows", record_routes(state.ferry_rows))
        .layer(TraceLayer::new_for_http())
}
