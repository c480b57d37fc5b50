use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{ContentRecord, Snapshot, SnapshotOrigin},
    services::{BuildRequest, ProgressFn},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Default, Deserialize)]
pub struct RefreshRequest {
    pub max_pages: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub filename: String,
    pub origin: SnapshotOrigin,
    pub count: usize,
    pub records: Vec<ContentRecord>,
}

impl SnapshotResponse {
    fn new(snapshot: Snapshot, origin: SnapshotOrigin) -> Self {
        Self {
            filename: snapshot.filename,
            origin,
            count: snapshot.records.len(),
            records: snapshot.records,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SnapshotListResponse {
    pub latest: Option<String>,
    pub snapshots: Vec<String>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// List snapshot files, oldest first
pub async fn list_snapshots(
    State(state): State<AppState>,
) -> AppResult<Json<SnapshotListResponse>> {
    let snapshots = state.service.store().list()?;
    Ok(Json(SnapshotListResponse {
        latest: snapshots.last().cloned(),
        snapshots,
    }))
}

/// Latest snapshot, building one when none can be loaded
pub async fn get_snapshot(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<SnapshotResponse>> {
    let request = BuildRequest {
        credentials: state.settings.credentials.clone(),
        force_refresh: false,
        max_pages: state.settings.default_max_pages,
    };

    run_build(&state, &request_id, request).await
}

/// Force a fresh aggregation pass
pub async fn refresh_snapshot(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Option<Json<RefreshRequest>>,
) -> AppResult<Json<SnapshotResponse>> {
    let refresh = body.map(|Json(body)| body).unwrap_or_default();
    let max_pages = refresh
        .max_pages
        .unwrap_or(state.settings.default_max_pages);

    if max_pages == 0 {
        return Err(AppError::Configuration(
            "max_pages must be at least 1".to_string(),
        ));
    }

    let request = BuildRequest {
        credentials: state.settings.credentials.clone(),
        force_refresh: true,
        max_pages,
    };

    run_build(&state, &request_id, request).await
}

async fn run_build(
    state: &AppState,
    request_id: &RequestId,
    request: BuildRequest,
) -> AppResult<Json<SnapshotResponse>> {
    let _guard = state.rebuild_lock.lock().await;

    tracing::info!(
        request_id = %request_id,
        force_refresh = request.force_refresh,
        max_pages = request.max_pages,
        "Processing snapshot request"
    );

    let progress_id = request_id.clone();
    let progress = move |message: &str, fraction: f64| {
        tracing::info!(
            request_id = %progress_id,
            fraction = fraction,
            "{}",
            message
        );
    };

    let (snapshot, origin) = state
        .service
        .load_or_build(&request, Some(&progress as &ProgressFn<'_>))
        .await?;

    tracing::info!(
        request_id = %request_id,
        filename = %snapshot.filename,
        records = snapshot.len(),
        origin = ?origin,
        "Snapshot ready"
    );

    Ok(Json(SnapshotResponse::new(snapshot, origin)))
}
