use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use cur_report_core::{
    ingestion::inspect_upload,
    process_parquet_bytes,
    summary::{ReportSummary, DEFAULT_TOP_ITEMS},
    ConsumptionRecord, ErrorBody, ServiceConfig,
};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, warn};

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;
const UPLOAD_FIELD: &str = "file";

#[derive(Clone)]
pub struct AppState {
    config: Arc<ServiceConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub generated_at: DateTime<Utc>,
    pub records: Vec<ConsumptionRecord>,
    pub summary: ReportSummary,
}

/// Error surfaced to HTTP clients as `{"detail": ...}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }

    fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

pub fn router(config: ServiceConfig) -> Router {
    let body_limit = config.upload.max_file_size.saturating_add(MULTIPART_OVERHEAD);
    let state = AppState {
        config: Arc::new(config),
    };

    Router::new()
        .route("/", get(root))
        .route("/upload-parquet/", post(upload_parquet))
        .route("/upload-parquet/summary/", post(upload_parquet_summary))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "AWS CUR Analyzer Backend is running." }))
}

async fn upload_parquet(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Vec<ConsumptionRecord>>, ApiError> {
    run_report(&state, multipart).await.map(Json)
}

async fn upload_parquet_summary(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SummaryResponse>, ApiError> {
    let records = run_report(&state, multipart).await?;
    let summary = ReportSummary::from_records(&records, DEFAULT_TOP_ITEMS);

    Ok(Json(SummaryResponse {
        generated_at: Utc::now(),
        records,
        summary,
    }))
}

async fn run_report(
    state: &AppState,
    multipart: Multipart,
) -> Result<Vec<ConsumptionRecord>, ApiError> {
    let (file_name, contents) = read_upload(multipart).await?;

    let digest = inspect_upload(&file_name, &contents, &state.config.upload).map_err(|rejection| {
        warn!(file_name = %file_name, size = contents.len(), reason = %rejection, "upload rejected");
        ApiError::bad_request(rejection.to_string())
    })?;
    info!(
        file_name = %digest.file_name,
        size = digest.size,
        hash = %digest.hash,
        "processing upload"
    );

    let processing = state.config.processing;
    let result = tokio::task::spawn_blocking(move || process_parquet_bytes(&contents, &processing))
        .await
        .map_err(|err| {
            error!("processing task failed: {err}");
            ApiError::internal("Internal server error")
        })?;

    result.map_err(|err| ApiError::internal(ErrorBody::from(&err).error))
}

async fn read_upload(mut multipart: Multipart) -> Result<(String, Bytes), ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|err| ApiError {
        status: err.status(),
        detail: err.body_text(),
    })? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let contents = field.bytes().await.map_err(|err| ApiError {
            status: err.status(),
            detail: err.body_text(),
        })?;
        return Ok((file_name, contents));
    }

    Err(ApiError::bad_request("No file provided"))
}
