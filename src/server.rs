//! HTTP surface: health check and the upload-and-analyse endpoint.
//!
//! | Route | Method | Body |
//! |-------|--------|------|
//! | `/health`, `/api/health` | GET | `{"status":"ok"}` |
//! | `/analyze`, `/api/analyze` | POST | multipart `file`, query `output=pdf\|json` |
//!
//! Failures are answered with `{"detail": "..."}` and the status from
//! [`BrdError::status_code`].

use crate::analyze::analyze_document;
use crate::config::{AnalyzerConfig, ServerConfig};
use crate::error::BrdError;
use crate::output::{content_disposition, OutputMode, ReportArtifact};
use crate::pipeline::llm::{ChatCompletionClient, CompletionService};
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::QueryRejection;
use axum::extract::{DefaultBodyLimit, Multipart, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Name of the multipart field carrying the document.
pub const UPLOAD_FIELD: &str = "file";

/// Upload name used when the client sends none.
const FALLBACK_UPLOAD_NAME: &str = "document";

/// Immutable state shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AnalyzerConfig>,
    pub service: Arc<dyn CompletionService>,
    /// Body limit, echoed in `413` responses.
    pub max_upload_bytes: usize,
}

impl AppState {
    /// State backed by the real chat-completion client.
    pub fn new(config: AnalyzerConfig, server: &ServerConfig) -> Self {
        let service = Arc::new(ChatCompletionClient::new(&config));
        Self::with_service(config, service, server)
    }

    /// State with an injected completion service.
    pub fn with_service(
        config: AnalyzerConfig,
        service: Arc<dyn CompletionService>,
        server: &ServerConfig,
    ) -> Self {
        Self {
            config: Arc::new(config),
            service,
            max_upload_bytes: server.max_upload_bytes,
        }
    }
}

/// Build the router with all endpoints and middleware.
pub fn router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;
    Router::new()
        .route("/health", get(health))
        .route("/api/health", get(health))
        .route("/analyze", post(analyze))
        .route("/api/analyze", post(analyze))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `server.addr` and serve until the process is stopped.
pub async fn serve(state: AppState, server: &ServerConfig) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(&server.addr).await?;
    info!(
        "Listening on {} (model {}, upload limit {} bytes)",
        listener.local_addr()?,
        state.config.model,
        server.max_upload_bytes
    );
    axum::serve(listener, router(state)).await
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Default, Deserialize)]
struct AnalyzeParams {
    output: Option<String>,
}

async fn analyze(
    State(state): State<AppState>,
    params: Result<Query<AnalyzeParams>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, BrdError> {
    let mode = match params {
        Ok(Query(AnalyzeParams {
            output: Some(value),
        })) => value.parse::<OutputMode>()?,
        Ok(_) => OutputMode::default(),
        Err(e) => {
            return Err(BrdError::InvalidQuery {
                detail: e.body_text(),
            })
        }
    };
    let mut multipart = multipart.map_err(|e| BrdError::InvalidUpload {
        detail: e.body_text(),
    })?;

    let (filename, data) = read_upload(&mut multipart, state.max_upload_bytes).await?;
    let artifact = analyze_document(
        data,
        &filename,
        mode,
        state.service.as_ref(),
        &state.config,
    )
    .await?;
    artifact_response(artifact)
}

/// Pull the `file` field out of the multipart body, skipping other fields.
async fn read_upload(
    multipart: &mut Multipart,
    limit: usize,
) -> Result<(String, Vec<u8>), BrdError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .filter(|n| !n.is_empty())
            .unwrap_or(FALLBACK_UPLOAD_NAME)
            .to_string();
        let data = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
        return Ok((filename, data.to_vec()));
    }
    Err(BrdError::MissingUpload)
}

fn multipart_error(e: MultipartError, limit: usize) -> BrdError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        BrdError::UploadTooLarge { limit }
    } else {
        BrdError::InvalidUpload {
            detail: e.body_text(),
        }
    }
}

fn artifact_response(artifact: ReportArtifact) -> Result<Response, BrdError> {
    match artifact {
        ReportArtifact::Json(report) => Ok(Json(report).into_response()),
        ReportArtifact::Pdf { bytes, filename } => Ok((
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (header::CONTENT_DISPOSITION, content_disposition(&filename)),
                (header::CACHE_CONTROL, "no-store".to_string()),
            ],
            bytes,
        )
            .into_response()),
    }
}

impl IntoResponse for BrdError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_client_error() {
            warn!("Rejected request ({}): {}", status.as_u16(), self);
        } else {
            error!("Request failed ({}): {}", status.as_u16(), self);
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
