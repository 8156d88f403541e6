//! HTTP boundary: routes, multipart handling, and error→status mapping.
//!
//! The handlers are thin shims over [`crate::extract`]: they pull the PDF
//! bytes out of the request, call the matching entry point with the shared
//! detector, and serialise the outcome. Every [`ExtractError`] becomes a
//! JSON `{error, code}` body with the status from
//! [`ExtractError::status_code`] — no error is swallowed on the way out.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServiceConfig;
use crate::error::ExtractError;
use crate::extract;
use crate::output::{DetailedDocument, DocumentSummary};
use crate::pipeline::input;
use crate::pipeline::ocr::{self, HealthReport, TextDetector};

/// Uploads above this size are rejected before any processing.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

// ── State ────────────────────────────────────────────────────────────────

/// Shared application state: the injected detector and process config.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    detector: Arc<dyn TextDetector>,
    config: ServiceConfig,
}

impl AppState {
    pub fn new(detector: Arc<dyn TextDetector>, config: ServiceConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner { detector, config }),
        }
    }

    pub fn detector(&self) -> &dyn TextDetector {
        self.inner.detector.as_ref()
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.inner.config
    }
}

// ── Error response ───────────────────────────────────────────────────────

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
}

impl IntoResponse for ExtractError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: self.code(),
        });
        (status, body).into_response()
    }
}

// ── Router ───────────────────────────────────────────────────────────────

/// Build the service router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(service_metadata))
        .route("/health-textract/", get(health_textract))
        .route("/extract-text/", post(extract_text))
        .route("/extract-text-with-fallback/", post(extract_text_with_fallback))
        .route("/extract-text-from-drive/", post(extract_text_from_drive))
        .route("/extract-text-json/", post(extract_text_json))
        .route("/extract-text-detailed/", post(extract_text_detailed))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// ── Upload handling ──────────────────────────────────────────────────────

/// Pull the `file` field out of a multipart upload, requiring a `.pdf`
/// filename.
async fn read_pdf_upload(mut multipart: Multipart) -> Result<Vec<u8>, ExtractError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ExtractError::BadInput {
            reason: format!("Invalid multipart body: {}", e),
        })?
    {
        if field.name() != Some("file") {
            continue;
        }

        let is_pdf = field
            .file_name()
            .is_some_and(|name| name.to_ascii_lowercase().ends_with(".pdf"));
        if !is_pdf {
            return Err(ExtractError::BadInput {
                reason: "Only PDF files are supported.".into(),
            });
        }

        let bytes = field.bytes().await.map_err(|e| ExtractError::BadInput {
            reason: format!("Failed to read upload: {}", e),
        })?;
        info!("Received PDF upload: {} bytes", bytes.len());
        return Ok(bytes.to_vec());
    }

    Err(ExtractError::BadInput {
        reason: "Missing multipart field 'file'.".into(),
    })
}

// ── Handlers ─────────────────────────────────────────────────────────────

/// POST `/extract-text/` — always-OCR, plain text response.
async fn extract_text(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<String, ExtractError> {
    let bytes = read_pdf_upload(multipart).await?;
    extract::extract_text(&bytes, state.detector(), &state.config().extraction).await
}

/// POST `/extract-text-with-fallback/` — text-layer fast path, OCR fallback.
async fn extract_text_with_fallback(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<String, ExtractError> {
    let bytes = read_pdf_upload(multipart).await?;
    extract::extract_text_with_fallback(&bytes, state.detector(), &state.config().extraction).await
}

#[derive(Deserialize)]
struct DriveForm {
    #[serde(default)]
    drive_url: String,
}

/// POST `/extract-text-from-drive/` — download a remote PDF, then always-OCR.
async fn extract_text_from_drive(
    State(state): State<AppState>,
    Form(form): Form<DriveForm>,
) -> Result<String, ExtractError> {
    if form.drive_url.trim().is_empty() {
        return Err(ExtractError::BadInput {
            reason: "Missing form field 'drive_url'.".into(),
        });
    }

    let config = &state.config().extraction;
    let downloaded = input::download_pdf(&form.drive_url, config.download_timeout_secs).await?;
    let bytes = tokio::fs::read(downloaded.path())
        .await
        .map_err(|e| ExtractError::Internal(format!("Failed to read downloaded file: {}", e)))?;

    // `downloaded` stays alive until the extraction finishes, then the temp
    // directory is released with the request.
    extract::extract_text(&bytes, state.detector(), config).await
}

/// POST `/extract-text-json/` — always-OCR with per-page statistics.
async fn extract_text_json(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<DocumentSummary>, ExtractError> {
    let bytes = read_pdf_upload(multipart).await?;
    let summary =
        extract::extract_summary(&bytes, state.detector(), &state.config().extraction).await?;
    Ok(Json(summary))
}

/// POST `/extract-text-detailed/` — always-OCR with full line/word structure.
async fn extract_text_detailed(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<DetailedDocument>, ExtractError> {
    let bytes = read_pdf_upload(multipart).await?;
    let detailed =
        extract::extract_detailed(&bytes, state.detector(), &state.config().extraction).await?;
    Ok(Json(detailed))
}

/// GET `/` — service metadata.
async fn service_metadata(State(state): State<AppState>) -> Json<serde_json::Value> {
    let config = state.config();
    Json(serde_json::json!({
        "message": "PDF Text Extraction API with AWS Textract",
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
        "aws_region": config.aws_region,
        "credentials_configured": config.credentials_configured,
        "available_endpoints": {
            "/extract-text/": "Extract text using AWS Textract OCR",
            "/extract-text-with-fallback/": "Smart extraction (text layer for digital PDFs, Textract for scanned PDFs)",
            "/extract-text-from-drive/": "Extract from a Google Drive PDF using Textract",
            "/extract-text-json/": "JSON response with page-by-page analysis",
            "/extract-text-detailed/": "Detailed JSON with confidence scores and structure",
            "/health-textract/": "Check AWS Textract connection",
        },
    }))
}

/// GET `/health-textract/` — probe Textract with a 1×1 test image.
async fn health_textract(State(state): State<AppState>) -> Json<HealthReport> {
    Json(ocr::connectivity_check(state.detector()).await)
}
