//! Error types for the pdf-textract service.
//!
//! One taxonomy, [`ExtractError`], covers the whole pipeline.  Every variant
//! maps to exactly one caller-visible HTTP status via
//! [`ExtractError::status_code`], so the HTTP boundary can pattern-match a
//! typed value instead of sniffing exception strings.  Errors are never
//! recovered mid-request: a failed page aborts the whole extraction and
//! surfaces here — there are no partial results and no retries (one Textract
//! submission per page; OCR calls would be the natural retry-with-backoff
//! candidate in a future revision).

use thiserror::Error;

/// All errors surfaced by the extraction pipeline and the HTTP boundary.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Caller input ──────────────────────────────────────────────────────
    /// The request itself is unusable (non-PDF upload, missing form field).
    #[error("{reason}")]
    BadInput { reason: String },

    /// The document bytes could not be parsed as a PDF at all.
    #[error("Malformed PDF document: {detail}")]
    MalformedDocument { detail: String },

    /// pdfium failed to render a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    Rasterization { page: usize, detail: String },

    // ── OCR provider ──────────────────────────────────────────────────────
    /// Textract rejected the caller's identity.
    #[error("Invalid AWS credentials. Please check your access key and secret key.")]
    InvalidCredentials,

    /// Identity is valid but lacks permission to call Textract.
    #[error("AWS credentials don't have permission to access Textract.")]
    PermissionDenied,

    /// Textract rejected the submitted image or parameters.
    #[error("Invalid input sent to Textract: {detail}")]
    InvalidInput { detail: String },

    /// Any other provider-side failure. The provider's error code is kept
    /// in the message for diagnosability.
    #[error("AWS Textract error [{code}]: {message}")]
    Provider { code: String, message: String },

    /// Network or serialisation failure talking to the provider.
    #[error("Failed to reach Textract: {detail}")]
    Transport { detail: String },

    // ── Remote download ───────────────────────────────────────────────────
    /// HTTP download of a remote PDF failed.
    #[error("Failed to download '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'")]
    DownloadTimeout { url: String, secs: u64 },

    // ── Config ────────────────────────────────────────────────────────────
    /// Startup configuration is invalid (missing credentials, bad values).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ExtractError {
    /// The HTTP status this error maps to at the service boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadInput { .. } | Self::InvalidInput { .. } => 400,
            Self::InvalidCredentials => 401,
            Self::PermissionDenied => 403,
            _ => 500,
        }
    }

    /// A stable machine-readable code for the JSON error body.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadInput { .. } => "BAD_INPUT",
            Self::MalformedDocument { .. } => "MALFORMED_DOCUMENT",
            Self::Rasterization { .. } => "RASTERIZATION_FAILED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::InvalidInput { .. } => "INVALID_PROVIDER_INPUT",
            Self::Provider { .. } => "PROVIDER_ERROR",
            Self::Transport { .. } => "TRANSPORT_FAILURE",
            Self::DownloadFailed { .. } => "DOWNLOAD_FAILED",
            Self::DownloadTimeout { .. } => "DOWNLOAD_TIMEOUT",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
