//! OCR gateway: submit a single page image to AWS Textract and normalise
//! the response into structured lines and words.
//!
//! The gateway is behind the [`TextDetector`] trait so the pipeline and the
//! HTTP layer depend on a seam, not on the SDK — tests script a mock, and
//! the real client is constructed once at process start and injected
//! (no hidden global state). Each page submission is a single attempt;
//! there is no retry.
//!
//! Textract returns a flat list of blocks per page. Only `LINE` and `WORD`
//! blocks are kept — `PAGE` and every other kind are discarded — and
//! confidence and geometry pass through unchanged.

use async_trait::async_trait;
use aws_sdk_textract::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_textract::operation::detect_document_text::DetectDocumentTextError;
use aws_sdk_textract::primitives::Blob;
use aws_sdk_textract::types::{Block, BlockType, Document};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::output::{BoundingBox, Geometry, OcrFragment, Point};

/// Raw text detection outcome for one page image, before it is assigned a
/// page number.
#[derive(Debug, Clone, Default)]
pub struct DetectedPage {
    pub lines: Vec<OcrFragment>,
    pub words: Vec<OcrFragment>,
}

/// A text-detection backend for single-page images.
///
/// Implemented by [`TextractDetector`] in production and by scripted mocks
/// in tests.
#[async_trait]
pub trait TextDetector: Send + Sync {
    /// Detect text in one page image. Confidence and geometry are the
    /// provider's values, unmodified.
    async fn detect(&self, image: &[u8]) -> Result<DetectedPage, ExtractError>;
}

/// AWS Textract implementation of [`TextDetector`].
pub struct TextractDetector {
    client: aws_sdk_textract::Client,
}

impl TextractDetector {
    /// Wrap an already-constructed Textract client.
    pub fn new(client: aws_sdk_textract::Client) -> Self {
        Self { client }
    }

    /// Build a client from the ambient AWS credential chain and the given
    /// region.
    pub async fn from_env(region: &str) -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;
        Self::new(aws_sdk_textract::Client::new(&sdk_config))
    }
}

#[async_trait]
impl TextDetector for TextractDetector {
    async fn detect(&self, image: &[u8]) -> Result<DetectedPage, ExtractError> {
        let document = Document::builder().bytes(Blob::new(image.to_vec())).build();

        let output = self
            .client
            .detect_document_text()
            .document(document)
            .send()
            .await
            .map_err(classify_textract_error)?;

        let page = normalize_blocks(output.blocks());
        debug!(
            "Textract returned {} lines / {} words",
            page.lines.len(),
            page.words.len()
        );
        Ok(page)
    }
}

/// Classify Textract blocks into lines and words, discarding everything else.
pub(crate) fn normalize_blocks(blocks: &[Block]) -> DetectedPage {
    let mut page = DetectedPage::default();

    for block in blocks {
        let Some(kind) = block.block_type() else {
            continue;
        };

        let fragment = OcrFragment {
            text: block.text().unwrap_or_default().to_string(),
            confidence: block.confidence().unwrap_or(0.0),
            geometry: block.geometry().map(convert_geometry),
        };

        match kind {
            BlockType::Line => page.lines.push(fragment),
            BlockType::Word => page.words.push(fragment),
            _ => {}
        }
    }

    page
}

fn convert_geometry(geometry: &aws_sdk_textract::types::Geometry) -> Geometry {
    let bounding_box = geometry
        .bounding_box()
        .map(|b| BoundingBox {
            left: b.left(),
            top: b.top(),
            width: b.width(),
            height: b.height(),
        })
        .unwrap_or_default();

    let polygon = geometry
        .polygon()
        .iter()
        .map(|p| Point { x: p.x(), y: p.y() })
        .collect();

    Geometry {
        bounding_box,
        polygon,
    }
}

/// Map an SDK failure onto the service error taxonomy.
///
/// Service errors are classified by their provider error code — the same
/// strings AWS documents for `DetectDocumentText` — so unmodeled errors
/// (e.g. `UnrecognizedClientException`, which the SDK does not type) are
/// still recognised. Anything that never reached the service is a
/// transport failure.
fn classify_textract_error(err: SdkError<DetectDocumentTextError>) -> ExtractError {
    match err.as_service_error() {
        Some(service) => {
            let code = service.code().unwrap_or("UnknownError");
            let message = service.message().unwrap_or("no detail from provider");
            warn!("Textract service error [{}]: {}", code, message);

            match code {
                "UnrecognizedClientException" => ExtractError::InvalidCredentials,
                "AccessDeniedException" => ExtractError::PermissionDenied,
                "InvalidParameterException"
                | "BadDocumentException"
                | "UnsupportedDocumentException" => ExtractError::InvalidInput {
                    detail: format!("{}: {}", code, message),
                },
                _ => ExtractError::Provider {
                    code: code.to_string(),
                    message: message.to_string(),
                },
            }
        }
        None => ExtractError::Transport {
            detail: err.to_string(),
        },
    }
}

// ── Connectivity probe ───────────────────────────────────────────────────

/// A 1×1 pixel PNG used to probe Textract connectivity.
pub const HEALTH_PROBE_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d,
    0x49, 0x48, 0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01,
    0x08, 0x02, 0x00, 0x00, 0x00, 0x90, 0x77, 0x53, 0xde, 0x00, 0x00, 0x00,
    0x09, 0x70, 0x48, 0x59, 0x73, 0x00, 0x00, 0x0b, 0x13, 0x00, 0x00, 0x0b,
    0x13, 0x01, 0x00, 0x9a, 0x9c, 0x18, 0x00, 0x00, 0x00, 0x0a, 0x49, 0x44,
    0x41, 0x54, 0x78, 0x9c, 0x63, 0xf8, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01,
    0x55, 0x0d, 0x31, 0x28, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4e, 0x44,
    0xae, 0x42, 0x60, 0x82,
];

/// Outcome of a connectivity probe against the OCR provider.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub message: String,
}

impl HealthReport {
    fn healthy(message: impl Into<String>) -> Self {
        Self {
            status: "healthy",
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
        }
    }
}

/// Probe the provider with [`HEALTH_PROBE_PNG`].
///
/// A parameter/unsupported-document rejection counts as healthy: it proves
/// the service was reached and the credentials were accepted.
pub async fn connectivity_check(detector: &dyn TextDetector) -> HealthReport {
    match detector.detect(HEALTH_PROBE_PNG).await {
        Ok(_) => HealthReport::healthy("AWS Textract connection successful"),
        Err(ExtractError::InvalidInput { .. }) => HealthReport::healthy(
            "AWS Textract connection working (expected parameter error with test data)",
        ),
        Err(ExtractError::InvalidCredentials) => HealthReport::error("Invalid AWS credentials"),
        Err(ExtractError::PermissionDenied) => {
            HealthReport::error("AWS credentials lack Textract permissions")
        }
        Err(e) => HealthReport::error(format!("Textract connection issue: {}", e)),
    }
}
