//! # pdf-textract
//!
//! HTTP service extracting text from PDF documents with AWS Textract,
//! keeping a local fast path for digitally-authored PDFs.
//!
//! ## Why two paths?
//!
//! OCR is slow and metered: every scanned page costs one Textract round
//! trip. A digitally-authored PDF already carries its text as a machine
//! readable layer that pdfium can read locally for free. The service probes
//! that layer first and only falls back to rasterise-and-OCR when the
//! document looks scanned.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Probe    read each page's embedded text layer (pdfium)
//!  ├─ 2. Classify document-level rule: any page > 100 chars → text-based
//!  ├─ 3a. Text    emit "--- Page N (Text Layer) ---" blocks, no OCR
//!  ├─ 3b. OCR     rasterise at 2× → PNG → Textract, page by page
//!  └─ 4. Assemble labelled blocks / per-page stats / full structure
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_textract::{extract_text_with_fallback, ExtractionConfig, TextractDetector};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let detector = TextractDetector::from_env("us-east-1").await;
//!     let config = ExtractionConfig::default();
//!     let bytes = std::fs::read("document.pdf")?;
//!     let text = extract_text_with_fallback(&bytes, &detector, &config).await?;
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `server` | on      | Enables the HTTP surface and the `pdf-textract` binary (axum + tower-http) |
//!
//! Disable `server` when using only the extraction library:
//! ```toml
//! pdf-textract = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
#[cfg(feature = "server")]
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder, ServiceConfig};
pub use error::ExtractError;
pub use extract::{
    classify_document, extract_detailed, extract_summary, extract_text,
    extract_text_with_fallback, BlockLabel, DocumentClass,
};
pub use output::{
    mean_confidence, BoundingBox, DetailedDocument, DocumentSummary, ExtractionMethod, Geometry,
    OcrFragment, PageResult, PageSummary, Point,
};
pub use pipeline::ocr::{
    connectivity_check, DetectedPage, HealthReport, TextDetector, TextractDetector,
};
#[cfg(feature = "server")]
pub use server::{router, AppState};
