//! Text-layer reading: extract the machine-encoded text embedded in each
//! page, without any image analysis or network access.
//!
//! A page with no text layer yields an empty string rather than an error —
//! the extraction strategy needs the full per-page picture to classify the
//! document. Only a document that cannot be parsed at all fails, and it
//! fails before any page-level work.

use crate::error::ExtractError;
use pdfium_render::prelude::*;
use tracing::{debug, warn};

/// Read the embedded text of every page, one string per page.
///
/// Runs inside `spawn_blocking` since pdfium operations are CPU-bound.
pub async fn read_page_texts(bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
    let data = bytes.to_vec();

    tokio::task::spawn_blocking(move || read_blocking(&data))
        .await
        .map_err(|e| ExtractError::Internal(format!("Text-layer task panicked: {}", e)))?
}

/// Blocking implementation of text-layer extraction.
fn read_blocking(data: &[u8]) -> Result<Vec<String>, ExtractError> {
    let pdfium = Pdfium::default();

    let document = pdfium
        .load_pdf_from_byte_slice(data, None)
        .map_err(|e| ExtractError::MalformedDocument {
            detail: format!("{:?}", e),
        })?;

    let pages = document.pages();
    let mut texts = Vec::with_capacity(pages.len() as usize);

    for (idx, page) in pages.iter().enumerate() {
        let text = match page.text() {
            Ok(text_page) => text_page.all(),
            Err(e) => {
                // A page without an extractable text object is not an error;
                // the strategy treats it as image-only.
                warn!("Page {}: no readable text layer ({:?})", idx + 1, e);
                String::new()
            }
        };
        debug!("Page {}: {} chars of embedded text", idx + 1, text.len());
        texts.push(text);
    }

    Ok(texts)
}
