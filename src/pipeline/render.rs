//! PDF rasterisation: render every page to a `DynamicImage` via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! `pdfium-render` wraps the pdfium C++ library, which keeps thread-local
//! state and must not be driven from an async context. All pdfium work runs
//! on Tokio's blocking pool so CPU-heavy rendering never stalls the async
//! worker threads.
//!
//! ## Why a fixed scale factor?
//!
//! Textract's recognition of small print improves markedly with resolution.
//! A 2× linear scale (4× pixel count) is applied to every page regardless of
//! physical size; the rendered bitmap stays losslessly faithful to the page
//! modulo that resolution.

use crate::error::ExtractError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use tracing::debug;

/// Rasterise every page of a PDF into images at the given linear scale.
///
/// Runs inside `spawn_blocking` since pdfium operations are CPU-bound.
///
/// # Returns
/// A vector of `(page_index_0based, DynamicImage)` tuples in page order.
pub async fn rasterize_document(
    bytes: &[u8],
    scale: f32,
) -> Result<Vec<(usize, DynamicImage)>, ExtractError> {
    let data = bytes.to_vec();

    tokio::task::spawn_blocking(move || rasterize_blocking(&data, scale))
        .await
        .map_err(|e| ExtractError::Internal(format!("Render task panicked: {}", e)))?
}

/// Blocking implementation of page rendering.
fn rasterize_blocking(
    data: &[u8],
    scale: f32,
) -> Result<Vec<(usize, DynamicImage)>, ExtractError> {
    let pdfium = Pdfium::default();

    let document = pdfium
        .load_pdf_from_byte_slice(data, None)
        .map_err(|e| ExtractError::MalformedDocument {
            detail: format!("{:?}", e),
        })?;

    let pages = document.pages();
    debug!("PDF loaded: {} pages", pages.len());

    let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);

    let mut results = Vec::with_capacity(pages.len() as usize);

    for (idx, page) in pages.iter().enumerate() {
        let bitmap =
            page.render_with_config(&render_config)
                .map_err(|e| ExtractError::Rasterization {
                    page: idx + 1,
                    detail: format!("{:?}", e),
                })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            idx + 1,
            image.width(),
            image.height()
        );

        results.push((idx, image));
    }

    Ok(results)
}
