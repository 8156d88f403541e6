//! Whole-document extraction entry points and the dual-path strategy.
//!
//! Two heterogeneous paths produce page text:
//!
//! * the **text layer** — embedded text read locally by pdfium, free; and
//! * **OCR** — rasterise each page and submit it to Textract, one network
//!   round trip per page.
//!
//! [`extract_text_with_fallback`] probes the text layer of every page first
//! and applies a document-level rule to pick exactly one path for the whole
//! document. The always-OCR entry points ([`extract_text`],
//! [`extract_summary`], [`extract_detailed`]) skip the probe.
//!
//! Pages are submitted to the OCR gateway strictly sequentially; a failure
//! on any page aborts the whole extraction with no partial result.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::output::{DetailedDocument, DocumentSummary, ExtractionMethod, PageResult};
use crate::pipeline::ocr::TextDetector;
use crate::pipeline::{encode, render, text_layer};
use image::DynamicImage;
use std::fmt;
use tracing::{debug, info};

// ── Document classification ──────────────────────────────────────────────

/// Which extraction path serves the whole document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentClass {
    /// At least one page carries substantial embedded text; read the text
    /// layer everywhere, no OCR.
    TextBased,
    /// No page qualifies; rasterise and OCR every page.
    Scanned,
}

/// Classify a document from its per-page embedded text.
///
/// Text-based iff at least one page is non-empty AND at least one page's
/// trimmed text exceeds `threshold` characters. The rule is document-global:
/// one qualifying page selects the text-layer path for every page.
///
/// Known limitation: a document mixing one text-rich page with many scanned
/// pages gets no OCR pass at all, so the scanned pages' content is lost.
pub fn classify_document(page_texts: &[String], threshold: usize) -> DocumentClass {
    let any_text = page_texts.iter().any(|t| !t.trim().is_empty());
    let any_substantial = page_texts.iter().any(|t| t.trim().len() > threshold);

    if any_text && any_substantial {
        DocumentClass::TextBased
    } else {
        DocumentClass::Scanned
    }
}

// ── Page-boundary labels ─────────────────────────────────────────────────

/// The marker inserted above each page's text, naming the page and the
/// extraction source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockLabel {
    /// `--- Page N ---` (always-OCR endpoints).
    Plain,
    /// `--- Page N (Text Layer) ---`
    TextLayer,
    /// `--- Page N (OCR) ---`
    Ocr,
}

impl BlockLabel {
    /// Render the label for the given 1-based page number.
    pub fn render(&self, page_number: usize) -> String {
        match self {
            BlockLabel::Plain => format!("--- Page {} ---", page_number),
            BlockLabel::TextLayer => format!("--- Page {} (Text Layer) ---", page_number),
            BlockLabel::Ocr => format!("--- Page {} (OCR) ---", page_number),
        }
    }
}

impl fmt::Display for BlockLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockLabel::Plain => f.write_str("plain"),
            BlockLabel::TextLayer => f.write_str("text layer"),
            BlockLabel::Ocr => f.write_str("ocr"),
        }
    }
}

/// Assemble labelled page blocks into the final text document.
///
/// Each page's text is trimmed; pages that yield only whitespace are
/// silently dropped — no placeholder block is emitted. Blocks are joined
/// with a blank line.
pub fn assemble_blocks<'a, I>(pages: I, label: BlockLabel) -> String
where
    I: IntoIterator<Item = (usize, &'a str)>,
{
    let blocks: Vec<String> = pages
        .into_iter()
        .filter_map(|(page_number, text)| {
            let text = text.trim();
            if text.is_empty() {
                None
            } else {
                Some(format!("{}\n{}", label.render(page_number), text))
            }
        })
        .collect();

    blocks.join("\n\n")
}

// ── OCR path ─────────────────────────────────────────────────────────────

/// Submit already-rendered pages through the detector, strictly in order.
/// One request per page, no local queueing. The first failure aborts the
/// document.
pub(crate) async fn ocr_rendered_pages(
    pages: Vec<(usize, DynamicImage)>,
    detector: &dyn TextDetector,
) -> Result<Vec<PageResult>, ExtractError> {
    let mut results = Vec::with_capacity(pages.len());

    for (idx, image) in pages {
        let page_number = idx + 1;
        let png = encode::encode_page(&image).map_err(|e| ExtractError::Rasterization {
            page: page_number,
            detail: format!("Image encoding failed: {}", e),
        })?;

        let detected = detector.detect(&png).await?;
        debug!(
            "Page {}: OCR produced {} lines",
            page_number,
            detected.lines.len()
        );

        results.push(PageResult::from_fragments(
            page_number,
            detected.lines,
            detected.words,
        ));
    }

    Ok(results)
}

/// Rasterise every page of the document and run each through OCR.
async fn ocr_document(
    bytes: &[u8],
    detector: &dyn TextDetector,
    config: &ExtractionConfig,
) -> Result<Vec<PageResult>, ExtractError> {
    let rendered = render::rasterize_document(bytes, config.raster_scale).await?;
    ocr_rendered_pages(rendered, detector).await
}

// ── Entry points ─────────────────────────────────────────────────────────

/// Extract text from every page via OCR, assembled with plain page labels.
pub async fn extract_text(
    bytes: &[u8],
    detector: &dyn TextDetector,
    config: &ExtractionConfig,
) -> Result<String, ExtractError> {
    let pages = ocr_document(bytes, detector, config).await?;
    Ok(assemble_blocks(
        pages.iter().map(|p| (p.page_number, p.raw_text.as_str())),
        BlockLabel::Plain,
    ))
}

/// Extract text with the text-layer fast path.
///
/// Probes the embedded text of every page, classifies the document once,
/// and produces either text-layer or OCR blocks for the whole document —
/// never a mix.
pub async fn extract_text_with_fallback(
    bytes: &[u8],
    detector: &dyn TextDetector,
    config: &ExtractionConfig,
) -> Result<String, ExtractError> {
    let page_texts = text_layer::read_page_texts(bytes).await?;

    match classify_document(&page_texts, config.text_layer_threshold) {
        DocumentClass::TextBased => {
            info!("Document classified as text-based; skipping OCR");
            Ok(assemble_blocks(
                page_texts
                    .iter()
                    .enumerate()
                    .map(|(idx, text)| (idx + 1, text.as_str())),
                BlockLabel::TextLayer,
            ))
        }
        DocumentClass::Scanned => {
            info!("Document classified as scanned; running OCR on every page");
            let pages = ocr_document(bytes, detector, config).await?;
            Ok(assemble_blocks(
                pages.iter().map(|p| (p.page_number, p.raw_text.as_str())),
                BlockLabel::Ocr,
            ))
        }
    }
}

/// OCR every page and aggregate per-page statistics.
pub async fn extract_summary(
    bytes: &[u8],
    detector: &dyn TextDetector,
    config: &ExtractionConfig,
) -> Result<DocumentSummary, ExtractError> {
    let pages = ocr_document(bytes, detector, config).await?;
    Ok(DocumentSummary::from_pages(&pages, ExtractionMethod::Ocr))
}

/// OCR every page and return the full line/word structure.
pub async fn extract_detailed(
    bytes: &[u8],
    detector: &dyn TextDetector,
    config: &ExtractionConfig,
) -> Result<DetailedDocument, ExtractError> {
    let pages = ocr_document(bytes, detector, config).await?;
    Ok(DetailedDocument::from_pages(pages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OcrFragment;
    use crate::pipeline::ocr::DetectedPage;
    use async_trait::async_trait;
    use image::{Rgba, RgbaImage};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    // ── Classification rule ──────────────────────────────────────────────

    #[test]
    fn all_empty_pages_classify_as_scanned() {
        assert_eq!(
            classify_document(&texts(&["", "   ", "\n\t"]), 100),
            DocumentClass::Scanned
        );
        assert_eq!(classify_document(&[], 100), DocumentClass::Scanned);
    }

    #[test]
    fn short_text_everywhere_classifies_as_scanned() {
        // Non-empty but nothing over the threshold.
        assert_eq!(
            classify_document(&texts(&["stamp", "page 2 of 2"]), 100),
            DocumentClass::Scanned
        );
    }

    #[test]
    fn one_substantial_page_classifies_as_text_based() {
        let long = "x".repeat(150);
        assert_eq!(
            classify_document(&texts(&["", &long, ""]), 100),
            DocumentClass::TextBased
        );
    }

    #[test]
    fn threshold_is_exclusive() {
        let exactly = "x".repeat(100);
        assert_eq!(
            classify_document(&texts(&[&exactly]), 100),
            DocumentClass::Scanned
        );
        let over = "x".repeat(101);
        assert_eq!(
            classify_document(&texts(&[&over]), 100),
            DocumentClass::TextBased
        );
    }

    #[test]
    fn threshold_applies_to_trimmed_length() {
        let padded = format!("  {}  \n", "x".repeat(99));
        assert_eq!(
            classify_document(&texts(&[&padded]), 100),
            DocumentClass::Scanned
        );
    }

    // ── Assembly ─────────────────────────────────────────────────────────

    #[test]
    fn assemble_labels_and_joins_pages() {
        let out = assemble_blocks(
            vec![(1, "first page"), (2, "second page")],
            BlockLabel::Ocr,
        );
        assert_eq!(
            out,
            "--- Page 1 (OCR) ---\nfirst page\n\n--- Page 2 (OCR) ---\nsecond page"
        );
    }

    #[test]
    fn assemble_drops_whitespace_only_pages() {
        let out = assemble_blocks(
            vec![(1, "content"), (2, "   \n\t "), (3, "more")],
            BlockLabel::TextLayer,
        );
        assert!(out.contains("--- Page 1 (Text Layer) ---"));
        assert!(!out.contains("Page 2"));
        assert!(out.contains("--- Page 3 (Text Layer) ---"));
    }

    #[test]
    fn assemble_of_all_blank_pages_is_empty() {
        let out = assemble_blocks(vec![(1, ""), (2, "  ")], BlockLabel::Plain);
        assert_eq!(out, "");
    }

    #[test]
    fn assemble_trims_page_text() {
        let out = assemble_blocks(vec![(1, "  padded  ")], BlockLabel::Plain);
        assert_eq!(out, "--- Page 1 ---\npadded");
    }

    #[test]
    fn reordered_pages_produce_reordered_blocks() {
        let pages = vec![(1, "alpha"), (2, "beta"), (3, "gamma")];
        let reordered = vec![(3, "gamma"), (1, "alpha"), (2, "beta")];

        let forward = assemble_blocks(pages, BlockLabel::Plain);
        let shuffled = assemble_blocks(reordered, BlockLabel::Plain);

        // Same blocks, same per-block content, different order — no text
        // leaks across page boundaries.
        let mut forward_blocks: Vec<&str> = forward.split("\n\n").collect();
        let mut shuffled_blocks: Vec<&str> = shuffled.split("\n\n").collect();
        assert_eq!(shuffled_blocks[0], "--- Page 3 ---\ngamma");
        forward_blocks.sort_unstable();
        shuffled_blocks.sort_unstable();
        assert_eq!(forward_blocks, shuffled_blocks);
    }

    #[test]
    fn single_text_layer_block_scenario() {
        // A 2-page document: 150 chars of embedded text on page 1, nothing
        // on page 2 → classified text-based, one labelled block, page 2
        // dropped.
        let page_one = "y".repeat(150);
        let probed = texts(&[&page_one, ""]);
        assert_eq!(classify_document(&probed, 100), DocumentClass::TextBased);

        let out = assemble_blocks(
            probed
                .iter()
                .enumerate()
                .map(|(idx, t)| (idx + 1, t.as_str())),
            BlockLabel::TextLayer,
        );
        assert!(out.starts_with("--- Page 1 (Text Layer) ---\n"));
        assert!(out.contains(&page_one));
        assert!(!out.contains("Page 2"));
        assert_eq!(out.matches("--- Page").count(), 1);
    }

    // ── Sequential OCR over rendered pages ───────────────────────────────

    /// Scripted detector: pops one response per call, counts calls.
    struct ScriptedDetector {
        responses: Mutex<Vec<Result<DetectedPage, ExtractError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedDetector {
        fn new(responses: Vec<Result<DetectedPage, ExtractError>>) -> Self {
            let mut responses = responses;
            responses.reverse(); // pop() returns them in submission order
            Self {
                responses: Mutex::new(responses),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextDetector for ScriptedDetector {
        async fn detect(&self, _image: &[u8]) -> Result<DetectedPage, ExtractError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok(DetectedPage::default()))
        }
    }

    fn blank_image() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255])))
    }

    fn detected(lines: &[&str]) -> DetectedPage {
        DetectedPage {
            lines: lines.iter().map(|l| OcrFragment::new(*l, 95.0)).collect(),
            words: Vec::new(),
        }
    }

    #[tokio::test]
    async fn one_page_means_one_detector_call() {
        let detector = ScriptedDetector::new(vec![Ok(detected(&["Hello", "World"]))]);
        let results = ocr_rendered_pages(vec![(0, blank_image())], &detector)
            .await
            .unwrap();

        assert_eq!(detector.call_count(), 1);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].page_number, 1);
        // Lines joined with newlines in provider order.
        assert_eq!(results[0].raw_text, "Hello\nWorld");
    }

    #[tokio::test]
    async fn pages_are_numbered_from_their_indices() {
        let detector = ScriptedDetector::new(vec![
            Ok(detected(&["one"])),
            Ok(detected(&["two"])),
            Ok(detected(&["three"])),
        ]);
        let pages = vec![(0, blank_image()), (1, blank_image()), (2, blank_image())];
        let results = ocr_rendered_pages(pages, &detector).await.unwrap();

        assert_eq!(detector.call_count(), 3);
        let numbers: Vec<usize> = results.iter().map(|p| p.page_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(results[2].raw_text, "three");
    }

    #[tokio::test]
    async fn rejected_credentials_abort_the_whole_document() {
        let detector = ScriptedDetector::new(vec![
            Ok(detected(&["page one came through"])),
            Err(ExtractError::InvalidCredentials),
            Ok(detected(&["never reached"])),
        ]);
        let pages = vec![(0, blank_image()), (1, blank_image()), (2, blank_image())];
        let err = ocr_rendered_pages(pages, &detector).await.unwrap_err();

        // The failure surfaces as-is and page 3 is never submitted.
        assert!(matches!(err, ExtractError::InvalidCredentials));
        assert_eq!(detector.call_count(), 2);
    }
}
