//! Output types: per-page OCR structure and whole-document aggregates.
//!
//! Everything here is a pure value owned by the request that produced it —
//! nothing is cached or shared across requests.  The aggregation functions
//! ([`DocumentSummary::from_pages`], [`mean_confidence`]) are pure so the
//! blank-page and confidence rules can be tested without touching pdfium or
//! the network.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis-aligned bounding box in normalised page coordinates (0–1).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// A single polygon vertex in normalised page coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Position of a text fragment on the page, as returned by the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub bounding_box: BoundingBox,
    pub polygon: Vec<Point>,
}

/// A recognised text fragment — one Textract LINE or WORD block.
///
/// Confidence (0–100) and geometry are passed through from the provider
/// unchanged; no re-scoring happens anywhere in this crate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrFragment {
    pub text: String,
    pub confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
}

impl OcrFragment {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
            geometry: None,
        }
    }
}

/// Structured OCR outcome for a single page.
///
/// `raw_text` is always the newline-join of `lines[].text` in the provider's
/// returned order; [`PageResult::from_fragments`] is the only constructor so
/// the two can never drift apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    /// 1-based page number within the source document.
    pub page_number: usize,
    pub raw_text: String,
    pub lines: Vec<OcrFragment>,
    pub words: Vec<OcrFragment>,
}

impl PageResult {
    /// Build a page result, deriving `raw_text` from the line fragments.
    pub fn from_fragments(
        page_number: usize,
        lines: Vec<OcrFragment>,
        words: Vec<OcrFragment>,
    ) -> Self {
        let raw_text = lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            page_number,
            raw_text,
            lines,
            words,
        }
    }

    /// True when the page yielded only whitespace.
    pub fn is_blank(&self) -> bool {
        self.raw_text.trim().is_empty()
    }
}

/// How the final text of a document was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionMethod {
    /// Every page rasterised and sent through Textract.
    #[serde(rename = "AWS Textract OCR")]
    Ocr,
    /// Textract OCR with full line/word structure retained.
    #[serde(rename = "AWS Textract with structure analysis")]
    Structured,
    /// Embedded text layer read locally, no OCR performed.
    #[serde(rename = "Text layer")]
    TextLayer,
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ocr => "AWS Textract OCR",
            Self::Structured => "AWS Textract with structure analysis",
            Self::TextLayer => "Text layer",
        };
        f.write_str(s)
    }
}

/// Per-page statistics for the summary response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSummary {
    pub page_number: usize,
    pub text: String,
    pub lines_count: usize,
    pub words_count: usize,
    pub average_confidence: f64,
}

/// Whole-document aggregate served by `/extract-text-json/`.
///
/// Only pages with non-blank text qualify; `total_pages` counts qualifying
/// pages, not the pages of the source PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub extracted_text: String,
    pub pages: Vec<PageSummary>,
    pub total_pages: usize,
    pub extraction_method: ExtractionMethod,
    pub text_blocks: Vec<String>,
}

impl DocumentSummary {
    /// Aggregate page results, silently dropping blank pages.
    pub fn from_pages(pages: &[PageResult], method: ExtractionMethod) -> Self {
        let mut summaries = Vec::new();
        let mut blocks = Vec::new();

        for page in pages {
            let text = page.raw_text.trim();
            if text.is_empty() {
                continue;
            }
            summaries.push(PageSummary {
                page_number: page.page_number,
                text: text.to_string(),
                lines_count: page.lines.len(),
                words_count: page.words.len(),
                average_confidence: mean_confidence(&page.lines),
            });
            blocks.push(text.to_string());
        }

        Self {
            extracted_text: blocks.join("\n\n"),
            total_pages: summaries.len(),
            pages: summaries,
            extraction_method: method,
            text_blocks: blocks,
        }
    }
}

/// Full per-page structure served by `/extract-text-detailed/`.
///
/// Unlike [`DocumentSummary`], every page appears here, blank or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedDocument {
    pub pages: Vec<PageResult>,
    pub total_pages: usize,
    pub extraction_method: ExtractionMethod,
}

impl DetailedDocument {
    pub fn from_pages(pages: Vec<PageResult>) -> Self {
        Self {
            total_pages: pages.len(),
            pages,
            extraction_method: ExtractionMethod::Structured,
        }
    }
}

/// Arithmetic mean of line confidences. Exactly 0.0 for zero lines — never
/// a division error.
pub fn mean_confidence(lines: &[OcrFragment]) -> f64 {
    if lines.is_empty() {
        return 0.0;
    }
    let sum: f64 = lines.iter().map(|l| f64::from(l.confidence)).sum();
    sum / lines.len() as f64
}
