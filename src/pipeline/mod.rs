//! Pipeline stages for PDF text extraction.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch OCR provider) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ text_layer ─┬─▶ (text-based: done)
//! (bytes/URL) (pdfium)  │
//!                       └─▶ render ──▶ encode ──▶ ocr
//!                           (pdfium)    (PNG)   (Textract)
//! ```
//!
//! 1. [`input`]      — fetch a remote PDF into request-scoped temp storage
//! 2. [`text_layer`] — read the embedded text per page; runs in
//!    `spawn_blocking` because pdfium is not async-safe
//! 3. [`render`]     — rasterise every page at a fixed 2× scale
//! 4. [`encode`]     — PNG-encode each bitmap for the Textract request body
//! 5. [`ocr`]        — submit each page to Textract and normalise the
//!    response into lines/words; the only stage with network I/O

pub mod encode;
pub mod input;
pub mod ocr;
pub mod render;
pub mod text_layer;
