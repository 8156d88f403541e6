//! Configuration for the extraction pipeline and the service process.
//!
//! [`ExtractionConfig`] holds the pipeline knobs and is built through
//! [`ExtractionConfigBuilder`] so callers set only what they care about and
//! inherit documented defaults for the rest.  [`ServiceConfig`] is the
//! process-level configuration, loaded once from the environment at startup;
//! missing AWS credentials are fatal there, never per-request.

use crate::error::ExtractError;
use serde::{Deserialize, Serialize};

/// Default character threshold above which a page's embedded text marks the
/// whole document as text-based.
pub const DEFAULT_TEXT_LAYER_THRESHOLD: usize = 100;

/// Default linear upscaling applied before OCR (2× linear = 4× pixels).
pub const DEFAULT_RASTER_SCALE: f32 = 2.0;

/// Knobs for a single document extraction.
///
/// # Example
/// ```rust
/// use pdf_textract::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .raster_scale(2.0)
///     .text_layer_threshold(100)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Linear scale factor used when rasterising pages for OCR. Range: 1–4.
    /// Default: 2.0.
    ///
    /// 2× linear magnification quadruples the pixel count, which noticeably
    /// improves Textract's recognition of small print while keeping a Letter
    /// page comfortably under the provider's 10 MB synchronous upload limit.
    pub raster_scale: f32,

    /// Minimum trimmed character count for a single page's embedded text to
    /// classify the whole document as text-based. Default: 100.
    ///
    /// The rule is document-global: one qualifying page skips OCR for every
    /// page.  See [`crate::extract::classify_document`] for the trade-off.
    pub text_layer_threshold: usize,

    /// Timeout for downloading a remote PDF, in seconds. Default: 120.
    pub download_timeout_secs: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            raster_scale: DEFAULT_RASTER_SCALE,
            text_layer_threshold: DEFAULT_TEXT_LAYER_THRESHOLD,
            download_timeout_secs: 120,
        }
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn raster_scale(mut self, scale: f32) -> Self {
        self.config.raster_scale = scale.clamp(1.0, 4.0);
        self
    }

    pub fn text_layer_threshold(mut self, chars: usize) -> Self {
        self.config.text_layer_threshold = chars;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs.max(1);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        if !(1.0..=4.0).contains(&c.raster_scale) {
            return Err(ExtractError::InvalidConfig(format!(
                "raster_scale must be 1–4, got {}",
                c.raster_scale
            )));
        }
        Ok(self.config)
    }
}

/// Process-level configuration, read once from the environment.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Socket address the HTTP server binds to. Default: `0.0.0.0:8000`.
    pub bind_addr: String,
    /// AWS region passed to the Textract client. Default: `us-east-1`.
    pub aws_region: String,
    /// Whether AWS credentials were present at startup (reported by `/`).
    pub credentials_configured: bool,
    /// Pipeline knobs shared by every request.
    pub extraction: ExtractionConfig,
}

impl ServiceConfig {
    /// Load the service configuration from the process environment.
    ///
    /// `AWS_ACCESS_KEY_ID` and `AWS_SECRET_ACCESS_KEY` must both be set and
    /// non-empty — absence is fatal at startup so a misconfigured deployment
    /// fails immediately instead of at the first OCR call.
    pub fn from_env() -> Result<Self, ExtractError> {
        let has = |key: &str| std::env::var(key).map(|v| !v.is_empty()).unwrap_or(false);

        if !has("AWS_ACCESS_KEY_ID") || !has("AWS_SECRET_ACCESS_KEY") {
            return Err(ExtractError::InvalidConfig(
                "AWS credentials not found in environment. \
                 Set AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY."
                    .into(),
            ));
        }

        Ok(Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into()),
            aws_region: std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".into()),
            credentials_configured: true,
            extraction: ExtractionConfig::default(),
        })
    }
}
