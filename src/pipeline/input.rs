//! Remote input: download a PDF from a URL into request-scoped temp storage.
//!
//! ## Why download to a temp file?
//!
//! Downloaded bytes are written to a `TempDir` whose lifetime is tied to the
//! request: when the returned [`DownloadedPdf`] drops — success or failure —
//! the storage is released unconditionally, even on panic. We validate the
//! PDF magic bytes (`%PDF`) before returning so callers get a meaningful
//! error rather than a pdfium parse failure later.

use crate::error::ExtractError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

/// A remote PDF fetched into a temporary directory.
///
/// The `TempDir` is kept alive to prevent cleanup until processing completes.
pub struct DownloadedPdf {
    path: PathBuf,
    _temp_dir: TempDir,
}

impl DownloadedPdf {
    /// Path of the downloaded file inside the temp directory.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Rewrite a Google Drive share link into a direct-download URL.
///
/// Drive's `/file/d/<id>/view` and `open?id=<id>` share forms serve an HTML
/// viewer page, not the file. Both carry a file id that the
/// `uc?export=download` endpoint accepts. Non-Drive URLs (and Drive URLs
/// with no recognisable id) pass through unchanged.
pub fn normalize_drive_url(url: &str) -> String {
    let Ok(parsed) = reqwest::Url::parse(url) else {
        return url.to_string();
    };

    let is_drive = parsed
        .host_str()
        .is_some_and(|h| h == "drive.google.com" || h.ends_with(".drive.google.com"));
    if !is_drive {
        return url.to_string();
    }

    // /file/d/<id>/... form
    if let Some(segments) = parsed.path_segments() {
        let parts: Vec<&str> = segments.collect();
        if parts.len() >= 3 && parts[0] == "file" && parts[1] == "d" && !parts[2].is_empty() {
            return format!("https://drive.google.com/uc?export=download&id={}", parts[2]);
        }
    }

    // ?id=<id> form (open?id=, uc?id=)
    if let Some((_, id)) = parsed.query_pairs().find(|(k, _)| k == "id") {
        if !id.is_empty() {
            return format!("https://drive.google.com/uc?export=download&id={}", id);
        }
    }

    url.to_string()
}

/// Download a PDF to a temporary directory and return its handle.
///
/// Google Drive share links are normalised first; the downloaded bytes must
/// start with the `%PDF` magic.
pub async fn download_pdf(url: &str, timeout_secs: u64) -> Result<DownloadedPdf, ExtractError> {
    let fetch_url = normalize_drive_url(url);
    info!("Downloading PDF from: {}", fetch_url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ExtractError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(&fetch_url).send().await.map_err(|e| {
        if e.is_timeout() {
            ExtractError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            ExtractError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(ExtractError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ExtractError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
        return Err(ExtractError::BadInput {
            reason: format!("Downloaded file from '{}' is not a PDF.", url),
        });
    }

    let temp_dir = TempDir::new().map_err(|e| ExtractError::Internal(e.to_string()))?;
    let file_path = temp_dir.path().join("downloaded.pdf");

    tokio::fs::write(&file_path, &bytes)
        .await
        .map_err(|e| ExtractError::Internal(format!("Failed to write temp file: {}", e)))?;

    debug!("Downloaded {} bytes to {}", bytes.len(), file_path.display());

    Ok(DownloadedPdf {
        path: file_path,
        _temp_dir: temp_dir,
    })
}
