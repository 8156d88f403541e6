//! Image encoding: `DynamicImage` → PNG bytes for the Textract request.
//!
//! PNG is chosen over JPEG because it is lossless — compression artefacts on
//! rendered text confuse the OCR engine and degrade recognition accuracy,
//! while text-heavy pages compress well under PNG anyway. Textract accepts
//! raw image bytes, so no base64 or data-URI wrapping is involved.

use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Encode a rasterised page as PNG bytes ready for Textract.
pub fn encode_page(img: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    debug!("Encoded page image → {} bytes PNG", buf.len());
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn encode_small_image() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255])));
        let bytes = encode_page(&img).expect("encode should succeed");
        // PNG magic
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }
}
