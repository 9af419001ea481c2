//! Character Portrait Processing
//!
//! Uploaded images are validated, downscaled to fit the portrait box, and
//! re-encoded as JPEG in a base64 `data:` URI stored inline on the
//! character. The document stays self-contained: no asset files travel
//! with an exported campaign.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::GenericImageView;
use thiserror::Error;

/// Hard cap on uploaded image payloads, checked before decoding.
pub const MAX_PORTRAIT_BYTES: usize = 2 * 1024 * 1024;

/// Portraits are scaled to fit within this square, preserving aspect ratio.
pub const PORTRAIT_MAX_DIM: u32 = 256;

/// JPEG quality for the re-encoded portrait.
pub const PORTRAIT_JPEG_QUALITY: u8 = 85;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum PortraitError {
    #[error("Unsupported content type {0:?}: portraits must be image files")]
    UnsupportedContentType(String),

    #[error("Image is {size} bytes, over the {max} byte limit")]
    TooLarge { size: usize, max: usize },

    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode portrait: {0}")]
    Encode(#[source] image::ImageError),
}

pub type Result<T> = std::result::Result<T, PortraitError>;

// ============================================================================
// Processing
// ============================================================================

/// Validate, downscale, and re-encode an uploaded image.
///
/// Returns the `data:image/jpeg;base64,…` URI to store on the character.
/// Images already within [`PORTRAIT_MAX_DIM`] keep their dimensions; larger
/// ones are scaled down to fit, never up. Alpha channels are flattened,
/// since the stored portrait is always JPEG.
pub fn process_portrait(bytes: &[u8], content_type: &str) -> Result<String> {
    if !content_type.starts_with("image/") {
        return Err(PortraitError::UnsupportedContentType(
            content_type.to_string(),
        ));
    }
    if bytes.len() > MAX_PORTRAIT_BYTES {
        return Err(PortraitError::TooLarge {
            size: bytes.len(),
            max: MAX_PORTRAIT_BYTES,
        });
    }

    let decoded = image::load_from_memory(bytes).map_err(PortraitError::Decode)?;
    let (width, height) = decoded.dimensions();
    let scaled = if width > PORTRAIT_MAX_DIM || height > PORTRAIT_MAX_DIM {
        log::debug!(
            "Resizing portrait from {}x{} to fit {}x{}",
            width,
            height,
            PORTRAIT_MAX_DIM,
            PORTRAIT_MAX_DIM
        );
        decoded.resize(PORTRAIT_MAX_DIM, PORTRAIT_MAX_DIM, FilterType::Triangle)
    } else {
        decoded
    };

    let rgb = scaled.to_rgb8();
    let mut jpeg = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut jpeg, PORTRAIT_JPEG_QUALITY);
    rgb.write_with_encoder(encoder)
        .map_err(PortraitError::Encode)?;

    Ok(format!("data:image/jpeg;base64,{}", BASE64.encode(&jpeg)))
}

// ============================================================================
// Tests
// ============================================================================
