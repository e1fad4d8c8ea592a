// src/upload_gate.rs
//! Upload validation gate
//!
//! Every candidate-supplied binary artifact passes through here exactly once
//! per submission attempt: size gate, optional MIME gate, then base64
//! encoding for the JSON transport. Avatar images additionally get scaled
//! down and re-encoded as JPEG before the size gate, so the limit applies to
//! the compressed bytes. The returned string never carries a data-URL
//! prefix.

use crate::utils::format_mb;
use base64::{engine::general_purpose, Engine};
use image::imageops::FilterType;

/// Longest edge of a stored avatar, in pixels.
pub const AVATAR_MAX_EDGE: u32 = 500;
const AVATAR_JPEG_QUALITY: u8 = 70;

pub const DEFAULT_AVATAR_MAX_BYTES: u64 = 1024 * 1024;
pub const DEFAULT_CV_MAX_BYTES: u64 = 700 * 1024;

#[derive(Debug, Clone)]
pub struct UploadError {
    pub error_type: UploadErrorType,
    pub message: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadErrorType {
    SizeExceeded,
    InvalidFileType,
}

impl UploadErrorType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::SizeExceeded => "FILE_TOO_LARGE",
            Self::InvalidFileType => "INVALID_FILE_TYPE",
        }
    }
}

impl UploadError {
    fn size_exceeded(actual: u64, max_bytes: u64) -> Self {
        Self {
            error_type: UploadErrorType::SizeExceeded,
            message: format!(
                "File too large: {} (max {})",
                format_mb(actual),
                format_mb(max_bytes)
            ),
            suggestion: "Compress the file or pick a smaller one".to_string(),
        }
    }

    fn invalid_type(message: String, suggestion: &str) -> Self {
        Self {
            error_type: UploadErrorType::InvalidFileType,
            message,
            suggestion: suggestion.to_string(),
        }
    }
}

impl std::fmt::Display for UploadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for UploadError {}

/// Gate a document upload by size, then encode it for transport.
///
/// The boundary is inclusive: a file of exactly `max_bytes` passes. The
/// encoding is lossless, so decoding the result yields the input bytes.
pub fn validate_and_encode(bytes: &[u8], max_bytes: u64) -> Result<String, UploadError> {
    if bytes.len() as u64 > max_bytes {
        return Err(UploadError::size_exceeded(bytes.len() as u64, max_bytes));
    }
    Ok(general_purpose::STANDARD.encode(bytes))
}

/// Gate an avatar upload: require an `image/*` MIME type, scale the image so
/// its longer edge fits [`AVATAR_MAX_EDGE`], re-encode as JPEG, then apply
/// the size gate to the compressed bytes and encode for transport.
pub fn prepare_avatar(
    bytes: &[u8],
    declared_mime: Option<&str>,
    max_bytes: u64,
) -> Result<String, UploadError> {
    require_mime_prefix(declared_mime, "image/")?;
    let compressed = compress_image(bytes)?;
    validate_and_encode(&compressed, max_bytes)
}

fn require_mime_prefix(declared: Option<&str>, required: &str) -> Result<(), UploadError> {
    match declared {
        Some(mime) if mime.starts_with(required) => Ok(()),
        Some(mime) => Err(UploadError::invalid_type(
            format!("Unsupported file type: {} (expected {}*)", mime, required),
            "Upload a PNG or JPEG image",
        )),
        None => Err(UploadError::invalid_type(
            format!("Missing file type (expected {}*)", required),
            "Upload a PNG or JPEG image",
        )),
    }
}

fn compress_image(bytes: &[u8]) -> Result<Vec<u8>, UploadError> {
    let decoded = image::load_from_memory(bytes).map_err(|e| {
        UploadError::invalid_type(
            format!("Cannot decode image: {}", e),
            "Upload a valid PNG or JPEG image",
        )
    })?;

    let scaled = if decoded.width().max(decoded.height()) > AVATAR_MAX_EDGE {
        decoded.resize(AVATAR_MAX_EDGE, AVATAR_MAX_EDGE, FilterType::Triangle)
    } else {
        decoded
    };

    // JPEG has no alpha channel
    let rgb = scaled.to_rgb8();
    let mut out = Vec::new();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, AVATAR_JPEG_QUALITY);
    encoder.encode_image(&rgb).map_err(|e| {
        UploadError::invalid_type(
            format!("Cannot re-encode image: {}", e),
            "Upload a valid PNG or JPEG image",
        )
    })?;
    Ok(out)
}

/// Strip a `data:<mime>;base64,` prefix if present. The remainder is the
/// canonical encoded payload; a string without the prefix is returned as-is.
pub fn strip_data_url_prefix(payload: &str) -> &str {
    if payload.starts_with("data:") {
        if let Some(idx) = payload.find(";base64,") {
            return &payload[idx + ";base64,".len()..];
        }
    }
    payload
}

/// Decode a stored payload back to bytes, accepting an optional data-URL
/// prefix from older clients.
pub fn decode_payload(payload: &str) -> Result<Vec<u8>, UploadError> {
    general_purpose::STANDARD
        .decode(strip_data_url_prefix(payload).trim())
        .map_err(|e| {
            UploadError::invalid_type(
                format!("Invalid base64 payload: {}", e),
                "Re-upload the file",
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([
                ((x * 7919 + y * 104729) % 251) as u8,
                ((x * 104729 + y * 7919) % 241) as u8,
                ((x + y) % 255) as u8,
            ])
        });
        let mut out = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn boundary_is_inclusive() {
        let doc = vec![0x25u8; 64];
        assert!(validate_and_encode(&doc, 64).is_ok());

        let err = validate_and_encode(&doc, 63).unwrap_err();
        assert_eq!(err.error_type, UploadErrorType::SizeExceeded);
        assert_eq!(err.error_type.code(), "FILE_TOO_LARGE");
    }

    #[test]
    fn size_error_states_limit_in_mb() {
        let doc = vec![0u8; 800 * 1024];
        let err = validate_and_encode(&doc, DEFAULT_CV_MAX_BYTES).unwrap_err();
        assert!(err.message.contains("0.7MB"), "message: {}", err.message);
        assert!(err.message.contains("0.8MB"), "message: {}", err.message);
    }

    #[test]
    fn document_round_trip_is_lossless() {
        let doc: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let encoded = validate_and_encode(&doc, DEFAULT_CV_MAX_BYTES).unwrap();
        assert!(!encoded.contains("data:"));
        assert_eq!(decode_payload(&encoded).unwrap(), doc);
    }

    #[test]
    fn data_url_prefix_is_stripped_on_decode() {
        assert_eq!(
            strip_data_url_prefix("data:application/pdf;base64,QUJD"),
            "QUJD"
        );
        assert_eq!(strip_data_url_prefix("QUJD"), "QUJD");
        assert_eq!(
            decode_payload("data:application/pdf;base64,QUJD").unwrap(),
            b"ABC"
        );
    }

    #[test]
    fn avatar_requires_image_mime() {
        let png = png_bytes(10, 10);
        let err = prepare_avatar(&png, Some("application/pdf"), DEFAULT_AVATAR_MAX_BYTES)
            .unwrap_err();
        assert_eq!(err.error_type, UploadErrorType::InvalidFileType);

        let err = prepare_avatar(&png, None, DEFAULT_AVATAR_MAX_BYTES).unwrap_err();
        assert_eq!(err.error_type, UploadErrorType::InvalidFileType);
    }

    #[test]
    fn avatar_rejects_undecodable_bytes() {
        let err = prepare_avatar(b"not an image", Some("image/png"), DEFAULT_AVATAR_MAX_BYTES)
            .unwrap_err();
        assert_eq!(err.error_type, UploadErrorType::InvalidFileType);
    }

    #[test]
    fn avatar_longer_edge_is_capped() {
        let png = png_bytes(800, 600);
        let encoded = prepare_avatar(&png, Some("image/png"), DEFAULT_AVATAR_MAX_BYTES).unwrap();
        let stored = image::load_from_memory(&decode_payload(&encoded).unwrap()).unwrap();
        assert_eq!(stored.width(), 500);
        assert_eq!(stored.height(), 375);
    }

    #[test]
    fn small_avatar_is_not_upscaled() {
        let png = png_bytes(100, 50);
        let encoded = prepare_avatar(&png, Some("image/png"), DEFAULT_AVATAR_MAX_BYTES).unwrap();
        let stored = image::load_from_memory(&decode_payload(&encoded).unwrap()).unwrap();
        assert_eq!((stored.width(), stored.height()), (100, 50));
    }

    #[test]
    fn size_gate_applies_to_compressed_bytes() {
        let png = png_bytes(800, 600);
        // A limit below the original upload size still passes, because the
        // gate sees the scaled-down JPEG rather than the upload itself.
        let limit = png.len() as u64 - 1;
        assert!(prepare_avatar(&png, Some("image/png"), limit).is_ok());

        // A tiny limit still trips on the compressed output.
        let err = prepare_avatar(&png, Some("image/png"), 16).unwrap_err();
        assert_eq!(err.error_type, UploadErrorType::SizeExceeded);
    }
}
