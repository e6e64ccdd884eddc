use crate::error::AppError;
use base64::{engine::general_purpose, Engine as _};

/// Largest accepted room photo after decoding
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

const SUPPORTED_FORMATS: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// A validated, base64-encoded upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub mime_type: String,
    pub base64_data: String,
}

impl UploadedImage {
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_data)
    }
}

/// Accept either a data URL or bare base64 and validate it as a room photo
///
/// For bare base64 the format is detected from the file signature.
pub fn normalize_upload(input: &str) -> Result<UploadedImage, AppError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AppError::InvalidImage("No image provided".to_string()));
    }

    if input.starts_with("data:") {
        let (mime_type, base64_data) = parse_data_url(input)?;
        return Ok(UploadedImage {
            mime_type,
            base64_data,
        });
    }

    let decoded = decode_base64(input)?;
    let mime_type = sniff_mime_type(&decoded)
        .ok_or_else(|| AppError::InvalidImage("Unrecognized image format".to_string()))?;
    validate_image_size(&decoded, mime_type)?;

    Ok(UploadedImage {
        mime_type: mime_type.to_string(),
        base64_data: input.to_string(),
    })
}

/// Parse a data URL (e.g., "data:image/jpeg;base64,<data>")
/// Returns (mime_type, base64_data)
pub fn parse_data_url(data_url: &str) -> Result<(String, String), AppError> {
    let url_body = data_url
        .strip_prefix("data:")
        .ok_or_else(|| AppError::InvalidImage("Invalid data URL: must start with 'data:'".to_string()))?;

    let (header, data) = url_body.split_once(',').ok_or_else(|| {
        AppError::InvalidImage("Invalid data URL format: missing comma separator".to_string())
    })?;

    // "image/jpeg;base64" or just "image/jpeg"
    let mut header_parts = header.split(';');
    let mime_type = header_parts.next().unwrap_or_default().to_lowercase();

    if !header_parts.any(|part| part == "base64") {
        return Err(AppError::InvalidImage(
            "Only base64-encoded data URLs are supported".to_string(),
        ));
    }

    if !mime_type.starts_with("image/") {
        return Err(AppError::InvalidImage(format!(
            "Invalid MIME type for image: {}",
            mime_type
        )));
    }

    let decoded = decode_base64(data)?;
    validate_image_size(&decoded, &mime_type)?;

    Ok((mime_type, data.to_string()))
}

fn decode_base64(data: &str) -> Result<Vec<u8>, AppError> {
    general_purpose::STANDARD
        .decode(data)
        .map_err(|e| AppError::InvalidImage(format!("Invalid base64 data: {}", e)))
}

/// Detect the image format from its leading bytes
pub fn sniff_mime_type(data: &[u8]) -> Option<&'static str> {
    match data {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, b'P', b'N', b'G', ..] => Some("image/png"),
        [b'G', b'I', b'F', b'8', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        _ => None,
    }
}

/// Validate image format and size
pub fn validate_image_size(data: &[u8], mime_type: &str) -> Result<(), AppError> {
    if data.is_empty() {
        return Err(AppError::InvalidImage("Image is empty".to_string()));
    }

    if data.len() > MAX_IMAGE_BYTES {
        return Err(AppError::InvalidImage(format!(
            "Image too large: {} bytes (max: {} bytes)",
            data.len(),
            MAX_IMAGE_BYTES
        )));
    }

    let mime_base = mime_type
        .split(';')
        .next()
        .unwrap_or(mime_type)
        .to_lowercase();

    if !SUPPORTED_FORMATS.contains(&mime_base.as_str()) {
        return Err(AppError::InvalidImage(format!(
            "Unsupported image format: {} (supported: jpeg, png, gif, webp)",
            mime_base
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_url_valid() {
        let (mime_type, data) = parse_data_url("data:image/jpeg;base64,/9j/4AAQSkZJRg==").unwrap();
        assert_eq!(mime_type, "image/jpeg");
        assert_eq!(data, "/9j/4AAQSkZJRg==");
    }

    #[test]
    fn test_parse_data_url_invalid_prefix() {
        assert!(parse_data_url("http://example.com/room.jpg").is_err());
    }

    #[test]
    fn test_parse_data_url_missing_comma() {
        assert!(parse_data_url("data:image/jpeg;base64").is_err());
    }

    #[test]
    fn test_parse_data_url_not_base64() {
        assert!(parse_data_url("data:image/jpeg,notbase64data").is_err());
    }

    #[test]
    fn test_normalize_bare_base64_detects_png() {
        let image = normalize_upload("iVBORw0KGgo=").unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data_url(), "data:image/png;base64,iVBORw0KGgo=");
    }

    #[test]
    fn test_normalize_rejects_unknown_bytes() {
        let result = normalize_upload("aGVsbG8gd29ybGQ=");
        assert!(matches!(result, Err(AppError::InvalidImage(_))));
    }

    #[test]
    fn test_normalize_rejects_empty() {
        assert!(matches!(normalize_upload("  "), Err(AppError::InvalidImage(_))));
    }

    #[test]
    fn test_sniff_webp() {
        let mut data = b"RIFF".to_vec();
        data.extend_from_slice(&[0, 0, 0, 0]);
        data.extend_from_slice(b"WEBPVP8 ");
        assert_eq!(sniff_mime_type(&data), Some("image/webp"));
    }

    #[test]
    fn test_validate_image_size_too_large() {
        let data = vec![0u8; MAX_IMAGE_BYTES + 1];
        assert!(validate_image_size(&data, "image/jpeg").is_err());
    }

    #[test]
    fn test_validate_image_unsupported_format() {
        assert!(validate_image_size(&[1, 2, 3], "image/bmp").is_err());
    }
}
