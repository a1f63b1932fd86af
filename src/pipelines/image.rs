use crate::error::PipelineError;
use std::path::Path;

/// Image types every provider accepts inline
const SUPPORTED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Only Gemini reads HEIC/HEIF photos
const GOOGLE_ONLY_MIME_TYPES: &[&str] = &["image/heic", "image/heif"];

/// Check the image can be sent to `provider` and return its lowercased MIME type
pub fn validate(data: &[u8], mime_type: &str, provider: &str) -> Result<String, PipelineError> {
    if data.is_empty() {
        return Err(PipelineError::InvalidInput("Image is empty".to_string()));
    }

    let mime_type = mime_type.trim().to_ascii_lowercase();
    let accepted = SUPPORTED_MIME_TYPES.contains(&mime_type.as_str())
        || (provider == "google" && GOOGLE_ONLY_MIME_TYPES.contains(&mime_type.as_str()));
    if !accepted {
        return Err(PipelineError::InvalidInput(format!(
            "Unsupported image type for {provider}: {mime_type}"
        )));
    }
    Ok(mime_type)
}

/// Guess a MIME type from a file extension
pub fn mime_from_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

/// Read an image file and determine its MIME type
pub async fn load(path: &Path) -> Result<(Vec<u8>, String), PipelineError> {
    let mime_type = mime_from_path(path).ok_or_else(|| {
        PipelineError::InvalidInput(format!("Unrecognised image extension: {}", path.display()))
    })?;
    let data = tokio::fs::read(path).await.map_err(|e| {
        PipelineError::InvalidInput(format!("Failed to read {}: {e}", path.display()))
    })?;
    Ok((data, mime_type.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_from_path() {
        assert_eq!(mime_from_path(Path::new("a/b.JPG")), Some("image/jpeg"));
        assert_eq!(mime_from_path(Path::new("card.webp")), Some("image/webp"));
        assert_eq!(mime_from_path(Path::new("notes.txt")), None);
        assert_eq!(mime_from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_validate() {
        assert_eq!(validate(b"\xff\xd8", "image/jpeg", "openai").unwrap(), "image/jpeg");
        assert!(validate(b"", "image/jpeg", "openai").is_err());
        assert!(validate(b"%PDF", "application/pdf", "google").is_err());
    }

    #[test]
    fn test_validate_normalises_case() {
        assert_eq!(validate(b"\xff\xd8", " image/JPEG", "anthropic").unwrap(), "image/jpeg");
    }

    #[test]
    fn test_heic_only_for_google() {
        assert_eq!(validate(b"heic", "image/HEIC", "google").unwrap(), "image/heic");
        assert!(matches!(
            validate(b"heic", "image/heic", "openai"),
            Err(PipelineError::InvalidInput(_))
        ));
        assert!(validate(b"heif", "image/heif", "anthropic").is_err());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = load(Path::new("/definitely/not/here.png")).await;
        assert!(matches!(result, Err(PipelineError::InvalidInput(_))));
    }
}
