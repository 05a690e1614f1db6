use std::fmt;
use std::path::Path;

/// Image extensions (and MIME subtypes) accepted for upload.
pub const IMAGE_TYPES: &[&str] = &["jpeg", "jpg", "png", "gif"];

/// Result of validating a flat filename.
#[derive(Debug, PartialEq, Eq)]
pub enum FilenameError {
    /// Filename is empty or whitespace-only.
    Empty,
    /// Filename contains path separators (`/` or `\`).
    ContainsPathSeparator,
    /// Filename is `.` or `..`.
    PathTraversal,
    /// Filename contains null bytes.
    NullByte,
    /// Filename contains control characters (CR, LF, etc.).
    ControlCharacter,
}

impl FilenameError {
    /// Returns a human-readable error message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "Filename cannot be empty",
            Self::ContainsPathSeparator => "Invalid filename: path separators are not allowed",
            Self::PathTraversal => "Invalid filename: '.' and '..' are not allowed",
            Self::NullByte => "Invalid filename: null bytes are not allowed",
            Self::ControlCharacter => "Invalid filename: control characters are not allowed",
        }
    }
}

/// Validates a flat filename (no directory components allowed).
///
/// The name is returned unchanged; it becomes the stored filename verbatim.
pub fn validate_flat_filename(filename: &str) -> Result<&str, FilenameError> {
    if filename.trim().is_empty() {
        return Err(FilenameError::Empty);
    }

    if filename.contains('\0') {
        return Err(FilenameError::NullByte);
    }

    if filename.chars().any(|c| c.is_ascii_control()) {
        return Err(FilenameError::ControlCharacter);
    }

    if filename.contains('/') || filename.contains('\\') {
        return Err(FilenameError::ContainsPathSeparator);
    }

    if filename == "." || filename == ".." {
        return Err(FilenameError::PathTraversal);
    }

    Ok(filename)
}

/// An upload refused by [`validate_image`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRejection {
    pub filename: String,
    pub mime_type: String,
}

impl fmt::Display for UploadRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Images Only!")
    }
}

impl std::error::Error for UploadRejection {}

/// Accept a file only if both its extension and its declared content type
/// name an image type.
///
/// The extension must be exactly one of [`IMAGE_TYPES`] (case-insensitive).
/// The content type only has to contain one of them as sent, so `image/png`
/// and `image/x-png` pass but `IMAGE/PNG` does not. Content is never
/// inspected.
pub fn validate_image(filename: &str, mime_type: &str) -> Result<(), UploadRejection> {
    let extension_ok = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_TYPES.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false);

    let mime_ok = IMAGE_TYPES.iter().any(|t| mime_type.contains(t));

    if extension_ok && mime_ok {
        Ok(())
    } else {
        Err(UploadRejection {
            filename: filename.to_string(),
            mime_type: mime_type.to_string(),
        })
    }
}
