//! File intake: validation and preview derivation.
//!
//! Checks run in a fixed order and the first failure wins:
//! 1. no candidate clears the selection
//! 2. size over the limit
//! 3. neither an `image/*` MIME type nor a supported extension
//!
//! Accepted files get a preview plan. HEIC/HEIF cannot be previewed; every other
//! format is decoded off the async runtime into a `data:` URL.

use base64::{engine::general_purpose, Engine as _};
use image::{GenericImageView, ImageReader};
use std::io::Cursor;

use crate::config::ClientConfig;
use crate::error::ValidationError;
use crate::models::{FilePreview, RawFile, SelectedFile};

/// Default upload limit in megabytes.
pub const MAX_FILE_SIZE_MB: u64 = 10;

/// Extensions accepted even when the declared MIME type is missing or wrong.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "tiff", "heic", "heif",
];

const IMAGE_MIME_PREFIX: &str = "image/";

/// Lowercased extension of `name`, if any.
///
/// Everything after the last dot counts, so a bare `.png` still has an extension.
pub fn extension_of(name: &str) -> Option<String> {
    name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase())
}

/// True for HEIC/HEIF files, judged by MIME type or extension.
pub fn is_heic(name: &str, mime_type: &str) -> bool {
    let mime = mime_type.to_lowercase();
    mime == "image/heic"
        || mime == "image/heif"
        || matches!(extension_of(name).as_deref(), Some("heic") | Some("heif"))
}

/// MIME type implied by a supported extension; empty for anything else.
pub fn mime_for_extension(name: &str) -> &'static str {
    match extension_of(name).as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("tiff") => "image/tiff",
        Some("heic") => "image/heic",
        Some("heif") => "image/heif",
        _ => "",
    }
}

/// What to do about the preview of an accepted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewPlan {
    /// Preview is known to be unavailable; no decoding needed.
    Unavailable,
    /// Decode the payload asynchronously.
    Decode,
}

/// Result of processing one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeOutcome {
    /// No candidate: selection and preview are cleared, no error.
    Cleared,
    /// Candidate rejected; the selection is left absent.
    Rejected(ValidationError),
    Accepted {
        file: SelectedFile,
        preview: PreviewPlan,
    },
}

/// Validator for candidate image files.
#[derive(Debug, Clone)]
pub struct FileIntake {
    max_file_size_mb: u64,
}

impl Default for FileIntake {
    fn default() -> Self {
        Self::new(MAX_FILE_SIZE_MB)
    }
}

impl FileIntake {
    pub fn new(max_file_size_mb: u64) -> Self {
        Self { max_file_size_mb }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.max_file_size_mb)
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: u64) -> Result<(), ValidationError> {
        if size > self.max_file_size_bytes() {
            return Err(ValidationError::FileTooLarge {
                size,
                max_mb: self.max_file_size_mb,
            });
        }
        Ok(())
    }

    /// Validate that the file looks like an image by MIME prefix or extension
    pub fn validate_image_type(&self, name: &str, mime_type: &str) -> Result<(), ValidationError> {
        let mime_ok = mime_type.to_lowercase().starts_with(IMAGE_MIME_PREFIX);
        let extension_ok = extension_of(name)
            .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false);

        if mime_ok || extension_ok {
            Ok(())
        } else {
            Err(ValidationError::UnsupportedType {
                name: name.to_string(),
                mime_type: mime_type.to_string(),
            })
        }
    }

    /// Run size and type checks and wrap the file on success.
    pub fn accept(&self, raw: RawFile) -> Result<SelectedFile, ValidationError> {
        self.validate_file_size(raw.size())?;
        self.validate_image_type(&raw.name, &raw.mime_type)?;
        Ok(SelectedFile::from_raw(raw))
    }

    /// Process a candidate from the picker or a drop.
    pub fn process(&self, candidate: Option<RawFile>) -> IntakeOutcome {
        let Some(raw) = candidate else {
            return IntakeOutcome::Cleared;
        };

        let name = raw.name.clone();
        match self.accept(raw) {
            Ok(file) => {
                let preview = if file.is_heic() {
                    PreviewPlan::Unavailable
                } else {
                    PreviewPlan::Decode
                };
                tracing::debug!(
                    file = %name,
                    size = file.size(),
                    mime_type = %file.mime_type(),
                    preview = ?preview,
                    "Accepted file"
                );
                IntakeOutcome::Accepted { file, preview }
            }
            Err(err) => {
                tracing::debug!(file = %name, error = %err, "Rejected file");
                IntakeOutcome::Rejected(err)
            }
        }
    }
}

/// Decode `file` into a preview on the current thread.
///
/// HEIC/HEIF files yield [`FilePreview::Unavailable`] without decoding.
pub fn decode_preview(file: &SelectedFile) -> Result<FilePreview, ValidationError> {
    if file.is_heic() {
        return Ok(FilePreview::Unavailable);
    }

    let unreadable = |reason: String| ValidationError::Unreadable { reason };

    let reader = ImageReader::new(Cursor::new(file.payload().as_ref()))
        .with_guessed_format()
        .map_err(|e| unreadable(e.to_string()))?;
    let format = reader.format();
    let img = reader.decode().map_err(|e| unreadable(e.to_string()))?;
    let (width, height) = img.dimensions();

    let mime_type = if file.mime_type().to_lowercase().starts_with(IMAGE_MIME_PREFIX) {
        file.mime_type().to_string()
    } else {
        format
            .map(|f| f.to_mime_type().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string())
    };

    let encoded = general_purpose::STANDARD.encode(file.payload());
    Ok(FilePreview::Image {
        data_url: format!("data:{};base64,{}", mime_type, encoded),
        width,
        height,
    })
}

/// Decode `file` into a preview on the blocking pool.
pub async fn derive_preview(file: SelectedFile) -> Result<FilePreview, ValidationError> {
    let name = file.name().to_string();
    let result = tokio::task::spawn_blocking(move || decode_preview(&file))
        .await
        .map_err(|e| ValidationError::Unreadable {
            reason: format!("Preview task failed: {}", e),
        })?;

    if let Err(ref err) = result {
        tracing::warn!(file = %name, error = ?err, "Failed to decode preview");
    }
    result
}
