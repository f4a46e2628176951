use bytes::Bytes;
use serde::Serialize;

use crate::intake::is_heic;

/// A file handed over by the picker or a drop, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFile {
    pub name: String,
    /// Declared MIME type; may be empty when the platform could not tell.
    pub mime_type: String,
    pub payload: Bytes,
}

impl RawFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            payload: payload.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.payload.len() as u64
    }
}

/// A file that passed intake validation.
///
/// Only [`crate::intake::FileIntake`] creates these, so holding one means the size and type
/// checks succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    mime_type: String,
    payload: Bytes,
}

impl SelectedFile {
    pub(crate) fn from_raw(raw: RawFile) -> Self {
        Self {
            name: raw.name,
            mime_type: raw.mime_type,
            payload: raw.payload,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn size(&self) -> u64 {
        self.payload.len() as u64
    }

    pub fn is_heic(&self) -> bool {
        is_heic(&self.name, &self.mime_type)
    }
}

/// Displayable rendition of the selected file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilePreview {
    /// Decoded image as a `data:` URL.
    Image {
        data_url: String,
        width: u32,
        height: u32,
    },
    /// Format cannot be previewed (HEIC/HEIF).
    Unavailable,
}

impl FilePreview {
    pub fn is_available(&self) -> bool {
        matches!(self, FilePreview::Image { .. })
    }
}

pub const PREVIEW_UNAVAILABLE_NOTE: &str = "Preview not available for HEIC files";

/// Summary line shown under the drop zone for an accepted file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    pub name: String,
    pub type_label: String,
    pub size_kb: String,
    pub can_preview: bool,
    pub note: Option<&'static str>,
}

impl FileInfo {
    pub fn describe(file: &SelectedFile) -> Self {
        let heic = file.is_heic();
        let type_label = if heic {
            "HEIC/HEIF".to_string()
        } else {
            file.mime_type()
                .split('/')
                .nth(1)
                .filter(|subtype| !subtype.is_empty())
                .map(|subtype| subtype.to_uppercase())
                .unwrap_or_else(|| "Unknown".to_string())
        };

        Self {
            name: file.name().to_string(),
            type_label,
            size_kb: format!("{:.1} KB", file.size() as f64 / 1024.0),
            can_preview: !heic,
            note: heic.then_some(PREVIEW_UNAVAILABLE_NOTE),
        }
    }
}
