pub mod driver;

use anyhow::Context;
use serde::Serialize;
use shopvision_core::intake::mime_for_extension;
use shopvision_core::{FileInfo, FilePreview, RawFile, ResultView, Session};
use std::path::Path;

pub use driver::Driver;

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Read a file from disk the way a picker hands it over: name, declared type, bytes.
pub async fn load_raw_file(path: &Path) -> anyhow::Result<RawFile> {
    let payload = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image")
        .to_string();
    let mime_type = mime_for_extension(&name);

    Ok(RawFile::new(name, mime_type, payload))
}

/// Preview without the encoded payload, for printing.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PreviewSummary {
    Image { width: u32, height: u32 },
    Unavailable,
}

impl From<&FilePreview> for PreviewSummary {
    fn from(preview: &FilePreview) -> Self {
        match preview {
            FilePreview::Image { width, height, .. } => PreviewSummary::Image {
                width: *width,
                height: *height,
            },
            FilePreview::Unavailable => PreviewSummary::Unavailable,
        }
    }
}

/// Everything the session currently has to show.
#[derive(Debug, Serialize)]
pub struct Report {
    pub file: Option<FileInfo>,
    pub preview: Option<PreviewSummary>,
    pub result: Option<ResultView>,
}

impl Report {
    pub fn from_session(session: &Session) -> Self {
        Self {
            file: session.file_info(),
            preview: session.preview().map(PreviewSummary::from),
            result: session.result_view(),
        }
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if let Some(file) = &self.file {
            out.push_str(&format!(
                "File: {} ({} • {})\n",
                file.name, file.type_label, file.size_kb
            ));
            if let Some(note) = file.note {
                out.push_str(&format!("Preview: {}\n", note));
            }
        }
        if let Some(PreviewSummary::Image { width, height }) = &self.preview {
            out.push_str(&format!("Preview: {}x{}\n", width, height));
        }
        if let Some(result) = &self.result {
            out.push('\n');
            out.push_str(&result.to_string());
        }
        out
    }
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}
