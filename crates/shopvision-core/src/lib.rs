//! shopvision core library
//!
//! Client-side state for submitting one image to the shop classification and
//! similarity search backend: file intake, drag-and-drop, the session reducer,
//! response parsing and result rendering. No networking happens here; see
//! `shopvision-api-client` for the transport and dispatcher.

pub mod config;
pub mod drag_drop;
pub mod error;
pub mod intake;
pub mod models;
pub mod render;
pub mod session;

// Re-export commonly used types
pub use config::ClientConfig;
pub use drag_drop::{DragDropController, DragEvent, DragOutcome, DragState};
pub use error::{ErrorMetadata, LogLevel, ResponseError, TaskError, ValidationError};
pub use intake::{derive_preview, FileIntake, IntakeOutcome, PreviewPlan};
pub use models::{
    ClassificationResult, FileInfo, FilePreview, RawFile, SearchMatch, SearchResult,
    SelectedFile, TaskKind, TaskResult, TaskState,
};
pub use render::{render, ResultView};
pub use session::{Action, Effect, Session};
