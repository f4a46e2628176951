//! Domain models shared by intake, the session reducer and the API client.

pub mod file;
pub mod result;
pub mod task;

pub use file::{FileInfo, FilePreview, RawFile, SelectedFile};
pub use result::{ClassificationResult, SearchMatch, SearchResult, TaskResult};
pub use task::{TaskKind, TaskState};
