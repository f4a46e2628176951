//! Error types module
//!
//! Two error classes exist on the client:
//! - `ValidationError`: local intake failures, shown inline and cleared on the next file event.
//! - `TaskError`: failures of a classify/search request, shown as a blocking notification.
//!
//! `ResponseError` covers backend bodies that do not match the expected shape; it is folded
//! into `TaskError::MalformedResponse` at the dispatcher boundary.

use crate::models::TaskKind;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like a busy dispatcher
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Describes how an error should be presented and logged.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "FILE_TOO_LARGE")
    fn error_code(&self) -> &'static str;

    /// Message shown to the user
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Emit a tracing event for `err` at its own log level.
pub fn log_error<E: ErrorMetadata + std::fmt::Debug>(err: &E, context: &str) {
    match err.log_level() {
        LogLevel::Debug => tracing::debug!(code = err.error_code(), error = ?err, "{}", context),
        LogLevel::Warn => tracing::warn!(code = err.error_code(), error = ?err, "{}", context),
        LogLevel::Error => tracing::error!(code = err.error_code(), error = ?err, "{}", context),
    }
}

/// Local validation failure produced by file intake.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("File size must be less than {max_mb}MB")]
    FileTooLarge { size: u64, max_mb: u64 },

    #[error("Please select a valid image file")]
    UnsupportedType { name: String, mime_type: String },

    #[error("Failed to read image file")]
    Unreadable { reason: String },
}

impl ErrorMetadata for ValidationError {
    fn error_code(&self) -> &'static str {
        match self {
            ValidationError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            ValidationError::UnsupportedType { .. } => "UNSUPPORTED_TYPE",
            ValidationError::Unreadable { .. } => "UNREADABLE_IMAGE",
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }

    fn log_level(&self) -> LogLevel {
        match self {
            ValidationError::Unreadable { .. } => LogLevel::Warn,
            _ => LogLevel::Debug,
        }
    }
}

/// Backend body that could not be turned into a task result.
#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    #[error("Malformed response body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Field `{field}` out of range [0, 1]: {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("Field `{0}` must not be empty")]
    Empty(&'static str),
}

/// Failure of a classify or search request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TaskError {
    #[error("Please select an image first")]
    NoFileSelected,

    #[error("Another task is already running")]
    Busy { running: TaskKind },

    /// Network-level failure; carries the transport error message.
    #[error("{0}")]
    Transport(String),

    /// Non-2xx response; `detail` is the backend's message or a generic status line.
    #[error("{detail}")]
    Backend { status: u16, detail: String },

    #[error("{0}")]
    MalformedResponse(String),
}

impl TaskError {
    /// Build a backend error from a status code and the optional `detail` message.
    pub fn backend(status: u16, detail: Option<String>) -> Self {
        let detail = detail.unwrap_or_else(|| format!("Request failed with status code {}", status));
        TaskError::Backend { status, detail }
    }

    /// Notification text for a failure of the given task.
    ///
    /// Precondition failures are shown as-is; request failures are prefixed with the task
    /// name (e.g. "Classification failed: model not loaded").
    pub fn notification(&self, kind: TaskKind) -> String {
        match self {
            TaskError::NoFileSelected | TaskError::Busy { .. } => self.to_string(),
            _ => format!("{} failed: {}", kind.label(), self),
        }
    }
}

impl From<ResponseError> for TaskError {
    fn from(err: ResponseError) -> Self {
        TaskError::MalformedResponse(err.to_string())
    }
}

impl ErrorMetadata for TaskError {
    fn error_code(&self) -> &'static str {
        match self {
            TaskError::NoFileSelected => "NO_FILE_SELECTED",
            TaskError::Busy { .. } => "TASK_BUSY",
            TaskError::Transport(_) => "TRANSPORT_ERROR",
            TaskError::Backend { .. } => "BACKEND_ERROR",
            TaskError::MalformedResponse(_) => "MALFORMED_RESPONSE",
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }

    fn log_level(&self) -> LogLevel {
        match self {
            TaskError::NoFileSelected => LogLevel::Debug,
            TaskError::Busy { .. } | TaskError::Transport(_) => LogLevel::Warn,
            TaskError::Backend { status, .. } if *status < 500 => LogLevel::Warn,
            TaskError::Backend { .. } | TaskError::MalformedResponse(_) => LogLevel::Error,
        }
    }
}
