use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// One of the two backend operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Classify,
    Search,
}

impl TaskKind {
    /// Endpoint path the task is POSTed to.
    pub fn endpoint(&self) -> &'static str {
        match self {
            TaskKind::Classify => "/api/task1/classify",
            TaskKind::Search => "/api/task2/search",
        }
    }

    /// Human-readable task name used in notifications.
    pub fn label(&self) -> &'static str {
        match self {
            TaskKind::Classify => "Classification",
            TaskKind::Search => "Search",
        }
    }
}

impl Display for TaskKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            TaskKind::Classify => write!(f, "classify"),
            TaskKind::Search => write!(f, "search"),
        }
    }
}

impl FromStr for TaskKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "classify" => Ok(TaskKind::Classify),
            "search" => Ok(TaskKind::Search),
            _ => Err(anyhow::anyhow!("Invalid task kind: {}", s)),
        }
    }
}

/// Dispatch state. At most one task runs at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "task", rename_all = "lowercase")]
pub enum TaskState {
    #[default]
    Idle,
    Running(TaskKind),
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        matches!(self, TaskState::Running(_))
    }

    pub fn running_kind(&self) -> Option<TaskKind> {
        match self {
            TaskState::Running(kind) => Some(*kind),
            TaskState::Idle => None,
        }
    }
}
