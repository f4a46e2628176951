//! Task dispatcher: runs classify/search requests one at a time.
//!
//! The running flag is claimed with a compare-and-swap before any request is built,
//! so a second call while a task is in flight fails with [`TaskError::Busy`] instead
//! of issuing a concurrent request. The flag is released by a guard when the request
//! settles, whatever the outcome.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use shopvision_core::error::log_error;
use shopvision_core::{SelectedFile, TaskError, TaskKind, TaskResult, TaskState};

use crate::ApiClient;

const IDLE: u8 = 0;
const RUNNING_CLASSIFY: u8 = 1;
const RUNNING_SEARCH: u8 = 2;

fn encode(kind: TaskKind) -> u8 {
    match kind {
        TaskKind::Classify => RUNNING_CLASSIFY,
        TaskKind::Search => RUNNING_SEARCH,
    }
}

fn decode(raw: u8) -> TaskState {
    match raw {
        RUNNING_CLASSIFY => TaskState::Running(TaskKind::Classify),
        RUNNING_SEARCH => TaskState::Running(TaskKind::Search),
        _ => TaskState::Idle,
    }
}

/// Resets the dispatcher to idle on drop.
struct RunningGuard {
    state: Arc<AtomicU8>,
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.state.store(IDLE, Ordering::Release);
    }
}

#[derive(Clone, Debug)]
pub struct TaskDispatcher {
    client: ApiClient,
    state: Arc<AtomicU8>,
}

impl TaskDispatcher {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: Arc::new(AtomicU8::new(IDLE)),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn state(&self) -> TaskState {
        decode(self.state.load(Ordering::Acquire))
    }

    pub async fn classify(&self, file: Option<&SelectedFile>) -> Result<TaskResult, TaskError> {
        self.dispatch(TaskKind::Classify, file).await
    }

    pub async fn search(&self, file: Option<&SelectedFile>) -> Result<TaskResult, TaskError> {
        self.dispatch(TaskKind::Search, file).await
    }

    /// Run `kind` against the backend with the selected file.
    ///
    /// Fails without touching the network when no file is selected or another task
    /// is running.
    pub async fn dispatch(
        &self,
        kind: TaskKind,
        file: Option<&SelectedFile>,
    ) -> Result<TaskResult, TaskError> {
        let Some(file) = file else {
            let err = TaskError::NoFileSelected;
            log_error(&err, "Task not dispatched");
            return Err(err);
        };

        let _guard = self.claim(kind)?;

        tracing::info!(
            task = %kind,
            endpoint = kind.endpoint(),
            file = %file.name(),
            size = file.size(),
            "Dispatching task"
        );

        let outcome = self.client.run_task(kind, file).await;
        match &outcome {
            Ok(_) => tracing::info!(task = %kind, "Task succeeded"),
            Err(err) => log_error(err, "Task request failed"),
        }
        outcome
    }

    fn claim(&self, kind: TaskKind) -> Result<RunningGuard, TaskError> {
        match self
            .state
            .compare_exchange(IDLE, encode(kind), Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => Ok(RunningGuard {
                state: Arc::clone(&self.state),
            }),
            Err(current) => {
                let running = decode(current).running_kind().unwrap_or(kind);
                let err = TaskError::Busy { running };
                log_error(&err, "Task rejected");
                Err(err)
            }
        }
    }
}
