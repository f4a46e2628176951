//! Session state and its reducer.
//!
//! Every change to the UI state goes through [`Session::apply`]. Work that cannot happen
//! inside the reducer (decoding a preview, calling the backend) is returned as an
//! [`Effect`]; the driver runs it and feeds the outcome back as another [`Action`].
//!
//! Each file event bumps a selection generation. Preview and task effects carry the
//! generation they were issued for, and outcomes for an older generation are dropped.

use crate::drag_drop::{DragDropController, DragEvent, DragState};
use crate::error::{log_error, TaskError, ValidationError};
use crate::intake::{FileIntake, IntakeOutcome, PreviewPlan};
use crate::models::{FileInfo, FilePreview, RawFile, SelectedFile, TaskKind, TaskResult, TaskState};
use crate::render::{render, ResultView};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// File picked through the input control (`None` when the picker was cleared).
    SelectFile(Option<RawFile>),
    Drag(DragEvent),
    PreviewReady { generation: u64, preview: FilePreview },
    PreviewFailed { generation: u64, error: ValidationError },
    StartTask(TaskKind),
    TaskSucceeded { generation: u64, result: TaskResult },
    TaskFailed { generation: u64, kind: TaskKind, error: TaskError },
    DismissNotification,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Suppress the platform's default handling of the drag event.
    PreventDefault,
    /// Reset the file input control.
    ClearFileInput,
    DecodePreview { generation: u64, file: SelectedFile },
    Dispatch { generation: u64, kind: TaskKind, file: SelectedFile },
    /// Show a blocking notification.
    Notify(String),
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    intake: FileIntake,
    drag: DragDropController,
    selected: Option<SelectedFile>,
    preview: Option<FilePreview>,
    validation_error: Option<ValidationError>,
    task: TaskState,
    result: Option<TaskResult>,
    notification: Option<String>,
    generation: u64,
}

impl Session {
    pub fn new(intake: FileIntake) -> Self {
        Self {
            intake,
            ..Self::default()
        }
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn preview(&self) -> Option<&FilePreview> {
        self.preview.as_ref()
    }

    pub fn validation_error(&self) -> Option<&ValidationError> {
        self.validation_error.as_ref()
    }

    pub fn task_state(&self) -> TaskState {
        self.task
    }

    pub fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    pub fn result(&self) -> Option<&TaskResult> {
        self.result.as_ref()
    }

    pub fn notification(&self) -> Option<&str> {
        self.notification.as_deref()
    }

    /// Summary of the accepted file, hidden while a validation error is shown.
    pub fn file_info(&self) -> Option<FileInfo> {
        match (&self.selected, &self.validation_error) {
            (Some(file), None) => Some(FileInfo::describe(file)),
            _ => None,
        }
    }

    /// Whether the task buttons are enabled.
    pub fn can_submit(&self) -> bool {
        !self.task.is_running() && self.selected.is_some() && self.validation_error.is_none()
    }

    pub fn result_view(&self) -> Option<ResultView> {
        render(self.result.as_ref())
    }

    pub fn apply(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::SelectFile(candidate) => self.process_candidate(candidate),
            Action::Drag(event) => self.handle_drag(event),
            Action::PreviewReady {
                generation,
                preview,
            } => {
                if self.is_current(generation, "preview") {
                    self.preview = Some(preview);
                }
                Vec::new()
            }
            Action::PreviewFailed { generation, error } => {
                if self.is_current(generation, "preview") {
                    // the selection stays; only the preview is lost
                    self.preview = None;
                    self.validation_error = Some(error);
                }
                Vec::new()
            }
            Action::StartTask(kind) => self.start_task(kind),
            Action::TaskSucceeded { generation, result } => {
                self.task = TaskState::Idle;
                if self.is_current(generation, "task result") {
                    tracing::info!(task = %result.kind(), "Task completed");
                    self.result = Some(result);
                }
                Vec::new()
            }
            Action::TaskFailed {
                generation,
                kind,
                error,
            } => {
                self.task = TaskState::Idle;
                if !self.is_current(generation, "task failure") {
                    return Vec::new();
                }
                log_error(&error, "Task failed");
                self.notify(error.notification(kind))
            }
            Action::DismissNotification => {
                self.notification = None;
                Vec::new()
            }
        }
    }

    fn is_current(&self, generation: u64, what: &str) -> bool {
        let current = generation == self.generation;
        if !current {
            tracing::debug!(
                generation,
                current = self.generation,
                "Discarding stale {}",
                what
            );
        }
        current
    }

    fn notify(&mut self, message: String) -> Vec<Effect> {
        self.notification = Some(message.clone());
        vec![Effect::Notify(message)]
    }

    fn process_candidate(&mut self, candidate: Option<RawFile>) -> Vec<Effect> {
        self.generation += 1;
        self.validation_error = None;

        match self.intake.process(candidate) {
            IntakeOutcome::Cleared => {
                self.selected = None;
                self.preview = None;
                Vec::new()
            }
            IntakeOutcome::Rejected(err) => {
                log_error(&err, "File rejected");
                self.selected = None;
                self.preview = None;
                self.validation_error = Some(err);
                Vec::new()
            }
            IntakeOutcome::Accepted { file, preview } => {
                self.selected = Some(file.clone());
                match preview {
                    PreviewPlan::Unavailable => {
                        self.preview = Some(FilePreview::Unavailable);
                        Vec::new()
                    }
                    PreviewPlan::Decode => {
                        self.preview = None;
                        vec![Effect::DecodePreview {
                            generation: self.generation,
                            file,
                        }]
                    }
                }
            }
        }
    }

    fn handle_drag(&mut self, event: DragEvent) -> Vec<Effect> {
        let outcome = self.drag.handle(event);
        let mut effects = Vec::new();
        if outcome.prevent_default {
            effects.push(Effect::PreventDefault);
        }
        if let Some(file) = outcome.dropped {
            effects.extend(self.process_candidate(Some(file)));
        }
        if outcome.clear_file_input {
            effects.push(Effect::ClearFileInput);
        }
        effects
    }

    fn start_task(&mut self, kind: TaskKind) -> Vec<Effect> {
        if let TaskState::Running(running) = self.task {
            tracing::debug!(requested = %kind, running = %running, "Ignoring task trigger while busy");
            return Vec::new();
        }

        let Some(file) = self.selected.clone() else {
            return self.notify(TaskError::NoFileSelected.notification(kind));
        };

        if self.validation_error.is_some() {
            tracing::debug!(task = %kind, "Ignoring task trigger while a file error is shown");
            return Vec::new();
        }

        self.task = TaskState::Running(kind);
        tracing::info!(task = %kind, file = %file.name(), "Starting task");
        vec![Effect::Dispatch {
            generation: self.generation,
            kind,
            file,
        }]
    }
}
