//! Drag-and-drop state for the drop zone.

use serde::Serialize;

use crate::models::RawFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DragState {
    #[default]
    Idle,
    DragOver,
}

/// Pointer events delivered by the drop zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEvent {
    Enter,
    Over,
    /// `still_inside` is true when the pointer moved onto a child of the drop zone.
    Leave { still_inside: bool },
    Drop { files: Vec<RawFile> },
}

/// What the caller has to do after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragOutcome {
    /// Always set: the platform must not open or navigate to the dragged file.
    pub prevent_default: bool,
    /// First dropped file, to be handed to intake.
    pub dropped: Option<RawFile>,
    /// Reset the picker so re-selecting the same file still fires a change.
    pub clear_file_input: bool,
}

impl DragOutcome {
    fn suppressed() -> Self {
        Self {
            prevent_default: true,
            dropped: None,
            clear_file_input: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DragDropController {
    state: DragState,
}

impl DragDropController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_drag_over(&self) -> bool {
        self.state == DragState::DragOver
    }

    pub fn handle(&mut self, event: DragEvent) -> DragOutcome {
        match event {
            DragEvent::Enter | DragEvent::Over => {
                self.state = DragState::DragOver;
                DragOutcome::suppressed()
            }
            DragEvent::Leave { still_inside } => {
                if !still_inside {
                    self.state = DragState::Idle;
                }
                DragOutcome::suppressed()
            }
            DragEvent::Drop { files } => {
                self.state = DragState::Idle;
                let total = files.len();
                let dropped = files.into_iter().next();
                if total > 1 {
                    tracing::debug!(ignored = total - 1, "Only the first dropped file is used");
                }
                DragOutcome {
                    prevent_default: true,
                    clear_file_input: dropped.is_some(),
                    dropped,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> RawFile {
        RawFile::new(name, "image/png", vec![0u8; 4])
    }

    #[test]
    fn enter_over_leave_returns_to_idle() {
        let mut controller = DragDropController::new();
        assert!(controller.handle(DragEvent::Enter).prevent_default);
        assert!(controller.is_drag_over());
        controller.handle(DragEvent::Over);
        assert!(controller.is_drag_over());
        let outcome = controller.handle(DragEvent::Leave {
            still_inside: false,
        });
        assert!(outcome.prevent_default);
        assert_eq!(outcome.dropped, None);
        assert_eq!(controller.state(), DragState::Idle);
    }

    #[test]
    fn leaving_into_child_keeps_drag_over() {
        let mut controller = DragDropController::new();
        controller.handle(DragEvent::Enter);
        controller.handle(DragEvent::Leave { still_inside: true });
        assert!(controller.is_drag_over());
    }

    #[test]
    fn drop_forwards_first_file_only() {
        let mut controller = DragDropController::new();
        controller.handle(DragEvent::Enter);
        let outcome = controller.handle(DragEvent::Drop {
            files: vec![file("first.png"), file("second.png")],
        });
        assert_eq!(controller.state(), DragState::Idle);
        assert_eq!(outcome.dropped.map(|f| f.name), Some("first.png".to_string()));
        assert!(outcome.clear_file_input);
        assert!(outcome.prevent_default);
    }

    #[test]
    fn empty_drop_forwards_nothing() {
        let mut controller = DragDropController::new();
        controller.handle(DragEvent::Over);
        let outcome = controller.handle(DragEvent::Drop { files: vec![] });
        assert_eq!(outcome.dropped, None);
        assert!(!outcome.clear_file_input);
        assert_eq!(controller.state(), DragState::Idle);
    }
}
