//! Applies backend results to the list state owned by the UI thread.

use client_core::ListState;
use tracing::debug;

use crate::controller::events::UiEvent;

/// What the view should do after an event was applied.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Effects {
    pub refocus_input: bool,
}

pub fn apply_ui_event(state: &mut ListState, status: &mut String, event: UiEvent) -> Effects {
    let mut effects = Effects::default();
    match event {
        UiEvent::BackendUnavailable(message) => {
            *status = message;
        }
        UiEvent::Loaded(result) => {
            if state.finish_load(result).is_ok() {
                debug!(count = state.items().len(), "todo list loaded");
            }
        }
        UiEvent::Created(result) => {
            if let Err(err) = state.finish_create(result) {
                debug!(%err, "create settled with an error");
            }
            effects.refocus_input = true;
        }
        UiEvent::Deleted { id, result } => {
            if let Err(err) = state.finish_delete(id, result) {
                debug!(%err, todo_id = id.0, "delete settled with an error");
            }
            effects.refocus_input = true;
        }
        UiEvent::ClearedCompleted(outcome) => {
            if let Err(err) = state.finish_clear_completed(&outcome) {
                debug!(%err, failed = outcome.failed.len(), "clear completed settled with failures");
            }
        }
    }
    effects
}
