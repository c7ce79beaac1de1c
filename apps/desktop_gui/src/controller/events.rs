use client_core::BulkDeleteOutcome;
use shared::domain::{Todo, TodoId};

/// Settled results sent from the backend worker to the UI thread.
#[derive(Debug)]
pub enum UiEvent {
    BackendUnavailable(String),
    Loaded(Result<Vec<Todo>, String>),
    Created(Result<Todo, String>),
    Deleted {
        id: TodoId,
        result: Result<(), String>,
    },
    ClearedCompleted(BulkDeleteOutcome),
}
