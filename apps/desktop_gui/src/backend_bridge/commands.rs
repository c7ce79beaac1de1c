//! Backend commands queued from UI to backend worker.

use shared::{domain::TodoId, protocol::NewTodo};

#[derive(Debug)]
pub enum BackendCommand {
    Load,
    Create(NewTodo),
    Delete(TodoId),
    ClearCompleted(Vec<TodoId>),
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Load => "load",
            BackendCommand::Create(_) => "create",
            BackendCommand::Delete(_) => "delete",
            BackendCommand::ClearCompleted(_) => "clear_completed",
        }
    }
}
