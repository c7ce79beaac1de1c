use serde::{Deserialize, Serialize};

use crate::domain::OwnerId;

/// Body of `POST /todos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTodo {
    pub title: String,
    #[serde(rename = "userId")]
    pub user_id: OwnerId,
    pub completed: bool,
}

impl NewTodo {
    pub fn new(user_id: OwnerId, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            user_id,
            completed: false,
        }
    }
}

/// Body of `PATCH /todos/{id}`. Unset fields are left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListTodosQuery {
    #[serde(rename = "userId")]
    pub user_id: OwnerId,
}
