use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{
    domain::{OwnerId, Todo, TodoId},
    protocol::{NewTodo, TodoPatch},
};
use tokio::sync::Barrier;

use crate::store::TodoStore;

pub(crate) const OWNER: OwnerId = OwnerId(42);

pub(crate) fn todo(id: i64, title: &str, completed: bool) -> Todo {
    Todo {
        id: TodoId(id),
        user_id: OWNER,
        title: title.to_string(),
        completed,
    }
}

#[derive(Default)]
struct FakeState {
    todos: Vec<Todo>,
    next_id: i64,
    list_calls: usize,
    created: Vec<NewTodo>,
    deleted: Vec<TodoId>,
}

/// In-memory `TodoStore` with switchable failures and call recording.
#[derive(Default)]
pub(crate) struct FakeStore {
    state: Mutex<FakeState>,
    fail_list: bool,
    fail_create: bool,
    failing_deletes: HashSet<TodoId>,
    delete_barrier: Option<Arc<Barrier>>,
}

impl FakeStore {
    pub(crate) fn with_todos(todos: Vec<Todo>) -> Self {
        let next_id = todos.iter().map(|t| t.id.0).max().unwrap_or(0);
        Self {
            state: Mutex::new(FakeState {
                todos,
                next_id,
                ..FakeState::default()
            }),
            ..Self::default()
        }
    }

    pub(crate) fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub(crate) fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub(crate) fn failing_delete(mut self, id: TodoId) -> Self {
        self.failing_deletes.insert(id);
        self
    }

    /// Every delete blocks until `parties` deletes are in flight at once.
    pub(crate) fn with_delete_barrier(mut self, parties: usize) -> Self {
        self.delete_barrier = Some(Arc::new(Barrier::new(parties)));
        self
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.state.lock().expect("fake state").list_calls
    }

    pub(crate) fn created(&self) -> Vec<NewTodo> {
        self.state.lock().expect("fake state").created.clone()
    }

    pub(crate) fn deleted(&self) -> Vec<TodoId> {
        self.state.lock().expect("fake state").deleted.clone()
    }

    pub(crate) fn remote_todos(&self) -> Vec<Todo> {
        self.state.lock().expect("fake state").todos.clone()
    }
}

#[async_trait]
impl TodoStore for FakeStore {
    fn owner(&self) -> OwnerId {
        OWNER
    }

    async fn list(&self) -> Result<Vec<Todo>> {
        let mut state = self.state.lock().expect("fake state");
        state.list_calls += 1;
        if self.fail_list {
            return Err(anyhow!("list unavailable"));
        }
        Ok(state.todos.clone())
    }

    async fn create(&self, todo: &NewTodo) -> Result<Todo> {
        let mut state = self.state.lock().expect("fake state");
        state.created.push(todo.clone());
        if self.fail_create {
            return Err(anyhow!("create rejected"));
        }
        state.next_id += 1;
        let created = Todo {
            id: TodoId(state.next_id),
            user_id: todo.user_id,
            title: todo.title.clone(),
            completed: todo.completed,
        };
        state.todos.push(created.clone());
        Ok(created)
    }

    async fn delete(&self, id: TodoId) -> Result<()> {
        if let Some(barrier) = &self.delete_barrier {
            barrier.wait().await;
        }

        let mut state = self.state.lock().expect("fake state");
        state.deleted.push(id);
        if self.failing_deletes.contains(&id) {
            return Err(anyhow!("delete of {id} rejected"));
        }
        state.todos.retain(|todo| todo.id != id);
        Ok(())
    }

    async fn update(&self, id: TodoId, patch: &TodoPatch) -> Result<Todo> {
        let mut state = self.state.lock().expect("fake state");
        let todo = state
            .todos
            .iter_mut()
            .find(|todo| todo.id == id)
            .ok_or_else(|| anyhow!("todo {id} not found"))?;
        if let Some(title) = &patch.title {
            todo.title = title.clone();
        }
        if let Some(completed) = patch.completed {
            todo.completed = completed;
        }
        Ok(todo.clone())
    }
}
