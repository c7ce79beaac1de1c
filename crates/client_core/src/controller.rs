//! List controller: the in-memory todo list plus the transient flags a view
//! renders from.
//!
//! `ListState` is the single snapshot. Every user action is a `begin_*` call
//! made before the request goes out and a `finish_*` call applied once the
//! request has settled, so the state only ever changes in response to a user
//! action or a settled network result. `TodoController` drives those pairs
//! against a `TodoStore` for callers that can simply await each action.

use std::collections::HashSet;

use shared::{
    domain::{Filter, OwnerId, Todo, TodoId},
    error::TodoError,
    protocol::NewTodo,
};
use tracing::{debug, info, warn};

use crate::{
    bulk::{delete_all_settled, BulkDeleteOutcome},
    notification::ErrorBanner,
    store::TodoStore,
};

#[derive(Debug, Clone)]
pub struct ListState {
    owner: OwnerId,
    items: Vec<Todo>,
    filter: Filter,
    title_input: String,
    input_loading: bool,
    pending_deletes: HashSet<TodoId>,
    clearing_completed: bool,
    placeholder: Option<Todo>,
    banner: ErrorBanner,
    loading: bool,
    created_during_load: Vec<Todo>,
    deleted_during_load: HashSet<TodoId>,
}

impl ListState {
    pub fn new(owner: OwnerId) -> Self {
        Self {
            owner,
            items: Vec::new(),
            filter: Filter::default(),
            title_input: String::new(),
            input_loading: false,
            pending_deletes: HashSet::new(),
            clearing_completed: false,
            placeholder: None,
            banner: ErrorBanner::default(),
            loading: false,
            created_during_load: Vec::new(),
            deleted_during_load: HashSet::new(),
        }
    }

    /// Confirmed items in server order, regardless of filter.
    pub fn items(&self) -> &[Todo] {
        &self.items
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn visible(&self) -> impl Iterator<Item = &Todo> + '_ {
        let filter = self.filter;
        self.items.iter().filter(move |todo| filter.matches(todo))
    }

    pub fn placeholder(&self) -> Option<&Todo> {
        self.placeholder.as_ref()
    }

    pub fn title_input(&self) -> &str {
        &self.title_input
    }

    pub fn title_input_mut(&mut self) -> &mut String {
        &mut self.title_input
    }

    pub fn is_input_disabled(&self) -> bool {
        self.input_loading
    }

    pub fn is_delete_pending(&self, id: TodoId) -> bool {
        self.pending_deletes.contains(&id)
    }

    pub fn is_clearing_completed(&self) -> bool {
        self.clearing_completed
    }

    pub fn banner(&self) -> &ErrorBanner {
        &self.banner
    }

    pub fn banner_mut(&mut self) -> &mut ErrorBanner {
        &mut self.banner
    }

    pub fn active_count(&self) -> usize {
        self.items.iter().filter(|todo| !todo.completed).count()
    }

    pub fn has_completed(&self) -> bool {
        self.items.iter().any(|todo| todo.completed)
    }

    pub fn all_completed(&self) -> bool {
        self.items.iter().all(|todo| todo.completed)
    }

    /// Counter, filter links and clear-completed only make sense with items.
    pub fn shows_footer(&self) -> bool {
        !self.items.is_empty()
    }

    /// Whether the row for `todo` should render its loader.
    pub fn is_busy(&self, todo: &Todo) -> bool {
        todo.id.is_unsaved()
            || self.pending_deletes.contains(&todo.id)
            || (self.clearing_completed && todo.completed)
    }

    pub fn begin_load(&mut self) {
        self.banner.dismiss();
        self.loading = true;
        self.created_during_load.clear();
        self.deleted_during_load.clear();
    }

    /// Creates and deletes that settled while the load was in flight win over
    /// the loaded snapshot, which may predate them.
    pub fn finish_load<E>(&mut self, result: Result<Vec<Todo>, E>) -> Result<(), TodoError> {
        self.loading = false;
        let created = std::mem::take(&mut self.created_during_load);
        let deleted = std::mem::take(&mut self.deleted_during_load);

        match result {
            Ok(mut items) => {
                items.retain(|todo| !deleted.contains(&todo.id));
                for todo in created {
                    if !deleted.contains(&todo.id) && !items.iter().any(|t| t.id == todo.id) {
                        items.push(todo);
                    }
                }
                self.items = items;
                Ok(())
            }
            Err(_) => Err(self.fail(TodoError::Load)),
        }
    }

    /// Validates the typed title and installs the placeholder. On success the
    /// returned body is what should be sent to the store.
    pub fn begin_create(&mut self, raw_title: &str) -> Result<NewTodo, TodoError> {
        self.banner.dismiss();

        let title = raw_title.trim();
        if title.is_empty() {
            return Err(self.fail(TodoError::EmptyTitle));
        }

        self.input_loading = true;
        self.placeholder = Some(Todo::placeholder(self.owner, title));
        Ok(NewTodo::new(self.owner, title))
    }

    pub fn finish_create<E>(&mut self, result: Result<Todo, E>) -> Result<(), TodoError> {
        let typed = self
            .placeholder
            .take()
            .map(|placeholder| placeholder.title)
            .unwrap_or_default();
        self.input_loading = false;

        match result {
            Ok(todo) => {
                if self.loading {
                    self.created_during_load.push(todo.clone());
                }
                self.items.push(todo);
                self.title_input.clear();
                Ok(())
            }
            Err(_) => {
                self.title_input = typed;
                Err(self.fail(TodoError::Create))
            }
        }
    }

    pub fn begin_delete(&mut self, id: TodoId) {
        self.banner.dismiss();
        self.pending_deletes.insert(id);
    }

    pub fn finish_delete<E>(&mut self, id: TodoId, result: Result<(), E>) -> Result<(), TodoError> {
        self.pending_deletes.remove(&id);

        match result {
            Ok(()) => {
                if self.loading {
                    self.deleted_during_load.insert(id);
                }
                self.items.retain(|todo| todo.id != id);
                Ok(())
            }
            Err(_) => Err(self.fail(TodoError::Delete)),
        }
    }

    /// Returns the ids to delete. An empty list means there is nothing to
    /// clear and no request should be made.
    pub fn begin_clear_completed(&mut self) -> Vec<TodoId> {
        self.banner.dismiss();

        let ids: Vec<TodoId> = self
            .items
            .iter()
            .filter(|todo| todo.completed)
            .map(|todo| todo.id)
            .collect();
        self.clearing_completed = !ids.is_empty();
        ids
    }

    pub fn finish_clear_completed(&mut self, outcome: &BulkDeleteOutcome) -> Result<(), TodoError> {
        self.clearing_completed = false;

        let deleted: HashSet<TodoId> = outcome.deleted.iter().copied().collect();
        self.items.retain(|todo| !deleted.contains(&todo.id));
        if self.loading {
            self.deleted_during_load.extend(deleted);
        }

        if outcome.has_failures() {
            return Err(self.fail(TodoError::BulkDeletePartial));
        }
        Ok(())
    }

    fn fail(&mut self, error: TodoError) -> TodoError {
        self.banner.show(error);
        error
    }
}

pub struct TodoController<S> {
    store: S,
    state: ListState,
}

impl<S: TodoStore> TodoController<S> {
    pub fn new(store: S) -> Self {
        let state = ListState::new(store.owner());
        Self { store, state }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ListState {
        &mut self.state
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    pub async fn load(&mut self) -> Result<(), TodoError> {
        self.state.begin_load();
        let result = self.store.list().await;
        match &result {
            Ok(items) => info!(count = items.len(), "loaded todos"),
            Err(err) => warn!("load todos failed: {err:#}"),
        }
        self.state.finish_load(result)
    }

    pub async fn add(&mut self, raw_title: &str) -> Result<Todo, TodoError> {
        let body = self.state.begin_create(raw_title)?;
        let result = self.store.create(&body).await;
        let created = match &result {
            Ok(todo) => {
                info!(todo_id = todo.id.0, "created todo");
                Some(todo.clone())
            }
            Err(err) => {
                warn!("create todo failed: {err:#}");
                None
            }
        };
        self.state.finish_create(result)?;
        created.ok_or(TodoError::Create)
    }

    pub async fn delete(&mut self, id: TodoId) -> Result<(), TodoError> {
        self.state.begin_delete(id);
        let result = self.store.delete(id).await;
        match &result {
            Ok(()) => info!(todo_id = id.0, "deleted todo"),
            Err(err) => warn!(todo_id = id.0, "delete todo failed: {err:#}"),
        }
        self.state.finish_delete(id, result)
    }

    /// Deletes every completed item. Items whose request failed stay listed
    /// and the banner reports a generic delete failure.
    pub async fn clear_completed(&mut self) -> BulkDeleteOutcome {
        let ids = self.state.begin_clear_completed();
        if ids.is_empty() {
            return BulkDeleteOutcome::default();
        }

        let outcome = delete_all_settled(&self.store, &ids).await;
        if let Err(err) = self.state.finish_clear_completed(&outcome) {
            debug!(%err, failed = outcome.failed.len(), "clear completed settled with failures");
        }
        outcome
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
