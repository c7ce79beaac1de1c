use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{OwnerId, Todo, TodoId},
    protocol::{ListTodosQuery, NewTodo, TodoPatch},
};
use tracing::debug;

use crate::config::Settings;

/// The remote todo collection, scoped to a single owner.
#[async_trait]
pub trait TodoStore: Send + Sync {
    fn owner(&self) -> OwnerId;
    async fn list(&self) -> Result<Vec<Todo>>;
    async fn create(&self, todo: &NewTodo) -> Result<Todo>;
    async fn delete(&self, id: TodoId) -> Result<()>;
    async fn update(&self, id: TodoId, patch: &TodoPatch) -> Result<Todo>;
}

#[async_trait]
impl<T> TodoStore for Arc<T>
where
    T: TodoStore + ?Sized,
{
    fn owner(&self) -> OwnerId {
        (**self).owner()
    }

    async fn list(&self) -> Result<Vec<Todo>> {
        (**self).list().await
    }

    async fn create(&self, todo: &NewTodo) -> Result<Todo> {
        (**self).create(todo).await
    }

    async fn delete(&self, id: TodoId) -> Result<()> {
        (**self).delete(id).await
    }

    async fn update(&self, id: TodoId, patch: &TodoPatch) -> Result<Todo> {
        (**self).update(id, patch).await
    }
}

pub struct HttpTodoStore {
    http: Client,
    api_url: String,
    owner: OwnerId,
}

impl HttpTodoStore {
    pub fn new(api_url: impl Into<String>, owner: OwnerId) -> Self {
        Self::with_client(Client::new(), api_url, owner)
    }

    pub fn with_client(http: Client, api_url: impl Into<String>, owner: OwnerId) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            api_url,
            owner,
        }
    }

    /// Builds a store from validated settings. Fails when the owner id is missing.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let owner = settings.require_owner()?;
        let api_url = settings.api_url()?;
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .context("failed to build http client")?;
        Ok(Self::with_client(http, api_url.as_str(), owner))
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn collection_url(&self) -> String {
        format!("{}/todos", self.api_url)
    }

    fn item_url(&self, id: TodoId) -> String {
        format!("{}/todos/{}", self.api_url, id.0)
    }
}

#[async_trait]
impl TodoStore for HttpTodoStore {
    fn owner(&self) -> OwnerId {
        self.owner
    }

    async fn list(&self) -> Result<Vec<Todo>> {
        let todos: Vec<Todo> = self
            .http
            .get(self.collection_url())
            .query(&ListTodosQuery {
                user_id: self.owner,
            })
            .send()
            .await
            .context("failed to request todos")?
            .error_for_status()?
            .json()
            .await
            .context("failed to decode todo list")?;
        debug!(count = todos.len(), owner = self.owner.0, "fetched todos");
        Ok(todos)
    }

    async fn create(&self, todo: &NewTodo) -> Result<Todo> {
        let created: Todo = self
            .http
            .post(self.collection_url())
            .json(todo)
            .send()
            .await
            .context("failed to create todo")?
            .error_for_status()?
            .json()
            .await
            .context("failed to decode created todo")?;
        Ok(created)
    }

    async fn delete(&self, id: TodoId) -> Result<()> {
        self.http
            .delete(self.item_url(id))
            .send()
            .await
            .with_context(|| format!("failed to delete todo {id}"))?
            .error_for_status()?;
        Ok(())
    }

    async fn update(&self, id: TodoId, patch: &TodoPatch) -> Result<Todo> {
        let updated: Todo = self
            .http
            .patch(self.item_url(id))
            .json(patch)
            .send()
            .await
            .with_context(|| format!("failed to update todo {id}"))?
            .error_for_status()?
            .json()
            .await
            .with_context(|| format!("failed to decode updated todo {id}"))?;
        Ok(updated)
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
