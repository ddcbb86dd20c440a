pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::core::{Todo, TodoError, TodoPage, UpdateTodo};

/// A freshly validated record, ready for the store to assign an id and
/// timestamps to.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
}

/// CRUD with sort-skip-limit semantics over a collection keyed by a unique
/// identifier. Each call is independently atomic; there is no cross-call
/// consistency guarantee.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Records sorted by creation time descending, skipping `(page-1)*limit`
    /// and taking `limit`. An out-of-range page yields an empty list.
    async fn list(&self, page: u32, limit: u32) -> Result<TodoPage, TodoError>;
    async fn get(&self, id: &str) -> Result<Todo, TodoError>;
    async fn create(&self, input: NewTodo) -> Result<Todo, TodoError>;
    async fn update(&self, id: &str, fields: UpdateTodo) -> Result<Todo, TodoError>;
    async fn delete(&self, id: &str) -> Result<(), TodoError>;
}

pub(crate) fn total_pages(total: u64, limit: u32) -> u32 {
    (total as u32).div_ceil(limit.max(1))
}
