use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::core::{Todo, TodoError, TodoPage, UpdateTodo};
use crate::storage::{NewTodo, TodoStore, total_pages};

use async_trait::async_trait;

/// Store backed by a plain in-process Vec. Used by tests and demos where a
/// database file is overkill; semantics match [`super::sqlite::SqliteStore`].
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<Vec<Todo>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn list(&self, page: u32, limit: u32) -> Result<TodoPage, TodoError> {
        let page = page.max(1);
        let limit = limit.max(1);
        let records = self.records.lock().await;
        // Newest-insert-first before the stable sort, so creation-time ties
        // resolve the same way the sqlite store's rowid tiebreak does.
        let mut items: Vec<Todo> = records.iter().rev().cloned().collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let skip = (page as usize - 1) * limit as usize;
        Ok(TodoPage {
            total_pages: total_pages(records.len() as u64, limit),
            items: items.into_iter().skip(skip).take(limit as usize).collect(),
        })
    }

    async fn get(&self, id: &str) -> Result<Todo, TodoError> {
        let records = self.records.lock().await;
        records
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(TodoError::NotFound)
    }

    async fn create(&self, input: NewTodo) -> Result<Todo, TodoError> {
        let now = Utc::now();
        let todo = Todo {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            description: input.description,
            created_at: now,
            updated_at: now,
        };
        self.records.lock().await.push(todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: &str, fields: UpdateTodo) -> Result<Todo, TodoError> {
        let mut records = self.records.lock().await;
        let todo = records
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TodoError::NotFound)?;
        if let Some(title) = fields.title {
            todo.title = title;
        }
        if let Some(description) = fields.description {
            todo.description = description;
        }
        todo.updated_at = Utc::now();
        Ok(todo.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), TodoError> {
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|t| t.id != id);
        if records.len() == before {
            return Err(TodoError::NotFound);
        }
        Ok(())
    }
}
