use chrono::{DateTime, Utc};
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{FromRow, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::core::{Todo, TodoError, TodoPage, UpdateTodo};
use crate::storage::{NewTodo, TodoStore, total_pages};

use async_trait::async_trait;

/// sqlx-backed store. Timestamps are persisted as microsecond unix integers
/// so ordering stays numeric; rowid breaks ties in favor of the most recent
/// insert.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

#[derive(FromRow)]
struct TodoRow {
    id: String,
    title: String,
    description: String,
    created_at: i64,
    updated_at: i64,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Todo {
            id: row.id,
            title: row.title,
            description: row.description,
            created_at: from_micros(row.created_at),
            updated_at: from_micros(row.updated_at),
        }
    }
}

fn from_micros(us: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_micros(us).unwrap_or_default()
}

impl SqliteStore {
    /// Opens `url` (e.g. `sqlite://todos.db`), creating the database file
    /// and schema if they do not exist yet.
    pub async fn new(url: &str) -> Result<Self, TodoError> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?;
        }
        let pool = SqlitePool::connect(url).await?;
        migrate(&pool).await?;
        Ok(Self { pool })
    }

    /// In-memory database for tests and demos. Capped at one connection:
    /// every sqlite `:memory:` connection is its own database.
    pub async fn new_memory() -> Result<Self, TodoError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        migrate(&pool).await?;
        Ok(Self { pool })
    }
}

async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS todos (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

#[async_trait]
impl TodoStore for SqliteStore {
    async fn list(&self, page: u32, limit: u32) -> Result<TodoPage, TodoError> {
        let page = page.max(1);
        let limit = limit.max(1);
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todos")
            .fetch_one(&self.pool)
            .await?;
        let offset = (page as i64 - 1) * limit as i64;
        let rows: Vec<TodoRow> = sqlx::query_as(
            "SELECT id, title, description, created_at, updated_at
             FROM todos
             ORDER BY created_at DESC, rowid DESC
             LIMIT ? OFFSET ?",
        )
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(TodoPage {
            items: rows.into_iter().map(Todo::from).collect(),
            total_pages: total_pages(total as u64, limit),
        })
    }

    async fn get(&self, id: &str) -> Result<Todo, TodoError> {
        let row: Option<TodoRow> = sqlx::query_as(
            "SELECT id, title, description, created_at, updated_at FROM todos WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Todo::from).ok_or(TodoError::NotFound)
    }

    async fn create(&self, input: NewTodo) -> Result<Todo, TodoError> {
        // Truncate to the stored precision so the returned record matches
        // a later Get exactly.
        let now = from_micros(Utc::now().timestamp_micros());
        let todo = Todo {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            description: input.description,
            created_at: now,
            updated_at: now,
        };
        sqlx::query(
            "INSERT INTO todos (id, title, description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&todo.id)
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(now.timestamp_micros())
        .bind(now.timestamp_micros())
        .execute(&self.pool)
        .await?;
        Ok(todo)
    }

    async fn update(&self, id: &str, fields: UpdateTodo) -> Result<Todo, TodoError> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE todos
             SET title = COALESCE(?, title),
                 description = COALESCE(?, description),
                 updated_at = ?
             WHERE id = ?",
        )
        .bind(fields.title)
        .bind(fields.description)
        .bind(now.timestamp_micros())
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(TodoError::NotFound);
        }
        self.get(id).await
    }

    async fn delete(&self, id: &str) -> Result<(), TodoError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(TodoError::NotFound);
        }
        Ok(())
    }
}
