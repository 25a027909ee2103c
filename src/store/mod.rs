pub mod file;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Config, StorageBackend};
use crate::error::StoreError;
use crate::models::{Todo, UpdateTodoPayload};

pub use file::FileStore;
pub use postgres::PostgresStore;

/// The four-operation persistence contract. Both backends satisfy it;
/// the rest of the system only ever sees this trait.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// All records, newest first (`created_at` descending). An empty
    /// store yields an empty list, never an error.
    async fn list_todos(&self) -> Result<Vec<Todo>, StoreError>;

    /// Trims `title` and persists a new record with a fresh id,
    /// `completed = false` and `created_at = updated_at = now`.
    /// Fails with a validation error when the trimmed title is empty.
    async fn create_todo(&self, title: &str) -> Result<Todo, StoreError>;

    /// Partial update by id. `Ok(None)` when no record matches.
    /// A provided title is trimmed and must be non-empty; `updated_at`
    /// is refreshed on every successful update.
    async fn update_todo(
        &self,
        id: &str,
        updates: UpdateTodoPayload,
    ) -> Result<Option<Todo>, StoreError>;

    /// Deletes by id, reporting whether a record was actually removed.
    async fn remove_todo(&self, id: &str) -> Result<bool, StoreError>;
}

pub type DynTodoStore = Arc<dyn TodoStore>;

/// Instantiate the backend the configuration selects.
pub fn from_config(config: &Config) -> DynTodoStore {
    match config.storage_backend {
        StorageBackend::Postgres => Arc::new(PostgresStore::new(config.database_urls.clone())),
        StorageBackend::File => Arc::new(FileStore::new(config.todo_file_path())),
    }
}
