use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{Todo, UpdateTodoPayload};
use crate::store::TodoStore;

/// Store backed by a single pretty-printed JSON array on local disk.
///
/// Every mutation is a read-modify-write of the whole file, so all
/// mutations are serialized behind one process-wide lock (`tokio`'s
/// mutex is FIFO-fair, giving the first-in-first-out queue semantics).
/// Reads skip the lock and may observe a slightly stale snapshot; the
/// one exception is the one-time lazy file creation, which must queue
/// like any other write.
///
/// The queue is per-process only: running several server processes
/// against the same file can still lose updates.
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    /// Read the full list without touching the file. `None` means the
    /// file does not exist yet; creating it is left to code holding
    /// the write lock so a read can never clobber an in-flight write.
    async fn read_all(&self) -> Result<Option<Vec<Todo>>, StoreError> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_all(&self, todos: &[Todo]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let mut contents = serde_json::to_string_pretty(todos)?;
        contents.push('\n');
        fs::write(&self.path, contents).await?;
        Ok(())
    }
}

#[async_trait]
impl TodoStore for FileStore {
    async fn list_todos(&self) -> Result<Vec<Todo>, StoreError> {
        let mut todos = match self.read_all().await? {
            Some(todos) => todos,
            None => {
                // Lazy creation joins the write queue; re-check under
                // the lock in case a mutation created the file first.
                let _guard = self.write_lock.lock().await;
                match self.read_all().await? {
                    Some(todos) => todos,
                    None => {
                        self.write_all(&[]).await?;
                        Vec::new()
                    }
                }
            }
        };
        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(todos)
    }

    async fn create_todo(&self, title: &str) -> Result<Todo, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::TitleRequired);
        }

        let _guard = self.write_lock.lock().await;
        let mut todos = self.read_all().await?.unwrap_or_default();
        let now = Utc::now();
        let todo = Todo {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            completed: false,
            created_at: now,
            updated_at: now,
        };
        todos.insert(0, todo.clone());
        self.write_all(&todos).await?;
        Ok(todo)
    }

    async fn update_todo(
        &self,
        id: &str,
        updates: UpdateTodoPayload,
    ) -> Result<Option<Todo>, StoreError> {
        let new_title = match updates.title {
            Some(title) => {
                let title = title.trim().to_string();
                if title.is_empty() {
                    return Err(StoreError::TitleEmpty);
                }
                Some(title)
            }
            None => None,
        };

        let _guard = self.write_lock.lock().await;
        let mut todos = self.read_all().await?.unwrap_or_default();
        let Some(todo) = todos.iter_mut().find(|todo| todo.id == id) else {
            return Ok(None);
        };

        if let Some(title) = new_title {
            todo.title = title;
        }
        if let Some(completed) = updates.completed {
            todo.completed = completed;
        }
        todo.updated_at = Utc::now();

        let updated = todo.clone();
        self.write_all(&todos).await?;
        Ok(Some(updated))
    }

    async fn remove_todo(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut todos = self.read_all().await?.unwrap_or_default();
        let before = todos.len();
        todos.retain(|todo| todo.id != id);
        if todos.len() == before {
            return Ok(false);
        }
        self.write_all(&todos).await?;
        Ok(true)
    }
}
