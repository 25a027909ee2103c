use async_trait::async_trait;
use futures_util::future::BoxFuture;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, PgConnection};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{Todo, UpdateTodoPayload};
use crate::store::TodoStore;

/// Substring identifying a connection-pooling endpoint. Those go
/// through a short-lived `PgPool`; everything else gets a direct
/// connection.
const POOLER_MARKER: &str = "-pooler.";

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS todos (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    completed BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

const LIST_SQL: &str = "SELECT id, title, completed, created_at, updated_at
    FROM todos
    ORDER BY created_at DESC";

const INSERT_SQL: &str = "INSERT INTO todos (id, title)
    VALUES ($1, $2)
    RETURNING id, title, completed, created_at, updated_at";

// Each field is applied only when its "was provided" flag is set, so a
// partial payload leaves the other column untouched in one statement.
const UPDATE_SQL: &str = "UPDATE todos
    SET title = CASE WHEN $2::BOOLEAN THEN $3 ELSE title END,
        completed = CASE WHEN $4::BOOLEAN THEN $5 ELSE completed END,
        updated_at = NOW()
    WHERE id = $1
    RETURNING id, title, completed, created_at, updated_at";

const DELETE_SQL: &str = "DELETE FROM todos WHERE id = $1";

/// Store backed by a Postgres `todos` table.
///
/// Holds no long-lived connection: every logical query walks the
/// configured candidate connection strings in priority order and runs
/// against the first one that works, acquiring and releasing the
/// connection within the call.
pub struct PostgresStore {
    candidates: Vec<String>,
    schema_ready: Mutex<bool>,
}

fn is_pooled(url: &str) -> bool {
    url.contains(POOLER_MARKER)
}

async fn query_direct<T, F>(url: &str, run: &F) -> sqlx::Result<T>
where
    F: for<'c> Fn(&'c mut PgConnection) -> BoxFuture<'c, sqlx::Result<T>>,
{
    let mut conn = PgConnection::connect(url).await?;
    let result = run(&mut conn).await;
    let _ = conn.close().await;
    result
}

async fn query_pooled<T, F>(url: &str, run: &F) -> sqlx::Result<T>
where
    F: for<'c> Fn(&'c mut PgConnection) -> BoxFuture<'c, sqlx::Result<T>>,
{
    let pool = PgPoolOptions::new().max_connections(1).connect(url).await?;
    let result = match pool.acquire().await {
        Ok(mut conn) => {
            let result = run(&mut conn).await;
            drop(conn);
            result
        }
        Err(e) => Err(e),
    };
    pool.close().await;
    result
}

impl PostgresStore {
    /// `candidates` must already be deduplicated in priority order
    /// (see `config::connection_candidates`). An empty list is legal:
    /// every call then fails fast without dialing anything.
    pub fn new(candidates: Vec<String>) -> Self {
        Self {
            candidates,
            schema_ready: Mutex::new(false),
        }
    }

    /// Run one logical query, trying each candidate in order and
    /// surfacing the last failure when none succeeds.
    async fn run_query<T, F>(&self, run: F) -> Result<T, StoreError>
    where
        F: for<'c> Fn(&'c mut PgConnection) -> BoxFuture<'c, sqlx::Result<T>>,
    {
        if self.candidates.is_empty() {
            return Err(StoreError::MissingConnectionString);
        }

        let mut last_error: Option<sqlx::Error> = None;
        for url in &self.candidates {
            let attempt = if is_pooled(url) {
                query_pooled(url, &run).await
            } else {
                query_direct(url, &run).await
            };
            match attempt {
                Ok(value) => return Ok(value),
                Err(error) => {
                    tracing::warn!("database candidate failed: {error}");
                    last_error = Some(error);
                }
            }
        }

        Err(match last_error {
            Some(error) => {
                let code = match &error {
                    sqlx::Error::Database(db) => db
                        .code()
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| "UNKNOWN".into()),
                    _ => "UNKNOWN".into(),
                };
                StoreError::Connection {
                    message: error.to_string(),
                    code,
                }
            }
            // Candidates were non-empty, so at least one attempt ran.
            None => StoreError::MissingConnectionString,
        })
    }

    /// Idempotent table creation, memoized per process. A failed
    /// attempt leaves the flag unset so the next call retries.
    async fn ensure_table(&self) -> Result<(), StoreError> {
        if self.candidates.is_empty() {
            return Err(StoreError::MissingConnectionString);
        }

        let mut ready = self.schema_ready.lock().await;
        if *ready {
            return Ok(());
        }
        self.run_query(
            |conn: &mut PgConnection| {
                Box::pin(async move {
                    sqlx::query(CREATE_TABLE_SQL).execute(conn).await.map(|_| ())
                })
            },
        )
        .await?;
        *ready = true;
        Ok(())
    }
}

#[async_trait]
impl TodoStore for PostgresStore {
    async fn list_todos(&self) -> Result<Vec<Todo>, StoreError> {
        self.ensure_table().await?;
        self.run_query(
            |conn: &mut PgConnection| {
                Box::pin(async move { sqlx::query_as::<_, Todo>(LIST_SQL).fetch_all(conn).await })
            },
        )
        .await
    }

    async fn create_todo(&self, title: &str) -> Result<Todo, StoreError> {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(StoreError::TitleRequired);
        }

        self.ensure_table().await?;
        let id = Uuid::new_v4().to_string();
        self.run_query(
            |conn: &mut PgConnection| {
                let id = id.clone();
                let title = title.clone();
                Box::pin(async move {
                    sqlx::query_as::<_, Todo>(INSERT_SQL)
                        .bind(id)
                        .bind(title)
                        .fetch_one(conn)
                        .await
                })
            },
        )
        .await
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

        self.ensure_table().await?;
        self.run_query(
            |conn: &mut PgConnection| {
                let id = id.to_string();
                let new_title = new_title.clone();
                let completed = updates.completed;
                Box::pin(async move {
                    sqlx::query_as::<_, Todo>(UPDATE_SQL)
                        .bind(id)
                        .bind(new_title.is_some())
                        .bind(new_title)
                        .bind(completed.is_some())
                        .bind(completed)
                        .fetch_optional(conn)
                        .await
                })
            },
        )
        .await
    }

    async fn remove_todo(&self, id: &str) -> Result<bool, StoreError> {
        self.ensure_table().await?;
        let result = self
            .run_query(
                |conn: &mut PgConnection| {
                    let id = id.to_string();
                    Box::pin(async move {
                        sqlx::query(DELETE_SQL)
                            .bind(id)
                            .execute(conn)
                            .await
                            .map(|done| done.rows_affected())
                    })
                },
            )
            .await?;
        Ok(result > 0)
    }
}
