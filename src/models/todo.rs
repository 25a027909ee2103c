use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single task record. Serialized with camelCase keys both on the
/// wire and in the file store, timestamps as ISO-8601.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTodoPayload {
    pub title: String,
}

/// Partial update: omitted fields keep their stored value. At least one
/// field must be present, enforced by the API layer.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct UpdateTodoPayload {
    pub title: Option<String>,
    pub completed: Option<bool>,
}
