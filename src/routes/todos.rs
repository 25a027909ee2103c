use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::error::api_error;
use crate::models::{CreateTodoPayload, UpdateTodoPayload};
use crate::AppState;

type ApiError = (StatusCode, Json<Value>);

fn bad_request(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn not_found() -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Todo not found." })),
    )
}

pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    match state.store.list_todos().await {
        Ok(todos) => Ok(Json(json!({ "todos": todos }))),
        Err(e) => {
            tracing::error!("listing todos failed: {e}");
            Err(api_error(&e, "Failed to load todos."))
        }
    }
}

pub async fn create_todo(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(body) = body.map_err(|_| bad_request("Invalid JSON body."))?;

    // Missing, null, or non-string titles all fail the payload shape;
    // whitespace-only titles are left to the store's own validation.
    let payload: CreateTodoPayload = match serde_json::from_value(body) {
        Ok(payload) => payload,
        Err(_) => return Err(bad_request("Title is required.")),
    };
    if payload.title.is_empty() {
        return Err(bad_request("Title is required."));
    }

    match state.store.create_todo(&payload.title).await {
        Ok(todo) => Ok((StatusCode::CREATED, Json(json!({ "todo": todo })))),
        Err(e) => {
            tracing::error!("creating todo failed: {e}");
            Err(api_error(&e, "Failed to create todo."))
        }
    }
}

pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = body.map_err(|_| bad_request("Invalid JSON body."))?;

    let title_field = body.get("title");
    let completed_field = body.get("completed");
    if title_field.is_none() && completed_field.is_none() {
        return Err(bad_request("At least one field is required."));
    }

    let title = match title_field {
        None => None,
        Some(value) => match value.as_str() {
            Some(title) => Some(title.to_string()),
            None => return Err(bad_request("Title must be a string.")),
        },
    };
    let completed = match completed_field {
        None => None,
        Some(value) => match value.as_bool() {
            Some(completed) => Some(completed),
            None => return Err(bad_request("Completed must be a boolean.")),
        },
    };

    match state
        .store
        .update_todo(&id, UpdateTodoPayload { title, completed })
        .await
    {
        Ok(Some(todo)) => Ok(Json(json!({ "todo": todo }))),
        Ok(None) => Err(not_found()),
        Err(e) => {
            tracing::error!("updating todo {id} failed: {e}");
            Err(api_error(&e, "Failed to update todo."))
        }
    }
}

pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    match state.store.remove_todo(&id).await {
        Ok(true) => Ok(Json(json!({ "success": true }))),
        Ok(false) => Err(not_found()),
        Err(e) => {
            tracing::error!("deleting todo {id} failed: {e}");
            Err(api_error(&e, "Failed to delete todo."))
        }
    }
}
