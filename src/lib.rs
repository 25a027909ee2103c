pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use axum::http::{header, Method};
use axum::routing::{get, patch};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use store::DynTodoStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: DynTodoStore,
    pub config: Arc<Config>,
}

/// Build the full application router. `main` and the integration tests
/// go through the same construction so they exercise identical wiring.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/", get(routes::ui::index))
        .route("/health", get(routes::health::health_check))
        .route(
            "/todos",
            get(routes::todos::list_todos).post(routes::todos::create_todo),
        )
        .route(
            "/todos/{id}",
            patch(routes::todos::update_todo).delete(routes::todos::delete_todo),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
