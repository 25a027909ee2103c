use axum::response::Html;

/// The single-page client, compiled into the binary.
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}
