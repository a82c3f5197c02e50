use std::sync::atomic::Ordering;

use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::info;

use crate::auth::AppState;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, [(header::CONTENT_TYPE, TEXT_PLAIN)], "OK")
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let hits = state.file_hits.load(Ordering::Relaxed);
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, TEXT_PLAIN)],
        format!("Hits: {hits}"),
    )
}

pub async fn reset(State(state): State<AppState>) -> impl IntoResponse {
    state.file_hits.store(0, Ordering::Relaxed);
    info!("File server hit counter reset");
    StatusCode::OK
}

/// Count every request that reaches the static file server.
pub async fn count_hit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    state.file_hits.fetch_add(1, Ordering::Relaxed);
    next.run(req).await
}
