//! HTTP surface of chirpy plus the token and authentication core it sits on.

pub mod auth;
pub mod chirps;
pub mod error;
pub mod gate;
pub mod metrics;
pub mod middleware;
pub mod token;
pub mod users;
pub mod validation;
pub mod webhooks;

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info_span;

use crate::auth::AppState;
use crate::middleware::SequentialRequestId;

pub fn router(state: AppState) -> Router {
    let files = Router::new()
        .nest_service("/app", ServeDir::new(&state.file_root))
        .layer(from_fn_with_state(state.clone(), metrics::count_hit));

    let api = Router::new()
        .route("/api/healthz", get(metrics::healthz))
        .route("/admin/metrics", get(metrics::metrics))
        .route("/api/reset", get(metrics::reset))
        .route(
            "/api/users",
            post(users::create_user)
                .get(users::list_users)
                .put(users::update_user),
        )
        .route("/api/users/{id}", get(users::get_user))
        .route("/api/login", post(auth::login))
        .route("/api/refresh", post(auth::refresh))
        .route("/api/revoke", post(auth::revoke))
        .route(
            "/api/chirps",
            post(chirps::create_chirp).get(chirps::list_chirps),
        )
        .route(
            "/api/chirps/{id}",
            get(chirps::get_chirp).delete(chirps::delete_chirp),
        )
        .route("/api/polka/webhooks", post(webhooks::polka))
        .with_state(state);

    Router::new()
        .merge(files)
        .merge(api)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
            let request_id = req
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown");
            info_span!(
                "request",
                method = %req.method(),
                path = %req.uri().path(),
                request_id = %request_id,
            )
        }))
        .layer(CorsLayer::permissive())
        .layer(SetRequestIdLayer::x_request_id(SequentialRequestId::default()))
}
