use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use axum::{Json, extract::State, http::HeaderMap, http::StatusCode, response::IntoResponse};
use tracing::{error, info};

use chirpy_db::Database;
use chirpy_types::api::{LoginRequest, LoginResponse, RefreshResponse};

use crate::error::ApiError;
use crate::gate;
use crate::middleware::{ApiJson, bearer_token};
use crate::token::{self, TokenRole};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    pub polka_key: String,
    /// Directory served under `/app/`.
    pub file_root: PathBuf,
    /// Requests served under `/app/` since start or the last reset.
    pub file_hits: AtomicU64,
}

impl AppStateInner {
    pub fn new(
        db: Database,
        jwt_secret: String,
        polka_key: String,
        file_root: PathBuf,
    ) -> AppState {
        Arc::new(Self {
            db,
            jwt_secret,
            polka_key,
            file_root,
            file_hits: AtomicU64::new(0),
        })
    }

    pub fn key(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }
}

/// Run blocking repository work off the async runtime.
pub(crate) async fn blocking<F, T, E>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&AppStateInner) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<ApiError> + Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal
        })?
        .map_err(Into::into)
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let LoginRequest {
        email,
        password,
        expires_in_seconds,
    } = req;

    let user = blocking(&state, move |s| s.db.validate_login(&email, &password)).await?;

    let subject = user.id.to_string();
    let token = token::issue(&subject, TokenRole::Access, expires_in_seconds, state.key())?;
    let refresh_token = token::issue(&subject, TokenRole::Refresh, None, state.key())?;

    info!(user_id = user.id, "User logged in");
    Ok(Json(LoginResponse {
        id: user.id,
        email: user.email,
        is_chirpy_red: user.is_chirpy_red,
        token,
        refresh_token,
    }))
}

pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let presented = bearer_token(&headers)?.to_string();
    let token = blocking(&state, move |s| gate::refresh(&s.db, &presented, s.key())).await?;
    Ok(Json(RefreshResponse { token }))
}

pub async fn revoke(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let presented = bearer_token(&headers)?.to_string();
    blocking(&state, move |s| gate::revoke(&s.db, &presented, s.key())).await?;
    info!("Refresh token revoked");
    Ok(StatusCode::OK)
}
