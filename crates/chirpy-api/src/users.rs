use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use chirpy_types::api::UserCredentials;

use crate::auth::{AppState, blocking};
use crate::error::ApiError;
use crate::middleware::{ApiJson, AuthUser};

fn check_credentials(req: &UserCredentials) -> Result<(), ApiError> {
    if req.email.trim().is_empty() {
        return Err(ApiError::BadRequest("Email is required"));
    }
    if req.password.is_empty() {
        return Err(ApiError::BadRequest("Password is required"));
    }
    Ok(())
}

pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UserCredentials>,
) -> Result<impl IntoResponse, ApiError> {
    check_credentials(&req)?;

    let user = blocking(&state, move |s| s.db.create_user(&req.email, &req.password)).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Change the caller's own email and password.
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(req): ApiJson<UserCredentials>,
) -> Result<impl IntoResponse, ApiError> {
    check_credentials(&req)?;

    let user = blocking(&state, move |s| {
        s.db.update_user(user_id, &req.email, &req.password)
    })
    .await?;
    Ok(Json(user))
}

pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let users = blocking(&state, |s| s.db.list_users()).await?;
    Ok(Json(users))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let user = blocking(&state, move |s| s.db.get_user(user_id)).await?;
    Ok(Json(user))
}
