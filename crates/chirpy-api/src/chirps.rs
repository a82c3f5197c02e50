use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::warn;

use chirpy_types::api::CreateChirpRequest;

use crate::auth::{AppState, blocking};
use crate::error::ApiError;
use crate::middleware::{ApiJson, AuthUser};
use crate::validation;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Deserialize)]
pub struct ChirpQuery {
    pub author_id: Option<i64>,
    #[serde(default)]
    pub sort: SortOrder,
}

pub async fn create_chirp(
    State(state): State<AppState>,
    AuthUser(author_id): AuthUser,
    ApiJson(req): ApiJson<CreateChirpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let body = validation::clean_chirp(&req.body)?;

    let chirp = blocking(&state, move |s| s.db.create_chirp(&body, author_id)).await?;
    Ok((StatusCode::CREATED, Json(chirp)))
}

pub async fn list_chirps(
    State(state): State<AppState>,
    Query(query): Query<ChirpQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let mut chirps = blocking(&state, move |s| s.db.list_chirps(query.author_id)).await?;
    if query.sort == SortOrder::Desc {
        chirps.reverse();
    }
    Ok(Json(chirps))
}

pub async fn get_chirp(
    State(state): State<AppState>,
    Path(chirp_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let chirp = blocking(&state, move |s| s.db.get_chirp(chirp_id)).await?;
    Ok(Json(chirp))
}

/// Only the author may delete a chirp.
pub async fn delete_chirp(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(chirp_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    blocking(&state, move |s| -> Result<(), ApiError> {
        let chirp = s.db.get_chirp(chirp_id)?;
        if chirp.author_id != user_id {
            warn!(chirp_id, user_id, "Refusing to delete another user's chirp");
            return Err(ApiError::Forbidden);
        }
        s.db.delete_chirp(chirp_id)?;
        Ok(())
    })
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
