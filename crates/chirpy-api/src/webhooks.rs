use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use tracing::{debug, info};

use chirpy_types::api::PolkaWebhook;

use crate::auth::{AppState, blocking};
use crate::error::ApiError;
use crate::middleware::require_api_key;

const USER_UPGRADED: &str = "user.upgraded";

/// Payment provider callback. Every event must carry the shared API key,
/// checked before the body is read; only `user.upgraded` does anything.
pub async fn polka(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    require_api_key(&headers, &state.polka_key)?;

    let hook: PolkaWebhook = serde_json::from_slice(&body).map_err(|e| {
        debug!("Rejected webhook body: {}", e);
        ApiError::BadRequest("Invalid request body")
    })?;

    if hook.event != USER_UPGRADED {
        debug!(event = %hook.event, "Ignoring webhook event");
        return Ok(StatusCode::NO_CONTENT);
    }

    let user_id = hook
        .data
        .map(|d| d.user_id)
        .ok_or(ApiError::BadRequest("Missing user_id"))?;
    blocking(&state, move |s| s.db.upgrade_user(user_id)).await?;

    info!(user_id, "Upgrade webhook applied");
    Ok(StatusCode::NO_CONTENT)
}
