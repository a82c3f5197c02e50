use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts},
    http::{HeaderMap, HeaderValue, Request, header, request::Parts},
};
use serde::de::DeserializeOwned;
use subtle::ConstantTimeEq;
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::debug;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::gate;

/// The user id behind a valid access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub i64);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let user_id = gate::authenticate(token, state.key())?;
        Ok(Self(user_id))
    }
}

/// `Json` whose rejections come back as an `ApiError` body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(
        req: axum::extract::Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    authorization(headers, "Bearer ")
}

/// Check `Authorization: ApiKey <key>` against the expected key.
pub fn require_api_key(headers: &HeaderMap, expected: &str) -> Result<(), ApiError> {
    let presented = authorization(headers, "ApiKey ")?;
    if presented.as_bytes().ct_eq(expected.as_bytes()).into() {
        Ok(())
    } else {
        debug!("API key mismatch");
        Err(ApiError::Unauthorized)
    }
}

fn authorization<'a>(headers: &'a HeaderMap, scheme: &str) -> Result<&'a str, ApiError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix(scheme))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ApiError::Unauthorized)
}

/// Sequential request ids for `x-request-id`. A client-supplied id wins.
#[derive(Debug, Clone, Default)]
pub struct SequentialRequestId {
    next: Arc<AtomicU64>,
}

impl MakeRequestId for SequentialRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = self.next.fetch_add(1, Ordering::Relaxed);
        Some(RequestId::new(HeaderValue::from(id)))
    }
}
