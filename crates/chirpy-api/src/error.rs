use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use chirpy_db::DbError;

use crate::gate::GateError;
use crate::token::TokenError;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// What a handler can fail with. Messages are safe to show clients;
/// underlying causes are logged where they are converted.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(&'static str),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Not found")]
    NotFound,

    #[error("A user with that email already exists")]
    EmailExists,

    #[error("Something went wrong")]
    Internal,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::EmailExists => StatusCode::CONFLICT,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound => Self::NotFound,
            DbError::EmailExists => Self::EmailExists,
            DbError::InvalidCredentials => Self::Unauthorized,
            e if e.is_storage() => {
                error!("Storage failure: {}", e);
                Self::Internal
            }
            e => {
                error!("Database error: {}", e);
                Self::Internal
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        debug!("Rejected request body: {}", e.body_text());
        Self::BadRequest("Invalid request body")
    }
}

impl From<TokenError> for ApiError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::InvalidToken => Self::Unauthorized,
            TokenError::Encode(e) => {
                error!("Failed to sign token: {}", e);
                Self::Internal
            }
        }
    }
}

impl From<GateError> for ApiError {
    fn from(e: GateError) -> Self {
        match e {
            GateError::Unauthenticated => Self::Unauthorized,
            GateError::Store(e) => e.into(),
            GateError::Token(e) => e.into(),
        }
    }
}
