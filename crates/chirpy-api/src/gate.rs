//! Decides whether a presented token grants access, and handles the refresh
//! token lifecycle on top of the repository's revocation list.

use chirpy_db::{Database, DbError};
use chrono::DateTime;
use thiserror::Error;
use tracing::debug;

use crate::token::{self, TokenError, TokenRole};

#[derive(Debug, Error)]
pub enum GateError {
    /// Any token problem. Carries no detail on purpose.
    #[error("unauthenticated")]
    Unauthenticated,

    #[error(transparent)]
    Store(#[from] DbError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Validate an access token and return its subject as a user id.
pub fn authenticate(token: &str, key: &[u8]) -> Result<i64, GateError> {
    let claims = token::validate(token, TokenRole::Access, key)
        .map_err(|_| GateError::Unauthenticated)?;

    claims.sub.parse().map_err(|_| {
        debug!(sub = %claims.sub, "Access token subject is not a user id");
        GateError::Unauthenticated
    })
}

/// Mint a fresh access token from a refresh token. The refresh token is not
/// consumed and stays usable until it expires or is revoked.
pub fn refresh(db: &Database, token: &str, key: &[u8]) -> Result<String, GateError> {
    if db.is_token_revoked(token)? {
        debug!("Refresh rejected: token revoked");
        return Err(GateError::Unauthenticated);
    }

    let claims = token::validate(token, TokenRole::Refresh, key)
        .map_err(|_| GateError::Unauthenticated)?;

    Ok(token::issue(&claims.sub, TokenRole::Access, None, key)?)
}

/// Deny-list a refresh token. It must still be a correctly signed, unexpired
/// refresh token; revoking an already revoked one is harmless.
pub fn revoke(db: &Database, token: &str, key: &[u8]) -> Result<(), GateError> {
    let claims = token::validate(token, TokenRole::Refresh, key)
        .map_err(|_| GateError::Unauthenticated)?;

    let issued_at = DateTime::from_timestamp(claims.iat, 0).ok_or(GateError::Unauthenticated)?;
    db.revoke_token(token, issued_at)?;
    Ok(())
}
