//! Signed token minting and verification.
//!
//! Access and refresh tokens share one secret and one encoding (HS256 JWT).
//! They are told apart by the `iss` claim, and validation demands an exact
//! issuer match so neither can stand in for the other.

use chirpy_types::api::Claims;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use tracing::debug;

pub const ACCESS_ISSUER: &str = "chirpy-access";
pub const REFRESH_ISSUER: &str = "chirpy-refresh";

/// One hour.
pub const ACCESS_TTL_SECONDS: i64 = 60 * 60;
/// Sixty days.
pub const REFRESH_TTL_SECONDS: i64 = 60 * 60 * 24 * 60;

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRole {
    Access,
    Refresh,
}

impl TokenRole {
    pub fn issuer(self) -> &'static str {
        match self {
            Self::Access => ACCESS_ISSUER,
            Self::Refresh => REFRESH_ISSUER,
        }
    }

    /// Lifetime in seconds for a token of this role. Access tokens may be
    /// shortened but never extended past the default; refresh tokens ignore
    /// the request.
    pub fn lifetime(self, requested: Option<i64>) -> i64 {
        match self {
            Self::Access => match requested {
                Some(secs) if secs > 0 && secs < ACCESS_TTL_SECONDS => secs,
                _ => ACCESS_TTL_SECONDS,
            },
            Self::Refresh => REFRESH_TTL_SECONDS,
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    /// Bad signature, wrong algorithm, wrong role, expired or malformed.
    /// Deliberately one variant.
    #[error("invalid token")]
    InvalidToken,

    #[error("failed to sign token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),
}

pub fn issue(
    subject: &str,
    role: TokenRole,
    ttl_seconds: Option<i64>,
    key: &[u8],
) -> Result<String, TokenError> {
    issue_at(subject, role, ttl_seconds, key, Utc::now())
}

pub(crate) fn issue_at(
    subject: &str,
    role: TokenRole,
    ttl_seconds: Option<i64>,
    key: &[u8],
    now: DateTime<Utc>,
) -> Result<String, TokenError> {
    let iat = now.timestamp();
    let claims = Claims {
        iss: role.issuer().to_string(),
        sub: subject.to_string(),
        iat,
        exp: iat + role.lifetime(ttl_seconds),
    };

    encode(
        &Header::new(ALGORITHM),
        &claims,
        &EncodingKey::from_secret(key),
    )
    .map_err(TokenError::Encode)
}

/// Verify signature, algorithm, expiry and that the issuer is `role`.
pub fn validate(token: &str, role: TokenRole, key: &[u8]) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(ALGORITHM);
    validation.leeway = 0;
    validation.set_issuer(&[role.issuer()]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    decode::<Claims>(token, &DecodingKey::from_secret(key), &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            debug!(?role, "Token rejected: {}", e);
            TokenError::InvalidToken
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const KEY: &[u8] = b"test-secret";

    #[test]
    fn access_token_roundtrip() {
        let token = issue("1", TokenRole::Access, None, KEY).unwrap();
        let claims = validate(&token, TokenRole::Access, KEY).unwrap();
        assert_eq!(claims.sub, "1");
        assert_eq!(claims.iss, ACCESS_ISSUER);
        assert_eq!(claims.exp - claims.iat, ACCESS_TTL_SECONDS);
    }

    #[test]
    fn roles_are_not_interchangeable() {
        for subject in ["1", "42", "not-a-number"] {
            let access = issue(subject, TokenRole::Access, None, KEY).unwrap();
            let refresh = issue(subject, TokenRole::Refresh, None, KEY).unwrap();

            assert!(validate(&access, TokenRole::Refresh, KEY).is_err());
            assert!(validate(&refresh, TokenRole::Access, KEY).is_err());
            assert!(validate(&access, TokenRole::Access, KEY).is_ok());
            assert!(validate(&refresh, TokenRole::Refresh, KEY).is_ok());
        }
    }

    #[test]
    fn access_lifetime_only_shrinks() {
        assert_eq!(TokenRole::Access.lifetime(Some(60)), 60);
        assert_eq!(TokenRole::Access.lifetime(Some(0)), ACCESS_TTL_SECONDS);
        assert_eq!(TokenRole::Access.lifetime(Some(-5)), ACCESS_TTL_SECONDS);
        assert_eq!(
            TokenRole::Access.lifetime(Some(ACCESS_TTL_SECONDS * 10)),
            ACCESS_TTL_SECONDS
        );
        assert_eq!(TokenRole::Access.lifetime(None), ACCESS_TTL_SECONDS);
    }

    #[test]
    fn refresh_lifetime_is_fixed() {
        assert_eq!(TokenRole::Refresh.lifetime(Some(10)), REFRESH_TTL_SECONDS);
        let token = issue("7", TokenRole::Refresh, Some(10), KEY).unwrap();
        let claims = validate(&token, TokenRole::Refresh, KEY).unwrap();
        assert_eq!(claims.exp - claims.iat, REFRESH_TTL_SECONDS);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue("1", TokenRole::Access, None, KEY).unwrap();
        assert!(matches!(
            validate(&token, TokenRole::Access, b"other-secret"),
            Err(TokenError::InvalidToken)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let issued = Utc::now() - Duration::hours(2);
        let token = issue_at("1", TokenRole::Access, None, KEY, issued).unwrap();
        assert!(validate(&token, TokenRole::Access, KEY).is_err());

        let earlier = Utc::now() - Duration::seconds(5);
        let short = issue_at("1", TokenRole::Access, Some(1), KEY, earlier).unwrap();
        assert!(validate(&short, TokenRole::Access, KEY).is_err());
    }

    #[test]
    fn other_algorithms_are_rejected() {
        let claims = Claims {
            iss: ACCESS_ISSUER.into(),
            sub: "1".into(),
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 600,
        };
        let hs384 = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(KEY),
        )
        .unwrap();
        assert!(validate(&hs384, TokenRole::Access, KEY).is_err());

        // Same payload re-headed as an unsigned token.
        let real = issue("1", TokenRole::Access, None, KEY).unwrap();
        let payload = real.split('.').nth(1).unwrap();
        let unsigned = format!("eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.{payload}.");
        assert!(validate(&unsigned, TokenRole::Access, KEY).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        for token in ["", "abc", "a.b.c", "Bearer x.y.z"] {
            assert!(validate(token, TokenRole::Access, KEY).is_err());
        }
    }
}
