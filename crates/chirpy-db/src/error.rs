use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything the store and repository can fail with.
///
/// `NotFound`, `EmailExists` and `InvalidCredentials` are ordinary business
/// outcomes. The storage variants mean the request could not be served and
/// a mutation may not have been persisted.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("store unavailable at {}: {source}", .path.display())]
    StoreUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("corrupt document at {}: {source}", .path.display())]
    CorruptDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("not found")]
    NotFound,

    #[error("a user with this email already exists")]
    EmailExists,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

impl DbError {
    /// True for failures of the underlying file rather than of the request.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable { .. } | Self::CorruptDocument { .. } | Self::Serialize(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_variants_are_flagged() {
        let io = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        assert!(DbError::StoreUnavailable {
            path: "/srv/db.json".into(),
            source: io,
        }
        .is_storage());
        assert!(!DbError::NotFound.is_storage());
        assert!(!DbError::EmailExists.is_storage());
        assert!(!DbError::PasswordHash("bad salt".into()).is_storage());
    }
}
