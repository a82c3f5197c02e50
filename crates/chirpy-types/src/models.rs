use serde::{Deserialize, Serialize};

/// A short post. Bodies are cleaned and length-checked by the HTTP layer
/// before they reach the repository; the repository stores them verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chirp {
    pub body: String,
    pub id: i64,
    pub author_id: i64,
}

/// A user with the password hash stripped. This is the only user shape that
/// leaves the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeUser {
    pub email: String,
    pub id: i64,
    pub is_chirpy_red: bool,
}
