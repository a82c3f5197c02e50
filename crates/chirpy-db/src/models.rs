//! The persisted document. One JSON file holds all of it and it is always
//! read and written as a unit.

use std::collections::HashMap;

use chirpy_types::models::{Chirp, SafeUser};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub chirps: HashMap<i64, Chirp>,
    pub users: HashMap<i64, UserRecord>,
    /// Raw refresh token -> its issued-at time. Entries are never removed.
    pub revoked_tokens: HashMap<String, DateTime<Utc>>,
    #[serde(rename = "nextChirpId")]
    pub next_chirp_id: i64,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            chirps: HashMap::new(),
            users: HashMap::new(),
            revoked_tokens: HashMap::new(),
            next_chirp_id: 1,
        }
    }
}

impl Document {
    pub fn user_by_email(&self, email: &str) -> Option<&UserRecord> {
        self.users.values().find(|u| u.email == email)
    }

    /// Take the next chirp id and advance the counter. Never hands out an id
    /// at or below one already present, even if the counter on disk lags.
    pub fn allocate_chirp_id(&mut self) -> i64 {
        let floor = self.chirps.keys().max().map_or(1, |max| max + 1);
        let id = self.next_chirp_id.max(floor);
        self.next_chirp_id = id + 1;
        id
    }

    /// Next user id: `count + 1`, moved past any id already taken so a gap
    /// in the numbering never overwrites a record.
    pub fn allocate_user_id(&self) -> i64 {
        let mut id = self.users.len() as i64 + 1;
        while self.users.contains_key(&id) {
            id += 1;
        }
        id
    }
}

/// Stored user row. `hash` is an Argon2 PHC string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: String,
    pub hash: String,
    pub id: i64,
    pub is_chirpy_red: bool,
}

impl UserRecord {
    pub fn to_safe(&self) -> SafeUser {
        SafeUser {
            email: self.email.clone(),
            id: self.id,
            is_chirpy_red: self.is_chirpy_red,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_persisted_field_names() {
        let mut doc = Document::default();
        doc.chirps.insert(
            4,
            Chirp {
                body: "hi".into(),
                id: 4,
                author_id: 1,
            },
        );
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["nextChirpId"], 1);
        assert_eq!(json["chirps"]["4"]["author_id"], 1);
        assert!(json["revoked_tokens"].as_object().unwrap().is_empty());
    }

    #[test]
    fn chirp_ids_skip_past_existing_entries() {
        let mut doc = Document::default();
        doc.chirps.insert(
            7,
            Chirp {
                body: "x".into(),
                id: 7,
                author_id: 1,
            },
        );
        assert_eq!(doc.allocate_chirp_id(), 8);
        assert_eq!(doc.allocate_chirp_id(), 9);
        assert_eq!(doc.next_chirp_id, 10);
    }

    #[test]
    fn user_ids_skip_taken_slots() {
        let mut doc = Document::default();
        for id in [1, 3] {
            doc.users.insert(
                id,
                UserRecord {
                    email: format!("{id}@x"),
                    hash: String::new(),
                    id,
                    is_chirpy_red: false,
                },
            );
        }
        // count + 1 = 3 is taken.
        assert_eq!(doc.allocate_user_id(), 4);

        doc.users.remove(&3);
        assert_eq!(doc.allocate_user_id(), 2);
    }

    #[test]
    fn safe_projection_drops_hash() {
        let user = UserRecord {
            email: "a@b.c".into(),
            hash: "$argon2id$secret".into(),
            id: 2,
            is_chirpy_red: true,
        };
        let json = serde_json::to_string(&user.to_safe()).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"is_chirpy_red\":true"));
    }
}
