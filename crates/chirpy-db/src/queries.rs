use chirpy_types::models::{Chirp, SafeUser};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::{DbError, Result};
use crate::models::UserRecord;
use crate::password;
use crate::Database;

impl Database {
    // -- Users --

    /// Register a new user. Ids are `count(users) + 1`, skipping ahead if
    /// that id is already taken.
    pub fn create_user(&self, email: &str, password: &str) -> Result<SafeUser> {
        // Cheap early rejection before paying for the hash. The check inside
        // `update` is the one that counts.
        if self.store.load()?.user_by_email(email).is_some() {
            return Err(DbError::EmailExists);
        }

        let hash = password::hash_password(password)?;

        let user = self.store.update(|doc| {
            if doc.user_by_email(email).is_some() {
                return Err(DbError::EmailExists);
            }
            let id = doc.allocate_user_id();
            let record = UserRecord {
                email: email.to_string(),
                hash,
                id,
                is_chirpy_red: false,
            };
            let user = record.to_safe();
            doc.users.insert(id, record);
            Ok(user)
        })?;

        info!(user_id = user.id, "Created user");
        Ok(user)
    }

    /// Replace a user's email and password. The upgrade flag carries over.
    pub fn update_user(&self, id: i64, email: &str, password: &str) -> Result<SafeUser> {
        let hash = password::hash_password(password)?;

        let user = self.store.update(|doc| {
            if !doc.users.contains_key(&id) {
                return Err(DbError::NotFound);
            }
            if doc
                .user_by_email(email)
                .is_some_and(|other| other.id != id)
            {
                return Err(DbError::EmailExists);
            }
            let record = doc.users.get_mut(&id).ok_or(DbError::NotFound)?;
            record.email = email.to_string();
            record.hash = hash;
            Ok(record.to_safe())
        })?;

        info!(user_id = id, "Updated user");
        Ok(user)
    }

    /// Mark a user as upgraded. Upgrading twice is a no-op.
    pub fn upgrade_user(&self, id: i64) -> Result<()> {
        self.store.update(|doc| {
            let record = doc.users.get_mut(&id).ok_or(DbError::NotFound)?;
            record.is_chirpy_red = true;
            Ok(())
        })?;

        info!(user_id = id, "Upgraded user");
        Ok(())
    }

    pub fn get_user(&self, id: i64) -> Result<SafeUser> {
        self.store
            .load()?
            .users
            .get(&id)
            .map(UserRecord::to_safe)
            .ok_or(DbError::NotFound)
    }

    pub fn list_users(&self) -> Result<Vec<SafeUser>> {
        let doc = self.store.load()?;
        let mut users: Vec<SafeUser> = doc.users.values().map(UserRecord::to_safe).collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    /// Check an email/password pair. Unknown email and wrong password are
    /// indistinguishable to the caller.
    pub fn validate_login(&self, email: &str, password: &str) -> Result<SafeUser> {
        let doc = self.store.load()?;

        match doc.user_by_email(email) {
            Some(record) if password::verify_password(password, &record.hash) => {
                Ok(record.to_safe())
            }
            Some(record) => {
                debug!(user_id = record.id, "Login rejected: wrong password");
                Err(DbError::InvalidCredentials)
            }
            None => {
                password::verify_against_dummy(password);
                debug!("Login rejected: unknown email");
                Err(DbError::InvalidCredentials)
            }
        }
    }

    // -- Chirps --

    /// Store a chirp as given. Ids come from a counter that never goes
    /// backwards, so deleted ids are not reused.
    pub fn create_chirp(&self, body: &str, author_id: i64) -> Result<Chirp> {
        let chirp = self.store.update(|doc| {
            let id = doc.allocate_chirp_id();
            let chirp = Chirp {
                body: body.to_string(),
                id,
                author_id,
            };
            doc.chirps.insert(id, chirp.clone());
            Ok(chirp)
        })?;

        info!(chirp_id = chirp.id, author_id, "Created chirp");
        Ok(chirp)
    }

    pub fn get_chirp(&self, id: i64) -> Result<Chirp> {
        self.store
            .load()?
            .chirps
            .remove(&id)
            .ok_or(DbError::NotFound)
    }

    /// All chirps ascending by id, optionally only those by `author_id`.
    pub fn list_chirps(&self, author_id: Option<i64>) -> Result<Vec<Chirp>> {
        let doc = self.store.load()?;
        let mut chirps: Vec<Chirp> = doc
            .chirps
            .into_values()
            .filter(|c| author_id.is_none_or(|a| c.author_id == a))
            .collect();
        chirps.sort_by_key(|c| c.id);
        Ok(chirps)
    }

    /// Remove a chirp by id. Checking who may delete it is the caller's job.
    pub fn delete_chirp(&self, id: i64) -> Result<()> {
        self.store.update(|doc| {
            doc.chirps.remove(&id).map(|_| ()).ok_or(DbError::NotFound)
        })?;

        info!(chirp_id = id, "Deleted chirp");
        Ok(())
    }

    // -- Revoked tokens --

    pub fn is_token_revoked(&self, token: &str) -> Result<bool> {
        Ok(self.store.load()?.revoked_tokens.contains_key(token))
    }

    /// Deny-list a refresh token for good. Revoking again keeps the first
    /// recorded time.
    pub fn revoke_token(&self, token: &str, issued_at: DateTime<Utc>) -> Result<()> {
        self.store.update(|doc| {
            doc.revoked_tokens
                .entry(token.to_string())
                .or_insert(issued_at);
            Ok(())
        })?;

        debug!("Revoked refresh token");
        Ok(())
    }
}
