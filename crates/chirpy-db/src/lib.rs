pub mod error;
pub mod models;
pub mod password;
pub mod queries;
pub mod store;

use std::path::Path;

use tracing::info;

pub use error::{DbError, Result};
pub use models::{Document, UserRecord};
pub use store::Store;

/// Typed access to users, chirps and revoked tokens. Every mutation is a
/// load -> change -> write of the whole document through the `Store`.
pub struct Database {
    store: Store,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let store = Store::new(path);
        store.ensure()?;

        info!("Database opened at {}", path.display());
        Ok(Self { store })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
}
