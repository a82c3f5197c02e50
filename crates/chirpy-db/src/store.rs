//! Whole-document JSON persistence behind one reader/writer lock.
//!
//! Any number of `load` calls may run together; `write` and `update` exclude
//! everything else for their duration. `load` followed by a separate `write`
//! is not atomic as a pair. Read-modify-write callers that need isolation use
//! `update`, which holds the exclusive lock across all three steps.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use tracing::{debug, error, info, warn};

use crate::error::{DbError, Result};
use crate::models::Document;

pub struct Store {
    path: PathBuf,
    // Guards the file, not any in-memory state, so a poisoned lock is still
    // safe to take.
    lock: RwLock<()>,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write an empty document if nothing exists at the path yet.
    pub fn ensure(&self) -> Result<()> {
        let _guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);
        match fs::metadata(&self.path) {
            Ok(_) => {
                debug!("Database already present at {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("Creating empty database at {}", self.path.display());
                self.persist(&Document::default())
            }
            Err(e) => Err(self.unavailable(e)),
        }
    }

    /// Read and parse the whole document under the shared lock.
    pub fn load(&self) -> Result<Document> {
        let _guard = self.lock.read().unwrap_or_else(PoisonError::into_inner);
        self.read_document()
    }

    /// Replace the file with `doc` under the exclusive lock.
    pub fn write(&self, doc: &Document) -> Result<()> {
        let _guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);
        self.persist(doc)
    }

    /// Load, apply `f`, and write back as one exclusive critical section.
    ///
    /// If `f` returns an error nothing is written.
    pub fn update<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Document) -> Result<T>,
    {
        let _guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);
        let mut doc = self.read_document()?;
        let out = f(&mut doc)?;
        self.persist(&doc)?;
        Ok(out)
    }

    fn read_document(&self) -> Result<Document> {
        let data = fs::read(&self.path).map_err(|e| {
            warn!("Failed to read database {}: {}", self.path.display(), e);
            self.unavailable(e)
        })?;

        serde_json::from_slice(&data).map_err(|e| {
            error!("Database {} is not a valid document: {}", self.path.display(), e);
            DbError::CorruptDocument {
                path: self.path.clone(),
                source: e,
            }
        })
    }

    /// Serialize to a sibling temp file, then rename over the target so a
    /// reader never sees a half-written document. Caller holds the write lock.
    fn persist(&self, doc: &Document) -> Result<()> {
        let data = serde_json::to_vec(doc).map_err(DbError::Serialize)?;
        let tmp = tmp_path(&self.path);

        let res = write_file(&tmp, &data).and_then(|()| fs::rename(&tmp, &self.path));
        if let Err(e) = res {
            error!("Failed to write database {}: {}", self.path.display(), e);
            let _ = fs::remove_file(&tmp);
            return Err(self.unavailable(e));
        }

        debug!(
            bytes = data.len(),
            users = doc.users.len(),
            chirps = doc.chirps.len(),
            "Wrote database {}",
            self.path.display()
        );
        Ok(())
    }

    fn unavailable(&self, source: io::Error) -> DbError {
        DbError::StoreUnavailable {
            path: self.path.clone(),
            source,
        }
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_file(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut opts = fs::OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }
    let mut file = opts.open(path)?;
    file.write_all(data)?;
    file.sync_all()
}
