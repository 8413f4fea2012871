//! Session store
//!
//! The logged-in user's token and profile, loaded from durable storage at
//! startup, replaced on login and removed on logout. Controllers receive the
//! store explicitly instead of reaching into storage themselves.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ClientError;
use crate::models::{LoginResponse, UserProfile};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

impl From<LoginResponse> for Session {
    fn from(response: LoginResponse) -> Self {
        Self {
            token: response.token,
            user: response.user,
        }
    }
}

/// Durable backing for the session store.
pub trait SessionStorage: Send + Sync {
    fn load(&self) -> Result<Option<Session>, ClientError>;
    fn save(&mut self, session: &Session) -> Result<(), ClientError>;
    fn clear(&mut self) -> Result<(), ClientError>;
}

/// Session persisted as a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Result<Option<Session>, ClientError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ClientError::Session(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };
        serde_json::from_str(&raw).map(Some).map_err(|e| {
            ClientError::Session(format!("Corrupt session file {}: {}", self.path.display(), e))
        })
    }

    fn save(&mut self, session: &Session) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                ClientError::Session(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        let json = serde_json::to_string_pretty(session)
            .map_err(|e| ClientError::Session(format!("Failed to serialize session: {}", e)))?;
        std::fs::write(&self.path, json).map_err(|e| {
            ClientError::Session(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }

    fn clear(&mut self) -> Result<(), ClientError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::Session(format!(
                "Failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

/// In-memory storage, for tests and one-shot runs.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStorage {
    session: Option<Session>,
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> Result<Option<Session>, ClientError> {
        Ok(self.session.clone())
    }

    fn save(&mut self, session: &Session) -> Result<(), ClientError> {
        self.session = Some(session.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ClientError> {
        self.session = None;
        Ok(())
    }
}

pub struct SessionStore {
    storage: Box<dyn SessionStorage>,
    current: Option<Session>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("logged_in", &self.current.is_some())
            .finish()
    }
}

impl SessionStore {
    /// Load whatever the storage holds. A corrupt session is discarded, not fatal.
    pub fn init(storage: Box<dyn SessionStorage>) -> Self {
        let current = match storage.load() {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable saved session");
                None
            }
        };
        Self { storage, current }
    }

    pub fn in_memory() -> Self {
        Self::init(Box::new(MemorySessionStorage::default()))
    }

    pub fn set(&mut self, session: Session) -> Result<(), ClientError> {
        self.storage.save(&session)?;
        self.current = Some(session);
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), ClientError> {
        self.storage.clear()?;
        self.current = None;
        Ok(())
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.token.as_str())
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }
}
