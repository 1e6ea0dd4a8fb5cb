//! services/planner/src/adapters/session_file.rs
//!
//! Persists the logged-in user as a JSON file so a session survives restarts.
//! Implements the `SessionStore` port from the `core` crate.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use studytime_core::domain::User;
use studytime_core::ports::{PortError, PortResult, SessionStore};

/// A `SessionStore` backed by a single file.
#[derive(Clone, Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> PortResult<Option<User>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PortError::Storage(e.to_string())),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| PortError::Decode(format!("{}: {}", self.path.display(), e)))
    }

    fn save(&self, user: &User) -> PortResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PortError::Storage(e.to_string()))?;
        }
        let json =
            serde_json::to_string_pretty(user).map_err(|e| PortError::Unexpected(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| PortError::Storage(e.to_string()))
    }

    fn clear(&self) -> PortResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PortError::Storage(e.to_string())),
        }
    }
}
