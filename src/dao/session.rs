//! Persistence for the session token pair on local disk.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::warn;

use crate::dao::models::SessionEntity;

/// Failures raised while writing the session file.
///
/// Reads never fail: a missing file means "logged out" and a corrupt file is
/// deleted, forcing re-authentication.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    /// Writing or renaming the session file failed.
    #[error("failed to persist session file at `{path}`")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// Serializing the session to JSON failed.
    #[error("failed to serialize session")]
    Serialize(#[source] serde_json::Error),
}

/// File-backed store for the current session token pair.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Create a store persisting to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the persisted session file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted session, if any.
    ///
    /// An unreadable or unparseable file is treated as corrupt state: it is
    /// deleted and `None` is returned.
    pub fn load(&self) -> Option<SessionEntity> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to read session file; discarding it");
                self.clear();
                return None;
            }
        };

        match serde_json::from_str::<SessionEntity>(&contents) {
            Ok(session) => Some(session),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "session file is corrupt; discarding it");
                self.clear();
                None
            }
        }
    }

    /// Overwrite the persisted session.
    ///
    /// Writes to a sibling temp file and renames it into place so a crash
    /// cannot leave a truncated session behind.
    pub fn save(&self, session: &SessionEntity) -> Result<(), SessionStoreError> {
        let payload = serde_json::to_string(session).map_err(SessionStoreError::Serialize)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, payload).map_err(|source| SessionStoreError::Write {
            path: tmp.display().to_string(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| SessionStoreError::Write {
            path: self.path.display().to_string(),
            source,
        })
    }

    /// Remove the persisted session. A missing file is not an error.
    pub fn clear(&self) {
        if let Err(err) = fs::remove_file(&self.path)
            && err.kind() != ErrorKind::NotFound
        {
            warn!(path = %self.path.display(), error = %err, "failed to remove session file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use uuid::Uuid;

    fn temp_store(name: &str) -> SessionStore {
        let path = std::env::temp_dir().join(format!("{name}-{}.json", Uuid::new_v4()));
        SessionStore::new(path)
    }

    fn sample_session() -> SessionEntity {
        SessionEntity {
            access_token: "access".into(),
            refresh_token: "refresh".into(),
            user_id: Uuid::new_v4(),
            expires_at: datetime!(2025-08-01 12:00 UTC),
        }
    }

    #[test]
    fn load_without_file_is_logged_out() {
        let store = temp_store("session-missing");
        assert!(store.load().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = temp_store("session-roundtrip");
        let session = sample_session();
        store.save(&session).unwrap();
        assert_eq!(store.load(), Some(session));
        store.clear();
    }

    #[test]
    fn corrupt_file_is_deleted_on_load() {
        let store = temp_store("session-corrupt");
        fs::write(store.path(), "{not json").unwrap();

        assert!(store.load().is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn save_replaces_previous_session() {
        let store = temp_store("session-overwrite");
        let first = sample_session();
        store.save(&first).unwrap();

        let second = SessionEntity {
            access_token: "newer".into(),
            ..first
        };
        store.save(&second).unwrap();
        assert_eq!(store.load(), Some(second));
        store.clear();
    }

    #[test]
    fn clear_is_idempotent() {
        let store = temp_store("session-clear");
        store.clear();
        store.save(&sample_session()).unwrap();
        store.clear();
        store.clear();
        assert!(store.load().is_none());
    }
}
