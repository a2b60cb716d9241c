//! Durable session storage.
//!
//! The session is a `{user, token}` pair persisted as plaintext JSON under
//! the data directory. Anything unreadable or incomplete on disk is treated
//! as "no session" and never surfaced as an error.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::models::User;

const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Session {
    pub user: User,
    pub token: String,
}

/// Raw on-disk shape. Fields are optional so that a partially written or
/// hand-edited file degrades to "absent" instead of failing restore.
#[derive(Deserialize)]
struct PersistedSession {
    token: Option<String>,
    user: Option<User>,
}

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(SESSION_FILE),
        }
    }

    /// Read the persisted session, if there is a well-formed one.
    pub fn restore(&self) -> Option<Session> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        let persisted: PersistedSession = match serde_json::from_str(&content) {
            Ok(p) => p,
            Err(e) => {
                debug!("Ignoring malformed session file: {}", e);
                return None;
            }
        };
        match (persisted.token, persisted.user) {
            (Some(token), Some(user)) => Some(Session { user, token }),
            _ => {
                debug!("Ignoring incomplete session file");
                None
            }
        }
    }

    /// Persist the session verbatim. The token is an opaque string; no shape
    /// validation happens here.
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }
        let content = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write session file: {}", self.path.display()))?;
        Ok(())
    }

    /// Remove the persisted session. Clearing an absent session is fine.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| {
                format!("Failed to remove session file: {}", self.path.display())
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Cargo;

    fn sample_session() -> Session {
        Session {
            user: User {
                id: 1,
                nome: "Maria Souza".to_string(),
                email: "maria@cepe.com.br".to_string(),
                cargo: Cargo::Comercial,
                nivel_acesso: 2,
                ativo: true,
            },
            token: "opaque-token-value".to_string(),
        }
    }

    #[test]
    fn test_save_restore_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        let session = sample_session();
        store.save(&session).unwrap();

        let restored = store.restore().unwrap();
        assert_eq!(restored, session);
    }

    #[test]
    fn test_restore_absent_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        assert!(store.restore().is_none());
    }

    #[test]
    fn test_restore_malformed_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        std::fs::write(dir.path().join(SESSION_FILE), "{not json at all").unwrap();
        assert!(store.restore().is_none());
    }

    #[test]
    fn test_restore_missing_token_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        let user = serde_json::to_string(&sample_session().user).unwrap();
        std::fs::write(
            dir.path().join(SESSION_FILE),
            format!(r#"{{"user":{user}}}"#),
        )
        .unwrap();
        assert!(store.restore().is_none());
    }

    #[test]
    fn test_restore_missing_user_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        std::fs::write(dir.path().join(SESSION_FILE), r#"{"token":"abc"}"#).unwrap();
        assert!(store.restore().is_none());
    }

    #[test]
    fn test_clear_removes_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        store.save(&sample_session()).unwrap();
        assert!(store.restore().is_some());

        store.clear().unwrap();
        assert!(store.restore().is_none());
    }

    #[test]
    fn test_clear_when_absent_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        store.clear().unwrap();
    }

    #[test]
    fn test_save_creates_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("data");
        let store = SessionStore::new(&nested);
        store.save(&sample_session()).unwrap();
        assert!(store.restore().is_some());
    }
}
