//! Authentication
//!
//! Login gate for the console. Credentials are checked against the
//! operator account in the config file; a successful login is remembered
//! through a [`SessionStore`] so the next start skips the login screen.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;

/// A remembered login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub logged_in_at: String,
}

/// Where the session lives between runs
pub trait SessionStore {
    fn load(&self) -> Option<Session>;
    fn save(&self, session: &Session) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Login gate used by the app
pub trait AuthService {
    /// Returns false for wrong credentials; errors only on store failure
    fn login(&mut self, username: &str, password: &str) -> Result<bool>;
    fn logout(&mut self) -> Result<()>;
    fn is_authenticated(&self) -> bool;
    fn current_user(&self) -> Option<String>;
    /// Whether any account could log in at all
    fn has_credentials(&self) -> bool;
}

/// Session persisted as JSON next to the config file
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store in the standard config directory
    pub fn default_location() -> Option<Self> {
        crate::config::config_dir().map(|dir| Self::new(dir.join("session.json")))
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<Session> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&content).ok()
    }

    fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write session {}", self.path.display()))
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to remove session {}", self.path.display())),
        }
    }
}

/// Session held only for the lifetime of the process
#[derive(Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<Session> {
        self.session.lock().ok()?.clone()
    }

    fn save(&self, session: &Session) -> Result<()> {
        let mut slot = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("Session lock poisoned"))?;
        *slot = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut slot = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("Session lock poisoned"))?;
        *slot = None;
        Ok(())
    }
}

/// Checks a single configured operator account
pub struct StaticCredentialAuth<S: SessionStore> {
    credentials: Option<(String, String)>,
    store: S,
    session: Option<Session>,
}

impl<S: SessionStore> StaticCredentialAuth<S> {
    /// Restores any stored session for the configured user
    pub fn new(credentials: Option<(String, String)>, store: S) -> Self {
        let session = store.load().filter(|s| {
            credentials
                .as_ref()
                .is_some_and(|(user, _)| *user == s.username)
        });

        Self {
            credentials,
            store,
            session,
        }
    }
}

impl<S: SessionStore> AuthService for StaticCredentialAuth<S> {
    fn login(&mut self, username: &str, password: &str) -> Result<bool> {
        let Some((user, pass)) = &self.credentials else {
            tracing::warn!("Login refused: no operator credentials configured");
            return Ok(false);
        };

        if username.trim() != user || password != pass {
            tracing::info!("Login failed for {}", username.trim());
            return Ok(false);
        }

        let session = Session {
            username: user.clone(),
            logged_in_at: Utc::now().to_rfc3339(),
        };
        self.store.save(&session)?;
        tracing::info!("Logged in as {}", session.username);
        self.session = Some(session);
        Ok(true)
    }

    fn logout(&mut self) -> Result<()> {
        if let Some(session) = self.session.take() {
            tracing::info!("Logged out {}", session.username);
        }
        self.store.clear()
    }

    fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    fn current_user(&self) -> Option<String> {
        self.session.as_ref().map(|s| s.username.clone())
    }

    fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }
}
