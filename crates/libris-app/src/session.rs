//! # Session Store
//!
//! Owns the one piece of client state that survives a restart: the
//! [`Credential`]. Everything else (identity, admin gating) is derived from it
//! on demand.
//!
//! ## Credential cell
//!
//! The current credential lives in an `Arc<RwLock<Option<Credential>>>`.
//! The session store is its only writer. The API client reads it through a
//! [`SessionHandle`] each time it dispatches a request, so a `login` or
//! `logout` that has returned is seen by every later call. The lock is held
//! for a clone or an assignment only, never across an `.await`.
//!
//! ## Persistence
//!
//! [`SessionStore::load`] reads the persisted credential once, before the
//! store exists. Persistence sits behind [`CredentialStore`]: a JSON file
//! holding `{"token": "..."}` in production, memory in tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use thiserror::Error;

use libris_client::users::Registration;
use libris_client::{ApiClient, ApiError, CredentialSource, LibrisConfig};
use libris_core::{Credential, Identity};

use crate::notify::Notifier;

/// The single key the credential is persisted under.
pub const TOKEN_KEY: &str = "token";

const REGISTRATION_FALLBACK: &str = "Registration failed. Please try again.";

/// Errors from session operations.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The server rejected the username/password pair, or could not be
    /// reached to check it.
    #[error("Invalid credentials")]
    Login(#[source] ApiError),

    /// Registration failed. `message` is the server's text when it sent one.
    #[error("{message}")]
    Registration {
        message: String,
        #[source]
        source: ApiError,
    },

    /// The persisted credential could not be read or written.
    #[error("credential store at {path}: {reason}")]
    Store { path: String, reason: String },

    /// The API client could not be built.
    #[error(transparent)]
    Client(#[from] ApiError),
}

// ── Persistence ─────────────────────────────────────────────────────────────

/// Durable storage for the credential.
pub trait CredentialStore: Send + Sync {
    /// Read the stored credential, if any.
    fn load(&self) -> Result<Option<Credential>, SessionError>;
    /// Replace the stored credential.
    fn save(&self, credential: &Credential) -> Result<(), SessionError>;
    /// Remove the stored credential. Removing nothing is not an error.
    fn clear(&self) -> Result<(), SessionError>;
}

/// Credential file: a JSON object with a single `token` key.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn store_error(&self, reason: impl std::fmt::Display) -> SessionError {
        SessionError::Store {
            path: self.path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<Credential>, SessionError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.store_error(e)),
        };

        // A damaged file means "logged out", not "cannot start".
        let map: HashMap<String, String> = match serde_json::from_str(&content) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable credential file");
                return Ok(None);
            }
        };
        Ok(map
            .get(TOKEN_KEY)
            .and_then(|token| Credential::new(token.as_str()).ok()))
    }

    fn save(&self, credential: &Credential) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.store_error(e))?;
            }
        }
        let mut map = HashMap::new();
        map.insert(TOKEN_KEY, credential.as_str());
        let body = serde_json::to_string(&map).map_err(|e| self.store_error(e))?;
        std::fs::write(&self.path, body).map_err(|e| self.store_error(e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .map_err(|e| self.store_error(e))?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.store_error(e)),
        }
    }
}

/// In-process credential storage.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<Credential>>,
}

impl MemoryCredentialStore {
    pub fn new(initial: Option<Credential>) -> Self {
        Self {
            slot: Mutex::new(initial),
        }
    }

    /// What is currently persisted.
    pub fn stored(&self) -> Option<Credential> {
        self.slot.lock().clone()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<Credential>, SessionError> {
        Ok(self.slot.lock().clone())
    }

    fn save(&self, credential: &Credential) -> Result<(), SessionError> {
        *self.slot.lock() = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.slot.lock() = None;
        Ok(())
    }
}

// ── Credential cell ─────────────────────────────────────────────────────────

/// Read-only view of the credential cell, handed to the API client.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    cell: Arc<RwLock<Option<Credential>>>,
}

impl CredentialSource for SessionHandle {
    fn current(&self) -> Option<Credential> {
        self.cell.read().clone()
    }
}

// ── Session store ───────────────────────────────────────────────────────────

/// The authenticated session.
pub struct SessionStore {
    cell: Arc<RwLock<Option<Credential>>>,
    store: Arc<dyn CredentialStore>,
    client: ApiClient,
    notifier: Notifier,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("logged_in", &self.cell.read().is_some())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Load the persisted credential and build the API client wired to the
    /// session's credential cell.
    pub fn load(
        config: &LibrisConfig,
        store: Arc<dyn CredentialStore>,
        notifier: Notifier,
    ) -> Result<Self, SessionError> {
        let initial = store.load()?;
        tracing::debug!(restored = initial.is_some(), "session loaded");

        let handle = SessionHandle {
            cell: Arc::new(RwLock::new(initial)),
        };
        let client = ApiClient::new(config, Arc::new(handle.clone()))?;

        Ok(Self {
            cell: handle.cell,
            store,
            client,
            notifier,
        })
    }

    /// The API client. Every request it sends carries this session's
    /// credential as of dispatch.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// A reader for the credential cell.
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            cell: Arc::clone(&self.cell),
        }
    }

    /// The current credential.
    pub fn credential(&self) -> Option<Credential> {
        self.cell.read().clone()
    }

    /// The identity decoded from the current credential. An undecodable
    /// credential reads as no identity.
    pub fn identity(&self) -> Option<Identity> {
        self.cell.read().as_ref().and_then(Credential::identity)
    }

    /// Exchange a username and password for a credential and make it
    /// active. On failure the previous session is left exactly as it was.
    pub async fn login(&self, username: &str, password: &str) -> Result<Option<Identity>, SessionError> {
        let credential = match self.client.users().login(username, password).await {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(username, error = %e, "login failed");
                self.notifier.error("Invalid credentials");
                return Err(SessionError::Login(e));
            }
        };

        let identity = credential.identity();
        *self.cell.write() = Some(credential.clone());

        // The in-memory session stands even if it could not be persisted.
        if let Err(e) = self.store.save(&credential) {
            tracing::warn!(error = %e, "credential not persisted");
        }
        tracing::info!(
            username,
            role = identity.as_ref().map(|i| i.role.as_str()),
            "logged in"
        );
        Ok(identity)
    }

    /// Drop the credential from memory and from storage. Calling it when
    /// already logged out changes nothing.
    pub fn logout(&self) -> Result<(), SessionError> {
        let was_logged_in = self.cell.write().take().is_some();
        self.store.clear()?;
        if was_logged_in {
            tracing::info!("logged out");
        }
        Ok(())
    }

    /// Forget a credential the server has stopped accepting.
    pub fn invalidate(&self) {
        if let Err(e) = self.logout() {
            tracing::warn!(error = %e, "credential store not cleared on invalidation");
        }
    }

    /// Create an account. Does not log in.
    pub async fn register(&self, registration: &Registration) -> Result<(), SessionError> {
        match self.client.users().register(registration).await {
            Ok(()) => {
                tracing::info!(username = %registration.username, "registered");
                Ok(())
            }
            Err(e) => {
                let message = e
                    .server_message()
                    .unwrap_or(REGISTRATION_FALLBACK)
                    .to_string();
                tracing::warn!(username = %registration.username, error = %e, "registration failed");
                self.notifier.error(message.clone());
                Err(SessionError::Registration { message, source: e })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("nested").join("credentials.json"));
        assert!(store.load().unwrap().is_none());

        store.save(&Credential::new("tok").unwrap()).unwrap();
        let raw = std::fs::read_to_string(store.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json, serde_json::json!({"token": "tok"}));
        assert_eq!(store.load().unwrap().unwrap().as_str(), "tok");

        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn damaged_file_loads_as_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(FileCredentialStore::new(&path).load().unwrap().is_none());

        std::fs::write(&path, r#"{"token": "  "}"#).unwrap();
        assert!(FileCredentialStore::new(&path).load().unwrap().is_none());
    }

    #[test]
    fn handle_sees_cell_writes() {
        let handle = SessionHandle::default();
        assert!(handle.current().is_none());
        *handle.cell.write() = Some(Credential::new("abc").unwrap());
        assert_eq!(handle.current().unwrap().as_str(), "abc");
    }
}
