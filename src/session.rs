//! Session store: the bearer credential and the signed-in profile.
//!
//! One `Session` is built at start-up and passed to every view and API call.
//! It changes only through `login`, `register`, `logout` and `restore`.

use crate::api::ApiClient;
use crate::error::{ClientError, Result};
use crate::models::{LoginRequest, Registration, Role, User};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Where the credential lives between runs
pub trait TokenStore: Send + Sync {
    fn load(&self) -> io::Result<Option<String>>;

    fn save(&self, token: &str) -> io::Result<()>;

    fn clear(&self) -> io::Result<()>;
}

/// Token kept in a single file
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> io::Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn save(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, token)
    }

    fn clear(&self) -> io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }
}

/// Process-local token, nothing persisted
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self { token: Mutex::new(Some(token.into())) }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> io::Result<Option<String>> {
        Ok(self.slot().clone())
    }

    fn save(&self, token: &str) -> io::Result<()> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *self.slot() = None;
        Ok(())
    }
}

pub struct Session {
    token: Option<String>,
    user: Option<User>,
    ready: bool,
    store: Box<dyn TokenStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("signed_in", &self.token.is_some())
            .field("user", &self.user.as_ref().map(|u| &u.email))
            .field("ready", &self.ready)
            .finish()
    }
}

impl Session {
    /// Empty session that has not resolved anything yet
    pub fn new(store: impl TokenStore + 'static) -> Self {
        Self {
            token: None,
            user: None,
            ready: false,
            store: Box::new(store),
        }
    }

    /// Signed-out session backed by memory, ready immediately
    pub fn anonymous() -> Self {
        let mut session = Self::new(MemoryTokenStore::default());
        session.ready = true;
        session
    }

    /// Start-up path: resolve the profile for a persisted token before the
    /// session is ready. A token that fails to resolve is dropped silently.
    pub async fn restore(store: impl TokenStore + 'static, api: &ApiClient) -> Self {
        let mut session = Self::new(store);

        match session.store.load() {
            Ok(Some(token)) => {
                session.token = Some(token);
                match api.auth().me(&session).await {
                    Ok(user) => {
                        debug!("Restored session for {}", user.email);
                        session.user = Some(user);
                    }
                    Err(err) => {
                        warn!("Stored credential rejected, signing out: {}", err);
                        session.logout();
                    }
                }
            }
            Ok(None) => debug!("No stored credential"),
            Err(err) => warn!("Could not read stored credential: {}", err),
        }

        session.ready = true;
        session
    }

    /// Exchange credentials for a token, then resolve the profile. On any
    /// failure the session is left signed out.
    pub async fn login(&mut self, api: &ApiClient, email: &str, password: &str) -> Result<&User> {
        self.logout();

        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let tokens = api.auth().login(&request).await?;
        self.token = Some(tokens.access_token);

        let user = match api.auth().me(self).await {
            Ok(user) => user,
            Err(err) => {
                self.logout();
                return Err(err);
            }
        };

        if let Some(token) = &self.token {
            if let Err(err) = self.store.save(token) {
                warn!("Signed in, but the credential could not be persisted: {}", err);
            }
        }
        info!("Signed in as {} ({})", user.email, user.role);
        Ok(&*self.user.insert(user))
    }

    /// Create the account, then sign in with the same credentials
    pub async fn register(&mut self, api: &ApiClient, registration: &Registration) -> Result<&User> {
        validate_registration(registration)?;
        let created = api.auth().register(registration).await?;
        info!("Registered {} as {}", created.email, created.role);
        self.login(api, &registration.email, &registration.password).await
    }

    /// Drop credential and profile
    pub fn logout(&mut self) {
        if self.token.take().is_some() {
            debug!("Signing out");
        }
        self.user = None;
        if let Err(err) = self.store.clear() {
            warn!("Could not remove stored credential: {}", err);
        }
    }

    /// Authentication failures from any call end the session
    pub fn note_failure(&mut self, err: &ClientError) {
        if err.is_auth_failure() && self.token.is_some() {
            info!("Credential no longer accepted; signing out");
            self.logout();
        }
    }

    pub fn credential(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|user| user.role)
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }
}

/// Required-field checks done before the registration call
fn validate_registration(registration: &Registration) -> Result<()> {
    if registration.email.trim().is_empty() || !registration.email.contains('@') {
        return Err(ClientError::Validation("A valid email address is required".into()));
    }
    if registration.full_name.trim().is_empty() {
        return Err(ClientError::Validation("Full name is required".into()));
    }
    if registration.password.chars().count() < 6 {
        return Err(ClientError::Validation("Password must be at least 6 characters".into()));
    }
    Ok(())
}
