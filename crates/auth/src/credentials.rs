use std::{
    fmt,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use {
    convene_gateway::BearerSource,
    convene_operations::User,
    secrecy::{ExposeSecret, Secret},
    tracing::{debug, info, warn},
};

use crate::{
    error::Result,
    store::{KeyValueStore, MemoryStore, keys},
};

/// Coarse session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated,
}

/// Snapshot of the current session.
#[derive(Clone, Default)]
pub struct Credential {
    pub token: Option<Secret<String>>,
    pub identity: Option<User>,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("identity", &self.identity)
            .finish()
    }
}

#[derive(Default)]
struct Session {
    credential: Credential,
    need_auth: bool,
    recover_email: Option<String>,
    recover_otp: Option<String>,
}

/// Owns the session token and identity, persisted under fixed keys.
///
/// A token being present is what "authenticated" means; it is never
/// validated against the backend here. Writes go to storage first and only
/// then to memory, so a failed write leaves the in-memory view unchanged.
pub struct CredentialStore {
    storage: Arc<dyn KeyValueStore>,
    session: RwLock<Session>,
}

impl CredentialStore {
    /// Load whatever the storage already holds.
    pub fn init(storage: Arc<dyn KeyValueStore>) -> Result<Self> {
        let token = storage.get(keys::TOKEN)?.filter(|t| !t.is_empty());
        let identity = match storage.get(keys::USER)? {
            Some(raw) => match serde_json::from_str::<Option<User>>(&raw) {
                Ok(user) => user,
                Err(e) => {
                    warn!(error = %e, "ignoring unreadable persisted identity");
                    None
                },
            },
            None => None,
        };
        let session = Session {
            credential: Credential {
                token: token.map(Secret::new),
                identity,
            },
            need_auth: storage.get(keys::NEED_AUTH)?.is_some(),
            recover_email: storage.get(keys::RECOVER_EMAIL)?,
            recover_otp: storage.get(keys::RECOVER_OTP)?,
        };
        debug!(
            authenticated = session.credential.token.is_some(),
            need_auth = session.need_auth,
            "credential store loaded"
        );
        Ok(Self {
            storage,
            session: RwLock::new(session),
        })
    }

    /// An empty store that persists nothing beyond the process.
    pub fn in_memory() -> Self {
        Self {
            storage: Arc::new(MemoryStore::new()),
            session: RwLock::new(Session::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.session.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.session.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self) -> Credential {
        self.read().credential.clone()
    }

    pub fn state(&self) -> AuthState {
        if self.read().credential.token.is_some() {
            AuthState::Authenticated
        } else {
            AuthState::Anonymous
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == AuthState::Authenticated
    }

    pub fn token(&self) -> Option<Secret<String>> {
        self.read().credential.token.clone()
    }

    pub fn identity(&self) -> Option<User> {
        self.read().credential.identity.clone()
    }

    /// Start a session. The identity is persisted as JSON, `null` when the
    /// backend sent none.
    ///
    /// The token is written last since its presence is what marks the
    /// session as started; if that write fails the previous identity is put
    /// back.
    pub fn set(&self, token: &str, identity: Option<User>) -> Result<()> {
        let user_json = serde_json::to_string(&identity)?;
        let previous = self.storage.get(keys::USER)?;
        self.storage.set(keys::USER, &user_json)?;
        if let Err(e) = self.storage.set(keys::TOKEN, token) {
            let restored = match &previous {
                Some(raw) => self.storage.set(keys::USER, raw),
                None => self.storage.remove(keys::USER),
            };
            if let Err(undo) = restored {
                warn!(error = %undo, "could not restore the previous identity");
            }
            return Err(e);
        }

        let mut session = self.write();
        session.credential = Credential {
            token: Some(Secret::new(token.to_string())),
            identity,
        };
        info!(
            user_id = session.credential.identity.as_ref().map(|u| u.id),
            "session started"
        );
        Ok(())
    }

    /// Wipe the whole persisted namespace, recovery keys and `need_auth`
    /// included.
    pub fn clear(&self) -> Result<()> {
        self.storage.clear()?;
        *self.write() = Session::default();
        info!("session cleared");
        Ok(())
    }

    // ── Re-authentication hint ───────────────────────────────────────────

    /// Set after the identity could not be fetched. Purely advisory: the
    /// token stays and nothing is forced.
    pub fn needs_reauth(&self) -> bool {
        self.read().need_auth
    }

    pub fn mark_needs_reauth(&self) -> Result<()> {
        self.storage.set(keys::NEED_AUTH, "1")?;
        self.write().need_auth = true;
        warn!("identity fetch failed, re-authentication suggested");
        Ok(())
    }

    // ── Password recovery ────────────────────────────────────────────────

    pub fn recovery_email(&self) -> Option<String> {
        self.read().recover_email.clone()
    }

    pub fn record_recovery_email(&self, email: &str) -> Result<()> {
        self.storage.set(keys::RECOVER_EMAIL, email)?;
        self.write().recover_email = Some(email.to_string());
        Ok(())
    }

    pub fn recovery_otp(&self) -> Option<String> {
        self.read().recover_otp.clone()
    }

    pub fn record_recovery_otp(&self, otp: &str) -> Result<()> {
        self.storage.set(keys::RECOVER_OTP, otp)?;
        self.write().recover_otp = Some(otp.to_string());
        Ok(())
    }
}

impl BearerSource for CredentialStore {
    fn bearer_token(&self) -> Option<Secret<String>> {
        self.token()
            .filter(|token| !token.expose_secret().is_empty())
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.read();
        f.debug_struct("CredentialStore")
            .field("credential", &session.credential)
            .field("need_auth", &session.need_auth)
            .field("recover_email", &session.recover_email)
            .finish_non_exhaustive()
    }
}
