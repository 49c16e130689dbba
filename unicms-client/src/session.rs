//! # Session record
//!
//! [`SessionStore`] is the single owner of "who is signed in". It is built
//! explicitly around a [`KeyValueStorage`] and shared by reference (usually
//! an `Arc`) with the gateway and any UI code that needs it.
//!
//! Every mutation replaces the whole record and is mirrored synchronously to
//! storage: the flat `token`/`userId` keys used for request headers, and the
//! composite `auth-storage` document used for rehydration. The in-memory
//! record always reflects the latest mutation; a storage failure is logged
//! and returned to the caller.

use std::sync::{Arc, Mutex, PoisonError};

use shared::models::{
    AuthResponse, PersistedSession, SESSION_STORAGE_NAME, SessionState, SessionUser, TOKEN_KEY,
    USER_ID_KEY, UserRole,
};
use tokio::sync::watch;
use tracing::{debug, error, warn};

use crate::storage::{KeyValueStorage, StorageError};

/// Token and user id as currently held in durable storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredCredentials {
    /// Raw `token` value.
    pub token: Option<String>,
    /// Raw `userId` value, still in its string form.
    pub user_id: Option<String>,
}

/// Persisted, observable session record.
#[derive(Debug)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
    state: Mutex<SessionState>,
    token_tx: watch::Sender<Option<String>>,
    user_id_tx: watch::Sender<Option<i64>>,
    user_tx: watch::Sender<Option<SessionUser>>,
}

impl SessionStore {
    /// Build a store over `storage`, rehydrating from the composite document.
    ///
    /// An unreadable, corrupt, or inconsistent document is logged and
    /// ignored; the store then starts empty. The flat `token`/`userId` keys
    /// must mirror the document: when they disagree the store starts signed
    /// out and rewrites all three keys.
    pub fn open(storage: Arc<dyn KeyValueStorage>) -> Self {
        let (state, drifted) = rehydrate(storage.as_ref());
        let (token_tx, _) = watch::channel(state.token.clone());
        let (user_id_tx, _) = watch::channel(state.user_id);
        let (user_tx, _) = watch::channel(state.user.clone());
        let store = Self {
            storage,
            state: Mutex::new(state),
            token_tx,
            user_id_tx,
            user_tx,
        };
        if drifted {
            if let Err(err) = store.persist(&SessionState::default()) {
                warn!(error = %err, "failed to reset drifted session storage");
            }
        }
        store
    }

    /// Replace the record with a freshly authenticated user.
    ///
    /// # Errors
    /// Returns [`StorageError`] if persisting fails; the in-memory record is
    /// updated regardless.
    pub fn set_auth(
        &self,
        token: impl Into<String>,
        user_id: i64,
        email: impl Into<String>,
        name: impl Into<String>,
        role: UserRole,
    ) -> Result<(), StorageError> {
        let user = SessionUser {
            email: email.into(),
            name: name.into(),
            role,
        };
        self.replace(SessionState::authenticated(token, user_id, user))
    }

    /// [`SessionStore::set_auth`] from a login or registration response.
    ///
    /// # Errors
    /// Returns [`StorageError`] if persisting fails.
    pub fn set_auth_from_response(&self, response: &AuthResponse) -> Result<(), StorageError> {
        self.replace(SessionState::authenticated(
            response.token.clone(),
            response.user_id,
            response.user(),
        ))
    }

    /// Reset every field to absent and purge the durable credentials.
    ///
    /// # Errors
    /// Returns [`StorageError`] if persisting fails; the in-memory record is
    /// cleared regardless.
    pub fn clear_auth(&self) -> Result<(), StorageError> {
        self.replace(SessionState::default())
    }

    fn replace(&self, next: SessionState) -> Result<(), StorageError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        *state = next;
        self.publish(&state);
        let result = self.persist(&state);
        if let Err(err) = &result {
            error!(error = %err, "failed to persist session record");
        } else {
            debug!(authenticated = state.is_authenticated(), "session record persisted");
        }
        result
    }

    fn publish(&self, state: &SessionState) {
        self.token_tx.send_if_modified(|current| replace_if_changed(current, &state.token));
        self.user_id_tx
            .send_if_modified(|current| replace_if_changed(current, &state.user_id));
        self.user_tx.send_if_modified(|current| replace_if_changed(current, &state.user));
    }

    fn persist(&self, state: &SessionState) -> Result<(), StorageError> {
        match (&state.token, state.user_id) {
            (Some(token), Some(user_id)) => {
                self.storage.set_item(TOKEN_KEY, token)?;
                self.storage.set_item(USER_ID_KEY, &user_id.to_string())?;
            }
            _ => {
                self.storage.remove_item(TOKEN_KEY)?;
                self.storage.remove_item(USER_ID_KEY)?;
            }
        }
        let document = serde_json::to_string(&PersistedSession::new(state.clone()))?;
        self.storage.set_item(SESSION_STORAGE_NAME, &document)
    }

    /// Read the durable `token`/`userId` keys, bypassing the in-memory copy.
    ///
    /// # Errors
    /// Returns [`StorageError`] when storage cannot be read.
    pub fn stored_credentials(&self) -> Result<StoredCredentials, StorageError> {
        Ok(StoredCredentials {
            token: self.storage.get_item(TOKEN_KEY)?,
            user_id: self.storage.get_item(USER_ID_KEY)?,
        })
    }

    /// Current bearer token.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.token_tx.borrow().clone()
    }

    /// Current numeric user id.
    #[must_use]
    pub fn user_id(&self) -> Option<i64> {
        *self.user_id_tx.borrow()
    }

    /// Current profile.
    #[must_use]
    pub fn user(&self) -> Option<SessionUser> {
        self.user_tx.borrow().clone()
    }

    /// A consistent copy of the whole record.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// `true` while a token is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token_tx.borrow().is_some()
    }

    /// Watch the token; receivers wake only when it changes.
    #[must_use]
    pub fn subscribe_token(&self) -> watch::Receiver<Option<String>> {
        self.token_tx.subscribe()
    }

    /// Watch the user id.
    #[must_use]
    pub fn subscribe_user_id(&self) -> watch::Receiver<Option<i64>> {
        self.user_id_tx.subscribe()
    }

    /// Watch the profile.
    #[must_use]
    pub fn subscribe_user(&self) -> watch::Receiver<Option<SessionUser>> {
        self.user_tx.subscribe()
    }

    /// The storage backing this store.
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn KeyValueStorage> {
        &self.storage
    }
}

fn replace_if_changed<T: PartialEq + Clone>(current: &mut T, next: &T) -> bool {
    if current == next {
        false
    } else {
        *current = next.clone();
        true
    }
}

/// Restore the record and report whether durable storage has drifted from it.
fn rehydrate(storage: &dyn KeyValueStorage) -> (SessionState, bool) {
    let state = read_document(storage);
    if flat_keys_match(storage, &state) {
        return (state, false);
    }
    warn!(
        authenticated = state.is_authenticated(),
        "stored credentials disagree with the session record; starting signed out"
    );
    (SessionState::default(), true)
}

fn flat_keys_match(storage: &dyn KeyValueStorage, state: &SessionState) -> bool {
    let (Ok(token), Ok(user_id)) = (storage.get_item(TOKEN_KEY), storage.get_item(USER_ID_KEY))
    else {
        return false;
    };
    token == state.token && user_id == state.user_id.map(|id| id.to_string())
}

fn read_document(storage: &dyn KeyValueStorage) -> SessionState {
    let raw = match storage.get_item(SESSION_STORAGE_NAME) {
        Ok(Some(raw)) => raw,
        Ok(None) => return SessionState::default(),
        Err(err) => {
            warn!(error = %err, "session storage unreadable; starting signed out");
            return SessionState::default();
        }
    };
    match serde_json::from_str::<PersistedSession>(&raw) {
        Ok(document) if document.state.is_consistent() => {
            debug!(
                authenticated = document.state.is_authenticated(),
                version = document.version,
                "rehydrated session record"
            );
            document.state
        }
        Ok(_) => {
            warn!("persisted session record is inconsistent; starting signed out");
            SessionState::default()
        }
        Err(err) => {
            warn!(error = %err, "persisted session record is corrupt; starting signed out");
            SessionState::default()
        }
    }
}
