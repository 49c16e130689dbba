//! Persisted shape of the session record.
//!
//! Durable storage holds the token and user id under flat keys for header
//! lookup, and the whole record under [`SESSION_STORAGE_NAME`] for
//! rehydration:
//!
//! ```json
//! {"state":{"token":"abc","userId":1,"user":{"email":"…","name":"…","role":"ADMIN"}},"version":0}
//! ```

use serde::{Deserialize, Serialize};

use super::user::SessionUser;

/// Durable key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Durable key holding the user id as a decimal string.
pub const USER_ID_KEY: &str = "userId";

/// Durable key holding the composite [`PersistedSession`] document.
pub const SESSION_STORAGE_NAME: &str = "auth-storage";

/// Version written into new [`PersistedSession`] documents.
pub const SESSION_STORAGE_VERSION: u32 = 0;

/// In-memory session record.
///
/// `token` and `user_id` are set and cleared together; `user` is present
/// exactly when `token` is.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub user: Option<SessionUser>,
}

impl SessionState {
    /// A populated record.
    #[must_use]
    pub fn authenticated(token: impl Into<String>, user_id: i64, user: SessionUser) -> Self {
        Self {
            token: Some(token.into()),
            user_id: Some(user_id),
            user: Some(user),
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Whether the record satisfies the all-or-nothing field invariant.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let present = self.token.is_some();
        self.user_id.is_some() == present && self.user.is_some() == present
    }
}

/// Composite storage document mirroring a [`SessionState`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersistedSession {
    pub state: SessionState,
    #[serde(default)]
    pub version: u32,
}

impl PersistedSession {
    #[must_use]
    pub fn new(state: SessionState) -> Self {
        Self {
            state,
            version: SESSION_STORAGE_VERSION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;

    fn admin() -> SessionUser {
        SessionUser {
            email: "admin@example.com".to_string(),
            name: "Admin".to_string(),
            role: UserRole::Admin,
        }
    }

    #[test]
    fn persisted_document_layout() {
        let doc = PersistedSession::new(SessionState::authenticated("abc", 1, admin()));
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["state"]["token"], "abc");
        assert_eq!(json["state"]["userId"], 1);
        assert_eq!(json["state"]["user"]["role"], "ADMIN");
        assert_eq!(json["version"], 0);
    }

    #[test]
    fn empty_document_serializes_nulls() {
        let json = serde_json::to_string(&PersistedSession::new(SessionState::default())).unwrap();
        assert_eq!(
            json,
            r#"{"state":{"token":null,"userId":null,"user":null},"version":0}"#
        );
    }

    #[test]
    fn decodes_documents_without_version() {
        let doc: PersistedSession =
            serde_json::from_str(r#"{"state":{"token":"x","userId":7,"user":null}}"#).unwrap();
        assert_eq!(doc.version, 0);
        assert_eq!(doc.state.token.as_deref(), Some("x"));
        assert_eq!(doc.state.user_id, Some(7));
    }

    #[test]
    fn consistency_checks_all_fields() {
        assert!(SessionState::default().is_consistent());
        assert!(SessionState::authenticated("t", 2, admin()).is_consistent());
        let partial = SessionState {
            token: Some("t".to_string()),
            user_id: None,
            user: None,
        };
        assert!(!partial.is_consistent());
    }
}
