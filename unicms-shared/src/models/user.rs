use serde::{Deserialize, Serialize};
use std::fmt;

/// Role assigned to a dashboard account by the auth service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Staff,
    Editor,
    User,
    Student,
    Faculty,
    Parent,
}

impl UserRole {
    /// Return the wire representation used by the auth service.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Staff => "STAFF",
            Self::Editor => "EDITOR",
            Self::User => "USER",
            Self::Student => "STUDENT",
            Self::Faculty => "FACULTY",
            Self::Parent => "PARENT",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of the signed-in user as kept in the session record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionUser {
    pub email: String,
    pub name: String,
    pub role: UserRole,
}
