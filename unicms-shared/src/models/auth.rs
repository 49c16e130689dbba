use serde::{Deserialize, Serialize};

use super::user::{SessionUser, UserRole};

/// Credentials posted to `/api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Payload posted to `/api/auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Successful login or registration response from the auth service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user_id: i64,
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

impl AuthResponse {
    /// The user identity carried by this response.
    #[must_use]
    pub fn user(&self) -> SessionUser {
        SessionUser {
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_response_decodes_backend_payload() {
        let json = r#"{
            "token": "eyJhbGciOi",
            "refreshToken": "refresh-1",
            "userId": 42,
            "email": "staff@example.com",
            "name": "Staff Member",
            "role": "STAFF"
        }"#;
        let response: AuthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.user_id, 42);
        assert_eq!(response.refresh_token.as_deref(), Some("refresh-1"));
        assert_eq!(response.user().role, UserRole::Staff);
        assert_eq!(response.user().name, "Staff Member");
    }

    #[test]
    fn auth_response_tolerates_missing_refresh_token() {
        let json = r#"{"token":"t","userId":1,"email":"a@b.c","name":"A","role":"ADMIN"}"#;
        let response: AuthResponse = serde_json::from_str(json).unwrap();
        assert!(response.refresh_token.is_none());
    }

    #[test]
    fn login_request_serializes_plain_fields() {
        let request = LoginRequest {
            email: "admin@example.com".to_string(),
            password: "password".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["email"], "admin@example.com");
        assert_eq!(json["password"], "password");
    }
}
