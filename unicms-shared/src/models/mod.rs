pub mod auth;
pub mod errors;
pub mod session;
pub mod user;

pub use auth::{AuthResponse, LoginRequest, RegisterRequest};
pub use errors::ErrorResponse;
pub use session::{
    PersistedSession, SESSION_STORAGE_NAME, SESSION_STORAGE_VERSION, SessionState, TOKEN_KEY,
    USER_ID_KEY,
};
pub use user::{SessionUser, UserRole};
