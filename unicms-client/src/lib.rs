#![cfg_attr(not(test), forbid(unsafe_code))]
#![warn(clippy::pedantic)]

//! Client core for the UniCMS dashboard: a persisted session record, an
//! authenticated API gateway that reacts to rejected credentials, and
//! locale-aware navigation helpers.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use client::{ApiClient, FileStorage, SessionStore};
//! use shared::config::{ClientConfig, ConfigOverrides};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::load_config(None, ConfigOverrides::default())?;
//! let storage = Arc::new(FileStorage::new(config.resolved_storage_path()));
//! let session = Arc::new(SessionStore::open(storage));
//! let api = ApiClient::new(&config, session.clone())?;
//!
//! api.login("admin@example.com", "password").await?;
//! let universities: serde_json::Value = api.get_json("/api/universities").await?;
//! # let _ = universities;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod gateway;
pub mod navigation;
pub mod policy;
pub mod session;
pub mod storage;

#[cfg(test)]
mod navigation_test;

pub use error::{ClientError, ClientResult};
pub use gateway::{ApiClient, USER_ID_HEADER};
pub use navigation::{
    HistoryNavigator, LocaleProvider, LocalizedLink, LocalizedRouter, Navigator,
    resolve_current_locale,
};
pub use policy::{ResponseDecision, ResponsePolicy, UnauthorizedPolicy};
pub use session::{SessionStore, StoredCredentials};
#[cfg(target_arch = "wasm32")]
pub use storage::BrowserStorage;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
