//! # Configuration
//!
//! Client configuration: backend address, request timeout, session storage
//! location, logging level and the ambient locale.

pub mod client;

pub use client::{ClientConfig, ConfigError, ConfigOverrides, DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_MS};
