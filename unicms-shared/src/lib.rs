#![cfg_attr(not(test), forbid(unsafe_code))]
#![warn(clippy::pedantic)]

//! Shared building blocks for the UniCMS client core: the supported locale
//! set, locale-prefix path utilities, wire models, and client configuration.

pub mod config;
pub mod locale;
pub mod models;
pub mod path;

pub use locale::{DEFAULT_LOCALE, Locale, SUPPORTED_LOCALES};
