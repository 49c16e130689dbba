//! # Locales
//!
//! The closed set of dashboard locales. Every other module derives locale
//! codes from [`SUPPORTED_LOCALES`]; adding a locale means adding a variant
//! and listing it there.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// A dashboard locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Locale {
    /// English (`en`).
    En,
    /// Japanese (`ja`), the default.
    Ja,
    /// Vietnamese (`vi`).
    Vi,
    /// Simplified Chinese (`zh`).
    Zh,
}

/// Every locale the dashboard routes under, in switcher order.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::Ja, Locale::Vi, Locale::Zh];

/// Locale used when neither the path nor the caller names one.
pub const DEFAULT_LOCALE: Locale = Locale::Ja;

/// Returned when a string does not name a supported locale.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported locale `{0}`")]
pub struct UnsupportedLocale(pub String);

impl Locale {
    /// The routing code used as the path prefix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ja => "ja",
            Self::Vi => "vi",
            Self::Zh => "zh",
        }
    }

    /// Name of the language in that language.
    #[must_use]
    pub const fn native_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Ja => "日本語",
            Self::Vi => "Tiếng Việt",
            Self::Zh => "中文",
        }
    }

    /// Flag emoji shown next to the native name in the switcher.
    #[must_use]
    pub const fn flag(self) -> &'static str {
        match self {
            Self::En => "🇺🇸",
            Self::Ja => "🇯🇵",
            Self::Vi => "🇻🇳",
            Self::Zh => "🇨🇳",
        }
    }

    /// Look up a locale by its exact routing code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        SUPPORTED_LOCALES
            .iter()
            .copied()
            .find(|locale| locale.as_str() == code)
    }

    /// Validate an optional locale tag, falling back to [`DEFAULT_LOCALE`].
    ///
    /// Tags are matched on their primary subtag, case-insensitively, so
    /// `"en-US"` and `"ZH"` resolve while `"fr"` and `""` fall back.
    #[must_use]
    pub fn resolve(tag: Option<&str>) -> Self {
        tag.and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_LOCALE)
    }
}

impl Default for Locale {
    fn default() -> Self {
        DEFAULT_LOCALE
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let primary = value
            .split(['-', '_'])
            .next()
            .unwrap_or(value)
            .trim()
            .to_ascii_lowercase();
        Self::from_code(&primary).ok_or_else(|| UnsupportedLocale(value.to_string()))
    }
}

impl TryFrom<String> for Locale {
    type Error = UnsupportedLocale;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.as_str().to_string()
    }
}
