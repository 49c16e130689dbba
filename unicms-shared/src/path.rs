//! # Locale-prefixed paths
//!
//! Pure helpers that keep every dashboard path under a `/<locale>` prefix.
//!
//! A prefix only counts when it is a whole path segment: `/en/users` and
//! `/en` are prefixed, `/english` is not. Query strings and fragments end a
//! segment too, so `/ja?tab=1` is prefixed.
//!
//! The infallible helpers are best-effort about malformed input: an empty
//! path is read as `/` and a missing leading slash is inserted. Callers that
//! want malformed input rejected use [`try_add_locale_to_path`].

use std::borrow::Cow;

use thiserror::Error;

use crate::locale::{Locale, SUPPORTED_LOCALES};

/// Rejections produced by [`try_add_locale_to_path`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path was the empty string.
    #[error("path must not be empty")]
    Empty,
    /// The path is relative.
    #[error("path `{0}` must start with `/`")]
    MissingLeadingSlash(String),
}

/// Split a path into its locale segment and the remainder after it.
fn split_locale(path: &str) -> Option<(Locale, &str)> {
    let rest = path.strip_prefix('/')?;
    SUPPORTED_LOCALES.iter().find_map(|&locale| {
        let tail = rest.strip_prefix(locale.as_str())?;
        let at_boundary = tail.is_empty() || tail.starts_with(['/', '?', '#']);
        at_boundary.then_some((locale, tail))
    })
}

fn normalize(path: &str) -> Cow<'_, str> {
    if path.is_empty() {
        Cow::Borrowed("/")
    } else if path.starts_with('/') {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("/{path}"))
    }
}

/// Whether `path` begins with `/<code>/` for a supported locale.
#[must_use]
pub fn has_locale_prefix(path: &str) -> bool {
    split_locale(path).is_some_and(|(_, tail)| tail.starts_with('/'))
}

/// The locale named by the first path segment, if any.
#[must_use]
pub fn locale_from_path(path: &str) -> Option<Locale> {
    split_locale(path).map(|(locale, _)| locale)
}

/// Prefix `path` with `locale` unless it already carries a locale segment.
///
/// ```
/// use shared::{Locale, path::add_locale_to_path};
///
/// assert_eq!(add_locale_to_path("/dashboard", Locale::En), "/en/dashboard");
/// assert_eq!(add_locale_to_path("/", Locale::Vi), "/vi");
/// assert_eq!(add_locale_to_path("/zh/contents", Locale::En), "/zh/contents");
/// ```
#[must_use]
pub fn add_locale_to_path(path: &str, locale: Locale) -> String {
    let path = normalize(path);
    if split_locale(&path).is_some() {
        return path.into_owned();
    }
    if path == "/" {
        return format!("/{locale}");
    }
    format!("/{locale}{path}")
}

/// Checked variant of [`add_locale_to_path`] that rejects malformed input.
///
/// # Errors
/// Returns [`PathError`] when `path` is empty or does not start with `/`.
pub fn try_add_locale_to_path(path: &str, locale: Locale) -> Result<String, PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }
    if !path.starts_with('/') {
        return Err(PathError::MissingLeadingSlash(path.to_string()));
    }
    Ok(add_locale_to_path(path, locale))
}

/// Strip a leading locale segment, yielding `/` when nothing remains.
#[must_use]
pub fn remove_locale_from_path(path: &str) -> String {
    let path = normalize(path);
    match split_locale(&path) {
        Some((_, "")) => "/".to_string(),
        Some((_, tail)) if tail.starts_with('/') => tail.to_string(),
        Some((_, tail)) => format!("/{tail}"),
        None => path.into_owned(),
    }
}

/// Re-home `path` under `locale`, replacing any existing locale segment.
#[must_use]
pub fn switch_locale_path(path: &str, locale: Locale) -> String {
    let bare = remove_locale_from_path(path);
    if bare == "/" {
        format!("/{locale}")
    } else {
        format!("/{locale}{bare}")
    }
}
