//! # Localized navigation
//!
//! Every destination handed to the navigation primitive carries a locale
//! prefix. The current locale is resolved in one place,
//! [`resolve_current_locale`]: the locale segment of the current path, then
//! the ambient locale from a [`LocaleProvider`], then [`DEFAULT_LOCALE`].
//! [`LocalizedRouter`] and [`LocalizedLink`] both go through it, so a link
//! and a `push` to the same path always agree.

use shared::{
    DEFAULT_LOCALE, Locale,
    path::{add_locale_to_path, locale_from_path, switch_locale_path},
};
use tracing::debug;

/// Navigation primitive the router delegates to.
pub trait Navigator {
    /// Open `href` as a new history entry.
    fn push(&mut self, href: &str);
    /// Open `href` in place of the current entry.
    fn replace(&mut self, href: &str);
    /// Step back one entry.
    fn back(&mut self);
    /// Step forward one entry.
    fn forward(&mut self);
    /// Reload the current entry.
    fn refresh(&mut self);

    /// Path currently displayed, when the navigator knows it.
    fn pathname(&self) -> Option<&str> {
        None
    }
}

/// Ambient locale signal consulted when the path carries no locale.
pub trait LocaleProvider {
    /// The ambient locale, `None` when there is no opinion.
    fn current_locale(&self) -> Option<Locale>;
}

impl LocaleProvider for Locale {
    fn current_locale(&self) -> Option<Locale> {
        Some(*self)
    }
}

impl LocaleProvider for Option<Locale> {
    fn current_locale(&self) -> Option<Locale> {
        *self
    }
}

/// Path locale, else ambient locale, else the default.
pub fn resolve_current_locale(pathname: Option<&str>, ambient: &impl LocaleProvider) -> Locale {
    pathname
        .and_then(locale_from_path)
        .or_else(|| ambient.current_locale())
        .unwrap_or(DEFAULT_LOCALE)
}

/// Router facade that localizes `push` and `replace` destinations.
#[derive(Debug)]
pub struct LocalizedRouter<N, P = Option<Locale>> {
    navigator: N,
    ambient: P,
}

impl<N: Navigator, P: LocaleProvider> LocalizedRouter<N, P> {
    /// Wrap `navigator`, falling back to `ambient` when the path has no locale.
    pub fn new(navigator: N, ambient: P) -> Self {
        Self { navigator, ambient }
    }

    /// Locale that `push`/`replace` will apply right now.
    pub fn current_locale(&self) -> Locale {
        resolve_current_locale(self.navigator.pathname(), &self.ambient)
    }

    /// Localize `path` without navigating.
    pub fn localize(&self, path: &str) -> String {
        add_locale_to_path(path, self.current_locale())
    }

    /// Push `path` under the current locale.
    pub fn push(&mut self, path: &str) {
        let href = self.localize(path);
        debug!(%href, "push");
        self.navigator.push(&href);
    }

    /// Replace the current entry with `path` under the current locale.
    pub fn replace(&mut self, path: &str) {
        let href = self.localize(path);
        debug!(%href, "replace");
        self.navigator.replace(&href);
    }

    /// Passed straight through; history entries are already localized.
    pub fn back(&mut self) {
        self.navigator.back();
    }

    /// Passed straight through.
    pub fn forward(&mut self) {
        self.navigator.forward();
    }

    /// Passed straight through.
    pub fn refresh(&mut self) {
        self.navigator.refresh();
    }

    /// Re-open the current page under `locale` and refresh it.
    pub fn switch_locale(&mut self, locale: Locale) {
        let current = self.navigator.pathname().unwrap_or("/");
        let href = switch_locale_path(current, locale);
        debug!(%href, %locale, "switch locale");
        self.navigator.push(&href);
        self.navigator.refresh();
    }

    /// Build a link to `href` localized exactly as `push` would.
    pub fn link(&self, href: &str, label: impl Into<String>) -> LocalizedLink {
        LocalizedLink::new(href, label, self.navigator.pathname(), &self.ambient)
    }

    /// The wrapped navigator.
    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Unwrap the navigator.
    pub fn into_inner(self) -> N {
        self.navigator
    }
}

/// A rendered navigation link whose target carries a locale prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedLink {
    /// Target, always locale-prefixed.
    pub href: String,
    /// Visible text.
    pub label: String,
}

impl LocalizedLink {
    /// Localize `href` for a page currently at `pathname`.
    pub fn new(
        href: &str,
        label: impl Into<String>,
        pathname: Option<&str>,
        ambient: &impl LocaleProvider,
    ) -> Self {
        let locale = resolve_current_locale(pathname, ambient);
        Self {
            href: add_locale_to_path(href, locale),
            label: label.into(),
        }
    }
}

/// In-memory history stack. Pushing after `back` drops the forward entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryNavigator {
    entries: Vec<String>,
    index: usize,
    refreshes: usize,
}

impl HistoryNavigator {
    /// History holding the single entry `initial`.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            index: 0,
            refreshes: 0,
        }
    }

    /// Entry currently shown.
    pub fn current(&self) -> &str {
        &self.entries[self.index]
    }

    /// Every entry, oldest first, including any forward entries.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// How many times the current page was reloaded.
    pub fn refreshes(&self) -> usize {
        self.refreshes
    }
}

impl Default for HistoryNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for HistoryNavigator {
    fn push(&mut self, href: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(href.to_string());
        self.index = self.entries.len() - 1;
    }

    fn replace(&mut self, href: &str) {
        self.entries[self.index] = href.to_string();
    }

    fn back(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    fn forward(&mut self) {
        if self.index + 1 < self.entries.len() {
            self.index += 1;
        }
    }

    fn refresh(&mut self) {
        self.refreshes += 1;
    }

    fn pathname(&self) -> Option<&str> {
        Some(self.current())
    }
}
