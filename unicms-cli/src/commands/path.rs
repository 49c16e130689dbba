//! Offline helpers for locale-prefixed dashboard paths.
//!
//! The ambient locale is the configured `default_locale`, so `--locale`,
//! `UNICMS_LOCALE` and the config file all feed it.

use anyhow::Result;
use clap::Subcommand;
use client::{HistoryNavigator, LocalizedRouter};
use shared::{
    DEFAULT_LOCALE, Locale, SUPPORTED_LOCALES,
    config::ClientConfig,
    path::{add_locale_to_path, remove_locale_from_path, switch_locale_path, try_add_locale_to_path},
};

#[derive(Subcommand, Debug)]
pub enum PathCommand {
    /// Prefix a path with a locale unless it already carries one
    Add {
        path: String,

        /// Locale to apply; defaults to the configured locale
        #[arg(id = "target", value_name = "LOCALE")]
        locale: Option<Locale>,

        /// Reject empty paths and paths without a leading `/`
        #[arg(long)]
        strict: bool,
    },

    /// Strip the locale prefix from a path
    Remove { path: String },

    /// Re-home a path under another locale
    Switch {
        path: String,

        #[arg(id = "target", value_name = "LOCALE")]
        locale: Locale,
    },

    /// Print the locale a path resolves to
    Locale {
        path: String,

        /// Locale used when the path carries none; defaults to the configured locale
        #[arg(long)]
        fallback: Option<Locale>,
    },

    /// Print where a link to PATH points when rendered on the page at `--from`
    Link {
        path: String,

        /// Page the link is rendered on
        #[arg(long, default_value = "/")]
        from: String,
    },
}

pub fn run(command: &PathCommand, config: &ClientConfig) -> Result<()> {
    let ambient = config.default_locale;
    let output = match command {
        PathCommand::Add {
            path,
            locale,
            strict: true,
        } => try_add_locale_to_path(path, locale.unwrap_or(ambient))?,
        PathCommand::Add { path, locale, .. } => add_locale_to_path(path, locale.unwrap_or(ambient)),
        PathCommand::Remove { path } => remove_locale_from_path(path),
        PathCommand::Switch { path, locale } => switch_locale_path(path, *locale),
        PathCommand::Locale { path, fallback } => {
            let router = LocalizedRouter::new(
                HistoryNavigator::new(path.as_str()),
                fallback.unwrap_or(ambient),
            );
            router.current_locale().to_string()
        }
        PathCommand::Link { path, from } => {
            let router = LocalizedRouter::new(HistoryNavigator::new(from.as_str()), ambient);
            router.link(path, path.as_str()).href
        }
    };
    println!("{output}");
    Ok(())
}

pub fn list_locales() {
    for &locale in SUPPORTED_LOCALES {
        let marker = if locale == DEFAULT_LOCALE {
            " (default)"
        } else {
            ""
        };
        println!(
            "{} {} {}{marker}",
            locale.flag(),
            locale.as_str(),
            locale.native_name()
        );
    }
}
