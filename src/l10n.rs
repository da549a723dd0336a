//! Localization capability and user-facing flash messages.
//!
//! Handlers never reach into a global translation table; a [`Localizer`] is
//! injected into each of them and message keys are looked up per request
//! locale, falling back to `en-US`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Context;

pub const FALLBACK_LOCALE: &str = "en-US";

/// Keys of the predefined unsubscribe reasons, in fixed display order.
///
/// The reason-collection form and the text forwarded to the remote service
/// both index into this list, so the order is part of the wire contract.
pub const UNSUB_REASON_KEYS: [&str; 5] = [
    "reason-too-frequent",
    "reason-not-relevant",
    "reason-hard-to-read",
    "reason-never-signed-up",
    "reason-social-media",
];

pub mod keys {
    pub const GENERAL_ERROR: &str = "general-error";
    pub const THANK_YOU: &str = "thank-you";
    pub const BAD_TOKEN: &str = "bad-token";
    pub const RECOVERY_SUCCESS: &str = "recovery-success";
    pub const UNKNOWN_ADDRESS: &str = "unknown-address";
    pub const INVALID_EMAIL: &str = "invalid-email";
    pub const INVALID_LANG: &str = "invalid-lang";
    pub const INVALID_COUNTRY: &str = "invalid-country";
    pub const INVALID_FORMAT: &str = "invalid-format";
    pub const UNKNOWN_NEWSLETTER: &str = "unknown-newsletter";
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Severity {
    Info,
    Error,
}

impl Severity {
    pub fn css_class(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Error => "error",
        }
    }
}

/// Message surfaced to the user alongside a rendered page. Handlers return
/// these as plain values; the template layer decides how to display them.
#[derive(Clone, Debug)]
pub struct FlashMessage {
    pub severity: Severity,
    pub message: String,
}

impl FlashMessage {
    pub fn info(message: String) -> Self {
        Self {
            severity: Severity::Info,
            message,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            severity: Severity::Error,
            message,
        }
    }
}

static FALLBACK_CATALOG: &str = include_str!("../l10n/en-US.json");

/// Translation lookup injected into every handler.
pub struct Localizer {
    catalogs: HashMap<String, HashMap<String, String>>,
}

impl Localizer {
    /// Localizer with only the embedded fallback locale.
    pub fn builtin() -> Self {
        let fallback: HashMap<String, String> =
            serde_json::from_str(FALLBACK_CATALOG).expect("embedded en-US catalog is malformed");
        let mut catalogs = HashMap::new();
        catalogs.insert(FALLBACK_LOCALE.to_string(), fallback);
        Self { catalogs }
    }

    /// Merge `<locale>.json` catalogs from a directory on top of the
    /// embedded fallback.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, anyhow::Error> {
        let mut localizer = Localizer::builtin();
        for entry in fs::read_dir(&dir).context("error reading l10n directory")? {
            let path = entry.context("error reading l10n directory entry")?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let locale = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("error reading {}", path.display()))?;
            let catalog: HashMap<String, String> = serde_json::from_str(&raw)
                .with_context(|| format!("error parsing {}", path.display()))?;
            localizer
                .catalogs
                .entry(locale)
                .or_default()
                .extend(catalog);
        }
        Ok(localizer)
    }

    /// Look up `key` for `locale`, falling back to `en-US`, then to the key
    /// itself so a missing translation stays visible instead of erroring.
    pub fn text(&self, locale: &str, key: &str) -> String {
        self.catalogs
            .get(locale)
            .and_then(|catalog| catalog.get(key))
            .or_else(|| {
                self.catalogs
                    .get(FALLBACK_LOCALE)
                    .and_then(|catalog| catalog.get(key))
            })
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// Fallback-locale text, for the places where the remote service expects
    /// wording its operators can read (unsubscribe reasons).
    pub fn fallback_text(&self, key: &str) -> String {
        self.text(FALLBACK_LOCALE, key)
    }
}
