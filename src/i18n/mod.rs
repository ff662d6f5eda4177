//! Internationalization (i18n) support for oncotrend
//!
//! Report labels and error descriptions are available in German (default)
//! and English. The trend interpretation narrative is always German.

use std::sync::OnceLock;

// Note: rust_i18n::i18n! macro is declared in lib.rs (crate root)

static CURRENT_LOCALE: OnceLock<String> = OnceLock::new();

/// Locale used when nothing else is configured
pub const DEFAULT_LOCALE: &str = "de";

/// Set the current locale for translations
///
/// # Arguments
///
/// * `locale` - Language code (de, en)
///
/// # Examples
///
/// ```rust,ignore
/// use oncotrend::i18n::set_locale;
///
/// set_locale("en");
/// ```
pub fn set_locale(locale: &str) {
    let normalized = normalize_locale(locale);
    rust_i18n::set_locale(&normalized);
    CURRENT_LOCALE.get_or_init(|| normalized.clone());
}

/// Get the locale the process was initialized with
pub fn current_locale() -> &'static str {
    CURRENT_LOCALE.get().map(|s| s.as_str()).unwrap_or(DEFAULT_LOCALE)
}

/// Initialize i18n from environment variables
///
/// Reads `ONCOTREND_LANG`; falls back to German if not set.
pub fn init_from_env() {
    let locale = std::env::var("ONCOTREND_LANG").unwrap_or_else(|_| DEFAULT_LOCALE.to_string());
    set_locale(&locale);
}

/// Normalize locale code to supported format
///
/// - en-US, en_GB, english -> en
/// - everything else -> de
fn normalize_locale(locale: &str) -> String {
    let lower = locale.to_lowercase();

    if lower.starts_with("en") || lower == "english" {
        "en".to_string()
    } else {
        DEFAULT_LOCALE.to_string()
    }
}

/// Translate a key with optional parameters
///
/// This is a re-export of rust_i18n::t! for convenience.
///
/// ```rust,ignore
/// use oncotrend::i18n::t;
///
/// let msg = t!("report.p_value", value = "0.0321");
/// ```
#[doc(inline)]
pub use rust_i18n::t;
