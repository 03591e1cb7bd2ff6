use tracing::warn;

/// Locale used when the configured one has no translations
pub const FALLBACK_LOCALE: &str = "en";

/// Locales with translation files
pub fn available_locales() -> Vec<&'static str> {
    available_locales!()
}

/// Switch the process-wide locale, falling back to English for unknown ones
pub fn set_locale(locale: &str) {
    if available_locales().contains(&locale) {
        rust_i18n::set_locale(locale);
    } else {
        warn!(
            "No translations for locale {}, using {}",
            locale, FALLBACK_LOCALE
        );
        rust_i18n::set_locale(FALLBACK_LOCALE);
    }
}
