// ==========================================
// Reagent Inventory - i18n
// ==========================================
// rust-i18n, catalogs under locales/
// Spanish (default) and English
// ==========================================
// The rust_i18n::i18n! macro is initialised in lib.rs
// ==========================================

pub const SUPPORTED_LOCALES: &[&str] = &["es", "en"];

pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// Switches the process-wide label locale. Unsupported codes are ignored.
pub fn set_locale(locale: &str) {
    if SUPPORTED_LOCALES.contains(&locale) {
        rust_i18n::set_locale(locale);
    } else {
        tracing::warn!(locale, "unsupported locale ignored");
    }
}

/// Translates `key` in the current locale.
///
/// # Example
/// ```no_run
/// use reagent_inventory::i18n::t;
/// let label = t("reagent.no_location");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// Translates `key` in an explicit locale.
pub fn t_in(locale: &str, key: &str) -> String {
    rust_i18n::t!(key, locale = locale).to_string()
}

/// Translates `key` and fills `%{name}` placeholders.
///
/// # Example
/// ```no_run
/// use reagent_inventory::i18n::t_with_args;
/// let msg = t_with_args("import.completed", &[("count", "3")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    fill_args(t(key), args)
}

pub fn t_in_with_args(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
    fill_args(t_in(locale, key), args)
}

fn fill_args(mut message: String, args: &[(&str, &str)]) -> String {
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        message = message.replace(&placeholder, v);
    }
    message
}
