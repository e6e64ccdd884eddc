//! Log-safe rendering of secrets and owner identifiers
//!
//! Keys and device ids are shown by prefix only, so logs can correlate requests without
//! leaking credentials.

use std::fmt;

/// Masked display of a sensitive value
///
/// Only the first 8 characters are shown, the rest is replaced with `***`.
#[derive(Clone, Debug)]
pub struct SensitiveValue<'a> {
    inner: &'a str,
}

impl<'a> SensitiveValue<'a> {
    /// # Example
    /// ```
    /// use interior_studio::logging::SensitiveValue;
    ///
    /// let key = "sk_live_abcdef123456";
    /// assert_eq!(format!("{}", SensitiveValue::new(key)), "sk_live_***");
    /// ```
    pub fn new(value: &'a str) -> Self {
        Self { inner: value }
    }
}

impl<'a> fmt::Display for SensitiveValue<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visible_len = 8.min(self.inner.len());
        if self.inner.len() <= visible_len || !self.inner.is_char_boundary(visible_len) {
            write!(f, "***")
        } else {
            write!(f, "{}***", &self.inner[..visible_len])
        }
    }
}

/// Whether a value looks like a credential
pub fn is_sensitive_key(value: &str) -> bool {
    const SENSITIVE_PREFIXES: [&str; 6] = ["sk_live_", "sk_test_", "rk_", "whsec_", "sk-", "eyJ"];

    SENSITIVE_PREFIXES.iter().any(|prefix| value.starts_with(prefix))
}

/// Mask every word of free-form text that looks like a credential
///
/// Upstream error bodies sometimes echo the key that was sent.
pub fn sanitize_log_value(value: &str) -> String {
    value
        .split(' ')
        .map(|word| {
            if is_sensitive_key(word) {
                SensitiveValue::new(word).to_string()
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Mask a secret for display in `config show`
///
/// Shows the first 7 and last 4 characters, e.g. `sk_test...6789`.
pub fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return String::new();
    }
    if secret.len() <= 11 || !secret.is_char_boundary(7) || !secret.is_char_boundary(secret.len() - 4) {
        return "***".to_string();
    }

    format!("{}...{}", &secret[..7], &secret[secret.len() - 4..])
}
