//! Field checks shared by both stores.
//!
//! The URL check is a shape check, not a parser: it accepts what a user
//! would type into an address bar for a backend (with or without scheme),
//! and rejects anything with whitespace or an unrecognizable host.
//!
//! Accepted shape, case-insensitive:
//!
//! ```text
//! [http:// | https://] host [:port] [/path]* [?query] [#fragment]
//! host = domain name (TLD of 2+ letters) | IPv4 dotted quad
//! ```

use crate::error::{EnvDeckError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let pattern = concat!(
        r"(?i)^(https?://)?",
        r"((([a-z0-9]([a-z0-9-]*[a-z0-9])*)\.?)+[a-z]{2,}|",
        r"(([0-9]{1,3}\.){3}[0-9]{1,3}))",
        r"(:[0-9]+)?(/[-a-z0-9%_.~+]*)*",
        r"(\?[;&a-z0-9%_.~+=-]*)?",
        r"(#[-a-z0-9_]*)?$",
    );
    Regex::new(pattern).expect("URL pattern is a valid regex")
});

/// Returns true if `url` looks like a reachable backend address.
///
/// # Examples
/// ```
/// use envdeck::validation::is_url_valid;
///
/// assert!(is_url_valid("https://example.com"));
/// assert!(is_url_valid("192.168.0.1:8080/path"));
/// assert!(!is_url_valid("not a url"));
/// ```
pub fn is_url_valid(url: &str) -> bool {
    URL_PATTERN.is_match(url)
}

/// Fails with a validation error if `value` is empty.
pub fn require(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(EnvDeckError::validation(format!(
            "Parameter \"{}\" cannot be empty.",
            field
        )));
    }
    Ok(())
}

/// Fails with a validation error if `url` is empty or malformed.
pub fn require_url(url: &str) -> Result<()> {
    require("url", url)?;
    if !is_url_valid(url) {
        return Err(EnvDeckError::validation(format!(
            "The given url is invalid: {}",
            url
        )));
    }
    Ok(())
}
