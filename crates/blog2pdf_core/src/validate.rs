use once_cell::sync::Lazy;
use regex::Regex;

pub const EMPTY_URL_MESSAGE: &str = "URL cannot be empty";
pub const INVALID_FORMAT_MESSAGE: &str = "Please enter a valid URL format";
pub const MISSING_SCHEME_MESSAGE: &str = "URL must start with http:// or https://";

// Optional scheme, dotted host with a 2-6 letter final label, optional path.
// Case-sensitive and ASCII-only on purpose: callers rely on its exact verdicts.
static URL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https?://)?([0-9a-z.-]+)\.([a-z.]{2,6})([/0-9A-Za-z_ .-]*)*/?$")
        .expect("url shape pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub error: Option<&'static str>,
}

impl ValidationResult {
    fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    fn invalid(message: &'static str) -> Self {
        Self {
            valid: false,
            error: Some(message),
        }
    }
}

/// Checks the shape of a user-entered URL.
///
/// Rules run in order and the first failure wins:
/// 1. empty or whitespace-only input,
/// 2. the host/path shape pattern (scheme optional),
/// 3. a literal `http://` or `https://` prefix.
///
/// A schemeless but well-formed host such as `example.com/blog` therefore
/// passes rule 2 and is reported by rule 3.
pub fn validate_url(url: &str) -> ValidationResult {
    if url.trim().is_empty() {
        return ValidationResult::invalid(EMPTY_URL_MESSAGE);
    }
    if !URL_SHAPE.is_match(url) {
        return ValidationResult::invalid(INVALID_FORMAT_MESSAGE);
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return ValidationResult::invalid(MISSING_SCHEME_MESSAGE);
    }
    ValidationResult::ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_pattern_allows_optional_scheme() {
        assert!(URL_SHAPE.is_match("example.com"));
        assert!(URL_SHAPE.is_match("https://example.com/"));
        assert!(!URL_SHAPE.is_match("example"));
    }

    #[test]
    fn shape_pattern_rejects_ports_and_queries() {
        assert!(!URL_SHAPE.is_match("http://localhost:8000"));
        assert!(!URL_SHAPE.is_match("https://example.com/search?q=rust"));
    }
}
