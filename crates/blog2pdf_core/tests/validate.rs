use blog2pdf_core::{
    validate_url, ValidationResult, EMPTY_URL_MESSAGE, INVALID_FORMAT_MESSAGE,
    MISSING_SCHEME_MESSAGE,
};

fn error_of(url: &str) -> Option<&'static str> {
    validate_url(url).error
}

#[test]
fn well_formed_urls_are_valid() {
    for url in [
        "https://en.wikipedia.org/wiki/India",
        "http://example.com",
        "https://blog.example.co.uk/2024/01/my-post",
        "https://example.com/",
        "https://my-site.dev/posts/hello_world.html",
    ] {
        assert_eq!(
            validate_url(url),
            ValidationResult {
                valid: true,
                error: None
            },
            "{url}"
        );
    }
}

#[test]
fn empty_and_whitespace_input_is_rejected_first() {
    assert_eq!(error_of(""), Some(EMPTY_URL_MESSAGE));
    assert_eq!(error_of("   "), Some(EMPTY_URL_MESSAGE));
    assert_eq!(error_of("\t\n"), Some(EMPTY_URL_MESSAGE));
    assert!(!validate_url("").valid);
}

#[test]
fn malformed_input_reports_format_error() {
    assert_eq!(error_of("not-a-url"), Some(INVALID_FORMAT_MESSAGE));
    assert_eq!(error_of("ftp://bad"), Some(INVALID_FORMAT_MESSAGE));
    assert_eq!(error_of("https://"), Some(INVALID_FORMAT_MESSAGE));
    assert_eq!(error_of("https://example.c"), Some(INVALID_FORMAT_MESSAGE));
}

#[test]
fn schemeless_host_passes_shape_but_fails_scheme_rule() {
    assert_eq!(error_of("example.com/blog"), Some(MISSING_SCHEME_MESSAGE));
    assert_eq!(error_of("example.com"), Some(MISSING_SCHEME_MESSAGE));
}

#[test]
fn validation_is_deterministic() {
    let first = validate_url("example.com/blog");
    let second = validate_url("example.com/blog");
    assert_eq!(first, second);
}
