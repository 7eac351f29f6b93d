use sha2::{Digest, Sha256};

pub const DEFAULT_PDF_FILENAME: &str = "blog-article.pdf";

/// Extracts the `filename` parameter of a `Content-Disposition` header.
///
/// Falls back to [`DEFAULT_PDF_FILENAME`] when the header is missing or has
/// no usable filename.
pub fn filename_from_disposition(header: Option<&str>) -> String {
    header
        .into_iter()
        .flat_map(|value| value.split(';'))
        .filter_map(|part| {
            let (key, value) = part.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("filename")
                .then(|| value.trim().trim_matches(['"', '\''].as_ref()).to_string())
        })
        .find(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_PDF_FILENAME.to_string())
}

/// Windows-safe, deterministic filename for a saved PDF:
/// `{sanitized_stem}--{short_hash(url)}.pdf`.
pub fn deterministic_filename(suggested: &str, source_url: &str) -> String {
    let stem = suggested
        .strip_suffix(".pdf")
        .or_else(|| suggested.strip_suffix(".PDF"))
        .unwrap_or(suggested);
    let sanitized = sanitize_stem(stem);
    let hash = short_hash(source_url);
    format!("{sanitized}--{hash}.pdf")
}

fn sanitize_stem(input: &str) -> String {
    let mut cleaned: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]).to_string();
    if cleaned.is_empty() {
        cleaned = "blog-article".to_string();
    }
    let mut compacted = String::with_capacity(cleaned.len());
    let mut prev_underscore = false;
    for c in cleaned.chars() {
        if c == '_' && prev_underscore {
            continue;
        }
        prev_underscore = c == '_';
        compacted.push(c);
    }
    let mut final_name: String = compacted.chars().take(80).collect();
    if is_reserved_windows_name(&final_name) {
        final_name.push('_');
    }
    final_name
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}

fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut hex = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposition_filename_is_extracted() {
        assert_eq!(
            filename_from_disposition(Some("attachment; filename=blog-article.pdf")),
            "blog-article.pdf"
        );
        assert_eq!(
            filename_from_disposition(Some("attachment; FILENAME=\"India.pdf\"")),
            "India.pdf"
        );
    }

    #[test]
    fn missing_disposition_uses_default() {
        assert_eq!(filename_from_disposition(None), DEFAULT_PDF_FILENAME);
        assert_eq!(
            filename_from_disposition(Some("attachment")),
            DEFAULT_PDF_FILENAME
        );
        assert_eq!(
            filename_from_disposition(Some("attachment; filename=\"\"")),
            DEFAULT_PDF_FILENAME
        );
    }

    #[test]
    fn deterministic_filename_is_stable_per_url() {
        let a = deterministic_filename("blog-article.pdf", "https://example.com/a");
        let b = deterministic_filename("blog-article.pdf", "https://example.com/a");
        let c = deterministic_filename("blog-article.pdf", "https://example.com/b");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("blog-article--"));
        assert!(a.ends_with(".pdf"));
    }

    #[test]
    fn unsafe_characters_are_replaced() {
        let name = deterministic_filename("a:b/c??.pdf", "https://example.com");
        assert!(name.starts_with("a_b_c--"), "{name}");
        let reserved = deterministic_filename("CON.pdf", "https://example.com");
        assert!(reserved.starts_with("CON_--"), "{reserved}");
    }
}
