/// Video identifier extraction from free-form user input
///
/// Accepts bare identifiers (`BV1xx411c7mD`), full video URLs and URL
/// fragments, and returns the canonical `BV` + 10 alphanumerics key.
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;
use url::Url;

use crate::error::{DomainError, Result};

fn embedded_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // The trailing group rejects runs longer than 10 characters.
    PATTERN.get_or_init(|| Regex::new(r"(BV[0-9A-Za-z]{10})(?:[^0-9A-Za-z]|$)").unwrap())
}

fn exact_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^BV[0-9A-Za-z]{10}$").unwrap())
}

fn find_embedded(text: &str) -> Option<String> {
    embedded_pattern()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract the canonical identifier, or `None` when the input holds none
pub fn extract_identifier(input: &str) -> Option<String> {
    if let Some(found) = find_embedded(input) {
        return Some(found);
    }

    // Percent-encoded paths only reveal the identifier after decoding
    match Url::parse(input.trim()) {
        Ok(url) => {
            if let Some(segments) = url.path_segments() {
                for segment in segments {
                    let decoded = urlencoding::decode(segment)
                        .map(|s| s.into_owned())
                        .unwrap_or_else(|_| segment.to_string());
                    if let Some(found) = find_embedded(&decoded) {
                        return Some(found);
                    }
                }
            }
        }
        Err(e) => debug!("Input is not a URL ({}), trying bare identifier", e),
    }

    let trimmed = input.trim();
    if exact_pattern().is_match(trimmed) {
        return Some(trimmed.to_string());
    }

    None
}

/// Like [`extract_identifier`], but a miss is a validation error
pub fn require_identifier(input: &str) -> Result<String> {
    if input.trim().is_empty() {
        return Err(DomainError::Validation(
            "enter a BV identifier or a video link".to_string(),
        ));
    }

    extract_identifier(input).ok_or_else(|| {
        DomainError::Validation(format!("no BV identifier found in '{}'", input.trim()))
    })
}

/// True when `candidate` is exactly one canonical identifier
pub fn is_identifier(candidate: &str) -> bool {
    exact_pattern().is_match(candidate)
}
