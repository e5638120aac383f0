use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use validator::ValidationError;

// ───── Constants ──────────────────────────────────────────────────────
pub const MAX_STRING_LENGTH: u64 = 255;
pub const MAX_TAG_LENGTH: usize = 50;

// ───── Validation Helpers ───────────────────────────────────────────

pub fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(msg));
    err
}

/// Each tag (or technology) must be at most 50 characters.
pub fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.iter().any(|tag| tag.chars().count() > MAX_TAG_LENGTH) {
        return Err(new_validation_error(
            "tag_too_long",
            "Each tag may not be greater than 50 characters.",
        ));
    }
    Ok(())
}

pub fn validate_http_url(url: &str) -> Result<(), ValidationError> {
    match url::Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.host().is_some() => Ok(()),
        Ok(_) => Err(new_validation_error("invalid_url_scheme", "The URL must start with http:// or https://.")),
        Err(_) => Err(new_validation_error("invalid_url", "The URL must be a valid URL.")),
    }
}

pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if !slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        return Err(new_validation_error("slug_invalid_chars", "The slug may only contain lowercase letters, digits, and hyphens."));
    }
    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(new_validation_error("slug_edge_hyphen", "The slug must not start or end with a hyphen."));
    }
    if slug.contains("--") {
        return Err(new_validation_error("slug_double_hyphen", "The slug must not contain consecutive hyphens."));
    }
    Ok(())
}

// ───── Input normalization ──────────────────────────────────────────

/// Trims a value and turns blank strings into `None`.
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trims every entry and drops blanks and duplicates, keeping first-seen order.
pub fn normalize_list(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let value = value.trim();
        if !value.is_empty() && !out.iter().any(|v| v == value) {
            out.push(value.to_string());
        }
    }
    out
}

/// Form checkboxes arrive as "1", "on", "true" or "yes".
pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "on" | "true" | "yes")
}

/// Accepts RFC 3339 timestamps as well as the naive formats browsers send
/// from `datetime-local` and `date` inputs (interpreted as UTC).
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

pub fn validate_datetime(value: &str) -> Result<(), ValidationError> {
    match parse_datetime(value) {
        Some(_) => Ok(()),
        None => Err(new_validation_error("invalid_datetime", "The publish date is not a valid date.")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn tags_at_fifty_chars_pass_and_fifty_one_fail() {
        assert!(validate_tags(&["a".repeat(50)]).is_ok());
        assert!(validate_tags(&["rust".into(), "a".repeat(51)]).is_err());
    }

    #[test]
    fn urls_must_be_http() {
        assert!(validate_http_url("https://github.com/example/portfolio").is_ok());
        assert!(validate_http_url("ftp://example.com").is_err());
        assert!(validate_http_url("not a url").is_err());
    }

    #[test]
    fn slug_format_rules() {
        assert!(validate_slug("hello-world-2").is_ok());
        assert!(validate_slug("Hello").is_err());
        assert!(validate_slug("-hello").is_err());
        assert!(validate_slug("hello--world").is_err());
    }

    #[test]
    fn list_normalization_trims_and_dedupes() {
        let tags = normalize_list(vec![" Rust ".into(), "".into(), "Rust".into(), "Web".into()]);
        assert_eq!(tags, vec!["Rust".to_string(), "Web".to_string()]);
    }

    #[test]
    fn flags_accept_checkbox_values() {
        assert!(parse_flag("on"));
        assert!(parse_flag("1"));
        assert!(parse_flag("TRUE"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn parses_browser_datetime_formats() {
        let local = parse_datetime("2025-03-04T10:30").unwrap();
        assert_eq!((local.month(), local.day(), local.hour(), local.minute()), (3, 4, 10, 30));

        let rfc = parse_datetime("2025-03-04T10:30:00+02:00").unwrap();
        assert_eq!(rfc.hour(), 8);

        let date = parse_datetime("2025-03-04").unwrap();
        assert_eq!(date.hour(), 0);

        assert!(parse_datetime("yesterday").is_none());
    }

    #[test]
    fn datetime_validator_rejects_garbage() {
        assert!(validate_datetime("2025-03-04 10:30:00").is_ok());
        assert!(validate_datetime("soon").is_err());
    }
}
