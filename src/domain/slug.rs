use once_cell::sync::Lazy;
use regex::Regex;

/// Everything that is not a letter, a digit, whitespace or a hyphen.
static NON_SLUG_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}\s-]+").expect("static slug pattern is valid"));

/// Derives a URL slug from a title.
///
/// The title is lower-cased, punctuation and symbols are dropped (not turned
/// into separators, so "Don't" becomes "dont"), accented letters are folded to
/// ASCII and runs of whitespace or hyphens collapse into a single hyphen.
/// Leading and trailing hyphens are trimmed. Returns an empty string when the
/// title has no alphanumeric content.
pub fn derive_slug(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = NON_SLUG_CHARS.replace_all(&lowered, "");
    slug::slugify(stripped)
}
