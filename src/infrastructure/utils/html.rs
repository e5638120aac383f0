use ammonia::Builder;
use once_cell::sync::Lazy;

static SANITIZER: Lazy<Builder<'static>> = Lazy::new(|| {
    let mut builder = Builder::default();
    builder
        .add_generic_attributes(&["class"])
        .link_rel(Some("noopener noreferrer"));
    builder
});

/// Strips scripts, event handlers and unsafe URLs from rich-text content.
pub fn sanitize_html(content: &str) -> String {
    SANITIZER.clean(content).to_string()
}
