//! HTML escaping for text that must never be interpreted as markup.

/// Escape the five HTML-significant characters.
///
/// Replacements run in a fixed order with `&` first, so the entities
/// introduced by later steps are not escaped again. Escaping is not
/// idempotent: `&amp;` becomes `&amp;amp;`.
pub fn escape_html(unsafe_text: &str) -> String {
    unsafe_text
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}
