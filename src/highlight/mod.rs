//! Syntax highlighting for code blocks.
//!
//! The renderer only sees the [`Highlighter`] trait. [`SyntectHighlighter`]
//! owns the grammar table and is built once, then shared read-only across
//! renders (wrap it in an `Arc` to share it between renderers or threads).

use std::sync::Arc;

use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use thiserror::Error;

/// Label used when a code block declares no language.
pub const FALLBACK_LANGUAGE: &str = "plaintext";

/// Outcome of a highlight request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Highlight {
    /// Highlighted markup, safe to embed verbatim.
    Markup(String),
    /// The language has no grammar; the caller escapes the raw text itself.
    NotRecognized,
}

#[derive(Debug, Error)]
pub enum HighlightError {
    #[error("syntax highlighting failed: {0}")]
    Syntect(#[from] syntect::Error),
    #[error("highlighter unavailable: {0}")]
    Unavailable(String),
}

pub trait Highlighter {
    fn highlight(&self, code: &str, language: &str) -> Result<Highlight, HighlightError>;
}

impl<H: Highlighter + ?Sized> Highlighter for &H {
    fn highlight(&self, code: &str, language: &str) -> Result<Highlight, HighlightError> {
        (**self).highlight(code, language)
    }
}

impl<H: Highlighter + ?Sized> Highlighter for Arc<H> {
    fn highlight(&self, code: &str, language: &str) -> Result<Highlight, HighlightError> {
        (**self).highlight(code, language)
    }
}

/// Resolve the label shown on a code block.
pub fn language_label(lang: Option<&str>) -> String {
    lang.map(str::trim)
        .filter(|lang| !lang.is_empty())
        .unwrap_or(FALLBACK_LANGUAGE)
        .to_string()
}

/// Highlighter backed by syntect's Sublime Text grammars.
///
/// Emits `<span class="...">` markup with space-separated scope classes, so
/// colors come from the page stylesheet rather than a baked-in theme.
#[derive(Debug)]
pub struct SyntectHighlighter {
    syntax_set: SyntaxSet,
}

impl SyntectHighlighter {
    /// Load the bundled default grammars.
    pub fn new() -> Self {
        let _scope = crate::perf::scope("highlight.syntax_set.load_defaults");
        Self::with_syntax_set(SyntaxSet::load_defaults_newlines())
    }

    pub const fn with_syntax_set(syntax_set: SyntaxSet) -> Self {
        Self { syntax_set }
    }

    pub fn recognizes(&self, language: &str) -> bool {
        self.find_syntax(language).is_some()
    }

    fn find_syntax(&self, language: &str) -> Option<&SyntaxReference> {
        let language = language.trim();
        if language.is_empty() {
            return None;
        }
        self.syntax_set
            .find_syntax_by_token(language)
            .or_else(|| self.syntax_set.find_syntax_by_name(language))
    }
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, code: &str, language: &str) -> Result<Highlight, HighlightError> {
        let Some(syntax) = self.find_syntax(language) else {
            return Ok(Highlight::NotRecognized);
        };

        let mut generator = ClassedHTMLGenerator::new_with_class_style(
            syntax,
            &self.syntax_set,
            ClassStyle::Spaced,
        );
        for line in LinesWithEndings::from(code) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }
        Ok(Highlight::Markup(generator.finalize()))
    }
}

/// Highlighter that recognizes nothing, so every block renders escaped.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainHighlighter;

impl Highlighter for PlainHighlighter {
    fn highlight(&self, _code: &str, _language: &str) -> Result<Highlight, HighlightError> {
        Ok(Highlight::NotRecognized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;

    fn shared() -> &'static SyntectHighlighter {
        static HIGHLIGHTER: OnceLock<SyntectHighlighter> = OnceLock::new();
        HIGHLIGHTER.get_or_init(SyntectHighlighter::new)
    }

    #[test]
    fn test_highlight_rust_produces_classed_spans() {
        let code = "fn main() {\n    let x = 1;\n}\n";
        let Highlight::Markup(html) = shared().highlight(code, "rust").unwrap() else {
            panic!("rust should be recognized");
        };
        assert!(html.contains("<span class="), "expected classed spans: {html}");
        assert!(html.contains("main"));
    }

    #[test]
    fn test_highlight_javascript_is_recognized_by_lowercase_name() {
        let result = shared().highlight("const x = 1;", "javascript").unwrap();
        assert!(matches!(result, Highlight::Markup(_)));
    }

    #[test]
    fn test_highlight_lookup_by_extension_token() {
        assert!(shared().recognizes("rs"));
        assert!(shared().recognizes("py"));
    }

    #[test]
    fn test_highlight_unknown_language_is_not_recognized() {
        let result = shared().highlight("just text", "unknownlang123").unwrap();
        assert_eq!(result, Highlight::NotRecognized);
    }

    #[test]
    fn test_highlight_blank_language_is_not_recognized() {
        assert!(!shared().recognizes("   "));
    }

    #[test]
    fn test_highlight_escapes_markup_characters_in_code() {
        let Highlight::Markup(html) = shared().highlight("let a = \"<b>\";\n", "rust").unwrap()
        else {
            panic!("rust should be recognized");
        };
        assert!(!html.contains("<b>"), "raw tag leaked into markup: {html}");
        assert!(html.contains("&lt;b&gt;"));
    }

    #[test]
    fn test_plain_highlighter_recognizes_nothing() {
        let result = PlainHighlighter.highlight("fn main() {}", "rust").unwrap();
        assert_eq!(result, Highlight::NotRecognized);
    }

    #[test]
    fn test_shared_highlighter_through_arc() {
        let highlighter = Arc::new(PlainHighlighter);
        let result = highlighter.highlight("x", "rust").unwrap();
        assert_eq!(result, Highlight::NotRecognized);
    }

    #[test]
    fn test_language_label_falls_back_to_plaintext() {
        assert_eq!(language_label(None), "plaintext");
        assert_eq!(language_label(Some("")), "plaintext");
        assert_eq!(language_label(Some("  ")), "plaintext");
        assert_eq!(language_label(Some("rust")), "rust");
    }
}
