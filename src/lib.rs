// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. render::RenderError)
    clippy::module_name_repetitions
)]

//! # Marktree
//!
//! Renders markdown into a typed tree of UI nodes.
//!
//! Marktree turns a markdown string into:
//! - Block nodes (headings, paragraphs, code, quotes, lists, tables)
//! - Inline nodes nested inside them
//! - Syntax-highlighted code markup
//!
//! ## Pipeline
//!
//! Source is lexed once into a token tree, then walked recursively:
//! - **Lex**: markdown to [`token::BlockToken`]s
//! - **Render**: block tokens to [`render::Block`]s, dispatching inline
//!   content to the inline renderer
//! - **Serialize**: nodes to HTML or JSON
//!
//! ## Modules
//!
//! - [`token`]: Token tree produced by the lexer
//! - [`lexer`]: Markdown lexing
//! - [`render`]: Token to node rendering
//! - [`highlight`]: Syntax highlighting
//! - [`escape`]: HTML text escaping
//! - [`html`]: HTML serialization of rendered nodes
//! - [`config`]: Saved CLI defaults
//! - [`perf`]: Timing scopes

pub mod config;
pub mod escape;
pub mod highlight;
pub mod html;
pub mod lexer;
pub mod perf;
pub mod render;
pub mod token;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::highlight::{Highlighter, PlainHighlighter, SyntectHighlighter};
    pub use crate::html::{to_html, to_html_fragment};
    pub use crate::lexer::{ComrakLexer, Lexer};
    pub use crate::render::{Block, Inline, MarkdownRenderer, RenderedDocument};
}
