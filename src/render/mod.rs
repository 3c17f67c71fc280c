//! Markdown to UI node rendering.
//!
//! This module handles:
//! - Lexing markdown once per render through a [`Lexer`]
//! - Walking block tokens, then the inline tokens inside them
//! - Highlighting code blocks through an injected [`Highlighter`]
//!
//! Every irregularity below the lexer is absorbed locally. Unknown tokens
//! fall back to their children or text, unknown languages render escaped,
//! and a failing highlighter only degrades its own block.

mod block;
mod inline;
mod node;


use thiserror::Error;

use crate::highlight::{Highlighter, SyntectHighlighter};
use crate::lexer::{ComrakLexer, LexError, Lexer};
use crate::token::BlockToken;

use block::BlockRenderer;

pub use node::{
    Band, Block, HeadingWeight, Inline, ItemContent, ListItem, RenderedDocument, TableCell,
    TableRow, TrustedHtml,
};

pub const DEFAULT_MAX_DEPTH: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("failed to lex markdown: {0}")]
    Lex(#[from] LexError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Containers nested deeper than this render as plain text.
    pub max_depth: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Renders markdown source into a [`RenderedDocument`].
///
/// # Example
///
/// ```
/// use marktree::highlight::PlainHighlighter;
/// use marktree::lexer::ComrakLexer;
/// use marktree::render::{Block, MarkdownRenderer};
///
/// let renderer = MarkdownRenderer::new(ComrakLexer::new(), PlainHighlighter);
/// let doc = renderer.render("# Hello\n\nWorld").unwrap();
/// assert_eq!(doc.blocks().len(), 2);
/// assert!(matches!(doc.blocks()[0], Block::Heading { depth: 1, .. }));
/// ```
#[derive(Debug, Clone)]
pub struct MarkdownRenderer<L, H> {
    lexer: L,
    highlighter: H,
    options: RenderOptions,
}

impl MarkdownRenderer<ComrakLexer, SyntectHighlighter> {
    /// comrak lexer with the bundled syntect grammars.
    pub fn with_defaults() -> Self {
        Self::new(ComrakLexer::new(), SyntectHighlighter::new())
    }
}

impl<L: Lexer, H: Highlighter> MarkdownRenderer<L, H> {
    pub fn new(lexer: L, highlighter: H) -> Self {
        Self {
            lexer,
            highlighter,
            options: RenderOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub const fn options(&self) -> RenderOptions {
        self.options
    }

    pub const fn lexer(&self) -> &L {
        &self.lexer
    }

    pub const fn highlighter(&self) -> &H {
        &self.highlighter
    }

    /// Lex `source` once and render the resulting token tree.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Lex`] when the lexer rejects the input. No
    /// other failure reaches the caller.
    pub fn render(&self, source: &str) -> Result<RenderedDocument, RenderError> {
        let tokens = self.lexer.lex(source)?;
        Ok(self.render_tokens(&tokens))
    }

    /// Render an already-lexed token tree.
    pub fn render_tokens(&self, tokens: &[BlockToken]) -> RenderedDocument {
        let _scope = crate::perf::scope("render.blocks");
        let blocks = BlockRenderer::new(&self.highlighter, self.options.max_depth).render(tokens);
        tracing::debug!(tokens = tokens.len(), blocks = blocks.len(), "rendered markdown");
        RenderedDocument::new(blocks)
    }
}
