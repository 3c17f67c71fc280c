//! Inline token rendering.

use crate::token::InlineToken;

use super::node::Inline;

#[derive(Debug, Clone, Copy)]
pub(crate) struct InlineRenderer {
    max_depth: usize,
}

impl InlineRenderer {
    pub(crate) const fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Render a sequence of inline tokens, one output node per recognized token.
    pub(crate) fn render(&self, tokens: &[InlineToken]) -> Vec<Inline> {
        self.render_at(tokens, 0)
    }

    fn render_at(&self, tokens: &[InlineToken], depth: usize) -> Vec<Inline> {
        let mut spans = Vec::with_capacity(tokens.len());
        for token in tokens {
            if let Some(span) = self.render_token(token, depth) {
                spans.push(span);
            }
        }
        spans
    }

    fn render_token(&self, token: &InlineToken, depth: usize) -> Option<Inline> {
        match token {
            InlineToken::Text { text } | InlineToken::Escape { text } => Some(Inline::text(text)),
            InlineToken::Code { text } => Some(Inline::Code { text: text.clone() }),
            InlineToken::Strong { children } => Some(self.container(token, depth, children, |c| {
                Inline::Strong { children: c }
            })),
            InlineToken::Emphasis { children } => {
                Some(self.container(token, depth, children, |c| Inline::Emphasis {
                    children: c,
                }))
            }
            InlineToken::Strikethrough { children } => {
                Some(self.container(token, depth, children, |c| Inline::Strikethrough {
                    children: c,
                }))
            }
            InlineToken::Link {
                href,
                title,
                children,
            } => Some(self.container(token, depth, children, |c| Inline::Link {
                href: href.clone(),
                title: title.clone(),
                children: c,
            })),
            InlineToken::Image { src, alt, title } => Some(Inline::Image {
                src: src.clone(),
                alt: alt.clone(),
                title: title.clone(),
            }),
            InlineToken::Break => Some(Inline::LineBreak),
            InlineToken::Other(other) => {
                tracing::trace!(kind = %other.kind, "unrecognized inline token");
                other.text.as_ref().map(Inline::text)
            }
        }
    }

    fn container(
        &self,
        token: &InlineToken,
        depth: usize,
        children: &[InlineToken],
        wrap: impl FnOnce(Vec<Inline>) -> Inline,
    ) -> Inline {
        if depth >= self.max_depth {
            tracing::warn!(
                max_depth = self.max_depth,
                "inline nesting too deep, rendering as text"
            );
            return Inline::text(token.plain_text());
        }
        wrap(self.render_at(children, depth + 1))
    }
}
