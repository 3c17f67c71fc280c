//! Block token rendering.

use crate::escape::escape_html;
use crate::highlight::{Highlight, Highlighter, language_label};
use crate::token::{BlockToken, ListToken, TableCellToken, TableToken, TokenChildren};

use super::inline::InlineRenderer;
use super::node::{
    Band, Block, HeadingWeight, Inline, ItemContent, ListItem, TableCell, TableRow,
    trusted_markup,
};

pub(crate) struct BlockRenderer<'r, H: ?Sized> {
    highlighter: &'r H,
    inline: InlineRenderer,
    max_depth: usize,
}

impl<'r, H: Highlighter + ?Sized> BlockRenderer<'r, H> {
    pub(crate) const fn new(highlighter: &'r H, max_depth: usize) -> Self {
        Self {
            highlighter,
            inline: InlineRenderer::new(max_depth),
            max_depth,
        }
    }

    pub(crate) fn render(&self, tokens: &[BlockToken]) -> Vec<Block> {
        self.render_blocks(tokens, 0)
    }

    fn render_blocks(&self, tokens: &[BlockToken], depth: usize) -> Vec<Block> {
        let mut blocks = Vec::with_capacity(tokens.len());
        self.render_into(tokens, depth, &mut blocks);
        blocks
    }

    fn render_into(&self, tokens: &[BlockToken], depth: usize, out: &mut Vec<Block>) {
        for token in tokens {
            self.render_block(token, depth, out);
        }
    }

    fn render_block(&self, token: &BlockToken, depth: usize, out: &mut Vec<Block>) {
        match token {
            BlockToken::Heading { depth: level, children } => out.push(Block::Heading {
                depth: *level,
                weight: HeadingWeight::for_depth(*level),
                children: self.inline.render(children),
            }),

            BlockToken::Paragraph { children } => out.push(Block::Paragraph {
                children: self.inline.render(children),
            }),

            BlockToken::Code { text, lang } => out.push(self.render_code(text, lang.as_deref())),

            BlockToken::BlockQuote { children } => {
                if self.too_deep(token, depth, out) {
                    return;
                }
                out.push(Block::BlockQuote {
                    children: self.render_blocks(children, depth + 1),
                });
            }

            BlockToken::List(list) => {
                if self.too_deep(token, depth, out) {
                    return;
                }
                out.push(self.render_list(list, depth));
            }

            BlockToken::HorizontalRule => out.push(Block::Rule),

            BlockToken::Table(table) => out.push(self.render_table(table)),

            BlockToken::Html { text } => out.push(trusted_markup(text)),

            BlockToken::Space => {}

            BlockToken::Other(other) => {
                tracing::trace!(kind = %other.kind, "unrecognized block token");
                match (&other.children, &other.text) {
                    (Some(TokenChildren::Block(children)), _) => {
                        if self.too_deep(token, depth, out) {
                            return;
                        }
                        self.render_into(children, depth + 1, out);
                    }
                    (Some(TokenChildren::Inline(children)), _) => out.push(Block::Paragraph {
                        children: self.inline.render(children),
                    }),
                    (None, Some(text)) => out.push(Block::Paragraph {
                        children: vec![Inline::text(text)],
                    }),
                    (None, None) => {}
                }
            }
        }
    }

    /// Degrade a container that would exceed the depth limit.
    fn too_deep(&self, token: &BlockToken, depth: usize, out: &mut Vec<Block>) -> bool {
        if depth < self.max_depth {
            return false;
        }
        tracing::warn!(
            max_depth = self.max_depth,
            "block nesting too deep, rendering as text"
        );
        out.push(Block::Paragraph {
            children: vec![Inline::text(token.plain_text())],
        });
        true
    }

    fn render_code(&self, text: &str, lang: Option<&str>) -> Block {
        let language = language_label(lang);
        let highlighted = match self.highlighter.highlight(text, &language) {
            Ok(Highlight::Markup(markup)) => Some(markup),
            Ok(Highlight::NotRecognized) => None,
            Err(err) => {
                tracing::warn!(%language, error = %err, "highlighting failed, showing plain text");
                None
            }
        };

        match highlighted {
            Some(html) => Block::CodeBlock {
                language,
                html,
                highlighted: true,
            },
            None => Block::CodeBlock {
                language,
                html: escape_html(text),
                highlighted: false,
            },
        }
    }

    fn render_list(&self, list: &ListToken, depth: usize) -> Block {
        let start = if list.ordered {
            Some(list.start.filter(|start| *start != 0).unwrap_or(1))
        } else {
            None
        };

        let items = list
            .items
            .iter()
            .map(|item| ListItem {
                checked: item.checked,
                content: if item.children.is_empty() {
                    ItemContent::Text {
                        text: item.text.clone(),
                    }
                } else {
                    ItemContent::Blocks {
                        children: self.render_blocks(&item.children, depth + 1),
                    }
                },
            })
            .collect();

        Block::List {
            ordered: list.ordered,
            start,
            tight: list.tight,
            items,
        }
    }

    fn render_table(&self, table: &TableToken) -> Block {
        let header = self.render_cells(&table.header);
        let rows = table
            .rows
            .iter()
            .enumerate()
            .map(|(index, cells)| TableRow {
                band: Band::for_row(index),
                cells: self.render_cells(cells),
            })
            .collect();
        Block::Table { header, rows }
    }

    fn render_cells(&self, cells: &[TableCellToken]) -> Vec<TableCell> {
        cells
            .iter()
            .map(|cell| TableCell {
                children: self.inline.render(&cell.children),
            })
            .collect()
    }
}
