//! Two-tier markdown token tree.
//!
//! Block tokens describe document structure and inline tokens describe
//! character-level formatting. A container only ever holds children of its
//! own tier; the one place where either tier may appear is
//! [`TokenChildren`] on an unrecognized block token.

/// A structural document unit produced by a [`Lexer`](crate::lexer::Lexer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockToken {
    Heading {
        depth: u8,
        children: Vec<InlineToken>,
    },
    Paragraph {
        children: Vec<InlineToken>,
    },
    Code {
        text: String,
        lang: Option<String>,
    },
    BlockQuote {
        children: Vec<BlockToken>,
    },
    List(ListToken),
    HorizontalRule,
    Table(TableToken),
    /// Raw markup the lexer declared as trusted passthrough.
    Html {
        text: String,
    },
    Space,
    Other(OtherBlock),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListToken {
    pub ordered: bool,
    /// Declared start index. `None` for bullet lists.
    pub start: Option<u64>,
    pub tight: bool,
    pub items: Vec<ListItemToken>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListItemToken {
    pub children: Vec<BlockToken>,
    /// Flattened plain text of the whole item.
    pub text: String,
    /// Task state for GFM task items, `None` for ordinary items.
    pub checked: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableToken {
    pub header: Vec<TableCellToken>,
    pub rows: Vec<Vec<TableCellToken>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableCellToken {
    pub children: Vec<InlineToken>,
}

/// A block token whose kind has no dedicated variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherBlock {
    pub kind: String,
    pub text: Option<String>,
    pub children: Option<TokenChildren>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenChildren {
    Block(Vec<BlockToken>),
    Inline(Vec<InlineToken>),
}

/// Character-level formatting inside a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineToken {
    Text {
        text: String,
    },
    Strong {
        children: Vec<InlineToken>,
    },
    Emphasis {
        children: Vec<InlineToken>,
    },
    Code {
        text: String,
    },
    Link {
        href: String,
        title: Option<String>,
        children: Vec<InlineToken>,
    },
    Image {
        src: String,
        alt: String,
        title: Option<String>,
    },
    Break,
    Strikethrough {
        children: Vec<InlineToken>,
    },
    Escape {
        text: String,
    },
    Other(OtherInline),
}

/// An inline token whose kind has no dedicated variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherInline {
    pub kind: String,
    pub text: Option<String>,
}

impl InlineToken {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Flatten this token and its descendants into plain text.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        collect_text(vec![Frame::Inline(self)], &mut out);
        out
    }
}

impl BlockToken {
    pub fn paragraph(children: Vec<InlineToken>) -> Self {
        Self::Paragraph { children }
    }

    /// Flatten this token and its descendants into plain text.
    ///
    /// Sibling blocks are separated by a newline.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        collect_text(vec![Frame::Block(self)], &mut out);
        out
    }
}

enum Frame<'a> {
    Block(&'a BlockToken),
    Inline(&'a InlineToken),
    Str(&'a str),
}

// Explicit stack: this runs on subtrees that were too deep to render.
fn collect_text(mut stack: Vec<Frame<'_>>, out: &mut String) {
    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Str(s) => out.push_str(s),
            Frame::Inline(token) => match token {
                InlineToken::Text { text }
                | InlineToken::Code { text }
                | InlineToken::Escape { text } => out.push_str(text),
                InlineToken::Strong { children }
                | InlineToken::Emphasis { children }
                | InlineToken::Strikethrough { children }
                | InlineToken::Link { children, .. } => {
                    stack.extend(children.iter().rev().map(Frame::Inline));
                }
                InlineToken::Image { alt, .. } => out.push_str(alt),
                InlineToken::Break => out.push('\n'),
                InlineToken::Other(other) => {
                    if let Some(text) = &other.text {
                        out.push_str(text);
                    }
                }
            },
            Frame::Block(token) => match token {
                BlockToken::Heading { children, .. } | BlockToken::Paragraph { children } => {
                    stack.extend(children.iter().rev().map(Frame::Inline));
                }
                BlockToken::Code { text, .. } | BlockToken::Html { text } => out.push_str(text),
                BlockToken::BlockQuote { children } => push_blocks(&mut stack, children),
                BlockToken::List(list) => {
                    for (idx, item) in list.items.iter().enumerate().rev() {
                        if item.children.is_empty() {
                            stack.push(Frame::Str(&item.text));
                        } else {
                            push_blocks(&mut stack, &item.children);
                        }
                        if idx > 0 {
                            stack.push(Frame::Str("\n"));
                        }
                    }
                }
                BlockToken::Table(table) => {
                    let rows: Vec<&[TableCellToken]> = std::iter::once(table.header.as_slice())
                        .chain(table.rows.iter().map(Vec::as_slice))
                        .collect();
                    for (row_idx, row) in rows.into_iter().enumerate().rev() {
                        for (cell_idx, cell) in row.iter().enumerate().rev() {
                            stack.extend(cell.children.iter().rev().map(Frame::Inline));
                            if cell_idx > 0 {
                                stack.push(Frame::Str(" "));
                            }
                        }
                        if row_idx > 0 {
                            stack.push(Frame::Str("\n"));
                        }
                    }
                }
                BlockToken::HorizontalRule | BlockToken::Space => {}
                BlockToken::Other(other) => match (&other.children, &other.text) {
                    (Some(TokenChildren::Block(children)), _) => push_blocks(&mut stack, children),
                    (Some(TokenChildren::Inline(children)), _) => {
                        stack.extend(children.iter().rev().map(Frame::Inline));
                    }
                    (None, Some(text)) => out.push_str(text),
                    (None, None) => {}
                },
            },
        }
    }
}

fn push_blocks<'a>(stack: &mut Vec<Frame<'a>>, blocks: &'a [BlockToken]) {
    for (idx, block) in blocks.iter().enumerate().rev() {
        stack.push(Frame::Block(block));
        if idx > 0 {
            stack.push(Frame::Str("\n"));
        }
    }
}
