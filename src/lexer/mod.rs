//! Markdown lexing with comrak.
//!
//! comrak parses into an arena AST; [`ComrakLexer`] converts that AST into
//! the crate's two-tier [`BlockToken`]/[`InlineToken`] tree. Node kinds
//! without a dedicated token become `Other` tokens so nothing is lost
//! before the renderer's fallback rules get to see it.

use comrak::nodes::{AstNode, ListType, NodeList, NodeValue};
use comrak::{Arena, Options, parse_document};
use thiserror::Error;

use crate::token::{
    BlockToken, InlineToken, ListItemToken, ListToken, OtherBlock, OtherInline, TableCellToken,
    TableToken, TokenChildren,
};

pub const DEFAULT_MAX_NESTING: usize = 128;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LexError {
    #[error("markdown input is {len} bytes, limit is {limit}")]
    InputTooLarge { len: usize, limit: usize },
    #[error("markdown nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize },
    #[error("markdown could not be tokenized: {0}")]
    Rejected(String),
}

/// Turns markdown text into an ordered sequence of block tokens.
pub trait Lexer {
    fn lex(&self, source: &str) -> Result<Vec<BlockToken>, LexError>;
}

impl<L: Lexer + ?Sized> Lexer for &L {
    fn lex(&self, source: &str) -> Result<Vec<BlockToken>, LexError> {
        (**self).lex(source)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexOptions {
    /// Front matter fence. Front matter is recognized and dropped.
    pub front_matter_delimiter: Option<String>,
    pub max_input_bytes: Option<usize>,
    pub max_nesting: usize,
}

impl Default for LexOptions {
    fn default() -> Self {
        Self {
            front_matter_delimiter: Some("---".to_string()),
            max_input_bytes: None,
            max_nesting: DEFAULT_MAX_NESTING,
        }
    }
}

/// GitHub-flavored markdown lexer.
#[derive(Debug, Clone, Default)]
pub struct ComrakLexer {
    options: LexOptions,
}

impl ComrakLexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn with_options(options: LexOptions) -> Self {
        Self { options }
    }

    pub const fn options(&self) -> &LexOptions {
        &self.options
    }
}

impl Lexer for ComrakLexer {
    fn lex(&self, source: &str) -> Result<Vec<BlockToken>, LexError> {
        if let Some(limit) = self.options.max_input_bytes {
            if source.len() > limit {
                return Err(LexError::InputTooLarge {
                    len: source.len(),
                    limit,
                });
            }
        }

        let _scope = crate::perf::scope("lexer.parse");
        let arena = Arena::new();
        let mut options = Options::default();

        // GFM extensions
        options.extension.strikethrough = true;
        options.extension.table = true;
        options.extension.autolink = true;
        options.extension.tasklist = true;
        options.extension.footnotes = true;
        options.extension.front_matter_delimiter = self.options.front_matter_delimiter.clone();

        // Keep backslash escapes as their own nodes.
        options.render.escaped_char_spans = true;

        let root = parse_document(&arena, source, &options);

        if exceeds_nesting(root, self.options.max_nesting) {
            return Err(LexError::NestingTooDeep {
                limit: self.options.max_nesting,
            });
        }

        let tokens = lex_blocks(root);
        tracing::debug!(blocks = tokens.len(), bytes = source.len(), "lexed markdown");
        Ok(tokens)
    }
}

fn exceeds_nesting<'a>(root: &'a AstNode<'a>, limit: usize) -> bool {
    let mut stack = vec![(root, 0usize)];
    while let Some((node, depth)) = stack.pop() {
        if depth > limit {
            return true;
        }
        stack.extend(node.children().map(|child| (child, depth + 1)));
    }
    false
}

fn lex_blocks<'a>(node: &'a AstNode<'a>) -> Vec<BlockToken> {
    node.children().map(lex_block).collect()
}

fn lex_block<'a>(node: &'a AstNode<'a>) -> BlockToken {
    match &node.data.borrow().value {
        NodeValue::Heading(heading) => BlockToken::Heading {
            depth: heading.level,
            children: lex_inlines(node),
        },
        NodeValue::Paragraph => BlockToken::Paragraph {
            children: lex_inlines(node),
        },
        NodeValue::CodeBlock(code_block) => BlockToken::Code {
            text: code_block.literal.clone(),
            lang: code_block
                .info
                .split_whitespace()
                .next()
                .map(ToString::to_string),
        },
        NodeValue::BlockQuote => BlockToken::BlockQuote {
            children: lex_blocks(node),
        },
        NodeValue::List(list) => BlockToken::List(lex_list(node, list)),
        NodeValue::ThematicBreak => BlockToken::HorizontalRule,
        NodeValue::Table(_) => BlockToken::Table(lex_table(node)),
        NodeValue::HtmlBlock(html) => BlockToken::Html {
            text: html.literal.clone(),
        },
        NodeValue::FrontMatter(_) => BlockToken::Space,
        other => BlockToken::Other(OtherBlock {
            kind: node_kind(other).to_string(),
            text: non_empty(extract_text(node)),
            children: lex_other_children(node),
        }),
    }
}

fn lex_other_children<'a>(node: &'a AstNode<'a>) -> Option<TokenChildren> {
    let first = node.first_child()?;
    let is_block = first.data.borrow().value.block();
    if is_block {
        Some(TokenChildren::Block(lex_blocks(node)))
    } else {
        Some(TokenChildren::Inline(lex_inlines(node)))
    }
}

fn lex_list<'a>(node: &'a AstNode<'a>, list: &NodeList) -> ListToken {
    let ordered = matches!(list.list_type, ListType::Ordered);
    ListToken {
        ordered,
        start: if ordered {
            u64::try_from(list.start).ok()
        } else {
            None
        },
        tight: list.tight,
        items: node.children().map(lex_list_item).collect(),
    }
}

fn lex_list_item<'a>(node: &'a AstNode<'a>) -> ListItemToken {
    let checked = match &node.data.borrow().value {
        NodeValue::TaskItem(symbol) => Some(symbol.is_some()),
        _ => None,
    };
    ListItemToken {
        children: lex_blocks(node),
        text: extract_text(node),
        checked,
    }
}

fn lex_table<'a>(table_node: &'a AstNode<'a>) -> TableToken {
    let mut table = TableToken::default();
    let mut saw_header = false;
    for row_node in table_node.children() {
        let is_header_row = match &row_node.data.borrow().value {
            NodeValue::TableRow(header) => *header,
            _ => continue,
        };

        let cells = row_node
            .children()
            .filter(|cell| matches!(cell.data.borrow().value, NodeValue::TableCell))
            .map(|cell| TableCellToken {
                children: lex_inlines(cell),
            })
            .collect();

        if is_header_row && !saw_header {
            table.header = cells;
            saw_header = true;
        } else {
            table.rows.push(cells);
        }
    }
    table
}

fn lex_inlines<'a>(node: &'a AstNode<'a>) -> Vec<InlineToken> {
    node.children().map(lex_inline).collect()
}

fn lex_inline<'a>(node: &'a AstNode<'a>) -> InlineToken {
    match &node.data.borrow().value {
        NodeValue::Text(text) => InlineToken::Text { text: text.clone() },
        NodeValue::SoftBreak => InlineToken::text("\n"),
        NodeValue::LineBreak => InlineToken::Break,
        NodeValue::Code(code) => InlineToken::Code {
            text: code.literal.clone(),
        },
        NodeValue::Emph => InlineToken::Emphasis {
            children: lex_inlines(node),
        },
        NodeValue::Strong => InlineToken::Strong {
            children: lex_inlines(node),
        },
        NodeValue::Strikethrough => InlineToken::Strikethrough {
            children: lex_inlines(node),
        },
        NodeValue::Link(link) => InlineToken::Link {
            href: link.url.clone(),
            title: non_empty(link.title.clone()),
            children: lex_inlines(node),
        },
        NodeValue::Image(image) => InlineToken::Image {
            src: image.url.clone(),
            alt: extract_text(node),
            title: non_empty(image.title.clone()),
        },
        NodeValue::Escaped => InlineToken::Escape {
            text: extract_text(node),
        },
        // Inline markup is never trusted; it is shown as text.
        NodeValue::HtmlInline(html) => InlineToken::Other(OtherInline {
            kind: "html_inline".to_string(),
            text: Some(html.clone()),
        }),
        NodeValue::FootnoteReference(reference) => InlineToken::Other(OtherInline {
            kind: "footnote_reference".to_string(),
            text: Some(format!("[^{}]", reference.name)),
        }),
        other => InlineToken::Other(OtherInline {
            kind: node_kind(other).to_string(),
            text: non_empty(extract_text(node)),
        }),
    }
}

/// Name recorded on `Other` tokens for node kinds without a dedicated token.
const fn node_kind(value: &NodeValue) -> &'static str {
    match value {
        NodeValue::FootnoteDefinition(_) => "footnote_definition",
        NodeValue::DescriptionList => "description_list",
        NodeValue::DescriptionItem(_) => "description_item",
        NodeValue::DescriptionTerm => "description_term",
        NodeValue::DescriptionDetails => "description_details",
        NodeValue::MultilineBlockQuote(_) => "multiline_block_quote",
        NodeValue::Math(_) => "math",
        NodeValue::WikiLink(_) => "wikilink",
        NodeValue::Superscript => "superscript",
        NodeValue::Subscript => "subscript",
        NodeValue::Underline => "underline",
        NodeValue::SpoileredText => "spoiler",
        NodeValue::EscapedTag(_) => "escaped_tag",
        NodeValue::Item(_) => "item",
        NodeValue::TaskItem(_) => "taskitem",
        NodeValue::TableRow(_) => "table_row",
        NodeValue::TableCell => "table_cell",
        _ => "unknown",
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}

fn extract_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    extract_text_recursive(node, &mut text);
    text
}

fn extract_text_recursive<'a>(node: &'a AstNode<'a>, text: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(t) => {
            text.push_str(t);
        }
        NodeValue::Code(c) => {
            text.push_str(&c.literal);
        }
        NodeValue::CodeBlock(c) => {
            text.push_str(&c.literal);
        }
        NodeValue::FootnoteReference(reference) => {
            text.push_str(&format!("[^{}]", reference.name));
        }
        NodeValue::SoftBreak | NodeValue::LineBreak => {
            text.push('\n');
        }
        NodeValue::HtmlInline(_) | NodeValue::HtmlBlock(_) | NodeValue::FrontMatter(_) => {}
        _ => {
            for child in node.children() {
                extract_text_recursive(child, text);
            }
        }
    }
}
