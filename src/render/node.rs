//! Rendered node tree handed to the presentation layer.

use serde::Serialize;

/// The single container returned by a render.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RenderedDocument {
    pub blocks: Vec<Block>,
}

impl RenderedDocument {
    pub const fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Heading {
        depth: u8,
        weight: HeadingWeight,
        children: Vec<Inline>,
    },
    Paragraph {
        children: Vec<Inline>,
    },
    CodeBlock {
        /// Effective language label shown on the block.
        language: String,
        /// Highlighter markup, or the escaped raw text when not highlighted.
        html: String,
        highlighted: bool,
    },
    BlockQuote {
        children: Vec<Block>,
    },
    List {
        ordered: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        start: Option<u64>,
        tight: bool,
        items: Vec<ListItem>,
    },
    Rule,
    Table {
        header: Vec<TableCell>,
        rows: Vec<TableRow>,
    },
    RawHtml {
        html: TrustedHtml,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Inline {
    Text {
        text: String,
    },
    Strong {
        children: Vec<Inline>,
    },
    Emphasis {
        children: Vec<Inline>,
    },
    Strikethrough {
        children: Vec<Inline>,
    },
    Code {
        text: String,
    },
    Link {
        href: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        children: Vec<Inline>,
    },
    Image {
        src: String,
        alt: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    LineBreak,
}

impl Inline {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    pub content: ItemContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemContent {
    Blocks { children: Vec<Block> },
    Text { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub band: Band,
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableCell {
    pub children: Vec<Inline>,
}

/// Alternating row shading, derived from the zero-based row index alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Even,
    Odd,
}

impl Band {
    pub const fn for_row(index: usize) -> Self {
        if index % 2 == 0 { Self::Even } else { Self::Odd }
    }

    pub const fn class(self) -> &'static str {
        match self {
            Self::Even => "band-even",
            Self::Odd => "band-odd",
        }
    }
}

/// Preset visual weight for a heading, larger for lower levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingWeight {
    Display,
    Title,
    Section,
    Subsection,
    Minor,
    Caption,
}

impl HeadingWeight {
    /// Depths outside 1..=6 get the smallest weight.
    pub const fn for_depth(depth: u8) -> Self {
        match depth {
            1 => Self::Display,
            2 => Self::Title,
            3 => Self::Section,
            4 => Self::Subsection,
            5 => Self::Minor,
            _ => Self::Caption,
        }
    }

    pub const fn class(self) -> &'static str {
        match self {
            Self::Display => "text-4xl font-bold",
            Self::Title => "text-3xl font-bold",
            Self::Section => "text-2xl font-semibold",
            Self::Subsection => "text-xl font-semibold",
            Self::Minor => "text-lg font-medium",
            Self::Caption => "text-base font-medium",
        }
    }
}

/// Markup that bypasses escaping.
///
/// Only [`trusted_markup`] constructs one, so that function is the single
/// place where unescaped content enters the rendered tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TrustedHtml(String);

impl TrustedHtml {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Wrap lexer-declared raw markup as a passthrough block.
///
/// The text is embedded verbatim and is never escaped downstream.
pub(crate) fn trusted_markup(text: &str) -> Block {
    Block::RawHtml {
        html: TrustedHtml(text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_alternates_by_row_index() {
        let bands: Vec<_> = (0..4).map(Band::for_row).collect();
        assert_eq!(bands, vec![Band::Even, Band::Odd, Band::Even, Band::Odd]);
    }

    #[test]
    fn test_heading_weights_are_distinct_per_level() {
        let classes: Vec<_> = (1..=6)
            .map(|depth| HeadingWeight::for_depth(depth).class())
            .collect();
        for (idx, class) in classes.iter().enumerate() {
            assert!(!classes[idx + 1..].contains(class), "duplicate class {class}");
        }
    }

    #[test]
    fn test_heading_weight_out_of_range_uses_smallest() {
        assert_eq!(HeadingWeight::for_depth(0), HeadingWeight::Caption);
        assert_eq!(HeadingWeight::for_depth(9), HeadingWeight::Caption);
    }

    #[test]
    fn test_serialized_link_omits_missing_title() {
        let link = Inline::Link {
            href: "https://example.com".to_string(),
            title: None,
            children: vec![Inline::text("x")],
        };
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(json["kind"], "link");
        assert!(json.get("title").is_none());
    }

    #[test]
    fn test_serialized_raw_html_is_plain_string() {
        let block = trusted_markup("<hr/>");
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["kind"], "raw_html");
        assert_eq!(json["html"], "<hr/>");
    }
}
