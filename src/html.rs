//! HTML output for a rendered document.
//!
//! Text and attribute values are escaped here. Code block markup and raw
//! HTML blocks are embedded as they are: the first is already escaped or
//! produced by the highlighter, the second is [`TrustedHtml`].
//!
//! [`TrustedHtml`]: crate::render::TrustedHtml

use crate::escape::escape_html;
use crate::render::{Block, Inline, ItemContent, ListItem, RenderedDocument, TableCell};

/// URL schemes allowed in link targets. Relative URLs are always allowed.
const LINK_SCHEMES: &[&str] = &["http", "https", "mailto", "xmpp", "irc", "ircs"];
/// URL schemes allowed in image sources.
const IMAGE_SCHEMES: &[&str] = &["http", "https"];

/// Serialize a document wrapped in `<div class="markdown-body">`.
pub fn to_html(doc: &RenderedDocument) -> String {
    let mut out = String::from("<div class=\"markdown-body\">\n");
    write_blocks(doc.blocks(), &mut out);
    out.push_str("</div>\n");
    out
}

/// Serialize a document without the wrapper element.
pub fn to_html_fragment(doc: &RenderedDocument) -> String {
    let mut out = String::new();
    write_blocks(doc.blocks(), &mut out);
    out
}

fn write_blocks(blocks: &[Block], out: &mut String) {
    for block in blocks {
        write_block(block, out);
    }
}

fn write_block(block: &Block, out: &mut String) {
    match block {
        Block::Heading {
            depth,
            weight,
            children,
        } => {
            if (1..=6).contains(depth) {
                out.push_str(&format!("<h{depth} class=\"{}\">", weight.class()));
                write_inlines(children, out);
                out.push_str(&format!("</h{depth}>\n"));
            } else {
                out.push_str(&format!(
                    "<div role=\"heading\" aria-level=\"{depth}\" class=\"{}\">",
                    weight.class()
                ));
                write_inlines(children, out);
                out.push_str("</div>\n");
            }
        }
        Block::Paragraph { children } => {
            out.push_str("<p>");
            write_inlines(children, out);
            out.push_str("</p>\n");
        }
        Block::CodeBlock { language, html, .. } => {
            let label = escape_html(language);
            out.push_str(&format!(
                "<div class=\"code-block\"><span class=\"code-lang\">{label}</span>\
                 <pre><code class=\"language-{label}\">{html}</code></pre></div>\n"
            ));
        }
        Block::BlockQuote { children } => {
            out.push_str("<blockquote>\n");
            write_blocks(children, out);
            out.push_str("</blockquote>\n");
        }
        Block::List {
            ordered,
            start,
            tight,
            items,
        } => {
            let tag = if *ordered { "ol" } else { "ul" };
            match start {
                Some(start) if *ordered && *start != 1 => {
                    out.push_str(&format!("<ol start=\"{start}\">\n"));
                }
                _ => out.push_str(&format!("<{tag}>\n")),
            }
            for item in items {
                write_list_item(item, *tight, out);
            }
            out.push_str(&format!("</{tag}>\n"));
        }
        Block::Rule => out.push_str("<hr />\n"),
        Block::Table { header, rows } => {
            out.push_str("<table>\n");
            if !header.is_empty() {
                out.push_str("<thead>\n<tr>");
                write_cells("th", header, out);
                out.push_str("</tr>\n</thead>\n");
            }
            if !rows.is_empty() {
                out.push_str("<tbody>\n");
                for row in rows {
                    out.push_str(&format!("<tr class=\"{}\">", row.band.class()));
                    write_cells("td", &row.cells, out);
                    out.push_str("</tr>\n");
                }
                out.push_str("</tbody>\n");
            }
            out.push_str("</table>\n");
        }
        Block::RawHtml { html } => {
            out.push_str(html.as_str());
            if !html.as_str().ends_with('\n') {
                out.push('\n');
            }
        }
    }
}

fn write_list_item(item: &ListItem, tight: bool, out: &mut String) {
    out.push_str("<li>");
    match item.checked {
        Some(true) => out.push_str("<input type=\"checkbox\" checked=\"\" disabled=\"\" /> "),
        Some(false) => out.push_str("<input type=\"checkbox\" disabled=\"\" /> "),
        None => {}
    }
    match &item.content {
        ItemContent::Text { text } => out.push_str(&escape_html(text)),
        ItemContent::Blocks { children } => {
            for (idx, child) in children.iter().enumerate() {
                match child {
                    // Tight lists show their paragraphs without <p>.
                    Block::Paragraph { children: spans } if tight => {
                        if idx > 0 && !out.ends_with('\n') {
                            out.push('\n');
                        }
                        write_inlines(spans, out);
                    }
                    _ => {
                        if !out.ends_with('\n') {
                            out.push('\n');
                        }
                        write_block(child, out);
                    }
                }
            }
        }
    }
    out.push_str("</li>\n");
}

fn write_cells(tag: &str, cells: &[TableCell], out: &mut String) {
    for cell in cells {
        out.push_str(&format!("<{tag}>"));
        write_inlines(&cell.children, out);
        out.push_str(&format!("</{tag}>"));
    }
}

fn write_inlines(spans: &[Inline], out: &mut String) {
    for span in spans {
        write_inline(span, out);
    }
}

fn write_inline(span: &Inline, out: &mut String) {
    match span {
        Inline::Text { text } => out.push_str(&escape_html(text)),
        Inline::Strong { children } => wrap_inlines("strong", children, out),
        Inline::Emphasis { children } => wrap_inlines("em", children, out),
        Inline::Strikethrough { children } => wrap_inlines("del", children, out),
        Inline::Code { text } => {
            out.push_str("<code>");
            out.push_str(&escape_html(text));
            out.push_str("</code>");
        }
        Inline::Link {
            href,
            title,
            children,
        } => {
            out.push_str("<a");
            if is_allowed_url(href, LINK_SCHEMES) {
                push_attr(out, "href", href);
            }
            if let Some(title) = title {
                push_attr(out, "title", title);
            }
            out.push('>');
            write_inlines(children, out);
            out.push_str("</a>");
        }
        Inline::Image { src, alt, title } => {
            out.push_str("<img");
            if is_allowed_url(src, IMAGE_SCHEMES) {
                push_attr(out, "src", src);
            }
            push_attr(out, "alt", alt);
            if let Some(title) = title {
                push_attr(out, "title", title);
            }
            out.push_str(" />");
        }
        Inline::LineBreak => out.push_str("<br />\n"),
    }
}

fn wrap_inlines(tag: &str, children: &[Inline], out: &mut String) {
    out.push_str(&format!("<{tag}>"));
    write_inlines(children, out);
    out.push_str(&format!("</{tag}>"));
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push_str(&format!(" {name}=\"{}\"", escape_html(value)));
}

/// Relative URLs pass; absolute URLs must use one of `schemes`.
fn is_allowed_url(url: &str, schemes: &[&str]) -> bool {
    let url = url.trim();
    let Some(colon) = url.find(':') else {
        return true;
    };
    let prefix = &url[..colon];
    if prefix.contains(['/', '?', '#']) {
        return true;
    }
    schemes
        .iter()
        .any(|scheme| prefix.eq_ignore_ascii_case(scheme))
}
