use std::sync::{Arc, OnceLock};

use marktree::highlight::SyntectHighlighter;
use marktree::html::to_html;
use marktree::lexer::{ComrakLexer, LexError, LexOptions};
use marktree::render::{Block, Inline, MarkdownRenderer, RenderError};
use marktree::token::{BlockToken, InlineToken};

fn highlighter() -> Arc<SyntectHighlighter> {
    static HIGHLIGHTER: OnceLock<Arc<SyntectHighlighter>> = OnceLock::new();
    Arc::clone(HIGHLIGHTER.get_or_init(|| Arc::new(SyntectHighlighter::new())))
}

fn renderer() -> MarkdownRenderer<ComrakLexer, Arc<SyntectHighlighter>> {
    MarkdownRenderer::new(ComrakLexer::new(), highlighter())
}

#[test]
fn test_javascript_code_block_is_highlighted() {
    let doc = renderer()
        .render("```javascript\nconst x = 1;\n```\n")
        .unwrap();
    let [Block::CodeBlock { language, html, highlighted }] = doc.blocks() else {
        panic!("expected a single code block: {doc:?}");
    };
    assert_eq!(language, "javascript");
    assert!(*highlighted);
    assert!(html.contains("<span class="), "expected highlighter markup: {html}");
    assert_ne!(html, "const x = 1;\n");
}

#[test]
fn test_unknown_language_renders_raw_text_escaped() {
    let doc = renderer()
        .render("```unknownlang123\na < b\n```\n")
        .unwrap();
    let [Block::CodeBlock { language, html, highlighted }] = doc.blocks() else {
        panic!("expected a single code block: {doc:?}");
    };
    assert_eq!(language, "unknownlang123");
    assert!(!*highlighted);
    assert_eq!(html, "a &lt; b\n");
}

#[test]
fn test_document_renders_one_node_per_top_level_block() {
    let source = "# Title\n\nSome text.\n\n```unknownlang123\nplain\n```\n\n> quoted\n\n- item\n";
    let doc = renderer().render(source).unwrap();

    assert_eq!(doc.blocks().len(), 5);
    assert!(matches!(doc.blocks()[0], Block::Heading { depth: 1, .. }));
    assert!(matches!(doc.blocks()[1], Block::Paragraph { .. }));
    assert!(matches!(
        doc.blocks()[2],
        Block::CodeBlock { highlighted: false, .. }
    ));
    assert!(matches!(doc.blocks()[3], Block::BlockQuote { .. }));
    assert!(matches!(doc.blocks()[4], Block::List { ordered: false, .. }));
}

#[test]
fn test_front_matter_is_dropped() {
    let doc = renderer()
        .render("---\ntitle: Post\n---\n\n# Heading\n")
        .unwrap();
    assert_eq!(doc.blocks().len(), 1);
    assert!(matches!(doc.blocks()[0], Block::Heading { depth: 1, .. }));
}

#[test]
fn test_input_size_limit_rejects_large_documents() {
    let lexer = ComrakLexer::with_options(LexOptions {
        max_input_bytes: Some(8),
        ..LexOptions::default()
    });
    let renderer = MarkdownRenderer::new(lexer, highlighter());
    let err = renderer.render("this is longer than eight bytes").unwrap_err();
    assert_eq!(
        err,
        RenderError::Lex(LexError::InputTooLarge { len: 31, limit: 8 })
    );
}

#[test]
fn test_deep_token_tree_degrades_instead_of_overflowing() {
    let mut token = BlockToken::paragraph(vec![InlineToken::text("bottom")]);
    for _ in 0..5_000 {
        token = BlockToken::BlockQuote {
            children: vec![token],
        };
    }
    let doc = renderer().render_tokens(std::slice::from_ref(&token));

    let mut quotes = 0;
    let mut current = doc.blocks();
    while let [Block::BlockQuote { children }] = current {
        quotes += 1;
        current = children;
    }
    assert_eq!(quotes, marktree::render::DEFAULT_MAX_DEPTH);
    assert_eq!(
        current,
        [Block::Paragraph {
            children: vec![Inline::text("bottom")],
        }]
    );
}

#[test]
fn test_json_omits_missing_link_title() {
    let doc = renderer().render("[home](https://example.com)").unwrap();
    let json = serde_json::to_value(&doc).unwrap();
    let link = &json["blocks"][0]["children"][0];
    assert_eq!(link["kind"], "link");
    assert_eq!(link["href"], "https://example.com");
    assert!(link.get("title").is_none());
}

#[test]
fn test_shared_renderer_across_threads() {
    let renderer = Arc::new(renderer());
    let handles = (0..4)
        .map(|i| {
            let renderer = Arc::clone(&renderer);
            std::thread::spawn(move || {
                let doc = renderer.render(&format!("# Post {i}\n\n```rust\nfn f() {{}}\n```\n"));
                doc.unwrap()
            })
        })
        .collect::<Vec<_>>();

    for handle in handles {
        let doc = handle.join().unwrap();
        assert!(matches!(
            doc.blocks()[1],
            Block::CodeBlock { highlighted: true, .. }
        ));
    }
}

#[test]
fn test_blog_post_fixture_renders_to_html() {
    let source = include_str!("fixtures/post.md");
    let doc = renderer().render(source).unwrap();
    let html = to_html(&doc);

    assert!(html.starts_with("<div class=\"markdown-body\">"));
    assert!(!html.contains("title: \"Shipping"), "front matter leaked");
    assert!(html.contains("<h1 class="));
    assert!(html.contains("<span class=\"code-lang\">rust</span>"));
    assert!(html.contains("this stays escaped: &lt;b&gt;not bold&lt;/b&gt;"));
    assert!(html.contains("<div class=\"note\">Raw HTML passes through.</div>"));
    assert!(html.contains("<tr class=\"band-even\">"));
    assert!(html.contains("<tr class=\"band-odd\">"));
    assert!(html.contains("<del>old</del>"));
}
