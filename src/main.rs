//! Marktree - render markdown into UI nodes.
//!
//! # Usage
//!
//! ```bash
//! marktree README.md
//! marktree --format json README.md
//! cat README.md | marktree --fragment -
//! ```

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use marktree::config::{
    ConfigFlags, OutputFormat, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, save_config_flags,
};
use marktree::highlight::{Highlighter, PlainHighlighter, SyntectHighlighter};
use marktree::html::{to_html, to_html_fragment};
use marktree::lexer::ComrakLexer;
use marktree::perf;
use marktree::render::{DEFAULT_MAX_DEPTH, MarkdownRenderer, RenderOptions, RenderedDocument};

/// Render markdown into a tree of UI nodes
#[derive(Parser, Debug)]
#[command(name = "marktree", version, about, long_about = None)]
struct Cli {
    /// Markdown file to render ("-" reads stdin)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Omit the markdown-body wrapper around HTML output
    #[arg(long)]
    fragment: bool,

    /// Render code blocks escaped, without syntax highlighting
    #[arg(long)]
    no_highlight: bool,

    /// Containers nested deeper than this render as plain text
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Report timing scopes through the log
    #[arg(long)]
    perf: bool,

    /// Save current command-line flags as defaults. Saved switches such as
    /// --fragment or --no-highlight stay on until cleared with --clear
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

impl Cli {
    const fn flags(&self) -> ConfigFlags {
        ConfigFlags {
            format: self.format,
            fragment: self.fragment,
            no_highlight: self.no_highlight,
            max_depth: self.max_depth,
            perf: self.perf,
        }
    }
}

fn read_source(file: &Path) -> Result<String> {
    if file == Path::new("-") {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("Failed to read markdown from stdin")?;
        return Ok(source);
    }
    if !file.exists() {
        anyhow::bail!("File not found: {}", file.display());
    }
    std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))
}

fn serialize(doc: &RenderedDocument, flags: &ConfigFlags) -> Result<String> {
    match flags.format.unwrap_or(OutputFormat::Html) {
        OutputFormat::Html if flags.fragment => Ok(to_html_fragment(doc)),
        OutputFormat::Html => Ok(to_html(doc)),
        OutputFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(doc).context("Failed to serialize document")?;
            json.push('\n');
            Ok(json)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = cli.flags();

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    // Initialize logging after flags merge; --perf opens the perf target
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(perf::log_filter(effective.perf)?)
        .init();
    perf::set_enabled(effective.perf);

    let source = read_source(&cli.file)?;

    let highlighter: Arc<dyn Highlighter> = if effective.no_highlight {
        Arc::new(PlainHighlighter)
    } else {
        Arc::new(SyntectHighlighter::new())
    };
    let renderer = MarkdownRenderer::new(ComrakLexer::new(), highlighter).with_options(
        RenderOptions {
            max_depth: effective.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
        },
    );

    let doc = renderer
        .render(&source)
        .with_context(|| format!("Failed to render {}", cli.file.display()))?;
    let output = serialize(&doc, &effective)?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(output.as_bytes())
        .and_then(|()| stdout.flush())
        .context("Failed to write output")
}
