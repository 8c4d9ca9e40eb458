//! Bramble CLI
//!
//! Parse an HTML file or string and print what the parser made of it.
//!
//! - `bramble page.html`                 # Print the tree and parse issues
//! - `bramble --html '<p>x' --tokens`    # Print the token stream
//! - `bramble page.html -s 'div > p'`    # Print the outer HTML of every match
//! - `bramble page.html --json`          # Dump the tree as JSON

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use serde::Serialize;

use bramble_common::warning::set_quiet;
use bramble_dom::{DomTree, NodeId, NodeType};
use bramble_html::{HTMLParser, HTMLTokenizer, ParseIssue, ParserOptions, print_tree};
use bramble_select::Select;

/// Bramble: forgiving HTML parsing and selector queries
#[derive(Parser, Debug)]
#[allow(clippy::struct_excessive_bools)]
#[command(name = "bramble")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the recovered tree
    bramble ./index.html

    # Parse inline HTML
    bramble --html '<div><p>x</b>y</div>'

    # Query with a selector, two levels deep at most
    bramble ./index.html --select 'ul > li' --depth 2

    # Tree statistics
    bramble ./index.html --info
"#)]
struct Cli {
    /// Path to an HTML file
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Parse this HTML string instead of a file
    #[arg(long, value_name = "HTML")]
    html: Option<String>,

    /// Print the outer HTML of every node matching SELECTOR
    #[arg(short, long, value_name = "SELECTOR")]
    select: Option<String>,

    /// Limit the selector search to this many levels below the root
    #[arg(long, value_name = "N", requires = "select")]
    depth: Option<usize>,

    /// Print the debug tree dump (the default output)
    #[arg(long)]
    tree: bool,

    /// Print the raw chunks from the segmentation pass
    #[arg(long)]
    chunks: bool,

    /// Print the token stream
    #[arg(long)]
    tokens: bool,

    /// Dump the tree as JSON
    #[arg(long)]
    json: bool,

    /// Print element, text and comment statistics
    #[arg(long)]
    info: bool,

    /// Print the serialized document
    #[arg(long)]
    serialize: bool,

    /// Trim whitespace around text and drop whitespace-only text
    #[arg(long)]
    trim_text: bool,

    /// Treat HTML void elements such as <br> as self-closing
    #[arg(long)]
    void_elements: bool,

    /// Fail on the first parse issue instead of recovering
    #[arg(long)]
    strict: bool,

    /// Do not print parser warnings to stderr
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn parser_options(&self) -> ParserOptions {
        ParserOptions {
            trim_text: self.trim_text,
            void_elements: self.void_elements,
            ..ParserOptions::default()
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    set_quiet(cli.quiet);

    let html = load_html(&cli)?;
    let options = cli.parser_options();
    let mut tokenizer = HTMLTokenizer::new(html).with_options(options.tokenizer_options());

    if cli.chunks {
        heading("Chunks");
        for (index, chunk) in tokenizer.split_chunks().iter().enumerate() {
            println!("{index:>4} {chunk:?}");
        }
        return Ok(());
    }

    tokenizer.run();
    if cli.tokens {
        heading("Tokens");
        for (index, token) in tokenizer.tokens().iter().enumerate() {
            println!("{index:>4} {token:?}");
        }
        return Ok(());
    }

    let parser = HTMLParser::new(tokenizer.into_tokens()).with_options(options);
    let (tree, issues) = if cli.strict {
        (parser.run_strict()?, Vec::new())
    } else {
        parser.run_with_issues()
    };

    if let Some(ref selector) = cli.select {
        let found = tree
            .select(tree.root(), selector, cli.depth)
            .with_context(|| format!("invalid selector {selector:?}"))?;
        heading(&format!("{} match(es) for {selector}", found.len()));
        for id in found {
            println!("{} {}", id.dimmed(), tree.to_html(id));
        }
        return Ok(());
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&JsonNode::from_tree(&tree, tree.root()))?;
        println!("{json}");
        return Ok(());
    }

    if cli.serialize {
        println!("{}", tree.to_html(tree.root()));
    }
    if cli.info {
        print_info(&tree);
    }
    if cli.tree || !(cli.serialize || cli.info) {
        heading("DOM Tree");
        print_tree(&tree, tree.root(), 0);
    }
    print_issues(&issues);
    Ok(())
}

fn load_html(cli: &Cli) -> Result<String> {
    if let Some(ref html) = cli.html {
        Ok(html.clone())
    } else if let Some(ref path) = cli.path {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    } else {
        anyhow::bail!("expected a file path or --html")
    }
}

fn heading(title: &str) {
    println!("{}", format!("=== {title} ===").bold());
}

fn print_issues(issues: &[ParseIssue]) {
    if issues.is_empty() {
        return;
    }
    println!();
    heading("Parse Issues");
    for issue in issues {
        println!("  - {} {issue}", format!("[{}]", issue.kind).yellow());
    }
}

fn print_info(tree: &DomTree) {
    let info = tree.info(tree.root());
    heading("Tree Info");
    println!("elements:      {}", info.elements);
    println!(
        "text nodes:    {} ({} bytes, {} trimmed)",
        info.text_nodes, info.text_length, info.text_trimmed_length
    );
    println!("comments:      {} ({} bytes)", info.comments, info.comment_length);

    if !info.tags.is_empty() {
        println!();
        heading("Tags");
        for (tag, count) in &info.tags {
            println!("  {:<12} {count}", tag.cyan());
        }
    }
}

// =============================================================================
// JSON dump
// =============================================================================

/// Serializable mirror of a subtree.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum JsonNode {
    Root {
        children: Vec<JsonNode>,
    },
    Element {
        id: usize,
        tag: String,
        closing: &'static str,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        ids: Vec<String>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        classes: Vec<String>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        attributes: Vec<JsonAttribute>,
        children: Vec<JsonNode>,
    },
    Text {
        id: usize,
        content: String,
    },
    Comment {
        id: usize,
        content: String,
    },
}

#[derive(Serialize)]
struct JsonAttribute {
    name: String,
    value: Option<String>,
}

impl JsonNode {
    fn from_tree(tree: &DomTree, id: NodeId) -> Self {
        let children = || {
            tree.children(id)
                .iter()
                .map(|&child| Self::from_tree(tree, child))
                .collect()
        };
        match tree.get(id).map(|node| &node.node_type) {
            Some(NodeType::Element(data)) => Self::Element {
                id: id.0,
                tag: data.tag_name.clone(),
                closing: data.closing.into(),
                ids: data.ids.iter().cloned().collect(),
                classes: data.classes.iter().cloned().collect(),
                attributes: data
                    .attrs
                    .iter()
                    .map(|(name, value)| JsonAttribute {
                        name: name.clone(),
                        value: value.clone(),
                    })
                    .collect(),
                children: children(),
            },
            Some(NodeType::Text(text)) => Self::Text {
                id: id.0,
                content: text.clone(),
            },
            Some(NodeType::Comment(comment)) => Self::Comment {
                id: id.0,
                content: comment.clone(),
            },
            Some(NodeType::Root) | None => Self::Root {
                children: children(),
            },
        }
    }
}
