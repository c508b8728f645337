//! Bramble CLI
//!
//! Prints the styled tree of a local markup file for testing and debugging.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bramble_document::{Document, LoadOptions};
use bramble_dom::{DomTree, NodeId, NodeType, StyleMap};
use bramble_html::DEFAULT_ROOT_TAG;
use clap::Parser;
use owo_colors::OwoColorize;
use serde::Serialize;

/// Bramble: tag-soup markup and stylesheets to a styled tree
#[derive(Parser, Debug)]
#[command(name = "bramble")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the styled tree
    bramble ./index.html

    # Add stylesheets the page links to
    bramble ./index.html --css ./main.css --css ./theme.css

    # Conventional <html> root, no built-in rules, JSON output
    bramble ./index.html --root-tag html --no-ua --json

    # Show the rules in cascade order with their specificities
    bramble ./index.html --rules
"#)]
struct Cli {
    /// Path to the markup file
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Stylesheet applied after the document's own <style> elements (repeatable)
    #[arg(long = "css", value_name = "FILE")]
    stylesheets: Vec<PathBuf>,

    /// Name of the synthesized document root
    #[arg(long, value_name = "NAME", default_value = DEFAULT_ROOT_TAG)]
    root_tag: String,

    /// Leave out the built-in user-agent stylesheet
    #[arg(long)]
    no_ua: bool,

    /// Print JSON instead of a coloured outline
    #[arg(long)]
    json: bool,

    /// Print the rule list instead of the tree
    #[arg(long)]
    rules: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let doc = load_doc(&cli)?;

    match (cli.rules, cli.json) {
        (true, true) => println!("{}", serde_json::to_string_pretty(doc.rules())?),
        (true, false) => print_rules(&doc),
        (false, true) => {
            let dump = NodeDump::new(doc.tree(), doc.tree().root());
            println!("{}", serde_json::to_string_pretty(&dump)?);
        }
        (false, false) => print_document(&doc),
    }

    Ok(())
}

/// Load the document and every extra stylesheet named on the command line.
fn load_doc(cli: &Cli) -> Result<Document> {
    let markup = fs::read_to_string(&cli.path)
        .with_context(|| format!("failed to read '{}'", cli.path.display()))?;

    let options = LoadOptions::default()
        .with_root_tag(cli.root_tag.as_str())
        .with_user_agent_stylesheet(!cli.no_ua);
    let mut doc = Document::parse_with(&markup, &options);

    for path in &cli.stylesheets {
        let css = fs::read_to_string(path)
            .with_context(|| format!("failed to read stylesheet '{}'", path.display()))?;
        doc.add_stylesheet(&css);
    }

    Ok(doc)
}

fn print_document(doc: &Document) {
    println!("{}", "=== Styled Tree ===".bold());
    print_styled_node(doc.tree(), doc.tree().root(), 0);

    println!("\n{}", "=== Stylesheet ===".bold());
    println!("{} rules", doc.rules().len());

    let linked = doc.linked_stylesheets();
    if !linked.is_empty() {
        println!("\n{}", "=== Linked Stylesheets (not fetched) ===".bold());
        for href in &linked {
            println!("  - {href}");
        }
    }

    let scripts = doc.script_sources();
    if !scripts.is_empty() {
        println!("\n{}", "=== Scripts (not fetched) ===".bold());
        for src in &scripts {
            println!("  - {src}");
        }
    }

    if !doc.issues().is_empty() || !doc.stylesheet_issues().is_empty() {
        println!("\n{}", "=== Parse Issues ===".bold());
        for issue in doc.issues() {
            println!("  - {issue}");
        }
        for issue in doc.stylesheet_issues() {
            println!("  - css: {issue}");
        }
    }
}

fn print_rules(doc: &Document) {
    for rule in doc.rules() {
        let declarations: String = rule
            .declarations
            .iter()
            .map(|(property, value)| format!(" {property}: {value};"))
            .collect();
        println!(
            "{:>4}  {} {{{} }}",
            rule.specificity().0.yellow(),
            rule.selector.cyan(),
            declarations
        );
    }
}

fn print_styled_node(tree: &DomTree, id: NodeId, depth: usize) {
    let Some(node) = tree.get(id) else { return };
    let indent = "  ".repeat(depth);

    let label = match &node.node_type {
        NodeType::Element(data) => {
            let attrs: BTreeMap<&String, &String> = data.attrs.iter().collect();
            let attrs: String = attrs
                .iter()
                .map(|(name, value)| format!(" {name}=\"{value}\""))
                .collect();
            format!("<{}{attrs}>", data.tag_name).cyan().to_string()
        }
        NodeType::Text(text) => format!("{text:?}").green().to_string(),
    };
    let style = node.style.as_ref().map(format_style).unwrap_or_default();
    println!("{indent}{label} {}", style.dimmed());

    for &child_id in tree.children(id) {
        print_styled_node(tree, child_id, depth + 1);
    }
}

fn format_style(style: &StyleMap) -> String {
    let sorted: BTreeMap<&String, &String> = style.iter().collect();
    let entries: Vec<String> = sorted
        .iter()
        .map(|(property, value)| format!("{property}: {value}"))
        .collect();
    format!("{{ {} }}", entries.join("; "))
}

/// JSON shape of a node and its subtree.
#[derive(Serialize)]
struct NodeDump<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<&'a str, &'a str>,
    style: BTreeMap<&'a str, &'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<NodeDump<'a>>,
}

impl<'a> NodeDump<'a> {
    fn new(tree: &'a DomTree, id: NodeId) -> Self {
        let element = tree.as_element(id);
        Self {
            tag: element.map(|e| e.tag_name.as_str()),
            text: tree.as_text(id),
            attributes: element
                .map(|e| {
                    e.attrs
                        .iter()
                        .map(|(k, v)| (k.as_str(), v.as_str()))
                        .collect()
                })
                .unwrap_or_default(),
            style: tree
                .style(id)
                .map(|s| s.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect())
                .unwrap_or_default(),
            children: tree
                .children(id)
                .iter()
                .map(|&child| Self::new(tree, child))
                .collect(),
        }
    }
}
