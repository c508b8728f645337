//! Document pipeline for the Bramble engine.
//!
//! # Scope
//!
//! This crate ties the parsers and the cascade together:
//! - **Document loading**: markup to tree, `<style>` contents and the
//!   user-agent sheet to rules, rules to resolved style maps
//! - **External stylesheets**: callers fetch the sheets named by
//!   [`Document::linked_stylesheets`] and hand their text back through
//!   [`Document::add_stylesheet`]
//! - **Mutation**: attribute changes from script or input handling, followed
//!   by an explicit [`Document::restyle`]
//!
//! # Not Implemented
//!
//! - Fetching anything; this crate does no I/O
//! - Structural mutation (inserting or removing nodes)
//! - Incremental restyling; every restyle walks the whole tree

use bramble_common::url::resolve_url;
use bramble_css::{
    CSSParser, Rule, SyntaxError, extract_style_content, resolve, ua_stylesheet,
};
use bramble_dom::{DomTree, NodeId, StyleMap};
use bramble_html::{DEFAULT_ROOT_TAG, ParseIssue, parse_html_with_root};

/// Settings for building a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Name of the synthesized document root.
    pub root_tag: String,
    /// URL the markup was loaded from, used to resolve linked resources.
    pub base_url: Option<String>,
    /// Whether the built-in user-agent rules come before the author rules.
    pub user_agent_stylesheet: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            root_tag: DEFAULT_ROOT_TAG.to_string(),
            base_url: None,
            user_agent_stylesheet: true,
        }
    }
}

impl LoadOptions {
    /// Set the name of the synthesized document root.
    #[must_use]
    pub fn with_root_tag(mut self, root_tag: impl Into<String>) -> Self {
        self.root_tag = root_tag.into();
        self
    }

    /// Set the URL that linked resources are resolved against.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Enable or disable the user-agent stylesheet.
    #[must_use]
    pub const fn with_user_agent_stylesheet(mut self, enabled: bool) -> Self {
        self.user_agent_stylesheet = enabled;
        self
    }
}

/// A parsed document with its rules and resolved styles.
///
/// The tree is styled on construction and after every
/// [`add_stylesheet`](Self::add_stylesheet). Attribute changes made through
/// [`set_attribute`](Self::set_attribute) become visible in the style maps
/// only after [`restyle`](Self::restyle).
#[derive(Debug, Clone)]
pub struct Document {
    tree: DomTree,
    rules: Vec<Rule>,
    issues: Vec<ParseIssue>,
    stylesheet_issues: Vec<SyntaxError>,
    options: LoadOptions,
}

impl Document {
    /// Parse `markup` with the default options.
    #[must_use]
    pub fn parse(markup: &str) -> Self {
        Self::parse_with(markup, &LoadOptions::default())
    }

    /// Parse `markup`, collect the user-agent rules (if enabled) and the
    /// contents of every `<style>` element, and resolve styles.
    #[must_use]
    pub fn parse_with(markup: &str, options: &LoadOptions) -> Self {
        let (tree, issues) = parse_html_with_root(markup, &options.root_tag);

        let mut rules = if options.user_agent_stylesheet {
            ua_stylesheet().to_vec()
        } else {
            Vec::new()
        };
        let (author_rules, stylesheet_issues) =
            CSSParser::new(&extract_style_content(&tree)).parse_with_issues();
        rules.extend(author_rules);

        let mut document = Self {
            tree,
            rules,
            issues,
            stylesheet_issues,
            options: options.clone(),
        };
        document.restyle();
        document
    }

    /// Append the rules of an external stylesheet and restyle. Sheets added
    /// later win ties against everything added before them.
    pub fn add_stylesheet(&mut self, text: &str) {
        let (rules, issues) = CSSParser::new(text).parse_with_issues();
        self.rules.extend(rules);
        self.stylesheet_issues.extend(issues);
        self.restyle();
    }

    /// Resolved `href`s of every `<link rel=stylesheet>` element, in document
    /// order.
    #[must_use]
    pub fn linked_stylesheets(&self) -> Vec<String> {
        self.collect_urls("link", "href", |id| {
            self.tree
                .as_element(id)
                .and_then(|element| element.get_attribute("rel"))
                .is_some_and(|rel| rel.eq_ignore_ascii_case("stylesheet"))
        })
    }

    /// Resolved `src`s of every `<script>` element, in document order.
    #[must_use]
    pub fn script_sources(&self) -> Vec<String> {
        self.collect_urls("script", "src", |_| true)
    }

    fn collect_urls(
        &self,
        tag: &str,
        attribute: &str,
        filter: impl Fn(NodeId) -> bool,
    ) -> Vec<String> {
        let base_url = self.options.base_url.as_deref();
        self.tree
            .iter_all()
            .filter(|&id| self.tree.tag_name(id) == Some(tag) && filter(id))
            .filter_map(|id| self.tree.as_element(id)?.get_attribute(attribute))
            .map(|url| resolve_url(url, base_url))
            .collect()
    }

    /// Set an attribute on an element. Returns `false` if `id` is not an
    /// element. Styles are not updated until [`restyle`](Self::restyle).
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> bool {
        self.tree.set_attribute(id, name, value)
    }

    /// Remove an attribute from an element. Returns `false` if `id` is not
    /// an element. Styles are not updated until [`restyle`](Self::restyle).
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> bool {
        self.tree.remove_attribute(id, name)
    }

    /// Re-run the cascade over the whole tree.
    pub fn restyle(&mut self) {
        resolve(&mut self.tree, &self.rules);
    }

    /// The document tree.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Every rule in cascade input order: user-agent rules, `<style>`
    /// contents, then added stylesheets.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Recoveries the tree builder performed.
    #[must_use]
    pub fn issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// Syntax errors recovered from in author stylesheets.
    #[must_use]
    pub fn stylesheet_issues(&self) -> &[SyntaxError] {
        &self.stylesheet_issues
    }

    /// The options the document was built with.
    #[must_use]
    pub const fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// The resolved style map of a node.
    #[must_use]
    pub fn style(&self, id: NodeId) -> Option<&StyleMap> {
        self.tree.style(id)
    }

    /// The first element named `tag` in document order.
    #[must_use]
    pub fn find_element(&self, tag: &str) -> Option<NodeId> {
        self.tree.find_element(self.tree.root(), tag)
    }
}
