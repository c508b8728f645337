use std::fmt;
use std::fmt::Write as _;

use strum_macros::Display;

use bramble_common::warning::warn_once;
use bramble_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeType};

use crate::tokenizer::Token;

/// Name of the synthesized document root unless configured otherwise.
pub const DEFAULT_ROOT_TAG: &str = "root";

/// Tags that are appended as leaf children and never pushed on the stack of
/// open elements.
pub const SELF_CLOSING_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Tags that belong in the head. Seeing one while only the root is open opens
/// a head; seeing anything else while the head is open closes it.
pub const HEAD_TAGS: &[&str] = &[
    "base", "basefont", "bgsound", "noscript", "link", "meta", "title", "style", "script",
];

/// What kind of recovery the tree builder performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum IssueKind {
    /// A root, head or body element was created without a tag in the source.
    #[strum(serialize = "synthesized element")]
    SynthesizedElement,
    /// The head was closed because body content arrived.
    #[strum(serialize = "implicit close")]
    ImplicitClose,
    /// Content arrived at root level after the head or body was closed; the
    /// existing element was re-opened.
    #[strum(serialize = "reopened element")]
    Reopened,
    /// A closing tag arrived while only the root was open.
    #[strum(serialize = "ignored end tag")]
    IgnoredEndTag,
    /// A root tag arrived after the root already existed.
    #[strum(serialize = "ignored start tag")]
    IgnoredStartTag,
    /// A `<!...>` tag was skipped.
    #[strum(serialize = "ignored declaration")]
    IgnoredDeclaration,
    /// An element was still open at end of input.
    #[strum(serialize = "closed at end of input")]
    ClosedAtEndOfInput,
}

/// A recovery step taken while building the tree.
///
/// Issues are informational: the builder never fails, it records what it had
/// to synthesize or skip so callers can inspect how far the input was from
/// well-formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// Category of the recovery.
    pub kind: IssueKind,
    /// Human-readable detail (usually the tag involved).
    pub message: String,
    /// Index into the token stream where this happened.
    pub token_index: usize,
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at token {}: {}", self.kind, self.token_index, self.message)
    }
}

/// The token the implicit-structure rules are looking at.
#[derive(Debug, Clone, Copy)]
enum Incoming<'a> {
    Open(&'a str),
    Close(&'a str),
    Text,
}

/// Builds a [`DomTree`] from a token stream, synthesizing missing structure.
///
/// The builder keeps an explicit stack of unfinished elements. An element on
/// the stack knows its parent but is only added to the parent's children when
/// it is popped, either by a closing tag or at end of input. Self-closing tags
/// are attached immediately and never pushed.
pub struct HTMLParser {
    /// Stack of unfinished elements; index 0 is the root once it exists.
    stack_of_open_elements: Vec<NodeId>,

    /// Elements that were already attached when pushed (a re-opened head or
    /// body), so popping them must not attach them a second time.
    reopened: Vec<NodeId>,

    tree: DomTree,

    tokens: Vec<Token>,

    token_index: usize,

    root_tag: String,

    issues: Vec<ParseIssue>,
}

impl HTMLParser {
    /// Create a new parser from a token stream.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            stack_of_open_elements: Vec::new(),
            reopened: Vec::new(),
            tree: DomTree::new(),
            tokens,
            token_index: 0,
            root_tag: DEFAULT_ROOT_TAG.to_string(),
            issues: Vec::new(),
        }
    }

    /// Use `tag` as the name of the document root, e.g. `"html"` for
    /// conventional documents. An explicit `<tag>` in the source then opens
    /// the root instead of nesting inside the body.
    #[must_use]
    pub fn with_root_tag(mut self, tag: &str) -> Self {
        self.root_tag = tag.to_lowercase();
        self
    }

    /// Run the parser and return the tree.
    #[must_use]
    pub fn run(self) -> DomTree {
        self.run_with_issues().0
    }

    /// Run the parser and return both the tree and every recovery performed.
    #[must_use]
    pub fn run_with_issues(mut self) -> (DomTree, Vec<ParseIssue>) {
        let tokens = std::mem::take(&mut self.tokens);
        for (index, token) in tokens.iter().enumerate() {
            self.token_index = index;
            self.process_token(token);
        }
        // A stream without the end-of-file marker is still finished.
        if !tokens.last().is_some_and(Token::is_eof) {
            self.finish();
        }
        (self.tree, self.issues)
    }

    fn process_token(&mut self, token: &Token) {
        match token {
            Token::Text(text) => self.add_text(text),
            Token::StartTag { name, attributes } => self.add_start_tag(name, attributes),
            Token::EndTag { name } => self.add_end_tag(name),
            Token::Declaration(data) => {
                self.record(IssueKind::IgnoredDeclaration, format!("<{data}>"));
            }
            Token::EndOfFile => self.finish(),
        }
    }

    fn record(&mut self, kind: IssueKind, message: String) {
        self.issues.push(ParseIssue {
            kind,
            message,
            token_index: self.token_index,
        });
    }

    /// Record a recovery that indicates genuinely broken input and also
    /// report it through the warning system.
    fn parse_warning(&mut self, kind: IssueKind, message: String) {
        warn_once("HTML Parser", &format!("{kind}: {message}"));
        self.record(kind, message);
    }

    fn current_node(&self) -> Option<NodeId> {
        self.stack_of_open_elements.last().copied()
    }

    fn add_text(&mut self, text: &str) {
        self.implicit_tags(Incoming::Text);
        let Some(parent) = self.current_node() else {
            return;
        };
        let text_id = self.tree.alloc(NodeType::Text(text.to_string()));
        self.tree.append_child(parent, text_id);
    }

    fn add_start_tag(&mut self, name: &str, attributes: &AttributesMap) {
        // There is exactly one root.
        if name == self.root_tag && !self.stack_of_open_elements.is_empty() {
            self.parse_warning(IssueKind::IgnoredStartTag, format!("<{name}>"));
            return;
        }

        self.implicit_tags(Incoming::Open(name));

        if (name == "head" || name == "body")
            && self.open_tags_are_root()
            && self.open_existing_section(name, attributes)
        {
            return;
        }

        let element = ElementData::new(name, attributes.clone());
        match self.current_node() {
            Some(parent) if SELF_CLOSING_TAGS.contains(&name) => {
                let id = self.tree.alloc(NodeType::Element(element));
                self.tree.append_child(parent, id);
            }
            _ => {
                let _ = self.push_element(element);
            }
        }
    }

    fn add_end_tag(&mut self, name: &str) {
        self.implicit_tags(Incoming::Close(name));

        // The root is never closed by markup.
        if self.stack_of_open_elements.len() <= 1 {
            self.parse_warning(IssueKind::IgnoredEndTag, format!("</{name}>"));
            return;
        }
        self.pop_current();
    }

    /// Allocate an element, link it to the current node and make it current.
    fn push_element(&mut self, element: ElementData) -> NodeId {
        let id = self.tree.alloc(NodeType::Element(element));
        if let Some(parent) = self.current_node() {
            self.tree.link_parent(id, parent);
        }
        self.stack_of_open_elements.push(id);
        id
    }

    fn push_synthesized(&mut self, tag: &str) {
        let _ = self.push_element(ElementData::new(tag, AttributesMap::new()));
        self.record(IssueKind::SynthesizedElement, format!("<{tag}>"));
    }

    /// Pop the current node and attach it to the new current node.
    fn pop_current(&mut self) {
        let Some(node) = self.stack_of_open_elements.pop() else {
            return;
        };
        let Some(parent) = self.current_node() else {
            // Popping the root would leave the tree without one; put it back.
            self.stack_of_open_elements.push(node);
            return;
        };
        if let Some(position) = self.reopened.iter().position(|&id| id == node) {
            let _ = self.reopened.swap_remove(position);
            return;
        }
        self.tree.append_child(parent, node);
    }

    /// Handle an explicit `<head>` or `<body>` while only the root is open.
    ///
    /// An existing element of that name is re-opened, taking over attributes
    /// it does not have yet. A head arriving after the body is inserted in
    /// front of it. Returns `false` when the tag should be pushed as usual.
    fn open_existing_section(&mut self, name: &str, attributes: &AttributesMap) -> bool {
        let root = self.stack_of_open_elements[0];
        if let Some(existing) = self.tree.find_child_element(root, name) {
            if let Some(element) = self.tree.as_element_mut(existing) {
                for (attr, value) in attributes {
                    if element.get_attribute(attr).is_none() {
                        let _ = element.set_attribute(attr, value.clone());
                    }
                }
            }
            self.reopen(existing);
            return true;
        }
        if name == "head" && self.tree.find_child_element(root, "body").is_some() {
            self.insert_head(root, attributes.clone());
            return true;
        }
        false
    }

    /// Open a new head in front of a body that is already attached.
    fn insert_head(&mut self, root: NodeId, attributes: AttributesMap) {
        let head = self
            .tree
            .alloc(NodeType::Element(ElementData::new("head", attributes)));
        self.tree.insert_first(root, head);
        self.stack_of_open_elements.push(head);
        self.reopened.push(head);
        self.record(IssueKind::SynthesizedElement, "<head>".to_string());
    }

    /// Make an element that is already attached to the root current again.
    fn reopen(&mut self, id: NodeId) {
        self.stack_of_open_elements.push(id);
        self.reopened.push(id);
        let tag = self.tree.tag_name(id).unwrap_or_default().to_string();
        self.parse_warning(IssueKind::Reopened, format!("<{tag}>"));
    }

    fn open_tags_are_root(&self) -> bool {
        self.stack_of_open_elements.len() == 1
    }

    fn open_tags_are_root_head(&self) -> bool {
        self.stack_of_open_elements.len() == 2
            && self.tree.tag_name(self.stack_of_open_elements[1]) == Some("head")
    }

    /// Synthesize the structural tags the incoming token needs, repeating
    /// until no rule applies:
    ///
    /// 1. Nothing open and the token is not the root tag: open the root.
    /// 2. Only the root open and the token is not a head or body tag or the
    ///    root's closing tag: a head-only tag needs the head, anything else
    ///    needs the body. A head or body that was already closed is re-opened
    ///    rather than duplicated. Body content arriving before any head opens
    ///    an empty head first, which rule 3 closes again. Explicit head and
    ///    body tags are left to `open_existing_section`.
    /// 3. Root and head open and the token is neither `</head>` nor a
    ///    head-only tag: close the head.
    fn implicit_tags(&mut self, incoming: Incoming<'_>) {
        loop {
            if self.stack_of_open_elements.is_empty() {
                if matches!(incoming, Incoming::Open(tag) if tag == self.root_tag) {
                    break;
                }
                let root_tag = self.root_tag.clone();
                self.push_synthesized(&root_tag);
            } else if self.open_tags_are_root() {
                let head_only = match incoming {
                    Incoming::Open("head" | "body") => break,
                    Incoming::Close(tag) if tag == self.root_tag => break,
                    Incoming::Open(tag) => HEAD_TAGS.contains(&tag),
                    Incoming::Close(_) | Incoming::Text => false,
                };

                let root = self.stack_of_open_elements[0];
                let head = self.tree.find_child_element(root, "head");
                let body = self.tree.find_child_element(root, "body");
                match (head_only, head, body) {
                    (true, Some(head), _) => self.reopen(head),
                    (true, None, Some(_)) => self.insert_head(root, AttributesMap::new()),
                    (false, _, Some(body)) => self.reopen(body),
                    (_, None, None) => self.push_synthesized("head"),
                    (false, Some(_), None) => self.push_synthesized("body"),
                }
            } else if self.open_tags_are_root_head() {
                match incoming {
                    Incoming::Close("head") => break,
                    Incoming::Open(tag) if HEAD_TAGS.contains(&tag) => break,
                    _ => {
                        self.pop_current();
                        self.record(IssueKind::ImplicitClose, "</head>".to_string());
                    }
                }
            } else {
                break;
            }
        }
    }

    /// End of input: close everything that is still open and make sure the
    /// root holds a head and a body.
    fn finish(&mut self) {
        if self.stack_of_open_elements.is_empty() {
            let root_tag = self.root_tag.clone();
            self.push_synthesized(&root_tag);
        }

        while self.stack_of_open_elements.len() > 1 {
            if let Some(tag) = self
                .current_node()
                .and_then(|id| self.tree.tag_name(id))
                .map(str::to_string)
            {
                self.record(IssueKind::ClosedAtEndOfInput, format!("<{tag}>"));
            }
            self.pop_current();
        }

        let root = self.stack_of_open_elements[0];
        if self.tree.find_child_element(root, "head").is_none() {
            let head = self
                .tree
                .alloc(NodeType::Element(ElementData::new("head", AttributesMap::new())));
            self.tree.insert_first(root, head);
            self.record(IssueKind::SynthesizedElement, "<head>".to_string());
        }
        if self.tree.find_child_element(root, "body").is_none() {
            let body = self
                .tree
                .alloc(NodeType::Element(ElementData::new("body", AttributesMap::new())));
            self.tree.append_child(root, body);
            self.record(IssueKind::SynthesizedElement, "<body>".to_string());
        }
    }
}

/// Render the subtree at `id` as an indented outline, one node per line.
///
/// Elements print as `<tag attr="value">` with attributes sorted by name;
/// text prints quoted.
#[must_use]
pub fn format_tree(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    write_node(tree, id, 0, &mut out);
    out
}

fn write_node(tree: &DomTree, id: NodeId, indent: usize, out: &mut String) {
    let Some(node) = tree.get(id) else { return };
    let prefix = "  ".repeat(indent);
    match &node.node_type {
        NodeType::Element(data) => {
            let mut attrs: Vec<(&String, &String)> = data.attrs.iter().collect();
            attrs.sort();
            let _ = write!(out, "{prefix}<{}", data.tag_name);
            for (name, value) in attrs {
                if value.is_empty() {
                    let _ = write!(out, " {name}");
                } else {
                    let _ = write!(out, " {name}=\"{value}\"");
                }
            }
            out.push_str(">\n");
        }
        NodeType::Text(text) => {
            let _ = writeln!(out, "{prefix}{text:?}");
        }
    }
    for &child in tree.children(id) {
        write_node(tree, child, indent + 1, out);
    }
}

/// Print the subtree at `id` to stdout (see [`format_tree`]).
pub fn print_tree(tree: &DomTree, id: NodeId) {
    print!("{}", format_tree(tree, id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::HTMLTokenizer;

    fn parse_with_issues(markup: &str) -> (DomTree, Vec<ParseIssue>) {
        let mut tokenizer = HTMLTokenizer::new(markup);
        tokenizer.run();
        HTMLParser::new(tokenizer.into_tokens()).run_with_issues()
    }

    #[test]
    fn test_issue_display() {
        let issue = ParseIssue {
            kind: IssueKind::IgnoredEndTag,
            message: "</p>".to_string(),
            token_index: 3,
        };
        assert_eq!(issue.to_string(), "ignored end tag at token 3: </p>");
    }

    #[test]
    fn test_stray_end_tag_is_recorded() {
        let (_, issues) = parse_with_issues("</root>");
        assert!(issues.iter().any(|i| i.kind == IssueKind::IgnoredEndTag));
    }

    #[test]
    fn test_declaration_is_recorded() {
        let (_, issues) = parse_with_issues("<!doctype html><p>x</p>");
        assert_eq!(issues[0].kind, IssueKind::IgnoredDeclaration);
    }

    #[test]
    fn test_token_stream_without_eof_is_finished() {
        let tree = HTMLParser::new(vec![Token::Text("hi".to_string())]).run();
        let body = tree.find_child_element(NodeId::ROOT, "body").unwrap();
        assert_eq!(tree.text_content(body), "hi");
    }

    #[test]
    fn test_open_elements_attach_on_pop() {
        let mut tokenizer = HTMLTokenizer::new("<div><span>");
        tokenizer.run();
        let mut parser = HTMLParser::new(tokenizer.into_tokens());
        let tokens = std::mem::take(&mut parser.tokens);
        // Everything except the end-of-file marker.
        for token in &tokens[..tokens.len() - 1] {
            parser.process_token(token);
        }
        let span = parser.current_node().unwrap();
        let div = parser.tree.parent(span).unwrap();
        assert!(parser.tree.children(div).is_empty());

        parser.finish();
        assert_eq!(parser.tree.children(div), &[span]);
    }
}
