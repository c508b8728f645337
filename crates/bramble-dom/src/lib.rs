//! Document tree implementation for the Bramble engine.
//!
//! This crate provides an arena-based node tree holding the output of the
//! tag-soup tree builder and the per-node style maps written by the cascade.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships.
//! Children are owned by the arena and listed exactly once in their parent's
//! child list; the parent link is a plain index, so it never keeps a node alive
//! and cycles cannot be expressed through it.

use std::collections::HashMap;

/// Map of attribute names to values for an element.
pub type AttributesMap = HashMap<String, String>;

/// Map of property names to resolved values, written by the cascade.
pub type StyleMap = HashMap<String, String>;

/// A type-safe index into the tree.
///
/// `NodeId` provides O(1) access to any node in the tree without borrowing issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The document root is always at index 0; the tree builder allocates it first.
    pub const ROOT: Self = Self(0);
}

/// A node in the tree: its payload, its links, and its resolved style.
#[derive(Debug, Clone)]
pub struct Node {
    /// What kind of node this is.
    pub node_type: NodeType,

    /// Non-owning link to the parent. `None` only for the root (and for
    /// nodes allocated but never linked).
    pub parent: Option<NodeId>,

    /// Children in source order.
    pub children: Vec<NodeId>,

    /// Resolved style map. `None` until the first cascade pass, then replaced
    /// wholesale by every later pass.
    pub style: Option<StyleMap>,
}

/// The two node variants produced by the tree builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeType {
    /// A tag with attributes and children.
    Element(ElementData),
    /// A run of character data. Never has children.
    Text(String),
}

/// Element-specific data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// Lowercased tag name.
    pub tag_name: String,
    /// Lowercased attribute names mapped to their (quote-stripped) values.
    pub attrs: AttributesMap,
    /// Extracted class token: the `class` attribute prefixed with `.`, so it
    /// compares directly against a class selector's text.
    class: Option<String>,
}

impl ElementData {
    /// Create element data, extracting the class token from `attrs`.
    #[must_use]
    pub fn new(tag_name: impl Into<String>, attrs: AttributesMap) -> Self {
        let class = Self::extract_class(&attrs);
        Self {
            tag_name: tag_name.into(),
            attrs,
            class,
        }
    }

    fn extract_class(attrs: &AttributesMap) -> Option<String> {
        attrs.get("class").map(|class| format!(".{class}"))
    }

    /// The extracted class token (e.g. `.title` for `class="title"`).
    #[must_use]
    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    /// Returns the element's id attribute value if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id").map(String::as_str)
    }

    /// Look up an attribute by (lowercase) name.
    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Set an attribute, returning the previous value.
    ///
    /// The name is lowercased like every name the parser produces. Setting
    /// `class` re-extracts the class token.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) -> Option<String> {
        let name = name.to_lowercase();
        let refresh_class = name == "class";
        let previous = self.attrs.insert(name, value.into());
        if refresh_class {
            self.class = Self::extract_class(&self.attrs);
        }
        previous
    }

    /// Remove an attribute, returning its value if it was present.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let name = name.to_lowercase();
        let removed = self.attrs.remove(&name);
        if name == "class" {
            self.class = None;
        }
        removed
    }
}

/// Arena-based tree with O(1) node access and parent traversal.
///
/// This structure stores all nodes in a contiguous vector, using indices
/// for all relationships. The root is always at [`NodeId::ROOT`].
#[derive(Debug, Clone, Default)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create an empty tree. The first allocated node becomes the root.
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Get the root node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Get the number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree has no nodes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet linked to a parent.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
            style: None,
        });
        id
    }

    /// Record `parent` as the parent of `child` without listing `child`
    /// among the parent's children.
    ///
    /// The tree builder uses this for elements that are still open: they know
    /// their parent from the moment they are created but only join its child
    /// list once they are closed.
    pub fn link_parent(&mut self, child: NodeId, parent: NodeId) {
        if let Some(node) = self.nodes.get_mut(child.0) {
            node.parent = Some(parent);
        }
    }

    /// Append `child` as the last child of `parent`, updating its parent link.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Insert `child` as the first child of `parent`, updating its parent link.
    pub fn insert_first(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.insert(0, child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Whether `child` is listed among the children of `parent`.
    #[must_use]
    pub fn has_child(&self, parent: NodeId, child: NodeId) -> bool {
        self.children(parent).contains(&child)
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Iterate over all strict ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over `id` and everything below it, depth-first pre-order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        let stack = if self.get(id).is_some() { vec![id] } else { Vec::new() };
        DescendantIterator { tree: self, stack }
    }

    /// Iterate over every node reachable from the root in document order.
    #[must_use]
    pub fn iter_all(&self) -> DescendantIterator<'_> {
        self.descendants(NodeId::ROOT)
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            NodeType::Text(_) => None,
        })
    }

    /// Get mutable element data if this node is an element.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(|n| match &mut n.node_type {
            NodeType::Element(data) => Some(data),
            NodeType::Text(_) => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            NodeType::Element(_) => None,
        })
    }

    /// Tag name of an element node.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.as_element(id).map(|e| e.tag_name.as_str())
    }

    /// First direct child of `parent` that is an element named `tag`.
    #[must_use]
    pub fn find_child_element(&self, parent: NodeId, tag: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&id| self.tag_name(id) == Some(tag))
    }

    /// First element named `tag` in document order, searching from `from`.
    #[must_use]
    pub fn find_element(&self, from: NodeId, tag: &str) -> Option<NodeId> {
        self.descendants(from).find(|&id| self.tag_name(id) == Some(tag))
    }

    /// Concatenated text of every text node under `id`, in document order.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .filter_map(|node| self.as_text(node))
            .collect()
    }

    /// The resolved style map of a node, if a cascade pass has run.
    #[must_use]
    pub fn style(&self, id: NodeId) -> Option<&StyleMap> {
        self.get(id).and_then(|n| n.style.as_ref())
    }

    /// Replace the style map of a node.
    pub fn set_style(&mut self, id: NodeId, style: StyleMap) {
        if let Some(node) = self.get_mut(id) {
            node.style = Some(style);
        }
    }

    /// Set an attribute on an element node.
    ///
    /// Returns `false` (and changes nothing) if `id` is not an element.
    /// Styles are not recomputed; run the cascade again to observe the change.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> bool {
        self.as_element_mut(id).is_some_and(|element| {
            let _ = element.set_attribute(name, value);
            true
        })
    }

    /// Remove an attribute from an element node.
    ///
    /// Returns `false` if `id` is not an element.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> bool {
        self.as_element_mut(id).is_some_and(|element| {
            let _ = element.remove_attribute(name);
            true
        })
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Depth-first pre-order iterator over a subtree.
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
