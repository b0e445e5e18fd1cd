//! Generic tree representation
//!
//! A [`TreeNode`] is the schema-free intermediate form every value is encoded
//! into: a named element with ordered attributes, optional text content and
//! ordered children. Nodes own their children. Upward navigation goes through
//! [`NodeRef`], a borrowed cursor that remembers the ancestor chain.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Attribute carrying the registered type tag of an encoded object
pub const TYPE_ATTRIBUTE: &str = "xsi:type";

/// A named node with attributes, optional text and ordered children
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    name: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    attributes: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create an empty node
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create a leaf node holding text
    pub fn leaf(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name).with_text(text)
    }

    /// Set an attribute (builder style)
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Set the text content (builder style)
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Append a child (builder style)
    pub fn with_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Insert or replace an attribute. A replaced key keeps its position.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Remove an attribute, keeping the order of the rest
    pub fn remove_attribute(&mut self, key: &str) -> Option<String> {
        self.attributes.shift_remove(key)
    }

    /// The registered type tag, if this node encodes an object
    pub fn type_tag(&self) -> Option<&str> {
        self.attribute(TYPE_ATTRIBUTE)
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    /// First child with the given name
    pub fn child(&self, name: &str) -> Option<&TreeNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Append a child as the last one and return it
    pub fn add_child(&mut self, child: TreeNode) -> &mut TreeNode {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// No children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of nodes in this subtree, including self
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(TreeNode::subtree_len).sum::<usize>()
    }

    /// Cursor rooted at this node
    pub fn cursor(&self) -> NodeRef<'_> {
        NodeRef {
            node: self,
            ancestors: Vec::new(),
        }
    }
}

/// Borrowed view of a node that can navigate back to its parent
#[derive(Clone, Debug)]
pub struct NodeRef<'a> {
    node: &'a TreeNode,
    ancestors: Vec<&'a TreeNode>,
}

impl<'a> NodeRef<'a> {
    pub fn node(&self) -> &'a TreeNode {
        self.node
    }

    /// The enclosing node, `None` at the cursor root
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        let (parent, rest) = self.ancestors.split_last()?;
        Some(NodeRef {
            node: *parent,
            ancestors: rest.to_vec(),
        })
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + '_ {
        self.node.children.iter().map(move |child| {
            let mut ancestors = self.ancestors.clone();
            ancestors.push(self.node);
            NodeRef {
                node: child,
                ancestors,
            }
        })
    }

    /// First child with the given name
    pub fn child(&self, name: &str) -> Option<NodeRef<'a>> {
        self.children().find(|c| c.node.name == name)
    }

    /// Distance from the cursor root
    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }

    /// Slash separated names from the cursor root down to this node
    pub fn path(&self) -> String {
        let mut names: Vec<&str> = self.ancestors.iter().map(|n| n.name.as_str()).collect();
        names.push(&self.node.name);
        names.join("/")
    }
}
