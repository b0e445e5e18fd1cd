//! Whole-document rendering
//!
//! Trees are written as XML text for the game's import format and persisted
//! as JSON for reading back. Both operate on fully materialized trees.

use core::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::node::TreeNode;

/// Namespace bound to the `xsi` prefix on the root element
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// XML output options
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XmlOptions {
    /// Spaces per nesting level; `None` writes everything on one line
    pub indent: Option<usize>,
    /// Emit the `<?xml ...?>` declaration
    pub declaration: bool,
}

impl Default for XmlOptions {
    fn default() -> Self {
        Self {
            indent: Some(2),
            declaration: true,
        }
    }
}

/// Render a tree as XML text
pub fn to_xml_string(root: &TreeNode, options: &XmlOptions) -> String {
    let mut out = String::new();
    if options.declaration {
        out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>");
        newline(&mut out, options);
    }
    let declare_xsi = uses_xsi(root) && root.attribute("xmlns:xsi").is_none();
    write_element(&mut out, root, 0, options, declare_xsi);
    out
}

/// Persist a tree as JSON
pub fn to_json(root: &TreeNode) -> Result<String> {
    Ok(serde_json::to_string_pretty(root)?)
}

/// Load a tree persisted with [`to_json`]
pub fn from_json(text: &str) -> Result<TreeNode> {
    Ok(serde_json::from_str(text)?)
}

fn uses_xsi(node: &TreeNode) -> bool {
    node.attributes().keys().any(|k| k.starts_with("xsi:")) || node.children().iter().any(uses_xsi)
}

fn write_element(out: &mut String, node: &TreeNode, depth: usize, options: &XmlOptions, declare_xsi: bool) {
    pad(out, depth, options);
    out.push('<');
    out.push_str(node.name());
    if declare_xsi {
        let _ = write!(out, " xmlns:xsi=\"{XSI_NAMESPACE}\"");
    }
    for (key, value) in node.attributes() {
        let _ = write!(out, " {key}=\"{}\"", escape(value, true));
    }

    match (node.text(), node.is_leaf()) {
        (None, true) => out.push_str(" />"),
        (Some(text), true) => {
            let _ = write!(out, ">{}</{}>", escape(text, false), node.name());
        }
        (text, false) => {
            out.push('>');
            if let Some(text) = text {
                out.push_str(&escape(text, false));
            }
            for child in node.children() {
                newline(out, options);
                write_element(out, child, depth + 1, options, false);
            }
            newline(out, options);
            pad(out, depth, options);
            let _ = write!(out, "</{}>", node.name());
        }
    }
}

fn pad(out: &mut String, depth: usize, options: &XmlOptions) {
    if let Some(width) = options.indent {
        out.extend(std::iter::repeat(' ').take(width * depth));
    }
}

fn newline(out: &mut String, options: &XmlOptions) {
    if options.indent.is_some() {
        out.push('\n');
    }
}

fn escape(text: &str, attribute: bool) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' if attribute => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
