//! Convert a subtree back to markup.
//!
//! Output is built from the tree alone, so text and comments come out
//! exactly as they were parsed and attribute quoting is normalized.

use crate::{ClosingMode, DomTree, ElementData, NodeId, NodeType};

impl DomTree {
    /// Serialize `id` and everything below it.
    ///
    /// The root serializes as the concatenation of its children. Unknown
    /// ids produce an empty string.
    #[must_use]
    pub fn to_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    /// Serialize only the children of `id`.
    #[must_use]
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_node(child, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else {
            return;
        };
        match &node.node_type {
            NodeType::Root => {
                for &child in &node.children {
                    self.write_node(child, out);
                }
            }
            NodeType::Text(data) | NodeType::Comment(data) => out.push_str(data),
            NodeType::Element(data) => {
                out.push('<');
                out.push_str(&data.tag_name);
                out.push_str(&attribute_string(data));
                if data.closing == ClosingMode::SelfClosing {
                    out.push_str(" />");
                    return;
                }
                out.push('>');
                for &child in &node.children {
                    self.write_node(child, out);
                }
                if data.closing == ClosingMode::Closed {
                    out.push_str("</");
                    out.push_str(&data.tag_name);
                    out.push('>');
                }
            }
        }
    }
}

/// The attributes of an element as they appear inside its start tag,
/// with a leading space (empty when there are none).
///
/// `id` comes first, then `class`, then the remaining attributes in
/// insertion order. Boolean attributes are written as bare keys.
///
/// ```
/// use bramble_dom::{AttributesMap, ClosingMode, ElementData};
/// use bramble_dom::serialize::attribute_string;
///
/// let mut attrs = AttributesMap::new();
/// let _ = attrs.insert("title".into(), Some("say \"hi\"".into()));
/// let _ = attrs.insert("class".into(), Some("a b".into()));
/// let _ = attrs.insert("hidden".into(), None);
/// let data = ElementData::from_attributes("p", ClosingMode::Closed, attrs);
///
/// assert_eq!(attribute_string(&data), r#" class="a b" title='say "hi"' hidden"#);
/// ```
#[must_use]
pub fn attribute_string(data: &ElementData) -> String {
    let mut parts: Vec<String> = Vec::new();
    if !data.ids.is_empty() {
        parts.push(quoted("id", &joined(data.ids.iter())));
    }
    if !data.classes.is_empty() {
        parts.push(quoted("class", &joined(data.classes.iter())));
    }
    for (key, value) in &data.attrs {
        match value {
            Some(value) => parts.push(quoted(key, value)),
            None => parts.push(key.clone()),
        }
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" {}", parts.join(" "))
    }
}

fn joined<'a>(tokens: impl Iterator<Item = &'a String>) -> String {
    tokens.map(String::as_str).collect::<Vec<_>>().join(" ")
}

/// `key="value"`, or `key='value'` when the value holds a double quote.
fn quoted(key: &str, value: &str) -> String {
    if value.contains('"') {
        format!("{key}='{value}'")
    } else {
        format!("{key}=\"{value}\"")
    }
}
