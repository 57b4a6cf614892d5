//! Structural processors: child-tag outlines and compact re-serialization.

use quick_xml::escape::{escape, partial_escape};
use roxmltree::Node;

use crate::record::FieldMap;
use crate::xml::{element_children, get_tag_name};

/// One field per direct child of description, in document order.
///
/// Each field is keyed by the child's tag name; its value is the
/// comma-joined, alphabetically sorted list of that child's own direct
/// children's tag names.
pub fn tag_outline(description: Node<'_, '_>) -> FieldMap {
    let mut fields = FieldMap::new();
    for child in element_children(description) {
        let mut inner: Vec<&str> = element_children(child).map(get_tag_name).collect();
        inner.sort_unstable();
        fields.insert(get_tag_name(child).to_string(), Some(inner.join(", ")));
    }
    fields
}

/// The whole description subtree re-serialized as one compact XML string,
/// under field `description`.
///
/// Whitespace-only text nodes are dropped; everything else round-trips,
/// with no namespace noise since the tree is already stripped.
pub fn flatten_to_string(description: Node<'_, '_>) -> FieldMap {
    let mut out = String::new();
    write_element(description, &mut out);

    let mut fields = FieldMap::new();
    fields.insert("description".to_string(), Some(out));
    fields
}

fn write_element(node: Node<'_, '_>, out: &mut String) {
    let tag = get_tag_name(node);
    out.push('<');
    out.push_str(tag);
    for attr in node.attributes() {
        out.push(' ');
        out.push_str(attr.name());
        out.push_str("=\"");
        out.push_str(&escape(attr.value()));
        out.push('"');
    }

    let has_content = node.children().any(|c| {
        c.is_element() || (c.is_text() && c.text().is_some_and(|t| !t.trim().is_empty()))
    });
    if !has_content {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in node.children() {
        if child.is_element() {
            write_element(child, out);
        } else if child.is_text() {
            if let Some(text) = child.text() {
                if !text.trim().is_empty() {
                    out.push_str(&partial_escape(text));
                }
            }
        }
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}
