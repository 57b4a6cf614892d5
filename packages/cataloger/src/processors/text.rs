//! Text extraction processors over tag paths.

use roxmltree::Node;

use crate::record::FieldMap;
use crate::xml::{find_path_matches, gather_text};

/// Numbered fields for every descendant matching `path`, in document order.
///
/// Field names are `<path>1..N`. Zero matches still emit `<path>1` with a
/// null value, so the column exists whether or not the tag does.
pub fn tag_text(description: Node<'_, '_>, path: &str) -> FieldMap {
    let matches = find_path_matches(description, path);
    let mut fields = FieldMap::new();
    if matches.is_empty() {
        fields.insert(format!("{path}1"), None);
    } else {
        for (index, node) in matches.iter().enumerate() {
            fields.insert(format!("{path}{}", index + 1), Some(gather_text(*node)));
        }
    }
    fields
}

/// All matches for `path` joined with `"; "` into one field named `path`.
pub fn tag_text_joined(description: Node<'_, '_>, path: &str) -> FieldMap {
    let joined = find_path_matches(description, path)
        .iter()
        .map(|node| gather_text(*node))
        .collect::<Vec<_>>()
        .join("; ");

    let mut fields = FieldMap::new();
    fields.insert(path.to_string(), Some(joined));
    fields
}
