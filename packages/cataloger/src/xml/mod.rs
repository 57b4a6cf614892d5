//! XML utilities for navigating description subtrees.
//!
//! All helpers match elements by local (namespace-free) tag name, so they
//! work unchanged on the stripped subtrees produced by [`description`].

pub mod description;

use roxmltree::Node;

pub use description::{extract_description, probe_root, RootInfo};

/// Get the tag name without namespace prefix.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use homelib_cataloger::xml::get_tag_name;
///
/// let xml = r#"<description><title-info/></description>"#;
/// let doc = Document::parse(xml).unwrap();
/// let child = doc.root_element().first_element_child().unwrap();
/// assert_eq!(get_tag_name(child), "title-info");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Find the first child element with the given tag name.
pub fn find_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && get_tag_name(*child) == tag)
}

/// Find all child elements with the given tag name.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use homelib_cataloger::xml::find_children;
///
/// let xml = r#"<root><item>1</item><item>2</item><other/></root>"#;
/// let doc = Document::parse(xml).unwrap();
///
/// let items: Vec<_> = find_children(doc.root_element(), "item").collect();
/// assert_eq!(items.len(), 2);
/// ```
pub fn find_children<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| child.is_element() && get_tag_name(*child) == tag)
}

/// Get all element children of a node.
pub fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}

/// Get the direct text content of a node, trimmed.
pub fn get_text(node: Node<'_, '_>) -> String {
    node.text()
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Concatenated descendant text of a node.
///
/// Individual text runs are trimmed, empty runs dropped, and the remainder
/// joined with single spaces — the flattened reading of a metadata element.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use homelib_cataloger::xml::gather_text;
///
/// let xml = "<book-title>  War <em>and</em>\n  Peace </book-title>";
/// let doc = Document::parse(xml).unwrap();
/// assert_eq!(gather_text(doc.root_element()), "War and Peace");
/// ```
pub fn gather_text(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Find all descendants matching a tag path, in document order.
///
/// The first path segment matches at any depth below `root` (the root itself
/// is excluded); each further segment descends through direct children only.
///
/// # Arguments
/// * `root` - Subtree to search (typically the description element)
/// * `path` - Slash-separated tag path (e.g. `genre` or `title-info/genre`)
pub fn find_path_matches<'a, 'input>(
    root: Node<'a, 'input>,
    path: &str,
) -> Vec<Node<'a, 'input>> {
    let mut segments = path.split('/');
    let Some(first) = segments.next() else {
        return Vec::new();
    };
    let rest: Vec<&str> = segments.collect();

    let mut matches = Vec::new();
    for node in root
        .descendants()
        .skip(1)
        .filter(|n| n.is_element() && get_tag_name(*n) == first)
    {
        descend(node, &rest, &mut matches);
    }
    matches
}

fn descend<'a, 'input>(node: Node<'a, 'input>, rest: &[&str], out: &mut Vec<Node<'a, 'input>>) {
    match rest.split_first() {
        None => out.push(node),
        Some((segment, tail)) => {
            for child in node
                .children()
                .filter(|c| c.is_element() && get_tag_name(*c) == *segment)
            {
                descend(child, tail, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    #[test]
    fn test_find_child() {
        let xml = r#"<root><a/><b/><c/></root>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();

        assert!(find_child(root, "a").is_some());
        assert!(find_child(root, "d").is_none());
    }

    #[test]
    fn test_get_text() {
        let xml = r#"<root>  trimmed text  </root>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(get_text(doc.root_element()), "trimmed text");
    }

    #[test]
    fn test_gather_text_joins_runs_with_single_spaces() {
        let xml = "<first-name>\n   Lev\n </first-name>";
        let doc = Document::parse(xml).unwrap();
        assert_eq!(gather_text(doc.root_element()), "Lev");
    }

    #[test]
    fn test_gather_text_empty_element() {
        let xml = "<first-name/>";
        let doc = Document::parse(xml).unwrap();
        assert_eq!(gather_text(doc.root_element()), "");
    }

    #[test]
    fn test_find_path_matches_single_segment_any_depth() {
        let xml = r#"<description>
            <title-info><genre>sf</genre></title-info>
            <src-title-info><genre>sf_space</genre></src-title-info>
        </description>"#;
        let doc = Document::parse(xml).unwrap();

        let matches = find_path_matches(doc.root_element(), "genre");
        assert_eq!(matches.len(), 2);
        assert_eq!(gather_text(matches[0]), "sf");
        assert_eq!(gather_text(matches[1]), "sf_space");
    }

    #[test]
    fn test_find_path_matches_path_descends_direct_children() {
        let xml = r#"<description>
            <title-info><genre>sf</genre></title-info>
            <src-title-info><genre>other</genre></src-title-info>
        </description>"#;
        let doc = Document::parse(xml).unwrap();

        let matches = find_path_matches(doc.root_element(), "title-info/genre");
        assert_eq!(matches.len(), 1);
        assert_eq!(gather_text(matches[0]), "sf");
    }

    #[test]
    fn test_find_path_matches_excludes_root_itself() {
        let xml = r#"<genre><genre>inner</genre></genre>"#;
        let doc = Document::parse(xml).unwrap();

        let matches = find_path_matches(doc.root_element(), "genre");
        assert_eq!(matches.len(), 1);
        assert_eq!(gather_text(matches[0]), "inner");
    }
}
