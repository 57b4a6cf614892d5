//! Author extraction from title-info blocks.

use roxmltree::Node;

use crate::record::FieldMap;
use crate::xml::{find_child, find_children, gather_text, get_tag_name};

/// Name part tags, in the order they are assembled into a full name.
const NAME_PARTS: [&str; 3] = ["first-name", "middle-name", "last-name"];

/// Extract author names and ids from `author` elements nested under the
/// `title-info` children of description.
///
/// Full names are assembled from first-name/middle-name/last-name (each
/// trimmed, missing parts omitted, joined by single spaces); an author whose
/// assembled name is empty is discarded. The `id` sub-elements are collected
/// independently, so an author without an id does not shift later ids.
///
/// Fields: `author` (names joined with `"; "`) and `id_author` (ids joined
/// with `"; "`).
pub fn authors(description: Node<'_, '_>) -> FieldMap {
    let mut names: Vec<String> = Vec::new();
    let mut ids: Vec<String> = Vec::new();

    for title_info in find_children(description, "title-info") {
        for author in title_info
            .descendants()
            .skip(1)
            .filter(|n| n.is_element() && get_tag_name(*n) == "author")
        {
            let name = assemble_name(author);
            if !name.is_empty() {
                names.push(name);
            }
            if let Some(id) = find_child(author, "id") {
                let id_text = gather_text(id);
                if !id_text.is_empty() {
                    ids.push(id_text);
                }
            }
        }
    }

    let mut fields = FieldMap::new();
    fields.insert("author".to_string(), Some(names.join("; ")));
    fields.insert("id_author".to_string(), Some(ids.join("; ")));
    fields
}

fn assemble_name(author: Node<'_, '_>) -> String {
    NAME_PARTS
        .iter()
        .filter_map(|part| find_child(author, part))
        .map(gather_text)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use roxmltree::Document;

    #[test]
    fn test_two_authors_second_without_id() {
        let xml = "<description><title-info>\
            <author>\
              <first-name>Arkady</first-name><last-name>Strugatsky</last-name>\
              <id>a1</id>\
            </author>\
            <author>\
              <first-name>Boris</first-name><last-name>Strugatsky</last-name>\
            </author>\
            </title-info></description>";
        let doc = Document::parse(xml).unwrap();
        let fields = authors(doc.root_element());

        assert_eq!(
            fields["author"],
            Some("Arkady Strugatsky; Boris Strugatsky".to_string())
        );
        // One id only; no empty placeholder for the second author.
        assert_eq!(fields["id_author"], Some("a1".to_string()));
    }

    #[test]
    fn test_name_parts_trimmed_and_missing_omitted() {
        let xml = "<description><title-info>\
            <author><first-name>  Lev </first-name><last-name>Tolstoy</last-name></author>\
            </title-info></description>";
        let doc = Document::parse(xml).unwrap();
        let fields = authors(doc.root_element());

        assert_eq!(fields["author"], Some("Lev Tolstoy".to_string()));
    }

    #[test]
    fn test_middle_name_in_assembly_order() {
        let xml = "<description><title-info>\
            <author>\
              <last-name>Tolstoy</last-name>\
              <first-name>Lev</first-name>\
              <middle-name>Nikolaevich</middle-name>\
            </author>\
            </title-info></description>";
        let doc = Document::parse(xml).unwrap();
        let fields = authors(doc.root_element());

        // Assembly order is fixed, not document order.
        assert_eq!(fields["author"], Some("Lev Nikolaevich Tolstoy".to_string()));
    }

    #[test]
    fn test_author_with_empty_name_discarded() {
        let xml = "<description><title-info>\
            <author><first-name>  </first-name><id>ghost</id></author>\
            <author><first-name>Real</first-name></author>\
            </title-info></description>";
        let doc = Document::parse(xml).unwrap();
        let fields = authors(doc.root_element());

        assert_eq!(fields["author"], Some("Real".to_string()));
        // The discarded author's id is still collected independently.
        assert_eq!(fields["id_author"], Some("ghost".to_string()));
    }

    #[test]
    fn test_no_title_info_yields_empty_joins() {
        let xml = "<description><document-info/></description>";
        let doc = Document::parse(xml).unwrap();
        let fields = authors(doc.root_element());

        assert_eq!(fields["author"], Some(String::new()));
        assert_eq!(fields["id_author"], Some(String::new()));
    }
}
