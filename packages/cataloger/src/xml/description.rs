//! Streaming extraction of the `<description>` subtree from FB2 documents.
//!
//! FB2 files in the wild declare the FictionBook namespace in several ways
//! (default binding, prefixed binding, or none at all), so the extractor
//! matches elements by local name and re-emits the subtree with every tag
//! and attribute reduced to its local name and all namespace declarations
//! dropped. Scanning stops as soon as the closing `</description>` tag is
//! consumed; the document body, which can be orders of magnitude larger
//! than the metadata block, is never read.

use std::io::BufRead;

use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};

use crate::config::DESCRIPTION_TAG;
use crate::error::{CatalogerError, Result};

/// Root element information gathered without reading past the first tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootInfo {
    /// Qualified root tag name as written in the document.
    pub tag: String,
    /// Declared namespace bindings in document order. The unprefixed
    /// (default) binding is reported with an empty prefix.
    pub namespaces: Vec<(String, String)>,
}

/// Read the document's root element tag and namespace declarations.
///
/// Stops at the first start element; the rest of the document is not read.
///
/// # Arguments
/// * `input` - Open document stream
///
/// # Returns
/// * `Ok(RootInfo)` with the qualified tag and bindings
/// * `Err(CatalogerError::Xml)` on malformed XML or an element-free document
pub fn probe_root<R: BufRead>(input: R) -> Result<RootInfo> {
    let mut reader = Reader::from_reader(input);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) => {
                let tag = qualified_name(e.name());
                let mut namespaces = Vec::new();
                for attr in e.attributes() {
                    let attr = attr.map_err(|err| CatalogerError::Xml(err.to_string()))?;
                    if let Some(prefix) = namespace_prefix(&attr) {
                        let uri = attr
                            .unescape_value()
                            .map_err(|err| CatalogerError::Xml(err.to_string()))?
                            .into_owned();
                        namespaces.push((prefix, uri));
                    }
                }
                return Ok(RootInfo { tag, namespaces });
            }
            Event::Eof => {
                return Err(CatalogerError::Xml(
                    "document has no root element".to_string(),
                ))
            }
            _ => {}
        }
        buf.clear();
    }
}

/// Extract the first `<description>` subtree as namespace-free XML text.
///
/// The element is located by local name at any depth, first match in
/// document order. In the returned text every element and attribute name is
/// reduced to its local name, namespace declarations are dropped, and
/// attribute names colliding after stripping resolve last-writer-wins.
///
/// # Arguments
/// * `input` - Open document stream
///
/// # Returns
/// * `Ok(String)` - the stripped subtree, rooted at `<description>`
/// * `Err(CatalogerError::DescriptionNotFound)` if no such element exists
/// * `Err(CatalogerError::Xml)` on malformed XML
/// * `Err(CatalogerError::Io)` on stream failure
pub fn extract_description<R: BufRead>(input: R) -> Result<String> {
    let mut reader = Reader::from_reader(input);
    let mut writer = Writer::new(Vec::new());
    let mut buf = Vec::new();
    // None while scanning for the element, Some(depth) while copying it.
    let mut depth: Option<usize> = None;

    loop {
        let event = reader.read_event_into(&mut buf)?;
        match event {
            Event::Start(e) => {
                if depth.is_none() && is_description(e.name()) {
                    depth = Some(0);
                }
                if let Some(d) = depth.as_mut() {
                    writer.write_event(Event::Start(strip_element(&e)?))?;
                    *d += 1;
                }
            }
            Event::Empty(e) => {
                if depth.is_some() {
                    writer.write_event(Event::Empty(strip_element(&e)?))?;
                } else if is_description(e.name()) {
                    // <description/> with no content at all.
                    writer.write_event(Event::Empty(strip_element(&e)?))?;
                    return into_string(writer);
                }
            }
            Event::End(e) => {
                if let Some(d) = depth.as_mut() {
                    writer.write_event(Event::End(BytesEnd::new(local_name(e.name()))))?;
                    *d -= 1;
                    if *d == 0 {
                        return into_string(writer);
                    }
                }
            }
            Event::Text(e) => {
                if depth.is_some() {
                    writer.write_event(Event::Text(e))?;
                }
            }
            Event::CData(e) => {
                if depth.is_some() {
                    writer.write_event(Event::CData(e))?;
                }
            }
            Event::Eof => {
                if depth.is_some() {
                    return Err(CatalogerError::Xml(
                        "unexpected end of document inside <description>".to_string(),
                    ));
                }
                return Err(CatalogerError::DescriptionNotFound);
            }
            // Declarations, comments and processing instructions carry no
            // catalog data.
            _ => {}
        }
        buf.clear();
    }
}

/// Rebuild a start/empty tag with local names only and declarations dropped.
fn strip_element(e: &BytesStart<'_>) -> Result<BytesStart<'static>> {
    let mut out = BytesStart::new(local_name(e.name()));

    let mut attrs: Vec<(String, String)> = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| CatalogerError::Xml(err.to_string()))?;
        if namespace_prefix(&attr).is_some() {
            continue;
        }
        let name = local_name(attr.key);
        let value = attr
            .unescape_value()
            .map_err(|err| CatalogerError::Xml(err.to_string()))?
            .into_owned();
        // Stripped names can collide; the last writer wins, keeping the
        // first occurrence's position.
        if let Some(existing) = attrs.iter_mut().find(|(n, _)| *n == name) {
            existing.1 = value;
        } else {
            attrs.push((name, value));
        }
    }
    for (name, value) in &attrs {
        out.push_attribute((name.as_str(), value.as_str()));
    }

    Ok(out)
}

fn is_description(name: QName<'_>) -> bool {
    name.local_name().as_ref() == DESCRIPTION_TAG.as_bytes()
}

fn local_name(name: QName<'_>) -> String {
    String::from_utf8_lossy(name.local_name().as_ref()).into_owned()
}

fn qualified_name(name: QName<'_>) -> String {
    String::from_utf8_lossy(name.as_ref()).into_owned()
}

/// Namespace declaration prefix of an attribute, if it is one.
///
/// Returns `Some("")` for `xmlns="..."` and `Some(prefix)` for
/// `xmlns:prefix="..."`.
fn namespace_prefix(attr: &Attribute<'_>) -> Option<String> {
    let key = attr.key.as_ref();
    if key == b"xmlns" {
        Some(String::new())
    } else {
        key.strip_prefix(b"xmlns:")
            .map(|rest| String::from_utf8_lossy(rest).into_owned())
    }
}

fn into_string(writer: Writer<Vec<u8>>) -> Result<String> {
    String::from_utf8(writer.into_inner()).map_err(|e| CatalogerError::Xml(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PREFIXED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<fb:FictionBook xmlns:fb="http://www.gribuser.ru/xml/fictionbook/2.0" xmlns:l="http://www.w3.org/1999/xlink">
  <fb:description>
    <fb:title-info>
      <fb:genre>sf</fb:genre>
      <fb:book-title>Test &amp; Title</fb:book-title>
    </fb:title-info>
  </fb:description>
  <fb:body><fb:p>text</fb:p></fb:body>
</fb:FictionBook>"#;

    #[test]
    fn test_probe_root_prefixed() {
        let info = probe_root(PREFIXED.as_bytes()).unwrap();
        assert_eq!(info.tag, "fb:FictionBook");
        assert_eq!(
            info.namespaces,
            vec![
                (
                    "fb".to_string(),
                    "http://www.gribuser.ru/xml/fictionbook/2.0".to_string()
                ),
                ("l".to_string(), "http://www.w3.org/1999/xlink".to_string()),
            ]
        );
    }

    #[test]
    fn test_probe_root_default_namespace() {
        let xml = r#"<FictionBook xmlns="http://www.gribuser.ru/xml/fictionbook/2.0"/>"#;
        let info = probe_root(xml.as_bytes()).unwrap();
        assert_eq!(info.tag, "FictionBook");
        assert_eq!(info.namespaces[0].0, "");
    }

    #[test]
    fn test_probe_root_no_elements() {
        let err = probe_root("   ".as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogerError::Xml(_)));
    }

    #[test]
    fn test_extract_strips_prefixes_and_declarations() {
        let subtree = extract_description(PREFIXED.as_bytes()).unwrap();
        assert!(!subtree.contains("fb:"));
        assert!(!subtree.contains("xmlns"));
        assert!(subtree.starts_with("<description>"));
        assert!(subtree.contains("<book-title>Test &amp; Title</book-title>"));
    }

    #[test]
    fn test_extract_output_reparses_without_namespaces() {
        let subtree = extract_description(PREFIXED.as_bytes()).unwrap();
        let doc = roxmltree::Document::parse(&subtree).unwrap();
        for node in doc.descendants().filter(|n| n.is_element()) {
            assert!(node.tag_name().namespace().is_none());
        }
    }

    #[test]
    fn test_extract_stops_before_document_body() {
        // Garbage after </description> is never reached by the scanner.
        let xml = r#"<FictionBook xmlns="ns"><description><genre>sf</genre></description><<<garbage"#;
        let subtree = extract_description(xml.as_bytes()).unwrap();
        assert_eq!(subtree, "<description><genre>sf</genre></description>");
    }

    #[test]
    fn test_extract_first_description_in_document_order() {
        let xml = r#"<root><a><description><n>first</n></description></a><description><n>second</n></description></root>"#;
        let subtree = extract_description(xml.as_bytes()).unwrap();
        assert!(subtree.contains("first"));
        assert!(!subtree.contains("second"));
    }

    #[test]
    fn test_extract_missing_description() {
        let xml = r#"<FictionBook><body/></FictionBook>"#;
        let err = extract_description(xml.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogerError::DescriptionNotFound));
    }

    #[test]
    fn test_extract_malformed_xml() {
        let xml = r#"<FictionBook><description><genre></description>"#;
        let err = extract_description(xml.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogerError::Xml(_)));
    }

    #[test]
    fn test_extract_empty_description_element() {
        let xml = r#"<FictionBook><description/></FictionBook>"#;
        let subtree = extract_description(xml.as_bytes()).unwrap();
        assert_eq!(subtree, "<description/>");
    }

    #[test]
    fn test_attribute_prefix_stripped_last_writer_wins() {
        let xml = r#"<b xmlns:fb="ns"><description><p fb:id="one" id="two"/></description></b>"#;
        let subtree = extract_description(xml.as_bytes()).unwrap();
        assert_eq!(subtree, r#"<description><p id="two"/></description>"#);
    }
}
