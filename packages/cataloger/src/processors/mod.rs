//! Field processors: named, pure extraction functions mapping a description
//! subtree to catalog fields.
//!
//! The processor set is a closed enum rather than an open string-keyed table
//! of callables, so the set of valid extraction behaviors is checkable at
//! compile time. [`Processor::parse`] maps the textual spec used on the
//! command line (`name` or `name=tag-path`) to a variant.

mod authors;
mod outline;
mod text;

use std::io::BufRead;

use roxmltree::Node;

use crate::config::validate_tag_path;
use crate::error::{CatalogerError, Result};
use crate::record::FieldMap;
use crate::xml::{self, RootInfo};

/// Tag paths joined by the `catalog` composite, in precedence order.
const CATALOG_JOINED_PATHS: [&str; 3] = [
    "title-info/genre",
    "title-info/book-title",
    "title-info/lang",
];

/// A catalog field processor.
///
/// Each variant is a pure function from a description subtree (plus optional
/// tag-path parameter) to a flat field mapping. `NamespaceProbe` is the one
/// exception: it inspects the raw root element and never needs the
/// description subtree at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Processor {
    /// Root tag and declared namespace bindings; no description lookup.
    NamespaceProbe,
    /// One field per direct child of description, listing its own children.
    TagOutline,
    /// The whole description subtree re-serialized as one compact string.
    Flatten,
    /// Numbered fields for every descendant matching a tag path.
    TagText { path: String },
    /// All matches for a tag path joined into a single field.
    TagTextJoined { path: String },
    /// Author names and ids from title-info.
    Authors,
    /// The composite used for library scans: authors + joined title-info
    /// fields + the flattened subtree.
    Catalog,
}

impl Processor {
    /// Parse a textual processor spec.
    ///
    /// # Arguments
    /// * `spec` - `name` or `name=tag-path`, e.g. `catalog` or
    ///   `tag_text=genre`
    ///
    /// # Returns
    /// * `Err(CatalogerError::UnknownProcessor)` for an unregistered name
    /// * `Err(CatalogerError::MissingTagPath)` when a parameterized
    ///   processor is named without its tag path
    /// * `Err(CatalogerError::InvalidTagPath)` for a malformed tag path
    ///
    /// # Examples
    /// ```
    /// use homelib_cataloger::processors::Processor;
    ///
    /// assert_eq!(Processor::parse("catalog").unwrap(), Processor::Catalog);
    /// assert!(Processor::parse("tag_text=genre").is_ok());
    /// assert!(Processor::parse("bogus").is_err());
    /// ```
    pub fn parse(spec: &str) -> Result<Self> {
        let (name, param) = match spec.split_once('=') {
            Some((name, param)) => (name.trim(), Some(param.trim())),
            None => (spec.trim(), None),
        };

        match (name, param) {
            ("namespace_probe", None) => Ok(Self::NamespaceProbe),
            ("tag_outline", None) => Ok(Self::TagOutline),
            ("flatten_to_string", None) => Ok(Self::Flatten),
            ("authors", None) => Ok(Self::Authors),
            ("catalog", None) => Ok(Self::Catalog),
            ("tag_text", Some(path)) => {
                validate_tag_path(path)?;
                Ok(Self::TagText {
                    path: path.to_string(),
                })
            }
            ("tag_text_joined", Some(path)) => {
                validate_tag_path(path)?;
                Ok(Self::TagTextJoined {
                    path: path.to_string(),
                })
            }
            ("tag_text" | "tag_text_joined", None) => {
                Err(CatalogerError::MissingTagPath(name.to_string()))
            }
            _ => Err(CatalogerError::UnknownProcessor(spec.to_string())),
        }
    }

    /// Run this processor over one open document stream.
    ///
    /// `NamespaceProbe` reads only the root tag; every other variant scans
    /// for the description subtree and works on the stripped tree.
    pub fn extract<R: BufRead>(&self, input: R) -> Result<FieldMap> {
        match self {
            Self::NamespaceProbe => Ok(namespace_fields(&xml::probe_root(input)?)),
            _ => {
                let subtree = xml::extract_description(input)?;
                let doc = roxmltree::Document::parse(&subtree)?;
                Ok(self.extract_from_tree(doc.root_element()))
            }
        }
    }

    /// Run a tree-based processor over an already-parsed description element.
    fn extract_from_tree(&self, description: Node<'_, '_>) -> FieldMap {
        match self {
            // Routed through the stream path in `extract`.
            Self::NamespaceProbe => FieldMap::new(),
            Self::TagOutline => outline::tag_outline(description),
            Self::Flatten => outline::flatten_to_string(description),
            Self::TagText { path } => text::tag_text(description, path),
            Self::TagTextJoined { path } => text::tag_text_joined(description, path),
            Self::Authors => authors::authors(description),
            Self::Catalog => {
                // Union in precedence order; a later key overwrites an
                // earlier one if the sets ever collide.
                let mut fields = authors::authors(description);
                for path in CATALOG_JOINED_PATHS {
                    merge(&mut fields, text::tag_text_joined(description, path));
                }
                merge(&mut fields, outline::flatten_to_string(description));
                fields
            }
        }
    }
}

fn merge(into: &mut FieldMap, from: FieldMap) {
    for (name, value) in from {
        into.insert(name, value);
    }
}

/// Fields reported by the `namespace_probe` processor.
fn namespace_fields(root: &RootInfo) -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert("root_tag".to_string(), Some(root.tag.clone()));
    for (prefix, uri) in &root.namespaces {
        let name = if prefix.is_empty() {
            "ns_default".to_string()
        } else {
            format!("ns_{prefix}")
        };
        fields.insert(name, Some(uri.clone()));
    }
    fields
}
