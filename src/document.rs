//! The document-side interface the matching engine consumes.
//!
//! Parsing raw markup is someone else's job: the engine only needs a tree of
//! elements exposing a tag name, an attribute map, the derived set of CSS
//! class tokens, and ordered children. [`TreeElement`] is the owned reference
//! implementation used by tests, examples, and the CLI fixtures.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// An element of an already-parsed HTML-like document tree.
///
/// The engine only ever reads through this interface; a document passed to a
/// matching call must not be mutated concurrently, but the engine itself
/// keeps no state between calls.
pub trait Element {
    fn tag_name(&self) -> &str;

    fn attribute(&self, name: &str) -> Option<&str>;

    /// The whitespace-split tokens of the `class` attribute.
    fn class_tokens(&self) -> &BTreeSet<String>;

    fn children(&self) -> &[Self]
    where
        Self: Sized;
}

/// Owned in-memory element tree, built fluently:
///
/// ```
/// use tmst::document::TreeElement;
///
/// let doc = TreeElement::new("html")
///     .child(TreeElement::new("img").attr("class", "a b"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeElement {
    tag: String,
    attributes: HashMap<String, String>,
    classes: BTreeSet<String>,
    children: Vec<TreeElement>,
}

impl TreeElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Sets an attribute; setting `class` re-derives the class token set.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        if name == "class" {
            self.classes = value.split_whitespace().map(str::to_string).collect();
        }
        self.attributes.insert(name, value);
        self
    }

    pub fn child(mut self, child: TreeElement) -> Self {
        self.children.push(child);
        self
    }
}

impl Element for TreeElement {
    fn tag_name(&self) -> &str {
        &self.tag
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn class_tokens(&self) -> &BTreeSet<String> {
        &self.classes
    }

    fn children(&self) -> &[Self] {
        &self.children
    }
}
