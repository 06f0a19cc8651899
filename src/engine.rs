//! Compiled matchers and the tree-walking capture engine.
//!
//! A [`Matcher`] is the runtime form of one tag pattern: filter predicates,
//! capture extractors, and nested child matchers. The engine is a pure
//! function of (matcher tree, document tree): it walks the document
//! breadth-first over a work queue and accumulates captures into a
//! [`CaptureMap`], or packages per-element [`CaptureRecord`]s. It raises no
//! errors; a missing attribute on a matched element becomes an absent entry.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::capture::{CaptureMap, CaptureRecord};
use crate::document::Element;

/// Cap on matcher-nesting recursion. Document depth is handled iteratively
/// by the work queue, so this only bounds how deep a template's own nesting
/// may reach before the engine stops descending.
const MAX_MATCH_DEPTH: usize = 64;

/// A predicate over one document element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    /// Tag name equality, case-sensitive.
    TagName(String),
    /// Every listed token is present in the element's class set.
    HasClasses(Vec<String>),
    /// The named attribute exists with exactly this value.
    AttributeEquals { name: String, value: String },
}

impl Filter {
    fn accepts<E: Element>(&self, element: &E) -> bool {
        match self {
            Filter::TagName(name) => element.tag_name() == name,
            Filter::HasClasses(tokens) => {
                tokens.iter().all(|t| element.class_tokens().contains(t))
            }
            Filter::AttributeEquals { name, value } => {
                element.attribute(name) == Some(value.as_str())
            }
        }
    }
}

/// Where an extractor fetches its value from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Fetch {
    /// The full literal `class` attribute string, never a filtered subset.
    ClassAttribute,
    /// The named attribute's value, absent when missing.
    Attribute(String),
}

/// One capture extractor: a key and the fetch it applies to matched elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extractor {
    pub key: String,
    pub fetch: Fetch,
}

impl Extractor {
    fn fetch<E: Element>(&self, element: &E) -> Option<String> {
        let name = match &self.fetch {
            Fetch::ClassAttribute => "class",
            Fetch::Attribute(name) => name.as_str(),
        };
        element.attribute(name).map(str::to_string)
    }
}

/// Which tree-walk policy [`Matcher::capture_with_policy`] applies.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TraversalPolicy {
    /// Every matching element anywhere in the subtree contributes; siblings
    /// matchers are all tested and descent continues past matches.
    #[default]
    MatchEverywhere,
    /// The first matcher to accept an element wins it, and the walk does not
    /// descend into a matched element at the same level again.
    FirstMatchPrunes,
}

/// Compiled runtime node for one tag pattern. Immutable once compiled and
/// freely shareable across concurrent matching calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Matcher {
    pub filters: Vec<Filter>,
    pub extractors: Vec<Extractor>,
    pub children: Vec<Matcher>,
}

impl Matcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A matcher contributing neither filters nor extractors.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.extractors.is_empty()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// True when every filter accepts the element (vacuously true with none).
    pub fn matches<E: Element>(&self, element: &E) -> bool {
        self.filters.iter().all(|f| f.accepts(element))
    }

    fn extract_into<E: Element>(&self, element: &E, out: &mut CaptureMap) {
        for extractor in &self.extractors {
            out.append(&extractor.key, extractor.fetch(element));
        }
    }

    /// Walks the document starting at `root`'s children and returns the
    /// accumulated captures, using [`TraversalPolicy::MatchEverywhere`].
    pub fn capture_from<E: Element>(&self, root: &E) -> CaptureMap {
        self.capture_with_policy(root, TraversalPolicy::default())
    }

    pub fn capture_with_policy<E: Element>(
        &self,
        root: &E,
        policy: TraversalPolicy,
    ) -> CaptureMap {
        let mut out = CaptureMap::new();
        self.dig(root, policy, &mut out, 0);
        out
    }

    /// Breadth-first walk of `scope`'s subtree, testing each element against
    /// this matcher's children and recursing into nested matcher levels.
    fn dig<E: Element>(
        &self,
        scope: &E,
        policy: TraversalPolicy,
        out: &mut CaptureMap,
        depth: usize,
    ) {
        if depth >= MAX_MATCH_DEPTH {
            return;
        }

        let mut queue: VecDeque<&E> = scope.children().iter().collect();
        while let Some(element) = queue.pop_front() {
            let mut matched = false;
            for matcher in &self.children {
                if matcher.matches(element) {
                    matched = true;
                    matcher.extract_into(element, out);
                    if matcher.has_children() {
                        matcher.dig(element, policy, out, depth + 1);
                    }
                    if policy == TraversalPolicy::FirstMatchPrunes {
                        break;
                    }
                }
            }

            let descend = match policy {
                TraversalPolicy::MatchEverywhere => true,
                TraversalPolicy::FirstMatchPrunes => !matched,
            };
            if descend {
                queue.extend(element.children().iter());
            }
        }
    }

    /// The structured output shape: one record per matched element, children
    /// keyed separately. Matching is first-match-per-branch, the only
    /// semantics this shape ever had.
    pub fn records_from<E: Element>(&self, root: &E) -> Vec<CaptureRecord> {
        self.collect_records(root, 0)
    }

    fn collect_records<E: Element>(&self, scope: &E, depth: usize) -> Vec<CaptureRecord> {
        if depth >= MAX_MATCH_DEPTH {
            return Vec::new();
        }

        let mut records = Vec::new();
        let mut queue: VecDeque<&E> = scope.children().iter().collect();
        while let Some(element) = queue.pop_front() {
            match self.children.iter().find(|m| m.matches(element)) {
                Some(matcher) => records.push(matcher.record_of(element, depth + 1)),
                None => queue.extend(element.children().iter()),
            }
        }
        records
    }

    fn record_of<E: Element>(&self, element: &E, depth: usize) -> CaptureRecord {
        CaptureRecord {
            fields: self
                .extractors
                .iter()
                .map(|ex| (ex.key.clone(), ex.fetch(element)))
                .collect(),
            children: if self.has_children() {
                self.collect_records(element, depth)
            } else {
                Vec::new()
            },
        }
    }
}
