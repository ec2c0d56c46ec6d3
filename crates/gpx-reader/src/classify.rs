//! Child classification.
//!
//! One pass over an element's direct children, sorting each child into the
//! schema field it belongs to. Single tags take the first matching child and
//! ignore later ones; multi tags collect every match in document order.

use gpx_model::Element;

/// Whether a classified child fills a single or a repeated field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplicity {
    Single,
    Multi,
}

/// One child accepted by [`classify`].
#[derive(Debug, Clone, Copy)]
pub struct ChildMatch<'e, 't> {
    pub tag: &'t str,
    pub multiplicity: Multiplicity,
    pub element: &'e Element,
}

/// Result of [`classify`]: accepted children in scan order.
#[derive(Debug, Clone, Default)]
pub struct Classification<'e, 't> {
    matches: Vec<ChildMatch<'e, 't>>,
    visited: usize,
}

impl<'e, 't> Classification<'e, 't> {
    /// Accepted children, in the order the scan met them.
    pub fn matches(&self) -> &[ChildMatch<'e, 't>] {
        &self.matches
    }

    /// The child recorded for a single tag.
    pub fn single(&self, tag: &str) -> Option<&'e Element> {
        self.matches
            .iter()
            .find(|m| m.multiplicity == Multiplicity::Single && m.tag == tag)
            .map(|m| m.element)
    }

    /// Children recorded for a multi tag, in document order.
    pub fn multi<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'e Element> + 'a {
        self.matches
            .iter()
            .filter(move |m| m.multiplicity == Multiplicity::Multi && m.tag == tag)
            .map(|m| m.element)
    }

    /// Number of children the scan looked at before stopping.
    pub fn visited(&self) -> usize {
        self.visited
    }
}

/// Classify the direct children of `element` that live in `namespace`.
///
/// A tag listed in both slices is treated as multi.
pub fn classify<'e, 't>(
    element: &'e Element,
    namespace: &str,
    single_tags: &[&'t str],
    multi_tags: &[&'t str],
) -> Classification<'e, 't> {
    let mut pending: Vec<&'t str> = single_tags
        .iter()
        .copied()
        .filter(|tag| !multi_tags.contains(tag))
        .collect();
    let mut classification = Classification::default();

    for child in &element.children {
        if multi_tags.is_empty() && pending.is_empty() {
            break;
        }
        classification.visited += 1;

        if child.name.namespace.as_deref() != Some(namespace) {
            continue;
        }
        let local = child.name.local.as_str();

        if let Some(tag) = multi_tags.iter().copied().find(|tag| *tag == local) {
            classification.matches.push(ChildMatch {
                tag,
                multiplicity: Multiplicity::Multi,
                element: child,
            });
        } else if let Some(index) = pending.iter().position(|tag| *tag == local) {
            classification.matches.push(ChildMatch {
                tag: pending.swap_remove(index),
                multiplicity: Multiplicity::Single,
                element: child,
            });
        }
    }

    classification
}
