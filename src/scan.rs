//! Pairing text-dense regions of a page with the headings that introduce them.

use crate::node::{Element, NodeId, Page};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Minimum trimmed text length, in characters, for a region to count as dense.
pub const DEFAULT_THRESHOLD: usize = 100;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// A dense block of text and the heading found just before its container.
pub struct HeadingPair {
    /// Trimmed text of the heading element.
    pub heading: String,
    /// Trimmed text of the dense block.
    pub content: String,
}

#[must_use]
/// Scans below `root` with the default density threshold.
pub fn scan(page: &Page, root: NodeId) -> Vec<HeadingPair> {
    scan_with(page, root, DEFAULT_THRESHOLD)
}

#[must_use]
/// Finds rendered descendants of `root` holding at least `threshold` characters of text and
/// pairs each with the heading that precedes its parent, longest content first.
pub fn scan_with(page: &Page, root: NodeId, threshold: usize) -> Vec<HeadingPair> {
    let mut candidates: Vec<(NodeId, String)> = page
        .descendants(root)
        .into_iter()
        .filter(|&id| page.is_rendered(id))
        .map(|id| (id, page.inner_text(id)))
        .filter(|(_, text)| text.trim().chars().count() >= threshold)
        .collect();

    candidates.sort_by_key(|(_, text)| std::cmp::Reverse(text.chars().count()));

    let mut seen = HashSet::new();
    let mut pairs = Vec::new();

    for (candidate, text) in &candidates {
        if seen.contains(candidate) {
            continue;
        }
        let Some(heading) = page
            .parent(*candidate)
            .and_then(|parent| page.previous_element_sibling(parent))
            .filter(|&sibling| page.element(sibling).is_some_and(Element::is_heading))
        else {
            continue;
        };
        pairs.push(HeadingPair {
            heading: page.inner_text(heading).trim().to_string(),
            content: text.trim().to_string(),
        });
        seen.insert(*candidate);
    }

    debug!(
        candidates = candidates.len(),
        pairs = pairs.len(),
        "scanned for dense text"
    );
    pairs
}

#[cfg(test)]
#[path = "tests/scan.rs"]
mod tests;
