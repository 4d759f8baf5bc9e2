//! Finding a sensible starting branch from a clicked node.
//!
//! A click usually lands on a leaf deep inside a repeating structure. Walking upwards while the
//! parent is at least as wide as the current node climbs out of that uniform region and stops at
//! the first container that narrows, which is a better default extraction unit than the leaf.

use crate::node::{NodeId, Page};
use tracing::debug;

#[must_use]
/// Climbs from `start` until the parent has fewer element children than the current node, or
/// there is no parent.
pub fn locate(page: &Page, start: NodeId) -> NodeId {
    let mut current = start;
    while let Some(parent) = page.parent(current) {
        if page.child_count(parent) < page.child_count(current) {
            break;
        }
        current = parent;
    }
    debug!(
        start = %page.describe(start),
        branch = %page.describe(current),
        "located branch"
    );
    current
}

#[cfg(test)]
#[path = "tests/locate.rs"]
mod tests;
