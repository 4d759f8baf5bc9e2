//! JSON snapshot format.
//!
//! A snapshot is the element tree of a live page serialized by a small capture script. Unlike
//! plain HTML it records what the browser knew: computed visibility, layout boxes, frames whose
//! geometry cannot be read, and the rendered `innerText` of elements.
//!
//! ```json
//! {
//!   "tag": "html",
//!   "children": [
//!     { "tag": "body", "rect": { "x": 0, "y": 0, "width": 800, "height": 600 },
//!       "children": [ { "text": "Hello" } ] }
//!   ]
//! }
//! ```

use crate::formats::Format;
use crate::node::{Element, NodeId, Page, Rect};
use crate::{Error, Result};
use serde::Deserialize;

/// Loads pages from JSON snapshots.
pub struct SnapshotFormat;

#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotNode {
    Text(TextNode),
    Element(ElementNode),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TextNode {
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ElementNode {
    tag: String,
    #[serde(default)]
    id: String,
    #[serde(default)]
    class: String,
    #[serde(default = "visible_by_default")]
    visible: bool,
    #[serde(default)]
    rect: Option<Rect>,
    #[serde(default)]
    restricted: bool,
    #[serde(default)]
    inner_text: Option<String>,
    #[serde(default)]
    children: Vec<SnapshotNode>,
}

fn visible_by_default() -> bool {
    true
}

impl ElementNode {
    fn to_element(&self) -> Result<Element> {
        if self.tag.trim().is_empty() {
            return Err(Error::Snapshot("element without a tag".to_string()));
        }
        let mut element = Element::new(self.tag.trim());
        element.id.clone_from(&self.id);
        element.class.clone_from(&self.class);
        element.visible = self.visible;
        element.rect = self.rect;
        element.restricted = self.restricted;
        element.captured_text.clone_from(&self.inner_text);
        Ok(element)
    }
}

impl Format for SnapshotFormat {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    fn file_extension(&self) -> &'static str {
        "json"
    }

    fn load(&self, source: &str) -> Result<Page> {
        let root = match serde_json::from_str::<SnapshotNode>(source)? {
            SnapshotNode::Element(root) => root,
            SnapshotNode::Text(_) => {
                return Err(Error::Snapshot("root must be an element".to_string()));
            }
        };
        let mut page = Page::with_root(root.to_element()?);
        let mut stack: Vec<(&ElementNode, NodeId)> = vec![(&root, page.root())];
        while let Some((node, id)) = stack.pop() {
            for child in &node.children {
                match child {
                    SnapshotNode::Text(text) => {
                        page.append_text(id, &text.text);
                    }
                    SnapshotNode::Element(element) => {
                        let child_id = page.append_element(id, element.to_element()?);
                        stack.push((element, child_id));
                    }
                }
            }
        }
        Ok(page)
    }
}

#[cfg(test)]
#[path = "../tests/snapshot.rs"]
mod tests;
