//! Page snapshot representation: an arena of element and text nodes.
//!
//! A page is a read-only picture of a rendered document. Nodes never own their relatives: each
//! node records the index of its parent and the indices of its children, so walking up or down
//! the tree is a lookup in the arena rather than a chase through shared pointers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tags whose content is never rendered as text.
const NON_RENDERED: &[&str] = &[
    "script", "style", "head", "template", "noscript", "title", "meta", "link",
];

/// Tags whose text keeps its whitespace as written.
const PRESERVING_TAGS: &[&str] = &["pre", "textarea", "listing", "plaintext"];

/// Tags laid out as blocks: they start and end on their own line in rendered text.
const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "body",
    "caption",
    "dd",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "html",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "tbody",
    "tfoot",
    "thead",
    "tr",
    "ul",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
/// Index of a node within its [`Page`].
pub struct NodeId(pub usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
/// Layout box of an element in page coordinates.
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Rect {
    #[must_use]
    /// A box with no area takes up no room on screen.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reasons a node's geometry could not be measured.
pub enum GeometryError {
    /// The host refuses reads on this node (e.g. a cross-origin frame).
    #[error("geometry of {0} is restricted")]
    Restricted(NodeId),
    /// The node no longer exists in this page.
    #[error("{0} is not part of this page")]
    Stale(NodeId),
}

#[derive(Clone, Debug, PartialEq)]
/// Attributes of an element node that the extraction engine reads.
pub struct Element {
    /// Lowercase tag name.
    pub tag: String,
    /// Value of the `id` attribute, empty when absent.
    pub id: String,
    /// Value of the `class` attribute, empty when absent.
    pub class: String,
    /// Whether the element itself is displayed.
    pub visible: bool,
    /// Layout box, when the snapshot carries geometry.
    pub rect: Option<Rect>,
    /// Whether geometry reads on this element are refused.
    pub restricted: bool,
    /// Rendered text captured from a live page, used verbatim when present.
    pub captured_text: Option<String>,
    /// Whether text inside keeps its spaces, tabs and line breaks (`pre`, `white-space: pre`).
    pub preserve_whitespace: bool,
}

impl Element {
    #[must_use]
    /// Creates a visible element with no attributes.
    pub fn new(tag: &str) -> Self {
        let tag = tag.to_ascii_lowercase();
        Self {
            preserve_whitespace: PRESERVING_TAGS.contains(&tag.as_str()),
            tag,
            id: String::new(),
            class: String::new(),
            visible: true,
            rect: None,
            restricted: false,
            captured_text: None,
        }
    }

    #[must_use]
    /// Matches the heading tags `h1` through `h6`.
    pub fn is_heading(&self) -> bool {
        let bytes = self.tag.as_bytes();
        bytes.len() == 2
            && bytes[0].eq_ignore_ascii_case(&b'h')
            && (b'1'..=b'6').contains(&bytes[1])
    }

    #[must_use]
    /// Script, style and document metadata never render as text.
    pub fn is_non_rendered(&self) -> bool {
        NON_RENDERED.contains(&self.tag.as_str())
    }

    fn is_block(&self) -> bool {
        BLOCK_TAGS.contains(&self.tag.as_str())
    }

    fn is_cell(&self) -> bool {
        self.tag == "td" || self.tag == "th"
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Content carried by a node.
pub enum NodeKind {
    /// A tagged element with children.
    Element(Element),
    /// A run of character data.
    Text(String),
}

#[derive(Clone, Debug, PartialEq)]
/// One entry of the page arena.
pub struct Node {
    /// What this node is.
    pub kind: NodeKind,
    /// Index of the containing element; `None` only for the root.
    pub parent: Option<NodeId>,
    /// Child nodes (elements and text) in document order.
    pub children: Vec<NodeId>,
}

impl Node {
    #[must_use]
    /// The element data, if this is an element.
    pub fn element(&self) -> Option<&Element> {
        match &self.kind {
            NodeKind::Element(element) => Some(element),
            NodeKind::Text(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// A read-only snapshot of a rendered document.
pub struct Page {
    nodes: Vec<Node>,
}

impl Page {
    #[must_use]
    /// Starts a page whose root element has the given tag.
    pub fn new(root_tag: &str) -> Self {
        Self::with_root(Element::new(root_tag))
    }

    #[must_use]
    /// Starts a page from a fully specified root element.
    pub fn with_root(root: Element) -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Element(root),
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    #[must_use]
    /// The document element.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[must_use]
    /// Number of nodes (elements and text) in the page.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    /// Whether the page holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    /// Looks up a node by index.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    #[must_use]
    /// Looks up an element by index, ignoring text nodes.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.get(id).and_then(Node::element)
    }

    /// Mutable access to an element while the page is being built.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match self.nodes.get_mut(id.0).map(|node| &mut node.kind) {
            Some(NodeKind::Element(element)) => Some(element),
            _ => None,
        }
    }

    /// Appends an element under `parent` and returns its index.
    pub fn append_element(&mut self, parent: NodeId, element: Element) -> NodeId {
        self.push(parent, NodeKind::Element(element))
    }

    /// Appends a bare element with the given tag under `parent`.
    pub fn append_tag(&mut self, parent: NodeId, tag: &str) -> NodeId {
        self.append_element(parent, Element::new(tag))
    }

    /// Appends a text node under `parent` and returns its index.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.push(parent, NodeKind::Text(text.to_string()))
    }

    fn push(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.push(id);
        }
        id
    }

    #[must_use]
    /// The containing element.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    #[must_use]
    /// Element children in document order; text nodes are not counted.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.get(id)
            .map(|node| {
                node.children
                    .iter()
                    .copied()
                    .filter(|&child| self.element(child).is_some())
                    .collect()
            })
            .unwrap_or_default()
    }

    #[must_use]
    /// Number of element children.
    pub fn child_count(&self, id: NodeId) -> usize {
        self.get(id).map_or(0, |node| {
            node.children
                .iter()
                .filter(|&&child| self.element(child).is_some())
                .count()
        })
    }

    #[must_use]
    /// Lowercase tag name, `None` for text nodes.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|element| element.tag.as_str())
    }

    #[must_use]
    /// The nearest element before `id` among its parent's children.
    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let position = siblings.iter().position(|&sibling| sibling == id)?;
        position.checked_sub(1).map(|before| siblings[before])
    }

    #[must_use]
    /// Whether `ancestor` is `node` or one of its ancestors.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    #[must_use]
    /// All descendant elements of `id` in document order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).into_iter().rev().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).into_iter().rev());
        }
        out
    }

    #[must_use]
    /// Depth below the root (the root is at depth 0).
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.parent(id);
        while let Some(parent) = current {
            depth += 1;
            current = self.parent(parent);
        }
        depth
    }

    #[must_use]
    /// The `body` element, or the root when the document has none.
    pub fn body(&self) -> NodeId {
        std::iter::once(self.root())
            .chain(self.descendants(self.root()))
            .find(|&id| self.tag(id) == Some("body"))
            .unwrap_or_else(|| self.root())
    }

    #[must_use]
    /// Finds the first element whose `id` attribute equals `element_id`.
    pub fn find_by_element_id(&self, element_id: &str) -> Option<NodeId> {
        std::iter::once(self.root())
            .chain(self.descendants(self.root()))
            .find(|&id| self.element(id).is_some_and(|el| el.id == element_id))
    }

    #[must_use]
    /// Whether the element takes part in layout: it and every ancestor are visible and its box,
    /// if known, has area.
    pub fn is_rendered(&self, id: NodeId) -> bool {
        let Some(element) = self.element(id) else {
            return false;
        };
        if element.rect.is_some_and(|rect| rect.is_empty()) {
            return false;
        }
        let mut current = Some(id);
        while let Some(node) = current {
            match self.element(node) {
                Some(el) if !el.visible || el.is_non_rendered() => return false,
                _ => {}
            }
            current = self.parent(node);
        }
        true
    }

    /// Reads the layout box of an element.
    ///
    /// Elements from snapshots without geometry report an empty box at the origin.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Restricted`] when the host forbids the read and
    /// [`GeometryError::Stale`] when `id` does not name an element of this page.
    pub fn bounding_rect(&self, id: NodeId) -> Result<Rect, GeometryError> {
        let element = self.element(id).ok_or(GeometryError::Stale(id))?;
        if element.restricted {
            return Err(GeometryError::Restricted(id));
        }
        Ok(element.rect.unwrap_or_default())
    }

    #[must_use]
    /// Deep static copy of the subtree at `id`, rooted at index 0 of a new page.
    pub fn clone_subtree(&self, id: NodeId) -> Page {
        let root = self
            .element(id)
            .cloned()
            .unwrap_or_else(|| Element::new("div"));
        let mut copy = Page::with_root(root);
        let mut stack = vec![(id, copy.root())];
        while let Some((source, target)) = stack.pop() {
            let Some(node) = self.get(source) else {
                continue;
            };
            for &child in &node.children {
                let Some(child_node) = self.get(child) else {
                    continue;
                };
                let copied = copy.push(target, child_node.kind.clone());
                stack.push((child, copied));
            }
        }
        copy
    }

    #[must_use]
    /// Short CSS-like label such as `div#main.listing`.
    pub fn describe(&self, id: NodeId) -> String {
        match self.get(id).map(|node| &node.kind) {
            Some(NodeKind::Element(element)) => {
                let mut label = element.tag.clone();
                if !element.id.is_empty() {
                    label.push('#');
                    label.push_str(&element.id);
                }
                for class in element.class.split_whitespace() {
                    label.push('.');
                    label.push_str(class);
                }
                label
            }
            Some(NodeKind::Text(_)) => "#text".to_string(),
            None => format!("{id}?"),
        }
    }

    #[must_use]
    /// Text as a reader sees it on screen: cells joined by tabs, rows and blocks on their own
    /// lines, hidden content left out.
    pub fn inner_text(&self, id: NodeId) -> String {
        if let Some(captured) = self.element(id).and_then(|el| el.captured_text.as_ref()) {
            return captured.clone();
        }
        if let Some(NodeKind::Text(text)) = self.get(id).map(|node| &node.kind) {
            return collapse_whitespace(text).trim().to_string();
        }
        let mut rendered = Rendered::default();
        self.render_text(id, &mut rendered, true, false);
        rendered.finish()
    }

    fn render_text(&self, id: NodeId, out: &mut Rendered, is_start: bool, preserve: bool) {
        let Some(node) = self.get(id) else {
            return;
        };
        let element = match &node.kind {
            NodeKind::Text(text) if preserve => {
                out.push_verbatim(text);
                return;
            }
            NodeKind::Text(text) => {
                out.push(&collapse_whitespace(text));
                return;
            }
            NodeKind::Element(element) => element,
        };
        if !element.visible || element.is_non_rendered() {
            return;
        }
        if element.tag == "br" {
            out.new_line();
            return;
        }
        if element.is_cell() && !is_start && self.previous_element_sibling(id).is_some() {
            out.push("\t");
        }
        if element.is_block() {
            out.break_line();
        }
        if let Some(captured) = &element.captured_text {
            out.push(captured);
        } else {
            let preserve = preserve || element.preserve_whitespace;
            for &child in &node.children {
                self.render_text(child, out, false, preserve);
            }
        }
        if element.is_block() {
            out.break_line();
        }
    }
}

#[derive(Default)]
struct RenderedLine {
    text: String,
    verbatim: bool,
}

/// Rendered text split into lines; lines holding preformatted text are left untrimmed.
struct Rendered {
    lines: Vec<RenderedLine>,
}

impl Default for Rendered {
    fn default() -> Self {
        Self {
            lines: vec![RenderedLine::default()],
        }
    }
}

impl Rendered {
    fn current(&mut self) -> &mut RenderedLine {
        if self.lines.is_empty() {
            self.lines.push(RenderedLine::default());
        }
        let last = self.lines.len() - 1;
        &mut self.lines[last]
    }

    fn append(&mut self, text: &str, verbatim: bool) {
        for (i, part) in text.split('\n').enumerate() {
            if i > 0 {
                self.new_line();
            }
            let line = self.current();
            line.text.push_str(part);
            line.verbatim |= verbatim;
        }
    }

    fn push(&mut self, text: &str) {
        self.append(text, false);
    }

    fn push_verbatim(&mut self, text: &str) {
        self.append(&text.replace("\r\n", "\n"), true);
    }

    fn new_line(&mut self) {
        self.lines.push(RenderedLine::default());
    }

    fn break_line(&mut self) {
        if !self.current().text.is_empty() {
            self.new_line();
        }
    }

    /// Trims spaces at line ends and around cell separators, and drops blank lines.
    /// Preformatted lines keep their spacing.
    fn finish(self) -> String {
        self.lines
            .into_iter()
            .filter(|line| !line.text.trim().is_empty())
            .map(|line| {
                if line.verbatim {
                    line.text
                } else {
                    line.text
                        .split('\t')
                        .map(|cell| cell.trim_matches(' '))
                        .collect::<Vec<_>>()
                        .join("\t")
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push(' ');
                in_space = true;
            }
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

#[cfg(test)]
#[path = "tests/node.rs"]
mod tests;
