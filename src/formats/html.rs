//! HTML format implementation using tree-sitter-html.
//!
//! The syntax tree is walked once and copied into a [`Page`]. Plain HTML carries no layout, so
//! visibility comes from markup alone (`hidden`, inline `display: none`, hidden inputs) and
//! elements have no layout box. Text inside `pre`, `textarea` and inline `white-space: pre*`
//! elements is copied as written.

use crate::formats::Format;
use crate::node::{Element, NodeId, Page};
use crate::{Error, Result};
use tree_sitter::{Node as SyntaxNode, Parser};

/// Loads pages from HTML source.
pub struct HtmlFormat;

impl Format for HtmlFormat {
    fn name(&self) -> &'static str {
        "html"
    }

    fn file_extension(&self) -> &'static str {
        "html"
    }

    fn load(&self, source: &str) -> Result<Page> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_html::LANGUAGE.into())?;
        let tree = parser.parse(source, None).ok_or(Error::Parse)?;
        let document = tree.root_node();

        let builder = Builder { source };
        let top = content_children(document);
        let html_root = match top.as_slice() {
            [only] if is_element(*only) && builder.tag_name(*only) == "html" => Some(*only),
            _ => None,
        };

        let mut page = match html_root {
            Some(html) => Page::with_root(builder.element(html)),
            None => Page::new("html"),
        };
        let root = page.root();
        builder.append_children(&mut page, html_root.unwrap_or(document), root);
        Ok(page)
    }
}

fn content_children(node: SyntaxNode<'_>) -> Vec<SyntaxNode<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !matches!(child.kind(), "doctype" | "comment"))
        .collect()
}

fn is_element(node: SyntaxNode<'_>) -> bool {
    matches!(node.kind(), "element" | "script_element" | "style_element")
}

fn open_tag(node: SyntaxNode<'_>) -> Option<SyntaxNode<'_>> {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .find(|child| matches!(child.kind(), "start_tag" | "self_closing_tag"));
    found
}

struct Builder<'s> {
    source: &'s str,
}

impl Builder<'_> {
    fn text(&self, node: SyntaxNode<'_>) -> &str {
        self.source.get(node.byte_range()).unwrap_or_default()
    }

    fn preceded_by_space(&self, node: SyntaxNode<'_>) -> bool {
        self.source
            .get(..node.start_byte())
            .and_then(|before| before.chars().next_back())
            .is_some_and(char::is_whitespace)
    }

    fn tag_name(&self, node: SyntaxNode<'_>) -> String {
        open_tag(node)
            .and_then(|tag| {
                let mut cursor = tag.walk();
                let name = tag
                    .named_children(&mut cursor)
                    .find(|child| child.kind() == "tag_name");
                name
            })
            .map(|name| self.text(name).to_ascii_lowercase())
            .unwrap_or_default()
    }

    fn element(&self, node: SyntaxNode<'_>) -> Element {
        let mut element = Element::new(&self.tag_name(node));
        let Some(tag) = open_tag(node) else {
            return element;
        };
        let mut cursor = tag.walk();
        for attribute in tag
            .named_children(&mut cursor)
            .filter(|child| child.kind() == "attribute")
        {
            let (name, value) = self.attribute(attribute);
            apply_attribute(&mut element, &name, &value);
        }
        element
    }

    fn attribute(&self, node: SyntaxNode<'_>) -> (String, String) {
        let mut name = String::new();
        let mut value = String::new();
        let mut cursor = node.walk();
        for part in node.named_children(&mut cursor) {
            match part.kind() {
                "attribute_name" => name = self.text(part).to_ascii_lowercase(),
                "attribute_value" => value = decode_entities(self.text(part)),
                "quoted_attribute_value" => {
                    let mut inner = part.walk();
                    value = part
                        .named_children(&mut inner)
                        .find(|v| v.kind() == "attribute_value")
                        .map(|v| decode_entities(self.text(v)))
                        .unwrap_or_default();
                }
                _ => {}
            }
        }
        (name, value)
    }

    fn append_children(&self, page: &mut Page, node: SyntaxNode<'_>, parent: NodeId) {
        for child in content_children(node) {
            match child.kind() {
                "element" | "script_element" | "style_element" => {
                    if self.preceded_by_space(child) {
                        page.append_text(parent, " ");
                    }
                    self.append_element(page, child, parent);
                }
                "text" | "entity" => {
                    if self.preceded_by_space(child) {
                        page.append_text(parent, " ");
                    }
                    page.append_text(parent, &decode_entities(self.text(child)));
                }
                "start_tag"
                | "end_tag"
                | "self_closing_tag"
                | "erroneous_end_tag"
                | "raw_text" => {}
                _ => self.append_children(page, child, parent),
            }
        }
    }

    fn append_element(&self, page: &mut Page, node: SyntaxNode<'_>, parent: NodeId) {
        let element = self.element(node);
        let preformatted = element.preserve_whitespace;
        let id = page.append_element(parent, element);
        if node.kind() != "element" {
            let mut cursor = node.walk();
            let raw = node
                .named_children(&mut cursor)
                .find(|part| part.kind() == "raw_text");
            if let Some(raw) = raw {
                page.append_text(id, self.text(raw));
            }
        } else if preformatted {
            self.append_preformatted(page, node, id, true);
        } else {
            self.append_children(page, node, id);
        }
    }

    /// Copies the content of a preformatted element with its whitespace as written, including
    /// the runs between child nodes that the grammar leaves out of text tokens. A line break
    /// directly after the start tag of the preformatted element itself is dropped, as browsers do.
    fn append_preformatted(
        &self,
        page: &mut Page,
        node: SyntaxNode<'_>,
        parent: NodeId,
        drop_leading_newline: bool,
    ) {
        let mut cursor = node.walk();
        let parts: Vec<SyntaxNode<'_>> = node.named_children(&mut cursor).collect();
        let mut last_end: Option<usize> = None;
        let mut after_start_tag = false;
        for child in parts {
            if matches!(child.kind(), "start_tag" | "self_closing_tag") {
                last_end = Some(child.end_byte());
                after_start_tag = drop_leading_newline;
                continue;
            }
            if let Some(gap) = last_end.and_then(|end| self.source.get(end..child.start_byte())) {
                let gap = if after_start_tag {
                    gap.strip_prefix("\r\n")
                        .or_else(|| gap.strip_prefix('\n'))
                        .unwrap_or(gap)
                } else {
                    gap
                };
                if !gap.is_empty() {
                    page.append_text(parent, gap);
                }
            }
            after_start_tag = false;
            last_end = Some(child.end_byte());
            match child.kind() {
                "element" | "script_element" | "style_element" => {
                    let id = page.append_element(parent, self.element(child));
                    if child.kind() == "element" {
                        self.append_preformatted(page, child, id, false);
                    }
                }
                "text" | "entity" => {
                    page.append_text(parent, &decode_entities(self.text(child)));
                }
                _ => {}
            }
        }
    }
}

fn apply_attribute(element: &mut Element, name: &str, value: &str) {
    match name {
        "id" => element.id = value.to_string(),
        "class" => element.class = value.split_whitespace().collect::<Vec<_>>().join(" "),
        "hidden" => element.visible = false,
        "type" if element.tag == "input" && value.eq_ignore_ascii_case("hidden") => {
            element.visible = false;
        }
        "style" => {
            let style: String = value
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_ascii_lowercase();
            if style.contains("display:none") || style.contains("visibility:hidden") {
                element.visible = false;
            }
            if style.contains("white-space:pre") {
                element.preserve_whitespace = true;
            }
        }
        _ => {}
    }
}

/// Decodes the common named entities and numeric character references.
fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let after = &rest[start..];
        let decoded = after.find(';').and_then(|end| {
            let name = &after[1..end];
            let ch = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some(' '),
                _ => name.strip_prefix('#').and_then(|num| {
                    let code = match num.strip_prefix(['x', 'X']) {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => num.parse().ok(),
                    };
                    code.and_then(char::from_u32)
                }),
            };
            ch.map(|c| (c, end + 1))
        });
        if let Some((ch, consumed)) = decoded {
            out.push(ch);
            rest = &after[consumed..];
        } else {
            out.push('&');
            rest = &after[1..];
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
#[path = "../tests/html.rs"]
mod tests;
