//! The committed extraction result and its serialised forms.

use crate::node::{NodeId, Page};
use crate::table::Table;
use crate::Result;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// What a commit hands to the clipboard: the selected element's identity, its rendered text and
/// the table parsed from that text.
pub struct Payload {
    /// Uppercase tag name, as the DOM reports `tagName`.
    pub tag: String,
    /// The element's `id` attribute.
    pub id: String,
    /// The element's `class` attribute.
    pub class: String,
    /// Rendered text of the element.
    pub text: String,
    /// Structured table parsed from `text`.
    pub object: Table,
}

impl Payload {
    #[must_use]
    /// Captures `node` and the table parsed from its text.
    pub fn capture(page: &Page, node: NodeId, text: String, object: Table) -> Self {
        let (tag, id, class) = page.element(node).map_or_else(
            || (String::new(), String::new(), String::new()),
            |el| (el.tag.to_ascii_uppercase(), el.id.clone(), el.class.clone()),
        );
        Self {
            tag,
            id,
            class,
            text,
            object,
        }
    }

    /// Pretty-printed JSON, two-space indented.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// A custom-scheme URL that hands the payload to a desktop application.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation fails.
    pub fn launch_url(&self, scheme: &str) -> Result<String> {
        let json = serde_json::to_string(self)?;
        Ok(format!(
            "{scheme}://loadData?data={}",
            urlencoding::encode(&json)
        ))
    }
}

#[cfg(test)]
#[path = "tests/payload.rs"]
mod tests;
