//! Inbound messages shared by the selection engine and the request overlay.
//!
//! Messages arrive as JSON objects on one channel. The activation command is keyed by `action`,
//! the others by `type`; decoding looks at `action` first.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value of `action` that starts a selection session.
pub const ACTIVATE_ACTION: &str = "activateGetData";
/// Value of `type` that triggers a heading scan.
pub const SCAN_TYPE: &str = "scanForHighTextElements";
/// Value of `type` carrying per-domain request counts.
pub const DOMAIN_COUNTS_TYPE: &str = "updateDomainCounts";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Requests and bytes observed for one domain.
pub struct DomainCount {
    /// Number of completed requests.
    pub count: u64,
    /// Sum of response sizes.
    pub bytes: u64,
    /// Human-readable byte total.
    #[serde(rename = "formattedBytes", alias = "formatedBytes", default)]
    pub formatted_bytes: String,
}

/// Counts keyed by domain, in domain order.
pub type DomainCounts = BTreeMap<String, DomainCount>;

#[derive(Clone, Debug, PartialEq, Eq)]
/// A decoded inbound message.
pub enum Message {
    /// Start a selection on the last right-clicked node.
    Activate,
    /// Scan the page for dense text with headings.
    Scan,
    /// Refresh the request overlay.
    DomainCounts(DomainCounts),
    /// A message for some other handler.
    Other(String),
}

#[derive(Deserialize)]
struct Envelope {
    action: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    counts: DomainCounts,
}

impl Message {
    /// Decodes a JSON message by its `action` or `type` discriminator.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not an object of the expected shape.
    pub fn from_json(json: &str) -> Result<Self> {
        let envelope: Envelope = serde_json::from_str(json)?;
        let message = match (envelope.action.as_deref(), envelope.kind.as_deref()) {
            (Some(ACTIVATE_ACTION), _) => Self::Activate,
            (_, Some(SCAN_TYPE)) => Self::Scan,
            (_, Some(DOMAIN_COUNTS_TYPE)) => Self::DomainCounts(envelope.counts),
            (action, kind) => Self::Other(action.or(kind).unwrap_or_default().to_string()),
        };
        Ok(message)
    }
}

#[must_use]
/// One overlay line per domain: `domain: count [formatted]`.
pub fn overlay_lines(counts: &DomainCounts) -> Vec<String> {
    counts
        .iter()
        .map(|(domain, e)| format!("{domain}: {} [{}]", e.count, e.formatted_bytes))
        .collect()
}

#[cfg(test)]
#[path = "tests/messages.rs"]
mod tests;
