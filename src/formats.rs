//! Format trait and implementations for the page sources datapick reads.
//!
//! This module defines the `Format` trait which abstracts over the ways a page snapshot can be
//! supplied: raw HTML parsed with tree-sitter, or a JSON snapshot exported from a live browser
//! that also carries layout and captured text.

pub mod html;
pub mod snapshot;

use crate::node::Page;
use crate::Result;
use std::path::Path;

/// A source format that can be turned into a [`Page`].
pub trait Format {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// File extension (without dot) this format claims.
    fn file_extension(&self) -> &'static str;

    /// Builds a page from source text.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be parsed into a tree.
    fn load(&self, source: &str) -> Result<Page>;
}

#[must_use]
/// Picks the format for `path` by extension: JSON snapshots for `.json`, HTML otherwise.
pub fn for_path(path: &Path) -> Box<dyn Format> {
    let snapshot = snapshot::SnapshotFormat;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case(snapshot.file_extension()) => Box::new(snapshot),
        _ => Box::new(html::HtmlFormat),
    }
}

/// Reads and loads the page at `path` with the format its extension selects.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_path(path: &Path) -> Result<Page> {
    let source = std::fs::read_to_string(path)?;
    let format = for_path(path);
    let page = format.load(&source)?;
    tracing::info!(
        path = %path.display(),
        format = format.name(),
        nodes = page.len(),
        "loaded page"
    );
    Ok(page)
}
