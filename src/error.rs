//! Crate-wide error type.

use thiserror::Error;

#[derive(Error, Debug)]
/// Failures surfaced by loading, dispatch and the front end.
pub enum Error {
    /// Reading or writing a file or the terminal failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON input or output could not be processed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The HTML grammar could not be loaded into the parser.
    #[error("Failed to load HTML grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// The parser gave up without producing a tree.
    #[error("HTML parsing produced no tree")]
    Parse,

    /// A page snapshot was well-formed JSON but not a usable tree.
    #[error("Invalid snapshot: {0}")]
    Snapshot(String),

    /// The clipboard could not be opened or written.
    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),

    /// A requested node could not be found in the page.
    #[error("No node matches target: {0}")]
    Target(String),
}
