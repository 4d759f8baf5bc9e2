//! datapick: point at a region of a page, widen or narrow the pick, and clip it as structured data.
//!
//! A page snapshot is held as an arena of nodes ([`node::Page`]). Picking starts from a
//! right-clicked node, which [`locate::locate`] widens to the smallest enclosing repeated
//! structure. The [`selection::SelectionController`] then steps outward or cycles through
//! children in response to wheel gestures, and on commit reads the selection's rendered text,
//! parses it into a [`table::Table`] and hands the resulting [`payload::Payload`] to a
//! [`present::Presenter`]. [`scan`] pairs dense text blocks with the headings above them.
//!
//! [`content::PageContext`] wires these together behind the pointer events and JSON messages a
//! browser extension would deliver; the `datapick` binary drives the same context from a terminal.
#![allow(clippy::multiple_crate_versions)]

pub mod app_state;
pub mod config;
pub mod content;
pub mod error;
pub mod formats;
pub mod locate;
pub mod messages;
pub mod node;
pub mod payload;
pub mod present;
pub mod scan;
pub mod selection;
pub mod table;
pub mod ui;

pub use error::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "tests/recorder.rs"]
mod recorder;
