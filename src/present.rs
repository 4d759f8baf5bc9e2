//! The presentation seam between the extraction engine and whatever draws the page.
//!
//! The engine decides *what* is highlighted, live, copied or announced; a [`Presenter`] decides
//! how that looks. The terminal front end implements it in [`crate::ui`], and tests use a
//! recording implementation.

use crate::messages::DomainCounts;
use crate::node::{NodeId, Page};
use crate::scan::HeadingPair;
use crate::Result;

/// Receives presentation requests from the selection engine.
pub trait Presenter {
    /// Draws the lightweight outline around `node`, replacing any previous one.
    fn highlight(&mut self, page: &Page, node: NodeId);

    /// Heavy fallback for nodes whose geometry cannot be read: shows a static copy instead.
    fn render_overlay(&mut self, clone: Page);

    /// Removes the outline and any fallback overlay.
    fn remove_highlight(&mut self);

    /// Starts routing wheel, leave and click events from `node` to the engine.
    fn attach_listeners(&mut self, node: NodeId);

    /// Stops routing events from `node`.
    fn detach_listeners(&mut self, node: NodeId);

    /// Places serialised payload text on the clipboard.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Clipboard`] when the clipboard cannot be written.
    fn copy_to_clipboard(&mut self, text: &str) -> Result<()>;

    /// Shows a transient confirmation after a commit on `node`.
    fn confirm(&mut self, node: NodeId, message: &str);

    /// Lists heading/content pairs found by a scan.
    fn show_pairs(&mut self, pairs: &[HeadingPair]);

    /// Refreshes the per-domain request overlay.
    fn update_domain_counts(&mut self, counts: &DomainCounts);
}
