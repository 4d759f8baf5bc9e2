//! Terminal session state: a page outline with a cursor standing in for the mouse pointer.
//!
//! The browser delivers pointer events as the mouse moves; in the terminal the cursor row is the
//! pointer. Moving the cursor out of the live node is a pointer-leave, a qualified arrow is a
//! wheel turn over the cursor row, and Enter is a click on it. Every gesture is routed through
//! the same [`PageContext`] the extension would drive, so the terminal shows exactly what the
//! engine decided.

use crate::config::Config;
use crate::content::{Emission, PageContext, PointerEvent};
use crate::messages::Message;
use crate::node::{NodeId, Page};
use crate::selection::{Commit, Modifiers};
use crate::ui::TuiPresenter;
use crate::Result;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq)]
/// One element of the page as listed in the outline.
pub struct OutlineRow {
    /// The element.
    pub node: NodeId,
    /// Nesting depth below the page root.
    pub depth: usize,
    /// CSS-like label, e.g. `table#prices.grid`.
    pub label: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Which screen is in front.
pub enum View {
    /// The page outline with the preview pane.
    Outline,
    /// The heading pairs modal opened by a scan.
    Pairs,
}

/// Everything the terminal front end needs between key presses.
pub struct AppState {
    /// The page, its presenter and the selection session.
    pub context: PageContext<TuiPresenter>,
    /// Rendered elements in document order.
    pub rows: Vec<OutlineRow>,
    /// Index into `rows` of the row under the pointer.
    pub cursor: usize,
    /// Screen in front.
    pub view: View,
    /// Status feedback displayed in the help bar.
    pub message: Option<String>,
    /// Selections committed during this session, oldest first.
    pub clips: Vec<Commit>,
    /// Name of the loaded page, for the outline title.
    pub source: String,
}

impl AppState {
    #[must_use]
    /// Builds the outline of `page` and places the cursor on its body.
    pub fn new(page: Page, presenter: TuiPresenter, config: &Config, source: String) -> Self {
        let rows = outline(&page);
        let body = page.body();
        let cursor = rows.iter().position(|row| row.node == body).unwrap_or(0);
        Self {
            context: PageContext::new(page, presenter, config),
            rows,
            cursor,
            view: View::Outline,
            message: None,
            clips: Vec::new(),
            source,
        }
    }

    #[must_use]
    /// The node under the pointer.
    pub fn pointer(&self) -> Option<NodeId> {
        self.rows.get(self.cursor).map(|row| row.node)
    }

    /// Moves the pointer by `delta` rows, clamped to the outline. Leaving the live node's subtree
    /// delivers a pointer-leave on it.
    pub fn move_pointer(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() - 1;
        let next = self.cursor.saturating_add_signed(delta).min(last);
        self.set_pointer(next);
    }

    /// Moves the pointer to the first row.
    pub fn pointer_to_first(&mut self) {
        self.set_pointer(0);
    }

    /// Moves the pointer to the last row.
    pub fn pointer_to_last(&mut self) {
        self.set_pointer(self.rows.len().saturating_sub(1));
    }

    fn set_pointer(&mut self, next: usize) {
        if next == self.cursor || next >= self.rows.len() {
            return;
        }
        let leaving = self.context.controller().live().filter(|&live| {
            let page = self.context.page();
            self.pointer().is_some_and(|old| page.contains(live, old))
                && !page.contains(live, self.rows[next].node)
        });
        self.cursor = next;
        if let Some(live) = leaving {
            self.context.handle_pointer(PointerEvent::Leave(live));
            self.message = Some("Selection cancelled".to_string());
        }
    }

    /// Right-clicks the pointer row and activates the picker on it.
    pub fn start_selection(&mut self) {
        let Some(node) = self.pointer() else {
            return;
        };
        self.context.handle_pointer(PointerEvent::ContextMenu(node));
        self.context.handle_message(&Message::Activate);
        self.message = self
            .context
            .controller()
            .live()
            .map(|live| format!("Selecting {}", self.context.page().describe(live)));
    }

    /// Turns the wheel over the pointer row. The pointer then follows the selection when it
    /// narrowed to a child away from the pointer.
    pub fn wheel(&mut self, delta_y: f64, modifiers: Modifiers) {
        let Some(target) = self.pointer() else {
            return;
        };
        self.context.handle_pointer(PointerEvent::Wheel {
            target,
            delta_y,
            modifiers,
        });
        if let Some(live) = self.context.controller().live() {
            if !self.context.page().contains(live, target) {
                if let Some(row) = self.rows.iter().position(|row| row.node == live) {
                    self.cursor = row;
                }
            }
            self.message = Some(format!("Selecting {}", self.context.page().describe(live)));
        }
    }

    /// Clicks the pointer row, committing the selection when the row lies inside it.
    pub fn click(&mut self) {
        let Some(target) = self.pointer() else {
            return;
        };
        if let Some(Emission::Clip(commit)) =
            self.context.handle_pointer(PointerEvent::Click(target))
        {
            self.message = self.context.presenter().confirmation.clone();
            self.clips.push(commit);
        }
    }

    /// Scans the page body for heading pairs and opens the modal when any were found.
    pub fn scan(&mut self) {
        if let Some(Emission::Pairs(pairs)) = self.context.handle_message(&Message::Scan) {
            if pairs.is_empty() {
                self.message = Some("No heading pairs found".to_string());
            } else {
                self.message = Some(format!("{} heading pairs", pairs.len()));
                self.view = View::Pairs;
            }
        }
    }

    /// Closes the pairs modal.
    pub fn close_modal(&mut self) {
        self.context.presenter_mut().pairs = None;
        self.view = View::Outline;
    }

    /// Decodes an inbound JSON message and dispatches it to the page.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a JSON object.
    pub fn receive(&mut self, json: &str) -> Result<()> {
        let message = Message::from_json(json)?;
        debug!(?message, "dispatching message");
        match self.context.handle_message(&message) {
            Some(Emission::Pairs(pairs)) if !pairs.is_empty() => self.view = View::Pairs,
            _ => {}
        }
        Ok(())
    }
}

fn outline(page: &Page) -> Vec<OutlineRow> {
    std::iter::once(page.root())
        .chain(page.descendants(page.root()))
        .filter(|&id| page.is_rendered(id))
        .map(|node| OutlineRow {
            node,
            depth: page.depth(node),
            label: page.describe(node),
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;
