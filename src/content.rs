//! Per-page dispatch of pointer events and inbound messages.
//!
//! A [`PageContext`] plays the part of the script injected into a page: it remembers the last
//! node the user right-clicked, forwards gestures on the live node to the selection controller,
//! and routes each inbound [`Message`] to the component that handles it.

use crate::config::Config;
use crate::messages::Message;
use crate::node::{NodeId, Page};
use crate::present::Presenter;
use crate::scan::{scan_with, HeadingPair};
use crate::selection::{Commit, Modifiers, SelectionController, SelectionOptions};
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq)]
/// A pointer event delivered to the page.
pub enum PointerEvent {
    /// Secondary-button press on a node (opens the context menu).
    ContextMenu(NodeId),
    /// Wheel turned over `target`.
    Wheel {
        /// Node under the pointer.
        target: NodeId,
        /// Vertical scroll amount; negative scrolls up.
        delta_y: f64,
        /// Modifier keys held.
        modifiers: Modifiers,
    },
    /// Pointer left `node`'s bounds.
    Leave(NodeId),
    /// Primary-button click on a node.
    Click(NodeId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Something the page produced in response to input.
pub enum Emission {
    /// A selection was committed.
    Clip(Commit),
    /// A scan found heading/content pairs.
    Pairs(Vec<HeadingPair>),
}

/// One page's snapshot, presenter and selection session.
pub struct PageContext<P: Presenter> {
    page: Page,
    presenter: P,
    controller: SelectionController,
    last_right_clicked: Option<NodeId>,
    text_threshold: usize,
}

impl<P: Presenter> PageContext<P> {
    #[must_use]
    /// Wraps `page` with a fresh, inactive selection controller.
    pub fn new(page: Page, presenter: P, config: &Config) -> Self {
        Self {
            page,
            presenter,
            controller: SelectionController::new(SelectionOptions::from(config)),
            last_right_clicked: None,
            text_threshold: config.text_threshold,
        }
    }

    #[must_use]
    /// The page snapshot.
    pub fn page(&self) -> &Page {
        &self.page
    }

    #[must_use]
    /// The presenter.
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Mutable access to the presenter, for front-end housekeeping.
    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    #[must_use]
    /// The selection controller.
    pub fn controller(&self) -> &SelectionController {
        &self.controller
    }

    #[must_use]
    /// The node recorded by the most recent context-menu event.
    pub fn last_right_clicked(&self) -> Option<NodeId> {
        self.last_right_clicked
    }

    /// Routes a decoded message.
    pub fn handle_message(&mut self, message: &Message) -> Option<Emission> {
        match message {
            Message::Activate => {
                let Some(node) = self.last_right_clicked else {
                    debug!("activation without a right-clicked node, ignoring");
                    return None;
                };
                self.controller
                    .initialize(&self.page, &mut self.presenter, node);
                None
            }
            Message::Scan => {
                let pairs = scan_with(&self.page, self.page.body(), self.text_threshold);
                info!(pairs = pairs.len(), "scan finished");
                if !pairs.is_empty() {
                    self.presenter.show_pairs(&pairs);
                }
                Some(Emission::Pairs(pairs))
            }
            Message::DomainCounts(counts) => {
                self.presenter.update_domain_counts(counts);
                None
            }
            Message::Other(kind) => {
                debug!(kind = %kind, "message for another handler");
                None
            }
        }
    }

    /// Routes a pointer event. Wheel and click events count when they land on the live node or
    /// inside it; a leave counts only on the live node itself.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<Emission> {
        match event {
            PointerEvent::ContextMenu(node) => {
                self.last_right_clicked = Some(node);
                None
            }
            PointerEvent::Wheel {
                target,
                delta_y,
                modifiers,
            } => {
                if self.within_live(target) {
                    self.controller
                        .on_wheel(&self.page, &mut self.presenter, delta_y, modifiers);
                }
                None
            }
            PointerEvent::Leave(node) => {
                if self.controller.live() == Some(node) {
                    self.controller.cancel(&mut self.presenter);
                }
                None
            }
            PointerEvent::Click(target) => {
                if !self.within_live(target) {
                    return None;
                }
                self.controller
                    .commit(&self.page, &mut self.presenter)
                    .map(Emission::Clip)
            }
        }
    }

    fn within_live(&self, target: NodeId) -> bool {
        self.controller
            .live()
            .is_some_and(|live| self.page.contains(live, target))
    }
}

#[cfg(test)]
#[path = "tests/content.rs"]
mod tests;
