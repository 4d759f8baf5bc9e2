//! The interactive selection state machine.
//!
//! A session starts on a clicked node, widens or narrows the highlighted branch in response to
//! qualified wheel gestures, and ends either by committing the selection to the clipboard or by
//! the pointer leaving the selected node. Exactly one node is live (has listeners attached) while
//! a session is active, and none afterwards.

use crate::config::Config;
use crate::locate::locate;
use crate::node::{GeometryError, NodeId, Page};
use crate::payload::Payload;
use crate::present::Presenter;
use crate::table::parse_table_text_with;
use std::str::FromStr;
use tracing::{debug, error, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Modifier key that turns a wheel gesture into navigation.
pub enum Qualifier {
    /// The Shift key.
    Shift,
    /// The Control key.
    Control,
    /// The Alt (Option) key.
    Alt,
}

impl Qualifier {
    #[must_use]
    /// Whether this qualifier is among the held modifiers.
    pub fn held(self, modifiers: Modifiers) -> bool {
        match self {
            Self::Shift => modifiers.shift,
            Self::Control => modifiers.ctrl,
            Self::Alt => modifiers.alt,
        }
    }
}

impl FromStr for Qualifier {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shift" => Ok(Self::Shift),
            "ctrl" | "control" => Ok(Self::Control),
            "alt" | "option" => Ok(Self::Alt),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
/// Modifier keys held during a pointer gesture.
pub struct Modifiers {
    /// Shift held.
    pub shift: bool,
    /// Control held.
    pub ctrl: bool,
    /// Alt held.
    pub alt: bool,
}

impl Modifiers {
    /// Only Shift held.
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };
    /// Nothing held.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// The nodes an active session tracks.
pub struct Branch {
    /// The node the session was started on.
    pub origin: NodeId,
    /// Lowest stable ancestor of `origin`; the selection never ascends above it.
    pub anchor: NodeId,
    /// The node currently treated as the whole selection.
    pub branch_root: NodeId,
    /// The highlighted node: `branch_root` or one of its element children.
    pub selected: NodeId,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Lifecycle of a selection session.
///
/// ```text
/// Inactive -> Active -> Inactive (after commit or cancel)
///               | ^
///               |_|  (navigate in / out)
/// ```
pub enum SelectionState {
    /// No session; gestures, clicks and leaves are ignored.
    #[default]
    Inactive,
    /// A session is running over the given branch.
    Active(Branch),
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Result of committing a selection.
pub struct Commit {
    /// What was handed to the clipboard.
    pub payload: Payload,
    /// Whether the clipboard write succeeded.
    pub copied: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Behaviour knobs taken from [`Config`].
pub struct SelectionOptions {
    /// Modifier required for wheel navigation.
    pub qualifier: Qualifier,
    /// Table field separator.
    pub delimiter: char,
    /// Confirmation after a successful commit.
    pub confirmation: String,
    /// Confirmation after a commit whose copy failed, when failures are surfaced.
    pub copy_failed_message: String,
    /// Whether a failed copy changes the confirmation.
    pub surface_copy_failure: bool,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SelectionOptions {
    fn from(config: &Config) -> Self {
        Self {
            qualifier: config.qualifier(),
            delimiter: config.delimiter(),
            confirmation: config.confirmation.clone(),
            copy_failed_message: config.copy_failed_message.clone(),
            surface_copy_failure: config.surface_copy_failure,
        }
    }
}

#[derive(Debug, Default)]
/// Owns the single selection session of a page.
pub struct SelectionController {
    state: SelectionState,
    options: SelectionOptions,
}

impl SelectionController {
    #[must_use]
    /// Creates an inactive controller.
    pub fn new(options: SelectionOptions) -> Self {
        Self {
            state: SelectionState::Inactive,
            options,
        }
    }

    #[must_use]
    /// Current lifecycle state.
    pub fn state(&self) -> SelectionState {
        self.state
    }

    #[must_use]
    /// The active branch, if a session is running.
    pub fn branch(&self) -> Option<Branch> {
        match self.state {
            SelectionState::Active(branch) => Some(branch),
            SelectionState::Inactive => None,
        }
    }

    #[must_use]
    /// The node that currently has listeners attached.
    pub fn live(&self) -> Option<NodeId> {
        self.branch().map(|branch| branch.selected)
    }

    #[must_use]
    /// Options in force.
    pub fn options(&self) -> &SelectionOptions {
        &self.options
    }

    /// Starts a session on `node`, beginning with the branch [`locate`] finds for it.
    ///
    /// A session already in progress is cancelled first.
    pub fn initialize<P: Presenter>(&mut self, page: &Page, presenter: &mut P, node: NodeId) {
        if self.branch().is_some() {
            self.cancel(presenter);
        }
        let anchor = locate(page, node);
        self.state = SelectionState::Active(Branch {
            origin: node,
            anchor,
            branch_root: anchor,
            selected: anchor,
        });
        info!(origin = %page.describe(node), anchor = %page.describe(anchor), "selection started");
        Self::show(page, presenter, anchor);
        presenter.attach_listeners(anchor);
    }

    /// Handles a wheel gesture: ignored unless the qualifier is held, then negative deltas
    /// widen the selection and the rest narrow or cycle it.
    ///
    /// Returns whether the selection changed.
    pub fn on_wheel<P: Presenter>(
        &mut self,
        page: &Page,
        presenter: &mut P,
        delta_y: f64,
        modifiers: Modifiers,
    ) -> bool {
        if !self.options.qualifier.held(modifiers) {
            return false;
        }
        if delta_y < 0.0 {
            self.navigate_out(page, presenter)
        } else {
            self.navigate_in(page, presenter)
        }
    }

    /// Widens the selection to the branch root's parent, never above the anchor.
    ///
    /// Returns whether the selection changed.
    pub fn navigate_out<P: Presenter>(&mut self, page: &Page, presenter: &mut P) -> bool {
        let Some(branch) = self.branch() else {
            return false;
        };
        if branch.branch_root == branch.anchor {
            return false;
        }
        let Some(parent) = page.parent(branch.branch_root) else {
            return false;
        };
        if !page.contains(branch.anchor, parent) {
            return false;
        }
        self.move_to(
            page,
            presenter,
            Branch {
                branch_root: parent,
                selected: parent,
                ..branch
            },
        );
        true
    }

    /// Narrows the selection: descends through a single child, otherwise cycles the selected
    /// node through the branch root's children in document order.
    ///
    /// Returns whether the selection changed.
    pub fn navigate_in<P: Presenter>(&mut self, page: &Page, presenter: &mut P) -> bool {
        let Some(branch) = self.branch() else {
            return false;
        };
        let children = page.children(branch.branch_root);
        let next = match children.as_slice() {
            [] => return false,
            [only] => Branch {
                branch_root: *only,
                selected: *only,
                ..branch
            },
            _ => {
                let selected = match children.iter().position(|&c| c == branch.selected) {
                    Some(i) => children[(i + 1) % children.len()],
                    None => children[0],
                };
                Branch { selected, ..branch }
            }
        };
        self.move_to(page, presenter, next);
        true
    }

    /// Extracts the selected node, hands the payload to the clipboard, confirms, and ends the
    /// session. Does nothing while inactive.
    pub fn commit<P: Presenter>(&mut self, page: &Page, presenter: &mut P) -> Option<Commit> {
        let branch = self.branch()?;
        let selected = branch.selected;

        let text = page.inner_text(selected);
        let object = parse_table_text_with(&text, self.options.delimiter);
        let payload = Payload::capture(page, selected, text, object);

        let copied = match payload
            .to_json()
            .and_then(|json| presenter.copy_to_clipboard(&json))
        {
            Ok(()) => {
                debug!(node = %page.describe(selected), "copied to clipboard");
                true
            }
            Err(e) => {
                warn!(node = %page.describe(selected), error = %e, "copy failed");
                false
            }
        };

        let message = if !copied && self.options.surface_copy_failure {
            &self.options.copy_failed_message
        } else {
            &self.options.confirmation
        };
        presenter.confirm(selected, message);

        presenter.detach_listeners(selected);
        presenter.remove_highlight();
        self.state = SelectionState::Inactive;
        info!(
            node = %page.describe(selected),
            rows = payload.object.len(),
            copied,
            "selection committed"
        );

        Some(Commit { payload, copied })
    }

    /// Abandons the session without side effects beyond clearing the highlight and listeners.
    pub fn cancel<P: Presenter>(&mut self, presenter: &mut P) {
        let Some(branch) = self.branch() else {
            return;
        };
        presenter.detach_listeners(branch.selected);
        presenter.remove_highlight();
        self.state = SelectionState::Inactive;
        debug!(node = %branch.selected, "selection cancelled");
    }

    fn move_to<P: Presenter>(&mut self, page: &Page, presenter: &mut P, next: Branch) {
        if let Some(previous) = self.live() {
            presenter.detach_listeners(previous);
        }
        self.state = SelectionState::Active(next);
        debug!(
            branch_root = %page.describe(next.branch_root),
            selected = %page.describe(next.selected),
            "selection moved"
        );
        Self::show(page, presenter, next.selected);
        presenter.attach_listeners(next.selected);
    }

    /// Outlines `node`, falling back to a static copy when its geometry is restricted.
    fn show<P: Presenter>(page: &Page, presenter: &mut P, node: NodeId) {
        match page.bounding_rect(node) {
            Ok(_) => presenter.highlight(page, node),
            Err(GeometryError::Restricted(_)) => {
                debug!(node = %page.describe(node), "geometry restricted, rendering overlay");
                presenter.render_overlay(page.clone_subtree(node));
            }
            Err(e) => error!(error = %e, "unexpected failure while highlighting"),
        }
    }
}

#[cfg(test)]
#[path = "tests/selection.rs"]
mod tests;
