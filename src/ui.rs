//! The terminal presenter and the drawing of the session state.
//!
//! [`TuiPresenter`] records what the engine asks to show so [`draw`] can render it: the outline
//! marks the highlighted and live nodes, the preview pane shows the text a commit would extract,
//! and a scan opens a modal with heading pairs. The outline uses box-drawing characters for the
//! page tree.

use crate::app_state::{AppState, View};
use crate::messages::{overlay_lines, DomainCounts};
use crate::node::{NodeId, Page};
use crate::present::Presenter;
use crate::scan::HeadingPair;
use crate::selection::Qualifier;
use crate::{Error, Result};
use arboard::Clipboard;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use tracing::debug;

/// Presenter backing the terminal front end.
pub struct TuiPresenter {
    use_system_clipboard: bool,
    clipboard: Option<Clipboard>,
    /// Node outlined in the page view.
    pub highlighted: Option<NodeId>,
    /// Static copy shown when the highlighted node's geometry is restricted.
    pub overlay: Option<Page>,
    /// Node whose gestures currently reach the engine.
    pub listening: Option<NodeId>,
    /// Text most recently placed on the clipboard.
    pub last_copied: Option<String>,
    /// Confirmation from the latest commit.
    pub confirmation: Option<String>,
    /// Pairs from the latest scan, while the modal is open.
    pub pairs: Option<Vec<HeadingPair>>,
    /// Per-domain request lines for the overlay.
    pub domain_lines: Vec<String>,
}

impl TuiPresenter {
    #[must_use]
    /// Creates a presenter. Without the system clipboard, copied text is only kept in
    /// `last_copied`.
    pub fn new(use_system_clipboard: bool) -> Self {
        Self {
            use_system_clipboard,
            clipboard: None,
            highlighted: None,
            overlay: None,
            listening: None,
            last_copied: None,
            confirmation: None,
            pairs: None,
            domain_lines: Vec::new(),
        }
    }

    fn system_clipboard(&mut self) -> Result<&mut Clipboard> {
        let clipboard = match self.clipboard.take() {
            Some(clipboard) => clipboard,
            None => Clipboard::new().map_err(|e| Error::Clipboard(e.to_string()))?,
        };
        Ok(self.clipboard.insert(clipboard))
    }
}

impl Presenter for TuiPresenter {
    fn highlight(&mut self, _page: &Page, node: NodeId) {
        self.overlay = None;
        self.highlighted = Some(node);
    }

    fn render_overlay(&mut self, clone: Page) {
        self.highlighted = None;
        self.overlay = Some(clone);
    }

    fn remove_highlight(&mut self) {
        self.highlighted = None;
        self.overlay = None;
    }

    fn attach_listeners(&mut self, node: NodeId) {
        self.listening = Some(node);
    }

    fn detach_listeners(&mut self, node: NodeId) {
        if self.listening == Some(node) {
            self.listening = None;
        }
    }

    fn copy_to_clipboard(&mut self, text: &str) -> Result<()> {
        if self.use_system_clipboard {
            self.system_clipboard()?
                .set_text(text.to_string())
                .map_err(|e| Error::Clipboard(e.to_string()))?;
        }
        self.last_copied = Some(text.to_string());
        Ok(())
    }

    fn confirm(&mut self, node: NodeId, message: &str) {
        debug!(%node, message, "confirmation");
        self.confirmation = Some(message.to_string());
    }

    fn show_pairs(&mut self, pairs: &[HeadingPair]) {
        self.pairs = Some(pairs.to_vec());
    }

    fn update_domain_counts(&mut self, counts: &DomainCounts) {
        self.domain_lines = overlay_lines(counts);
    }
}

/// Renders the outline, preview and help bar, with the pairs modal on top when open.
pub fn draw(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[0]);

    draw_outline(f, app, panes[0]);
    draw_preview(f, app, panes[1]);
    draw_help(f, app, chunks[1]);

    if app.view == View::Pairs {
        draw_pairs(f, app);
    }
}

/// Generate box-drawing prefix for tree structure
fn get_tree_prefix(level: usize, is_last: bool, parent_states: &[bool]) -> String {
    if level == 0 {
        return String::new();
    }

    let mut prefix = String::new();
    for i in 0..level.saturating_sub(1) {
        if parent_states.get(i).copied().unwrap_or(false) {
            prefix.push_str("│   ");
        } else {
            prefix.push_str("    ");
        }
    }
    if is_last {
        prefix.push_str("└── ");
    } else {
        prefix.push_str("├── ");
    }
    prefix
}

fn last_at_level(app: &AppState) -> Vec<bool> {
    app.rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            !app.rows[i + 1..]
                .iter()
                .take_while(|next| next.depth >= row.depth)
                .any(|next| next.depth == row.depth)
        })
        .collect()
}

fn draw_outline(f: &mut Frame, app: &AppState, area: Rect) {
    let presenter = app.context.presenter();
    let branch = app.context.controller().branch();
    let is_last = last_at_level(app);
    let mut parent_has_siblings: Vec<bool> = Vec::new();

    let items: Vec<ListItem> = app
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            parent_has_siblings.truncate(row.depth);
            while parent_has_siblings.len() < row.depth {
                parent_has_siblings.push(false);
            }
            if let Some(last) = parent_has_siblings.last_mut() {
                *last = !is_last[i];
            }
            let prefix = get_tree_prefix(row.depth, is_last[i], &parent_has_siblings);

            let label_style = if presenter.listening == Some(row.node) {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else if branch.is_some_and(|b| b.branch_root == row.node) {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            };
            let mut spans = vec![
                Span::raw(prefix),
                Span::styled(row.label.clone(), label_style),
            ];
            if presenter.highlighted == Some(row.node) {
                spans.push(Span::styled(" ◀", Style::default().fg(Color::Yellow)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = if branch.is_some() {
        format!("{} (SELECTING)", app.source)
    } else {
        app.source.clone()
    };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default().with_selected(Some(app.cursor));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_preview(f: &mut Frame, app: &AppState, area: Rect) {
    let presenter = app.context.presenter();
    let page = app.context.page();

    let (title, text) = if let Some(overlay) = &presenter.overlay {
        (
            format!(
                "Selection: {} (static copy)",
                overlay.describe(overlay.root())
            ),
            overlay.inner_text(overlay.root()),
        )
    } else if let Some(live) = app.context.controller().live() {
        (
            format!("Selection: {}", page.describe(live)),
            page.inner_text(live),
        )
    } else if let Some(pointer) = app.pointer() {
        (
            format!("Pointer: {}", page.describe(pointer)),
            page.inner_text(pointer),
        )
    } else {
        ("Preview".to_string(), String::new())
    };

    let area = if presenter.domain_lines.is_empty() {
        area
    } else {
        let height = u16::try_from(presenter.domain_lines.len() + 2).unwrap_or(u16::MAX);
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(height)])
            .split(area);
        let lines: Vec<Line> = presenter
            .domain_lines
            .iter()
            .map(|line| Line::from(line.as_str()))
            .collect();
        let requests =
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Requests"));
        f.render_widget(requests, split[1]);
        split[0]
    };

    // Tabs would be expanded unevenly by the terminal.
    let shown = text.replace('\t', " │ ");
    let preview = Paragraph::new(shown)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(preview, area);
}

fn qualifier_label(qualifier: Qualifier) -> &'static str {
    match qualifier {
        Qualifier::Shift => "Shift",
        Qualifier::Control => "Ctrl",
        Qualifier::Alt => "Alt",
    }
}

fn draw_help(f: &mut Frame, app: &AppState, area: Rect) {
    let qualifier = qualifier_label(app.context.controller().options().qualifier);
    let help = if let Some(msg) = &app.message {
        msg.clone()
    } else if app.view == View::Pairs {
        "Esc: Close".to_string()
    } else if app.context.controller().live().is_some() {
        format!("{qualifier}+↑: Widen | {qualifier}+↓: Next child | Enter: Clip | ↑/↓: Move away")
    } else {
        "↑/↓: Move | g: Pick here | s: Scan headings | q: Quit".to_string()
    };
    let help_widget = Paragraph::new(help).block(Block::default().borders(Borders::ALL));
    f.render_widget(help_widget, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn draw_pairs(f: &mut Frame, app: &AppState) {
    let Some(pairs) = &app.context.presenter().pairs else {
        return;
    };
    let area = centered_rect(80, 70, f.area());
    let width = usize::from(area.width.saturating_sub(4));

    let items: Vec<ListItem> = pairs
        .iter()
        .map(|pair| {
            let excerpt: String = pair
                .content
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .chars()
                .take(width)
                .collect();
            ListItem::new(vec![
                Line::from(Span::styled(
                    pair.heading.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(excerpt, Style::default().fg(Color::Gray))),
            ])
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Heading pairs ({})", pairs.len())),
    );
    f.render_widget(Clear, area);
    f.render_widget(list, area);
}

#[cfg(test)]
#[path = "tests/ui.rs"]
mod tests;
