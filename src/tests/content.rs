use super::{Emission, PageContext, PointerEvent};
use crate::config::Config;
use crate::messages::Message;
use crate::node::{NodeId, Page};
use crate::recorder::Recorder;
use crate::selection::{Modifiers, SelectionState};

struct Fixture {
    ctx: PageContext<Recorder>,
    table: NodeId,
    rows: Vec<NodeId>,
    cells: Vec<NodeId>,
    aside: NodeId,
}

/// `html > body > [aside, table > tr*3 > td*2]`
fn fixture() -> Fixture {
    let mut page = Page::new("html");
    let body = page.append_tag(page.root(), "body");
    let aside = page.append_tag(body, "aside");
    page.append_text(aside, "sidebar");
    let table = page.append_tag(body, "table");
    let mut rows = Vec::new();
    let mut cells = Vec::new();
    for row in [["Name", "Qty"], ["Pear", "3"], ["Fig", "7"]] {
        let tr = page.append_tag(table, "tr");
        rows.push(tr);
        for value in row {
            let td = page.append_tag(tr, "td");
            page.append_text(td, value);
            cells.push(td);
        }
    }
    Fixture {
        ctx: PageContext::new(page, Recorder::default(), &Config::default()),
        table,
        rows,
        cells,
        aside,
    }
}

fn wheel(target: NodeId, delta_y: f64) -> PointerEvent {
    PointerEvent::Wheel {
        target,
        delta_y,
        modifiers: Modifiers::SHIFT,
    }
}

#[test]
fn test_activation_without_right_click_is_ignored() {
    let mut f = fixture();

    assert!(f.ctx.handle_message(&Message::Activate).is_none());
    assert_eq!(f.ctx.controller().state(), SelectionState::Inactive);
    assert!(f.ctx.presenter().live.is_empty());
}

#[test]
fn test_right_click_then_activate_starts_session() {
    let mut f = fixture();

    f.ctx.handle_pointer(PointerEvent::ContextMenu(f.cells[3]));
    f.ctx.handle_message(&Message::Activate);

    // td (0) -> tr (2) -> table (3); body has 2 children, fewer than 3.
    let branch = f.ctx.controller().branch().unwrap();
    assert_eq!(branch.origin, f.cells[3]);
    assert_eq!(branch.anchor, f.table);
    assert_eq!(f.ctx.presenter().live, vec![f.table]);
}

#[test]
fn test_wheel_outside_live_node_is_ignored() {
    let mut f = fixture();
    f.ctx.handle_pointer(PointerEvent::ContextMenu(f.cells[0]));
    f.ctx.handle_message(&Message::Activate);

    f.ctx.handle_pointer(wheel(f.aside, 1.0));
    assert_eq!(f.ctx.controller().live(), Some(f.table));

    f.ctx.handle_pointer(wheel(f.cells[4], 1.0));
    assert_eq!(f.ctx.controller().live(), Some(f.rows[0]));
}

#[test]
fn test_leave_cancels_only_on_live_node() {
    let mut f = fixture();
    f.ctx.handle_pointer(PointerEvent::ContextMenu(f.cells[0]));
    f.ctx.handle_message(&Message::Activate);

    f.ctx.handle_pointer(PointerEvent::Leave(f.rows[1]));
    assert_eq!(f.ctx.controller().live(), Some(f.table));

    f.ctx.handle_pointer(PointerEvent::Leave(f.table));
    assert_eq!(f.ctx.controller().state(), SelectionState::Inactive);
    assert_eq!(f.ctx.presenter().highlighted, None);
    assert!(f.ctx.presenter().live.is_empty());

    f.ctx.handle_pointer(PointerEvent::Leave(f.table));
    assert_eq!(f.ctx.controller().state(), SelectionState::Inactive);
}

#[test]
fn test_click_inside_live_node_commits_table() {
    let mut f = fixture();
    f.ctx.handle_pointer(PointerEvent::ContextMenu(f.cells[5]));
    f.ctx.handle_message(&Message::Activate);

    let Some(Emission::Clip(commit)) = f.ctx.handle_pointer(PointerEvent::Click(f.cells[2]))
    else {
        panic!("expected a commit");
    };

    assert_eq!(commit.payload.tag, "TABLE");
    assert_eq!(commit.payload.text, "Name\tQty\nPear\t3\nFig\t7");
    assert_eq!(commit.payload.object.len(), 3);
    assert!(commit.payload.object.rows[0].is_header());
    assert!(f.ctx.presenter().clipboard.is_some());

    assert!(f
        .ctx
        .handle_pointer(PointerEvent::Click(f.cells[2]))
        .is_none());
}

#[test]
fn test_click_outside_live_node_does_nothing() {
    let mut f = fixture();
    f.ctx.handle_pointer(PointerEvent::ContextMenu(f.cells[0]));
    f.ctx.handle_message(&Message::Activate);

    assert!(f.ctx.handle_pointer(PointerEvent::Click(f.aside)).is_none());
    assert_eq!(f.ctx.controller().live(), Some(f.table));
}

#[test]
fn test_scan_message_shows_pairs_only_when_found() {
    let mut f = fixture();

    let emitted = f.ctx.handle_message(&Message::Scan);

    assert_eq!(emitted, Some(Emission::Pairs(Vec::new())));
    assert!(f.ctx.presenter().pairs.is_none());
}

#[test]
fn test_scan_message_pairs_heading_with_dense_block() {
    let mut page = Page::new("html");
    let body = page.append_tag(page.root(), "body");
    let h = page.append_tag(body, "h1");
    page.append_text(h, "Report");
    let wrapper = page.append_tag(body, "div");
    let p = page.append_tag(wrapper, "p");
    page.append_text(p, &"lorem ipsum ".repeat(12));
    let mut ctx = PageContext::new(page, Recorder::default(), &Config::default());

    let Some(Emission::Pairs(pairs)) = ctx.handle_message(&Message::Scan) else {
        panic!("expected pairs");
    };

    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].heading, "Report");
    assert_eq!(ctx.presenter().pairs.as_deref(), Some(pairs.as_slice()));
}

#[test]
fn test_domain_counts_reach_presenter() {
    let mut f = fixture();
    let counts = r#"{"type":"updateDomainCounts",
        "counts":{"a.com":{"count":2,"bytes":5,"formattedBytes":"5 B"}}}"#;
    let message = Message::from_json(counts).unwrap();

    assert!(f.ctx.handle_message(&message).is_none());
    let counts = f.ctx.presenter().domain_counts.as_ref().unwrap();
    assert_eq!(counts["a.com"].count, 2);
}
