//! A presenter that records what the engine asked it to do.

use crate::messages::DomainCounts;
use crate::node::{NodeId, Page};
use crate::present::Presenter;
use crate::scan::HeadingPair;
use crate::{Error, Result};

#[derive(Debug, Default)]
pub struct Recorder {
    pub highlighted: Option<NodeId>,
    pub highlight_count: usize,
    pub overlay: Option<Page>,
    pub live: Vec<NodeId>,
    pub clipboard: Option<String>,
    pub fail_copy: bool,
    pub confirmations: Vec<(NodeId, String)>,
    pub pairs: Option<Vec<HeadingPair>>,
    pub domain_counts: Option<DomainCounts>,
}

impl Presenter for Recorder {
    fn highlight(&mut self, _page: &Page, node: NodeId) {
        self.overlay = None;
        self.highlighted = Some(node);
        self.highlight_count += 1;
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
        if !self.live.contains(&node) {
            self.live.push(node);
        }
    }

    fn detach_listeners(&mut self, node: NodeId) {
        self.live.retain(|&live| live != node);
    }

    fn copy_to_clipboard(&mut self, text: &str) -> Result<()> {
        if self.fail_copy {
            return Err(Error::Clipboard("denied".to_string()));
        }
        self.clipboard = Some(text.to_string());
        Ok(())
    }

    fn confirm(&mut self, node: NodeId, message: &str) {
        self.confirmations.push((node, message.to_string()));
    }

    fn show_pairs(&mut self, pairs: &[HeadingPair]) {
        self.pairs = Some(pairs.to_vec());
    }

    fn update_domain_counts(&mut self, counts: &DomainCounts) {
        self.domain_counts = Some(counts.clone());
    }
}
