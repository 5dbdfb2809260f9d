//! Undo/redo over whole-content snapshots.
//!
//! Every entry is the watched root's serialized inner markup. Restoring an
//! entry replaces the root's content wholesale, so after `undo` / `redo`
//! return `true` every node handle held elsewhere is stale and the caller
//! must rebuild its derived state (handles, tree view, selection).

use crate::host::Host;
use std::collections::VecDeque;

pub struct History {
    /// Oldest first; the last entry mirrors the live document.
    past: VecDeque<String>,
    future: Vec<String>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub const DEFAULT_CAPACITY: usize = 50;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            past: VecDeque::with_capacity(capacity.max(1)),
            future: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Capture the current content. Always discards the redo branch;
    /// pushes only when the capture differs from the newest entry. Returns
    /// whether an entry was pushed.
    pub fn commit<H: Host>(&mut self, host: &H) -> bool {
        self.future.clear();
        let state = host.snapshot();
        if self.past.back() == Some(&state) {
            return false;
        }
        self.past.push_back(state);
        if self.past.len() > self.capacity {
            self.past.pop_front();
        }
        log::debug!("history: committed ({} entries)", self.past.len());
        true
    }

    /// Step back one entry. The oldest entry is the floor and is never
    /// popped. Returns whether the content was replaced.
    pub fn undo<H: Host>(&mut self, host: &mut H) -> bool {
        if self.past.len() <= 1 {
            return false;
        }
        let Some(popped) = self.past.pop_back() else {
            return false;
        };
        self.future.push(popped);
        if let Some(state) = self.past.back() {
            host.restore(state);
        }
        log::debug!("history: undo ({} left)", self.past.len());
        true
    }

    /// Re-apply the most recently undone entry.
    pub fn redo<H: Host>(&mut self, host: &mut H) -> bool {
        let Some(state) = self.future.pop() else {
            return false;
        };
        host.restore(&state);
        self.past.push_back(state);
        if self.past.len() > self.capacity {
            self.past.pop_front();
        }
        log::debug!("history: redo ({} pending)", self.future.len());
        true
    }

    pub fn can_undo(&self) -> bool {
        self.past.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Newest entry, which mirrors the live content after a commit.
    pub fn current(&self) -> Option<&str> {
        self.past.back().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessHost;
    use pretty_assertions::assert_eq;

    fn edit(host: &mut HeadlessHost, text: &str) {
        let p = host.by_dom_id("p").unwrap();
        host.set_text(&p, text);
    }

    #[test]
    fn identical_commit_is_ignored() {
        let host = HeadlessHost::new(r#"<p id="p">a</p>"#).unwrap();
        let mut history = History::new();
        assert!(history.commit(&host));
        assert!(!history.commit(&host));
        assert_eq!(history.past_len(), 1);
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut host = HeadlessHost::new(r#"<p id="p">0</p>"#).unwrap();
        let mut history = History::with_capacity(3);
        for i in 0..5 {
            edit(&mut host, &i.to_string());
            history.commit(&host);
        }
        assert_eq!(history.past_len(), 3);
        assert!(history.undo(&mut host));
        assert!(history.undo(&mut host));
        assert!(!history.undo(&mut host));
        assert_eq!(host.snapshot(), r#"<p id="p">2</p>"#);
    }

    #[test]
    fn commit_discards_redo_branch() {
        let mut host = HeadlessHost::new(r#"<p id="p">a</p>"#).unwrap();
        let mut history = History::new();
        history.commit(&host);
        edit(&mut host, "b");
        history.commit(&host);
        assert!(history.undo(&mut host));
        assert!(history.can_redo());
        history.commit(&host);
        assert!(!history.can_redo());
        assert!(!history.redo(&mut host));
    }
}
