//! Navigation history port
//!
//! Permalink updates replace the current entry; drawer transitions push
//! entries carrying the drawer state. The browser implementation lives in
//! the web front end, [`MemoryHistory`] backs the CLI and tests.

use std::cell::RefCell;
use std::rc::Rc;

use atlas_types::DrawerState;

/// Access to the host's navigation history.
pub trait HistoryPort {
    /// Point the current entry at `url` without adding an entry.
    fn replace_url(&mut self, url: &str);

    /// Add an entry whose payload is `state`.
    fn push_drawer_entry(&mut self, state: DrawerState);

    /// Drawer payload of the current entry, if it carries one.
    fn current_drawer_entry(&self) -> Option<DrawerState>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub url: String,
    pub drawer: Option<DrawerState>,
}

#[derive(Debug)]
struct Entries {
    stack: Vec<HistoryEntry>,
    cursor: usize,
}

/// In-memory history stack with browser-like push/replace/back.
///
/// Clones share the same stack, so a caller can hand one handle to the
/// filter manager and keep another to inspect it.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    inner: Rc<RefCell<Entries>>,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl MemoryHistory {
    pub fn new(initial_url: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Entries {
                stack: vec![HistoryEntry {
                    url: initial_url.into(),
                    drawer: None,
                }],
                cursor: 0,
            })),
        }
    }

    /// Number of entries up to and including the current one.
    pub fn depth(&self) -> usize {
        self.inner.borrow().cursor + 1
    }

    pub fn current_url(&self) -> String {
        let entries = self.inner.borrow();
        entries.stack[entries.cursor].url.clone()
    }

    /// Step back one entry, returning its drawer payload as a popstate would.
    ///
    /// Returns `None` at the first entry, where a browser would leave the page.
    pub fn back(&self) -> Option<Option<DrawerState>> {
        let mut entries = self.inner.borrow_mut();
        if entries.cursor == 0 {
            return None;
        }
        entries.cursor -= 1;
        Some(entries.stack[entries.cursor].drawer)
    }
}

impl HistoryPort for MemoryHistory {
    fn replace_url(&mut self, url: &str) {
        let mut entries = self.inner.borrow_mut();
        let cursor = entries.cursor;
        entries.stack[cursor].url = url.to_string();
    }

    fn push_drawer_entry(&mut self, state: DrawerState) {
        let mut entries = self.inner.borrow_mut();
        let cursor = entries.cursor;
        let url = entries.stack[cursor].url.clone();
        entries.stack.truncate(cursor + 1);
        entries.stack.push(HistoryEntry {
            url,
            drawer: Some(state),
        });
        entries.cursor += 1;
    }

    fn current_drawer_entry(&self) -> Option<DrawerState> {
        let entries = self.inner.borrow();
        entries.stack[entries.cursor].drawer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_does_not_grow_the_stack() {
        let mut history = MemoryHistory::new("/");
        history.replace_url("/?platform=Podcast");
        history.replace_url("/?platform=Podcast&topic=Sports");
        assert_eq!(history.depth(), 1);
        assert_eq!(history.current_url(), "/?platform=Podcast&topic=Sports");
    }

    #[test]
    fn push_then_back_restores_payload() {
        let mut history = MemoryHistory::new("/");
        history.push_drawer_entry(DrawerState::Full);
        history.push_drawer_entry(DrawerState::Peek);
        assert_eq!(history.current_drawer_entry(), Some(DrawerState::Peek));

        let shared = history.clone();
        assert_eq!(shared.back(), Some(Some(DrawerState::Full)));
        assert_eq!(history.depth(), 2);
        assert_eq!(shared.back(), Some(None));
        assert_eq!(shared.back(), None);
    }

    #[test]
    fn push_discards_forward_entries() {
        let mut history = MemoryHistory::new("/");
        history.push_drawer_entry(DrawerState::Full);
        history.push_drawer_entry(DrawerState::Peek);
        history.back();
        history.push_drawer_entry(DrawerState::Pill);
        assert_eq!(history.depth(), 3);
        assert_eq!(history.current_drawer_entry(), Some(DrawerState::Pill));
    }
}
