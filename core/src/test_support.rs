//! Shared fixtures for unit tests

use std::cell::RefCell;
use std::rc::Rc;

use crate::dataset::{Dataset, LoaderConfig};
use crate::filter::{FilterChange, FilterManager, FilterObserver, Propagation};
use crate::history::MemoryHistory;

pub const SAMPLE_JSON: &str = r#"[
    {"name": "Ada Lane", "channel": "Ada Reports", "platform": "Podcast", "group": "Civic Life", "geography": "US", "topic": "Local Politics, Housing"},
    {"name": "Bo Reyes", "channel": "Bo on Ballots", "platform": "Video - YouTube", "group": "Civic Life", "geography": "UK", "topic": "Elections"},
    {"name": "Cy Park", "channel": "Capitol Cy", "platform": "Video - YouTube", "group": "Power & Politics", "geography": "US"},
    {"name": "Di Moss", "channel": "Labor Lines", "group": "Money & Work", "geography": "US", "topic": "Labor"},
    {"name": "Eve Stone", "channel": "Warming Up", "platform": "Newsletter - Substack", "group": "Science, Health & Environment", "geography": "Canada", "topic": "Climate, Energy"},
    {"name": "Fay Cole", "channel": "Fay Explains", "platform": "Video - YouTube", "group": "Civic Life", "geography": "US", "topic": "Local Politics"}
]"#;

pub fn sample_dataset() -> Rc<Dataset> {
    Rc::new(Dataset::from_json_str(SAMPLE_JSON, &LoaderConfig::default()).unwrap())
}

pub fn manager() -> (FilterManager, MemoryHistory) {
    let history = MemoryHistory::new("/");
    let manager = FilterManager::new(sample_dataset(), Box::new(history.clone()), "/");
    (manager, history)
}

/// Observer that records each change it sees.
#[derive(Clone, Default)]
pub struct Recorder {
    pub seen: Rc<RefCell<Vec<(Propagation, usize, String)>>>,
}

impl Recorder {
    pub fn renders(&self) -> usize {
        self.seen
            .borrow()
            .iter()
            .filter(|(p, _, _)| *p == Propagation::Render)
            .count()
    }
}

impl FilterObserver for Recorder {
    fn on_filter_change(&mut self, change: &FilterChange<'_>) {
        self.seen.borrow_mut().push((
            change.propagation,
            change.visible.len(),
            change.permalink.to_string(),
        ));
    }
}
