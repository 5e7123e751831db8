//! Filter state manager
//!
//! Owns the active facets, the derived visible subset and the permalink.
//! Views never touch these directly; they call the operations below.

use std::rc::Rc;

use tracing::debug;

use atlas_types::{CreatorRecord, Facet, FilterState, RecordId};

use super::{FilterChange, FilterObserver, Propagation, filtered_subset};
use crate::dataset::Dataset;
use crate::history::HistoryPort;
use crate::permalink::permalink_url;

pub struct FilterManager {
    dataset: Rc<Dataset>,
    state: FilterState,
    visible: Vec<RecordId>,
    permalink: String,
    base_path: String,
    history: Box<dyn HistoryPort>,
    observers: Vec<Box<dyn FilterObserver>>,
}

impl FilterManager {
    /// Start with no active filters. The URL is left untouched until the
    /// first mutation or [`restore`](Self::restore).
    pub fn new(
        dataset: Rc<Dataset>,
        history: Box<dyn HistoryPort>,
        base_path: impl Into<String>,
    ) -> Self {
        let base_path = base_path.into();
        let visible = dataset.records().iter().map(|r| r.id).collect();
        Self {
            dataset,
            state: FilterState::default(),
            visible,
            permalink: base_path.clone(),
            base_path,
            history,
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn FilterObserver>) {
        self.observers.push(observer);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Read access
    // ─────────────────────────────────────────────────────────────────────────

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn visible_ids(&self) -> &[RecordId] {
        &self.visible
    }

    pub fn visible_records(&self) -> impl Iterator<Item = &CreatorRecord> {
        self.visible.iter().filter_map(|id| self.dataset.get(*id))
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn permalink(&self) -> &str {
        &self.permalink
    }

    /// Active facet values plus one for a search term.
    pub fn active_filter_count(&self) -> usize {
        self.state.active_count()
    }

    pub fn is_active(&self, facet: Facet, value: &str) -> bool {
        self.state.facet(facet).contains(value)
    }

    pub fn history_mut(&mut self) -> &mut dyn HistoryPort {
        self.history.as_mut()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Notifying mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Flip a facet value. Returns true when the value is now active.
    pub fn toggle(&mut self, facet: Facet, value: &str) -> bool {
        self.toggle_with(facet, value, Propagation::Render)
    }

    /// Returns false when the value was already active.
    pub fn add(&mut self, facet: Facet, value: &str) -> bool {
        self.add_with(facet, value, Propagation::Render)
    }

    /// Returns false when the value was not active.
    pub fn remove(&mut self, facet: Facet, value: &str) -> bool {
        self.mutate(Propagation::Render, |state| state.facet_mut(facet).remove(value))
    }

    pub fn clear_facet(&mut self, facet: Facet) {
        self.mutate(Propagation::Render, |state| state.facet_mut(facet).clear());
    }

    pub fn clear_all(&mut self) {
        self.mutate(Propagation::Render, FilterState::clear);
    }

    pub fn set_search(&mut self, text: &str) {
        self.mutate(Propagation::Render, |state| state.search = text.to_string());
    }

    /// Replace the whole state, e.g. from a decoded permalink at startup.
    pub fn restore(&mut self, restored: FilterState) {
        self.mutate(Propagation::Render, |state| *state = restored);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Silent mutations (in-visualization navigation)
    // ─────────────────────────────────────────────────────────────────────────

    pub fn toggle_silent(&mut self, facet: Facet, value: &str) -> bool {
        self.toggle_with(facet, value, Propagation::Silent)
    }

    pub fn add_silent(&mut self, facet: Facet, value: &str) -> bool {
        self.add_with(facet, value, Propagation::Silent)
    }

    pub fn clear_facet_silent(&mut self, facet: Facet) {
        self.mutate(Propagation::Silent, |state| state.facet_mut(facet).clear());
    }

    pub fn clear_all_silent(&mut self) {
        self.mutate(Propagation::Silent, FilterState::clear);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn toggle_with(&mut self, facet: Facet, value: &str, propagation: Propagation) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        self.mutate(propagation, |state| state.facet_mut(facet).toggle(value))
    }

    fn add_with(&mut self, facet: Facet, value: &str, propagation: Propagation) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        self.mutate(propagation, |state| state.facet_mut(facet).insert(value))
    }

    fn mutate<R>(&mut self, propagation: Propagation, f: impl FnOnce(&mut FilterState) -> R) -> R {
        let result = f(&mut self.state);
        self.recompute(propagation);
        result
    }

    fn recompute(&mut self, propagation: Propagation) {
        self.visible = filtered_subset(self.dataset.records(), &self.state);
        self.permalink = permalink_url(&self.base_path, &self.state);
        self.history.replace_url(&self.permalink);

        debug!(
            ?propagation,
            visible = self.visible.len(),
            total = self.dataset.len(),
            active = self.state.active_count(),
            "Filters recomputed"
        );

        let change = FilterChange {
            propagation,
            state: &self.state,
            visible: &self.visible,
            permalink: &self.permalink,
        };
        for observer in &mut self.observers {
            observer.on_filter_change(&change);
        }
    }
}
