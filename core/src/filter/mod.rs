//! Filter state and the visible subset
//!
//! This module provides:
//! - **Matching**: the pure `matches` / `filtered_subset` functions
//! - **Manager**: [`FilterManager`], the single owner of filter state, the
//!   visible subset and the permalink
//! - **Observers**: the [`FilterObserver`] trait views implement to hear
//!   about changes
//!
//! # Mutation paths
//!
//! Every mutation recomputes the subset and replaces the URL. Notifying
//! mutations carry [`Propagation::Render`]; silent ones carry
//! [`Propagation::Silent`] and are used by visualizations that animate their
//! own transition.

mod manager;
#[cfg(test)]
mod manager_tests;

use atlas_types::{CreatorRecord, Facet, FilterState, RecordId};

use crate::dataset::FacetOption;

pub use manager::FilterManager;

/// Whether a change should re-render the active view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Render,
    Silent,
}

/// Snapshot handed to observers after every recompute.
#[derive(Debug, Clone, Copy)]
pub struct FilterChange<'a> {
    pub propagation: Propagation,
    pub state: &'a FilterState,
    pub visible: &'a [RecordId],
    pub permalink: &'a str,
}

/// Trait for components that react to filter changes.
/// Implement this for result counters, view renderers, badges, etc.
pub trait FilterObserver {
    /// Called after every mutation, notifying or silent.
    fn on_filter_change(&mut self, change: &FilterChange<'_>);
}

/// Whether a record passes every constrained facet and the search term.
///
/// A record without a value never matches a constrained facet, but passes an
/// unconstrained one.
pub fn matches(record: &CreatorRecord, state: &FilterState) -> bool {
    let facets_match = Facet::ALL.iter().all(|&facet| {
        let active = state.facet(facet);
        active.is_empty()
            || record
                .facet_value(facet)
                .is_some_and(|value| active.contains(value))
    });

    facets_match && (state.search.is_empty() || matches_search(record, &state.search))
}

fn matches_search(record: &CreatorRecord, search: &str) -> bool {
    let needle = search.to_lowercase();
    [
        Some(record.name.as_str()),
        Some(record.channel.as_str()),
        record.topic.as_deref(),
        Some(record.geography.as_str()),
        Some(record.group.as_str()),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(&needle))
}

/// Ids of matching records, in source order.
pub fn filtered_subset(records: &[CreatorRecord], state: &FilterState) -> Vec<RecordId> {
    records
        .iter()
        .filter(|record| matches(record, state))
        .map(|record| record.id)
        .collect()
}

/// Sidebar options whose label contains `query`, case-insensitively.
pub fn search_options<'a>(options: &'a [FacetOption], query: &str) -> Vec<&'a FacetOption> {
    let query = query.trim().to_lowercase();
    options
        .iter()
        .filter(|option| query.is_empty() || option.value.to_lowercase().contains(&query))
        .collect()
}
