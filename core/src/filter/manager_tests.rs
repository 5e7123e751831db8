//! Tests for FilterManager mutation paths and matching rules

use atlas_types::{Facet, FilterState, ValueSet};

use super::{Propagation, filtered_subset, matches, search_options};
use crate::permalink::{decode, encode};
use crate::test_support::{Recorder, manager, sample_dataset};

fn names(manager: &super::FilterManager) -> Vec<String> {
    manager.visible_records().map(|r| r.name.clone()).collect()
}

#[test]
fn test_or_within_facet_and_across_facets() {
    let (mut manager, _) = manager();

    manager.toggle(Facet::Platform, "Podcast");
    manager.toggle(Facet::Platform, "Video - YouTube");
    assert_eq!(manager.visible_count(), 4);

    manager.toggle(Facet::Geography, "US");
    assert_eq!(names(&manager), vec!["Ada Lane", "Cy Park", "Fay Cole"]);
}

#[test]
fn test_missing_value_fails_constrained_facet_only() {
    let dataset = sample_dataset();
    let di = dataset.get(3).unwrap();
    assert!(di.platform.is_none());

    let mut state = FilterState::default();
    assert!(matches(di, &state));

    state.platform.insert("Podcast");
    assert!(!matches(di, &state));

    state.platform.clear();
    state.topic.insert("Labor");
    assert!(matches(di, &state));
}

#[test]
fn test_search_is_case_insensitive_across_fields() {
    let (mut manager, _) = manager();

    manager.set_search("BALLOTS");
    assert_eq!(names(&manager), vec!["Bo Reyes"]);

    manager.set_search("canada");
    assert_eq!(names(&manager), vec!["Eve Stone"]);

    manager.set_search("civic");
    assert_eq!(manager.visible_count(), 3);

    manager.set_search("");
    assert_eq!(manager.visible_count(), 6);
}

#[test]
fn test_subset_property() {
    let dataset = sample_dataset();
    let mut state = FilterState::default();
    state.group = ValueSet::from_iter(["Civic Life", "Money & Work"]);
    state.search = "l".into();

    let subset = filtered_subset(dataset.records(), &state);
    for record in dataset.records() {
        assert_eq!(subset.contains(&record.id), matches(record, &state));
    }
    assert!(subset.windows(2).all(|w| w[0] < w[1]), "source order kept");
}

#[test]
fn test_toggle_twice_is_idempotent() {
    let (mut manager, _) = manager();
    manager.toggle(Facet::Group, "Civic Life");
    let before_state = manager.state().clone();
    let before_visible = manager.visible_ids().to_vec();

    assert!(manager.toggle(Facet::Topic, "Elections"));
    assert!(!manager.toggle(Facet::Topic, "Elections"));

    assert_eq!(manager.state(), &before_state);
    assert_eq!(manager.visible_ids(), before_visible.as_slice());
}

#[test]
fn test_empty_values_are_never_stored() {
    let (mut manager, history) = manager();
    assert!(!manager.toggle(Facet::Platform, "  "));
    assert!(!manager.add_silent(Facet::Topic, ""));
    assert!(manager.state().is_empty());
    assert_eq!(history.current_url(), "/");
}

#[test]
fn test_every_mutation_replaces_url() {
    let (mut manager, history) = manager();

    manager.add(Facet::Platform, "Podcast");
    assert_eq!(history.current_url(), "/?platform=Podcast");
    assert_eq!(manager.permalink(), "/?platform=Podcast");

    manager.add_silent(Facet::Geography, "US");
    assert_eq!(history.current_url(), "/?platform=Podcast&geography=US");

    manager.clear_all_silent();
    assert_eq!(history.current_url(), "/");
    assert_eq!(history.depth(), 1, "permalink never pushes");
}

#[test]
fn test_observers_see_silent_and_notifying_changes() {
    let (mut manager, _) = manager();
    let recorder = Recorder::default();
    manager.subscribe(Box::new(recorder.clone()));

    manager.toggle(Facet::Group, "Civic Life");
    manager.clear_all_silent();
    manager.toggle_silent(Facet::Platform, "Podcast");
    manager.clear_facet(Facet::Platform);

    let seen = recorder.seen.borrow();
    let modes: Vec<_> = seen.iter().map(|(p, _, _)| *p).collect();
    assert_eq!(
        modes,
        vec![
            Propagation::Render,
            Propagation::Silent,
            Propagation::Silent,
            Propagation::Render
        ]
    );
    assert_eq!(seen[0].1, 3);
    assert_eq!(seen[2].1, 1);
    assert_eq!(recorder.renders(), 2);
}

#[test]
fn test_active_filter_count() {
    let (mut manager, _) = manager();
    manager.add(Facet::Group, "Civic Life");
    manager.add(Facet::Group, "Money & Work");
    manager.set_search("x");
    assert_eq!(manager.active_filter_count(), 3);

    manager.remove(Facet::Group, "Civic Life");
    manager.clear_facet_silent(Facet::Group);
    assert_eq!(manager.active_filter_count(), 1);
}

#[test]
fn test_restore_from_permalink_round_trips() {
    let (mut manager, history) = manager();
    manager.toggle(Facet::Group, "Science, Health & Environment");
    manager.toggle(Facet::Topic, "Climate, Energy");
    manager.set_search("warming up");
    let query = encode(manager.state());

    let (mut restored, _) = crate::test_support::manager();
    restored.restore(decode(&query));
    assert_eq!(restored.state(), manager.state());
    assert_eq!(restored.visible_ids(), &[4]);
    assert_eq!(history.current_url(), format!("/?{query}"));
}

#[test]
fn test_search_options_filters_sidebar_labels() {
    let dataset = sample_dataset();
    let options = dataset.index().facet_options(Facet::Platform);
    let hits: Vec<_> = search_options(options, "video")
        .iter()
        .map(|o| o.value.as_str())
        .collect();
    assert_eq!(hits, vec!["Video - YouTube"]);
    assert_eq!(search_options(options, " ").len(), options.len());
}
