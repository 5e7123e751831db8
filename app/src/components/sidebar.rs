//! Facet sidebar: one checkbox list per facet, each with its own option search.

use atlas_core::filter::search_options;
use atlas_core::{AtlasEvent, Facet, ViewModel};
use dioxus::prelude::*;

use crate::app::{AtlasHandle, use_atlas};

pub fn sidebar(handle: AtlasHandle, vm: &ViewModel<'_>) -> Element {
    let active_filters = vm.active_filters;

    rsx! {
        aside { class: "sidebar",
            div { class: "sidebar-header",
                h2 { "Filters" }
                if active_filters > 0 {
                    button {
                        class: "clear-all",
                        onclick: move |_| handle.dispatch(AtlasEvent::ClearAll),
                        "Clear all ({active_filters})"
                    }
                }
            }
            for panel in vm.sidebar.iter() {
                FacetSection {
                    key: "{panel.facet.param()}",
                    facet: panel.facet,
                    active: panel.active,
                }
            }
        }
    }
}

#[component]
fn FacetSection(facet: Facet, active: usize) -> Element {
    let handle = use_atlas();
    let mut query = use_signal(String::new);
    let mut collapsed = use_signal(|| false);

    let session = handle.session();
    let guard = session.read();
    let Some(explorer) = guard.explorer() else {
        return rsx! {};
    };
    let selected = explorer.state().facet(facet);
    let all = explorer.filters().dataset().index().facet_options(facet);
    let options = search_options(all, &query.read());
    let label = facet.label();

    rsx! {
        section { class: "facet",
            div { class: "facet-header",
                button {
                    class: "facet-toggle",
                    onclick: move |_| collapsed.toggle(),
                    if collapsed() { "▸" } else { "▾" }
                }
                h3 { "{label}" }
                if active > 0 {
                    span { class: "facet-count", "{active}" }
                    button {
                        class: "facet-clear",
                        onclick: move |_| handle.dispatch(AtlasEvent::ClearFacet(facet)),
                        "Clear"
                    }
                }
            }
            if !collapsed() {
                if all.len() > 8 {
                    input {
                        class: "facet-search",
                        r#type: "search",
                        placeholder: "Filter {label}...",
                        value: "{query}",
                        oninput: move |e| query.set(e.value()),
                    }
                }
                ul { class: "facet-options",
                    for option in options {
                        li { key: "{option.value}",
                            label { class: if selected.contains(&option.value) { "option active" } else { "option" },
                                input {
                                    r#type: "checkbox",
                                    checked: selected.contains(&option.value),
                                    onchange: {
                                        let value = option.value.clone();
                                        move |_| handle.dispatch(AtlasEvent::Toggle { facet, value: value.clone() })
                                    },
                                }
                                span { class: "option-label", "{option.value}" }
                                span { class: "option-count", "{option.count}" }
                            }
                        }
                    }
                }
            }
        }
    }
}
