//! Mobile bottom drawer listing the members of the focused wheel node

use atlas_core::drawer::is_handle_drag;
use atlas_core::{AtlasEvent, DrawerState};
use dioxus::prelude::*;

use crate::app::use_atlas;
use crate::browser;

const CONTENT_ID: &str = "drawer-content";

#[component]
pub fn DrawerSheet(state: DrawerState) -> Element {
    let handle = use_atlas();
    // Pointer y where a handle drag or content pull started
    let mut drag_from = use_signal(|| None::<f64>);
    let mut pull_from = use_signal(|| None::<f64>);
    // Set when a handle drag ends so the click that follows is ignored
    let mut dragged = use_signal(|| false);

    let session = handle.session();
    let guard = session.read();
    let Some(content) = guard.explorer().and_then(|e| e.drawer().content()) else {
        return rsx! {};
    };
    if !state.is_visible() {
        return rsx! {};
    }

    let class = format!("drawer drawer-{}", state.as_str());
    let title = content.title.clone();

    rsx! {
        if state == DrawerState::Full {
            div {
                class: "drawer-backdrop",
                onclick: move |_| handle.dispatch(AtlasEvent::DrawerBackdrop),
            }
        }
        section { class: "{class}",
            div {
                class: "drawer-handle",
                onclick: move |_| {
                    if dragged() {
                        dragged.set(false);
                    } else {
                        handle.dispatch(AtlasEvent::DrawerHandle);
                    }
                },
                onpointerdown: move |e| {
                    dragged.set(false);
                    drag_from.set(Some(e.client_coordinates().y));
                },
                onpointerup: move |e| {
                    if let Some(start) = drag_from.take() {
                        let delta = e.client_coordinates().y - start;
                        if is_handle_drag(delta) {
                            dragged.set(true);
                            handle.dispatch(AtlasEvent::DrawerDragEnd(delta));
                        }
                    }
                },
                span { class: "drawer-grip" }
                h3 { class: "drawer-title", "{title}" }
                button {
                    class: "drawer-close",
                    onclick: move |e| {
                        e.stop_propagation();
                        handle.dispatch(AtlasEvent::DrawerClose);
                    },
                    "×"
                }
            }
            if state != DrawerState::Pill {
                div {
                    id: CONTENT_ID,
                    class: "drawer-content",
                    onscroll: move |_| handle.dispatch(AtlasEvent::DrawerScroll(browser::scroll_top(CONTENT_ID))),
                    onpointerdown: move |e| pull_from.set(Some(e.client_coordinates().y)),
                    onpointerup: move |e| {
                        if let Some(start) = pull_from.take() {
                            handle.dispatch(AtlasEvent::DrawerPull {
                                dy: e.client_coordinates().y - start,
                                at_top: browser::scroll_top(CONTENT_ID) <= 0.0,
                            });
                        }
                    },
                    for group in content.groups().iter() {
                        div { key: "{group.topic}", class: "drawer-group",
                            h4 { "{group.header()}" }
                            for card in group.visible().iter() {
                                a {
                                    key: "{card.id}",
                                    class: "drawer-card",
                                    href: "{card.link}",
                                    target: "_blank",
                                    rel: "noopener",
                                    strong { "{card.name}" }
                                    span { class: "drawer-channel", "{card.channel}" }
                                    span { class: "tag", "{card.tag}" }
                                }
                            }
                            {group.show_more_label().map(|label| {
                                let topic = group.topic.clone();
                                rsx! {
                                    button {
                                        class: "drawer-more",
                                        onclick: move |_| handle.dispatch(AtlasEvent::DrawerShowMore(topic.clone())),
                                        "{label}"
                                    }
                                }
                            })}
                        }
                    }
                }
            }
        }
    }
}
