//! Starter pack builder: selected creators, suggested name and a shareable link

use atlas_core::share::share_view;
use atlas_core::{AtlasEvent, ShareFeedback};
use dioxus::prelude::*;

use crate::app::use_atlas;
use crate::browser::{self, BrowserClipboard};

#[component]
pub fn PackPanel(enabled: bool, selected: usize) -> Element {
    let handle = use_atlas();
    let mut name = use_signal(String::new);
    let mut copied = use_signal(|| None::<ShareFeedback>);

    if !enabled && selected == 0 {
        return rsx! {};
    }

    let session = handle.session();
    let guard = session.read();
    let Some(explorer) = guard.explorer() else {
        return rsx! {};
    };
    let pack = explorer.pack();
    let origin = browser::origin();
    let from = format!("{origin}{}", explorer.permalink());
    let typed = name.read().clone();
    let share = explorer.pack_share(Some(typed.as_str()), &format!("{origin}/pack"), Some(from.as_str()));
    let counter = pack.counter_label();
    let limit = pack.limit();

    rsx! {
        aside { class: "pack-panel",
            div { class: "pack-header",
                h3 { "Starter pack" }
                span { class: "pack-counter", "{counter} (max {limit})" }
            }
            if enabled {
                div { class: "pack-actions",
                    button { onclick: move |_| handle.dispatch(AtlasEvent::PackPrefill), "Fill from view" }
                    if selected > 0 {
                        button { onclick: move |_| handle.dispatch(AtlasEvent::PackClear), "Clear" }
                    }
                }
            } else {
                p { class: "pack-hint", "Apply a filter to pick creators for a pack." }
            }
            ol { class: "pack-entries",
                for (index, entry) in pack.entries().iter().enumerate() {
                    li { key: "{entry.name}",
                        strong { "{entry.name}" }
                        span { class: "pack-channel", "{entry.channel}" }
                        button {
                            class: "pack-remove",
                            onclick: move |_| handle.dispatch(AtlasEvent::PackRemove(index)),
                            "Remove"
                        }
                    }
                }
            }
            if selected > 0 {
                div { class: "pack-share",
                    input {
                        r#type: "text",
                        placeholder: "{share.name}",
                        value: "{name}",
                        oninput: move |e| name.set(e.value()),
                    }
                    h4 { "{share.title}" }
                    p { class: "pack-text", "{share.text}" }
                    input { class: "pack-link", r#type: "text", readonly: true, value: "{share.link}" }
                    button {
                        onclick: {
                            let link = share.link.clone();
                            move |_| copied.set(Some(share_view(&mut BrowserClipboard, &link)))
                        },
                        "Copy pack link"
                    }
                    {copied.read().as_ref().map(|feedback| rsx! {
                        span { class: "share-feedback", "{feedback.message()}" }
                    })}
                }
            }
        }
    }
}
