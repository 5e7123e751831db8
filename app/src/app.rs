#![allow(non_snake_case)]

use std::rc::Rc;
use std::time::Duration;

use atlas_core::{
    AtlasConfig, AtlasEvent, AtlasSession, Explorer, LoaderConfig, Screen, ShareFeedback, ViewKind,
};
use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use tracing::{debug, error, info};

use crate::browser::{self, BrowserClipboard, BrowserHistory};
use crate::components::{DrawerSheet, PackPanel, sidebar, view_pane};

static CSS: Asset = asset!("/assets/styles.css");

// ─────────────────────────────────────────────────────────────────────────────
// Session handle
// ─────────────────────────────────────────────────────────────────────────────

/// Shared access to the explorer session and its timers.
///
/// Access via `use_atlas()` from any component.
#[derive(Clone, Copy)]
pub struct AtlasHandle {
    session: Signal<AtlasSession>,
    /// Earliest timer currently waiting to tick the explorer
    armed: Signal<Option<Duration>>,
    feedback: Signal<Option<ShareFeedback>>,
}

impl AtlasHandle {
    fn new() -> Self {
        Self {
            session: Signal::new(AtlasSession::Loading),
            armed: Signal::new(None),
            feedback: Signal::new(None),
        }
    }

    pub fn session(&self) -> Signal<AtlasSession> {
        self.session
    }

    pub fn feedback(&self) -> Option<ShareFeedback> {
        self.feedback.read().clone()
    }

    async fn load(mut self) {
        let config = AtlasConfig::default();
        let loader = LoaderConfig::from(&config);
        let url = config.data_source.clone();

        match browser::fetch_dataset(&url, &loader).await {
            Ok(dataset) => {
                info!(url, records = dataset.len(), dropped = dataset.dropped(), "Dataset loaded");
                let mut explorer = Explorer::new(
                    Rc::new(dataset),
                    Box::new(BrowserHistory),
                    config,
                    &browser::base_path(),
                    browser::viewport_width(),
                );
                explorer.restore_permalink(&browser::query());
                self.session.set(AtlasSession::Ready(Box::new(explorer)));
            }
            Err(e) => {
                error!(url, error = %e, "Dataset load failed");
                self.session.set(AtlasSession::Failed(e));
            }
        }
    }

    /// Feed one UI event to the explorer and arm a timer for whatever it scheduled.
    pub fn dispatch(mut self, event: AtlasEvent) {
        let now = browser::now();
        let deadline = {
            let mut session = self.session.write();
            let Some(explorer) = session.explorer_mut() else {
                return;
            };
            let redraw = explorer.handle(now, event);
            debug!(?redraw, "Event handled");
            explorer.next_deadline()
        };
        self.arm(deadline);
    }

    /// Copy the current view's link.
    pub fn share(mut self) {
        let origin = browser::origin();
        let feedback = {
            let mut session = self.session.write();
            let Some(explorer) = session.explorer_mut() else {
                return;
            };
            explorer.share(&mut BrowserClipboard, &origin)
        };
        self.feedback.set(Some(feedback));
    }

    pub fn dismiss_feedback(mut self) {
        self.feedback.set(None);
    }

    fn arm(mut self, deadline: Option<Duration>) {
        let Some(deadline) = deadline else {
            return;
        };
        if let Some(armed) = *self.armed.peek()
            && armed <= deadline
        {
            return;
        }
        self.armed.set(Some(deadline));

        let wait = deadline.saturating_sub(browser::now());
        let wait_ms = u32::try_from(wait.as_millis()).unwrap_or(u32::MAX);
        wasm_bindgen_futures::spawn_local(async move {
            TimeoutFuture::new(wait_ms).await;
            if *self.armed.peek() == Some(deadline) {
                self.armed.set(None);
            }
            let next = {
                let mut session = self.session.write();
                let Some(explorer) = session.explorer_mut() else {
                    return;
                };
                let redraw = explorer.tick(browser::now());
                debug!(?redraw, "Timer fired");
                explorer.next_deadline()
            };
            self.arm(next);
        });
    }
}

pub fn use_atlas() -> AtlasHandle {
    use_context::<AtlasHandle>()
}

// ─────────────────────────────────────────────────────────────────────────────
// Root component
// ─────────────────────────────────────────────────────────────────────────────

#[component]
pub fn App() -> Element {
    let handle = use_context_provider(AtlasHandle::new);

    use_future(move || async move {
        handle.load().await;
        browser::listen("popstate", move || handle.dispatch(AtlasEvent::HistoryBack));
        browser::listen("resize", move || {
            handle.dispatch(AtlasEvent::Resize(browser::viewport_width()))
        });
    });

    let session = handle.session();
    let guard = session.read();

    let content = match guard.screen() {
        Screen::Loading => rsx! {
            div { class: "atlas-status", "Loading creators..." }
        },
        Screen::Failed(message) => rsx! {
            div { class: "atlas-status atlas-error",
                h2 { "The atlas could not be loaded" }
                p { "{message}" }
            }
        },
        Screen::Ready(vm) => {
            let visible = vm.visible_count;
            let total = vm.total;
            let search = vm.search.to_string();
            let current = vm.view;
            let layout_class = if vm.is_mobile { "atlas-layout mobile" } else { "atlas-layout" };
            let notice = vm.notice.map(str::to_string);
            rsx! {
                header { class: "atlas-header",
                    h1 { "Independent Journalism Atlas" }
                    span { class: "atlas-count", "Showing {visible} of {total} creators" }
                    input {
                        class: "atlas-search",
                        r#type: "search",
                        placeholder: "Search creators, channels, tags...",
                        initial_value: "{search}",
                        oninput: move |e| handle.dispatch(AtlasEvent::SearchInput(e.value())),
                    }
                    nav { class: "view-tabs",
                        for kind in ViewKind::ALL {
                            button {
                                key: "{kind.as_str()}",
                                class: if kind == current { "view-tab active" } else { "view-tab" },
                                onclick: move |_| handle.dispatch(AtlasEvent::SetView(kind)),
                                "{kind.as_str()}"
                            }
                        }
                    }
                    ShareButton {}
                }
                {notice.map(|notice| rsx! { div { class: "atlas-notice", "{notice}" } })}
                div { class: layout_class,
                    {sidebar(handle, &vm)}
                    main { class: "atlas-main", {view_pane(handle, &vm)} }
                }
                PackPanel { enabled: vm.pack_enabled, selected: vm.pack_selected }
                if vm.is_mobile {
                    DrawerSheet { state: vm.drawer_state }
                }
            }
        }
    };

    rsx! {
        link { rel: "stylesheet", href: CSS }
        div { class: "atlas", {content} }
    }
}

#[component]
fn ShareButton() -> Element {
    let handle = use_atlas();

    rsx! {
        div { class: "share",
            button { class: "share-button", onclick: move |_| handle.share(), "Share view" }
            {handle.feedback().map(|feedback| {
                let message = feedback.message().to_string();
                match feedback {
                    ShareFeedback::Copied => rsx! {
                        span { class: "share-feedback", onclick: move |_| handle.dismiss_feedback(),
                            "{message}"
                        }
                    },
                    ShareFeedback::ManualCopy(url) => rsx! {
                        div { class: "share-feedback manual",
                            span { "{message}" }
                            input { r#type: "text", readonly: true, value: "{url}" }
                            button { onclick: move |_| handle.dismiss_feedback(), "Done" }
                        }
                    },
                }
            })}
        }
    }
}
