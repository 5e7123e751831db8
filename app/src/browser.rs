//! Browser bindings
//!
//! History, clipboard, fetch and clock access for the explorer, backed by
//! `web_sys`. Everything degrades to a no-op when the window is missing.

use std::time::Duration;

use atlas_core::{
    ClipboardError, Clipboard, Dataset, DrawerState, HistoryPort, LoadError, LoaderConfig,
};
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

// ─────────────────────────────────────────────────────────────────────────────
// Location
// ─────────────────────────────────────────────────────────────────────────────

fn location() -> Option<web_sys::Location> {
    web_sys::window().map(|w| w.location())
}

/// Page path without query, e.g. `/atlas/`.
pub fn base_path() -> String {
    location()
        .and_then(|l| l.pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// Current query string including the leading `?`, or empty.
pub fn query() -> String {
    location().and_then(|l| l.search().ok()).unwrap_or_default()
}

pub fn origin() -> String {
    location().and_then(|l| l.origin().ok()).unwrap_or_default()
}

pub fn viewport_width() -> u32 {
    web_sys::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|v| v.as_f64())
        .map(|w| w.max(0.0) as u32)
        .unwrap_or(1280)
}

/// Scroll offset of the element with `id`, or 0 when it is missing.
pub fn scroll_top(id: &str) -> f64 {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
        .map_or(0.0, |e| f64::from(e.scroll_top()))
}

/// Milliseconds since page load as a monotonic clock.
pub fn now() -> Duration {
    let ms = web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0);
    Duration::from_secs_f64(ms.max(0.0) / 1000.0)
}

// ─────────────────────────────────────────────────────────────────────────────
// History
// ─────────────────────────────────────────────────────────────────────────────

/// `window.history` as a [`HistoryPort`].
///
/// Drawer entries carry the state name (`"peek"`, `"full"`, ...) as their
/// payload, so a popstate can be matched back to a drawer state.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserHistory;

impl BrowserHistory {
    fn history() -> Option<web_sys::History> {
        web_sys::window().and_then(|w| w.history().ok())
    }
}

impl HistoryPort for BrowserHistory {
    fn replace_url(&mut self, url: &str) {
        let Some(history) = Self::history() else {
            return;
        };
        let state = history.state().unwrap_or(JsValue::NULL);
        if let Err(e) = history.replace_state_with_url(&state, "", Some(url)) {
            warn!(url, error = ?e, "history.replaceState failed");
        }
    }

    fn push_drawer_entry(&mut self, state: DrawerState) {
        let Some(history) = Self::history() else {
            return;
        };
        if let Err(e) = history.push_state(&JsValue::from_str(state.as_str()), "") {
            warn!(state = state.as_str(), error = ?e, "history.pushState failed");
        }
    }

    fn current_drawer_entry(&self) -> Option<DrawerState> {
        Self::history()?
            .state()
            .ok()?
            .as_string()?
            .parse()
            .ok()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Clipboard
// ─────────────────────────────────────────────────────────────────────────────

/// Async clipboard API. A write counts as done once the promise is issued;
/// a later rejection is only logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserClipboard;

impl Clipboard for BrowserClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let window = web_sys::window().ok_or_else(|| ClipboardError("no window".into()))?;
        if !window.is_secure_context() {
            return Err(ClipboardError("insecure context".into()));
        }
        let navigator = window.navigator();
        let has_api = js_sys::Reflect::has(&navigator, &JsValue::from_str("clipboard"))
            .unwrap_or(false);
        if !has_api {
            return Err(ClipboardError("navigator.clipboard missing".into()));
        }

        let promise = navigator.clipboard().write_text(text);
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                warn!(error = ?e, "Clipboard write rejected");
            }
        });
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dataset fetch
// ─────────────────────────────────────────────────────────────────────────────

fn http_error(url: &str, message: impl Into<String>) -> LoadError {
    LoadError::Http {
        url: url.to_string(),
        message: message.into(),
    }
}

fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// Fetch and normalize the dataset at `url`.
pub async fn fetch_dataset(url: &str, config: &LoaderConfig) -> Result<Dataset, LoadError> {
    let window = web_sys::window().ok_or_else(|| http_error(url, "no window"))?;

    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| http_error(url, js_message(&e)))?;
    let response: web_sys::Response = response
        .dyn_into()
        .map_err(|_| http_error(url, "fetch did not return a Response"))?;
    if !response.ok() {
        return Err(http_error(url, format!("HTTP {}", response.status())));
    }

    let text = response.text().map_err(|e| http_error(url, js_message(&e)))?;
    let body = JsFuture::from(text)
        .await
        .map_err(|e| http_error(url, js_message(&e)))?
        .as_string()
        .ok_or_else(|| http_error(url, "response body is not text"))?;

    Dataset::from_json_str(&body, config)
}

// ─────────────────────────────────────────────────────────────────────────────
// Window events
// ─────────────────────────────────────────────────────────────────────────────

/// Register `handler` for a window event for the page's lifetime.
pub fn listen(event: &str, handler: impl FnMut() + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let mut handler = handler;
    let closure = Closure::<dyn FnMut(JsValue)>::new(move |_: JsValue| handler());
    if let Err(e) = window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
    {
        warn!(event, error = ?e, "addEventListener failed");
    }
    closure.forget();
}
