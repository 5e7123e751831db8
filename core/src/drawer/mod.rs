//! Mobile bottom drawer
//!
//! The drawer is a linear state machine `Full > Peek > Pill > Closed`.
//! Entering a more visible state pushes one history entry carrying that
//! state, so the back gesture collapses the drawer one level at a time
//! before leaving the page. Transitions driven by back-navigation never push.

mod content;

use std::time::Duration;

use tracing::debug;

use atlas_types::DrawerState;

use crate::debounce::Debouncer;
use crate::history::HistoryPort;

pub use content::{DrawerCard, DrawerContent, TopicGroup};

/// Downward drag from full that collapses straight to the pill
const FULL_TO_PILL_PX: f64 = 160.0;
/// Drag distance that moves one level from full or peek
const ONE_LEVEL_PX: f64 = 60.0;
/// Upward drag from the pill that expands to full
const PILL_TO_FULL_PX: f64 = 40.0;
/// Pull-down at the top of the content that collapses full to peek
const CONTENT_PULL_PX: f64 = 14.0;
/// Handle travel up to this distance is a tap, not a drag
const TAP_SLOP_PX: f64 = 6.0;

/// Whether a handle press that travelled `delta_px` was a drag.
///
/// The click that follows a drag must not also count as a handle tap.
pub fn is_handle_drag(delta_px: f64) -> bool {
    delta_px.abs() > TAP_SLOP_PX
}

#[derive(Debug)]
pub struct DrawerMachine {
    state: DrawerState,
    content: Option<DrawerContent>,
    pending_open: Debouncer<DrawerContent>,
    /// Set while applying a back-navigation; suppresses history pushes
    from_popstate: bool,
}

impl DrawerMachine {
    pub fn new(open_delay: Duration) -> Self {
        Self {
            state: DrawerState::Closed,
            content: None,
            pending_open: Debouncer::new(open_delay),
            from_popstate: false,
        }
    }

    pub fn state(&self) -> DrawerState {
        self.state
    }

    pub fn content(&self) -> Option<&DrawerContent> {
        self.content.as_ref()
    }

    pub fn content_mut(&mut self) -> Option<&mut DrawerContent> {
        self.content.as_mut()
    }

    pub fn has_pending_open(&self) -> bool {
        self.pending_open.is_pending()
    }

    pub fn open_deadline(&self) -> Option<Duration> {
        self.pending_open.deadline()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Opening
    // ─────────────────────────────────────────────────────────────────────────

    /// Open with `content` after the configured delay. A drill made before
    /// the delay elapses replaces the pending open.
    pub fn schedule_open(&mut self, now: Duration, content: DrawerContent) {
        self.pending_open.schedule(now, content);
    }

    pub fn cancel_pending(&mut self) {
        self.pending_open.cancel();
    }

    /// Fire a due open. Returns true when the drawer content changed.
    pub fn tick(&mut self, now: Duration, history: &mut dyn HistoryPort) -> bool {
        match self.pending_open.poll(now) {
            Some(content) => self.open(content, history),
            None => false,
        }
    }

    /// Show `content` now. Empty content is ignored.
    ///
    /// An already expanded drawer swaps its content in place (scrolled to the
    /// top); a collapsed or closed one expands to full.
    pub fn open(&mut self, content: DrawerContent, history: &mut dyn HistoryPort) -> bool {
        if content.is_empty() {
            return false;
        }
        self.content = Some(content);
        if !matches!(self.state, DrawerState::Full | DrawerState::Peek) {
            self.set_state(DrawerState::Full, history);
        }
        true
    }

    /// Hide immediately and drop the content, e.g. when the wheel returns to its root.
    pub fn close(&mut self) {
        self.pending_open.cancel();
        self.content = None;
        if self.state != DrawerState::Closed {
            debug!(from = self.state.as_str(), "Drawer closed");
        }
        self.state = DrawerState::Closed;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Gestures
    // ─────────────────────────────────────────────────────────────────────────

    /// Close button: one level down.
    pub fn close_control(&mut self, history: &mut dyn HistoryPort) {
        match self.state {
            DrawerState::Full => self.set_state(DrawerState::Peek, history),
            DrawerState::Peek => self.set_state(DrawerState::Pill, history),
            DrawerState::Pill | DrawerState::Closed => self.close(),
        }
    }

    /// The backdrop only takes taps while the drawer is full.
    pub fn backdrop_tap(&mut self, history: &mut dyn HistoryPort) {
        if self.state == DrawerState::Full {
            self.set_state(DrawerState::Peek, history);
        }
    }

    /// Tapping the handle of a collapsed drawer expands it.
    pub fn handle_tap(&mut self, history: &mut dyn HistoryPort) {
        if matches!(self.state, DrawerState::Pill | DrawerState::Peek) {
            self.set_state(DrawerState::Full, history);
        }
    }

    /// Snap after a handle drag. `delta_px` is positive when dragging down.
    pub fn drag_end(&mut self, delta_px: f64, history: &mut dyn HistoryPort) {
        let target = match self.state {
            DrawerState::Full if delta_px > FULL_TO_PILL_PX => DrawerState::Pill,
            DrawerState::Full if delta_px > ONE_LEVEL_PX => DrawerState::Peek,
            DrawerState::Peek if delta_px > ONE_LEVEL_PX => DrawerState::Pill,
            DrawerState::Peek if delta_px < -ONE_LEVEL_PX => DrawerState::Full,
            DrawerState::Pill if delta_px < -PILL_TO_FULL_PX => DrawerState::Full,
            current => current,
        };
        self.set_state(target, history);
    }

    /// Pull-down on the content. Returns true when the gesture was consumed.
    pub fn content_pull(&mut self, dy_px: f64, at_top: bool, history: &mut dyn HistoryPort) -> bool {
        if !(at_top && dy_px > CONTENT_PULL_PX) {
            return false;
        }
        if self.state == DrawerState::Full {
            self.set_state(DrawerState::Peek, history);
        }
        true
    }

    /// Back-navigation while the drawer is showing steps it down one level.
    ///
    /// Returns false when closed, leaving the navigation to the browser.
    pub fn history_back(&mut self, history: &mut dyn HistoryPort) -> bool {
        if self.state == DrawerState::Closed {
            return false;
        }
        self.from_popstate = true;
        match self.state.step_down() {
            DrawerState::Closed => self.close(),
            lower => self.set_state(lower, history),
        }
        self.from_popstate = false;
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn set_state(&mut self, target: DrawerState, history: &mut dyn HistoryPort) {
        let previous = self.state;
        self.state = target;
        if previous == target {
            return;
        }
        debug!(from = previous.as_str(), to = target.as_str(), "Drawer state");

        let entering = target.is_visible() && target.rank() > previous.rank();
        if entering && !self.from_popstate && history.current_drawer_entry() != Some(target) {
            history.push_drawer_entry(target);
        }
    }
}
