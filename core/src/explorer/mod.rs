//! Explorer: the controller tying filters, views and navigation together
//!
//! The front end (wasm or terminal) owns one [`Explorer`], feeds it
//! [`AtlasEvent`]s and timer ticks, and re-draws according to the returned
//! [`Redraw`]. Rendering reads [`Explorer::view_model`].
//!
//! # Change propagation
//!
//! The explorer subscribes a latch to the filter manager. After each event
//! the strongest propagation seen decides the redraw:
//! - `Render` (sidebar, search, bubble click): navigators reset to their
//!   root, the drawer closes, the wheel snapshot is rebuilt
//! - `Silent` (wheel or treemap drill): only the active view updates locally

mod view_model;
#[cfg(test)]
mod explorer_tests;

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, info};

use atlas_types::{
    AtlasConfig, CreatorRecord, DrillFocus, Facet, FilterState, HierarchyNode, RecordId, SortKey,
    ViewKind,
};

use crate::dataset::Dataset;
use crate::debounce::Debouncer;
use crate::drawer::{DrawerContent, DrawerMachine};
use crate::drill::{TreemapCrumb, TreemapNavigator, WheelNavigator};
use crate::error::LoadError;
use crate::filter::{FilterChange, FilterManager, FilterObserver, Propagation};
use crate::hierarchy::{BubblePolicy, aggregate_one_level, treemap_tree, wheel_tree};
use crate::history::HistoryPort;
use crate::pack::{self, PackSelection};
use crate::permalink;
use crate::share::{self, Clipboard, ShareFeedback};

pub use view_model::{
    BubbleView, FacetPanel, LEGEND_ENTRIES, ListSort, OptionRow, PackShare, Screen, TreemapView,
    ViewBody, ViewModel, WheelView, sort_rows,
};

/// How much of the screen an event invalidated. Ordered by cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Redraw {
    None,
    /// The active view updates in place (zoom, drawer, sort)
    Local,
    /// Same data, new geometry (viewport settled)
    Layout,
    /// Tear down and rebuild the active view
    Full,
}

/// Everything a renderer can report back.
#[derive(Debug, Clone, PartialEq)]
pub enum AtlasEvent {
    // Sidebar and search
    Toggle { facet: Facet, value: String },
    ClearFacet(Facet),
    ClearAll,
    /// Raw keystroke text; applied after the search debounce
    SearchInput(String),

    // View chrome
    SetView(ViewKind),
    SetBubbleFacet(Facet),
    SortBy(SortKey),
    /// Raw viewport width; applied after the resize debounce
    Resize(u32),

    // Visualizations
    BubbleClick(String),
    WheelPlatform(String),
    WheelGroup { platform: String, group: String },
    WheelCenter,
    WheelCrumb(DrillFocus),
    TreemapGroup(String),
    TreemapTopic { group: String, topic: String },
    TreemapCrumb(TreemapCrumb),

    // Mobile drawer
    DrawerClose,
    DrawerBackdrop,
    DrawerHandle,
    DrawerDragEnd(f64),
    DrawerPull { dy: f64, at_top: bool },
    DrawerShowMore(String),
    DrawerScroll(f64),
    /// Browser back gesture
    HistoryBack,

    // Pack
    PackToggle(RecordId),
    PackPrefill,
    PackRemove(usize),
    PackClear,
}

/// Records the strongest propagation seen since the last take.
#[derive(Clone, Default)]
struct ChangeLatch(Rc<Cell<Option<Propagation>>>);

impl ChangeLatch {
    fn take(&self) -> Option<Propagation> {
        self.0.take()
    }
}

impl FilterObserver for ChangeLatch {
    fn on_filter_change(&mut self, change: &FilterChange<'_>) {
        let strongest = match (self.0.get(), change.propagation) {
            (Some(Propagation::Render), _) | (_, Propagation::Render) => Propagation::Render,
            _ => Propagation::Silent,
        };
        self.0.set(Some(strongest));
    }
}

pub struct Explorer {
    config: AtlasConfig,
    filters: FilterManager,
    latch: ChangeLatch,
    view: ViewKind,
    bubble_facet: Facet,
    list_sort: Option<ListSort>,
    wheel: WheelNavigator,
    /// Wheel hierarchy as of the last full render; drills zoom within it
    wheel_snapshot: HierarchyNode,
    treemap: TreemapNavigator,
    drawer: DrawerMachine,
    search: Debouncer<String>,
    resize: Debouncer<u32>,
    viewport_width: u32,
    pack: PackSelection,
    notice: Option<String>,
}

impl Explorer {
    pub fn new(
        dataset: Rc<Dataset>,
        history: Box<dyn HistoryPort>,
        config: AtlasConfig,
        base_path: &str,
        viewport_width: u32,
    ) -> Self {
        let mut filters = FilterManager::new(dataset, history, base_path);
        let latch = ChangeLatch::default();
        filters.subscribe(Box::new(latch.clone()));

        let mut explorer = Self {
            filters,
            latch,
            view: ViewKind::default(),
            bubble_facet: Facet::Platform,
            list_sort: None,
            wheel: WheelNavigator::new(),
            wheel_snapshot: HierarchyNode::leaf(crate::hierarchy::ROOT_NAME, 0),
            treemap: TreemapNavigator::new(),
            drawer: DrawerMachine::new(Duration::from_millis(config.drawer_open_delay_ms)),
            search: Debouncer::from_millis(config.search_debounce_ms),
            resize: Debouncer::from_millis(config.resize_debounce_ms),
            viewport_width,
            pack: PackSelection::new(config.pack_limit),
            notice: None,
            config,
        };
        explorer.refresh_wheel_snapshot();
        explorer
    }

    /// Apply a permalink query at startup. Returns true when it set any filter.
    pub fn restore_permalink(&mut self, query: &str) -> bool {
        let state = permalink::decode(query);
        if state.is_empty() {
            return false;
        }
        info!(active = state.active_count(), "Restoring filters from permalink");
        self.filters.restore(state);
        self.settle(Redraw::None);
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Read access
    // ─────────────────────────────────────────────────────────────────────────

    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    pub fn filters(&self) -> &FilterManager {
        &self.filters
    }

    pub fn state(&self) -> &FilterState {
        self.filters.state()
    }

    pub fn view(&self) -> ViewKind {
        self.view
    }

    pub fn bubble_facet(&self) -> Facet {
        self.bubble_facet
    }

    /// Topic bubbles are too many for a phone; narrow viewports fall back to platform.
    pub fn effective_bubble_facet(&self) -> Facet {
        if self.is_mobile() && self.bubble_facet == Facet::Topic {
            Facet::Platform
        } else {
            self.bubble_facet
        }
    }

    pub fn list_sort(&self) -> Option<ListSort> {
        self.list_sort
    }

    pub fn wheel(&self) -> &WheelNavigator {
        &self.wheel
    }

    pub fn wheel_snapshot(&self) -> &HierarchyNode {
        &self.wheel_snapshot
    }

    pub fn treemap(&self) -> &TreemapNavigator {
        &self.treemap
    }

    pub fn drawer(&self) -> &DrawerMachine {
        &self.drawer
    }

    pub fn pack(&self) -> &PackSelection {
        &self.pack
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    pub fn is_mobile(&self) -> bool {
        self.config.is_mobile(self.viewport_width)
    }

    pub fn permalink(&self) -> &str {
        self.filters.permalink()
    }

    /// Search text still waiting for the debounce.
    pub fn pending_search(&self) -> bool {
        self.search.is_pending()
    }

    /// Earliest time [`tick`](Self::tick) has work to do.
    pub fn next_deadline(&self) -> Option<Duration> {
        [
            self.search.deadline(),
            self.resize.deadline(),
            self.drawer.open_deadline(),
        ]
            .into_iter()
            .flatten()
            .min()
    }

    pub fn visible_records(&self) -> Vec<&CreatorRecord> {
        self.filters.visible_records().collect()
    }

    /// One-level tree for the bubble view over the visible subset.
    pub fn bubble_tree(&self) -> HierarchyNode {
        aggregate_one_level(
            &self.visible_records(),
            self.effective_bubble_facet(),
            &BubblePolicy::with_threshold(self.config.small_bucket_threshold),
        )
    }

    /// Group → topic tree over the visible subset.
    pub fn treemap_tree(&self) -> HierarchyNode {
        treemap_tree(&self.visible_records(), &self.config.ordered_groups)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Events
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply one event at time `now` and report what must be redrawn.
    pub fn handle(&mut self, now: Duration, event: AtlasEvent) -> Redraw {
        self.notice = None;
        let local = match event {
            AtlasEvent::Toggle { facet, value } => {
                self.filters.toggle(facet, &value);
                Redraw::None
            }
            AtlasEvent::ClearFacet(facet) => {
                self.filters.clear_facet(facet);
                Redraw::None
            }
            AtlasEvent::ClearAll => {
                self.search.cancel();
                self.filters.clear_all();
                Redraw::None
            }
            AtlasEvent::SearchInput(text) => {
                self.search.schedule(now, text);
                Redraw::None
            }

            AtlasEvent::SetView(view) => self.set_view(view),
            AtlasEvent::SetBubbleFacet(facet) => {
                if facet == self.bubble_facet {
                    Redraw::None
                } else {
                    self.bubble_facet = facet;
                    if self.view == ViewKind::Bubbles { Redraw::Full } else { Redraw::None }
                }
            }
            AtlasEvent::SortBy(key) => {
                self.list_sort = Some(ListSort::next(self.list_sort, key));
                Redraw::Local
            }
            AtlasEvent::Resize(width) => {
                self.resize.schedule(now, width);
                Redraw::None
            }

            AtlasEvent::BubbleClick(name) => self.bubble_click(&name),
            AtlasEvent::WheelPlatform(platform) => self.wheel_platform(now, &platform),
            AtlasEvent::WheelGroup { platform, group } => self.wheel_group(now, &platform, &group),
            AtlasEvent::WheelCenter => {
                if self.wheel.click_center(&mut self.filters) {
                    self.after_wheel_back(now);
                }
                Redraw::None
            }
            AtlasEvent::WheelCrumb(target) => {
                if &target != self.wheel.focus() {
                    self.wheel.navigate_to(&mut self.filters, &target);
                    self.after_wheel_back(now);
                }
                Redraw::None
            }
            AtlasEvent::TreemapGroup(group) => {
                if self.treemap_clickable(&group, None) {
                    self.treemap.click_group(&mut self.filters, &group);
                }
                Redraw::None
            }
            AtlasEvent::TreemapTopic { group, topic } => {
                if self.treemap_clickable(&group, Some(&topic)) {
                    self.treemap.click_topic(&mut self.filters, &group, &topic);
                }
                Redraw::None
            }
            AtlasEvent::TreemapCrumb(crumb) => {
                self.treemap.navigate(&mut self.filters, crumb);
                Redraw::None
            }

            AtlasEvent::DrawerClose => {
                self.drawer.close_control(self.filters.history_mut());
                Redraw::Local
            }
            AtlasEvent::DrawerBackdrop => {
                self.drawer.backdrop_tap(self.filters.history_mut());
                Redraw::Local
            }
            AtlasEvent::DrawerHandle => {
                self.drawer.handle_tap(self.filters.history_mut());
                Redraw::Local
            }
            AtlasEvent::DrawerDragEnd(delta) => {
                self.drawer.drag_end(delta, self.filters.history_mut());
                Redraw::Local
            }
            AtlasEvent::DrawerPull { dy, at_top } => {
                if self.drawer.content_pull(dy, at_top, self.filters.history_mut()) {
                    Redraw::Local
                } else {
                    Redraw::None
                }
            }
            AtlasEvent::DrawerShowMore(topic) => {
                if self
                    .drawer
                    .content_mut()
                    .is_some_and(|content| content.expand_topic(&topic))
                {
                    Redraw::Local
                } else {
                    Redraw::None
                }
            }
            AtlasEvent::DrawerScroll(offset) => {
                if let Some(content) = self.drawer.content_mut() {
                    content.set_scroll_top(offset);
                }
                Redraw::None
            }
            AtlasEvent::HistoryBack => {
                if self.drawer.history_back(self.filters.history_mut()) {
                    Redraw::Local
                } else {
                    Redraw::None
                }
            }

            AtlasEvent::PackToggle(id) => self.pack_toggle(id),
            AtlasEvent::PackPrefill => {
                let limit = self.pack.limit();
                self.pack.prefill(self.filters.visible_records().take(limit));
                Redraw::Local
            }
            AtlasEvent::PackRemove(index) => match self.pack.remove_at(index) {
                Some(_) => Redraw::Local,
                None => Redraw::None,
            },
            AtlasEvent::PackClear => {
                self.pack.clear();
                Redraw::Local
            }
        };
        self.settle(local)
    }

    /// Fire due timers: debounced search, settled resize, delayed drawer open.
    pub fn tick(&mut self, now: Duration) -> Redraw {
        let mut redraw = Redraw::None;

        if let Some(text) = self.search.poll(now)
            && text.trim() != self.filters.state().search
        {
            self.filters.set_search(text.trim());
        }

        if let Some(width) = self.resize.poll(now) {
            redraw = redraw.max(self.apply_resize(width));
        }

        if self.drawer.tick(now, self.filters.history_mut()) {
            redraw = redraw.max(Redraw::Local);
        }

        self.settle(redraw)
    }

    /// Copy the current permalink, falling back to a manual-copy prompt.
    pub fn share(&mut self, clipboard: &mut dyn Clipboard, origin: &str) -> ShareFeedback {
        let url = format!("{origin}{}", self.filters.permalink());
        share::share_view(clipboard, &url)
    }

    /// Title, text and link for sharing the current pack.
    pub fn pack_share(&self, name: Option<&str>, base: &str, from: Option<&str>) -> PackShare {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(String::from)
            .unwrap_or_else(|| pack::suggest_name(self.filters.state()));
        PackShare {
            title: pack::share_title(&name),
            text: pack::share_text(self.pack.entries()),
            link: pack::pack_link(base, self.pack.entries(), &name, from),
            filename: format!("atlas-pack-{}.png", pack::slug(&name)),
            name,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    /// Fold the filter latch into the event's own redraw.
    fn settle(&mut self, local: Redraw) -> Redraw {
        match self.latch.take() {
            Some(Propagation::Render) => {
                self.wheel.on_external_change();
                self.treemap.on_external_change();
                self.drawer.close();
                self.refresh_wheel_snapshot();
                Redraw::Full
            }
            Some(Propagation::Silent) => local.max(Redraw::Local),
            None => local,
        }
    }

    fn refresh_wheel_snapshot(&mut self) {
        self.wheel_snapshot = wheel_tree(&self.visible_records());
    }

    fn set_view(&mut self, view: ViewKind) -> Redraw {
        if view == self.view {
            return Redraw::None;
        }
        debug!(from = self.view.as_str(), to = view.as_str(), "View switched");
        self.view = view;
        self.wheel.on_external_change();
        self.treemap.on_external_change();
        self.drawer.close();
        self.refresh_wheel_snapshot();
        Redraw::Full
    }

    fn apply_resize(&mut self, width: u32) -> Redraw {
        let was_mobile = self.is_mobile();
        self.viewport_width = width;
        if was_mobile && !self.is_mobile() {
            self.drawer.close();
        }
        if self.view.is_visualization() {
            Redraw::Layout
        } else {
            Redraw::Local
        }
    }

    fn bubble_click(&mut self, name: &str) -> Redraw {
        let tree = self.bubble_tree();
        match tree.child(name) {
            Some(node) if node.is_clickable() => {
                self.filters.toggle(self.effective_bubble_facet(), name);
            }
            _ => debug!(name, "Ignoring click on non-filterable bubble"),
        }
        Redraw::None
    }

    fn wheel_platform(&mut self, now: Duration, platform: &str) -> Redraw {
        if !self
            .wheel_snapshot
            .child(platform)
            .is_some_and(HierarchyNode::is_clickable)
        {
            return Redraw::None;
        }
        self.wheel.click_platform(&mut self.filters, platform);
        self.schedule_drawer(now);
        Redraw::None
    }

    fn wheel_group(&mut self, now: Duration, platform: &str, group: &str) -> Redraw {
        let Some(parent) = self.wheel_snapshot.child(platform) else {
            return Redraw::None;
        };
        if !parent.is_clickable() || !parent.child(group).is_some_and(HierarchyNode::is_clickable) {
            return Redraw::None;
        }
        self.wheel.click_group(&mut self.filters, platform, group);
        self.schedule_drawer(now);
        Redraw::None
    }

    /// After a center or breadcrumb step out: close at the root, refresh otherwise.
    fn after_wheel_back(&mut self, now: Duration) {
        if *self.wheel.focus() == DrillFocus::Root {
            self.drawer.close();
        } else {
            self.schedule_drawer(now);
        }
    }

    /// On narrow viewports a drill opens the drawer after a short delay.
    fn schedule_drawer(&mut self, now: Duration) {
        if !self.is_mobile() {
            return;
        }
        let Some(label) = self.wheel.focus_label() else {
            return;
        };
        let members = self.wheel.focused_members(self.filters.visible_records());
        let content = DrawerContent::build(label, &members, self.config.drawer_page_size);
        self.drawer.schedule_open(now, content);
    }

    fn treemap_clickable(&self, group: &str, topic: Option<&str>) -> bool {
        let tree = self.treemap_tree();
        let Some(group_node) = tree.child(group) else {
            return false;
        };
        group_node.is_clickable()
            && topic.is_none_or(|t| group_node.child(t).is_some_and(HierarchyNode::is_clickable))
    }

    fn pack_toggle(&mut self, id: RecordId) -> Redraw {
        if !pack::selection_enabled(self.filters.state()) {
            return Redraw::None;
        }
        let Some(record) = self.filters.dataset().get(id) else {
            return Redraw::None;
        };
        match self.pack.toggle(record) {
            Ok(_) => {}
            Err(e) => self.notice = Some(e.to_string()),
        }
        Redraw::Local
    }
}

/// Top-level screen state: the dataset is loading, failed, or ready.
pub enum AtlasSession {
    Loading,
    Failed(LoadError),
    Ready(Box<Explorer>),
}

impl AtlasSession {
    pub fn screen(&self) -> Screen<'_> {
        match self {
            AtlasSession::Loading => Screen::Loading,
            AtlasSession::Failed(e) => Screen::Failed(e.to_string()),
            AtlasSession::Ready(explorer) => Screen::Ready(explorer.view_model()),
        }
    }

    pub fn explorer(&self) -> Option<&Explorer> {
        match self {
            AtlasSession::Ready(explorer) => Some(explorer.as_ref()),
            _ => None,
        }
    }

    pub fn explorer_mut(&mut self) -> Option<&mut Explorer> {
        match self {
            AtlasSession::Ready(explorer) => Some(explorer.as_mut()),
            _ => None,
        }
    }
}
