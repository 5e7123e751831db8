//! Render-ready snapshot of the explorer

use std::cmp::Ordering;

use serde::Serialize;

use atlas_types::{
    CreatorRecord, DrawerState, DrillFocus, Facet, HierarchyNode, SortDirection, SortKey,
    TreemapFocus, ViewKind,
};

use super::Explorer;
use crate::collate::locale_cmp;
use crate::drawer::DrawerContent;
use crate::drill::{Breadcrumb, CenterLabel, TreemapCrumb, WheelCrumb};
use crate::hierarchy::{BubbleLayout, BubbleScale, LegendEntry, legend};
use crate::pack;

/// Bubbles listed in the legend
pub const LEGEND_ENTRIES: usize = 5;

// ─────────────────────────────────────────────────────────────────────────────
// List sorting
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListSort {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl ListSort {
    /// Clicking the sorted column flips direction; another column starts ascending.
    pub fn next(current: Option<ListSort>, key: SortKey) -> ListSort {
        match current {
            Some(sort) if sort.key == key => ListSort {
                key,
                direction: match sort.direction {
                    SortDirection::Asc => SortDirection::Desc,
                    SortDirection::Desc => SortDirection::Asc,
                },
            },
            _ => ListSort {
                key,
                direction: SortDirection::Asc,
            },
        }
    }
}

fn sort_field(record: &CreatorRecord, key: SortKey) -> &str {
    match key {
        SortKey::Name => &record.name,
        SortKey::Channel => &record.channel,
        SortKey::Platform => record.platform.as_deref().unwrap_or(""),
        SortKey::Geography => &record.geography,
        SortKey::Topic => record.topic.as_deref().unwrap_or(""),
        SortKey::Group => &record.group,
    }
}

/// Stable sort; missing values compare as empty text.
pub fn sort_rows(rows: &mut [&CreatorRecord], sort: ListSort) {
    rows.sort_by(|a, b| {
        let ord = locale_cmp(sort_field(a, sort.key), sort_field(b, sort.key));
        match sort.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

// ─────────────────────────────────────────────────────────────────────────────
// View models
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionRow<'a> {
    pub value: &'a str,
    pub count: usize,
    pub active: bool,
}

/// One sidebar section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetPanel<'a> {
    pub facet: Facet,
    pub label: &'static str,
    pub active: usize,
    pub options: Vec<OptionRow<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleView {
    pub facet: Facet,
    #[serde(skip)]
    pub scale: BubbleScale,
    pub bubbles: Vec<BubbleLayout>,
    pub legend: Vec<LegendEntry>,
    pub size_samples: [usize; 3],
    /// Records carrying a value for the facet
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WheelView<'a> {
    pub tree: &'a HierarchyNode,
    pub focus: &'a DrillFocus,
    pub breadcrumbs: Vec<WheelCrumb>,
    pub center: CenterLabel,
    /// Member table under the wheel on wide viewports; the drawer takes over on narrow ones
    pub members: Vec<&'a CreatorRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreemapView<'a> {
    pub tree: HierarchyNode,
    pub focus: &'a TreemapFocus,
    pub breadcrumbs: Vec<Breadcrumb<TreemapCrumb>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ViewBody<'a> {
    /// No record matches the filters
    Empty,
    Grid(Vec<&'a CreatorRecord>),
    List {
        rows: Vec<&'a CreatorRecord>,
        sort: Option<ListSort>,
    },
    Bubbles(BubbleView),
    Wheel(WheelView<'a>),
    Treemap(TreemapView<'a>),
}

/// Strings needed to share a pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackShare {
    pub name: String,
    pub title: String,
    pub text: String,
    pub link: String,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel<'a> {
    pub view: ViewKind,
    pub visible_count: usize,
    pub total: usize,
    pub active_filters: usize,
    pub search: &'a str,
    pub permalink: &'a str,
    pub is_mobile: bool,
    pub sidebar: Vec<FacetPanel<'a>>,
    pub body: ViewBody<'a>,
    pub drawer_state: DrawerState,
    pub drawer: Option<&'a DrawerContent>,
    pub pack_enabled: bool,
    pub pack_selected: usize,
    pub notice: Option<&'a str>,
}

/// What the whole page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Screen<'a> {
    Loading,
    /// Dataset failed to load; the session ends here
    Failed(String),
    Ready(ViewModel<'a>),
}

impl Explorer {
    pub fn view_model(&self) -> ViewModel<'_> {
        let state = self.filters.state();
        ViewModel {
            view: self.view,
            visible_count: self.filters.visible_count(),
            total: self.filters.dataset().len(),
            active_filters: state.active_count(),
            search: &state.search,
            permalink: self.filters.permalink(),
            is_mobile: self.is_mobile(),
            sidebar: self.sidebar(),
            body: self.body(),
            drawer_state: self.drawer.state(),
            drawer: self.drawer.content(),
            pack_enabled: pack::selection_enabled(state),
            pack_selected: self.pack.len(),
            notice: self.notice.as_deref(),
        }
    }

    fn sidebar(&self) -> Vec<FacetPanel<'_>> {
        let state = self.filters.state();
        let index = self.filters.dataset().index();
        Facet::ALL
            .into_iter()
            .map(|facet| {
                let active = state.facet(facet);
                FacetPanel {
                    facet,
                    label: facet.label(),
                    active: active.len(),
                    options: index
                        .facet_options(facet)
                        .iter()
                        .map(|o| OptionRow {
                            value: &o.value,
                            count: o.count,
                            active: active.contains(&o.value),
                        })
                        .collect(),
                }
            })
            .collect()
    }

    fn body(&self) -> ViewBody<'_> {
        if self.filters.visible_count() == 0 {
            return ViewBody::Empty;
        }
        match self.view {
            ViewKind::Grid => ViewBody::Grid(self.visible_records()),
            ViewKind::List => {
                let mut rows = self.visible_records();
                if let Some(sort) = self.list_sort {
                    sort_rows(&mut rows, sort);
                }
                ViewBody::List {
                    rows,
                    sort: self.list_sort,
                }
            }
            ViewKind::Bubbles => ViewBody::Bubbles(self.bubble_view()),
            ViewKind::Wheel => ViewBody::Wheel(self.wheel_view()),
            ViewKind::Treemap => ViewBody::Treemap(TreemapView {
                tree: self.treemap.display_tree(&self.treemap_tree()),
                focus: self.treemap.focus(),
                breadcrumbs: self.treemap.breadcrumbs(self.filters.state()),
            }),
        }
    }

    fn bubble_view(&self) -> BubbleView {
        let tree = self.bubble_tree();
        let (scale, bubbles) = BubbleLayout::from_tree(&tree, self.config.dense_bubble_count);
        BubbleView {
            facet: self.effective_bubble_facet(),
            size_samples: scale.size_samples(),
            legend: legend(&tree.children, LEGEND_ENTRIES),
            scale,
            bubbles,
            total: tree.value,
        }
    }

    fn wheel_view(&self) -> WheelView<'_> {
        let members = if self.is_mobile() {
            Vec::new()
        } else {
            let mut members = self.wheel.focused_members(self.filters.visible_records());
            members.sort_by(|a, b| match locale_cmp(&a.name, &b.name) {
                Ordering::Equal => a.id.cmp(&b.id),
                other => other,
            });
            members
        };
        WheelView {
            tree: &self.wheel_snapshot,
            focus: self.wheel.focus(),
            breadcrumbs: self.wheel.breadcrumbs(),
            center: self
                .wheel
                .center_label(&self.wheel_snapshot, self.filters.visible_count()),
            members,
        }
    }
}
