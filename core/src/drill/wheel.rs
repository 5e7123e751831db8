//! Platform → group wheel focus machine

use serde::Serialize;
use tracing::debug;

use atlas_types::{CreatorRecord, DrillFocus, Facet, HierarchyNode};

use super::{Breadcrumb, plural};
use crate::filter::FilterManager;

pub const ROOT_CRUMB: &str = "All Creators";
pub type WheelCrumb = Breadcrumb<DrillFocus>;

/// Text in the wheel's center circle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CenterLabel {
    pub title: String,
    pub count: usize,
    pub caption: String,
    /// Center acts as a back button
    pub shows_back: bool,
}

/// Tracks the focused wheel node and keeps the filters in step with it.
///
/// Every transition mutates filters silently; the wheel animates its own zoom.
#[derive(Debug, Clone, Default)]
pub struct WheelNavigator {
    focus: DrillFocus,
}

impl WheelNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self) -> &DrillFocus {
        &self.focus
    }

    /// First-ring click: replace all filters with this platform.
    pub fn click_platform(&mut self, filters: &mut FilterManager, platform: &str) {
        filters.clear_all_silent();
        filters.toggle_silent(Facet::Platform, platform);
        self.set_focus(DrillFocus::Platform(platform.to_string()));
    }

    /// Second-ring click: filters become exactly this platform and group.
    pub fn click_group(&mut self, filters: &mut FilterManager, platform: &str, group: &str) {
        filters.clear_all_silent();
        filters.toggle_silent(Facet::Platform, platform);
        filters.toggle_silent(Facet::Group, group);
        self.set_focus(DrillFocus::Group {
            platform: platform.to_string(),
            group: group.to_string(),
        });
    }

    /// Center click steps out one level. Returns false at the root.
    pub fn click_center(&mut self, filters: &mut FilterManager) -> bool {
        match &self.focus {
            DrillFocus::Root => false,
            DrillFocus::Platform(_) => {
                filters.clear_all_silent();
                self.set_focus(DrillFocus::Root);
                true
            }
            DrillFocus::Group { platform, .. } => {
                let platform = platform.clone();
                filters.clear_facet_silent(Facet::Group);
                self.set_focus(DrillFocus::Platform(platform));
                true
            }
        }
    }

    /// Breadcrumb navigation.
    pub fn navigate_to(&mut self, filters: &mut FilterManager, target: &DrillFocus) {
        match target {
            DrillFocus::Root => {
                filters.clear_all_silent();
                self.set_focus(DrillFocus::Root);
            }
            DrillFocus::Platform(p) if self.focus.platform() == Some(p.as_str()) => {
                filters.clear_facet_silent(Facet::Group);
                self.set_focus(target.clone());
            }
            DrillFocus::Platform(p) => self.click_platform(filters, p),
            DrillFocus::Group { platform, group } => self.click_group(filters, platform, group),
        }
    }

    /// A filter change from outside the wheel always resets to the root.
    pub fn on_external_change(&mut self) {
        self.focus = DrillFocus::Root;
    }

    fn set_focus(&mut self, focus: DrillFocus) {
        debug!(from = ?self.focus, to = ?focus, "Wheel focus");
        self.focus = focus;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // View model
    // ─────────────────────────────────────────────────────────────────────────

    /// `All Creators › platform › group`, the last crumb active.
    pub fn breadcrumbs(&self) -> Vec<WheelCrumb> {
        let mut crumbs = vec![Breadcrumb {
            label: ROOT_CRUMB.to_string(),
            target: DrillFocus::Root,
            active: false,
        }];
        if let Some(platform) = self.focus.platform() {
            crumbs.push(Breadcrumb {
                label: platform.to_string(),
                target: DrillFocus::Platform(platform.to_string()),
                active: false,
            });
        }
        if let DrillFocus::Group { group, .. } = &self.focus {
            crumbs.push(Breadcrumb {
                label: group.clone(),
                target: self.focus.clone(),
                active: false,
            });
        }
        if let Some(last) = crumbs.last_mut() {
            last.active = true;
        }
        crumbs
    }

    /// Center circle text for `tree`, the wheel built at the last full render.
    pub fn center_label(&self, tree: &HierarchyNode, visible_total: usize) -> CenterLabel {
        match &self.focus {
            DrillFocus::Root => CenterLabel {
                title: "ATLAS".to_string(),
                count: visible_total,
                caption: "creators".to_string(),
                shows_back: false,
            },
            DrillFocus::Platform(platform) => {
                let node = tree.child(platform);
                let count = node.map_or(0, |n| n.value);
                let groups = node.map_or(0, |n| n.children.len());
                CenterLabel {
                    title: platform.to_uppercase(),
                    count,
                    caption: format!("creators in {groups} {}", plural(groups, "group")),
                    shows_back: true,
                }
            }
            DrillFocus::Group { platform, group } => {
                let count = tree
                    .child(platform)
                    .and_then(|p| p.child(group))
                    .map_or(0, |n| n.value);
                CenterLabel {
                    title: group.to_uppercase(),
                    count,
                    caption: plural(count, "creator"),
                    shows_back: true,
                }
            }
        }
    }

    /// Records under the focused node; empty at the root.
    pub fn focused_members<'a>(
        &self,
        visible: impl IntoIterator<Item = &'a CreatorRecord>,
    ) -> Vec<&'a CreatorRecord> {
        let Some(platform) = self.focus.platform() else {
            return Vec::new();
        };
        let group = self.focus.group();
        visible
            .into_iter()
            .filter(|r| r.platform.as_deref() == Some(platform))
            .filter(|r| group.is_none_or(|g| r.group == g))
            .collect()
    }

    /// Title used by the drawer and the desktop member table.
    pub fn focus_label(&self) -> Option<&str> {
        self.focus.group().or_else(|| self.focus.platform())
    }
}
