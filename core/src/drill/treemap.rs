//! Group → topic treemap drill state

use serde::Serialize;

use atlas_types::{Facet, FilterState, HierarchyNode, NodeKind, TreemapFocus};

use super::Breadcrumb;
use crate::filter::FilterManager;
use crate::hierarchy::ROOT_NAME;

pub const ALL_GROUPS_CRUMB: &str = "All Groups";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TreemapCrumb {
    AllGroups,
    Group,
}

#[derive(Debug, Clone, Default)]
pub struct TreemapNavigator {
    focus: TreemapFocus,
}

impl TreemapNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self) -> &TreemapFocus {
        &self.focus
    }

    pub fn drilled_group(&self) -> Option<&str> {
        match &self.focus {
            TreemapFocus::AllGroups => None,
            TreemapFocus::Group(g) => Some(g),
        }
    }

    /// Drill into a group; the group filter is made active silently.
    pub fn click_group(&mut self, filters: &mut FilterManager, group: &str) {
        filters.add_silent(Facet::Group, group);
        self.focus = TreemapFocus::Group(group.to_string());
    }

    /// At the top level a topic cell drills into its parent group; inside a
    /// group it toggles the topic filter. Returns true when the topic is now active.
    pub fn click_topic(&mut self, filters: &mut FilterManager, parent_group: &str, topic: &str) -> bool {
        match self.focus {
            TreemapFocus::AllGroups => {
                self.click_group(filters, parent_group);
                false
            }
            TreemapFocus::Group(_) => filters.toggle_silent(Facet::Topic, topic),
        }
    }

    pub fn navigate(&mut self, filters: &mut FilterManager, crumb: TreemapCrumb) {
        match crumb {
            TreemapCrumb::AllGroups => {
                self.focus = TreemapFocus::AllGroups;
                filters.clear_facet_silent(Facet::Group);
                filters.clear_facet_silent(Facet::Topic);
            }
            TreemapCrumb::Group => filters.clear_facet_silent(Facet::Topic),
        }
    }

    pub fn on_external_change(&mut self) {
        self.focus = TreemapFocus::AllGroups;
    }

    /// `All Groups › group › topics`, where the topic crumb lists active topics.
    pub fn breadcrumbs(&self, state: &FilterState) -> Vec<Breadcrumb<TreemapCrumb>> {
        let Some(group) = self.drilled_group() else {
            return vec![Breadcrumb {
                label: ALL_GROUPS_CRUMB.to_string(),
                target: TreemapCrumb::AllGroups,
                active: true,
            }];
        };

        let mut crumbs = vec![
            Breadcrumb {
                label: ALL_GROUPS_CRUMB.to_string(),
                target: TreemapCrumb::AllGroups,
                active: false,
            },
            Breadcrumb {
                label: group.to_string(),
                target: TreemapCrumb::Group,
                active: state.topic.is_empty(),
            },
        ];
        if !state.topic.is_empty() {
            crumbs.push(Breadcrumb {
                label: state.topic.iter().collect::<Vec<_>>().join(", "),
                target: TreemapCrumb::Group,
                active: true,
            });
        }
        crumbs
    }

    /// The part of `full` to lay out: everything, or only the drilled group's topics.
    pub fn display_tree(&self, full: &HierarchyNode) -> HierarchyNode {
        match self.drilled_group() {
            None => full.clone(),
            Some(group) => {
                let topics = full
                    .child(group)
                    .map(|g| g.children.clone())
                    .unwrap_or_default();
                HierarchyNode::branch(ROOT_NAME, NodeKind::Root, topics)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::treemap_tree;
    use crate::test_support::manager;
    use atlas_types::AtlasConfig;

    #[test]
    fn group_click_drills_and_filters() {
        let (mut filters, _) = manager();
        let mut treemap = TreemapNavigator::new();

        treemap.click_group(&mut filters, "Civic Life");
        assert_eq!(treemap.drilled_group(), Some("Civic Life"));
        assert_eq!(filters.state().group.single(), Some("Civic Life"));
        assert_eq!(filters.visible_count(), 3);
    }

    #[test]
    fn topic_click_at_top_level_drills_into_parent() {
        let (mut filters, _) = manager();
        let mut treemap = TreemapNavigator::new();

        assert!(!treemap.click_topic(&mut filters, "Civic Life", "Elections"));
        assert_eq!(treemap.focus(), &TreemapFocus::Group("Civic Life".into()));
        assert!(filters.state().topic.is_empty());

        assert!(treemap.click_topic(&mut filters, "Civic Life", "Elections"));
        assert_eq!(filters.visible_count(), 1);
        assert!(!treemap.click_topic(&mut filters, "Civic Life", "Elections"));
        assert_eq!(filters.visible_count(), 3);
    }

    #[test]
    fn breadcrumbs_clear_deeper_levels() {
        let (mut filters, _) = manager();
        let mut treemap = TreemapNavigator::new();
        treemap.click_group(&mut filters, "Civic Life");
        treemap.click_topic(&mut filters, "Civic Life", "Elections");
        treemap.click_topic(&mut filters, "Civic Life", "Local Politics");

        let crumbs = treemap.breadcrumbs(filters.state());
        assert_eq!(crumbs.len(), 3);
        assert_eq!(crumbs[2].label, "Elections, Local Politics");
        assert!(!crumbs[1].active);

        treemap.navigate(&mut filters, TreemapCrumb::Group);
        assert!(filters.state().topic.is_empty());
        assert_eq!(filters.state().group.single(), Some("Civic Life"));
        assert!(treemap.breadcrumbs(filters.state())[1].active);

        treemap.navigate(&mut filters, TreemapCrumb::AllGroups);
        assert!(filters.state().is_empty());
        assert_eq!(treemap.focus(), &TreemapFocus::AllGroups);
    }

    #[test]
    fn display_tree_narrows_to_drilled_group() {
        let (mut filters, _) = manager();
        let records: Vec<_> = filters.dataset().records().iter().collect();
        let full = treemap_tree(&records, &AtlasConfig::default().ordered_groups);
        let mut treemap = TreemapNavigator::new();
        assert_eq!(treemap.display_tree(&full), full);

        treemap.click_group(&mut filters, "Civic Life");
        let drilled = treemap.display_tree(&full);
        assert_eq!(drilled.value, 3);
        assert!(drilled.is_consistent());
        assert_eq!(drilled.children[0].name, "Elections");

        treemap.click_group(&mut filters, "Nonexistent");
        assert!(treemap.display_tree(&full).children.is_empty());
    }
}
