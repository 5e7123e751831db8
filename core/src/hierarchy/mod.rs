//! Count hierarchies for the bubble, wheel and treemap views
//!
//! Trees are rebuilt from the visible subset on every render. Two shapes exist:
//! - **Two-level** ([`aggregate`]): every record lands in a bucket, missing
//!   values under the facet's fallback label, so `root.value == subset.len()`
//! - **One-level** ([`aggregate_one_level`]): counts present values only and
//!   collapses small buckets into a single non-clickable "Other" bucket
//!
//! The layout itself (force simulation, arcs, rectangles) belongs to the
//! rendering layer; only the data feeding it is built here.

mod bubble;

use hashbrown::HashMap;

use atlas_types::{CreatorRecord, Facet, HierarchyNode, NodeKind};

use crate::collate::{count_desc_then_name, curated_cmp};

pub use bubble::{BubbleLayout, BubbleScale, LegendEntry, legend};

pub const ROOT_NAME: &str = "root";

/// Child ordering for one level of a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LevelOrder {
    /// Descending count, ties by name
    #[default]
    ByCount,
    /// Listed names first in list order, the rest alphabetically
    Curated(Vec<String>),
}

impl LevelOrder {
    fn sort(&self, nodes: &mut [HierarchyNode]) {
        // A real value sorts ahead of a fallback bucket carrying the same label
        let fallback = |node: &HierarchyNode| node.kind == NodeKind::Fallback;
        match self {
            LevelOrder::ByCount => nodes.sort_by(|a, b| {
                count_desc_then_name((&a.name, a.value), (&b.name, b.value))
                    .then_with(|| fallback(a).cmp(&fallback(b)))
            }),
            LevelOrder::Curated(list) => nodes.sort_by(|a, b| {
                curated_cmp(list, &a.name, &b.name).then_with(|| fallback(a).cmp(&fallback(b)))
            }),
        }
    }
}

/// Bucket label for a record, falling back when the value is missing.
fn bucket_label(record: &CreatorRecord, facet: Facet) -> (&str, bool) {
    match record.facet_value(facet) {
        Some(value) => (value, false),
        None => (facet.fallback_label(), true),
    }
}

fn bucket_kind(fallback: bool) -> NodeKind {
    if fallback {
        NodeKind::Fallback
    } else {
        NodeKind::Category
    }
}

/// Build a two-level tree `facet_a → facet_b` over `records`.
pub fn aggregate(
    records: &[&CreatorRecord],
    levels: [Facet; 2],
    orders: [&LevelOrder; 2],
) -> HierarchyNode {
    let [outer, inner] = levels;

    // (label, fallback) keys keep a real "Unknown" apart from the missing-value bucket
    let mut table: HashMap<(&str, bool), HashMap<(&str, bool), usize>> = HashMap::new();
    for record in records {
        let outer_key = bucket_label(record, outer);
        let inner_key = bucket_label(record, inner);
        *table
            .entry(outer_key)
            .or_default()
            .entry(inner_key)
            .or_insert(0) += 1;
    }

    let mut children: Vec<HierarchyNode> = table
        .into_iter()
        .map(|((name, fallback), leaves)| {
            let mut leaves: Vec<HierarchyNode> = leaves
                .into_iter()
                .map(|((leaf, leaf_fallback), count)| {
                    HierarchyNode::leaf(leaf, count).with_kind(bucket_kind(leaf_fallback))
                })
                .collect();
            orders[1].sort(&mut leaves);
            HierarchyNode::branch(name, bucket_kind(fallback), leaves)
        })
        .collect();
    orders[0].sort(&mut children);

    HierarchyNode::branch(ROOT_NAME, NodeKind::Root, children)
}

/// Platform → group tree for the wheel.
pub fn wheel_tree(records: &[&CreatorRecord]) -> HierarchyNode {
    aggregate(
        records,
        [Facet::Platform, Facet::Group],
        [&LevelOrder::ByCount, &LevelOrder::ByCount],
    )
}

/// Group → topic tree for the treemap, groups in curated order.
pub fn treemap_tree(records: &[&CreatorRecord], ordered_groups: &[String]) -> HierarchyNode {
    aggregate(
        records,
        [Facet::Group, Facet::Topic],
        [
            &LevelOrder::Curated(ordered_groups.to_vec()),
            &LevelOrder::ByCount,
        ],
    )
}

/// Small-bucket collapsing rule for the one-level bubble aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BubblePolicy {
    /// Buckets counting fewer records than this are candidates for "Other"
    pub threshold: usize,
    /// Collapse only when at least this many buckets qualify
    pub min_small_buckets: usize,
}

impl Default for BubblePolicy {
    fn default() -> Self {
        Self {
            threshold: 3,
            min_small_buckets: 2,
        }
    }
}

impl BubblePolicy {
    pub fn with_threshold(threshold: usize) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }
}

pub fn other_label(categories: usize) -> String {
    format!("Other ({categories} categories)")
}

/// Count present values of `facet` and collapse small buckets.
///
/// Records without a value are not counted, so the root value can be lower
/// than the subset size.
pub fn aggregate_one_level(
    records: &[&CreatorRecord],
    facet: Facet,
    policy: &BubblePolicy,
) -> HierarchyNode {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        if let Some(value) = record.facet_value(facet) {
            *counts.entry(value).or_insert(0) += 1;
        }
    }

    let leaves = counts
        .into_iter()
        .map(|(name, count)| HierarchyNode::leaf(name, count))
        .collect();

    let mut children = collapse_small(leaves, policy);
    LevelOrder::ByCount.sort(&mut children);
    HierarchyNode::branch(ROOT_NAME, NodeKind::Root, children)
}

/// Merge sub-threshold leaves into one aggregate leaf when enough qualify.
pub fn collapse_small(leaves: Vec<HierarchyNode>, policy: &BubblePolicy) -> Vec<HierarchyNode> {
    let (small, mut kept): (Vec<_>, Vec<_>) = leaves
        .into_iter()
        .partition(|leaf| leaf.value < policy.threshold);

    if small.len() < policy.min_small_buckets {
        kept.extend(small);
        return kept;
    }

    let categories = small.len();
    let total = small.iter().map(|leaf| leaf.value).sum();
    kept.push(
        HierarchyNode::leaf(other_label(categories), total)
            .with_kind(NodeKind::Aggregate { categories }),
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_dataset;

    fn leaves(counts: &[usize]) -> Vec<HierarchyNode> {
        counts
            .iter()
            .enumerate()
            .map(|(i, c)| HierarchyNode::leaf(format!("c{i}"), *c))
            .collect()
    }

    fn values(nodes: &[HierarchyNode]) -> Vec<usize> {
        nodes.iter().map(|n| n.value).collect()
    }

    #[test]
    fn collapses_two_or_more_small_buckets() {
        let mut result = collapse_small(leaves(&[10, 5, 2, 1, 1]), &BubblePolicy::default());
        LevelOrder::ByCount.sort(&mut result);
        assert_eq!(values(&result), vec![10, 5, 4]);
        assert_eq!(result[2].name, "Other (3 categories)");
        assert_eq!(result[2].kind, NodeKind::Aggregate { categories: 3 });
        assert!(!result[2].is_clickable());
    }

    #[test]
    fn single_small_bucket_is_kept() {
        let mut result = collapse_small(leaves(&[10, 5, 2]), &BubblePolicy::default());
        LevelOrder::ByCount.sort(&mut result);
        assert_eq!(values(&result), vec![10, 5, 2]);
        assert!(result.iter().all(HierarchyNode::is_clickable));
    }

    #[test]
    fn two_level_root_counts_every_record() {
        let dataset = sample_dataset();
        let records: Vec<_> = dataset.records().iter().collect();
        let tree = wheel_tree(&records);

        assert_eq!(tree.value, records.len());
        assert!(tree.is_consistent());
        assert_eq!(tree.children[0].name, "Video - YouTube");
        assert_eq!(tree.children[0].value, 3);

        let unknown = tree.child("Unknown").unwrap();
        assert_eq!(unknown.kind, NodeKind::Fallback);
        assert_eq!(unknown.children[0].name, "Money & Work");
    }

    #[test]
    fn real_value_named_like_fallback_stays_separate() {
        let json = r#"[
            {"name": "A", "platform": "Unknown", "group": "Civic Life"},
            {"name": "B", "group": "Civic Life"},
            {"name": "C", "group": "Civic Life"}
        ]"#;
        let dataset =
            crate::dataset::Dataset::from_json_str(json, &crate::dataset::LoaderConfig::default())
                .unwrap();
        let records: Vec<_> = dataset.records().iter().collect();
        let tree = wheel_tree(&records);

        let kinds: Vec<_> = tree.children.iter().map(|c| (c.name.as_str(), c.value, c.kind)).collect();
        assert_eq!(
            kinds,
            vec![("Unknown", 2, NodeKind::Fallback), ("Unknown", 1, NodeKind::Category)]
        );
        let found = tree.child("Unknown").unwrap();
        assert!(found.is_clickable());
        assert_eq!(found.value, 1);
        assert!(tree.is_consistent());
    }

    #[test]
    fn treemap_uses_curated_group_order() {
        let dataset = sample_dataset();
        let records: Vec<_> = dataset.records().iter().collect();
        let groups = atlas_types::AtlasConfig::default().ordered_groups;
        let tree = treemap_tree(&records, &groups);

        let names: Vec<_> = tree.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Power & Politics",
                "Money & Work",
                "Civic Life",
                "Science, Health & Environment"
            ]
        );
        let politics = tree.child("Power & Politics").unwrap();
        assert_eq!(politics.children[0].name, "Other");
        assert_eq!(politics.children[0].kind, NodeKind::Fallback);
        assert_eq!(tree.value, 6);
        assert!(tree.is_consistent());
    }

    #[test]
    fn one_level_skips_missing_values() {
        let dataset = sample_dataset();
        let records: Vec<_> = dataset.records().iter().collect();
        let tree = aggregate_one_level(&records, Facet::Platform, &BubblePolicy::default());

        // Podcast (1) and Substack (1) collapse; Di has no platform
        assert_eq!(tree.value, 5);
        assert_eq!(values(&tree.children), vec![3, 2]);
        assert_eq!(tree.children[1].name, "Other (2 categories)");
        assert!(tree.is_consistent());
    }

    #[test]
    fn empty_subset_gives_empty_root() {
        let tree = aggregate_one_level(&[], Facet::Topic, &BubblePolicy::default());
        assert_eq!(tree.value, 0);
        assert!(tree.children.is_empty());
    }
}
