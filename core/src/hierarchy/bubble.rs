//! Bubble sizing, label visibility and legend

use serde::Serialize;

use atlas_types::HierarchyNode;

use crate::labels::{abbreviate, chars_for_width};

/// Radius at which a bubble also shows its name
const NAME_LABEL_RADIUS: f64 = 40.0;
const LABEL_FONT_PX: f64 = 12.0;

/// Square-root size scale over `[1, max_count]`.
///
/// More bubbles means a narrower radius range so the force layout does not
/// overlap them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubbleScale {
    max_count: usize,
    dense: bool,
}

impl BubbleScale {
    /// Scale for `bubbles`; dense when there are more than `dense_count` of them.
    pub fn for_bubbles(bubbles: &[HierarchyNode], dense_count: usize) -> Self {
        Self {
            max_count: bubbles.iter().map(|b| b.value).max().unwrap_or(1).max(1),
            dense: bubbles.len() > dense_count,
        }
    }

    pub fn is_dense(&self) -> bool {
        self.dense
    }

    pub fn range(&self) -> (f64, f64) {
        if self.dense { (15.0, 70.0) } else { (20.0, 100.0) }
    }

    pub fn radius(&self, count: usize) -> f64 {
        let (lo, hi) = self.range();
        let d0 = 1.0_f64;
        let d1 = (self.max_count as f64).sqrt();
        let t = if d1 == d0 {
            0.5
        } else {
            ((count as f64).sqrt() - d0) / (d1 - d0)
        };
        lo + t * (hi - lo)
    }

    /// Minimum radius for a bubble to show its count.
    pub fn label_threshold(&self) -> f64 {
        if self.dense { 25.0 } else { 20.0 }
    }

    /// Extra spacing added to each radius in the collision force.
    pub fn collision_padding(&self) -> f64 {
        if self.dense { 3.0 } else { 4.0 }
    }

    /// Counts shown in the "bubble size = creators" legend.
    pub fn size_samples(&self) -> [usize; 3] {
        let third = ((self.max_count as f64) / 3.0).round() as usize;
        [1, third.max(1), self.max_count]
    }
}

/// Render-ready bubble: sized, labelled, flagged for clickability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleLayout {
    pub name: String,
    pub count: usize,
    pub radius: f64,
    pub clickable: bool,
    pub show_count: bool,
    /// Abbreviated name when the bubble is large enough, else `None`
    pub label: Option<String>,
}

impl BubbleLayout {
    /// Lay out the children of a one-level tree.
    pub fn from_tree(tree: &HierarchyNode, dense_count: usize) -> (BubbleScale, Vec<BubbleLayout>) {
        let scale = BubbleScale::for_bubbles(&tree.children, dense_count);
        let bubbles = tree
            .children
            .iter()
            .map(|node| {
                let radius = scale.radius(node.value);
                let label = (radius >= NAME_LABEL_RADIUS).then(|| {
                    abbreviate(&node.name, chars_for_width(radius * 1.6, LABEL_FONT_PX))
                });
                BubbleLayout {
                    name: node.name.clone(),
                    count: node.value,
                    radius,
                    clickable: node.is_clickable(),
                    show_count: radius >= scale.label_threshold(),
                    label,
                }
            })
            .collect();
        (scale, bubbles)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub name: String,
    pub count: usize,
    pub clickable: bool,
}

/// First `n` bubbles of an already ordered list.
pub fn legend(bubbles: &[HierarchyNode], n: usize) -> Vec<LegendEntry> {
    bubbles
        .iter()
        .take(n)
        .map(|b| LegendEntry {
            name: b.name.clone(),
            count: b.value,
            clickable: b.is_clickable(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_types::NodeKind;

    fn nodes(counts: &[usize]) -> Vec<HierarchyNode> {
        counts
            .iter()
            .enumerate()
            .map(|(i, c)| HierarchyNode::leaf(format!("n{i}"), *c))
            .collect()
    }

    #[test]
    fn radius_spans_range() {
        let scale = BubbleScale::for_bubbles(&nodes(&[16, 4, 1]), 30);
        assert!(!scale.is_dense());
        assert_eq!(scale.radius(1), 20.0);
        assert_eq!(scale.radius(16), 100.0);
        assert!((scale.radius(4) - 46.666).abs() < 0.01);
    }

    #[test]
    fn many_bubbles_narrow_the_range() {
        let counts: Vec<usize> = (1..=31).collect();
        let scale = BubbleScale::for_bubbles(&nodes(&counts), 30);
        assert!(scale.is_dense());
        assert_eq!(scale.range(), (15.0, 70.0));
        assert_eq!(scale.label_threshold(), 25.0);
        assert_eq!(scale.collision_padding(), 3.0);
        assert_eq!(scale.radius(31), 70.0);
    }

    #[test]
    fn single_count_domain_uses_midpoint() {
        let scale = BubbleScale::for_bubbles(&nodes(&[1, 1]), 30);
        assert_eq!(scale.radius(1), 60.0);
        assert_eq!(scale.size_samples(), [1, 1, 1]);
    }

    #[test]
    fn layout_labels_large_bubbles_only() {
        let tree = HierarchyNode::branch(
            "root",
            NodeKind::Root,
            vec![
                HierarchyNode::leaf("Video - YouTube", 25),
                HierarchyNode::leaf("Other (2 categories)", 1)
                    .with_kind(NodeKind::Aggregate { categories: 2 }),
            ],
        );
        let (_, bubbles) = BubbleLayout::from_tree(&tree, 30);
        assert_eq!(bubbles[0].label.as_deref(), Some("YouTube"));
        assert!(bubbles[0].show_count);
        assert!(bubbles[1].label.is_none());
        assert!(!bubbles[1].clickable);
    }

    #[test]
    fn legend_takes_top_entries() {
        let entries = legend(&nodes(&[9, 7, 5, 3, 2, 1]), 5);
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].count, 9);
    }
}
