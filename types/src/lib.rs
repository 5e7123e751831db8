//! Shared types for the Journalism Atlas
//!
//! This crate contains serializable types that are shared between the native
//! core (atlas-core), the terminal client (atlas-cli) and the WASM front end
//! (atlas-app): canonical creator records, filter facets and state, the
//! hierarchy nodes fed to the visualizations, and the application config.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ─────────────────────────────────────────────────────────────────────────────
// Creator Records
// ─────────────────────────────────────────────────────────────────────────────

/// Dense record index assigned in load order.
pub type RecordId = u32;

/// Canonical creator record. Immutable once the dataset is loaded.
///
/// The shape is single-valued: rich spreadsheet rows with secondary platforms
/// or group lists are reduced to their first value by the loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorRecord {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    pub group: String,
    pub geography: String,
    /// Freeform secondary label, may hold several comma-separated topics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub notes: String,
}

impl CreatorRecord {
    /// The record's value for a facet, `None` when missing or blank.
    pub fn facet_value(&self, facet: Facet) -> Option<&str> {
        let value = match facet {
            Facet::Group => Some(self.group.as_str()),
            Facet::Platform => self.platform.as_deref(),
            Facet::Geography => Some(self.geography.as_str()),
            Facet::Topic => self.topic.as_deref(),
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// First comma-separated piece of the topic, used to group drawer cards.
    pub fn primary_topic(&self) -> &str {
        self.topic
            .as_deref()
            .and_then(|t| t.split(',').next())
            .map(str::trim)
            .unwrap_or("")
    }

    /// Up to two uppercase initials for avatar badges.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Facets
// ─────────────────────────────────────────────────────────────────────────────

/// One independently filterable dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
    Group,
    Platform,
    Geography,
    Topic,
}

impl Facet {
    /// All facets in permalink order.
    pub const ALL: [Facet; 4] = [Facet::Group, Facet::Platform, Facet::Geography, Facet::Topic];

    /// Query-string parameter name
    pub fn param(&self) -> &'static str {
        match self {
            Facet::Group => "group",
            Facet::Platform => "platform",
            Facet::Geography => "geography",
            Facet::Topic => "topic",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Facet::Group => "Group",
            Facet::Platform => "Platform",
            Facet::Geography => "Geography",
            Facet::Topic => "Topic",
        }
    }

    /// Label used for records that carry no value when every record must land in a bucket.
    pub fn fallback_label(&self) -> &'static str {
        match self {
            Facet::Group => "Uncategorized",
            Facet::Platform => "Unknown",
            Facet::Geography => "Unknown",
            Facet::Topic => "Other",
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param())
    }
}

impl FromStr for Facet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "group" | "groups" => Ok(Facet::Group),
            "platform" | "platforms" => Ok(Facet::Platform),
            "geography" | "geo" => Ok(Facet::Geography),
            "topic" | "topics" => Ok(Facet::Topic),
            other => Err(format!("unknown facet '{other}'")),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Filter State
// ─────────────────────────────────────────────────────────────────────────────

/// Insertion-ordered set of active values for one facet.
///
/// Facets hold a handful of values at most, so a vector keeps the order the
/// user picked them in (and therefore a stable permalink) without hashing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueSet(Vec<String>);

impl ValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|v| v == value)
    }

    /// Insert a value. Returns false when it was already present.
    pub fn insert(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.contains(&value) {
            return false;
        }
        self.0.push(value);
        true
    }

    /// Remove a value. Returns false when it was not present.
    pub fn remove(&mut self, value: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|v| v != value);
        self.0.len() != before
    }

    /// Flip membership of a value. Returns true when the value is now active.
    pub fn toggle(&mut self, value: &str) -> bool {
        if self.remove(value) {
            false
        } else {
            self.0.push(value.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// The single active value, if exactly one is set.
    pub fn single(&self) -> Option<&str> {
        match self.0.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }
}

impl<S: Into<String>> FromIterator<S> for ValueSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = ValueSet::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

/// Active filter facets plus the free-text search.
///
/// A facet with an empty set places no constraint on the visible subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub group: ValueSet,
    #[serde(default)]
    pub platform: ValueSet,
    #[serde(default)]
    pub geography: ValueSet,
    #[serde(default)]
    pub topic: ValueSet,
    #[serde(default)]
    pub search: String,
}

impl FilterState {
    pub fn facet(&self, facet: Facet) -> &ValueSet {
        match facet {
            Facet::Group => &self.group,
            Facet::Platform => &self.platform,
            Facet::Geography => &self.geography,
            Facet::Topic => &self.topic,
        }
    }

    pub fn facet_mut(&mut self, facet: Facet) -> &mut ValueSet {
        match facet {
            Facet::Group => &mut self.group,
            Facet::Platform => &mut self.platform,
            Facet::Geography => &mut self.geography,
            Facet::Topic => &mut self.topic,
        }
    }

    /// True when no facet and no search is active.
    pub fn is_empty(&self) -> bool {
        Facet::ALL.iter().all(|f| self.facet(*f).is_empty()) && self.search.is_empty()
    }

    /// Number of active facet values, plus one for a non-empty search.
    pub fn active_count(&self) -> usize {
        let facets: usize = Facet::ALL.iter().map(|f| self.facet(*f).len()).sum();
        facets + usize::from(!self.search.is_empty())
    }

    pub fn clear(&mut self) {
        for facet in Facet::ALL {
            self.facet_mut(facet).clear();
        }
        self.search.clear();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Hierarchy (bubble / wheel / treemap input)
// ─────────────────────────────────────────────────────────────────────────────

/// What a hierarchy node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NodeKind {
    /// A real facet value
    #[default]
    Category,
    /// Bucket for records without a value (e.g. "Unknown")
    Fallback,
    /// Synthetic "Other (k categories)" bucket; not a single filter value
    Aggregate { categories: usize },
    /// Tree root
    Root,
}

/// Recursive count tree. Leaves carry record counts, internal nodes the sum of their children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub name: String,
    pub value: usize,
    #[serde(default)]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    pub fn leaf(name: impl Into<String>, value: usize) -> Self {
        Self {
            name: name.into(),
            value,
            kind: NodeKind::Category,
            children: Vec::new(),
        }
    }

    /// Internal node whose value is the sum of `children`.
    pub fn branch(name: impl Into<String>, kind: NodeKind, children: Vec<HierarchyNode>) -> Self {
        Self {
            name: name.into(),
            value: children.iter().map(|c| c.value).sum(),
            kind,
            children,
        }
    }

    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Child by name. A real value wins over a fallback bucket with the same label.
    pub fn child(&self, name: &str) -> Option<&HierarchyNode> {
        let mut named = self.children.iter().filter(|c| c.name == name);
        let first = named.next()?;
        if first.kind == NodeKind::Fallback {
            return named.find(|c| c.kind != NodeKind::Fallback).or(Some(first));
        }
        Some(first)
    }

    /// Whether clicking this node may set a filter value.
    pub fn is_clickable(&self) -> bool {
        matches!(self.kind, NodeKind::Category)
    }

    /// Check `value == sum(children)` on every internal node.
    pub fn is_consistent(&self) -> bool {
        self.is_leaf()
            || (self.value == self.children.iter().map(|c| c.value).sum::<usize>()
                && self.children.iter().all(HierarchyNode::is_consistent))
    }

    /// Number of leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(HierarchyNode::leaf_count).sum()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Navigation State
// ─────────────────────────────────────────────────────────────────────────────

/// Which node of the platform → group wheel is zoomed into.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DrillFocus {
    #[default]
    Root,
    Platform(String),
    Group { platform: String, group: String },
}

impl DrillFocus {
    pub fn depth(&self) -> usize {
        match self {
            DrillFocus::Root => 0,
            DrillFocus::Platform(_) => 1,
            DrillFocus::Group { .. } => 2,
        }
    }

    pub fn platform(&self) -> Option<&str> {
        match self {
            DrillFocus::Root => None,
            DrillFocus::Platform(p) | DrillFocus::Group { platform: p, .. } => Some(p),
        }
    }

    pub fn group(&self) -> Option<&str> {
        match self {
            DrillFocus::Group { group, .. } => Some(group),
            _ => None,
        }
    }
}

/// Which group the treemap is drilled into.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TreemapFocus {
    #[default]
    AllGroups,
    Group(String),
}

/// Mobile bottom-drawer visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawerState {
    #[default]
    Closed,
    Pill,
    Peek,
    Full,
}

impl DrawerState {
    /// Visibility rank: `Full > Peek > Pill > Closed`.
    pub fn rank(&self) -> u8 {
        match self {
            DrawerState::Closed => 0,
            DrawerState::Pill => 1,
            DrawerState::Peek => 2,
            DrawerState::Full => 3,
        }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, DrawerState::Closed)
    }

    /// One level less visible.
    pub fn step_down(&self) -> DrawerState {
        match self {
            DrawerState::Full => DrawerState::Peek,
            DrawerState::Peek => DrawerState::Pill,
            DrawerState::Pill | DrawerState::Closed => DrawerState::Closed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DrawerState::Closed => "closed",
            DrawerState::Pill => "pill",
            DrawerState::Peek => "peek",
            DrawerState::Full => "full",
        }
    }
}

impl FromStr for DrawerState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "closed" => Ok(DrawerState::Closed),
            "pill" => Ok(DrawerState::Pill),
            "peek" => Ok(DrawerState::Peek),
            "full" => Ok(DrawerState::Full),
            other => Err(format!("unknown drawer state '{other}'")),
        }
    }
}

/// The view currently presenting the filtered subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    #[default]
    Grid,
    List,
    Bubbles,
    Wheel,
    Treemap,
}

impl ViewKind {
    pub const ALL: [ViewKind; 5] = [
        ViewKind::Grid,
        ViewKind::List,
        ViewKind::Bubbles,
        ViewKind::Wheel,
        ViewKind::Treemap,
    ];

    /// Views drawn from a hierarchy rather than the flat list.
    pub fn is_visualization(&self) -> bool {
        matches!(self, ViewKind::Bubbles | ViewKind::Wheel | ViewKind::Treemap)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewKind::Grid => "grid",
            ViewKind::List => "list",
            ViewKind::Bubbles => "bubbles",
            ViewKind::Wheel => "wheel",
            ViewKind::Treemap => "treemap",
        }
    }
}

impl FromStr for ViewKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewKind::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown view '{s}'"))
    }
}

/// Sortable columns of the list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Name,
    Channel,
    Platform,
    Geography,
    Topic,
    Group,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "channel" => Ok(SortKey::Channel),
            "platform" => Ok(SortKey::Platform),
            "geography" => Ok(SortKey::Geography),
            "topic" => Ok(SortKey::Topic),
            "group" => Ok(SortKey::Group),
            other => Err(format!("unknown sort column '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

// ─────────────────────────────────────────────────────────────────────────────
// App Config
// ─────────────────────────────────────────────────────────────────────────────

/// Curated group order used by the sidebar and the treemap.
pub const ORDERED_GROUPS: [&str; 9] = [
    "Power & Politics",
    "Money & Work",
    "Civic Life",
    "Social Issues",
    "Science, Health & Environment",
    "Culture & Media",
    "Lifestyle & Personal Life",
    "Journalism Formats",
    "General News",
];

/// Application configuration.
///
/// Persistence (load/save) is provided by atlas-core via the `AtlasConfigExt`
/// trait, as it needs platform-specific dependencies. Every field has a serde
/// default so partial config files stay valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtlasConfig {
    /// File path or http(s) URL of the creators JSON
    #[serde(default = "default_data_source")]
    pub data_source: String,
    #[serde(default = "default_geography")]
    pub fallback_geography: String,
    #[serde(default = "default_group")]
    pub default_group: String,
    #[serde(default = "default_ordered_groups")]
    pub ordered_groups: Vec<String>,
    /// Bubble categories below this count are merged into "Other"
    #[serde(default = "default_small_bucket_threshold")]
    pub small_bucket_threshold: usize,
    /// Above this many bubbles the radius range narrows
    #[serde(default = "default_dense_bubble_count")]
    pub dense_bubble_count: usize,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    #[serde(default = "default_resize_debounce_ms")]
    pub resize_debounce_ms: u64,
    #[serde(default = "default_drawer_open_delay_ms")]
    pub drawer_open_delay_ms: u64,
    /// Viewports at or below this width use the mobile drawer
    #[serde(default = "default_mobile_breakpoint_px")]
    pub mobile_breakpoint_px: u32,
    /// Cards per topic shown in the drawer before "Show more"
    #[serde(default = "default_drawer_page_size")]
    pub drawer_page_size: usize,
    #[serde(default = "default_pack_limit")]
    pub pack_limit: usize,
}

fn default_data_source() -> String {
    "assets/data/creators-data.json".to_string()
}
fn default_geography() -> String {
    "US".to_string()
}
fn default_group() -> String {
    "General News".to_string()
}
fn default_ordered_groups() -> Vec<String> {
    ORDERED_GROUPS.iter().map(|g| g.to_string()).collect()
}
fn default_small_bucket_threshold() -> usize {
    3
}
fn default_dense_bubble_count() -> usize {
    30
}
fn default_search_debounce_ms() -> u64 {
    150
}
fn default_resize_debounce_ms() -> u64 {
    250
}
fn default_drawer_open_delay_ms() -> u64 {
    800
}
fn default_mobile_breakpoint_px() -> u32 {
    768
}
fn default_drawer_page_size() -> usize {
    10
}
fn default_pack_limit() -> usize {
    12
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            data_source: default_data_source(),
            fallback_geography: default_geography(),
            default_group: default_group(),
            ordered_groups: default_ordered_groups(),
            small_bucket_threshold: default_small_bucket_threshold(),
            dense_bubble_count: default_dense_bubble_count(),
            search_debounce_ms: default_search_debounce_ms(),
            resize_debounce_ms: default_resize_debounce_ms(),
            drawer_open_delay_ms: default_drawer_open_delay_ms(),
            mobile_breakpoint_px: default_mobile_breakpoint_px(),
            drawer_page_size: default_drawer_page_size(),
            pack_limit: default_pack_limit(),
        }
    }
}

impl AtlasConfig {
    /// Create a config reading from the given data source, other fields defaulted.
    pub fn with_data_source(data_source: impl Into<String>) -> Self {
        Self {
            data_source: data_source.into(),
            ..Self::default()
        }
    }

    pub fn is_mobile(&self, viewport_width: u32) -> bool {
        viewport_width <= self.mobile_breakpoint_px
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(topic: Option<&str>) -> CreatorRecord {
        CreatorRecord {
            id: 0,
            name: "jane doe smith".into(),
            channel: String::new(),
            link: String::new(),
            platform: Some("  ".into()),
            group: "Civic Life".into(),
            geography: "US".into(),
            topic: topic.map(String::from),
            tags: String::new(),
            notes: String::new(),
        }
    }

    #[test]
    fn blank_values_read_as_missing() {
        let r = record(None);
        assert_eq!(r.facet_value(Facet::Platform), None);
        assert_eq!(r.facet_value(Facet::Topic), None);
        assert_eq!(r.facet_value(Facet::Group), Some("Civic Life"));
    }

    #[test]
    fn primary_topic_takes_first_piece() {
        assert_eq!(record(Some("Climate, Energy")).primary_topic(), "Climate");
        assert_eq!(record(None).primary_topic(), "");
        assert_eq!(record(None).initials(), "JD");
    }

    #[test]
    fn value_set_toggle_keeps_insertion_order() {
        let mut set = ValueSet::new();
        assert!(set.toggle("b"));
        assert!(set.toggle("a"));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["b", "a"]);
        assert!(!set.toggle("b"));
        assert_eq!(set.single(), Some("a"));
    }

    #[test]
    fn active_count_includes_search() {
        let mut state = FilterState::default();
        assert!(state.is_empty());
        state.platform.insert("Podcast");
        state.topic.insert("Sports");
        state.search = "news".into();
        assert_eq!(state.active_count(), 3);
        state.clear();
        assert!(state.is_empty());
    }

    #[test]
    fn branch_sums_children() {
        let node = HierarchyNode::branch(
            "root",
            NodeKind::Root,
            vec![HierarchyNode::leaf("a", 2), HierarchyNode::leaf("b", 3)],
        );
        assert_eq!(node.value, 5);
        assert!(node.is_consistent());
        assert_eq!(node.leaf_count(), 2);
    }

    #[test]
    fn drawer_steps_down_to_closed() {
        assert_eq!(DrawerState::Full.step_down(), DrawerState::Peek);
        assert_eq!(DrawerState::Peek.step_down(), DrawerState::Pill);
        assert_eq!(DrawerState::Pill.step_down(), DrawerState::Closed);
        assert!(DrawerState::Full.rank() > DrawerState::Peek.rank());
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: AtlasConfig =
            serde_json::from_str(r#"{ "small_bucket_threshold": 5 }"#).unwrap();
        assert_eq!(config.small_bucket_threshold, 5);
        assert_eq!(config.fallback_geography, "US");
        assert_eq!(config.ordered_groups.len(), ORDERED_GROUPS.len());
        assert!(config.is_mobile(768));
        assert!(!config.is_mobile(769));
    }
}
