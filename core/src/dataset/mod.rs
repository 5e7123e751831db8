//! Creator dataset loading and derived indexes
//!
//! The dataset is a JSON array of flat objects. Every row passes through
//! [`normalize`]; rows without a name are dropped here so they never reach
//! the filter core. The [`DatasetIndex`] replaces the process-wide platform
//! set with a queryable structure built once per load.

mod normalize;
#[cfg(not(target_arch = "wasm32"))]
mod source;

use std::collections::BTreeSet;

use hashbrown::HashMap;
use serde::Serialize;
use tracing::{info, warn};

use atlas_types::{CreatorRecord, Facet, RecordId};

use crate::collate::{count_desc_then_name, curated_cmp, locale_cmp};
use crate::error::LoadError;

pub use normalize::{LoaderConfig, RawRow, normalize, split_multi};
#[cfg(not(target_arch = "wasm32"))]
pub use source::{DataSource, load};

/// One selectable value in the filter sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetOption {
    pub value: String,
    pub count: usize,
}

/// Lookups derived from the loaded records.
#[derive(Debug, Clone, Default)]
pub struct DatasetIndex {
    platforms: BTreeSet<String>,
    by_group: HashMap<String, Vec<RecordId>>,
    options: HashMap<Facet, Vec<FacetOption>>,
}

impl DatasetIndex {
    pub fn build(records: &[CreatorRecord], ordered_groups: &[String]) -> Self {
        let mut platforms = BTreeSet::new();
        let mut by_group: HashMap<String, Vec<RecordId>> = HashMap::new();
        let mut counts: HashMap<Facet, HashMap<&str, usize>> = HashMap::new();

        for record in records {
            if let Some(platform) = record.facet_value(Facet::Platform) {
                platforms.insert(platform.to_string());
            }
            by_group
                .entry(record.group.clone())
                .or_default()
                .push(record.id);
            for facet in Facet::ALL {
                if let Some(value) = record.facet_value(facet) {
                    *counts.entry(facet).or_default().entry(value).or_insert(0) += 1;
                }
            }
        }

        let mut options = HashMap::new();
        for facet in Facet::ALL {
            let mut list: Vec<FacetOption> = counts
                .get(&facet)
                .map(|table| {
                    table
                        .iter()
                        .map(|(value, count)| FacetOption {
                            value: value.to_string(),
                            count: *count,
                        })
                        .collect()
                })
                .unwrap_or_default();

            match facet {
                Facet::Group => list.sort_by(|a, b| curated_cmp(ordered_groups, &a.value, &b.value)),
                Facet::Platform => list.sort_by(|a, b| {
                    count_desc_then_name((&a.value, a.count), (&b.value, b.count))
                }),
                Facet::Geography | Facet::Topic => {
                    list.sort_by(|a, b| locale_cmp(&a.value, &b.value))
                }
            }
            options.insert(facet, list);
        }

        Self {
            platforms,
            by_group,
            options,
        }
    }

    /// Distinct platform values seen at load.
    pub fn platforms(&self) -> &BTreeSet<String> {
        &self.platforms
    }

    /// Record ids in a group, in load order.
    pub fn group_members(&self, group: &str) -> &[RecordId] {
        self.by_group.get(group).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Values and counts for a facet, in sidebar order.
    pub fn facet_options(&self, facet: Facet) -> &[FacetOption] {
        self.options.get(&facet).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// The loaded, normalized dataset.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<CreatorRecord>,
    index: DatasetIndex,
    dropped: usize,
}

impl Dataset {
    /// Normalize raw rows, assigning dense ids over the kept rows.
    pub fn from_rows(rows: Vec<RawRow>, config: &LoaderConfig) -> Result<Self, LoadError> {
        let total = rows.len();
        let mut records = Vec::with_capacity(total);

        for (row_number, row) in rows.into_iter().enumerate() {
            let id = records.len() as RecordId;
            match normalize(row, id, config) {
                Some(record) => records.push(record),
                None => warn!(row = row_number, "Dropping dataset row without a name"),
            }
        }

        if records.is_empty() {
            return Err(LoadError::Empty);
        }

        let dropped = total - records.len();
        let index = DatasetIndex::build(&records, &config.ordered_groups);
        info!(
            records = records.len(),
            dropped,
            platforms = index.platforms().len(),
            "Dataset loaded"
        );

        Ok(Self {
            records,
            index,
            dropped,
        })
    }

    pub fn from_json_str(json: &str, config: &LoaderConfig) -> Result<Self, LoadError> {
        let rows: Vec<RawRow> = serde_json::from_str(json)?;
        Self::from_rows(rows, config)
    }

    pub fn records(&self) -> &[CreatorRecord] {
        &self.records
    }

    pub fn get(&self, id: RecordId) -> Option<&CreatorRecord> {
        self.records.get(id as usize)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn index(&self) -> &DatasetIndex {
        &self.index
    }

    /// Rows discarded for lacking a name.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"name": "Ada", "platform": "Podcast", "group": "Civic Life", "geography": "UK"},
        {"name": "", "platform": "Podcast"},
        {"name": "Bo", "platform": "Video - YouTube", "group": "Zoology"},
        {"name": "Cy", "platform": "Video - YouTube", "group": "Power & Politics", "topic": "Elections"},
        {"Creator Name": "Di", "Platform Primary": "Podcast", "Groups": ""}
    ]"#;

    fn sample() -> Dataset {
        Dataset::from_json_str(SAMPLE, &LoaderConfig::default()).unwrap()
    }

    #[test]
    fn mixed_shape_row_does_not_fail_the_load() {
        let json = r#"[
            {"name": "Ada", "Creator Name": "Ada", "group": "Civic Life", "Groups": "Civic Life"},
            {"name": "Bo"},
            "not a row"
        ]"#;
        let dataset = Dataset::from_json_str(json, &LoaderConfig::default()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.dropped(), 1);
        assert_eq!(dataset.records()[0].group, "Civic Life");
    }

    #[test]
    fn ids_are_dense_over_kept_rows() {
        let dataset = sample();
        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.dropped(), 1);
        let ids: Vec<_> = dataset.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert_eq!(dataset.get(3).map(|r| r.name.as_str()), Some("Di"));
    }

    #[test]
    fn index_tracks_platforms_and_groups() {
        let dataset = sample();
        let index = dataset.index();
        assert_eq!(
            index.platforms().iter().collect::<Vec<_>>(),
            vec!["Podcast", "Video - YouTube"]
        );
        assert_eq!(index.group_members("General News"), &[3]);
        assert!(index.group_members("Missing").is_empty());
    }

    #[test]
    fn facet_options_follow_sidebar_order() {
        let dataset = sample();
        let index = dataset.index();

        let groups: Vec<_> = index
            .facet_options(Facet::Group)
            .iter()
            .map(|o| o.value.as_str())
            .collect();
        assert_eq!(
            groups,
            vec!["Power & Politics", "Civic Life", "General News", "Zoology"]
        );

        let platforms = index.facet_options(Facet::Platform);
        assert_eq!(platforms[0].count, 2);
        assert_eq!(platforms.len(), 2);

        let geos: Vec<_> = index
            .facet_options(Facet::Geography)
            .iter()
            .map(|o| o.value.as_str())
            .collect();
        assert_eq!(geos, vec!["UK", "US"]);
    }

    #[test]
    fn all_unnamed_is_an_error() {
        let err = Dataset::from_json_str(r#"[{"channel": "x"}]"#, &LoaderConfig::default());
        assert!(matches!(err, Err(LoadError::Empty)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = Dataset::from_json_str(r#"{"name": "not an array"}"#, &LoaderConfig::default());
        assert!(matches!(err, Err(LoadError::Parse(_))));
    }
}
