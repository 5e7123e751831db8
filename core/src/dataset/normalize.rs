//! Raw row → canonical record mapping
//!
//! Rows arrive either in the flattened shape written by the CSV export
//! (`name`, `platform`, `group`, ...) or in the spreadsheet shape with
//! human-readable headers (`Creator Name`, `Platform Primary`, `Groups`, ...).
//! Both collapse to the single-valued [`CreatorRecord`].

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use atlas_types::{AtlasConfig, CreatorRecord, RecordId};

/// Delimiters accepted between values of a multi-valued cell.
const MULTI_VALUE_DELIMITERS: [char; 3] = [',', ';', '|'];

/// A dataset row as found in the JSON, before normalization.
///
/// Each field is read from the flat key first and the spreadsheet header
/// second, so a row carrying both shapes still loads.
#[derive(Debug, Default, Clone)]
pub struct RawRow {
    pub name: Option<String>,
    pub channel: Option<String>,
    pub link: Option<String>,
    pub platform: Option<String>,
    pub platform_secondary: Option<String>,
    pub group: Option<String>,
    pub topic: Option<String>,
    pub geography: Option<String>,
    pub tags: Option<String>,
    pub notes: Option<String>,
}

impl RawRow {
    /// Build a row from a JSON object. Anything else yields an empty row,
    /// which normalization then drops for lacking a name.
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };
        let field = |keys: &[&str]| keys.iter().find_map(|key| map.get(*key).and_then(lenient_string));

        Self {
            name: field(&["name", "Creator Name"]),
            channel: field(&["channel", "Creator Channel"]),
            link: field(&["link", "Link Primary"]),
            platform: field(&["platform", "Platform Primary"]),
            platform_secondary: field(&["Platform Secondary"]),
            group: field(&["group", "Groups"]),
            topic: field(&["topic", "Topic/Category"]),
            geography: field(&["geography", "Geography"]),
            tags: field(&["tags", "New Tags"]),
            notes: field(&["notes", "Notes"]),
        }
    }
}

impl<'de> Deserialize<'de> for RawRow {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(|value| Self::from_value(&value))
    }
}

/// Accept non-blank strings, numbers and booleans as text; anything else as missing.
fn lenient_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Defaults applied while normalizing rows.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub fallback_geography: String,
    pub default_group: String,
    /// Curated group names; lets a group containing a delimiter survive splitting
    pub ordered_groups: Vec<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self::from(&AtlasConfig::default())
    }
}

impl From<&AtlasConfig> for LoaderConfig {
    fn from(config: &AtlasConfig) -> Self {
        Self {
            fallback_geography: config.fallback_geography.clone(),
            default_group: config.default_group.clone(),
            ordered_groups: config.ordered_groups.clone(),
        }
    }
}

/// Split a multi-valued cell on `,` `;` `|`, trimming and dropping empties.
pub fn split_multi(raw: &str) -> Vec<&str> {
    raw.split(MULTI_VALUE_DELIMITERS)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .collect()
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Pick the primary group of a possibly multi-valued cell.
///
/// Spreadsheet formula errors (`#REF!`, `#N/A`) count as empty. A curated
/// group name at the start of the cell wins over delimiter splitting, since
/// some curated names contain a comma.
fn primary_group(raw: &str, curated: &[String]) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with('#') {
        return None;
    }

    for name in curated {
        if let Some(rest) = raw.strip_prefix(name.as_str()) {
            let rest = rest.trim_start();
            if rest.is_empty() || rest.starts_with(MULTI_VALUE_DELIMITERS) {
                return Some(name.clone());
            }
        }
    }

    split_multi(raw).first().map(|g| g.to_string())
}

/// Map a raw row to a canonical record.
///
/// Returns `None` for rows without a name; those never reach the filter core.
pub fn normalize(row: RawRow, id: RecordId, config: &LoaderConfig) -> Option<CreatorRecord> {
    let name = clean(row.name)?;

    let platform = clean(row.platform)
        .and_then(|p| split_multi(&p).first().map(|s| s.to_string()))
        .or_else(|| {
            row.platform_secondary
                .as_deref()
                .and_then(|s| split_multi(s).first().map(|p| p.to_string()))
        });

    let group = row
        .group
        .as_deref()
        .and_then(|g| primary_group(g, &config.ordered_groups))
        .unwrap_or_else(|| config.default_group.clone());

    Some(CreatorRecord {
        id,
        name,
        channel: clean(row.channel).unwrap_or_default(),
        link: clean(row.link).unwrap_or_default(),
        platform,
        group,
        geography: clean(row.geography).unwrap_or_else(|| config.fallback_geography.clone()),
        topic: clean(row.topic),
        tags: clean(row.tags).unwrap_or_default(),
        notes: clean(row.notes).unwrap_or_default(),
    })
}
