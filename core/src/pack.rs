//! Starter packs: a hand-picked selection of creators with a shareable link
//!
//! Canvas rendering and the share sheet are front-end concerns; this module
//! owns the selection rules and the text and links derived from it.

use serde::Serialize;

use atlas_types::{CreatorRecord, FilterState};

use crate::error::PackError;

pub const DEFAULT_PACK_NAME: &str = "My Atlas Pack";
/// Hard cap on creators per pack; configured limits are clamped to it.
pub const MAX_PACK_SIZE: usize = 12;
const FALLBACK_SLUG: &str = "atlas-pack";
const PLATFORM_PREFIXES: [&str; 3] = ["Newsletter - ", "Video - ", "Podcast - "];
const SHARE_NAMES: usize = 3;

/// A creator as captured in a pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackEntry {
    pub name: String,
    pub channel: String,
    pub platform: String,
    pub link: String,
    pub topic: String,
}

impl From<&CreatorRecord> for PackEntry {
    fn from(record: &CreatorRecord) -> Self {
        Self {
            name: record.name.clone(),
            channel: record.channel.clone(),
            platform: record.platform.clone().unwrap_or_default(),
            link: record.link.clone(),
            topic: record.primary_topic().to_string(),
        }
    }
}

/// Ordered pack selection keyed by creator name, capped at `limit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackSelection {
    entries: Vec<PackEntry>,
    limit: usize,
}

impl PackSelection {
    /// `limit` is clamped to `1..=MAX_PACK_SIZE`.
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit: limit.clamp(1, MAX_PACK_SIZE),
        }
    }

    pub fn entries(&self) -> &[PackEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Select or deselect a creator. Returns true when now selected.
    pub fn toggle(&mut self, record: &CreatorRecord) -> Result<bool, PackError> {
        if let Some(index) = self.entries.iter().position(|e| e.name == record.name) {
            self.entries.remove(index);
            return Ok(false);
        }
        if self.entries.len() >= self.limit {
            return Err(PackError::Full { max: self.limit });
        }
        self.entries.push(PackEntry::from(record));
        Ok(true)
    }

    pub fn remove_at(&mut self, index: usize) -> Option<PackEntry> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    /// Seed an empty selection with the first visible creators.
    pub fn prefill<'a>(&mut self, visible: impl IntoIterator<Item = &'a CreatorRecord>) {
        if !self.entries.is_empty() {
            return;
        }
        self.entries = visible
            .into_iter()
            .take(self.limit)
            .map(PackEntry::from)
            .collect();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Counter shown next to selectable drawer cards.
    pub fn counter_label(&self) -> String {
        match self.entries.len() {
            0 => "Tap to select".to_string(),
            n => format!("{n} selected"),
        }
    }
}

/// Drawer cards become selectable once any filter is active.
pub fn selection_enabled(state: &FilterState) -> bool {
    state.active_count() > 0
}

/// Pack name derived from the filters that produced the selection.
pub fn suggest_name(state: &FilterState) -> String {
    if let Some(group) = state.group.single() {
        return format!("My {group} Reads");
    }
    if let Some(platform) = state.platform.single() {
        let short = PLATFORM_PREFIXES
            .iter()
            .fold(platform.to_string(), |name, prefix| name.replace(prefix, ""));
        return format!("My {short} Picks");
    }
    if let Some(geography) = state.geography.single() {
        return format!("{geography} Creators");
    }
    if !state.search.is_empty() {
        return format!("\"{}\" Creators", state.search);
    }
    DEFAULT_PACK_NAME.to_string()
}

/// Lowercase, non-alphanumeric runs to `-`, trimmed.
pub fn slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

pub fn share_title(name: &str) -> String {
    format!("{name} — Atlas Starter Pack")
}

/// First three names plus an overflow count.
pub fn share_text(entries: &[PackEntry]) -> String {
    let names = entries
        .iter()
        .take(SHARE_NAMES)
        .map(|e| e.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let more = if entries.len() > SHARE_NAMES {
        format!(" + {} more", entries.len() - SHARE_NAMES)
    } else {
        String::new()
    };
    format!("{names}{more} — curated on the Independent Journalism Atlas")
}

/// Link read by the pack page's preview injector: `creators`, `name`, `from`.
pub fn pack_link(base: &str, entries: &[PackEntry], name: &str, from: Option<&str>) -> String {
    let creators = entries
        .iter()
        .map(|e| urlencoding::encode(&e.name).into_owned())
        .collect::<Vec<_>>()
        .join(",");
    let mut link = format!(
        "{base}?creators={creators}&name={}",
        urlencoding::encode(name)
    );
    if let Some(from) = from.map(str::trim).filter(|f| !f.is_empty()) {
        link.push_str("&from=");
        link.push_str(&urlencoding::encode(from));
    }
    link
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_dataset;
    use atlas_types::ValueSet;

    #[test]
    fn selection_is_capped() {
        let dataset = sample_dataset();
        let mut pack = PackSelection::new(2);
        let records = dataset.records();

        assert_eq!(pack.toggle(&records[0]), Ok(true));
        assert_eq!(pack.toggle(&records[1]), Ok(true));
        assert_eq!(pack.toggle(&records[2]), Err(PackError::Full { max: 2 }));
        assert_eq!(pack.toggle(&records[0]), Ok(false));
        assert_eq!(pack.toggle(&records[2]), Ok(true));
        assert_eq!(pack.counter_label(), "2 selected");
    }

    #[test]
    fn limit_is_clamped_to_max_pack_size() {
        assert_eq!(PackSelection::new(20).limit(), MAX_PACK_SIZE);
        assert_eq!(PackSelection::new(0).limit(), 1);

        let records: Vec<CreatorRecord> = (0..20)
            .map(|i| CreatorRecord {
                id: i,
                name: format!("Creator {i}"),
                ..sample_dataset().records()[0].clone()
            })
            .collect();
        let mut pack = PackSelection::new(20);
        for record in &records {
            let _ = pack.toggle(record);
        }
        assert_eq!(pack.len(), MAX_PACK_SIZE);

        pack.clear();
        pack.prefill(&records);
        assert_eq!(pack.len(), MAX_PACK_SIZE);
    }

    #[test]
    fn prefill_takes_first_visible_only_when_empty() {
        let dataset = sample_dataset();
        let mut pack = PackSelection::new(4);
        pack.prefill(dataset.records());
        assert_eq!(pack.len(), 4);
        assert_eq!(pack.entries()[0].name, "Ada Lane");
        assert_eq!(pack.entries()[0].topic, "Local Politics");

        pack.remove_at(0);
        pack.prefill(dataset.records());
        assert_eq!(pack.len(), 3);
    }

    #[test]
    fn suggested_names() {
        let mut state = FilterState::default();
        assert_eq!(suggest_name(&state), "My Atlas Pack");
        assert!(!selection_enabled(&state));

        state.search = "climate".into();
        assert_eq!(suggest_name(&state), "\"climate\" Creators");

        state.geography = ValueSet::from_iter(["UK"]);
        assert_eq!(suggest_name(&state), "UK Creators");

        state.platform = ValueSet::from_iter(["Newsletter - Substack"]);
        assert_eq!(suggest_name(&state), "My Substack Picks");

        state.group = ValueSet::from_iter(["Civic Life", "Money & Work"]);
        assert_eq!(suggest_name(&state), "My Substack Picks");

        state.group = ValueSet::from_iter(["Civic Life"]);
        assert_eq!(suggest_name(&state), "My Civic Life Reads");
    }

    #[test]
    fn slug_collapses_punctuation() {
        assert_eq!(slug("My Civic Life Reads!"), "my-civic-life-reads");
        assert_eq!(slug("  \"Science & Health\"  "), "science-health");
        assert_eq!(slug("!!!"), "atlas-pack");
    }

    #[test]
    fn share_text_and_link() {
        let dataset = sample_dataset();
        let mut pack = PackSelection::new(12);
        pack.prefill(dataset.records());

        assert_eq!(
            share_text(pack.entries()),
            "Ada Lane, Bo Reyes, Cy Park + 3 more — curated on the Independent Journalism Atlas"
        );
        assert_eq!(
            pack_link("/pack", &pack.entries()[..2], "My Picks", Some("Sam")),
            "/pack?creators=Ada%20Lane,Bo%20Reyes&name=My%20Picks&from=Sam"
        );
        assert_eq!(
            pack_link("/pack", &pack.entries()[..1], "P", Some("  ")),
            "/pack?creators=Ada%20Lane&name=P"
        );
    }
}
