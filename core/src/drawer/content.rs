//! Member list shown in the mobile drawer

use serde::Serialize;

use atlas_types::{CreatorRecord, RecordId};

/// One card in the drawer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawerCard {
    pub id: RecordId,
    pub name: String,
    pub channel: String,
    pub link: String,
    /// Primary topic, shown as a tag
    pub tag: String,
}

impl From<&CreatorRecord> for DrawerCard {
    fn from(record: &CreatorRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            channel: record.channel.clone(),
            link: record.link.clone(),
            tag: record.primary_topic().to_string(),
        }
    }
}

/// Cards sharing a primary topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicGroup {
    pub topic: String,
    cards: Vec<DrawerCard>,
    shown: usize,
}

impl TopicGroup {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn header(&self) -> String {
        format!("{} ({})", self.topic, self.cards.len())
    }

    /// Cards currently rendered.
    pub fn visible(&self) -> &[DrawerCard] {
        &self.cards[..self.shown]
    }

    pub fn hidden(&self) -> usize {
        self.cards.len() - self.shown
    }

    /// "Show N more" while cards are hidden.
    pub fn show_more_label(&self) -> Option<String> {
        (self.hidden() > 0).then(|| format!("Show {} more", self.hidden()))
    }
}

/// Drawer body for one focused hierarchy node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawerContent {
    pub title: String,
    groups: Vec<TopicGroup>,
    scroll_top: f64,
}

impl DrawerContent {
    /// Group `members` by primary topic, largest topic first.
    pub fn build(label: &str, members: &[&CreatorRecord], page_size: usize) -> Self {
        let mut groups: Vec<TopicGroup> = Vec::new();
        for record in members {
            let topic = record.primary_topic();
            match groups.iter_mut().find(|g| g.topic == topic) {
                Some(group) => group.cards.push(DrawerCard::from(*record)),
                None => groups.push(TopicGroup {
                    topic: topic.to_string(),
                    cards: vec![DrawerCard::from(*record)],
                    shown: 0,
                }),
            }
        }

        // Stable: ties keep first-seen order
        groups.sort_by(|a, b| b.cards.len().cmp(&a.cards.len()));
        for group in &mut groups {
            group.shown = group.cards.len().min(page_size);
        }

        let count = members.len();
        Self {
            title: format!(
                "{label} · {count} creator{}",
                if count == 1 { "" } else { "s" }
            ),
            groups,
            scroll_top: 0.0,
        }
    }

    pub fn groups(&self) -> &[TopicGroup] {
        &self.groups
    }

    pub fn member_count(&self) -> usize {
        self.groups.iter().map(TopicGroup::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Reveal every card of one topic. The scroll offset is left alone.
    pub fn expand_topic(&mut self, topic: &str) -> bool {
        match self.groups.iter_mut().find(|g| g.topic == topic) {
            Some(group) if group.hidden() > 0 => {
                group.shown = group.cards.len();
                true
            }
            _ => false,
        }
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    pub fn set_scroll_top(&mut self, offset: f64) {
        self.scroll_top = offset.max(0.0);
    }
}
