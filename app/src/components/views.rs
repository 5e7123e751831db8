//! Main pane: grid, list, bubbles, wheel and treemap renderings of the view model

use atlas_core::explorer::{BubbleView, ListSort, TreemapView, WheelView};
use atlas_core::{
    AtlasEvent, CreatorRecord, DrillFocus, Facet, HierarchyNode, SortDirection, SortKey,
    TreemapCrumb, TreemapFocus, ViewBody, ViewModel,
};
use dioxus::prelude::*;

use crate::app::AtlasHandle;

const LIST_COLUMNS: [(SortKey, &str); 6] = [
    (SortKey::Name, "Name"),
    (SortKey::Channel, "Channel"),
    (SortKey::Platform, "Platform"),
    (SortKey::Geography, "Geography"),
    (SortKey::Topic, "Topic"),
    (SortKey::Group, "Group"),
];

pub fn view_pane(handle: AtlasHandle, vm: &ViewModel<'_>) -> Element {
    let session = handle.session();
    let guard = session.read();
    // Pack membership per record name, only while selection is possible
    let picked = |record: &CreatorRecord| -> Option<bool> {
        let explorer = guard.explorer()?;
        vm.pack_enabled.then(|| explorer.pack().contains(&record.name))
    };

    match &vm.body {
        ViewBody::Empty => rsx! {
            div { class: "empty-state",
                p { "No creators match these filters." }
                button { onclick: move |_| handle.dispatch(AtlasEvent::ClearAll), "Clear all filters" }
            }
        },
        ViewBody::Grid(records) => rsx! {
            div { class: "creator-grid",
                for record in records.iter() {
                    {creator_card(handle, record, picked(record))}
                }
            }
        },
        ViewBody::List { rows, sort } => list_table(handle, rows, *sort),
        ViewBody::Bubbles(view) => bubble_chart(handle, view),
        ViewBody::Wheel(view) => wheel(handle, view, |r| picked(r)),
        ViewBody::Treemap(view) => treemap(handle, view),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Grid and list
// ─────────────────────────────────────────────────────────────────────────────

fn creator_card(handle: AtlasHandle, record: &CreatorRecord, picked: Option<bool>) -> Element {
    let id = record.id;
    let initials = record.initials();
    let platform = record.platform.clone().unwrap_or_default();
    let topic = record.primary_topic().to_string();

    rsx! {
        article { key: "{id}", class: if picked == Some(true) { "creator-card picked" } else { "creator-card" },
            div { class: "card-avatar", "{initials}" }
            div { class: "card-body",
                h3 { class: "card-name", "{record.name}" }
                if !record.channel.is_empty() {
                    a { class: "card-channel", href: "{record.link}", target: "_blank", rel: "noopener", "{record.channel}" }
                }
                div { class: "card-tags",
                    if !platform.is_empty() {
                        span { class: "tag tag-platform", "{platform}" }
                    }
                    span { class: "tag tag-group", "{record.group}" }
                    span { class: "tag tag-geo", "{record.geography}" }
                    span { class: "tag tag-topic", "{topic}" }
                }
            }
            {picked.map(|checked| rsx! {
                input {
                    class: "card-pick",
                    r#type: "checkbox",
                    checked: checked,
                    onchange: move |_| handle.dispatch(AtlasEvent::PackToggle(id)),
                }
            })}
        }
    }
}

fn list_table(handle: AtlasHandle, rows: &[&CreatorRecord], sort: Option<ListSort>) -> Element {
    let arrow = |key: SortKey| match sort {
        Some(ListSort { key: k, direction: SortDirection::Asc }) if k == key => " ▲",
        Some(ListSort { key: k, direction: SortDirection::Desc }) if k == key => " ▼",
        _ => "",
    };

    rsx! {
        table { class: "creator-list",
            thead {
                tr {
                    for (key, title) in LIST_COLUMNS {
                        th {
                            key: "{title}",
                            class: "sortable",
                            onclick: move |_| handle.dispatch(AtlasEvent::SortBy(key)),
                            "{title}{arrow(key)}"
                        }
                    }
                }
            }
            tbody {
                for record in rows.iter() {
                    tr { key: "{record.id}",
                        td { "{record.name}" }
                        td {
                            a { href: "{record.link}", target: "_blank", rel: "noopener", "{record.channel}" }
                        }
                        td { "{record.platform.as_deref().unwrap_or_default()}" }
                        td { "{record.geography}" }
                        td { "{record.topic.as_deref().unwrap_or_default()}" }
                        td { "{record.group}" }
                    }
                }
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Bubbles
// ─────────────────────────────────────────────────────────────────────────────

fn bubble_chart(handle: AtlasHandle, view: &BubbleView) -> Element {
    let current = view.facet;
    let total = view.total;
    let samples = view.size_samples.map(|count| (count, view.scale.radius(count)));

    rsx! {
        div { class: "bubble-view",
            div { class: "bubble-controls",
                span { "Group bubbles by" }
                for facet in Facet::ALL {
                    button {
                        key: "{facet.param()}",
                        class: if facet == current { "bubble-facet active" } else { "bubble-facet" },
                        onclick: move |_| handle.dispatch(AtlasEvent::SetBubbleFacet(facet)),
                        "{facet.label()}"
                    }
                }
            }
            div { class: "bubble-field",
                for bubble in view.bubbles.iter() {
                    div {
                        key: "{bubble.name}",
                        class: if bubble.clickable { "bubble" } else { "bubble disabled" },
                        title: "{bubble.name}: {bubble.count}",
                        style: "width: {bubble.radius * 2.0}px; height: {bubble.radius * 2.0}px;",
                        onclick: {
                            let name = bubble.name.clone();
                            let clickable = bubble.clickable;
                            move |_| {
                                if clickable {
                                    handle.dispatch(AtlasEvent::BubbleClick(name.clone()));
                                }
                            }
                        },
                        {bubble.label.as_ref().map(|label| rsx! { span { class: "bubble-label", "{label}" } })}
                        if bubble.show_count {
                            span { class: "bubble-count", "{bubble.count}" }
                        }
                    }
                }
            }
            aside { class: "bubble-legend",
                h4 { "{total} creators" }
                ol {
                    for entry in view.legend.iter() {
                        li { key: "{entry.name}", "{entry.name} ({entry.count})" }
                    }
                }
                div { class: "size-legend",
                    span { "Bubble size = creators" }
                    for (count, radius) in samples {
                        div {
                            key: "{count}",
                            class: "size-sample",
                            style: "width: {radius * 2.0}px; height: {radius * 2.0}px;",
                            "{count}"
                        }
                    }
                }
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wheel
// ─────────────────────────────────────────────────────────────────────────────

/// Nodes on the ring around the current focus, and the platform a click drills within.
fn wheel_ring<'a>(tree: &'a HierarchyNode, focus: &'a DrillFocus) -> (Vec<&'a HierarchyNode>, Option<&'a str>) {
    match focus {
        DrillFocus::Root => (tree.children.iter().collect(), None),
        DrillFocus::Platform(platform) => (
            tree.child(platform)
                .map(|p| p.children.iter().collect())
                .unwrap_or_default(),
            Some(platform),
        ),
        DrillFocus::Group { platform, group } => (
            tree.child(platform).and_then(|p| p.child(group)).into_iter().collect(),
            Some(platform),
        ),
    }
}

fn wheel<'a>(
    handle: AtlasHandle,
    view: &WheelView<'a>,
    picked: impl Fn(&CreatorRecord) -> Option<bool>,
) -> Element {
    let (ring, platform) = wheel_ring(view.tree, view.focus);
    let at_group = matches!(view.focus, DrillFocus::Group { .. });
    let platform = platform.map(str::to_string);
    let center = &view.center;
    let shows_back = center.shows_back;

    rsx! {
        div { class: "wheel-view",
            nav { class: "breadcrumbs",
                for crumb in view.breadcrumbs.iter() {
                    if crumb.active {
                        span { key: "{crumb.label}", class: "crumb active", "{crumb.label}" }
                    } else {
                        button {
                            key: "{crumb.label}",
                            class: "crumb",
                            onclick: {
                                let target = crumb.target.clone();
                                move |_| handle.dispatch(AtlasEvent::WheelCrumb(target.clone()))
                            },
                            "{crumb.label}"
                        }
                    }
                }
            }
            div { class: "wheel",
                button {
                    class: if shows_back { "wheel-center back" } else { "wheel-center" },
                    onclick: move |_| {
                        if shows_back {
                            handle.dispatch(AtlasEvent::WheelCenter);
                        }
                    },
                    strong { "{center.title}" }
                    span { class: "wheel-count", "{center.count}" }
                    span { class: "wheel-caption", "{center.caption}" }
                }
                ul { class: "wheel-ring",
                    for node in ring {
                        li {
                            key: "{node.name}-{node.kind:?}",
                            class: if node.is_clickable() && !at_group { "wheel-segment" } else { "wheel-segment disabled" },
                            style: "flex-grow: {node.value};",
                            onclick: {
                                let name = node.name.clone();
                                let clickable = node.is_clickable() && !at_group;
                                let platform = platform.clone();
                                move |_| {
                                    if !clickable {
                                        return;
                                    }
                                    let event = match &platform {
                                        None => AtlasEvent::WheelPlatform(name.clone()),
                                        Some(platform) => AtlasEvent::WheelGroup {
                                            platform: platform.clone(),
                                            group: name.clone(),
                                        },
                                    };
                                    handle.dispatch(event);
                                }
                            },
                            span { class: "segment-name", "{node.name}" }
                            span { class: "segment-count", "{node.value}" }
                        }
                    }
                }
            }
            if !view.members.is_empty() {
                table { class: "wheel-members",
                    tbody {
                        for record in view.members.iter() {
                            tr { key: "{record.id}",
                                td { "{record.name}" }
                                td {
                                    a { href: "{record.link}", target: "_blank", rel: "noopener", "{record.channel}" }
                                }
                                td { "{record.topic.as_deref().unwrap_or_default()}" }
                                {picked(record).map(|checked| {
                                    let id = record.id;
                                    rsx! {
                                        td {
                                            input {
                                                r#type: "checkbox",
                                                checked: checked,
                                                onchange: move |_| handle.dispatch(AtlasEvent::PackToggle(id)),
                                            }
                                        }
                                    }
                                })}
                            }
                        }
                    }
                }
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Treemap
// ─────────────────────────────────────────────────────────────────────────────

fn treemap(handle: AtlasHandle, view: &TreemapView<'_>) -> Element {
    let drilled = match view.focus {
        TreemapFocus::AllGroups => None,
        TreemapFocus::Group(group) => Some(group.clone()),
    };

    rsx! {
        div { class: "treemap-view",
            nav { class: "breadcrumbs",
                for (i, crumb) in view.breadcrumbs.iter().enumerate() {
                    if crumb.active {
                        span { key: "{i}", class: "crumb active", "{crumb.label}" }
                    } else {
                        button {
                            key: "{i}",
                            class: "crumb",
                            onclick: {
                                let target: TreemapCrumb = crumb.target;
                                move |_| handle.dispatch(AtlasEvent::TreemapCrumb(target))
                            },
                            "{crumb.label}"
                        }
                    }
                }
            }
            div { class: "treemap",
                for node in view.tree.children.iter() {
                    {match &drilled {
                        None => rsx! {
                            div {
                                key: "{node.name}-{node.kind:?}",
                                class: "treemap-group",
                                style: "flex-grow: {node.value};",
                                button {
                                    class: "treemap-group-title",
                                    onclick: {
                                        let group = node.name.clone();
                                        move |_| handle.dispatch(AtlasEvent::TreemapGroup(group.clone()))
                                    },
                                    "{node.name} ({node.value})"
                                }
                                div { class: "treemap-cells",
                                    for topic in node.children.iter() {
                                        {topic_cell(handle, &node.name, topic)}
                                    }
                                }
                            }
                        },
                        Some(group) => topic_cell(handle, group, node),
                    }}
                }
            }
        }
    }
}

fn topic_cell(handle: AtlasHandle, group: &str, topic: &HierarchyNode) -> Element {
    let event = AtlasEvent::TreemapTopic {
        group: group.to_string(),
        topic: topic.name.clone(),
    };

    rsx! {
        div {
            key: "{topic.name}-{topic.kind:?}",
            class: "treemap-cell",
            style: "flex-grow: {topic.value};",
            title: "{topic.name}: {topic.value}",
            onclick: move |_| handle.dispatch(event.clone()),
            span { class: "cell-name", "{topic.name}" }
            span { class: "cell-count", "{topic.value}" }
        }
    }
}
