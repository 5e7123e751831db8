use std::rc::Rc;
use std::time::Duration;

use atlas_types::{AtlasConfig, DrawerState, DrillFocus, Facet, SortKey, TreemapFocus, ViewKind};

use super::*;
use crate::dataset::{Dataset, LoaderConfig};
use crate::drill::TreemapCrumb;
use crate::history::MemoryHistory;
use crate::share::MemoryClipboard;
use crate::test_support::sample_dataset;

const YOUTUBE: &str = "Video - YouTube";

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn explorer_with(config: AtlasConfig, width: u32) -> (Explorer, MemoryHistory) {
    let history = MemoryHistory::new("/");
    let explorer = Explorer::new(sample_dataset(), Box::new(history.clone()), config, "/", width);
    (explorer, history)
}

fn explorer(width: u32) -> (Explorer, MemoryHistory) {
    explorer_with(AtlasConfig::default(), width)
}

fn toggle(facet: Facet, value: &str) -> AtlasEvent {
    AtlasEvent::Toggle {
        facet,
        value: value.to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Propagation
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn drill_is_local_and_sidebar_change_resets_focus() {
    let (mut ex, history) = explorer(1280);
    ex.handle(ms(0), AtlasEvent::SetView(ViewKind::Wheel));

    let redraw = ex.handle(ms(0), AtlasEvent::WheelPlatform(YOUTUBE.into()));
    assert_eq!(redraw, Redraw::Local);
    assert_eq!(ex.wheel().focus(), &DrillFocus::Platform(YOUTUBE.into()));
    assert_eq!(ex.filters().visible_count(), 3);
    assert_eq!(history.current_url(), "/?platform=Video%20-%20YouTube");
    assert_eq!(history.depth(), 1);

    let redraw = ex.handle(ms(10), toggle(Facet::Geography, "US"));
    assert_eq!(redraw, Redraw::Full);
    assert_eq!(ex.wheel().focus(), &DrillFocus::Root);
    // Drill filters stay; only the focus resets
    assert_eq!(ex.filters().visible_count(), 2);
}

#[test]
fn wheel_keeps_snapshot_while_drilled() {
    let (mut ex, _) = explorer(1280);
    ex.handle(ms(0), AtlasEvent::SetView(ViewKind::Wheel));
    ex.handle(ms(0), AtlasEvent::WheelPlatform(YOUTUBE.into()));

    assert_eq!(ex.wheel_snapshot().value, 6);
    let ViewBody::Wheel(wheel) = ex.view_model().body else {
        panic!("expected wheel body");
    };
    assert_eq!(wheel.center.title, "VIDEO - YOUTUBE");
    assert_eq!(wheel.center.count, 3);
    assert_eq!(wheel.center.caption, "creators in 2 groups");
    assert_eq!(wheel.breadcrumbs.len(), 2);
    let names: Vec<_> = wheel.members.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Bo Reyes", "Cy Park", "Fay Cole"]);
}

#[test]
fn fallback_wheel_node_is_not_clickable() {
    let (mut ex, _) = explorer(1280);
    ex.handle(ms(0), AtlasEvent::SetView(ViewKind::Wheel));

    assert_eq!(ex.handle(ms(0), AtlasEvent::WheelPlatform("Unknown".into())), Redraw::None);
    assert_eq!(ex.wheel().focus(), &DrillFocus::Root);
    assert!(ex.state().is_empty());
}

#[test]
fn center_steps_out_one_level_at_a_time() {
    let (mut ex, _) = explorer(1280);
    ex.handle(ms(0), AtlasEvent::SetView(ViewKind::Wheel));
    ex.handle(
        ms(0),
        AtlasEvent::WheelGroup {
            platform: YOUTUBE.into(),
            group: "Civic Life".into(),
        },
    );
    assert_eq!(ex.filters().visible_count(), 2);

    assert_eq!(ex.handle(ms(0), AtlasEvent::WheelCenter), Redraw::Local);
    assert_eq!(ex.wheel().focus(), &DrillFocus::Platform(YOUTUBE.into()));
    assert!(ex.state().group.is_empty());
    assert_eq!(ex.filters().visible_count(), 3);

    ex.handle(ms(0), AtlasEvent::WheelCenter);
    assert_eq!(ex.wheel().focus(), &DrillFocus::Root);
    assert_eq!(ex.filters().visible_count(), 6);

    assert_eq!(ex.handle(ms(0), AtlasEvent::WheelCenter), Redraw::None);
}

// ─────────────────────────────────────────────────────────────────────────────
// Mobile drawer
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn mobile_drill_opens_drawer_after_delay() {
    let (mut ex, history) = explorer(390);
    ex.handle(ms(0), AtlasEvent::SetView(ViewKind::Wheel));
    ex.handle(ms(0), AtlasEvent::WheelPlatform(YOUTUBE.into()));

    assert!(ex.drawer().has_pending_open());
    assert_eq!(ex.tick(ms(799)), Redraw::None);
    assert_eq!(ex.drawer().state(), DrawerState::Closed);

    assert_eq!(ex.tick(ms(800)), Redraw::Local);
    assert_eq!(ex.drawer().state(), DrawerState::Full);
    assert_eq!(history.depth(), 2);
    let content = ex.drawer().content().unwrap();
    assert_eq!(content.title, "Video - YouTube · 3 creators");

    ex.handle(ms(900), AtlasEvent::WheelCrumb(DrillFocus::Root));
    assert_eq!(ex.drawer().state(), DrawerState::Closed);
    assert!(ex.drawer().content().is_none());
}

#[test]
fn quick_redrill_replaces_pending_open() {
    let (mut ex, _) = explorer(390);
    ex.handle(ms(0), AtlasEvent::SetView(ViewKind::Wheel));
    ex.handle(ms(0), AtlasEvent::WheelPlatform(YOUTUBE.into()));
    ex.handle(
        ms(500),
        AtlasEvent::WheelGroup {
            platform: YOUTUBE.into(),
            group: "Civic Life".into(),
        },
    );

    assert_eq!(ex.tick(ms(1000)), Redraw::None);
    assert_eq!(ex.tick(ms(1300)), Redraw::Local);
    assert_eq!(
        ex.drawer().content().unwrap().title,
        "Civic Life · 2 creators"
    );
}

#[test]
fn back_gesture_walks_drawer_down() {
    let (mut ex, _) = explorer(390);
    ex.handle(ms(0), AtlasEvent::SetView(ViewKind::Wheel));
    ex.handle(ms(0), AtlasEvent::WheelPlatform(YOUTUBE.into()));
    ex.tick(ms(800));

    assert_eq!(ex.handle(ms(900), AtlasEvent::HistoryBack), Redraw::Local);
    assert_eq!(ex.drawer().state(), DrawerState::Peek);
    ex.handle(ms(950), AtlasEvent::HistoryBack);
    ex.handle(ms(990), AtlasEvent::HistoryBack);
    assert_eq!(ex.drawer().state(), DrawerState::Closed);
    assert_eq!(ex.handle(ms(999), AtlasEvent::HistoryBack), Redraw::None);
    // The wheel stays drilled
    assert_eq!(ex.wheel().focus(), &DrillFocus::Platform(YOUTUBE.into()));
}

#[test]
fn show_more_expands_topic_and_keeps_scroll() {
    let json = r#"[
        {"name": "Ann", "platform": "Podcast", "group": "Civic Life", "topic": "Housing"},
        {"name": "Ben", "platform": "Podcast", "group": "Civic Life", "topic": "Housing"},
        {"name": "Cal", "platform": "Podcast", "group": "Civic Life", "topic": "Housing"}
    ]"#;
    let dataset = Rc::new(Dataset::from_json_str(json, &LoaderConfig::default()).unwrap());
    let config = AtlasConfig {
        drawer_page_size: 2,
        ..AtlasConfig::default()
    };
    let mut ex = Explorer::new(dataset, Box::new(MemoryHistory::new("/")), config, "/", 390);
    ex.handle(ms(0), AtlasEvent::SetView(ViewKind::Wheel));
    ex.handle(ms(0), AtlasEvent::WheelPlatform("Podcast".into()));
    ex.tick(ms(800));
    assert_eq!(ex.drawer().content().unwrap().groups()[0].hidden(), 1);

    ex.handle(ms(900), AtlasEvent::DrawerScroll(120.0));
    let redraw = ex.handle(ms(950), AtlasEvent::DrawerShowMore("Housing".into()));
    assert_eq!(redraw, Redraw::Local);

    let content = ex.drawer().content().unwrap();
    assert_eq!(content.groups()[0].visible().len(), 3);
    assert_eq!(content.scroll_top(), 120.0);
    assert_eq!(
        ex.handle(ms(990), AtlasEvent::DrawerShowMore("Housing".into())),
        Redraw::None
    );
}

#[test]
fn desktop_drill_never_schedules_drawer() {
    let (mut ex, _) = explorer(1280);
    ex.handle(ms(0), AtlasEvent::SetView(ViewKind::Wheel));
    ex.handle(ms(0), AtlasEvent::WheelPlatform(YOUTUBE.into()));
    assert!(!ex.drawer().has_pending_open());
}

#[test]
fn widening_past_breakpoint_closes_drawer_and_keeps_focus() {
    let (mut ex, _) = explorer(390);
    ex.handle(ms(0), AtlasEvent::SetView(ViewKind::Wheel));
    ex.handle(ms(0), AtlasEvent::WheelPlatform(YOUTUBE.into()));
    ex.tick(ms(800));

    ex.handle(ms(1000), AtlasEvent::Resize(1024));
    assert_eq!(ex.tick(ms(1100)), Redraw::None);
    assert_eq!(ex.tick(ms(1250)), Redraw::Layout);
    assert_eq!(ex.drawer().state(), DrawerState::Closed);
    assert_eq!(ex.wheel().focus(), &DrillFocus::Platform(YOUTUBE.into()));
    assert!(!ex.is_mobile());
}

// ─────────────────────────────────────────────────────────────────────────────
// Search, bubbles, treemap, list
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn search_applies_after_idle() {
    let (mut ex, _) = explorer(1280);
    ex.handle(ms(0), AtlasEvent::SearchInput("ball".into()));
    ex.handle(ms(100), AtlasEvent::SearchInput("ballots ".into()));

    assert_eq!(ex.next_deadline(), Some(ms(250)));
    assert_eq!(ex.tick(ms(200)), Redraw::None);
    assert_eq!(ex.tick(ms(250)), Redraw::Full);
    assert_eq!(ex.state().search, "ballots");
    assert_eq!(ex.filters().visible_count(), 1);
}

#[test]
fn aggregate_bubble_ignores_clicks() {
    let (mut ex, _) = explorer(1280);
    ex.handle(ms(0), AtlasEvent::SetView(ViewKind::Bubbles));

    let ViewBody::Bubbles(bubbles) = ex.view_model().body else {
        panic!("expected bubbles");
    };
    assert_eq!(bubbles.total, 5);
    let names: Vec<_> = bubbles.bubbles.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, [YOUTUBE, "Other (2 categories)"]);
    assert!(!bubbles.bubbles[1].clickable);

    assert_eq!(
        ex.handle(ms(0), AtlasEvent::BubbleClick("Other (2 categories)".into())),
        Redraw::None
    );
    assert!(ex.state().is_empty());

    assert_eq!(ex.handle(ms(0), AtlasEvent::BubbleClick(YOUTUBE.into())), Redraw::Full);
    assert!(ex.state().platform.contains(YOUTUBE));
}

#[test]
fn narrow_viewport_replaces_topic_bubbles() {
    let (mut ex, _) = explorer(390);
    ex.handle(ms(0), AtlasEvent::SetView(ViewKind::Bubbles));
    assert_eq!(ex.handle(ms(0), AtlasEvent::SetBubbleFacet(Facet::Topic)), Redraw::Full);
    assert_eq!(ex.bubble_facet(), Facet::Topic);
    assert_eq!(ex.effective_bubble_facet(), Facet::Platform);
}

#[test]
fn treemap_drill_and_breadcrumbs() {
    let (mut ex, _) = explorer(1280);
    ex.handle(ms(0), AtlasEvent::SetView(ViewKind::Treemap));

    assert_eq!(ex.handle(ms(0), AtlasEvent::TreemapGroup("Civic Life".into())), Redraw::Local);
    assert_eq!(ex.treemap().focus(), &TreemapFocus::Group("Civic Life".into()));
    assert_eq!(ex.filters().visible_count(), 3);

    ex.handle(
        ms(0),
        AtlasEvent::TreemapTopic {
            group: "Civic Life".into(),
            topic: "Elections".into(),
        },
    );
    assert_eq!(ex.filters().visible_count(), 1);
    let ViewBody::Treemap(treemap) = ex.view_model().body else {
        panic!("expected treemap");
    };
    assert_eq!(treemap.breadcrumbs.len(), 3);
    assert_eq!(treemap.breadcrumbs[2].label, "Elections");

    ex.handle(ms(0), AtlasEvent::TreemapCrumb(TreemapCrumb::AllGroups));
    assert!(ex.state().is_empty());
    assert_eq!(ex.treemap().focus(), &TreemapFocus::AllGroups);
}

#[test]
fn list_sort_flips_on_second_click() {
    let (mut ex, _) = explorer(1280);
    ex.handle(ms(0), AtlasEvent::SetView(ViewKind::List));
    ex.handle(ms(0), AtlasEvent::SortBy(SortKey::Name));
    assert_eq!(ex.handle(ms(0), AtlasEvent::SortBy(SortKey::Name)), Redraw::Local);

    let ViewBody::List { rows, .. } = ex.view_model().body else {
        panic!("expected list");
    };
    assert_eq!(rows[0].name, "Fay Cole");
    assert_eq!(rows[5].name, "Ada Lane");
}

#[test]
fn zero_matches_is_empty_state() {
    let (mut ex, _) = explorer(1280);
    ex.handle(ms(0), toggle(Facet::Geography, "Mars"));
    let vm = ex.view_model();
    assert_eq!(vm.body, ViewBody::Empty);
    assert_eq!(vm.active_filters, 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Permalink, share, pack
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn restores_permalink_into_sidebar() {
    let (mut ex, history) = explorer(1280);
    assert!(!ex.restore_permalink("?utm_source=feed"));
    assert!(ex.restore_permalink("?group=Civic%20Life&utm_source=feed"));

    assert_eq!(ex.filters().visible_count(), 3);
    assert_eq!(history.current_url(), "/?group=Civic%20Life");

    let vm = ex.view_model();
    let groups = &vm.sidebar[0];
    assert_eq!(groups.facet, Facet::Group);
    assert_eq!(groups.active, 1);
    assert!(groups.options.iter().any(|o| o.value == "Civic Life" && o.active));
}

#[test]
fn share_copies_absolute_permalink() {
    let (mut ex, _) = explorer(1280);
    ex.handle(ms(0), toggle(Facet::Topic, "Labor"));

    let mut clipboard = MemoryClipboard::default();
    assert_eq!(ex.share(&mut clipboard, "https://atlas.example"), ShareFeedback::Copied);
    assert_eq!(
        clipboard.contents.as_deref(),
        Some("https://atlas.example/?topic=Labor")
    );
}

#[test]
fn pack_requires_active_filter_and_respects_limit() {
    let mut config = AtlasConfig::default();
    config.pack_limit = 2;
    let (mut ex, _) = explorer_with(config, 1280);

    assert_eq!(ex.handle(ms(0), AtlasEvent::PackToggle(1)), Redraw::None);
    assert!(ex.pack().is_empty());

    ex.handle(ms(0), toggle(Facet::Platform, YOUTUBE));
    ex.handle(ms(0), AtlasEvent::PackToggle(1));
    ex.handle(ms(0), AtlasEvent::PackToggle(2));
    ex.handle(ms(0), AtlasEvent::PackToggle(5));
    assert_eq!(ex.pack().len(), 2);
    assert_eq!(ex.notice(), Some("a pack holds at most 2 creators"));

    let share = ex.pack_share(None, "https://atlas.example/pack", None);
    assert_eq!(share.name, "My YouTube Picks");
    assert_eq!(share.filename, "atlas-pack-my-youtube-picks.png");
    assert_eq!(
        share.link,
        "https://atlas.example/pack?creators=Bo%20Reyes,Cy%20Park&name=My%20YouTube%20Picks"
    );
}

#[test]
fn pack_prefill_uses_visible_order() {
    let (mut ex, _) = explorer(1280);
    ex.handle(ms(0), toggle(Facet::Geography, "US"));
    ex.handle(ms(0), AtlasEvent::PackPrefill);

    let names: Vec<_> = ex.pack().entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Ada Lane", "Cy Park", "Di Moss", "Fay Cole"]);
    assert!(ex.view_model().pack_enabled);
}
