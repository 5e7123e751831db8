use std::io::Write;

use atlas_core::config::{AtlasConfigExt, SETTABLE_KEYS};
use atlas_core::drawer::DrawerContent;
use atlas_core::filter::search_options;
use atlas_core::{
    AtlasEvent, DrawerState, DrillFocus, Facet, HierarchyNode, Redraw, Screen, SortKey,
    TreemapCrumb, ViewBody, ViewKind, ViewModel,
};

use crate::context::CliContext;

fn parse<T: std::str::FromStr<Err = String>>(raw: &str) -> Result<T, String> {
    raw.parse::<T>()
}

/// Apply an event and print what changed.
fn apply(ctx: &mut CliContext, event: AtlasEvent) -> Result<(), String> {
    if ctx.dispatch(event)? == Redraw::None {
        println!("(no change)");
    }
    show(ctx)
}

// ─────────────────────────────────────────────────────────────────────────────
// Dataset
// ─────────────────────────────────────────────────────────────────────────────

pub async fn load(ctx: &mut CliContext, source: &str, permalink: Option<&str>) -> Result<(), String> {
    let count = ctx.load(source, permalink).await?;
    println!("Loaded {count} creators from {source}");
    show(ctx)
}

// ─────────────────────────────────────────────────────────────────────────────
// Filters
// ─────────────────────────────────────────────────────────────────────────────

pub fn filter(ctx: &mut CliContext, facet: &str, value: &str) -> Result<(), String> {
    let facet: Facet = parse(facet)?;
    apply(
        ctx,
        AtlasEvent::Toggle {
            facet,
            value: value.to_string(),
        },
    )
}

pub fn clear(ctx: &mut CliContext, facet: Option<&str>) -> Result<(), String> {
    let event = match facet {
        Some(facet) => AtlasEvent::ClearFacet(parse(facet)?),
        None => AtlasEvent::ClearAll,
    };
    apply(ctx, event)
}

pub fn search(ctx: &mut CliContext, words: &[String]) -> Result<(), String> {
    apply(ctx, AtlasEvent::SearchInput(words.join(" ")))
}

pub fn options(ctx: &mut CliContext, facet: &str, query: Option<&str>) -> Result<(), String> {
    let facet: Facet = parse(facet)?;
    let explorer = ctx.explorer()?;
    let all = explorer.filters().dataset().index().facet_options(facet);
    let state = explorer.state().facet(facet);

    for option in search_options(all, query.unwrap_or("")) {
        let mark = if state.contains(&option.value) { "x" } else { " " };
        println!("  [{mark}] {:<40} {}", option.value, option.count);
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Views
// ─────────────────────────────────────────────────────────────────────────────

pub fn set_view(ctx: &mut CliContext, kind: &str) -> Result<(), String> {
    let kind: ViewKind = parse(kind)?;
    apply(ctx, AtlasEvent::SetView(kind))
}

pub fn set_bubbles(ctx: &mut CliContext, facet: &str) -> Result<(), String> {
    let facet: Facet = parse(facet)?;
    apply(ctx, AtlasEvent::SetBubbleFacet(facet))
}

pub fn sort(ctx: &mut CliContext, column: &str) -> Result<(), String> {
    let key: SortKey = parse(column)?;
    apply(ctx, AtlasEvent::SortBy(key))
}

pub fn resize(ctx: &mut CliContext, width: u32) -> Result<(), String> {
    ctx.width = width;
    apply(ctx, AtlasEvent::Resize(width))
}

pub fn bubble(ctx: &mut CliContext, name: &str) -> Result<(), String> {
    apply(ctx, AtlasEvent::BubbleClick(name.to_string()))
}

pub fn wheel(ctx: &mut CliContext, platform: &str, group: Option<&str>) -> Result<(), String> {
    let event = match group {
        Some(group) => AtlasEvent::WheelGroup {
            platform: platform.to_string(),
            group: group.to_string(),
        },
        None => AtlasEvent::WheelPlatform(platform.to_string()),
    };
    apply(ctx, event)
}

pub fn center(ctx: &mut CliContext) -> Result<(), String> {
    apply(ctx, AtlasEvent::WheelCenter)
}

pub fn crumb(ctx: &mut CliContext, platform: Option<&str>) -> Result<(), String> {
    let target = match platform {
        Some(p) => DrillFocus::Platform(p.to_string()),
        None => DrillFocus::Root,
    };
    apply(ctx, AtlasEvent::WheelCrumb(target))
}

pub fn treemap(ctx: &mut CliContext, group: &str, topic: Option<&str>) -> Result<(), String> {
    let event = match topic {
        Some(topic) => AtlasEvent::TreemapTopic {
            group: group.to_string(),
            topic: topic.to_string(),
        },
        None => AtlasEvent::TreemapGroup(group.to_string()),
    };
    apply(ctx, event)
}

pub fn treemap_up(ctx: &mut CliContext, all: bool) -> Result<(), String> {
    let crumb = if all {
        TreemapCrumb::AllGroups
    } else {
        TreemapCrumb::Group
    };
    apply(ctx, AtlasEvent::TreemapCrumb(crumb))
}

// ─────────────────────────────────────────────────────────────────────────────
// Drawer and history
// ─────────────────────────────────────────────────────────────────────────────

pub fn drawer(ctx: &mut CliContext, event: AtlasEvent) -> Result<(), String> {
    apply(ctx, event)?;
    let explorer = ctx.explorer()?;
    println!("drawer: {}", explorer.drawer().state().as_str());
    Ok(())
}

/// Browser back: the history moves first, then the page hears about it.
pub fn back(ctx: &mut CliContext) -> Result<(), String> {
    match ctx.history.back() {
        Some(entry) => {
            let carried = entry.map_or("none", |s| s.as_str());
            println!("history back to {} (drawer entry: {carried})", ctx.history.current_url());
            drawer(ctx, AtlasEvent::HistoryBack)
        }
        None => {
            println!("Already at the first history entry");
            Ok(())
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sharing
// ─────────────────────────────────────────────────────────────────────────────

pub fn link(ctx: &mut CliContext) -> Result<(), String> {
    let explorer = ctx.explorer()?;
    println!("{}", explorer.permalink());
    Ok(())
}

pub fn share(ctx: &mut CliContext, origin: &str) -> Result<(), String> {
    let feedback = ctx.share(origin)?;
    println!("{}", feedback.message());
    if let atlas_core::ShareFeedback::ManualCopy(url) = feedback {
        println!("  {url}");
    }
    Ok(())
}

pub fn pack_list(ctx: &mut CliContext) -> Result<(), String> {
    let explorer = ctx.explorer()?;
    let pack = explorer.pack();
    println!("{} ({}/{})", pack.counter_label(), pack.len(), pack.limit());
    for (i, entry) in pack.entries().iter().enumerate() {
        println!("  {i:>2}. {} [{}] {}", entry.name, entry.platform, entry.topic);
    }
    Ok(())
}

pub fn pack(ctx: &mut CliContext, event: AtlasEvent) -> Result<(), String> {
    ctx.dispatch(event)?;
    if let Some(notice) = ctx.explorer()?.notice() {
        println!("{notice}");
    }
    pack_list(ctx)
}

pub fn pack_share(
    ctx: &mut CliContext,
    name: Option<&str>,
    from: Option<&str>,
    base: &str,
) -> Result<(), String> {
    let explorer = ctx.explorer()?;
    if explorer.pack().is_empty() {
        return Err("Pack is empty. Select creators with `pack toggle <id>` or `pack prefill`.".into());
    }
    let share = explorer.pack_share(name, base, from);
    println!("{}", share.title);
    println!("{}", share.text);
    println!("{}", share.link);
    println!("image: {}", share.filename);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Config
// ─────────────────────────────────────────────────────────────────────────────

pub fn show_config(ctx: &CliContext) -> Result<(), String> {
    let rendered = toml::to_string_pretty(&ctx.config).map_err(|e| e.to_string())?;
    println!("{rendered}");
    Ok(())
}

pub fn set_config(ctx: &mut CliContext, key: &str, value: &str) -> Result<(), String> {
    ctx.config.set(key, value).map_err(|e| {
        format!("{e}\nSettable keys: {}", SETTABLE_KEYS.join(", "))
    })?;
    println!("{key} = {value} (applies to the next `load`)");
    Ok(())
}

pub fn save_config(ctx: &CliContext) -> Result<(), String> {
    let saved = match &ctx.config_path {
        Some(path) => ctx.config.save_to(path),
        None => ctx.config.save(),
    };
    saved.map_err(|e| e.to_string())?;
    println!("Configuration saved");
    Ok(())
}

pub fn exit() {
    // A failed final flush leaves nothing to recover
    let _ = write!(std::io::stdout(), "quitting...");
    let _ = std::io::stdout().flush();
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────────────────────────────────────

pub fn show(ctx: &mut CliContext) -> Result<(), String> {
    match ctx.session.screen() {
        Screen::Loading => println!("Loading..."),
        Screen::Failed(message) => println!("Failed to load creators: {message}"),
        Screen::Ready(vm) => print_view(&vm),
    }
    Ok(())
}

fn print_view(vm: &ViewModel<'_>) {
    println!(
        "{}/{} creators | {} active | view: {}{}",
        vm.visible_count,
        vm.total,
        vm.active_filters,
        vm.view.as_str(),
        if vm.is_mobile { " (mobile)" } else { "" }
    );
    println!("url: {}", vm.permalink);

    match &vm.body {
        ViewBody::Empty => println!("No creators match these filters. Try `clear`."),
        ViewBody::Grid(cards) => {
            for r in cards {
                println!("  [{:>3}] {} ({}) {}", r.id, r.name, r.initials(), r.channel);
            }
        }
        ViewBody::List { rows, sort } => {
            if let Some(sort) = sort {
                println!("  sorted by {:?} {:?}", sort.key, sort.direction);
            }
            println!(
                "  {:<5} {:<24} {:<24} {:<22} {:<10} {}",
                "id", "name", "channel", "platform", "geo", "group"
            );
            for r in rows {
                println!(
                    "  {:<5} {:<24} {:<24} {:<22} {:<10} {}",
                    r.id,
                    r.name,
                    r.channel,
                    r.platform.as_deref().unwrap_or("-"),
                    r.geography,
                    r.group
                );
            }
        }
        ViewBody::Bubbles(view) => {
            println!("  bubbles by {} ({} creators)", view.facet, view.total);
            for b in &view.bubbles {
                let flag = if b.clickable { "" } else { " (not filterable)" };
                println!("  {:>6.1}  {:<40} {:>4}{flag}", b.radius, b.name, b.count);
            }
            let samples = view.size_samples.map(|s| s.to_string()).join(" / ");
            println!("  bubble size = creators: {samples}");
        }
        ViewBody::Wheel(view) => {
            let crumbs: Vec<_> = view.breadcrumbs.iter().map(|c| c.label.as_str()).collect();
            println!("  {}", crumbs.join(" › "));
            println!(
                "  [{}] {} {}{}",
                view.center.title,
                view.center.count,
                view.center.caption,
                if view.center.shows_back { " (center: back)" } else { "" }
            );
            print_tree(view.tree, 1, 2);
            if !view.members.is_empty() {
                println!("  members:");
                for r in &view.members {
                    println!("    {} | {}", r.name, r.primary_topic());
                }
            }
        }
        ViewBody::Treemap(view) => {
            let crumbs: Vec<_> = view.breadcrumbs.iter().map(|c| c.label.as_str()).collect();
            println!("  {}", crumbs.join(" › "));
            print_tree(&view.tree, 1, 2);
        }
    }

    if vm.drawer_state != DrawerState::Closed
        && let Some(content) = vm.drawer
    {
        print_drawer(vm.drawer_state, content);
    }
    if let Some(notice) = vm.notice {
        println!("! {notice}");
    }
}

fn print_tree(node: &HierarchyNode, depth: usize, max_depth: usize) {
    for child in &node.children {
        println!("{}{} ({})", "  ".repeat(depth), child.name, child.value);
        if depth < max_depth {
            print_tree(child, depth + 1, max_depth);
        }
    }
}

fn print_drawer(state: DrawerState, content: &DrawerContent) {
    println!("  ┌ drawer [{}] {}", state.as_str(), content.title);
    for group in content.groups() {
        println!("  │ {}", group.header());
        for card in group.visible() {
            println!("  │   {} | {}", card.name, card.channel);
        }
        if let Some(more) = group.show_more_label() {
            println!("  │   {more}");
        }
    }
    println!("  └");
}
