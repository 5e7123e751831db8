use std::io::Write;
use std::path::PathBuf;

use atlas_cli::commands;
use atlas_cli::logging;
use atlas_cli::readline;
use atlas_cli::CliContext;
use atlas_core::config::AtlasConfigExt;
use atlas_core::{AtlasConfig, AtlasEvent};
use clap::{Parser, Subcommand};

/// Startup flags.
#[derive(Parser)]
#[command(version, about = "Journalism Atlas terminal explorer")]
struct Args {
    /// Dataset file path or http(s) URL; defaults to the configured source
    #[arg(short, long)]
    data: Option<String>,
    /// Permalink query to restore, e.g. "?group=Civic%20Life"
    #[arg(short, long)]
    permalink: Option<String>,
    /// Simulated viewport width in pixels
    #[arg(short, long, default_value_t = 1280)]
    width: u32,
    /// Config file to use instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), String> {
    logging::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AtlasConfig::load_from(path).map_err(|e| e.to_string())?,
        None => AtlasConfig::load(),
    };
    let source = args.data.clone().unwrap_or_else(|| config.data_source.clone());
    let mut ctx = CliContext::new(config, args.config, args.width);

    if let Err(err) = commands::load(&mut ctx, &source, args.permalink.as_deref()).await {
        println!("{err}");
    }

    while let Some(line) = readline()? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &mut ctx).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a dataset file or URL
    Load {
        source: String,
        #[arg(short, long)]
        permalink: Option<String>,
    },
    /// Print the current view
    Show,
    /// Toggle a filter value: `filter platform "Video - YouTube"`
    Filter { facet: String, value: String },
    /// Clear one facet, or everything
    Clear { facet: Option<String> },
    /// Set the search text (empty clears it)
    Search {
        #[arg(trailing_var_arg = true)]
        text: Vec<String>,
    },
    /// List a facet's options, optionally narrowed by a query
    Options { facet: String, query: Option<String> },
    /// Switch view: grid, list, bubbles, wheel, treemap
    View { kind: String },
    /// Bubble grouping facet
    Bubbles { facet: String },
    /// Sort the list view by a column; repeat to flip direction
    Sort { column: String },
    /// Simulate a viewport resize
    Resize { width: u32 },
    /// Click a bubble
    Bubble { name: String },
    /// Click a wheel platform, or a group within it
    Wheel { platform: String, group: Option<String> },
    /// Click the wheel center
    Center,
    /// Click a wheel breadcrumb; no platform means the root
    Crumb { platform: Option<String> },
    /// Click a treemap group, or a topic within it
    Treemap { group: String, topic: Option<String> },
    /// Treemap breadcrumb: back to the group, or all groups with --all
    TreemapUp {
        #[arg(long)]
        all: bool,
    },
    /// Drawer gestures
    Drawer {
        #[command(subcommand)]
        action: DrawerAction,
    },
    /// Browser back
    Back,
    /// Print the permalink
    Link,
    /// Copy the permalink
    Share {
        #[arg(long, default_value = "https://atlas.example")]
        origin: String,
    },
    /// Starter pack selection
    Pack {
        #[command(subcommand)]
        action: PackAction,
    },
    /// Show or edit the configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
    Exit,
}

#[derive(Subcommand)]
enum DrawerAction {
    Close,
    Backdrop,
    Handle,
    /// Handle drag distance, positive downward
    Drag {
        #[arg(allow_hyphen_values = true)]
        delta: f64,
    },
    /// Pull on the content while scrolled to the top
    Pull { dy: f64 },
    /// Reveal all cards of a topic
    More { topic: String },
}

#[derive(Subcommand)]
enum PackAction {
    List,
    Toggle { id: u32 },
    Prefill,
    Remove { index: usize },
    Clear,
    Share {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        from: Option<String>,
        #[arg(long, default_value = "https://atlas.example/pack")]
        base: String,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    Show,
    Set { key: String, value: String },
    Save,
}

async fn respond(line: &str, ctx: &mut CliContext) -> Result<bool, String> {
    let args = shlex::split(line).ok_or("error: Invalid quoting")?;
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match cli.command {
        Some(Commands::Load { source, permalink }) => {
            commands::load(ctx, &source, permalink.as_deref()).await?
        }
        Some(Commands::Show) => commands::show(ctx)?,
        Some(Commands::Filter { facet, value }) => commands::filter(ctx, &facet, &value)?,
        Some(Commands::Clear { facet }) => commands::clear(ctx, facet.as_deref())?,
        Some(Commands::Search { text }) => commands::search(ctx, &text)?,
        Some(Commands::Options { facet, query }) => {
            commands::options(ctx, &facet, query.as_deref())?
        }
        Some(Commands::View { kind }) => commands::set_view(ctx, &kind)?,
        Some(Commands::Bubbles { facet }) => commands::set_bubbles(ctx, &facet)?,
        Some(Commands::Sort { column }) => commands::sort(ctx, &column)?,
        Some(Commands::Resize { width }) => commands::resize(ctx, width)?,
        Some(Commands::Bubble { name }) => commands::bubble(ctx, &name)?,
        Some(Commands::Wheel { platform, group }) => {
            commands::wheel(ctx, &platform, group.as_deref())?
        }
        Some(Commands::Center) => commands::center(ctx)?,
        Some(Commands::Crumb { platform }) => commands::crumb(ctx, platform.as_deref())?,
        Some(Commands::Treemap { group, topic }) => {
            commands::treemap(ctx, &group, topic.as_deref())?
        }
        Some(Commands::TreemapUp { all }) => commands::treemap_up(ctx, all)?,
        Some(Commands::Drawer { action }) => {
            let event = match action {
                DrawerAction::Close => AtlasEvent::DrawerClose,
                DrawerAction::Backdrop => AtlasEvent::DrawerBackdrop,
                DrawerAction::Handle => AtlasEvent::DrawerHandle,
                DrawerAction::Drag { delta } => AtlasEvent::DrawerDragEnd(delta),
                DrawerAction::Pull { dy } => AtlasEvent::DrawerPull { dy, at_top: true },
                DrawerAction::More { topic } => AtlasEvent::DrawerShowMore(topic),
            };
            commands::drawer(ctx, event)?
        }
        Some(Commands::Back) => commands::back(ctx)?,
        Some(Commands::Link) => commands::link(ctx)?,
        Some(Commands::Share { origin }) => commands::share(ctx, &origin)?,
        Some(Commands::Pack { action }) => match action {
            PackAction::List => commands::pack_list(ctx)?,
            PackAction::Toggle { id } => commands::pack(ctx, AtlasEvent::PackToggle(id))?,
            PackAction::Prefill => commands::pack(ctx, AtlasEvent::PackPrefill)?,
            PackAction::Remove { index } => commands::pack(ctx, AtlasEvent::PackRemove(index))?,
            PackAction::Clear => commands::pack(ctx, AtlasEvent::PackClear)?,
            PackAction::Share { name, from, base } => {
                commands::pack_share(ctx, name.as_deref(), from.as_deref(), &base)?
            }
        },
        Some(Commands::Config { action }) => match action {
            None | Some(ConfigAction::Show) => commands::show_config(ctx)?,
            Some(ConfigAction::Set { key, value }) => commands::set_config(ctx, &key, &value)?,
            Some(ConfigAction::Save) => commands::save_config(ctx)?,
        },
        Some(Commands::Exit) => {
            commands::exit();
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
