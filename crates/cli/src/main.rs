use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use navdeck_engine::{ActivePathResolver, FlatIndex, build_index};
use navdeck_types::{MenuNode, NavigatorSettings};
use navdeck_util::{load_settings, read_menu_config};
use serde_json::json;
use tracing::{debug, info};

mod simulate;

/// Inspect and exercise Navdeck menu configurations.
#[derive(Parser, Debug)]
#[command(name = "navdeck", version, about)]
struct Cli {
    /// Settings file; defaults to $NAVDECK_SETTINGS_PATH or the platform config dir
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the index and report configuration defects
    Validate { menu: PathBuf },
    /// Print the indexed tree in display order
    Tree { menu: PathBuf },
    /// Resolve a page path and print the drawers it would open
    Resolve { menu: PathBuf, path: String },
    /// Run a JSON script of UI and bus events through a controller
    Simulate {
        menu: PathBuf,
        script: PathBuf,
        /// Feed every internal navigate-request back as a page change
        #[arg(long)]
        follow: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let settings = load_settings(cli.settings.as_deref()).context("failed to load navigator settings")?;
    debug!(?settings, "settings loaded");

    match cli.command {
        Command::Validate { menu } => validate(&load_index(&menu).await?),
        Command::Tree { menu } => {
            print_tree(&load_index(&menu).await?);
            Ok(())
        }
        Command::Resolve { menu, path } => resolve(&load_index(&menu).await?, &path, &settings),
        Command::Simulate { menu, script, follow } => {
            let index = load_index(&menu).await?;
            let steps = simulate::read_script(&script).await?;
            simulate::run(index, steps, settings, follow)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Reads the menu file and builds the index; all I/O happens here.
async fn load_index(path: &Path) -> Result<FlatIndex> {
    let config = read_menu_config(path)
        .await
        .with_context(|| format!("failed to load menu configuration from {}", path.display()))?;
    let index = build_index(&config);
    info!(nodes = index.len(), defects = index.diagnostics().len(), "menu index built");
    Ok(index)
}

fn validate(index: &FlatIndex) -> Result<()> {
    for defect in index.diagnostics() {
        println!("defect: {defect}");
    }
    index.ensure_clean().context("menu configuration is not clean")?;
    println!("ok: {} nodes", index.len());
    Ok(())
}

fn print_tree(index: &FlatIndex) {
    for node in index.top_level_nodes() {
        print_node(index, node);
    }
}

fn print_node(index: &FlatIndex, node: &MenuNode) {
    let indent = "  ".repeat(usize::from(node.depth.saturating_sub(1)));
    let marker = if node.is_folder() { "+" } else { "-" };
    println!("{indent}{marker} {} [{}]", node.title, node.path);
    for child in index.sorted_children(&node.path) {
        print_node(index, child);
    }
}

fn resolve(index: &FlatIndex, path: &str, settings: &NavigatorSettings) -> Result<()> {
    let Some(active) = ActivePathResolver::new(settings.prefix_match).resolve(path, index) else {
        println!("not found");
        return Ok(());
    };

    let drawers: Vec<_> = active
        .drawer_plan()
        .into_iter()
        .map(|(depth, key)| json!({ "depth": depth, "key": key }))
        .collect();
    let out = json!({
        "topLevel": active.top_level.id,
        "folderChain": active.folder_chain_paths(),
        "target": active.target.path,
        "isFolder": active.is_folder,
        "matchedByPrefix": active.matched_by_prefix,
        "drawers": drawers,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
