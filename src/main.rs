//! `transition-router` command line tool.
//!
//! ```text
//! transition-router --config routes.toml check
//! transition-router --config routes.toml resolve /nested/route-one
//! transition-router --config routes.toml replay demos/replay.toml
//! ```

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use serde_json::json;
use tokio::sync::mpsc;

use transition_router::config::{load_config, RouterConfig};
use transition_router::lifecycle::{signals, Shutdown};
use transition_router::navigation::{trim_base, MemoryHistory, ReplayScript};
use transition_router::observability::logging;
use transition_router::runtime::TreeDriver;
use transition_router::{RouteTree, RouterError};

#[derive(Parser)]
#[command(name = "transition-router")]
#[command(about = "Resolve locations and replay route transitions", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "routes.toml")]
    config: PathBuf,

    /// Overrides `observability.log_level` from the config file
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the route configuration
    Check,
    /// Resolve one location and print the views it mounts
    Resolve { location: String },
    /// Replay a scripted navigation sequence, printing every snapshot
    Replay { script: PathBuf },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    let level = cli
        .log_level
        .as_deref()
        .unwrap_or(&config.observability.log_level);
    logging::init(level);

    tracing::info!(config = %cli.config.display(), "Configuration loaded");

    match cli.command {
        Commands::Check => check(&config)?,
        Commands::Resolve { location } => resolve(&config, &location)?,
        Commands::Replay { script } => replay(&config, &script).await?,
    }

    Ok(())
}

fn check(config: &RouterConfig) -> Result<(), RouterError> {
    let tree = RouteTree::from_config(config)?;
    let output = json!({
        "valid": true,
        "levels": tree.blueprint().level_count(),
        "timeout_ms": config.timeout_ms,
        "animate_on_mount": config.animate_on_mount,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn resolve(config: &RouterConfig, location: &str) -> Result<(), RouterError> {
    let mut tree = RouteTree::from_config(config)?;
    let location = trim_base(location, &config.base);
    tree.navigate(&location, Instant::now());

    let views = tree.render();
    if views.is_empty() {
        return Err(RouterError::NoMatch { location });
    }
    println!("{}", serde_json::to_string_pretty(&views)?);
    Ok(())
}

async fn replay(config: &RouterConfig, script: &Path) -> Result<(), RouterError> {
    let script = ReplayScript::load(script)?;
    let tree = RouteTree::from_config(config)?;

    let shutdown = Shutdown::new();
    let (driver, mut snapshots) = TreeDriver::new(tree);
    let (tx, rx) = mpsc::unbounded_channel();

    let driver = tokio::spawn(driver.run(rx, shutdown.subscribe()));
    tokio::spawn(signals::shutdown_on_ctrl_c(shutdown.clone()));

    let printer = tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let snapshot = snapshots.borrow_and_update().clone();
            match serde_json::to_string(&snapshot) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!(error = %e, "Failed to encode snapshot"),
            }
        }
    });

    tracing::info!(steps = script.steps.len(), "Replaying navigation script");
    let mut history = MemoryHistory::new(&config.base, &config.base);
    for step in &script.steps {
        if shutdown.is_triggered() {
            break;
        }
        if tx.send(history.set_location(&step.location)).is_err() {
            break;
        }
        tokio::time::sleep(step.wait()).await;
    }
    drop(tx);

    let totals = driver.await.map_err(std::io::Error::other)?;
    if let Err(e) = printer.await {
        tracing::warn!(error = %e, "Snapshot printer task failed");
    }
    shutdown.trigger();

    eprintln!("{}", serde_json::to_string(&json!({ "totals": totals }))?);
    Ok(())
}
