//! Meridian CLI: explore landmarks and inspect the correlation graph.
//!
//! Usage:
//!   meridian explore <artist> [--track <title>] [--axes tempo,era]
//!   meridian agency add <name> | agency explore <name> [--axes ..]
//!   meridian init | stats | landmarks | graph
//!   meridian constellation <artist>
//!   meridian gaps [--type artist]
//!
//! Results are printed as JSON on stdout; logs go to stderr.

use clap::{Parser, Subcommand};
use meridian::{AxisKind, ExploreOutcome, MapperApi, MapperConfig, NodeKind};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "meridian",
    version,
    about = "Multi-axis correlation graph engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Path to a YAML config file (default: <data dir>/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding the graph snapshot and datasets
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an artist (and optionally one of its tracks) and run axes around it
    Explore {
        artist: String,
        #[arg(long)]
        track: Option<String>,
        /// Comma-separated axes (default: tempo,related,albums,members,era)
        #[arg(long, value_delimiter = ',')]
        axes: Vec<AxisKind>,
    },
    /// Organizational landmarks
    Agency {
        #[command(subcommand)]
        action: AgencyAction,
    },
    /// Seed an empty graph from the fixture table
    Init,
    /// Node and edge counts
    Stats,
    /// List landmarks
    Landmarks,
    /// Print the whole graph document
    Graph,
    /// An artist with its edges and direct neighbors
    Constellation { artist: String },
    /// Nodes missing from the reference datasets
    Gaps {
        #[arg(long = "type", default_value = "artist")]
        kind: NodeKind,
    },
}

#[derive(Subcommand)]
enum AgencyAction {
    /// Register an organization as a landmark
    Add { name: String },
    /// Run organizational axes around an organization, or a person or studio in the graph
    Explore {
        name: String,
        /// Comma-separated axes (default: heuristic,portfolio,peers)
        #[arg(long, value_delimiter = ',')]
        axes: Vec<AxisKind>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(config: Option<PathBuf>, data_dir: Option<PathBuf>) -> Result<MapperConfig, String> {
    let path = config.unwrap_or_else(|| meridian::config::default_data_dir().join("config.yaml"));
    let mut config =
        MapperConfig::load(&path).map_err(|e| format!("Failed to load config {}: {}", path.display(), e))?;
    config.apply_env();
    if let Some(dir) = data_dir {
        config.data_dir = dir;
    }
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

/// Print an exploration result; an unresolved landmark exits with 2.
fn print_outcome(outcome: &ExploreOutcome) -> i32 {
    let code = print_json(outcome);
    match outcome {
        ExploreOutcome::NotFound { query } => {
            eprintln!("Error: '{}' not found", query);
            2
        }
        ExploreOutcome::Explored(_) => code,
    }
}

fn report<T: Serialize, E: std::fmt::Display>(result: Result<T, E>) -> i32 {
    match result {
        Ok(value) => print_json(&value),
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_constellation(api: &MapperApi, artist: &str) -> i32 {
    match api.constellation(artist) {
        Ok(Some(neighborhood)) => print_json(&neighborhood),
        Ok(None) => {
            eprintln!("Error: artist '{}' not in graph", artist);
            2
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

async fn run(api: MapperApi, command: Commands) -> i32 {
    match command {
        Commands::Explore {
            artist,
            track,
            axes,
        } => match api.explore(&artist, track.as_deref(), &axes).await {
            Ok(outcome) => print_outcome(&outcome),
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
        Commands::Agency { action } => match action {
            AgencyAction::Add { name } => report(api.add_agency(&name)),
            AgencyAction::Explore { name, axes } => match api.explore_agency(&name, &axes).await {
                Ok(outcome) => print_outcome(&outcome),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    1
                }
            },
        },
        Commands::Init => report(api.initialize()),
        Commands::Stats => report(api.stats()),
        Commands::Landmarks => report(api.landmarks()),
        Commands::Graph => report(api.graph()),
        Commands::Constellation { artist } => cmd_constellation(&api, &artist),
        Commands::Gaps { kind } => report(api.analyze_gaps(kind)),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let api = match load_config(cli.config, cli.data_dir)
        .and_then(|config| MapperApi::from_config(&config).map_err(|e| e.to_string()))
    {
        Ok(api) => api,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("failed to create tokio runtime: {}", e);
            std::process::exit(1);
        }
    };
    let code = rt.block_on(run(api, cli.command));
    std::process::exit(code);
}
