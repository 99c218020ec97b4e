mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, releases::ReleasesSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "slipway",
    about = "Deploy timestamped releases over SSH and rotate the live link",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from slipway.yaml or .git/)
    #[arg(long, global = true, env = "SLIPWAY_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter slipway.yaml
    Init,

    /// Run the framework dev server in the local checkout
    Runserver {
        /// Settings module to use
        #[arg(long)]
        settings: Option<String>,
    },

    /// Build a local development environment
    Build,

    /// Deploy a new timestamped release to the production host
    Deploy,

    /// Update the live release in place (no rotation)
    InPlaceDeploy,

    /// Dump, compress, and store the production database
    BackupDb,

    /// Inspect and rotate release directories
    Releases {
        #[command(subcommand)]
        subcommand: ReleasesSubcommand,
    },

    /// Validate slipway.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    // Task commands narrate their steps; query commands stay quiet.
    let default_level = match &cli.command {
        Commands::Releases { .. } | Commands::Config { .. } => tracing::Level::WARN,
        _ => tracing::Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Runserver { settings } => cmd::runserver::run(&root, settings.as_deref()),
        Commands::Build => cmd::build::run(&root),
        Commands::Deploy => cmd::deploy::run(&root),
        Commands::InPlaceDeploy => cmd::deploy::run_in_place(&root),
        Commands::BackupDb => cmd::backup::run(&root),
        Commands::Releases { subcommand } => cmd::releases::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
