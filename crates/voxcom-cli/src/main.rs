mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "voxcom", about = "Center-of-mass checking and re-centering for NIfTI volumes")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check one volume's center of mass and log the result
    Check(commands::check::CheckArgs),
    /// Check every volume listed in a manifest file
    Batch(commands::batch::BatchArgs),
    /// Write a re-centered copy of a volume
    Fix(commands::fix::FixArgs),
    /// Show volume metadata
    Info(commands::info::InfoArgs),
    /// Print or save a default check config
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Check(args) => commands::check::run(args),
        Commands::Batch(args) => commands::batch::run(args),
        Commands::Fix(args) => commands::fix::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
