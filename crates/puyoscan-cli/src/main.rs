mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "puyoscan", about = "Puyo Puyo screen analyzer")]
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
    /// Build a color profile from a calibration image
    Calibrate(commands::calibrate::CalibrateArgs),
    /// Classify the play field of one or more frames
    Classify(commands::classify::ClassifyArgs),
    /// Print the field, cell and score regions resolved for a frame
    Regions(commands::regions::RegionsArgs),
    /// List the profiles stored in a profile file
    Profiles(commands::profiles::ProfilesArgs),
    /// Print or save the default analyzer config as TOML
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
        Commands::Calibrate(args) => commands::calibrate::run(args),
        Commands::Classify(args) => commands::classify::run(args),
        Commands::Regions(args) => commands::regions::run(args),
        Commands::Profiles(args) => commands::profiles::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
