//! Spinchain Command-Line Interface
//!
//! Runs a transverse-field Ising chain simulation frame by frame and streams
//! the per-site magnetization to the terminal and, optionally, a JSON file
//! for an external plotting tool.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Args, Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{config, run, version};

/// Spinchain - Trotterized transverse-field Ising chain dynamics
#[derive(Parser)]
#[command(name = "spinchain")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate the chain and report magnetization per frame
    Run(RunArgs),

    /// Print the default configuration as YAML
    Config,

    /// Show version information
    Version,
}

/// Overrides applied on top of the config file (or the defaults).
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// YAML configuration file
    #[arg(short, long, env = "SPINCHAIN_CONFIG")]
    pub config: Option<String>,

    /// Number of sites in the chain
    #[arg(short = 'n', long)]
    pub sites: Option<usize>,

    /// Coupling strength J
    #[arg(short = 'J', long, allow_hyphen_values = true)]
    pub coupling: Option<f64>,

    /// Transverse field strength h
    #[arg(short = 'H', long, allow_hyphen_values = true)]
    pub field: Option<f64>,

    /// Total simulated time
    #[arg(short, long)]
    pub time: Option<f64>,

    /// Frames per unit of simulated time
    #[arg(long)]
    pub fps: Option<u32>,

    /// Total number of frames (overrides --fps)
    #[arg(short, long)]
    pub frames: Option<usize>,

    /// Shots per frame
    #[arg(short, long)]
    pub shots: Option<usize>,

    /// Random seed for the measurement sampler
    #[arg(long)]
    pub seed: Option<u64>,

    /// Use the symmetric second-order Trotter step
    #[arg(long)]
    pub second_order: bool,

    /// Also report the exact site-0 magnetization from the amplitudes
    #[arg(long)]
    pub exact: bool,

    /// Write the full run as JSON to this file
    #[arg(short, long)]
    pub output: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Run(args) => run::execute(&args),
        Commands::Config => config::execute(),
        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_defaults() {
        let cli = Cli::try_parse_from(["spinchain", "run"]).unwrap();
        match cli.command {
            Commands::Run(args) => {
                assert!(args.config.is_none());
                assert!(args.sites.is_none());
                assert!(!args.second_order);
                assert!(args.output.is_none());
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_parse_run_overrides() {
        let cli = Cli::try_parse_from([
            "spinchain",
            "-vv",
            "run",
            "-n",
            "6",
            "-J",
            "-0.5",
            "--field",
            "2.0",
            "--frames",
            "30",
            "--shots",
            "4096",
            "--seed",
            "42",
            "--second-order",
            "-o",
            "out.json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.sites, Some(6));
                assert_eq!(args.coupling, Some(-0.5));
                assert_eq!(args.field, Some(2.0));
                assert_eq!(args.frames, Some(30));
                assert_eq!(args.shots, Some(4096));
                assert_eq!(args.seed, Some(42));
                assert!(args.second_order);
                assert_eq!(args.output.as_deref(), Some("out.json"));
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_number() {
        assert!(Cli::try_parse_from(["spinchain", "run", "--shots", "many"]).is_err());
    }

    #[test]
    fn test_parse_config_and_version() {
        assert!(matches!(
            Cli::try_parse_from(["spinchain", "config"]).unwrap().command,
            Commands::Config
        ));
        assert!(matches!(
            Cli::try_parse_from(["spinchain", "version"]).unwrap().command,
            Commands::Version
        ));
    }
}
