use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "focuspet", version, about = "Focus timer with a virtual pet")]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive focus session on stdin/stdout
    Run {
        /// Override the focus duration for this run
        #[arg(long)]
        focus_secs: Option<u64>,
    },
    /// Replay a timestamped script and print the outcome
    Simulate {
        /// Script file, one `@<secs> <command>` per line
        script: PathBuf,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Summary figures for a number of completed sessions
    Stats {
        /// Completed sessions to summarise
        #[arg(long, default_value = "0")]
        sessions: u64,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("FOCUSPET_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Run { focus_secs } => commands::run::run(config_path, focus_secs),
        Commands::Simulate { script } => commands::simulate::run(config_path, &script),
        Commands::Config { action } => commands::config::run(config_path, action),
        Commands::Stats { sessions } => commands::stats::run(config_path, sessions),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
