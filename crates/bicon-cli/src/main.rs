//! Bicon CLI - Command-line interface for Bicon
//!
//! Loads graphs in `{vertices, connections}` notation and runs the
//! biconnected component decomposition over them.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "bicon")]
#[command(author = "Bicon Contributors")]
#[command(version)]
#[command(about = "Biconnected component decomposition for hand-drawn graphs", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to <config dir>/bicon/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init {
        /// Where to write it (defaults to the platform config dir)
        path: Option<PathBuf>,
    },

    /// List the biconnected components of a graph
    Components {
        /// Notation file, or `-` for stdin
        file: PathBuf,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// List the articulation points of a graph
    Articulation {
        /// Notation file, or `-` for stdin
        file: PathBuf,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Print edges in depth-first order
    Walk {
        /// Notation file, or `-` for stdin
        file: PathBuf,
    },

    /// Re-export a graph in depth-first order
    Export {
        /// Notation file, or `-` for stdin
        file: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show graph statistics
    Stats {
        /// Notation file, or `-` for stdin
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => fail(&e),
    };
    colored::control::set_override(config.color);

    // Set up logging
    let filter = config.log_filter(cli.verbose, std::env::var(config::LOG_ENV).ok());
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let result = match cli.command {
        Commands::Init { path } => match path.or_else(Config::default_path) {
            Some(path) => commands::init(&path),
            None => Err("no config directory on this platform; pass a path".into()),
        },
        Commands::Components { file, json } => commands::components(&file, json, &config),
        Commands::Articulation { file, json } => commands::articulation(&file, json),
        Commands::Walk { file } => commands::walk(&file),
        Commands::Export { file, output } => commands::export(&file, output.as_deref(), &config),
        Commands::Stats { file } => commands::stats(&file),
    };

    if let Err(e) = result {
        fail(e.as_ref());
    }
}

fn fail(e: &dyn std::error::Error) -> ! {
    eprintln!("{} {}", "error:".red().bold(), e);
    let mut cause = e.source();
    while let Some(inner) = cause {
        eprintln!("  {} {}", "caused by:".red(), inner);
        cause = inner.source();
    }
    std::process::exit(1);
}
