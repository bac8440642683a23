// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tiles CLI - play the sliding-tile puzzle in a terminal
//!
//! Reads one command per line from stdin, so it can also be scripted by
//! piping moves in.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming};
use std::io;
use std::path::PathBuf;
use tiles_cli::app::App;
use tiles_cli::config::{self, GameConfig};
use tiles_core::leaderboard::{LeaderboardStore, Scope};
use tiles_core::{Game, Session};
use tracing_subscriber::EnvFilter;

/// Command-line arguments
#[derive(Parser, Debug)]
#[clap(
    name = "tiles",
    about = "Sliding-tile 2048 puzzle in the terminal",
    version
)]
struct Args {
    /// Board size (3, 4, or 5)
    #[clap(short, long)]
    size: Option<usize>,

    /// Keep playing past 2048
    #[clap(long)]
    infinite: bool,

    /// Seed for reproducible tile spawns
    #[clap(long)]
    seed: Option<u64>,

    /// Config file to use instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,

    /// Leaderboard file to use instead of the configured one
    #[clap(long)]
    leaderboard: Option<PathBuf>,

    /// Do not ring the bell on merges
    #[clap(long)]
    quiet: bool,

    /// Log to stderr at debug level (RUST_LOG overrides)
    #[clap(long)]
    debug: bool,

    #[clap(subcommand)]
    command: Option<Action>,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Print a leaderboard and exit
    Leaderboard {
        /// Board size to show; defaults to the configured size
        #[clap(short, long)]
        size: Option<usize>,

        /// Show the ranking across all sizes
        #[clap(long, conflicts_with = "size")]
        all: bool,
    },
}

/// Rotating file log; dropping the handle stops the logger
fn init_file_logging() -> Result<LoggerHandle> {
    let log_dir = config::get_log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let handle = Logger::try_with_env_or_str("info")?
        .log_to_file(
            FileSpec::default()
                .directory(&log_dir)
                .basename("tiles")
                .suffix("log"),
        )
        .rotate(
            Criterion::Size(10 * 1024 * 1024),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(5),
        )
        .start()?;

    Ok(handle)
}

fn init_debug_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => config::load_config_from(path)?,
        None => config::load_config().unwrap_or_else(|e| {
            tracing::warn!("Using default config: {:#}", e);
            GameConfig::default()
        }),
    };

    if let Some(size) = args.size {
        config.board_size = size;
    }
    if args.infinite {
        config.infinite_mode = true;
    }
    if let Some(path) = &args.leaderboard {
        config.leaderboard_path = Some(path.clone());
    }
    if args.quiet {
        config.bell = false;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Keep the file logger alive for the whole run
    let _logger = if args.debug {
        init_debug_logging();
        None
    } else {
        match init_file_logging() {
            Ok(handle) => Some(handle),
            Err(e) => {
                eprintln!("Warning: Failed to initialize logging: {}", e);
                None
            }
        }
    };

    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!("panic: {}", panic_info);
        eprintln!("PANIC: {}", panic_info);
    }));

    let config = load_config(&args)?;
    let store = LeaderboardStore::new(config.resolve_leaderboard_path()?);
    tracing::info!("Using leaderboard at {:?}", store.path());

    if let Some(Action::Leaderboard { size, all }) = args.command {
        let scope = if all {
            Scope::Global
        } else {
            Scope::Size(size.unwrap_or(config.board_size))
        };
        print!("{}", store.format_table(scope));
        return Ok(());
    }

    let game = match args.seed {
        Some(seed) => Game::seeded(config.board_size, seed)?,
        None => Game::new(config.board_size)?,
    };
    let session = Session::with_game(game, store, config.session_options());

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut app = App::new(session, stdout.lock(), config.bell);
    app.run(stdin.lock()).context("Game loop failed")?;

    Ok(())
}
