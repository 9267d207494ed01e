#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a pass-and-play Cop and Robber session.

mod input;
mod render;
mod session;

use std::{
    fs,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use cop_and_robber_core::GameConfig;
use cop_and_robber_system_bootstrap::Bootstrap;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::session::{Flow, Session};

/// Pass-and-play Cop and Robber on a grid.
#[derive(Debug, Parser)]
#[command(name = "cop-and-robber", version, about)]
struct CliArgs {
    /// TOML file with game settings.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for a reproducible board.
    #[arg(long)]
    seed: Option<u64>,
    /// Board columns, including the wall.
    #[arg(long)]
    columns: Option<u32>,
    /// Board rows, including the wall.
    #[arg(long)]
    rows: Option<u32>,
    /// Number of obstacle placements.
    #[arg(long)]
    patterns: Option<u32>,
    /// Use single-cell obstacles instead of shaped patterns.
    #[arg(long)]
    single_cell_obstacles: bool,
    /// Number of treasures.
    #[arg(long)]
    treasures: Option<u32>,
    /// Forbid the cop's last step of a turn from landing on treasure.
    #[arg(long)]
    cop_guards_treasure: bool,
    /// Log engine internals to stderr.
    #[arg(short, long)]
    verbose: bool,
}

impl CliArgs {
    fn apply_overrides(&self, config: &mut GameConfig) {
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(columns) = self.columns {
            config.board.columns = columns;
        }
        if let Some(rows) = self.rows {
            config.board.rows = rows;
        }
        if let Some(patterns) = self.patterns {
            config.obstacles.pattern_count = patterns;
        }
        if self.single_cell_obstacles {
            config.obstacles.use_patterns = false;
        }
        if let Some(treasures) = self.treasures {
            config.treasure_count = treasures;
        }
        if self.cop_guards_treasure {
            config.cop_final_step_guards_treasure = true;
        }
    }
}

/// Entry point for the Cop and Robber command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    install_logging(args.verbose);

    let mut config = load_config(args.config.as_deref())?;
    args.apply_overrides(&mut config);
    config.validate().context("invalid game configuration")?;
    info!(?config, "configuration loaded");

    let bootstrap = Bootstrap::new(config).context("failed to prepare the game")?;
    let mut session = Session::start(bootstrap)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    run(&mut session, stdin.lock(), stdout.lock())
}

fn install_logging(verbose: bool) {
    let fallback = if verbose { "cop_and_robber=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("in config file {}", path.display()))
}

fn parse_config(contents: &str) -> Result<GameConfig> {
    let config: GameConfig =
        toml::from_str(contents).context("failed to parse game config toml contents")?;
    Ok(config)
}

/// Drives the session from `input` until the players quit or input ends.
fn run<R, W>(session: &mut Session, input: R, mut output: W) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    for line in session.intro() {
        writeln!(output, "{line}")?;
    }
    write!(output, "> ")?;
    output.flush()?;

    for line in input.lines() {
        let line = line.context("failed to read from stdin")?;
        if line.trim().is_empty() {
            write!(output, "> ")?;
            output.flush()?;
            continue;
        }

        let (flow, messages) = session.handle_line(&line)?;
        for message in messages {
            writeln!(output, "{message}")?;
        }
        if flow == Flow::Quit {
            break;
        }
        write!(output, "> ")?;
        output.flush()?;
    }

    Ok(())
}
