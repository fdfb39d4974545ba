use std::path::PathBuf;

use anyhow::Context as _;
use blockfall_engine::{GameConfig, GameSession, PieceSeed};
use clap::Parser;
use rand::Rng as _;

use crate::{
    play::PlayApp,
    tui::{RenderMode, Runtime},
    util,
};

const RENDER_RATE: f64 = 60.0;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about = "Falling-block puzzle in the terminal", long_about = None)]
pub struct CommandArgs {
    /// JSON file with game settings; command-line flags take precedence
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Board width in columns (4-64)
    #[clap(long)]
    width: Option<usize>,
    /// Board height in rows (4-65535)
    #[clap(long)]
    height: Option<usize>,
    /// Points for each cleared row
    #[clap(long)]
    score_per_row: Option<u64>,
    /// Milliseconds between automatic downward moves
    #[clap(long)]
    gravity_ms: Option<u64>,
    /// Piece sequence seed (32 hex digits); random when omitted
    #[clap(long, value_name = "HEX")]
    seed: Option<PieceSeed>,
    /// Write logs to this file (level from RUST_LOG, default info)
    #[clap(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

impl CommandArgs {
    /// Builds the game configuration: defaults, then the config file, then flags.
    fn game_config(&self) -> anyhow::Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_config_file(path)?,
            None => GameConfig::default(),
        };
        if let Some(width) = self.width {
            config.board_width = width;
        }
        if let Some(height) = self.height {
            config.board_height = height;
        }
        if let Some(score_per_row) = self.score_per_row {
            config.score_per_row = score_per_row;
        }
        if let Some(gravity_ms) = self.gravity_ms {
            config.gravity_interval_ms = gravity_ms;
        }
        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    if let Some(path) = &args.log_file {
        util::init_file_logger(path)?;
    }

    let config = args.game_config()?;
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    log::info!("starting with {config:?}, seed {seed}");

    let mut app = PlayApp::new(GameSession::with_seed(config, seed));
    let runtime = Runtime::new(RenderMode::throttled_from_rate(RENDER_RATE));
    runtime.run(&mut app).context("Terminal I/O failed")?;

    log::info!("exiting");
    Ok(())
}
