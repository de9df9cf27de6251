use std::path::PathBuf;

use anyhow::Context as _;
use blockfall_engine::{Engine, EngineConfig, PieceSeed};
use tracing::info;

use crate::{command::play::app::PlayApp, util};

mod app;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Engine configuration file (JSON). Flags below override its fields
    #[clap(long)]
    config: Option<PathBuf>,
    /// Board width in cells
    #[clap(long)]
    width: Option<u16>,
    /// Board height in cells
    #[clap(long)]
    height: Option<u16>,
    /// Starting level (0-15)
    #[clap(long)]
    level: Option<usize>,
    /// Logical frames per second
    #[clap(long)]
    frame_rate: Option<u32>,
    /// Piece sequence seed, 32 hexadecimal digits
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Write logs to this file
    #[clap(long)]
    log_file: Option<PathBuf>,
    /// Increase log verbosity (-v debug, -vv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl PlayArg {
    fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file::<EngineConfig, _>("config", path)?,
            None => EngineConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(level) = self.level {
            config.start_level = level;
        }
        if let Some(frame_rate) = self.frame_rate {
            config.frame_rate = frame_rate;
        }
        config.validate().context("Invalid engine configuration")?;
        Ok(config)
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    util::init_logging(arg.verbose, arg.log_file.as_deref())?;

    let config = arg.engine_config()?;
    let engine = match arg.seed {
        Some(seed) => Engine::with_seed(&config, seed)?,
        None => Engine::new(&config)?,
    };

    let mut app = PlayApp::new(engine);
    ratatui::run(|terminal| app.run(terminal))?;

    let snapshot = app.snapshot();
    info!(
        completed_lines = snapshot.completed_lines(),
        level = snapshot.level(),
        phase = %snapshot.phase(),
        "session ended"
    );
    Ok(())
}
