use std::{fs::File, io, path::Path, sync::Mutex};

use anyhow::Context;
use tracing_subscriber::{filter::LevelFilter, prelude::*};

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} file as JSON: {}",
            file_kind,
            path.display()
        )
    })?;
    Ok(value)
}

/// Maps the `-v` count to a log level: info, then debug, then trace.
pub fn level_filter(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Installs the global subscriber writing to `log_file`.
///
/// The terminal belongs to the game, so without a log file nothing is
/// installed and events are discarded.
pub fn init_logging(verbose: u8, log_file: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file: {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(level_filter(verbose))
        .try_init()
        .context("Failed to install log subscriber")?;
    Ok(())
}
