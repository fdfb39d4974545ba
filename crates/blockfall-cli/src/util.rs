use std::{fs::File, io, path::Path};

use anyhow::Context;

/// Loads a JSON settings file; unknown or malformed fields are reported with the path.
pub fn read_config_file<T>(path: &Path) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let file = File::open(path)
        .with_context(|| format!("Failed to open config file: {}", path.display()))?;
    serde_json::from_reader(io::BufReader::new(file))
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Sends `log` output to `path`, filtered by `RUST_LOG` (default `info`).
///
/// The terminal is in raw mode while playing, so logs never go to stderr.
pub fn init_file_logger(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file: {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("Failed to install logger")?;
    Ok(())
}
