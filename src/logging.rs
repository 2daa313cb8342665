use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use anyhow::Result;

/// Log file next to the downloaded item lists. Logging to the terminal would
/// draw over the alternate screen.
pub fn log_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dailyword")
        .join("dailyword.log")
}

/// Route the `log` facade to a file. `RUST_LOG` wins over `default_level`.
/// Calling this twice is harmless; the second logger is ignored.
pub fn init(default_level: &str) -> Result<PathBuf> {
    let path = log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let env = env_logger::Env::default().default_filter_or(default_level);
    if env_logger::Builder::from_env(env)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_secs()
        .try_init()
        .is_err()
    {
        log::debug!("logger already initialized");
    }
    Ok(path)
}
