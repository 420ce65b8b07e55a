//! Runtime settings: an optional TOML file layered under `RINGSIDE_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

pub const DEFAULT_STORE_PATH: &str = "~/.local/share/ringside/ringside.db";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// SQLite file holding histories and show records. `~` is expanded.
  pub store_path: PathBuf,
  pub host:       String,
  pub port:       u16,
}

impl Settings {
  /// Read `file` (if present) and the environment, over built-in defaults.
  pub fn load(file: &Path) -> anyhow::Result<Self> {
    let raw = config::Config::builder()
      .set_default("store_path", DEFAULT_STORE_PATH)?
      .set_default("host", "127.0.0.1")?
      .set_default("port", 7878)?
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("RINGSIDE"))
      .build()
      .context("failed to read config file")?;

    let mut settings: Settings = raw
      .try_deserialize()
      .context("failed to deserialise settings")?;
    settings.store_path = expand_tilde(&settings.store_path);
    Ok(settings)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
