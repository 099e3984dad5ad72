//! Runtime configuration, layered from an optional TOML file and
//! `TRANSCRIPT_*` environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;
use transcript_core::record::DEFAULT_BRANCH;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// SQLite database file; a leading `~/` is expanded.
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  /// Branch recorded for students added without an explicit one.
  #[serde(default = "default_branch")]
  pub branch:     String,
}

fn default_store_path() -> PathBuf { PathBuf::from("student_activity.db") }

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8501 }

fn default_branch() -> String { DEFAULT_BRANCH.to_string() }

impl Settings {
  /// Read `path` if it exists, then apply `TRANSCRIPT_*` overrides from the
  /// process environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    Self::load_with_env(path, config::Environment::with_prefix("TRANSCRIPT"))
  }

  fn load_with_env(path: &Path, env: config::Environment) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(env)
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?;

    let mut settings: Settings = settings
      .try_deserialize()
      .context("failed to deserialise settings")?;
    settings.store_path = expand_tilde(&settings.store_path);
    Ok(settings)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
