//! Gradebook configuration stored under `.gradebook/config.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Largest roster `default_roster` may build when no snapshot exists.
pub const MAX_DEFAULT_ROSTER_SIZE: usize = 10_000;

/// Gradebook configuration (TOML).
///
/// Missing fields default to the values used by the five-student demo roster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GradebookConfig {
    /// Number of students in the roster created when no snapshot exists.
    pub default_roster_size: usize,

    /// Display-name prefix for default students (`Student1`, `Student2`, ...).
    pub name_prefix: String,

    /// Include per-subject min/max/std-dev in derived views.
    pub subject_stats: bool,

    /// Compute the expensive statistics on a background worker thread.
    pub background_stats: bool,
}

impl Default for GradebookConfig {
    fn default() -> Self {
        Self {
            default_roster_size: 5,
            name_prefix: "Student".to_string(),
            subject_stats: false,
            background_stats: false,
        }
    }
}

impl GradebookConfig {
    pub fn validate(&self) -> Result<()> {
        if self.name_prefix.trim().is_empty() {
            return Err(anyhow!("name_prefix must be non-empty"));
        }
        if self.default_roster_size > MAX_DEFAULT_ROSTER_SIZE {
            return Err(anyhow!(
                "default_roster_size must be at most {MAX_DEFAULT_ROSTER_SIZE}, got {}",
                self.default_roster_size
            ));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `GradebookConfig::default()`.
pub fn load_config(path: &Path) -> Result<GradebookConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config missing, using defaults");
        let cfg = GradebookConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: GradebookConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &GradebookConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
