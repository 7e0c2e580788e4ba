//! Validation helpers for the `.gradebook/` layout and roster snapshot.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;

use crate::io::config::load_config;
use crate::io::init::GradebookPaths;
use crate::io::snapshot_store::snapshot_violations;

/// High-level validation outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateOutcome {
    pub students: usize,
}

/// Validate `.gradebook/` layout, config and roster snapshot.
///
/// Unlike session startup, which falls back to the default roster, this
/// reports every problem in the snapshot.
pub fn validate_gradebook(root: &Path) -> Result<ValidateOutcome> {
    let paths = GradebookPaths::new(root);

    ensure_dir(&paths.gradebook_dir)?;
    ensure_dir(&paths.state_dir)?;
    ensure_file(&paths.config_path)?;
    ensure_file(&paths.roster_path)?;

    load_config(&paths.config_path).with_context(|| "load config.toml")?;

    let contents = fs::read_to_string(&paths.roster_path)
        .with_context(|| format!("read {}", paths.roster_path.display()))?;
    let value: Value = serde_json::from_str(&contents).with_context(|| "parse roster.json")?;
    let errors = snapshot_violations(&value)?;
    if !errors.is_empty() {
        return Err(anyhow!("roster violations:\n- {}", errors.join("\n- ")));
    }

    let students = value.as_array().map_or(0, Vec::len);
    Ok(ValidateOutcome { students })
}

fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(anyhow!("missing directory {}", path.display()));
    }
    if !path.is_dir() {
        return Err(anyhow!("expected directory {}", path.display()));
    }
    Ok(())
}

fn ensure_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(anyhow!("missing file {}", path.display()));
    }
    if !path.is_file() {
        return Err(anyhow!("expected file {}", path.display()));
    }
    Ok(())
}
