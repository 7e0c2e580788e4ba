//! Initialization helpers for `.gradebook/` scaffolding.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use super::config::{GradebookConfig, load_config, write_config};
use super::snapshot_store::{JsonFileStore, ROSTER_SCHEMA, SnapshotStore};
use crate::roster::default_roster;

/// All canonical paths within `.gradebook/` for a project root.
#[derive(Debug, Clone)]
pub struct GradebookPaths {
    pub root: PathBuf,
    pub gradebook_dir: PathBuf,
    pub state_dir: PathBuf,
    pub config_path: PathBuf,
    pub schema_path: PathBuf,
    pub roster_path: PathBuf,
}

impl GradebookPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let gradebook_dir = root.join(".gradebook");
        let state_dir = gradebook_dir.join("state");
        Self {
            root: root.clone(),
            gradebook_dir: gradebook_dir.clone(),
            state_dir: state_dir.clone(),
            config_path: gradebook_dir.join("config.toml"),
            schema_path: state_dir.join("roster.schema.json"),
            roster_path: state_dir.join("roster.json"),
        }
    }
}

/// Options for `init_gradebook`.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// If true, overwrite existing files.
    pub force: bool,
}

/// Create `.gradebook/` scaffolding in `root`.
///
/// Writes the default config, the roster schema and a default roster sized
/// by the config. An existing `config.toml` is honored when re-initializing
/// with `force`. Fails if `.gradebook/` already exists unless `options.force` is set.
pub fn init_gradebook(root: &Path, options: &InitOptions) -> Result<GradebookPaths> {
    let paths = GradebookPaths::new(root);
    if paths.gradebook_dir.exists() && !options.force {
        return Err(anyhow!(
            "gradebook init: .gradebook already exists (use --force to overwrite)"
        ));
    }
    if paths.gradebook_dir.exists() && !paths.gradebook_dir.is_dir() {
        return Err(anyhow!(
            "gradebook init: .gradebook exists but is not a directory"
        ));
    }

    create_dir(&paths.gradebook_dir)?;
    create_dir(&paths.state_dir)?;

    let cfg = if paths.config_path.exists() {
        load_config(&paths.config_path)?
    } else {
        GradebookConfig::default()
    };
    write_config(&paths.config_path, &cfg)?;
    fs::write(&paths.schema_path, ROSTER_SCHEMA)
        .with_context(|| format!("write file {}", paths.schema_path.display()))?;
    JsonFileStore::new(&paths.roster_path)
        .save(&default_roster(cfg.default_roster_size, &cfg.name_prefix))?;

    Ok(paths)
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).with_context(|| format!("create directory {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::snapshot_store::render_snapshot;

    /// Verifies init creates the directory structure and a default roster.
    #[test]
    fn init_creates_expected_layout() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = init_gradebook(temp.path(), &InitOptions { force: false }).expect("init");

        assert!(paths.gradebook_dir.is_dir());
        assert!(paths.state_dir.is_dir());
        assert!(paths.config_path.is_file());
        assert!(paths.schema_path.is_file());
        assert!(paths.roster_path.is_file());

        let roster_contents = fs::read_to_string(&paths.roster_path).expect("read roster");
        let expected = render_snapshot(&default_roster(5, "Student")).expect("render");
        assert_eq!(roster_contents, expected);
    }

    #[test]
    fn init_without_force_refuses_existing_dir() {
        let temp = tempfile::tempdir().expect("tempdir");
        init_gradebook(temp.path(), &InitOptions { force: false }).expect("init");
        let err = init_gradebook(temp.path(), &InitOptions { force: false }).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    /// Re-init with force resets the roster but keeps a customized config.
    #[test]
    fn init_with_force_resets_roster_using_existing_config() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = init_gradebook(temp.path(), &InitOptions { force: false }).expect("init");
        fs::write(&paths.config_path, "default_roster_size = 2\nname_prefix = \"P\"\n")
            .expect("write config");
        fs::write(&paths.roster_path, "garbage").expect("corrupt roster");

        init_gradebook(temp.path(), &InitOptions { force: true }).expect("re-init");

        let loaded = JsonFileStore::new(&paths.roster_path)
            .load()
            .expect("load")
            .expect("present");
        assert_eq!(loaded, default_roster(2, "P"));
    }
}
