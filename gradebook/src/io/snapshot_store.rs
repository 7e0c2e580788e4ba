//! Roster snapshot persistence.
//!
//! The session only talks to the [`SnapshotStore`] trait. [`JsonFileStore`]
//! keeps the roster in `.gradebook/state/roster.json`; [`MemoryStore`] keeps
//! the same serialized form in memory for tests and ephemeral sessions.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use jsonschema::validator_for;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use crate::core::invariants::invariant_violations;
use crate::roster::{Roster, Student};

pub const ROSTER_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/schemas/roster/v1.schema.json"
));

/// Load/save collaborator for the roster.
pub trait SnapshotStore {
    /// Returns `Ok(None)` when no snapshot has been saved yet.
    fn load(&self) -> Result<Option<Roster>>;

    fn save(&self, roster: &Roster) -> Result<()>;
}

/// Serialize a roster to pretty-printed JSON with trailing newline.
pub fn render_snapshot(roster: &Roster) -> Result<String> {
    let mut buf = serde_json::to_string_pretty(roster).context("serialize roster")?;
    buf.push('\n');
    Ok(buf)
}

/// Parse and validate a snapshot (schema + invariants).
pub fn parse_snapshot(contents: &str) -> Result<Roster> {
    let value: Value = serde_json::from_str(contents).context("parse roster json")?;
    let errors = snapshot_violations(&value)?;
    if !errors.is_empty() {
        return Err(anyhow!("roster snapshot invalid: {}", errors.join("; ")));
    }
    serde_json::from_value(value).context("deserialize roster")
}

/// Every schema and invariant violation in a parsed snapshot.
pub fn snapshot_violations(value: &Value) -> Result<Vec<String>> {
    let schema: Value = serde_json::from_str(ROSTER_SCHEMA).context("parse roster schema")?;
    let compiled = validator_for(&schema).map_err(|err| anyhow!("invalid schema: {}", err))?;
    let errors: Vec<String> = compiled
        .iter_errors(value)
        .map(|err| err.to_string())
        .collect();
    if !errors.is_empty() {
        return Ok(errors);
    }
    let students: Vec<Student> =
        serde_json::from_value(value.clone()).context("deserialize students")?;
    Ok(invariant_violations(&students)
        .iter()
        .map(ToString::to_string)
        .collect())
}

/// Snapshot stored as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Option<Roster>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no roster snapshot");
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("read roster {}", self.path.display()))?;
        let roster = parse_snapshot(&contents)
            .with_context(|| format!("load roster {}", self.path.display()))?;
        debug!(path = %self.path.display(), students = roster.len(), "roster snapshot loaded");
        Ok(Some(roster))
    }

    /// Atomically write the snapshot (temp file + rename).
    fn save(&self, roster: &Roster) -> Result<()> {
        debug!(path = %self.path.display(), students = roster.len(), "writing roster snapshot");
        let buf = render_snapshot(roster)?;
        write_atomic(&self.path, &buf)
    }
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("roster path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp roster {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace roster {}", path.display()))?;
    Ok(())
}

/// In-memory store holding the serialized snapshot.
#[derive(Debug, Default)]
pub struct MemoryStore {
    contents: Mutex<Option<String>>,
    saves: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with raw snapshot text (possibly invalid).
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(Some(contents.into())),
            saves: Mutex::new(0),
        }
    }

    pub fn with_roster(roster: &Roster) -> Result<Self> {
        Ok(Self::with_contents(render_snapshot(roster)?))
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().clone()
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        *self.saves.lock()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<Roster>> {
        self.contents
            .lock()
            .as_deref()
            .map(parse_snapshot)
            .transpose()
    }

    fn save(&self, roster: &Roster) -> Result<()> {
        let buf = render_snapshot(roster)?;
        *self.contents.lock() = Some(buf);
        *self.saves.lock() += 1;
        Ok(())
    }
}
