//! Gradebook CLI.
//!
//! Keeps a roster snapshot under `.gradebook/state/roster.json` and prints
//! totals, grades, ranks and statistics derived from it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gradebook::core::types::{DerivedStudent, SubjectStatsSet};
use gradebook::core::validator::FillTarget;
use gradebook::exit_codes;
use gradebook::io::config::{GradebookConfig, load_config};
use gradebook::io::init::{GradebookPaths, InitOptions, init_gradebook};
use gradebook::io::snapshot_store::JsonFileStore;
use gradebook::logging;
use gradebook::render::render_view;
use gradebook::session::Gradebook;
use gradebook::validate::validate_gradebook;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

#[derive(Parser)]
#[command(
    name = "gradebook",
    version,
    about = "Derived grades, ranks and statistics for a student roster"
)]
struct Cli {
    /// Project root containing `.gradebook/`.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create `.gradebook/` with config, schema and a default roster.
    Init {
        /// Overwrite existing files.
        #[arg(short, long)]
        force: bool,
    },
    /// Print the ranked roster and statistics.
    Show {
        /// Order rows by rank (ties by name) instead of id.
        #[arg(long)]
        by_rank: bool,
        /// Include per-subject min/max/std dev.
        #[arg(long)]
        subjects: bool,
        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Set one score. Malformed values become 0; all values clamp to 0..=100.
    Set {
        id: u32,
        subject: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Fill a subject (or `all`) with random scores.
    Fill {
        target: String,
        /// Seed for reproducible scores.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Check layout, config and roster snapshot.
    Validate,
}

#[derive(Serialize)]
struct JsonView<'a> {
    students: &'a [DerivedStudent],
    overall_std_dev: f64,
    subject_stats: Option<SubjectStatsSet>,
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let root = cli.root.as_path();
    match cli.command {
        Command::Init { force } => cmd_init(root, force),
        Command::Show {
            by_rank,
            subjects,
            json,
        } => cmd_show(root, by_rank, subjects, json),
        Command::Set { id, subject, value } => cmd_set(root, id, &subject, &value),
        Command::Fill { target, seed } => cmd_fill(root, &target, seed),
        Command::Validate => cmd_validate(root),
    }
}

fn cmd_init(root: &Path, force: bool) -> Result<i32> {
    let paths = init_gradebook(root, &InitOptions { force })?;
    println!("initialized {}", paths.gradebook_dir.display());
    Ok(exit_codes::OK)
}

fn cmd_show(root: &Path, by_rank: bool, subjects: bool, json: bool) -> Result<i32> {
    let (mut session, cfg) = open_session(root)?;
    session.set_subject_stats(subjects || cfg.subject_stats);
    let view = session.view();
    if json {
        let rows = if by_rank {
            view.sorted_by_rank()
        } else {
            view.ranked_roster.clone()
        };
        let payload = JsonView {
            students: &rows,
            overall_std_dev: view.overall_std_dev,
            subject_stats: view.subject_stats,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).context("serialize view")?
        );
    } else {
        print!("{}", render_view(&view, by_rank));
    }
    Ok(exit_codes::OK)
}

fn cmd_set(root: &Path, id: u32, subject: &str, value: &str) -> Result<i32> {
    let (mut session, _) = open_session(root)?;
    if let Err(err) = session.update_score(id, subject, value) {
        eprintln!("{err}");
        return Ok(exit_codes::REJECTED);
    }
    print!("{}", render_view(&session.view(), false));
    Ok(exit_codes::OK)
}

fn cmd_fill(root: &Path, target: &str, seed: Option<u64>) -> Result<i32> {
    let target: FillTarget = match target.parse() {
        Ok(target) => target,
        Err(err) => {
            eprintln!("{err}");
            return Ok(exit_codes::REJECTED);
        }
    };
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let (mut session, _) = open_session(root)?;
    session.fill_random(target, &mut rng);
    print!("{}", render_view(&session.view(), false));
    Ok(exit_codes::OK)
}

fn cmd_validate(root: &Path) -> Result<i32> {
    let outcome = validate_gradebook(root)?;
    println!("ok ({} students)", outcome.students);
    Ok(exit_codes::OK)
}

fn open_session(root: &Path) -> Result<(Gradebook<JsonFileStore>, GradebookConfig)> {
    let paths = GradebookPaths::new(root);
    let cfg = load_config(&paths.config_path)?;
    // one-shot commands render once; a worker thread would only duplicate work
    let session_cfg = GradebookConfig {
        background_stats: false,
        ..cfg.clone()
    };
    let session = Gradebook::open(JsonFileStore::new(&paths.roster_path), &session_cfg)?;
    Ok((session, cfg))
}
