//! Run all tests with cleanup.
//!
//! The layout tests use insta inline snapshots. A failing inline snapshot leaves a
//! `.pending-snap` file next to the source, and a failing file snapshot leaves a `.snap.new`.
//! Stale ones from earlier runs make `cargo insta review` show outdated diffs, so they are
//! removed before every run.
//!
//! ## Commands
//!
//! - `run` - Run the whole workspace test suite
//! - `golden` - Run only the golden layout tests
//! - `clean` - Remove pending snapshot files
//! - `status` - Show pending snapshot files

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Subcommand;

/// Directories searched for pending snapshots.
const SOURCE_DIRS: &[&str] = &["src", "lightbox-config/src"];

const PENDING_SUFFIXES: &[&str] = &[".pending-snap", ".snap.new"];

#[derive(Subcommand)]
pub enum Action {
    /// Run all tests with cleanup
    Run {
        /// Only run tests matching this filter
        #[arg(long, short)]
        filter: Option<String>,

        /// Don't remove pending snapshots before running
        #[arg(long)]
        no_pre_clean: bool,

        /// Remove pending snapshots after test failures
        #[arg(long)]
        post_clean: bool,

        /// Run tests in release mode
        #[arg(long)]
        release: bool,

        /// Also run the slow randomized tests
        #[arg(long)]
        slow: bool,
    },
    /// Run the golden layout tests only
    Golden,
    /// Remove pending snapshot files
    Clean {
        /// Show what would be removed without removing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Show pending snapshot files
    Status,
}

pub fn run(action: Action) -> Result<()> {
    match action {
        Action::Run {
            filter,
            no_pre_clean,
            post_clean,
            release,
            slow,
        } => run_tests(filter, no_pre_clean, post_clean, release, slow),
        Action::Golden => run_golden(),
        Action::Clean { dry_run } => clean_pending(dry_run),
        Action::Status => show_status(),
    }
}

fn run_tests(
    filter: Option<String>,
    no_pre_clean: bool,
    post_clean: bool,
    release: bool,
    slow: bool,
) -> Result<()> {
    println!("Running all tests\n");

    if !no_pre_clean {
        let cleaned = remove_pending()?;
        if cleaned > 0 {
            println!("Removed {cleaned} stale pending snapshots\n");
        }
    }

    let mut cmd = Command::new("cargo");
    cmd.args(["test", "--workspace", "--exclude", "xtask"]);
    if release {
        cmd.arg("--release");
    }
    if let Some(filter) = &filter {
        cmd.args(["--", filter]);
    }
    if slow {
        cmd.env("RUN_SLOW_TESTS", "1");
    }

    let start = Instant::now();
    let status = cmd.status().context("error running cargo test")?;
    let duration = start.elapsed();
    println!();

    if status.success() {
        println!("All tests passed in {:.2}s", duration.as_secs_f64());
        return Ok(());
    }

    println!("Some tests failed (took {:.2}s)", duration.as_secs_f64());

    let pending = find_pending();
    if !pending.is_empty() {
        println!("\nFound {} pending snapshots", pending.len());
        if post_clean {
            let cleaned = remove_pending()?;
            println!("Removed {cleaned} files (--post-clean)");
        } else {
            println!("  To view diffs: cargo insta review");
            println!("  To clean up: cargo xtask test-all clean");
        }
    }

    std::process::exit(1);
}

fn run_golden() -> Result<()> {
    println!("Running golden layout tests\n");

    let status = Command::new("cargo")
        .args(["test", "--lib", "-p", "lightbox", "--", "golden"])
        .status()
        .context("error running cargo test")?;

    if status.success() {
        println!("\nGolden tests pass");
        return Ok(());
    }

    println!();
    println!("The layout output changed. Placement positions are user visible, so check that");
    println!("every changed coordinate is intended before updating the snapshots.");
    println!("  To view diffs: cargo insta review");
    std::process::exit(1);
}

fn clean_pending(dry_run: bool) -> Result<()> {
    let pending = find_pending();
    if pending.is_empty() {
        println!("No pending snapshots");
        return Ok(());
    }

    for path in &pending {
        if dry_run {
            println!("  [dry-run] would remove {}", path.display());
        } else {
            println!("  removing {}", path.display());
            fs::remove_file(path).with_context(|| format!("error removing {path:?}"))?;
        }
    }

    if !dry_run {
        println!("\nRemoved {} pending snapshots", pending.len());
    }
    Ok(())
}

fn show_status() -> Result<()> {
    let pending = find_pending();
    if pending.is_empty() {
        println!("No pending snapshots");
        return Ok(());
    }

    println!("{} pending snapshots:", pending.len());
    for path in &pending {
        println!("  {}", path.display());
    }
    println!("\n  To view diffs: cargo insta review");
    println!("  To clean up: cargo xtask test-all clean");
    Ok(())
}

fn find_pending() -> Vec<PathBuf> {
    let mut files = Vec::new();
    for dir in SOURCE_DIRS {
        collect_pending(Path::new(dir), &mut files);
    }
    files.sort();
    files
}

fn collect_pending(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.is_dir() {
            collect_pending(&path, files);
            continue;
        }

        let name = entry.file_name();
        let name = name.to_string_lossy();
        if PENDING_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
            files.push(path);
        }
    }
}

fn remove_pending() -> Result<usize> {
    let files = find_pending();
    for path in &files {
        fs::remove_file(path).with_context(|| format!("error removing {path:?}"))?;
    }
    Ok(files.len())
}
