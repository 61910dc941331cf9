use anyhow::{Context, Result, ensure};
use chrono::Local;
use lkit::{Arg, Level, LogError, LogHandler, Logrecord, strkit};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::tempdir;

/// Counts the records it is handed.
struct Counter {
    hits: Arc<AtomicUsize>,
}

impl LogHandler for Counter {
    fn name(&self) -> &str {
        "counter"
    }

    fn handle(&self, _record: &Logrecord<'_>) -> Result<(), LogError> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn read_entries(dir: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(dir.join("logkit.log")).context("Failed to read logkit.log")?;
    Ok(contents.split('\n').map(str::to_string).collect())
}

/// # Logkit Integration Test
///
/// Drives the process-wide manager the way an application would:
/// 1.  Configures prefix, threshold and store path, and enables the file handler.
/// 2.  Logs an info and an error record and checks `logkit.log` line by line,
///     including the stack lines that follow the error.
/// 3.  Lowers the threshold to `Trace` and checks that only trace records pass.
/// 4.  Installs the `log` facade bridge and checks its records land in the same file.
fn main() -> Result<()> {
    println!("{}", strkit::format_time(&Local::now()));

    let temp_dir = tempdir().context("Failed to create temporary directory")?;
    let hits = Arc::new(AtomicUsize::new(0));

    lkit::log()
        .set_prefix("ACORN")
        .set_level(Level::Error)
        .set_store_path(temp_dir.path())
        .enable_handler("file")
        .add_handler(Box::new(Counter { hits: Arc::clone(&hits) }));

    let mut map = BTreeMap::new();
    map.insert("name", "wty");
    map.insert("age", "aa");

    lkit::info!("sss");
    lkit::error!("sss id {},name {} ，map {}", 1, "wty", Arg::debug(&map));

    let entries = read_entries(temp_dir.path())?;
    ensure!(entries[0].is_empty(), "log file must start with a newline");
    ensure!(entries[1].starts_with("ACORN [INFO] "), "unexpected info entry: {}", entries[1]);
    ensure!(entries[1].contains("test_logkit.rs:"), "info entry lacks call site: {}", entries[1]);
    ensure!(entries[1].ends_with(" : sss"), "unexpected info entry: {}", entries[1]);
    ensure!(entries[2].starts_with("ACORN [ERROR] "), "unexpected error entry: {}", entries[2]);
    ensure!(
        entries[2].ends_with(r#"sss id 1,name wty ，map {"age": "aa", "name": "wty"}"#),
        "unexpected error entry: {}",
        entries[2]
    );
    let stack = &entries[3..];
    ensure!(!stack.is_empty(), "error entry has no stack lines");
    ensure!(stack.iter().all(|line| line.starts_with("   ")), "stack lines must be indented");
    println!("error entry carried {} stack lines", stack.len());

    lkit::log().set_level(Level::Trace);
    lkit::warn!("hidden by trace threshold");
    lkit::trace!("trace passes {}", 2.5);

    let entries = read_entries(temp_dir.path())?;
    ensure!(
        !entries.iter().any(|line| line.contains("hidden by trace threshold")),
        "warn record leaked through a trace threshold"
    );
    ensure!(
        entries.last().is_some_and(|line| line.ends_with(" : trace passes 2.5")),
        "trace record missing"
    );

    lkit::init_log_bridge()?;
    log::trace!("from the facade {}", 7);
    log::info!("facade info is gated");

    let entries = read_entries(temp_dir.path())?;
    ensure!(
        entries.last().is_some_and(|line| line.starts_with("ACORN [TRACE] ") && line.ends_with(" : from the facade 7")),
        "facade record missing"
    );
    ensure!(!entries.iter().any(|line| line.contains("facade info is gated")), "facade record ignored the threshold");

    ensure!(hits.load(Ordering::SeqCst) == 4, "counter saw {} records", hits.load(Ordering::SeqCst));
    ensure!(lkit::with_default(|mgr| mgr.handler_names() == ["console", "counter", "file"]));

    println!("all logkit checks passed");
    temp_dir.close().context("Failed to clean up temporary directory")?;
    Ok(())
}
