//! Helpers shared across command implementations.
//!
//! - Project root discovery
//! - Status coloring and warning output
//! - Single-line truncation for tables

use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};
use std::path::{Path, PathBuf};

use crate::config::CONFIG_FILE;
use crate::models::WorkStatus;
use crate::verify::Warning;

/// Resolve the project root.
///
/// An explicit directory wins. Otherwise walk up from the current directory
/// to the first one holding `spec/specflow.toml` or `spec/work-units.json`,
/// falling back to the current directory so a fresh project can start.
pub fn project_root(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }

    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    Ok(find_project_root(&cwd).unwrap_or(cwd))
}

fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| {
            dir.join(CONFIG_FILE).is_file() || dir.join("spec").join("work-units.json").is_file()
        })
        .map(Path::to_path_buf)
}

pub fn colored_status(status: WorkStatus) -> ColoredString {
    let label = status.as_str();
    match status {
        WorkStatus::Backlog => label.dimmed(),
        WorkStatus::Specifying => label.cyan(),
        WorkStatus::Testing => label.magenta(),
        WorkStatus::Implementing => label.blue(),
        WorkStatus::Validating => label.yellow(),
        WorkStatus::Done => label.green(),
        WorkStatus::Blocked => label.red().bold(),
    }
}

pub fn print_warnings(warnings: &[Warning]) {
    for warning in warnings {
        println!("  {} {}", "!".yellow().bold(), warning.to_string().yellow());
    }
}

/// Collapse to one line and cut to `max_len` characters (not bytes).
pub fn truncate_for_display(s: &str, max_len: usize) -> String {
    let single_line = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= max_len {
        return single_line;
    }
    let kept: String = single_line.chars().take(max_len.saturating_sub(1)).collect();
    format!("{kept}…")
}
