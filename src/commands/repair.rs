//! Document integrity commands
//!
//! - `specflow validate` reports every consistency problem without writing
//! - `specflow repair` applies the safe fixes (missing inverse edges, parent
//!   back references, the state index) and lists what still needs a human

use anyhow::{bail, Result};
use colored::Colorize;

use crate::fs::Workspace;
use crate::verify::{self, Issue};

fn print_issue(issue: &Issue) {
    let (icon, tag) = if issue.repairable {
        ("!".yellow().bold(), "REPAIRABLE".yellow().bold())
    } else {
        ("✗".red().bold(), "MANUAL".red().bold())
    };
    println!("{} {} {} [{}]", icon, issue.id.cyan(), issue.message, tag);
}

fn print_header(title: &str) {
    println!("{}", title.bold());
    println!("{}", "─".repeat(40).dimmed());
}

/// Execute `specflow validate`; fails when any issue is found.
pub fn validate(workspace: &Workspace) -> Result<()> {
    let doc = workspace.snapshot()?;
    let report = verify::validate(&doc);

    if report.is_valid() {
        println!(
            "{} {} work units, no issues found",
            "✓".green().bold(),
            doc.work_units.len()
        );
        return Ok(());
    }

    print_header("Issues Detected");
    for issue in &report.issues {
        print_issue(issue);
    }
    println!();

    let repairable = report.repairable().count();
    if repairable > 0 {
        println!(
            "{} {} issue(s) can be fixed automatically. Run {}.",
            "→".blue().bold(),
            repairable,
            "specflow repair".cyan()
        );
    }
    bail!("{} integrity issue(s) found", report.issues.len())
}

/// Execute `specflow repair`.
pub fn repair(workspace: &Workspace) -> Result<()> {
    let report = workspace.transaction(|doc, _| Ok(verify::repair(doc)))?;

    if report.changed() {
        print_header("Applied Fixes");
        for fix in &report.fixes {
            println!("{} {}", "✓".green(), fix);
        }
        println!();
    }

    if report.remaining.is_empty() {
        if !report.changed() {
            println!("{} No issues found - document is consistent", "✓".green().bold());
        }
        return Ok(());
    }

    print_header("Needs Manual Resolution");
    for issue in &report.remaining {
        print_issue(issue);
    }
    println!();
    println!(
        "  Fixed: {}  Remaining: {}",
        report.fixes.len().to_string().green().bold(),
        report.remaining.len().to_string().red().bold()
    );
    bail!("{} issue(s) need manual resolution", report.remaining.len())
}
