//! Work unit lifecycle commands.
//!
//! Commands:
//! - `specflow create <prefix> <title>` - Create a unit in the backlog
//! - `specflow show <id>` - Show one unit
//! - `specflow list [--status <status>]` - List units by column
//! - `specflow delete <id>` - Delete a childless unit
//! - `specflow parent <id> [<parent> | --clear]` - Move a unit in the hierarchy
//! - `specflow link <id> <feature> [--remove]` - Link a feature file
//! - `specflow estimate <id> <points>` - Set the estimate

use anyhow::{Context, Result};
use colored::Colorize;

use crate::commands::common::{colored_status, truncate_for_display};
use crate::fs::Workspace;
use crate::graph;
use crate::models::{NewWorkUnit, WorkStatus, WorkUnit, WorkUnitType};

pub fn create(
    workspace: &Workspace,
    prefix: String,
    title: String,
    unit_type: WorkUnitType,
    description: Option<String>,
    parent: Option<String>,
) -> Result<()> {
    let new = NewWorkUnit {
        title,
        unit_type,
        description,
        parent,
    };
    let id = workspace.transaction(|doc, _| doc.create_work_unit(&prefix, new))?;

    println!(
        "{} Created {} in {}",
        "✓".green(),
        id.cyan().bold(),
        colored_status(WorkStatus::Backlog)
    );
    Ok(())
}

pub fn show(workspace: &Workspace, id: String, json: bool) -> Result<()> {
    let doc = workspace.snapshot()?;
    let unit = doc.get(&id)?;

    if json {
        let rendered = serde_json::to_string_pretty(unit).context("Failed to serialize work unit")?;
        println!("{rendered}");
        return Ok(());
    }

    print_unit(unit);
    Ok(())
}

fn print_unit(unit: &WorkUnit) {
    println!("{} {}", unit.id.cyan().bold(), unit.title.bold());
    println!("  {:10} {}", "Type:".dimmed(), unit.unit_type);
    println!("  {:10} {}", "Status:".dimmed(), colored_status(unit.status));
    if let Some(reason) = &unit.blocked_reason {
        println!("  {:10} {}", "Reason:".dimmed(), reason.red());
    }
    if let Some(estimate) = unit.estimate {
        println!("  {:10} {estimate}", "Estimate:".dimmed());
    }
    if let Some(parent) = &unit.parent {
        println!("  {:10} {parent}", "Parent:".dimmed());
    }
    if let Some(description) = &unit.description {
        println!();
        println!("  {description}");
    }

    let lists = [
        ("Children", &unit.children),
        ("Blocks", &unit.blocks),
        ("Blocked by", &unit.blocked_by),
        ("Depends on", &unit.depends_on),
        ("Relates to", &unit.relates_to),
        ("Features", &unit.linked_features),
    ];
    for (label, ids) in lists.iter().filter(|(_, ids)| !ids.is_empty()) {
        println!("  {:10} {}", format!("{label}:").dimmed(), ids.join(", "));
    }

    let questions: Vec<_> = unit.questions.iter().filter(|q| !q.deleted).collect();
    if !questions.is_empty() {
        println!();
        println!("  {}", "Questions".bold());
        for q in questions {
            let mark = if q.selected { "✓".green() } else { "?".yellow() };
            println!("    {mark} #{} {}", q.id, q.text);
            if let Some(answer) = &q.answer {
                println!("        {} {answer}", "→".dimmed());
            }
        }
    }
    for (label, entries) in [("Rules", &unit.rules), ("Examples", &unit.examples)] {
        let live: Vec<_> = entries.iter().filter(|e| !e.deleted).collect();
        if live.is_empty() {
            continue;
        }
        println!();
        println!("  {}", label.bold());
        for entry in live {
            println!("    #{} {}", entry.id, entry.text);
        }
    }

    println!();
    println!("  {}", "History".bold());
    for entry in &unit.state_history {
        let reason = entry
            .reason
            .as_deref()
            .map(|r| format!(" ({r})"))
            .unwrap_or_default();
        println!(
            "    {} {}{}",
            entry.timestamp.format("%Y-%m-%d %H:%M").to_string().dimmed(),
            colored_status(entry.state),
            reason.dimmed()
        );
    }
}

pub fn list(workspace: &Workspace, status: Option<WorkStatus>) -> Result<()> {
    let doc = workspace.snapshot()?;
    let statuses: Vec<WorkStatus> = match status {
        Some(status) => vec![status],
        None => WorkStatus::ALL.to_vec(),
    };

    let mut printed = false;
    for status in statuses {
        let units = doc.units_in(status);
        if units.is_empty() {
            continue;
        }
        printed = true;
        println!("{} ({})", colored_status(status).bold(), units.len());
        for (index, unit) in units.iter().enumerate() {
            println!(
                "  {:>3}. {:10} {}",
                index + 1,
                unit.id.cyan(),
                truncate_for_display(&unit.title, 60)
            );
        }
    }

    if !printed {
        println!("{} No work units", "ℹ".blue());
    }
    Ok(())
}

pub fn delete(workspace: &Workspace, id: String) -> Result<()> {
    workspace.transaction(|doc, _| doc.delete_work_unit(&id))?;
    println!("{} Deleted {}", "✓".green(), id.cyan());
    Ok(())
}

pub fn parent(workspace: &Workspace, id: String, parent: Option<String>) -> Result<()> {
    workspace.transaction(|doc, _| graph::set_parent(doc, &id, parent.as_deref()))?;
    match parent {
        Some(parent) => println!("{} {} is now under {}", "✓".green(), id.cyan(), parent.cyan()),
        None => println!("{} {} detached from its parent", "✓".green(), id.cyan()),
    }
    Ok(())
}

pub fn link(workspace: &Workspace, id: String, feature: String, remove: bool) -> Result<()> {
    let changed = workspace.transaction(|doc, _| {
        let unit = doc.get_mut(&id)?;
        Ok(if remove {
            unit.unlink_feature(&feature)
        } else {
            unit.link_feature(feature.clone())
        })
    })?;

    let verb = if remove { "Unlinked" } else { "Linked" };
    if changed {
        println!("{} {verb} {} on {}", "✓".green(), feature.cyan(), id.cyan());
    } else {
        println!("{} Nothing to do for {} on {}", "ℹ".blue(), feature, id);
    }
    Ok(())
}

pub fn estimate(workspace: &Workspace, id: String, points: u32) -> Result<()> {
    workspace.transaction(|doc, _| {
        let unit = doc.get_mut(&id)?;
        unit.estimate = Some(points);
        unit.touch();
        Ok(())
    })?;
    println!("{} {} estimated at {points}", "✓".green(), id.cyan());
    Ok(())
}
