//! Relationship commands.
//!
//! Commands:
//! - `specflow dep add <from> <kind> <to>`
//! - `specflow dep remove <from> <kind> <to>`
//! - `specflow dep show <id>`
//! - `specflow bottlenecks`
//! - `specflow orphans`

use anyhow::Result;
use colored::Colorize;

use crate::commands::common::{colored_status, truncate_for_display};
use crate::fs::Workspace;
use crate::graph::{self, RelationKind};

pub fn add(workspace: &Workspace, from: String, kind: RelationKind, to: String) -> Result<()> {
    let outcome = workspace.transaction(|doc, _| graph::add_relation(doc, &from, &to, kind))?;

    println!(
        "{} {} {} {}",
        "✓".green(),
        outcome.from.cyan(),
        outcome.kind,
        outcome.to.cyan()
    );
    if let Some(blocked) = outcome.implicitly_blocked {
        println!(
            "  {} {} moved to {}",
            "→".dimmed(),
            blocked.cyan(),
            colored_status(crate::models::WorkStatus::Blocked)
        );
    }
    Ok(())
}

pub fn remove(workspace: &Workspace, from: String, kind: RelationKind, to: String) -> Result<()> {
    workspace.transaction(|doc, _| graph::remove_relation(doc, &from, &to, kind))?;
    println!("{} Removed {} {} {}", "✓".green(), from.cyan(), kind, to.cyan());
    Ok(())
}

pub fn show(workspace: &Workspace, id: String) -> Result<()> {
    let doc = workspace.snapshot()?;
    let deps = graph::dependencies(&doc, &id)?;

    println!("{}", deps.id.cyan().bold());
    let parent: Vec<String> = deps.parent.into_iter().collect();
    let rows = [
        ("parent", &parent),
        ("children", &deps.children),
        ("blocks", &deps.blocks),
        ("blockedBy", &deps.blocked_by),
        ("dependsOn", &deps.depends_on),
        ("relatesTo", &deps.relates_to),
    ];
    for (label, ids) in rows {
        let value = if ids.is_empty() {
            "-".dimmed().to_string()
        } else {
            ids.join(", ")
        };
        println!("  {:10} {value}", label.dimmed());
    }
    Ok(())
}

pub fn bottlenecks(workspace: &Workspace) -> Result<()> {
    let doc = workspace.snapshot()?;
    let found = graph::bottlenecks(&doc);

    if found.is_empty() {
        println!("{} No bottlenecks", "✓".green());
        return Ok(());
    }

    println!(
        "{:10} {:12} {:>6}  {}",
        "ID".bold(),
        "STATUS".bold(),
        "BLOCKS".bold(),
        "UNITS".bold()
    );
    for b in found {
        println!(
            "{:10} {:12} {:>6}  {}",
            b.id.cyan(),
            colored_status(b.status),
            b.blocked.len(),
            truncate_for_display(&b.blocked.join(", "), 60)
        );
    }
    Ok(())
}

pub fn orphans(workspace: &Workspace) -> Result<()> {
    let doc = workspace.snapshot()?;
    let found = graph::orphans(&doc);

    if found.is_empty() {
        println!("{} No orphaned work units", "✓".green());
        return Ok(());
    }

    for unit in found {
        println!(
            "{:10} {:12} {}",
            unit.id.cyan(),
            colored_status(unit.status),
            truncate_for_display(&unit.title, 60)
        );
    }
    Ok(())
}
