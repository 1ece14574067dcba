//! `specflow status <id> <status> [--reason <text>]`

use anyhow::Result;
use colored::Colorize;

use crate::commands::common::{colored_status, print_warnings};
use crate::fs::Workspace;
use crate::models::WorkStatus;
use crate::verify::transition_work_unit;

pub fn execute(
    workspace: &Workspace,
    id: String,
    status: WorkStatus,
    reason: Option<String>,
) -> Result<()> {
    let outcome = workspace.transaction(|doc, artifacts| {
        transition_work_unit(doc, &id, status, reason.as_deref(), artifacts)
    })?;

    if outcome.is_noop() {
        println!(
            "{} {} already {}",
            "ℹ".blue(),
            outcome.id.cyan(),
            colored_status(outcome.to)
        );
    } else {
        println!(
            "{} {} {} → {}",
            "✓".green(),
            outcome.id.cyan().bold(),
            colored_status(outcome.from),
            colored_status(outcome.to)
        );
    }
    print_warnings(&outcome.warnings);
    Ok(())
}
