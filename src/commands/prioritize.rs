//! `specflow prioritize <id> <top|bottom|N|before:ID|after:ID>`

use anyhow::Result;
use colored::Colorize;

use crate::commands::common::colored_status;
use crate::fs::Workspace;
use crate::prioritize::{reorder, Placement};

pub fn execute(workspace: &Workspace, id: String, placement: Placement) -> Result<()> {
    let (index, status) = workspace.transaction(|doc, _| {
        let index = reorder(doc, &id, placement.clone())?;
        Ok((index, doc.get(&id)?.status))
    })?;

    println!(
        "{} {} is now #{} in {}",
        "✓".green(),
        id.cyan(),
        index + 1,
        colored_status(status)
    );
    Ok(())
}
