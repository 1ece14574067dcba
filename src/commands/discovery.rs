//! Discovery artifact commands: questions, rules and examples.
//!
//! Removal is a soft delete, so `restore` brings an entry back under the
//! same number.

use anyhow::Result;
use colored::Colorize;

use crate::errors::Result as CoreResult;
use crate::fs::Workspace;
use crate::models::WorkUnit;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Question,
    Rule,
    Example,
}

impl ArtifactKind {
    fn label(&self) -> &'static str {
        match self {
            ArtifactKind::Question => "question",
            ArtifactKind::Rule => "rule",
            ArtifactKind::Example => "example",
        }
    }

    fn add(&self, unit: &mut WorkUnit, text: String) -> u32 {
        match self {
            ArtifactKind::Question => unit.add_question(text),
            ArtifactKind::Rule => unit.add_rule(text),
            ArtifactKind::Example => unit.add_example(text),
        }
    }

    fn set_deleted(&self, unit: &mut WorkUnit, item: u32, deleted: bool) -> CoreResult<()> {
        match (self, deleted) {
            (ArtifactKind::Question, true) => unit.remove_question(item),
            (ArtifactKind::Question, false) => unit.restore_question(item),
            (ArtifactKind::Rule, true) => unit.remove_rule(item),
            (ArtifactKind::Rule, false) => unit.restore_rule(item),
            (ArtifactKind::Example, true) => unit.remove_example(item),
            (ArtifactKind::Example, false) => unit.restore_example(item),
        }
    }
}

pub fn add(workspace: &Workspace, kind: ArtifactKind, id: String, text: String) -> Result<()> {
    let item = workspace.transaction(|doc, _| Ok(kind.add(doc.get_mut(&id)?, text)))?;
    println!("{} Added {} #{} to {}", "✓".green(), kind.label(), item, id.cyan());
    Ok(())
}

pub fn remove(workspace: &Workspace, kind: ArtifactKind, id: String, item: u32) -> Result<()> {
    workspace.transaction(|doc, _| kind.set_deleted(doc.get_mut(&id)?, item, true))?;
    println!("{} Removed {} #{} from {}", "✓".green(), kind.label(), item, id.cyan());
    Ok(())
}

pub fn restore(workspace: &Workspace, kind: ArtifactKind, id: String, item: u32) -> Result<()> {
    workspace.transaction(|doc, _| kind.set_deleted(doc.get_mut(&id)?, item, false))?;
    println!("{} Restored {} #{} on {}", "✓".green(), kind.label(), item, id.cyan());
    Ok(())
}

pub fn answer(
    workspace: &Workspace,
    id: String,
    question: u32,
    answer: String,
    add_rule: bool,
) -> Result<()> {
    let rule = workspace
        .transaction(|doc, _| doc.get_mut(&id)?.answer_question(question, answer, add_rule))?;

    println!("{} Answered question #{} on {}", "✓".green(), question, id.cyan());
    if let Some(rule) = rule {
        println!("  {} recorded as rule #{rule}", "→".dimmed());
    }
    Ok(())
}
