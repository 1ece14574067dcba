//! Relationship graph between work units
//!
//! Owns the pairing rules for every relation kind so callers never edit one
//! side of an edge by hand:
//! - `blocks`/`blockedBy` are paired, acyclic, and force the target into
//!   `blocked` when added
//! - `dependsOn` is a one-way soft hint
//! - `relatesTo` is symmetric
//!
//! The parent/child hierarchy lives in [`hierarchy`] and the read-only
//! derivations (bottlenecks, impact, orphans) in [`queries`].

mod cycle;
mod hierarchy;
mod queries;

#[cfg(test)]
mod tests;

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::errors::{Result, WorkflowError};
use crate::models::{Document, WorkStatus, WorkUnit};
use crate::verify::transitions::apply_transition;

pub use cycle::{blocks_path, find_blocks_cycle};
pub use hierarchy::{depth_of, set_parent, MAX_DEPTH};
pub use queries::{bottlenecks, impact, orphans, Bottleneck};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationKind {
    Blocks,
    BlockedBy,
    DependsOn,
    RelatesTo,
}

impl RelationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Blocks => "blocks",
            RelationKind::BlockedBy => "blockedBy",
            RelationKind::DependsOn => "dependsOn",
            RelationKind::RelatesTo => "relatesTo",
        }
    }

    /// `blockedBy` is stored as the inverse `blocks` edge.
    fn normalize<'a>(self, from: &'a str, to: &'a str) -> (RelationKind, &'a str, &'a str) {
        match self {
            RelationKind::BlockedBy => (RelationKind::Blocks, to, from),
            kind => (kind, from, to),
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "blocks" => Ok(RelationKind::Blocks),
            "blockedBy" | "blocked-by" | "blocked_by" => Ok(RelationKind::BlockedBy),
            "dependsOn" | "depends-on" | "depends_on" => Ok(RelationKind::DependsOn),
            "relatesTo" | "relates-to" | "relates_to" => Ok(RelationKind::RelatesTo),
            _ => Err(format!(
                "Unknown relation '{s}': expected blocks, blockedBy, dependsOn or relatesTo"
            )),
        }
    }
}

/// Result of adding an edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationOutcome {
    pub from: String,
    pub to: String,
    pub kind: RelationKind,
    /// Unit moved to `blocked` as a side effect of a new `blocks` edge.
    pub implicitly_blocked: Option<String>,
}

/// All relation lists of one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependencies {
    pub id: String,
    pub parent: Option<String>,
    pub children: Vec<String>,
    pub blocks: Vec<String>,
    pub blocked_by: Vec<String>,
    pub depends_on: Vec<String>,
    pub relates_to: Vec<String>,
}

fn edges(unit: &WorkUnit, kind: RelationKind) -> &Vec<String> {
    match kind {
        RelationKind::Blocks => &unit.blocks,
        RelationKind::BlockedBy => &unit.blocked_by,
        RelationKind::DependsOn => &unit.depends_on,
        RelationKind::RelatesTo => &unit.relates_to,
    }
}

fn edges_mut(unit: &mut WorkUnit, kind: RelationKind) -> &mut Vec<String> {
    match kind {
        RelationKind::Blocks => &mut unit.blocks,
        RelationKind::BlockedBy => &mut unit.blocked_by,
        RelationKind::DependsOn => &mut unit.depends_on,
        RelationKind::RelatesTo => &mut unit.relates_to,
    }
}

/// The list on the target that mirrors `kind`, if the kind is paired.
fn inverse(kind: RelationKind) -> Option<RelationKind> {
    match kind {
        RelationKind::Blocks => Some(RelationKind::BlockedBy),
        RelationKind::BlockedBy => Some(RelationKind::Blocks),
        RelationKind::RelatesTo => Some(RelationKind::RelatesTo),
        RelationKind::DependsOn => None,
    }
}

fn push_edge(doc: &mut Document, owner: &str, kind: RelationKind, other: &str) -> Result<()> {
    let unit = doc.get_mut(owner)?;
    let list = edges_mut(unit, kind);
    if !list.iter().any(|id| id == other) {
        list.push(other.to_string());
        unit.touch();
    }
    Ok(())
}

fn drop_edge(doc: &mut Document, owner: &str, kind: RelationKind, other: &str) -> Result<()> {
    let unit = doc.get_mut(owner)?;
    let list = edges_mut(unit, kind);
    let before = list.len();
    list.retain(|id| id != other);
    if list.len() != before {
        unit.touch();
    }
    Ok(())
}

/// Add a relation edge, maintaining its inverse.
///
/// A new `blocks` edge moves a target that is neither `done` nor already
/// `blocked` into `blocked`, with a reason naming the blocker.
///
/// # Errors
/// `SelfReference`, `NotFound`, `AlreadyExists`, or `CircularDependency`
/// with the offending path when the edge would close a `blocks` cycle.
pub fn add_relation(
    doc: &mut Document,
    from: &str,
    to: &str,
    kind: RelationKind,
) -> Result<RelationOutcome> {
    if from == to {
        return Err(WorkflowError::SelfReference {
            id: from.to_string(),
        });
    }
    doc.get(from)?;
    doc.get(to)?;

    let (kind, from, to) = kind.normalize(from, to);

    if edges(doc.get(from)?, kind).iter().any(|id| id == to) {
        return Err(WorkflowError::AlreadyExists {
            from: from.to_string(),
            to: to.to_string(),
            relation: kind.to_string(),
        });
    }

    if kind == RelationKind::Blocks {
        // The new edge closes a cycle iff `to` already reaches `from`
        if let Some(mut path) = blocks_path(doc, to, from) {
            path.insert(0, from.to_string());
            return Err(WorkflowError::CircularDependency { path });
        }
    }

    push_edge(doc, from, kind, to)?;
    if let Some(inverse) = inverse(kind) {
        push_edge(doc, to, inverse, from)?;
    }

    let mut implicitly_blocked = None;
    if kind == RelationKind::Blocks {
        let status = doc.get(to)?.status;
        if status != WorkStatus::Done && status != WorkStatus::Blocked {
            apply_transition(doc, to, WorkStatus::Blocked, Some(format!("Blocked by {from}")))?;
            tracing::info!(work_unit = %to, blocker = %from, "implicitly blocked work unit");
            implicitly_blocked = Some(to.to_string());
        }
    }

    tracing::info!(%from, %to, relation = %kind, "added relation");
    Ok(RelationOutcome {
        from: from.to_string(),
        to: to.to_string(),
        kind,
        implicitly_blocked,
    })
}

/// Remove a relation edge and its inverse.
///
/// Removing a `blocks` edge never unblocks the target; that is an explicit
/// transition.
pub fn remove_relation(doc: &mut Document, from: &str, to: &str, kind: RelationKind) -> Result<()> {
    doc.get(from)?;
    doc.get(to)?;

    let (kind, from, to) = kind.normalize(from, to);

    if !edges(doc.get(from)?, kind).iter().any(|id| id == to) {
        return Err(WorkflowError::RelationNotFound {
            from: from.to_string(),
            to: to.to_string(),
            relation: kind.to_string(),
        });
    }

    drop_edge(doc, from, kind, to)?;
    if let Some(inverse) = inverse(kind) {
        drop_edge(doc, to, inverse, from)?;
    }

    tracing::info!(%from, %to, relation = %kind, "removed relation");
    Ok(())
}

pub fn dependencies(doc: &Document, id: &str) -> Result<Dependencies> {
    let unit = doc.get(id)?;
    Ok(Dependencies {
        id: unit.id.clone(),
        parent: unit.parent.clone(),
        children: unit.children.clone(),
        blocks: unit.blocks.clone(),
        blocked_by: unit.blocked_by.clone(),
        depends_on: unit.depends_on.clone(),
        relates_to: unit.relates_to.clone(),
    })
}
