//! Document integrity validation and repair
//!
//! `validate` reports every structural problem without touching the
//! document. `repair` applies only the fixes that cannot lose intent:
//! - adding a missing inverse edge (`blocks`/`blockedBy`, `relatesTo`)
//! - restoring a missing parent/child back reference
//! - rebuilding the `states` index from unit statuses
//!
//! Dangling references, conflicting parents, cycles, blocked-reason
//! mismatches and depth violations are left for a human.

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::graph::{find_blocks_cycle, MAX_DEPTH};
use crate::models::{Document, WorkStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IssueKind {
    DanglingReference,
    MissingInverse,
    AsymmetricRelation,
    MissingChild,
    MissingParent,
    ConflictingParents,
    BlocksCycle,
    ParentCycle,
    StateIndexMismatch,
    BlockedReasonMismatch,
    DepthExceeded,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IssueKind::DanglingReference => "dangling reference",
            IssueKind::MissingInverse => "missing inverse",
            IssueKind::AsymmetricRelation => "asymmetric relation",
            IssueKind::MissingChild => "missing child",
            IssueKind::MissingParent => "missing parent",
            IssueKind::ConflictingParents => "conflicting parents",
            IssueKind::BlocksCycle => "blocks cycle",
            IssueKind::ParentCycle => "parent cycle",
            IssueKind::StateIndexMismatch => "state index",
            IssueKind::BlockedReasonMismatch => "blocked reason",
            IssueKind::DepthExceeded => "depth exceeded",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub kind: IssueKind,
    pub id: String,
    pub message: String,
    /// Whether `repair` can fix this without human judgement.
    pub repairable: bool,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.id, self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn repairable(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.repairable)
    }

    pub fn manual(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| !i.repairable)
    }

    fn push(&mut self, kind: IssueKind, id: &str, message: String, repairable: bool) {
        self.issues.push(Issue {
            kind,
            id: id.to_string(),
            message,
            repairable,
        });
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepairReport {
    /// One line per applied fix.
    pub fixes: Vec<String>,
    /// Problems that still need manual resolution.
    pub remaining: Vec<Issue>,
}

impl RepairReport {
    pub fn changed(&self) -> bool {
        !self.fixes.is_empty()
    }
}

/// Check every structural invariant of the document.
pub fn validate(doc: &Document) -> ValidationReport {
    let mut report = ValidationReport::default();
    check_references(doc, &mut report);
    check_hierarchy(doc, &mut report);
    check_relations(doc, &mut report);
    check_state_index(doc, &mut report);
    check_blocked_reasons(doc, &mut report);

    if let Some(cycle) = find_blocks_cycle(doc) {
        let id = cycle.first().cloned().unwrap_or_default();
        report.push(
            IssueKind::BlocksCycle,
            &id,
            format!("blocks cycle: {}", cycle.join(" -> ")),
            false,
        );
    }

    report
}

fn check_references(doc: &Document, report: &mut ValidationReport) {
    for unit in doc.work_units.values() {
        for target in unit.referenced_ids() {
            if !doc.contains(target) {
                report.push(
                    IssueKind::DanglingReference,
                    &unit.id,
                    format!("references missing unit {target}"),
                    false,
                );
            }
        }
    }
}

/// Units listing `child` among their children.
fn claimants<'a>(doc: &'a Document, child: &str) -> Vec<&'a str> {
    doc.work_units
        .values()
        .filter(|u| u.children.iter().any(|c| c == child))
        .map(|u| u.id.as_str())
        .collect()
}

fn check_hierarchy(doc: &Document, report: &mut ValidationReport) {
    for unit in doc.work_units.values() {
        if let Some(parent) = unit.parent.as_deref().and_then(|p| doc.work_units.get(p)) {
            if !parent.children.contains(&unit.id) {
                report.push(
                    IssueKind::MissingChild,
                    &parent.id,
                    format!("{} names it as parent but is not in its children", unit.id),
                    true,
                );
            }
        }

        let claims = claimants(doc, &unit.id);
        match (&unit.parent, claims.as_slice()) {
            (None, [only]) => report.push(
                IssueKind::MissingParent,
                &unit.id,
                format!("listed as a child of {only} but has no parent"),
                true,
            ),
            (None, []) => {}
            (None, many) => report.push(
                IssueKind::ConflictingParents,
                &unit.id,
                format!("claimed as a child by {}", many.join(", ")),
                false,
            ),
            (Some(parent), claims) => {
                let others: Vec<&str> = claims
                    .iter()
                    .copied()
                    .filter(|c| *c != parent.as_str())
                    .collect();
                if !others.is_empty() {
                    report.push(
                        IssueKind::ConflictingParents,
                        &unit.id,
                        format!("parent is {parent} but also claimed by {}", others.join(", ")),
                        false,
                    );
                }
            }
        }

        let mut seen = HashSet::new();
        let mut depth = 0;
        let mut current = Some(unit.id.as_str());
        while let Some(id) = current {
            if !seen.insert(id) {
                report.push(
                    IssueKind::ParentCycle,
                    &unit.id,
                    format!("parent chain loops back to {id}"),
                    false,
                );
                break;
            }
            depth += 1;
            current = doc.work_units.get(id).and_then(|u| u.parent.as_deref());
        }
        if depth > MAX_DEPTH && unit.children.is_empty() {
            report.push(
                IssueKind::DepthExceeded,
                &unit.id,
                format!("nested {depth} levels deep (max {MAX_DEPTH})"),
                false,
            );
        }
    }
}

fn check_relations(doc: &Document, report: &mut ValidationReport) {
    for unit in doc.work_units.values() {
        for target in &unit.blocks {
            if let Some(other) = doc.work_units.get(target) {
                if !other.blocked_by.contains(&unit.id) {
                    report.push(
                        IssueKind::MissingInverse,
                        target,
                        format!("blockedBy is missing {}", unit.id),
                        true,
                    );
                }
            }
        }
        for blocker in &unit.blocked_by {
            if let Some(other) = doc.work_units.get(blocker) {
                if !other.blocks.contains(&unit.id) {
                    report.push(
                        IssueKind::MissingInverse,
                        blocker,
                        format!("blocks is missing {}", unit.id),
                        true,
                    );
                }
            }
        }
        for related in &unit.relates_to {
            if let Some(other) = doc.work_units.get(related) {
                if !other.relates_to.contains(&unit.id) {
                    report.push(
                        IssueKind::AsymmetricRelation,
                        related,
                        format!("{} relatesTo it but not the other way round", unit.id),
                        true,
                    );
                }
            }
        }
    }
}

fn check_state_index(doc: &Document, report: &mut ValidationReport) {
    for unit in doc.work_units.values() {
        let listed = doc.states.statuses_of(&unit.id);
        let count = doc
            .states
            .column(unit.status)
            .iter()
            .filter(|i| **i == unit.id)
            .count();
        if listed != [unit.status] || count != 1 {
            let found = if listed.is_empty() {
                "no column".to_string()
            } else {
                listed.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
            };
            report.push(
                IssueKind::StateIndexMismatch,
                &unit.id,
                format!("status is {} but listed in {found}", unit.status),
                true,
            );
        }
    }

    for (status, ids) in doc.states.columns() {
        for id in ids.iter().filter(|id| !doc.contains(id)) {
            report.push(
                IssueKind::StateIndexMismatch,
                id,
                format!("listed in {status} but no such unit exists"),
                true,
            );
        }
    }
}

fn check_blocked_reasons(doc: &Document, report: &mut ValidationReport) {
    for unit in doc.work_units.values() {
        let has_reason = unit
            .blocked_reason
            .as_deref()
            .is_some_and(|r| !r.trim().is_empty());
        let blocked = unit.status == WorkStatus::Blocked;
        if blocked && !has_reason {
            report.push(
                IssueKind::BlockedReasonMismatch,
                &unit.id,
                "blocked without a reason".to_string(),
                false,
            );
        } else if !blocked && unit.blocked_reason.is_some() {
            report.push(
                IssueKind::BlockedReasonMismatch,
                &unit.id,
                format!("has a blocked reason while {}", unit.status),
                false,
            );
        }
    }
}

/// Apply the safe fixes and report what is left.
///
/// Never deletes an edge or a unit. Running it twice in a row makes no
/// further changes the second time.
pub fn repair(doc: &mut Document) -> RepairReport {
    let mut fixes = Vec::new();
    repair_relations(doc, &mut fixes);
    repair_hierarchy(doc, &mut fixes);
    repair_state_index(doc, &mut fixes);

    for fix in &fixes {
        tracing::info!(fix = %fix, "repaired document");
    }

    let remaining = validate(doc).issues;
    RepairReport { fixes, remaining }
}

/// Which list on the owner receives the missing id.
enum Edge {
    Blocks,
    BlockedBy,
    RelatesTo,
}

fn repair_relations(doc: &mut Document, fixes: &mut Vec<String>) {
    let mut missing: Vec<(String, Edge, String)> = Vec::new();
    for unit in doc.work_units.values() {
        for target in &unit.blocks {
            if doc
                .work_units
                .get(target)
                .is_some_and(|o| !o.blocked_by.contains(&unit.id))
            {
                missing.push((target.clone(), Edge::BlockedBy, unit.id.clone()));
            }
        }
        for blocker in &unit.blocked_by {
            if doc
                .work_units
                .get(blocker)
                .is_some_and(|o| !o.blocks.contains(&unit.id))
            {
                missing.push((blocker.clone(), Edge::Blocks, unit.id.clone()));
            }
        }
        for related in &unit.relates_to {
            if doc
                .work_units
                .get(related)
                .is_some_and(|o| !o.relates_to.contains(&unit.id))
            {
                missing.push((related.clone(), Edge::RelatesTo, unit.id.clone()));
            }
        }
    }

    for (owner, edge, other) in missing {
        let Some(unit) = doc.work_units.get_mut(&owner) else {
            continue;
        };
        let (list, name) = match edge {
            Edge::Blocks => (&mut unit.blocks, "blocks"),
            Edge::BlockedBy => (&mut unit.blocked_by, "blockedBy"),
            Edge::RelatesTo => (&mut unit.relates_to, "relatesTo"),
        };
        if !list.contains(&other) {
            list.push(other.clone());
            unit.touch();
            fixes.push(format!("added {other} to {owner}.{name}"));
        }
    }
}

fn repair_hierarchy(doc: &mut Document, fixes: &mut Vec<String>) {
    let mut add_children: Vec<(String, String)> = Vec::new();
    let mut set_parents: Vec<(String, String)> = Vec::new();

    for unit in doc.work_units.values() {
        if let Some(parent) = unit.parent.as_deref().and_then(|p| doc.work_units.get(p)) {
            if !parent.children.contains(&unit.id) {
                add_children.push((parent.id.clone(), unit.id.clone()));
            }
        }
        if unit.parent.is_none() {
            if let [only] = claimants(doc, &unit.id).as_slice() {
                set_parents.push((unit.id.clone(), only.to_string()));
            }
        }
    }

    for (parent, child) in add_children {
        if let Some(unit) = doc.work_units.get_mut(&parent) {
            unit.children.push(child.clone());
            unit.touch();
            fixes.push(format!("added {child} to {parent}.children"));
        }
    }
    for (child, parent) in set_parents {
        if let Some(unit) = doc.work_units.get_mut(&child) {
            unit.parent = Some(parent.clone());
            unit.touch();
            fixes.push(format!("set {child}.parent to {parent}"));
        }
    }
}

/// Keep each column's existing order for ids that belong there, then append
/// any unit that is missing from its column.
fn repair_state_index(doc: &mut Document, fixes: &mut Vec<String>) {
    let statuses: BTreeMap<String, WorkStatus> = doc
        .work_units
        .iter()
        .map(|(id, unit)| (id.clone(), unit.status))
        .collect();

    for status in WorkStatus::ALL {
        let column = doc.states.column_mut(status);
        let mut kept = HashSet::new();
        for id in std::mem::take(column) {
            if statuses.get(&id) == Some(&status) && kept.insert(id.clone()) {
                column.push(id);
            } else {
                fixes.push(format!("removed {id} from {status} column"));
            }
        }
    }

    for (id, status) in &statuses {
        let column = doc.states.column_mut(*status);
        if !column.contains(id) {
            column.push(id.clone());
            fixes.push(format!("added {id} to {status} column"));
        }
    }
}
