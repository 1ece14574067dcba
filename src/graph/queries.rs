//! Read-only derivations over the relation graph.

use serde::Serialize;
use std::collections::{BTreeSet, VecDeque};

use crate::errors::Result;
use crate::models::{Document, WorkStatus, WorkUnit};

/// A unit holding up others, with everything it transitively blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bottleneck {
    pub id: String,
    pub status: WorkStatus,
    pub blocked: Vec<String>,
}

/// Every unit reachable from `id` over `blocks` edges, sorted, excluding `id`.
pub fn impact(doc: &Document, id: &str) -> Result<Vec<String>> {
    doc.get(id)?;
    Ok(transitively_blocked(doc, id))
}

fn transitively_blocked(doc: &Document, id: &str) -> Vec<String> {
    let mut reached = BTreeSet::new();
    let mut queue: VecDeque<&str> = VecDeque::from([id]);

    while let Some(current) = queue.pop_front() {
        let Some(unit) = doc.work_units.get(current) else {
            continue;
        };
        for next in &unit.blocks {
            if next != id && reached.insert(next.clone()) {
                queue.push_back(next);
            }
        }
    }

    reached.into_iter().collect()
}

/// Unfinished units that block at least one other, largest impact first.
pub fn bottlenecks(doc: &Document) -> Vec<Bottleneck> {
    let mut found: Vec<Bottleneck> = doc
        .work_units
        .values()
        .filter(|unit| unit.status != WorkStatus::Done && !unit.blocks.is_empty())
        .map(|unit| Bottleneck {
            id: unit.id.clone(),
            status: unit.status,
            blocked: transitively_blocked(doc, &unit.id),
        })
        .collect();

    found.sort_by(|a, b| {
        b.blocked
            .len()
            .cmp(&a.blocked.len())
            .then_with(|| a.id.cmp(&b.id))
    });
    found
}

/// Unfinished units with no parent, no children and no relations.
pub fn orphans(doc: &Document) -> Vec<&WorkUnit> {
    doc.work_units
        .values()
        .filter(|unit| {
            unit.status != WorkStatus::Done
                && unit.parent.is_none()
                && unit.children.is_empty()
                && !unit.has_relations()
        })
        .collect()
}
