//! Manual priority ordering within a status column.
//!
//! Each column in `states` is a priority list with index 0 first. Any column
//! except `done` can be reordered; `done` is ordered by completion history.

use std::fmt;
use std::str::FromStr;

use crate::errors::{Result, WorkflowError};
use crate::models::{Document, WorkStatus};

/// Where to put a unit within its column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    Top,
    Bottom,
    /// Zero-based; clamped to the column length.
    Index(usize),
    Before(String),
    After(String),
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placement::Top => write!(f, "top"),
            Placement::Bottom => write!(f, "bottom"),
            Placement::Index(n) => write!(f, "position {n}"),
            Placement::Before(id) => write!(f, "before {id}"),
            Placement::After(id) => write!(f, "after {id}"),
        }
    }
}

impl FromStr for Placement {
    type Err = String;

    /// Accepts `top`, `bottom`, a number, `before:<id>` or `after:<id>`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "top" => return Ok(Placement::Top),
            "bottom" => return Ok(Placement::Bottom),
            _ => {}
        }
        if let Some(id) = s.strip_prefix("before:") {
            return Ok(Placement::Before(id.to_string()));
        }
        if let Some(id) = s.strip_prefix("after:") {
            return Ok(Placement::After(id.to_string()));
        }
        s.parse::<usize>().map(Placement::Index).map_err(|_| {
            format!("Invalid position '{s}': expected top, bottom, N, before:ID or after:ID")
        })
    }
}

/// Move `id` within its column and return its new index.
///
/// # Errors
/// - `ImmutableColumn` if the unit is `done`
/// - `SelfReference` if the anchor is the unit itself
/// - `CrossColumnReorder` if the anchor sits in another column
/// - `DataIntegrity` if either id is missing from the column its status names
pub fn reorder(doc: &mut Document, id: &str, placement: Placement) -> Result<usize> {
    let status = doc.get(id)?.status;
    if status == WorkStatus::Done {
        return Err(WorkflowError::ImmutableColumn { id: id.to_string() });
    }

    if let Placement::Before(anchor) | Placement::After(anchor) = &placement {
        if anchor == id {
            return Err(WorkflowError::SelfReference { id: id.to_string() });
        }
        let anchor_status = doc.get(anchor)?.status;
        if anchor_status != status {
            return Err(WorkflowError::CrossColumnReorder {
                id: id.to_string(),
                status,
                anchor: anchor.clone(),
                anchor_status,
            });
        }
    }

    let column = doc.states.column_mut(status);
    let current = position(column, id, status)?;
    column.remove(current);

    let index = match &placement {
        Placement::Top => 0,
        Placement::Bottom => column.len(),
        Placement::Index(n) => (*n).min(column.len()),
        Placement::Before(anchor) => position(column, anchor, status)?,
        Placement::After(anchor) => position(column, anchor, status)? + 1,
    };
    column.insert(index, id.to_string());

    tracing::info!(work_unit = %id, %status, %placement, index, "reordered work unit");
    Ok(index)
}

fn position(column: &[String], id: &str, status: WorkStatus) -> Result<usize> {
    column
        .iter()
        .position(|i| i == id)
        .ok_or_else(|| WorkflowError::DataIntegrity {
            message: format!("{id} has status {status} but is missing from the {status} column"),
        })
}
