//! Work unit state transitions
//!
//! This module handles:
//! - Validating and applying a requested transition
//! - Keeping the unit's state column in step with its status

use crate::artifacts::SpecArtifacts;
use crate::errors::{Result, WorkflowError};
use crate::models::{Document, WorkStatus};

use super::preconditions::{check_done_entry, check_placeholders, check_testing_entry};
use super::warnings::TransitionOutcome;

/// Transition a work unit to a new status with validation
///
/// Checks the transition table, the blocked-reason rule, placeholder markers
/// for forward moves, and the entry gates for `testing` and `done`. On success
/// the unit moves to the end of the target column and a history entry is
/// appended. A self-transition skips the gates but is still recorded.
///
/// # Arguments
/// * `doc` - The document being mutated inside a transaction
/// * `id` - The work unit to move
/// * `target` - The status to move to
/// * `reason` - Required when entering `blocked`; stored in history otherwise
/// * `artifacts` - Scenario, placeholder and coverage lookups
///
/// # Errors
/// Any failed check returns an error and leaves `doc` untouched.
pub fn transition_work_unit(
    doc: &mut Document,
    id: &str,
    target: WorkStatus,
    reason: Option<&str>,
    artifacts: &dyn SpecArtifacts,
) -> Result<TransitionOutcome> {
    let unit = doc.get(id)?;
    let from = unit.status;
    from.try_transition(id, target)?;

    let reason = normalize_reason(reason);
    if target == WorkStatus::Blocked && from != WorkStatus::Blocked && reason.is_none() {
        return Err(WorkflowError::MissingBlockedReason { id: id.to_string() });
    }

    let mut warnings = Vec::new();
    if from != target {
        if from.is_forward_to(&target) {
            check_placeholders(unit, artifacts)?;
        }
        match target {
            WorkStatus::Testing => warnings.extend(check_testing_entry(doc, unit, artifacts)?),
            WorkStatus::Done => warnings.extend(check_done_entry(doc, unit, artifacts)?),
            _ => {}
        }
    }

    apply_transition(doc, id, target, reason)?;

    tracing::info!(work_unit = %id, %from, to = %target, "transitioned work unit");
    for warning in &warnings {
        tracing::warn!(work_unit = %id, %warning, "transition warning");
    }

    Ok(TransitionOutcome {
        id: id.to_string(),
        from,
        to: target,
        warnings,
    })
}

/// Move a unit to `blocked` with the given reason.
pub fn block_work_unit(
    doc: &mut Document,
    id: &str,
    reason: &str,
    artifacts: &dyn SpecArtifacts,
) -> Result<TransitionOutcome> {
    transition_work_unit(doc, id, WorkStatus::Blocked, Some(reason), artifacts)
}

/// Record a transition that has already been validated.
///
/// Confirms the id is listed in exactly the column matching its current
/// status, moves it to the end of the target column, then updates the unit.
/// Reports `DataIntegrity` instead of silently fixing a bad index.
pub(crate) fn apply_transition(
    doc: &mut Document,
    id: &str,
    target: WorkStatus,
    reason: Option<String>,
) -> Result<()> {
    let from = doc.get(id)?.status;

    let listed = doc.states.statuses_of(id);
    if listed != [from] {
        let found = if listed.is_empty() {
            "no column".to_string()
        } else {
            listed
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        return Err(WorkflowError::DataIntegrity {
            message: format!("{id} has status {from} but is listed in {found}"),
        });
    }

    if from != target {
        doc.move_column(id, from, target)?;
    }
    doc.get_mut(id)?.record_transition(target, reason);
    Ok(())
}

fn normalize_reason(reason: Option<&str>) -> Option<String> {
    reason
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(String::from)
}
