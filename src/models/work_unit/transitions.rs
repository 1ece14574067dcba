use crate::errors::{Result, WorkflowError};

use super::types::WorkStatus;

impl WorkStatus {
    /// Check if the transition table allows moving from the current status to
    /// `new_status`.
    ///
    /// Valid transitions:
    /// - `Backlog` -> `Specifying` | `Blocked`
    /// - `Specifying` -> `Testing` | `Blocked`
    /// - `Testing` -> `Implementing` | `Blocked`
    /// - `Implementing` -> `Validating` | `Blocked`
    /// - `Validating` -> `Done` | `Implementing` | `Specifying` | `Blocked`
    /// - `Done` -> `Specifying` | `Testing` | `Implementing` | `Validating` | `Blocked`
    /// - `Blocked` -> `Backlog` | `Specifying` | `Testing` | `Implementing` | `Validating`
    ///
    /// The table alone does not decide legality: [`WorkStatus::try_transition`]
    /// also refuses re-entering `Backlog`.
    pub fn can_transition_to(&self, new_status: &WorkStatus) -> bool {
        // Same status is always valid (no-op)
        if self == new_status {
            return true;
        }

        self.valid_transitions().contains(new_status)
    }

    /// Returns the list of statuses this status can transition to.
    pub fn valid_transitions(&self) -> Vec<WorkStatus> {
        match self {
            WorkStatus::Backlog => vec![WorkStatus::Specifying, WorkStatus::Blocked],
            WorkStatus::Specifying => vec![WorkStatus::Testing, WorkStatus::Blocked],
            WorkStatus::Testing => vec![WorkStatus::Implementing, WorkStatus::Blocked],
            WorkStatus::Implementing => vec![WorkStatus::Validating, WorkStatus::Blocked],
            WorkStatus::Validating => vec![
                WorkStatus::Done,
                WorkStatus::Implementing,
                WorkStatus::Specifying,
                WorkStatus::Blocked,
            ],
            WorkStatus::Done => vec![
                WorkStatus::Specifying,
                WorkStatus::Testing,
                WorkStatus::Implementing,
                WorkStatus::Validating,
                WorkStatus::Blocked,
            ],
            WorkStatus::Blocked => vec![
                WorkStatus::Backlog,
                WorkStatus::Specifying,
                WorkStatus::Testing,
                WorkStatus::Implementing,
                WorkStatus::Validating,
            ],
        }
    }

    /// Attempt to transition unit `id` to `new_status`.
    ///
    /// # Returns
    /// `Ok(new_status)` if the transition is legal, otherwise
    /// `BacklogReentry` or `InvalidTransition` (with a hint for skipped steps).
    pub fn try_transition(&self, id: &str, new_status: WorkStatus) -> Result<WorkStatus> {
        if *self == new_status {
            return Ok(new_status);
        }

        if new_status == WorkStatus::Backlog {
            return Err(WorkflowError::BacklogReentry { id: id.to_string() });
        }

        if self.can_transition_to(&new_status) {
            Ok(new_status)
        } else {
            Err(WorkflowError::InvalidTransition {
                id: id.to_string(),
                from: *self,
                to: new_status,
                hint: self.skipped_step(&new_status).map(|step| {
                    format!("must move to {step} first; {self} -> {step} -> {new_status}")
                }),
            })
        }
    }

    /// The intermediate status a common illegal jump skipped over.
    pub fn skipped_step(&self, new_status: &WorkStatus) -> Option<WorkStatus> {
        match (self, new_status) {
            (WorkStatus::Backlog, WorkStatus::Testing) => Some(WorkStatus::Specifying),
            (WorkStatus::Specifying, WorkStatus::Implementing) => Some(WorkStatus::Testing),
            _ => None,
        }
    }

    /// Position in the delivery order; `None` for `Blocked`, which sits outside it.
    pub fn workflow_rank(&self) -> Option<u8> {
        match self {
            WorkStatus::Backlog => Some(0),
            WorkStatus::Specifying => Some(1),
            WorkStatus::Testing => Some(2),
            WorkStatus::Implementing => Some(3),
            WorkStatus::Validating => Some(4),
            WorkStatus::Done => Some(5),
            WorkStatus::Blocked => None,
        }
    }

    /// Whether moving to `new_status` advances the unit through the workflow.
    ///
    /// Entering `Blocked` is never forward; leaving it always is.
    pub fn is_forward_to(&self, new_status: &WorkStatus) -> bool {
        match (self.workflow_rank(), new_status.workflow_rank()) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(from), Some(to)) => to > from,
        }
    }
}
