pub mod integrity;
pub mod transitions;

pub use integrity::{repair, validate, Issue, IssueKind, RepairReport, ValidationReport};
pub use transitions::{block_work_unit, transition_work_unit, TransitionOutcome, Warning};
