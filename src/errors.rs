//! Typed error hierarchy for the work-unit core.
//!
//! Every public operation in the core returns [`Result`]. Any error returned
//! from inside a transaction aborts it before the document is written, so a
//! failed operation never leaves a partial mutation on disk.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::work_unit::WorkStatus;

pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Errors from the work-unit store, state machine and relationship graph.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Work unit '{id}' not found")]
    NotFound { id: String },

    #[error("Invalid transition for {id}: {from} -> {to}{}", hint_suffix(.hint))]
    InvalidTransition {
        id: String,
        from: WorkStatus,
        to: WorkStatus,
        hint: Option<String>,
    },

    #[error("Cannot move {id} back to backlog; use 'blocked' with a reason instead")]
    BacklogReentry { id: String },

    #[error("Blocking {id} requires a non-empty reason")]
    MissingBlockedReason { id: String },

    #[error("{id} has unanswered questions: {}", join_ids(.questions))]
    UnansweredQuestions { id: String, questions: Vec<u32> },

    #[error("{id} has no scenarios tagged @{id}; write at least one before entering testing")]
    NoScenarios { id: String },

    #[error("{id} has children that are not done: {}", .children.join(", "))]
    IncompleteChildren { id: String, children: Vec<String> },

    #[error("Feature '{feature}' linked to {id} has uncovered scenarios: {}", .scenarios.join(", "))]
    IncompleteCoverage {
        id: String,
        feature: String,
        scenarios: Vec<String>,
    },

    #[error("{id} still has unresolved placeholders: {}", .markers.join(", "))]
    UnresolvedPlaceholder { id: String, markers: Vec<String> },

    #[error("Circular dependency detected: {}", .path.join(" -> "))]
    CircularDependency { path: Vec<String> },

    #[error("Work unit '{id}' cannot reference itself")]
    SelfReference { id: String },

    #[error("{from} already {relation} {to}")]
    AlreadyExists {
        from: String,
        to: String,
        relation: String,
    },

    #[error("{from} does not have relation {relation} to {to}")]
    RelationNotFound {
        from: String,
        to: String,
        relation: String,
    },

    #[error("Cannot reorder {id} ({status}) relative to {anchor} ({anchor_status}); both must share a column")]
    CrossColumnReorder {
        id: String,
        status: WorkStatus,
        anchor: String,
        anchor_status: WorkStatus,
    },

    #[error("Cannot reorder {id}: the done column is ordered by completion history")]
    ImmutableColumn { id: String },

    #[error("Data integrity error: {message}. Run 'specflow repair' to restore consistency")]
    DataIntegrity { message: String },

    #[error("Could not lock {} after {attempts} attempts", .path.display())]
    LockTimeout { path: PathBuf, attempts: u32 },

    #[error("Cannot delete {id}: it still has children ({})", .children.join(", "))]
    HasChildren { id: String, children: Vec<String> },

    #[error("Attaching {child} under {parent} would exceed the maximum nesting depth of {max}")]
    DepthExceeded {
        child: String,
        parent: String,
        max: usize,
    },

    #[error("{kind} #{artifact} not found on {id}")]
    ArtifactNotFound {
        id: String,
        kind: &'static str,
        artifact: u32,
    },

    #[error("Invalid work unit id '{id}': expected PREFIX-NNN")]
    InvalidId { id: String },

    #[error("Invalid prefix '{prefix}': use 2-6 uppercase letters")]
    InvalidPrefix { prefix: String },

    #[error("No ids left for prefix '{prefix}'")]
    IdsExhausted { prefix: String },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize work units: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Feature artifact lookup failed: {0}")]
    Artifact(String),
}

impl WorkflowError {
    pub(crate) fn not_found(id: &str) -> Self {
        WorkflowError::NotFound { id: id.to_string() }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WorkflowError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error points at a corrupted document that `repair` can fix.
    pub fn suggests_repair(&self) -> bool {
        matches!(self, WorkflowError::DataIntegrity { .. })
    }
}

fn hint_suffix(hint: &Option<String>) -> String {
    hint.as_ref().map(|h| format!(" ({h})")).unwrap_or_default()
}

fn join_ids(ids: &[u32]) -> String {
    ids.iter()
        .map(|id| format!("#{id}"))
        .collect::<Vec<_>>()
        .join(", ")
}
