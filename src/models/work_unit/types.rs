use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::discovery::{ExampleItem, QuestionItem, RuleItem};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkUnit {
    pub id: String,
    pub title: String,
    #[serde(rename = "type", default)]
    pub unit_type: WorkUnitType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: WorkStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
    /// Units this one blocks. Mirrored by `blocked_by` on the target.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocked_by: Vec<String>,
    /// Soft ordering hints; never mirrored and may form cycles.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    /// Symmetric informational links.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relates_to: Vec<String>,
    /// Present iff `status == Blocked`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<QuestionItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<ExampleItem>,
    /// Story points; advisory only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimate: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub linked_features: Vec<String>,
    #[serde(default)]
    pub state_history: Vec<HistoryEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One successful transition, including self-transitions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub state: WorkStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WorkUnitType {
    #[default]
    Story,
    Bug,
    Task,
}

impl std::fmt::Display for WorkUnitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkUnitType::Story => write!(f, "story"),
            WorkUnitType::Bug => write!(f, "bug"),
            WorkUnitType::Task => write!(f, "task"),
        }
    }
}

impl std::str::FromStr for WorkUnitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "story" => Ok(WorkUnitType::Story),
            "bug" => Ok(WorkUnitType::Bug),
            "task" => Ok(WorkUnitType::Task),
            _ => Err(format!("Invalid work unit type: {s}. Use: story, bug, task")),
        }
    }
}

/// Status of a work unit in the delivery workflow.
///
/// State machine transitions:
/// - `Backlog` -> `Specifying` | `Blocked`
/// - `Specifying` -> `Testing` | `Blocked`
/// - `Testing` -> `Implementing` | `Blocked`
/// - `Implementing` -> `Validating` | `Blocked`
/// - `Validating` -> `Done` | `Implementing` | `Specifying` | `Blocked`
/// - `Done` -> `Specifying` | `Testing` | `Implementing` | `Validating` | `Blocked`
/// - `Blocked` -> any state except `Done`
///
/// There is no terminal state. `Backlog` is the initial state and cannot be
/// re-entered once left.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum WorkStatus {
    Backlog,
    Specifying,
    Testing,
    Implementing,
    Validating,
    Done,
    /// Waiting on something outside the workflow; requires a reason.
    Blocked,
}

impl WorkStatus {
    pub const ALL: [WorkStatus; 7] = [
        WorkStatus::Backlog,
        WorkStatus::Specifying,
        WorkStatus::Testing,
        WorkStatus::Implementing,
        WorkStatus::Validating,
        WorkStatus::Done,
        WorkStatus::Blocked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkStatus::Backlog => "backlog",
            WorkStatus::Specifying => "specifying",
            WorkStatus::Testing => "testing",
            WorkStatus::Implementing => "implementing",
            WorkStatus::Validating => "validating",
            WorkStatus::Done => "done",
            WorkStatus::Blocked => "blocked",
        }
    }
}

impl std::fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WorkStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WorkStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.to_lowercase())
            .ok_or_else(|| {
                format!(
                    "Invalid status: {s}. Use one of: {}",
                    WorkStatus::ALL.map(|s| s.as_str()).join(", ")
                )
            })
    }
}
