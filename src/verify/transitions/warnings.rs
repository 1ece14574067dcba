use crate::models::WorkStatus;

/// Non-fatal findings returned alongside a successful transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    NoEstimate,
    NoExamples,
    /// Soft `dependsOn` prerequisites that are not done yet.
    IncompleteDependencies { ids: Vec<String> },
    /// A linked feature has no coverage artifact to check.
    MissingCoverage { feature: String },
    NoLinkedFeatures,
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::NoEstimate => write!(f, "no estimate assigned"),
            Warning::NoExamples => write!(f, "no examples captured during discovery"),
            Warning::IncompleteDependencies { ids } => {
                write!(f, "soft dependencies not done yet: {}", ids.join(", "))
            }
            Warning::MissingCoverage { feature } => {
                write!(f, "no coverage file for feature '{feature}'; coverage not verified")
            }
            Warning::NoLinkedFeatures => {
                write!(f, "no linked feature files; coverage not verified")
            }
        }
    }
}

/// Result of a committed transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub id: String,
    pub from: WorkStatus,
    pub to: WorkStatus,
    pub warnings: Vec<Warning>,
}

impl TransitionOutcome {
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}
