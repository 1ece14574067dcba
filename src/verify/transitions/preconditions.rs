//! Checks a unit must pass before it may enter certain states.

use crate::artifacts::SpecArtifacts;
use crate::errors::{Result, WorkflowError};
use crate::models::{Document, WorkStatus, WorkUnit};

use super::warnings::Warning;

/// Forward moves are refused while feature templates are unfilled.
pub(super) fn check_placeholders(unit: &WorkUnit, artifacts: &dyn SpecArtifacts) -> Result<()> {
    let markers = artifacts.unresolved_placeholders(unit)?;
    if markers.is_empty() {
        Ok(())
    } else {
        Err(WorkflowError::UnresolvedPlaceholder {
            id: unit.id.clone(),
            markers,
        })
    }
}

/// Gate for entering `testing`.
///
/// Fatal: unanswered questions, and no tagged scenario for a leaf unit.
/// Parent units are exempt from the scenario check since their children
/// carry the scenarios.
pub(super) fn check_testing_entry(
    doc: &Document,
    unit: &WorkUnit,
    artifacts: &dyn SpecArtifacts,
) -> Result<Vec<Warning>> {
    let unanswered = unit.unanswered_questions();
    if !unanswered.is_empty() {
        return Err(WorkflowError::UnansweredQuestions {
            id: unit.id.clone(),
            questions: unanswered,
        });
    }

    if unit.children.is_empty() && !artifacts.has_tagged_scenario(&unit.id)? {
        return Err(WorkflowError::NoScenarios {
            id: unit.id.clone(),
        });
    }

    let mut warnings = Vec::new();
    if !unit.has_examples() {
        warnings.push(Warning::NoExamples);
    }
    if unit.estimate.is_none() {
        warnings.push(Warning::NoEstimate);
    }

    let pending: Vec<String> = unit
        .depends_on
        .iter()
        .filter(|dep| {
            doc.work_units
                .get(dep.as_str())
                .is_none_or(|d| d.status != WorkStatus::Done)
        })
        .cloned()
        .collect();
    if !pending.is_empty() {
        warnings.push(Warning::IncompleteDependencies { ids: pending });
    }

    Ok(warnings)
}

/// Gate for entering `done`.
///
/// Fatal: any child not done, and any linked feature whose coverage file
/// lists a scenario without a test mapping. A missing coverage file or no
/// linked feature at all only warns.
pub(super) fn check_done_entry(
    doc: &Document,
    unit: &WorkUnit,
    artifacts: &dyn SpecArtifacts,
) -> Result<Vec<Warning>> {
    let incomplete: Vec<String> = unit
        .children
        .iter()
        .filter(|child| {
            doc.work_units
                .get(child.as_str())
                .is_none_or(|c| c.status != WorkStatus::Done)
        })
        .cloned()
        .collect();
    if !incomplete.is_empty() {
        return Err(WorkflowError::IncompleteChildren {
            id: unit.id.clone(),
            children: incomplete,
        });
    }

    if unit.linked_features.is_empty() {
        return Ok(vec![Warning::NoLinkedFeatures]);
    }

    let mut warnings = Vec::new();
    for feature in &unit.linked_features {
        match artifacts.coverage(feature)? {
            None => warnings.push(Warning::MissingCoverage {
                feature: feature.clone(),
            }),
            Some(coverage) => {
                let uncovered = coverage.uncovered();
                if !uncovered.is_empty() {
                    return Err(WorkflowError::IncompleteCoverage {
                        id: unit.id.clone(),
                        feature: feature.clone(),
                        scenarios: uncovered,
                    });
                }
            }
        }
    }

    Ok(warnings)
}
