//! Read-only view of the feature files and coverage data a work unit points at.
//!
//! The state machine consults three facts it does not own: whether any
//! scenario is tagged with a unit's id, whether the unit's feature files still
//! hold template placeholders, and how well each linked feature is covered by
//! test mappings. [`SpecArtifacts`] is the seam; results are trusted as-is.

mod feature_files;

use std::collections::{HashMap, HashSet};

use crate::errors::Result;
use crate::models::WorkUnit;

pub use feature_files::FeatureFiles;

pub trait SpecArtifacts: Send + Sync {
    /// Whether at least one scenario carries the `@<id>` tag.
    fn has_tagged_scenario(&self, work_unit_id: &str) -> Result<bool>;

    /// Template markers still present in the unit's feature files.
    fn unresolved_placeholders(&self, unit: &WorkUnit) -> Result<Vec<String>>;

    /// Coverage of a linked feature; `None` when no coverage artifact exists.
    fn coverage(&self, feature: &str) -> Result<Option<FeatureCoverage>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureCoverage {
    pub feature: String,
    pub scenarios: Vec<ScenarioCoverage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioCoverage {
    pub name: String,
    /// Number of verification mappings (tests) attached to the scenario.
    pub mappings: usize,
}

impl FeatureCoverage {
    /// Names of scenarios with no verification mapping.
    pub fn uncovered(&self) -> Vec<String> {
        self.scenarios
            .iter()
            .filter(|s| s.mappings == 0)
            .map(|s| s.name.clone())
            .collect()
    }
}

/// Artifacts held in memory, for embedding the core without feature files.
#[derive(Debug, Clone, Default)]
pub struct InMemoryArtifacts {
    tagged: HashSet<String>,
    placeholders: HashMap<String, Vec<String>>,
    coverage: HashMap<String, FeatureCoverage>,
}

impl InMemoryArtifacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scenario(mut self, work_unit_id: &str) -> Self {
        self.tagged.insert(work_unit_id.to_string());
        self
    }

    pub fn with_placeholders(mut self, work_unit_id: &str, markers: &[&str]) -> Self {
        self.placeholders.insert(
            work_unit_id.to_string(),
            markers.iter().map(|m| m.to_string()).collect(),
        );
        self
    }

    /// Register coverage for `feature` as `(scenario name, mapping count)` pairs.
    pub fn with_coverage(mut self, feature: &str, scenarios: &[(&str, usize)]) -> Self {
        self.coverage.insert(
            feature.to_string(),
            FeatureCoverage {
                feature: feature.to_string(),
                scenarios: scenarios
                    .iter()
                    .map(|(name, mappings)| ScenarioCoverage {
                        name: name.to_string(),
                        mappings: *mappings,
                    })
                    .collect(),
            },
        );
        self
    }
}

impl SpecArtifacts for InMemoryArtifacts {
    fn has_tagged_scenario(&self, work_unit_id: &str) -> Result<bool> {
        Ok(self.tagged.contains(work_unit_id))
    }

    fn unresolved_placeholders(&self, unit: &WorkUnit) -> Result<Vec<String>> {
        Ok(self.placeholders.get(&unit.id).cloned().unwrap_or_default())
    }

    fn coverage(&self, feature: &str) -> Result<Option<FeatureCoverage>> {
        Ok(self.coverage.get(feature).cloned())
    }
}
