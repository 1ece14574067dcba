//! Filesystem-backed artifact lookups over Gherkin feature files.
//!
//! Only reads: feature files are found recursively under the features
//! directory, and coverage for `<name>.feature` is read from the sibling
//! `<name>.feature.coverage` JSON file wherever the feature lives.

use glob::glob;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{Result, WorkflowError};
use crate::models::WorkUnit;

use super::{FeatureCoverage, ScenarioCoverage, SpecArtifacts};

/// Markers left behind by feature templates until someone fills them in.
const PLACEHOLDER_PATTERN: &str =
    r"\[(?:role|action|benefit|precondition|expected outcome|context|outcome)\]|TODO:";

const SCENARIO_PATTERN: &str =
    r"(?m)^\s*(?:Scenario|Scenario Outline|Scenario Template|Example):";

#[derive(Debug, Clone)]
pub struct FeatureFiles {
    features_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoverageFile {
    #[serde(default)]
    scenarios: Vec<CoverageScenario>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoverageScenario {
    name: String,
    #[serde(default)]
    test_mappings: Vec<serde_json::Value>,
}

impl FeatureFiles {
    pub fn new(features_dir: impl Into<PathBuf>) -> Self {
        Self {
            features_dir: features_dir.into(),
        }
    }

    pub fn features_dir(&self) -> &Path {
        &self.features_dir
    }

    /// Path of a linked feature, accepting names with or without `.feature`.
    ///
    /// A name may be relative to the features directory (`auth/login`) or a
    /// bare file name found anywhere beneath it (`login`). When nothing
    /// matches, the top-level path is returned.
    pub fn feature_path(&self, feature: &str) -> Result<PathBuf> {
        let file = if feature.ends_with(".feature") {
            feature.to_string()
        } else {
            format!("{feature}.feature")
        };

        let direct = self.features_dir.join(&file);
        if direct.is_file() {
            return Ok(direct);
        }

        let nested = self
            .all_feature_files()?
            .into_iter()
            .find(|path| path.file_name().is_some_and(|name| name == file.as_str()));
        Ok(nested.unwrap_or(direct))
    }

    fn all_feature_files(&self) -> Result<Vec<PathBuf>> {
        if !self.features_dir.is_dir() {
            return Ok(Vec::new());
        }

        let pattern = self.features_dir.join("**").join("*.feature");
        let pattern = pattern.to_string_lossy();
        let entries = glob(&pattern)
            .map_err(|e| WorkflowError::Artifact(format!("bad feature glob {pattern}: {e}")))?;

        let mut files: Vec<PathBuf> = entries.filter_map(|entry| entry.ok()).collect();
        files.sort();
        Ok(files)
    }

    fn read(path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| WorkflowError::io(path, e))
    }

    /// Feature files whose text carries the `@<id>` tag outside comments.
    fn tagged_files(&self, work_unit_id: &str) -> Result<Vec<(PathBuf, String)>> {
        let tag = tag_regex(work_unit_id)?;
        let mut tagged = Vec::new();
        for path in self.all_feature_files()? {
            let content = Self::read(&path)?;
            if tag.is_match(&strip_comments(&content)) {
                tagged.push((path, content));
            }
        }
        Ok(tagged)
    }
}

impl SpecArtifacts for FeatureFiles {
    fn has_tagged_scenario(&self, work_unit_id: &str) -> Result<bool> {
        let scenario = Regex::new(SCENARIO_PATTERN)
            .map_err(|e| WorkflowError::Artifact(format!("bad scenario pattern: {e}")))?;
        Ok(self
            .tagged_files(work_unit_id)?
            .iter()
            .any(|(_, content)| scenario.is_match(content)))
    }

    fn unresolved_placeholders(&self, unit: &WorkUnit) -> Result<Vec<String>> {
        let placeholder = Regex::new(PLACEHOLDER_PATTERN)
            .map_err(|e| WorkflowError::Artifact(format!("bad placeholder pattern: {e}")))?;

        let mut files: BTreeSet<PathBuf> = self
            .tagged_files(&unit.id)?
            .into_iter()
            .map(|(path, _)| path)
            .collect();
        for feature in &unit.linked_features {
            let path = self.feature_path(feature)?;
            if path.is_file() {
                files.insert(path);
            }
        }

        let mut markers = Vec::new();
        for path in files {
            let content = Self::read(&path)?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let found: BTreeSet<&str> = placeholder
                .find_iter(&content)
                .map(|m| m.as_str())
                .collect();
            markers.extend(found.into_iter().map(|m| format!("{name}: {m}")));
        }
        Ok(markers)
    }

    fn coverage(&self, feature: &str) -> Result<Option<FeatureCoverage>> {
        let mut coverage_path = self.feature_path(feature)?.into_os_string();
        coverage_path.push(".coverage");
        let coverage_path = PathBuf::from(coverage_path);

        if !coverage_path.is_file() {
            return Ok(None);
        }

        let content = Self::read(&coverage_path)?;
        let file: CoverageFile =
            serde_json::from_str(&content).map_err(|source| WorkflowError::Parse {
                path: coverage_path.clone(),
                source,
            })?;

        Ok(Some(FeatureCoverage {
            feature: feature.to_string(),
            scenarios: file
                .scenarios
                .into_iter()
                .map(|s| ScenarioCoverage {
                    name: s.name,
                    mappings: s.test_mappings.len(),
                })
                .collect(),
        }))
    }
}

/// Drop Gherkin `#` comment lines so commented-out tags are not counted.
fn strip_comments(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `@AUTH-001` as a whole token, so `@AUTH-0012` does not match.
fn tag_regex(work_unit_id: &str) -> Result<Regex> {
    Regex::new(&format!(r"(?m)(?:^|\s)@{}(?:\s|$)", regex::escape(work_unit_id)))
        .map_err(|e| WorkflowError::Artifact(format!("bad tag pattern for {work_unit_id}: {e}")))
}
