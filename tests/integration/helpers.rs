//! Shared helpers for integration tests

use tempfile::TempDir;

use specflow::artifacts::InMemoryArtifacts;
use specflow::fs::{LockPolicy, Workspace};
use specflow::models::{NewWorkUnit, WorkStatus};

/// A workspace over `spec/work-units.json` in a fresh temp dir.
pub fn workspace_with(artifacts: InMemoryArtifacts) -> (TempDir, Workspace) {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let workspace = Workspace::new(
        temp.path().join("spec/work-units.json"),
        LockPolicy::default(),
        artifacts,
    );
    (temp, workspace)
}

pub fn workspace() -> (TempDir, Workspace) {
    workspace_with(InMemoryArtifacts::new())
}

pub fn create(workspace: &Workspace, prefix: &str, title: &str) -> String {
    workspace
        .transaction(|doc, _| {
            doc.create_work_unit(
                prefix,
                NewWorkUnit {
                    title: title.to_string(),
                    ..Default::default()
                },
            )
        })
        .expect("Failed to create work unit")
}

pub fn status_of(workspace: &Workspace, id: &str) -> WorkStatus {
    workspace
        .snapshot()
        .expect("Failed to read document")
        .get(id)
        .expect("Unit should exist")
        .status
}
