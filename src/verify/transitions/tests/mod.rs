use crate::artifacts::InMemoryArtifacts;
use crate::models::{Document, NewWorkUnit, WorkStatus};

use super::apply_transition;


/// Create a unit and force it into `status`, keeping the column index in step.
fn unit_in(doc: &mut Document, status: WorkStatus) -> String {
    let id = doc
        .create_work_unit(
            "AUTH",
            NewWorkUnit {
                title: "Test unit".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
    if status != WorkStatus::Backlog {
        let reason = (status == WorkStatus::Blocked).then(|| "setup".to_string());
        apply_transition(doc, &id, status, reason).unwrap();
    }
    id
}

fn child_of(doc: &mut Document, parent: &str, status: WorkStatus) -> String {
    let id = unit_in(doc, status);
    crate::graph::set_parent(doc, &id, Some(parent)).unwrap();
    id
}

fn no_artifacts() -> InMemoryArtifacts {
    InMemoryArtifacts::new()
}
