//! State machine scenarios run through committed transactions

use specflow::artifacts::InMemoryArtifacts;
use specflow::models::{NewWorkUnit, WorkStatus};
use specflow::verify::{transition_work_unit, validate, Warning};
use specflow::WorkflowError;

use super::helpers::{create, status_of, workspace, workspace_with};

#[test]
fn test_auth_story_reaches_testing() {
    let artifacts = InMemoryArtifacts::new().with_scenario("AUTH-001");
    let (_temp, ws) = workspace_with(artifacts);

    let id = create(&ws, "AUTH", "User login");
    assert_eq!(id, "AUTH-001");
    assert_eq!(status_of(&ws, &id), WorkStatus::Backlog);

    ws.transaction(|doc, a| transition_work_unit(doc, &id, WorkStatus::Specifying, None, a))
        .expect("backlog -> specifying");

    let err = ws
        .transaction(|doc, a| transition_work_unit(doc, &id, WorkStatus::Implementing, None, a))
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidTransition { .. }));
    assert!(err.to_string().contains("testing"));
    assert_eq!(status_of(&ws, &id), WorkStatus::Specifying);

    ws.transaction(|doc, _| {
        let unit = doc.get_mut(&id)?;
        let q = unit.add_question("Should login support SSO?".to_string());
        unit.answer_question(q, "Not in the first release".to_string(), false)?;
        unit.add_example("valid email and password".to_string());
        Ok(())
    })
    .unwrap();

    let outcome = ws
        .transaction(|doc, a| transition_work_unit(doc, &id, WorkStatus::Testing, None, a))
        .expect("specifying -> testing");
    assert_eq!(outcome.warnings, vec![Warning::NoEstimate]);
    assert!(outcome
        .warnings
        .iter()
        .any(|w| w.to_string() == "no estimate assigned"));

    let doc = ws.snapshot().unwrap();
    assert_eq!(doc.states.testing, vec![id.clone()]);
    assert_eq!(doc.get(&id).unwrap().state_history.len(), 3);
    assert!(validate(&doc).is_valid());
}

#[test]
fn test_done_parent_with_open_child() {
    let (_temp, ws) = workspace();
    let done_parent = create(&ws, "EPIC", "Finished epic");
    let other_parent = create(&ws, "EPIC", "Open epic");

    let child = ws
        .transaction(|doc, _| {
            // Fixture: force a finished parent and an in-progress child
            let child = doc.create_work_unit(
                "AUTH",
                NewWorkUnit {
                    title: "Child".into(),
                    parent: Some(done_parent.clone()),
                    ..Default::default()
                },
            )?;
            for (id, status) in [
                (&done_parent, WorkStatus::Done),
                (&other_parent, WorkStatus::Validating),
                (&child, WorkStatus::Implementing),
            ] {
                let from = doc.get(id)?.status;
                doc.states.column_mut(from).retain(|i| i != id);
                doc.states.column_mut(status).push(id.clone());
                doc.get_mut(id)?.status = status;
            }
            doc.get_mut(&other_parent)?.children.push(child.clone());
            Ok(child)
        })
        .unwrap();

    ws.transaction(|doc, a| transition_work_unit(doc, &done_parent, WorkStatus::Done, None, a))
        .expect("done -> done is a no-op");

    let err = ws
        .transaction(|doc, a| transition_work_unit(doc, &other_parent, WorkStatus::Done, None, a))
        .unwrap_err();
    match err {
        WorkflowError::IncompleteChildren { children, .. } => assert_eq!(children, vec![child]),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(status_of(&ws, &other_parent), WorkStatus::Validating);
}

#[test]
fn test_failed_transition_is_not_persisted() {
    let (temp, ws) = workspace();
    let id = create(&ws, "AUTH", "Login");
    let path = temp.path().join("spec/work-units.json");
    let before = std::fs::read_to_string(&path).unwrap();

    let err = ws
        .transaction(|doc, a| transition_work_unit(doc, &id, WorkStatus::Blocked, Some("  "), a))
        .unwrap_err();
    assert!(matches!(err, WorkflowError::MissingBlockedReason { .. }));

    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_every_committed_transition_keeps_one_column() {
    let artifacts = InMemoryArtifacts::new().with_scenario("AUTH-001");
    let (_temp, ws) = workspace_with(artifacts);
    let id = create(&ws, "AUTH", "Login");

    let path = [
        (WorkStatus::Specifying, None),
        (WorkStatus::Testing, None),
        (WorkStatus::Blocked, Some("waiting on design")),
        (WorkStatus::Testing, None),
        (WorkStatus::Implementing, None),
        (WorkStatus::Validating, None),
        (WorkStatus::Implementing, Some("review found a bug")),
        (WorkStatus::Validating, None),
        (WorkStatus::Done, None),
        (WorkStatus::Specifying, Some("reopened")),
    ];
    for (status, reason) in path {
        ws.transaction(|doc, a| transition_work_unit(doc, &id, status, reason, a))
            .unwrap_or_else(|e| panic!("transition to {status} failed: {e}"));

        let doc = ws.snapshot().unwrap();
        assert_eq!(doc.states.statuses_of(&id), vec![status]);
        assert_eq!(doc.get(&id).unwrap().blocked_reason.is_some(), status == WorkStatus::Blocked);
    }
}

#[test]
fn test_next_id_after_delete_is_not_reused() {
    let (_temp, ws) = workspace();
    let first = create(&ws, "AUTH", "Login");
    assert_eq!(first, "AUTH-001");

    ws.transaction(|doc, _| doc.delete_work_unit(&first)).unwrap();
    let doc = ws.snapshot().unwrap();
    assert!(doc.work_units.is_empty());

    assert_eq!(create(&ws, "AUTH", "Login again"), "AUTH-002");
}
