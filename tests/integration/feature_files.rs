//! Transition gates backed by real feature and coverage files

use std::fs;

use specflow::fs::Workspace;
use specflow::models::WorkStatus;
use specflow::verify::{transition_work_unit, Warning};
use specflow::WorkflowError;

use super::helpers::create;

fn project() -> (tempfile::TempDir, Workspace) {
    let temp = tempfile::TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("spec/features")).unwrap();
    let ws = Workspace::open(temp.path()).unwrap();
    (temp, ws)
}

fn move_to(ws: &Workspace, id: &str, status: WorkStatus) -> specflow::Result<Vec<Warning>> {
    ws.transaction(|doc, a| transition_work_unit(doc, id, status, None, a))
        .map(|outcome| outcome.warnings)
}

#[test]
fn test_tagged_scenario_opens_testing() {
    let (temp, ws) = project();
    let id = create(&ws, "AUTH", "Login");
    move_to(&ws, &id, WorkStatus::Specifying).unwrap();

    assert!(matches!(
        move_to(&ws, &id, WorkStatus::Testing),
        Err(WorkflowError::NoScenarios { .. })
    ));

    fs::write(
        temp.path().join("spec/features/login.feature"),
        format!("@{id}\nFeature: Login\n\n  Scenario: Valid credentials\n    Given a user\n"),
    )
    .unwrap();
    move_to(&ws, &id, WorkStatus::Testing).unwrap();
}

#[test]
fn test_placeholders_block_forward_moves() {
    let (temp, ws) = project();
    let id = create(&ws, "AUTH", "Signup");
    fs::write(
        temp.path().join("spec/features/signup.feature"),
        format!("@{id}\nFeature: Signup\n  As a [role]\n  I want to sign up\n"),
    )
    .unwrap();

    let err = move_to(&ws, &id, WorkStatus::Specifying).unwrap_err();
    match err {
        WorkflowError::UnresolvedPlaceholder { markers, .. } => {
            assert_eq!(markers, vec!["signup.feature: [role]".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_coverage_file_gates_done() {
    let (temp, ws) = project();
    let features = temp.path().join("spec/features");
    let id = create(&ws, "AUTH", "Login");
    fs::write(
        features.join("login.feature"),
        format!("@{id}\nFeature: Login\n  Scenario: Valid credentials\n"),
    )
    .unwrap();
    fs::write(
        features.join("login.feature.coverage"),
        r#"{"scenarios":[{"name":"Valid credentials","testMappings":[]}]}"#,
    )
    .unwrap();

    ws.transaction(|doc, _| Ok(doc.get_mut(&id)?.link_feature("login".into())))
        .unwrap();
    for status in [
        WorkStatus::Specifying,
        WorkStatus::Testing,
        WorkStatus::Implementing,
        WorkStatus::Validating,
    ] {
        move_to(&ws, &id, status).unwrap();
    }

    assert!(matches!(
        move_to(&ws, &id, WorkStatus::Done),
        Err(WorkflowError::IncompleteCoverage { .. })
    ));

    fs::write(
        features.join("login.feature.coverage"),
        r#"{"scenarios":[{"name":"Valid credentials","testMappings":[{"file":"tests/login.rs"}]}]}"#,
    )
    .unwrap();
    assert!(move_to(&ws, &id, WorkStatus::Done).unwrap().is_empty());
}

#[test]
fn test_nested_feature_coverage_gates_done() {
    let (temp, ws) = project();
    let auth = temp.path().join("spec/features/auth");
    fs::create_dir_all(&auth).unwrap();
    let id = create(&ws, "AUTH", "Login");
    fs::write(
        auth.join("login.feature"),
        format!("@{id}\nFeature: Login\n  Scenario: Locked account\n"),
    )
    .unwrap();
    fs::write(
        auth.join("login.feature.coverage"),
        r#"{"scenarios":[{"name":"Locked account","testMappings":[]}]}"#,
    )
    .unwrap();

    ws.transaction(|doc, _| Ok(doc.get_mut(&id)?.link_feature("login".into())))
        .unwrap();
    for status in [
        WorkStatus::Specifying,
        WorkStatus::Testing,
        WorkStatus::Implementing,
        WorkStatus::Validating,
    ] {
        move_to(&ws, &id, status).unwrap();
    }

    match move_to(&ws, &id, WorkStatus::Done) {
        Err(WorkflowError::IncompleteCoverage {
            feature, scenarios, ..
        }) => {
            assert_eq!(feature, "login");
            assert_eq!(scenarios, vec!["Locked account".to_string()]);
        }
        other => panic!("expected incomplete coverage, got {other:?}"),
    }
    assert_eq!(
        ws.snapshot().unwrap().get(&id).unwrap().status,
        WorkStatus::Validating
    );
}
