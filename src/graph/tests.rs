//! Tests for the relationship graph

use super::*;
use crate::models::NewWorkUnit;

fn doc_with(n: usize) -> (Document, Vec<String>) {
    let mut doc = Document::default();
    let ids = (0..n)
        .map(|i| {
            doc.create_work_unit(
                "AUTH",
                NewWorkUnit {
                    title: format!("unit {i}"),
                    ..Default::default()
                },
            )
            .unwrap()
        })
        .collect();
    (doc, ids)
}

fn set_status(doc: &mut Document, id: &str, status: WorkStatus) {
    let reason = (status == WorkStatus::Blocked).then(|| "setup".to_string());
    apply_transition(doc, id, status, reason).unwrap();
}

#[test]
fn test_relation_kind_parsing() {
    assert_eq!("blocks".parse::<RelationKind>().unwrap(), RelationKind::Blocks);
    assert_eq!(
        "blocked-by".parse::<RelationKind>().unwrap(),
        RelationKind::BlockedBy
    );
    assert_eq!(
        "dependsOn".parse::<RelationKind>().unwrap(),
        RelationKind::DependsOn
    );
    assert!("parent".parse::<RelationKind>().is_err());
    assert_eq!(RelationKind::RelatesTo.to_string(), "relatesTo");
}

#[test]
fn test_blocks_adds_inverse_and_blocks_target() {
    let (mut doc, ids) = doc_with(2);
    let (a, b) = (&ids[0], &ids[1]);

    let outcome = add_relation(&mut doc, a, b, RelationKind::Blocks).unwrap();

    assert_eq!(outcome.implicitly_blocked.as_deref(), Some(b.as_str()));
    assert_eq!(doc.get(a).unwrap().blocks, vec![b.clone()]);
    assert_eq!(doc.get(b).unwrap().blocked_by, vec![a.clone()]);

    let target = doc.get(b).unwrap();
    assert_eq!(target.status, WorkStatus::Blocked);
    assert_eq!(target.blocked_reason.as_deref(), Some(format!("Blocked by {a}").as_str()));
    assert_eq!(doc.states.blocked, vec![b.clone()]);
    assert!(!doc.states.backlog.contains(b));
}

#[test]
fn test_blocks_leaves_done_target_alone() {
    let (mut doc, ids) = doc_with(2);
    set_status(&mut doc, &ids[1], WorkStatus::Done);

    let outcome = add_relation(&mut doc, &ids[0], &ids[1], RelationKind::Blocks).unwrap();

    assert!(outcome.implicitly_blocked.is_none());
    assert_eq!(doc.get(&ids[1]).unwrap().status, WorkStatus::Done);
}

#[test]
fn test_blocks_keeps_existing_block_reason() {
    let (mut doc, ids) = doc_with(2);
    set_status(&mut doc, &ids[1], WorkStatus::Blocked);

    let outcome = add_relation(&mut doc, &ids[0], &ids[1], RelationKind::Blocks).unwrap();

    assert!(outcome.implicitly_blocked.is_none());
    assert_eq!(doc.get(&ids[1]).unwrap().blocked_reason.as_deref(), Some("setup"));
}

#[test]
fn test_blocked_by_is_stored_as_inverse_blocks() {
    let (mut doc, ids) = doc_with(2);
    let (a, b) = (&ids[0], &ids[1]);

    let outcome = add_relation(&mut doc, a, b, RelationKind::BlockedBy).unwrap();

    assert_eq!(outcome.kind, RelationKind::Blocks);
    assert_eq!(outcome.from, *b);
    assert_eq!(doc.get(b).unwrap().blocks, vec![a.clone()]);
    assert_eq!(doc.get(a).unwrap().blocked_by, vec![b.clone()]);
    assert_eq!(doc.get(a).unwrap().status, WorkStatus::Blocked);
}

#[test]
fn test_two_node_cycle_is_rejected_without_change() {
    let (mut doc, ids) = doc_with(2);
    let (a, b) = (&ids[0], &ids[1]);
    add_relation(&mut doc, a, b, RelationKind::Blocks).unwrap();
    let before = doc.clone();

    let err = add_relation(&mut doc, b, a, RelationKind::Blocks).unwrap_err();

    match &err {
        WorkflowError::CircularDependency { path } => {
            assert_eq!(path, &vec![b.clone(), a.clone(), b.clone()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("Circular dependency detected"));
    assert_eq!(doc, before);
}

#[test]
fn test_longer_cycle_reports_path() {
    let (mut doc, ids) = doc_with(3);
    add_relation(&mut doc, &ids[0], &ids[1], RelationKind::Blocks).unwrap();
    add_relation(&mut doc, &ids[1], &ids[2], RelationKind::Blocks).unwrap();

    let err = add_relation(&mut doc, &ids[2], &ids[0], RelationKind::Blocks).unwrap_err();
    match err {
        WorkflowError::CircularDependency { path } => {
            assert_eq!(
                path,
                vec![ids[2].clone(), ids[0].clone(), ids[1].clone(), ids[2].clone()]
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(find_blocks_cycle(&doc).is_none());
}

#[test]
fn test_soft_relations_may_cycle() {
    let (mut doc, ids) = doc_with(2);
    add_relation(&mut doc, &ids[0], &ids[1], RelationKind::DependsOn).unwrap();
    add_relation(&mut doc, &ids[1], &ids[0], RelationKind::DependsOn).unwrap();

    assert_eq!(doc.get(&ids[0]).unwrap().depends_on, vec![ids[1].clone()]);
    assert_eq!(doc.get(&ids[1]).unwrap().depends_on, vec![ids[0].clone()]);
    assert_eq!(doc.get(&ids[0]).unwrap().status, WorkStatus::Backlog);
}

#[test]
fn test_depends_on_is_one_way() {
    let (mut doc, ids) = doc_with(2);
    add_relation(&mut doc, &ids[0], &ids[1], RelationKind::DependsOn).unwrap();
    assert!(doc.get(&ids[1]).unwrap().depends_on.is_empty());
}

#[test]
fn test_relates_to_is_symmetric() {
    let (mut doc, ids) = doc_with(2);
    add_relation(&mut doc, &ids[0], &ids[1], RelationKind::RelatesTo).unwrap();

    assert_eq!(doc.get(&ids[1]).unwrap().relates_to, vec![ids[0].clone()]);
    assert!(matches!(
        add_relation(&mut doc, &ids[1], &ids[0], RelationKind::RelatesTo),
        Err(WorkflowError::AlreadyExists { .. })
    ));

    remove_relation(&mut doc, &ids[1], &ids[0], RelationKind::RelatesTo).unwrap();
    assert!(doc.get(&ids[0]).unwrap().relates_to.is_empty());
    assert!(doc.get(&ids[1]).unwrap().relates_to.is_empty());
}

#[test]
fn test_add_rejects_self_missing_and_duplicate() {
    let (mut doc, ids) = doc_with(2);

    assert!(matches!(
        add_relation(&mut doc, &ids[0], &ids[0], RelationKind::Blocks),
        Err(WorkflowError::SelfReference { .. })
    ));
    assert!(matches!(
        add_relation(&mut doc, &ids[0], "AUTH-404", RelationKind::DependsOn),
        Err(WorkflowError::NotFound { .. })
    ));

    add_relation(&mut doc, &ids[0], &ids[1], RelationKind::DependsOn).unwrap();
    assert!(matches!(
        add_relation(&mut doc, &ids[0], &ids[1], RelationKind::DependsOn),
        Err(WorkflowError::AlreadyExists { .. })
    ));
}

#[test]
fn test_remove_blocks_removes_both_sides() {
    let (mut doc, ids) = doc_with(2);
    add_relation(&mut doc, &ids[0], &ids[1], RelationKind::Blocks).unwrap();

    remove_relation(&mut doc, &ids[1], &ids[0], RelationKind::BlockedBy).unwrap();

    assert!(doc.get(&ids[0]).unwrap().blocks.is_empty());
    assert!(doc.get(&ids[1]).unwrap().blocked_by.is_empty());
    // Unblocking stays an explicit transition
    assert_eq!(doc.get(&ids[1]).unwrap().status, WorkStatus::Blocked);
}

#[test]
fn test_remove_absent_edge_fails() {
    let (mut doc, ids) = doc_with(2);
    assert!(matches!(
        remove_relation(&mut doc, &ids[0], &ids[1], RelationKind::Blocks),
        Err(WorkflowError::RelationNotFound { .. })
    ));
}

#[test]
fn test_dependencies_summary() {
    let (mut doc, ids) = doc_with(3);
    add_relation(&mut doc, &ids[0], &ids[1], RelationKind::Blocks).unwrap();
    add_relation(&mut doc, &ids[0], &ids[2], RelationKind::RelatesTo).unwrap();

    let deps = dependencies(&doc, &ids[0]).unwrap();
    assert_eq!(deps.blocks, vec![ids[1].clone()]);
    assert_eq!(deps.relates_to, vec![ids[2].clone()]);
    assert!(deps.blocked_by.is_empty());
}

#[test]
fn test_set_parent_is_mutual_and_moves() {
    let (mut doc, ids) = doc_with(3);
    set_parent(&mut doc, &ids[2], Some(&ids[0])).unwrap();
    assert_eq!(doc.get(&ids[0]).unwrap().children, vec![ids[2].clone()]);

    set_parent(&mut doc, &ids[2], Some(&ids[1])).unwrap();
    assert!(doc.get(&ids[0]).unwrap().children.is_empty());
    assert_eq!(doc.get(&ids[1]).unwrap().children, vec![ids[2].clone()]);
    assert_eq!(doc.get(&ids[2]).unwrap().parent.as_deref(), Some(ids[1].as_str()));

    set_parent(&mut doc, &ids[2], None).unwrap();
    assert!(doc.get(&ids[1]).unwrap().children.is_empty());
    assert!(doc.get(&ids[2]).unwrap().parent.is_none());
}

#[test]
fn test_set_parent_rejects_cycles_and_self() {
    let (mut doc, ids) = doc_with(2);
    set_parent(&mut doc, &ids[1], Some(&ids[0])).unwrap();

    assert!(matches!(
        set_parent(&mut doc, &ids[0], Some(&ids[0])),
        Err(WorkflowError::SelfReference { .. })
    ));
    assert!(matches!(
        set_parent(&mut doc, &ids[0], Some(&ids[1])),
        Err(WorkflowError::CircularDependency { .. })
    ));
}

#[test]
fn test_set_parent_enforces_depth() {
    let (mut doc, ids) = doc_with(5);
    set_parent(&mut doc, &ids[1], Some(&ids[0])).unwrap();
    set_parent(&mut doc, &ids[2], Some(&ids[1])).unwrap();
    assert_eq!(depth_of(&doc, &ids[2]), MAX_DEPTH);

    assert!(matches!(
        set_parent(&mut doc, &ids[3], Some(&ids[2])),
        Err(WorkflowError::DepthExceeded { .. })
    ));

    // A two-level subtree cannot go under a unit that already has a parent
    set_parent(&mut doc, &ids[4], Some(&ids[3])).unwrap();
    assert!(matches!(
        set_parent(&mut doc, &ids[3], Some(&ids[1])),
        Err(WorkflowError::DepthExceeded { .. })
    ));
    assert!(doc.get(&ids[3]).unwrap().parent.is_none());
}

#[test]
fn test_impact_and_bottlenecks() {
    let (mut doc, ids) = doc_with(4);
    add_relation(&mut doc, &ids[0], &ids[1], RelationKind::Blocks).unwrap();
    add_relation(&mut doc, &ids[1], &ids[2], RelationKind::Blocks).unwrap();
    add_relation(&mut doc, &ids[3], &ids[2], RelationKind::Blocks).unwrap();

    assert_eq!(
        impact(&doc, &ids[0]).unwrap(),
        vec![ids[1].clone(), ids[2].clone()]
    );

    let found = bottlenecks(&doc);
    let order: Vec<&str> = found.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(order, vec![ids[0].as_str(), ids[1].as_str(), ids[3].as_str()]);
    assert_eq!(found[0].blocked.len(), 2);
}

#[test]
fn test_done_units_are_not_bottlenecks_or_orphans() {
    let (mut doc, ids) = doc_with(3);
    add_relation(&mut doc, &ids[0], &ids[1], RelationKind::Blocks).unwrap();
    set_status(&mut doc, &ids[0], WorkStatus::Done);
    set_status(&mut doc, &ids[2], WorkStatus::Done);

    assert!(bottlenecks(&doc).is_empty());
    assert!(orphans(&doc).is_empty());
}

#[test]
fn test_orphans() {
    let (mut doc, ids) = doc_with(4);
    set_parent(&mut doc, &ids[1], Some(&ids[0])).unwrap();
    add_relation(&mut doc, &ids[2], &ids[0], RelationKind::RelatesTo).unwrap();

    let orphan_ids: Vec<&str> = orphans(&doc).iter().map(|u| u.id.as_str()).collect();
    assert_eq!(orphan_ids, vec![ids[3].as_str()]);
}
