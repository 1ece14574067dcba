//! Relationship graph scenarios through committed transactions

use specflow::graph::{add_relation, remove_relation, RelationKind};
use specflow::models::WorkStatus;
use specflow::verify::{repair, validate};
use specflow::WorkflowError;

use super::helpers::{create, status_of, workspace};

#[test]
fn test_blocks_cycle_is_rejected() {
    let (_temp, ws) = workspace();
    let a = create(&ws, "API", "Schema");
    let b = create(&ws, "API", "Endpoints");

    ws.transaction(|doc, _| add_relation(doc, &a, &b, RelationKind::Blocks))
        .unwrap();
    let before = ws.snapshot().unwrap();

    let err = ws
        .transaction(|doc, _| add_relation(doc, &b, &a, RelationKind::Blocks))
        .unwrap_err();
    assert!(matches!(err, WorkflowError::CircularDependency { .. }));

    let after = ws.snapshot().unwrap();
    assert_eq!(after.work_units, before.work_units);
    assert_eq!(after.states, before.states);
}

#[test]
fn test_blocks_pairs_stay_mutual() {
    let (_temp, ws) = workspace();
    let ids: Vec<String> = (0..4).map(|i| create(&ws, "API", &format!("unit {i}"))).collect();

    ws.transaction(|doc, _| {
        add_relation(doc, &ids[0], &ids[1], RelationKind::Blocks)?;
        add_relation(doc, &ids[0], &ids[2], RelationKind::Blocks)?;
        add_relation(doc, &ids[3], &ids[0], RelationKind::BlockedBy)?;
        remove_relation(doc, &ids[0], &ids[2], RelationKind::Blocks)
    })
    .unwrap();

    let doc = ws.snapshot().unwrap();
    for unit in doc.work_units.values() {
        for target in &unit.blocks {
            assert!(doc.get(target).unwrap().blocked_by.contains(&unit.id));
        }
        for blocker in &unit.blocked_by {
            assert!(doc.get(blocker).unwrap().blocks.contains(&unit.id));
        }
    }
    assert!(validate(&doc).is_valid());
    assert_eq!(status_of(&ws, &ids[1]), WorkStatus::Blocked);
    assert_eq!(status_of(&ws, &ids[0]), WorkStatus::Blocked);
}

#[test]
fn test_repair_twice_changes_nothing_second_time() {
    let (_temp, ws) = workspace();
    let a = create(&ws, "API", "A");
    let b = create(&ws, "API", "B");

    ws.transaction(|doc, _| {
        // Simulate a one-sided write from an older tool
        doc.get_mut(&a)?.blocks.push(b.clone());
        doc.get_mut(&b)?.relates_to.push(a.clone());
        doc.states.backlog.clear();
        Ok(())
    })
    .unwrap();

    let first = ws.transaction(|doc, _| Ok(repair(doc))).unwrap();
    assert!(first.changed());
    let after_first = ws.snapshot().unwrap();

    let second = ws.transaction(|doc, _| Ok(repair(doc))).unwrap();
    assert!(!second.changed());
    assert_eq!(ws.snapshot().unwrap().work_units, after_first.work_units);
    assert!(validate(&after_first).is_valid());
}
