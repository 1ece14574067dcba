//! Two writers racing on one document through the advisory lock

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use specflow::artifacts::InMemoryArtifacts;
use specflow::fs::{FileLock, LockPolicy, Workspace};
use specflow::graph::{add_relation, RelationKind};
use specflow::WorkflowError;

use super::helpers::create;

fn patient() -> LockPolicy {
    LockPolicy {
        attempts: 500,
        initial_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(10),
    }
}

#[test]
fn test_parallel_writers_keep_every_update() {
    let temp = tempfile::TempDir::new().unwrap();
    let ws = Arc::new(Workspace::new(
        temp.path().join("spec/work-units.json"),
        patient(),
        InMemoryArtifacts::new(),
    ));
    let hub = create(&ws, "CORE", "Hub");

    let handles: Vec<_> = (0..6)
        .map(|i| {
            let ws = Arc::clone(&ws);
            let hub = hub.clone();
            thread::spawn(move || {
                let id = create(&ws, "CORE", &format!("spoke {i}"));
                ws.transaction(|doc, _| add_relation(doc, &id, &hub, RelationKind::RelatesTo))
                    .unwrap();
                id
            })
        })
        .collect();
    let spokes: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let doc = ws.snapshot().unwrap();
    assert_eq!(doc.work_units.len(), 7);
    assert_eq!(doc.get(&hub).unwrap().relates_to.len(), spokes.len());
    assert_eq!(doc.prefix_counters.get("CORE"), Some(&7));
}

#[test]
fn test_held_lock_times_out() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path().join("spec/work-units.json");
    let impatient = LockPolicy {
        attempts: 3,
        initial_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(2),
    };
    let ws = Workspace::new(&path, impatient, InMemoryArtifacts::new());

    let _held = FileLock::acquire(&path, &LockPolicy::default()).unwrap();
    let err = ws.transaction(|doc, _| doc.next_id("CORE")).unwrap_err();

    assert!(matches!(err, WorkflowError::LockTimeout { attempts: 3, .. }));
    assert!(!path.exists());
}
