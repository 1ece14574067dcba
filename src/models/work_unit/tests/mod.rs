use crate::models::work_unit::{WorkStatus, WorkUnit, WorkUnitType};

fn create_test_unit(status: WorkStatus) -> WorkUnit {
    let mut unit = WorkUnit::new(
        "AUTH-001".to_string(),
        "Test unit".to_string(),
        WorkUnitType::Story,
    );
    unit.status = status;
    unit
}
