pub mod discovery;
pub mod document;
pub mod work_unit;

pub use discovery::{DiscoveryEntry, ExampleItem, QuestionItem, RuleItem};
pub use document::{Document, Meta, NewWorkUnit, StateIndex};
pub use work_unit::{HistoryEntry, WorkStatus, WorkUnit, WorkUnitType};
