mod methods;
mod transitions;
mod types;

#[cfg(test)]
mod tests;

pub use types::{HistoryEntry, WorkStatus, WorkUnit, WorkUnitType};
