//! The persisted root: every work unit, the per-status priority columns and
//! the id high-water marks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::{Result, WorkflowError};
use crate::validation::{parse_work_unit_id, validate_prefix};

use super::work_unit::{WorkStatus, WorkUnit, WorkUnitType};

pub const SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub version: String,
    pub last_updated: DateTime<Utc>,
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            last_updated: Utc::now(),
        }
    }
}

/// Ordered id lists, one per status. Index 0 is the highest priority.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StateIndex {
    #[serde(default)]
    pub backlog: Vec<String>,
    #[serde(default)]
    pub specifying: Vec<String>,
    #[serde(default)]
    pub testing: Vec<String>,
    #[serde(default)]
    pub implementing: Vec<String>,
    #[serde(default)]
    pub validating: Vec<String>,
    #[serde(default)]
    pub done: Vec<String>,
    #[serde(default)]
    pub blocked: Vec<String>,
}

impl StateIndex {
    pub fn column(&self, status: WorkStatus) -> &Vec<String> {
        match status {
            WorkStatus::Backlog => &self.backlog,
            WorkStatus::Specifying => &self.specifying,
            WorkStatus::Testing => &self.testing,
            WorkStatus::Implementing => &self.implementing,
            WorkStatus::Validating => &self.validating,
            WorkStatus::Done => &self.done,
            WorkStatus::Blocked => &self.blocked,
        }
    }

    pub fn column_mut(&mut self, status: WorkStatus) -> &mut Vec<String> {
        match status {
            WorkStatus::Backlog => &mut self.backlog,
            WorkStatus::Specifying => &mut self.specifying,
            WorkStatus::Testing => &mut self.testing,
            WorkStatus::Implementing => &mut self.implementing,
            WorkStatus::Validating => &mut self.validating,
            WorkStatus::Done => &mut self.done,
            WorkStatus::Blocked => &mut self.blocked,
        }
    }

    /// Every column in status order.
    pub fn columns(&self) -> impl Iterator<Item = (WorkStatus, &Vec<String>)> {
        WorkStatus::ALL
            .into_iter()
            .map(move |status| (status, self.column(status)))
    }

    /// Columns that currently list `id`.
    pub fn statuses_of(&self, id: &str) -> Vec<WorkStatus> {
        self.columns()
            .filter(|(_, ids)| ids.iter().any(|i| i == id))
            .map(|(status, _)| status)
            .collect()
    }

    fn remove_everywhere(&mut self, id: &str) {
        for status in WorkStatus::ALL {
            self.column_mut(status).retain(|i| i != id);
        }
    }
}

/// Fields supplied when creating a work unit.
#[derive(Debug, Clone, Default)]
pub struct NewWorkUnit {
    pub title: String,
    pub unit_type: WorkUnitType,
    pub description: Option<String>,
    pub parent: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub states: StateIndex,
    #[serde(default)]
    pub work_units: BTreeMap<String, WorkUnit>,
    #[serde(default)]
    pub prefix_counters: BTreeMap<String, u32>,
}

impl Document {
    pub fn get(&self, id: &str) -> Result<&WorkUnit> {
        self.work_units
            .get(id)
            .ok_or_else(|| WorkflowError::not_found(id))
    }

    pub fn get_mut(&mut self, id: &str) -> Result<&mut WorkUnit> {
        self.work_units
            .get_mut(id)
            .ok_or_else(|| WorkflowError::not_found(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.work_units.contains_key(id)
    }

    /// Units in priority order for one status.
    pub fn units_in(&self, status: WorkStatus) -> Vec<&WorkUnit> {
        self.states
            .column(status)
            .iter()
            .filter_map(|id| self.work_units.get(id))
            .collect()
    }

    /// Allocate the next id for `prefix` and persist the high-water mark.
    ///
    /// The number is one past the larger of the stored counter and the
    /// highest suffix still present, so documents written before counters
    /// existed are handled and deleted numbers are never reissued.
    pub fn next_id(&mut self, prefix: &str) -> Result<String> {
        validate_prefix(prefix)?;

        let highest_existing = self
            .work_units
            .keys()
            .filter_map(|id| parse_work_unit_id(id))
            .filter(|(p, _)| *p == prefix)
            .map(|(_, n)| n)
            .max()
            .unwrap_or(0);
        let counter = self.prefix_counters.get(prefix).copied().unwrap_or(0);

        let next = counter
            .max(highest_existing)
            .checked_add(1)
            .ok_or_else(|| WorkflowError::IdsExhausted {
                prefix: prefix.to_string(),
            })?;
        self.prefix_counters.insert(prefix.to_string(), next);
        Ok(format!("{prefix}-{next:03}"))
    }

    /// Create a unit in the backlog, optionally nested under `parent`.
    pub fn create_work_unit(&mut self, prefix: &str, new: NewWorkUnit) -> Result<String> {
        if let Some(parent) = &new.parent {
            self.get(parent)?;
        }

        let id = self.next_id(prefix)?;
        let mut unit = WorkUnit::new(id.clone(), new.title, new.unit_type);
        unit.description = new.description;

        self.work_units.insert(id.clone(), unit);
        self.states.backlog.push(id.clone());

        if let Some(parent) = new.parent {
            if let Err(err) = crate::graph::set_parent(self, &id, Some(&parent)) {
                self.work_units.remove(&id);
                self.states.remove_everywhere(&id);
                return Err(err);
            }
        }

        tracing::info!(work_unit = %id, "created work unit");
        Ok(id)
    }

    /// Remove a childless unit together with every reference to it.
    ///
    /// The prefix counter is left untouched so the number is never reissued.
    pub fn delete_work_unit(&mut self, id: &str) -> Result<WorkUnit> {
        let unit = self.get(id)?;
        if !unit.children.is_empty() {
            return Err(WorkflowError::HasChildren {
                id: id.to_string(),
                children: unit.children.clone(),
            });
        }

        let unit = self
            .work_units
            .remove(id)
            .ok_or_else(|| WorkflowError::not_found(id))?;
        self.states.remove_everywhere(id);

        for other in self.work_units.values_mut() {
            let before = other.referenced_ids().count();
            other.children.retain(|c| c != id);
            other.blocks.retain(|b| b != id);
            other.blocked_by.retain(|b| b != id);
            other.depends_on.retain(|d| d != id);
            other.relates_to.retain(|r| r != id);
            if other.parent.as_deref() == Some(id) {
                other.parent = None;
            }
            if other.referenced_ids().count() != before {
                other.touch();
            }
        }

        tracing::info!(work_unit = %id, "deleted work unit");
        Ok(unit)
    }

    /// Move `id` from the `from` column to the end of the `to` column.
    ///
    /// Fails with `DataIntegrity` if the id is not where its status says it is.
    pub(crate) fn move_column(&mut self, id: &str, from: WorkStatus, to: WorkStatus) -> Result<()> {
        let column = self.states.column_mut(from);
        let position = column
            .iter()
            .position(|i| i == id)
            .ok_or_else(|| WorkflowError::DataIntegrity {
                message: format!("{id} has status {from} but is missing from the {from} column"),
            })?;
        column.remove(position);
        self.states.column_mut(to).push(id.to_string());
        Ok(())
    }
}
