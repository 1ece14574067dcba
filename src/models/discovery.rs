//! Discovery artifacts captured while specifying a work unit.
//!
//! Questions, rules and examples live in per-unit lists that are never
//! compacted. Each entry keeps the numeric id it was created with and is
//! soft-deleted with a flag, so ids quoted elsewhere stay valid.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An open question raised during example mapping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionItem {
    pub id: u32,
    pub text: String,
    /// Set once the question has been answered.
    #[serde(default)]
    pub selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default)]
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A business rule or a concrete example.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryEntry {
    pub id: u32,
    pub text: String,
    #[serde(default)]
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

pub type RuleItem = DiscoveryEntry;
pub type ExampleItem = DiscoveryEntry;

/// Common view over soft-deletable discovery entries.
pub trait Discoverable {
    fn item_id(&self) -> u32;
    fn is_deleted(&self) -> bool;
    fn set_deleted(&mut self, deleted: bool, at: DateTime<Utc>);
}

impl Discoverable for QuestionItem {
    fn item_id(&self) -> u32 {
        self.id
    }

    fn is_deleted(&self) -> bool {
        self.deleted
    }

    fn set_deleted(&mut self, deleted: bool, at: DateTime<Utc>) {
        self.deleted = deleted;
        self.deleted_at = deleted.then_some(at);
    }
}

impl Discoverable for DiscoveryEntry {
    fn item_id(&self) -> u32 {
        self.id
    }

    fn is_deleted(&self) -> bool {
        self.deleted
    }

    fn set_deleted(&mut self, deleted: bool, at: DateTime<Utc>) {
        self.deleted = deleted;
        self.deleted_at = deleted.then_some(at);
    }
}

/// Next id for a list: one past the highest id ever issued, deleted entries included.
pub fn next_item_id<T: Discoverable>(items: &[T]) -> u32 {
    items
        .iter()
        .map(|item| item.item_id() + 1)
        .max()
        .unwrap_or(0)
}

/// Iterate over entries that have not been soft-deleted.
pub fn active<T: Discoverable>(items: &[T]) -> impl Iterator<Item = &T> {
    items.iter().filter(|item| !item.is_deleted())
}
