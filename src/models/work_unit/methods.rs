use chrono::Utc;

use crate::errors::{Result, WorkflowError};
use crate::models::discovery::{active, next_item_id, Discoverable, DiscoveryEntry, QuestionItem};

use super::types::{HistoryEntry, WorkStatus, WorkUnit, WorkUnitType};

impl WorkUnit {
    /// A fresh unit in `Backlog` with its initial history entry.
    pub fn new(id: String, title: String, unit_type: WorkUnitType) -> Self {
        let now = Utc::now();

        Self {
            id,
            title,
            unit_type,
            description: None,
            status: WorkStatus::Backlog,
            parent: None,
            children: Vec::new(),
            blocks: Vec::new(),
            blocked_by: Vec::new(),
            depends_on: Vec::new(),
            relates_to: Vec::new(),
            blocked_reason: None,
            questions: Vec::new(),
            rules: Vec::new(),
            examples: Vec::new(),
            estimate: None,
            linked_features: Vec::new(),
            state_history: vec![HistoryEntry {
                state: WorkStatus::Backlog,
                timestamp: now,
                reason: None,
            }],
            created_at: now,
            updated_at: now,
        }
    }

    /// Record a transition on the unit itself.
    ///
    /// Sets the status, keeps `blocked_reason` in step with it and appends a
    /// history entry. Callers are responsible for the legality checks and for
    /// moving the id between state columns.
    pub(crate) fn record_transition(&mut self, new_status: WorkStatus, reason: Option<String>) {
        let now = Utc::now();

        self.blocked_reason = if new_status == WorkStatus::Blocked {
            reason.clone().or_else(|| self.blocked_reason.take())
        } else {
            None
        };
        self.status = new_status;
        self.state_history.push(HistoryEntry {
            state: new_status,
            timestamp: now,
            reason,
        });
        self.updated_at = now;
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Every unit id this unit points at through hierarchy or relations.
    pub fn referenced_ids(&self) -> impl Iterator<Item = &String> {
        self.parent
            .iter()
            .chain(&self.children)
            .chain(&self.blocks)
            .chain(&self.blocked_by)
            .chain(&self.depends_on)
            .chain(&self.relates_to)
    }

    /// Whether the unit has any relation edge of any kind.
    pub fn has_relations(&self) -> bool {
        !(self.blocks.is_empty()
            && self.blocked_by.is_empty()
            && self.depends_on.is_empty()
            && self.relates_to.is_empty())
    }

    pub fn unanswered_questions(&self) -> Vec<u32> {
        active(&self.questions)
            .filter(|q| !q.selected)
            .map(|q| q.id)
            .collect()
    }

    pub fn has_examples(&self) -> bool {
        active(&self.examples).next().is_some()
    }

    pub fn add_question(&mut self, text: String) -> u32 {
        let id = next_item_id(&self.questions);
        self.questions.push(QuestionItem {
            id,
            text,
            selected: false,
            answer: None,
            deleted: false,
            created_at: Utc::now(),
            deleted_at: None,
        });
        self.touch();
        id
    }

    /// Answer a question, optionally capturing the answer as a new rule.
    pub fn answer_question(
        &mut self,
        question_id: u32,
        answer: String,
        add_rule: bool,
    ) -> Result<Option<u32>> {
        let unit_id = self.id.clone();
        let question = self
            .questions
            .iter_mut()
            .find(|q| q.id == question_id && !q.deleted)
            .ok_or(WorkflowError::ArtifactNotFound {
                id: unit_id,
                kind: "Question",
                artifact: question_id,
            })?;

        question.selected = true;
        question.answer = Some(answer.clone());

        let rule_id = if add_rule {
            Some(self.add_rule(answer))
        } else {
            self.touch();
            None
        };
        Ok(rule_id)
    }

    pub fn remove_question(&mut self, question_id: u32) -> Result<()> {
        set_deleted(&self.id, &mut self.questions, "Question", question_id, true)?;
        self.touch();
        Ok(())
    }

    pub fn restore_question(&mut self, question_id: u32) -> Result<()> {
        set_deleted(&self.id, &mut self.questions, "Question", question_id, false)?;
        self.touch();
        Ok(())
    }

    pub fn add_rule(&mut self, text: String) -> u32 {
        let id = push_entry(&mut self.rules, text);
        self.touch();
        id
    }

    pub fn remove_rule(&mut self, rule_id: u32) -> Result<()> {
        set_deleted(&self.id, &mut self.rules, "Rule", rule_id, true)?;
        self.touch();
        Ok(())
    }

    pub fn restore_rule(&mut self, rule_id: u32) -> Result<()> {
        set_deleted(&self.id, &mut self.rules, "Rule", rule_id, false)?;
        self.touch();
        Ok(())
    }

    pub fn add_example(&mut self, text: String) -> u32 {
        let id = push_entry(&mut self.examples, text);
        self.touch();
        id
    }

    pub fn remove_example(&mut self, example_id: u32) -> Result<()> {
        set_deleted(&self.id, &mut self.examples, "Example", example_id, true)?;
        self.touch();
        Ok(())
    }

    pub fn restore_example(&mut self, example_id: u32) -> Result<()> {
        set_deleted(&self.id, &mut self.examples, "Example", example_id, false)?;
        self.touch();
        Ok(())
    }

    /// Link a feature file by name. Returns `false` if it was already linked.
    pub fn link_feature(&mut self, feature: String) -> bool {
        if self.linked_features.contains(&feature) {
            return false;
        }
        self.linked_features.push(feature);
        self.touch();
        true
    }

    pub fn unlink_feature(&mut self, feature: &str) -> bool {
        let before = self.linked_features.len();
        self.linked_features.retain(|f| f != feature);
        let removed = self.linked_features.len() != before;
        if removed {
            self.touch();
        }
        removed
    }
}

fn push_entry(entries: &mut Vec<DiscoveryEntry>, text: String) -> u32 {
    let id = next_item_id(entries);
    entries.push(DiscoveryEntry {
        id,
        text,
        deleted: false,
        created_at: Utc::now(),
        deleted_at: None,
    });
    id
}

/// Flip the soft-delete flag. Deleting an already deleted entry, or
/// restoring a live one, is reported as not found.
fn set_deleted<T: Discoverable>(
    unit_id: &str,
    items: &mut [T],
    kind: &'static str,
    item_id: u32,
    deleted: bool,
) -> Result<()> {
    let item = items
        .iter_mut()
        .find(|item| item.item_id() == item_id && item.is_deleted() != deleted)
        .ok_or_else(|| WorkflowError::ArtifactNotFound {
            id: unit_id.to_string(),
            kind,
            artifact: item_id,
        })?;
    item.set_deleted(deleted, Utc::now());
    Ok(())
}
