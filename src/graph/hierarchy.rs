//! Parent/child hierarchy (epic -> story -> task)

use std::collections::HashSet;

use crate::errors::{Result, WorkflowError};
use crate::models::Document;

/// Deepest allowed chain from a root to a leaf, counting units.
pub const MAX_DEPTH: usize = 3;

/// Ids from `id` up to its root, `id` first. Stops at a repeated id so a
/// corrupted parent loop cannot hang the walk.
fn ancestors(doc: &Document, id: &str) -> Vec<String> {
    let mut chain = Vec::new();
    let mut seen = HashSet::new();
    let mut current = Some(id.to_string());

    while let Some(cur) = current {
        if !seen.insert(cur.clone()) {
            break;
        }
        current = doc.work_units.get(&cur).and_then(|u| u.parent.clone());
        chain.push(cur);
    }
    chain
}

/// Number of units from the root down to `id`, inclusive.
pub fn depth_of(doc: &Document, id: &str) -> usize {
    ancestors(doc, id).len()
}

/// Height of the subtree rooted at `id`, counting `id` itself.
fn subtree_height(doc: &Document, id: &str, seen: &mut HashSet<String>) -> usize {
    if !seen.insert(id.to_string()) {
        return 0;
    }
    let below = doc
        .work_units
        .get(id)
        .map(|unit| {
            unit.children
                .iter()
                .map(|child| subtree_height(doc, child, seen))
                .max()
                .unwrap_or(0)
        })
        .unwrap_or(0);
    below + 1
}

/// Attach `child` under `parent`, or detach it with `None`.
///
/// Keeps `parent` and `children` mutual, moving the child away from any
/// previous parent.
///
/// # Errors
/// `SelfReference`, `NotFound`, `CircularDependency` when `parent` is a
/// descendant of `child`, or `DepthExceeded` when the resulting chain would
/// be deeper than [`MAX_DEPTH`].
pub fn set_parent(doc: &mut Document, child: &str, parent: Option<&str>) -> Result<()> {
    let current = doc.get(child)?.parent.clone();

    if let Some(parent) = parent {
        if parent == child {
            return Err(WorkflowError::SelfReference {
                id: child.to_string(),
            });
        }
        doc.get(parent)?;

        if current.as_deref() == Some(parent) {
            return Ok(());
        }

        let chain = ancestors(doc, parent);
        if let Some(pos) = chain.iter().position(|id| id == child) {
            let mut path = vec![child.to_string()];
            path.extend(chain[..=pos].iter().cloned());
            return Err(WorkflowError::CircularDependency { path });
        }

        let depth = chain.len() + subtree_height(doc, child, &mut HashSet::new());
        if depth > MAX_DEPTH {
            return Err(WorkflowError::DepthExceeded {
                child: child.to_string(),
                parent: parent.to_string(),
                max: MAX_DEPTH,
            });
        }
    } else if current.is_none() {
        return Ok(());
    }

    if let Some(old) = &current {
        if let Some(old_parent) = doc.work_units.get_mut(old) {
            old_parent.children.retain(|c| c != child);
            old_parent.touch();
        }
    }

    if let Some(parent) = parent {
        let parent_unit = doc.get_mut(parent)?;
        if !parent_unit.children.iter().any(|c| c == child) {
            parent_unit.children.push(child.to_string());
        }
        parent_unit.touch();
    }

    let unit = doc.get_mut(child)?;
    unit.parent = parent.map(String::from);
    unit.touch();

    tracing::info!(work_unit = %child, parent = ?parent, "updated parent");
    Ok(())
}
