//! Cycle detection over `blocks` edges

use std::collections::HashSet;

use crate::models::Document;

/// Find a cycle anywhere in the `blocks` graph using DFS.
///
/// Returns the path with its first id repeated at the end, e.g.
/// `[A, B, C, A]`. Dangling ids are skipped.
pub fn find_blocks_cycle(doc: &Document) -> Option<Vec<String>> {
    let mut visited = HashSet::new();
    let mut rec_stack = HashSet::new();
    let mut path = Vec::new();

    for id in doc.work_units.keys() {
        if !visited.contains(id.as_str()) {
            if let Some(cycle) = dfs_detect_cycle(doc, id, &mut visited, &mut rec_stack, &mut path)
            {
                return Some(cycle);
            }
        }
    }

    None
}

fn dfs_detect_cycle(
    doc: &Document,
    id: &str,
    visited: &mut HashSet<String>,
    rec_stack: &mut HashSet<String>,
    path: &mut Vec<String>,
) -> Option<Vec<String>> {
    visited.insert(id.to_string());
    rec_stack.insert(id.to_string());
    path.push(id.to_string());

    if let Some(unit) = doc.work_units.get(id) {
        for next in &unit.blocks {
            if !visited.contains(next) {
                if let Some(cycle) = dfs_detect_cycle(doc, next, visited, rec_stack, path) {
                    return Some(cycle);
                }
            } else if rec_stack.contains(next) {
                let start = path.iter().position(|p| p == next).unwrap_or(0);
                let mut cycle = path[start..].to_vec();
                cycle.push(next.clone());
                return Some(cycle);
            }
        }
    }

    path.pop();
    rec_stack.remove(id);
    None
}

/// A path `start -> ... -> goal` following `blocks` edges, if one exists.
pub fn blocks_path(doc: &Document, start: &str, goal: &str) -> Option<Vec<String>> {
    let mut visited = HashSet::new();
    let mut path = Vec::new();
    if dfs_path(doc, start, goal, &mut visited, &mut path) {
        Some(path)
    } else {
        None
    }
}

fn dfs_path(
    doc: &Document,
    id: &str,
    goal: &str,
    visited: &mut HashSet<String>,
    path: &mut Vec<String>,
) -> bool {
    if !visited.insert(id.to_string()) {
        return false;
    }
    path.push(id.to_string());
    if id == goal {
        return true;
    }

    if let Some(unit) = doc.work_units.get(id) {
        for next in &unit.blocks {
            if dfs_path(doc, next, goal, visited, path) {
                return true;
            }
        }
    }

    path.pop();
    false
}
