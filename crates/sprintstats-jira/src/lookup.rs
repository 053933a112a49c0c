//! Name-based lookups and sub-task collection over an [`IssueProvider`].
//!
//! Every `find_*` helper returns `Ok(None)` on a miss; callers decide
//! whether that is fatal.

use anyhow::Result;
use std::collections::HashSet;

use sprintstats_core::Issue;

use crate::provider::IssueProvider;
use crate::types::{Board, Field, Project, Sprint};

/// Resolve a custom field by one of its clause names (e.g. "Story Points").
///
/// # Errors
///
/// Returns an error if the field listing cannot be fetched.
pub fn find_custom_field(field_name: &str, provider: &dyn IssueProvider) -> Result<Option<Field>> {
    Ok(provider
        .fields()?
        .into_iter()
        .find(|f| f.clause_names.iter().any(|name| name == field_name)))
}

/// Find a board by its exact name.
///
/// # Errors
///
/// Returns an error if the board listing cannot be fetched.
pub fn find_board(board_name: &str, provider: &dyn IssueProvider) -> Result<Option<Board>> {
    Ok(provider
        .boards()?
        .into_iter()
        .find(|b| b.name == board_name))
}

/// Find a sprint on a board by its exact name.
///
/// # Errors
///
/// Returns an error if the sprint listing cannot be fetched.
pub fn find_sprint(
    sprint_name: &str,
    board_id: u64,
    provider: &dyn IssueProvider,
) -> Result<Option<Sprint>> {
    Ok(provider
        .sprints(board_id)?
        .into_iter()
        .find(|s| s.name == sprint_name))
}

/// Find a project by key or name. A key match wins over a name match when
/// one project's name collides with another's key.
///
/// # Errors
///
/// Returns an error if the project listing cannot be fetched.
pub fn find_project(name_or_key: &str, provider: &dyn IssueProvider) -> Result<Option<Project>> {
    let projects = provider.projects()?;
    Ok(projects
        .iter()
        .find(|p| p.key == name_or_key)
        .or_else(|| projects.iter().find(|p| p.name == name_or_key))
        .cloned())
}

/// Fetch the full sub-task closure of an issue, depth first.
///
/// Each direct sub-task reference is fetched through the provider and its
/// own sub-tasks collected in turn, yielding a flattened preorder sequence
/// of all descendants. A visited set of issue keys keeps non-acyclic input
/// from looping; no key is fetched twice.
///
/// # Errors
///
/// Returns an error if any sub-task fetch fails.
pub fn fetch_subtasks(issue: &Issue, provider: &dyn IssueProvider) -> Result<Vec<Issue>> {
    let mut seen: HashSet<String> = HashSet::new();
    seen.insert(issue.key.clone());

    // Stack-based DFS; children are pushed in reverse so the flattened
    // order matches the recursive traversal.
    let mut stack: Vec<String> = issue.subtask_keys.iter().rev().cloned().collect();
    let mut collected = Vec::new();

    while let Some(key) = stack.pop() {
        if !seen.insert(key.clone()) {
            continue;
        }
        let subtask = provider.issue(&key)?;
        stack.extend(subtask.subtask_keys.iter().rev().cloned());
        collected.push(subtask);
    }

    Ok(collected)
}
